//! Assumption sources

use crate::config::{AssumptionConfig, DEFAULT_MAX_TOKENS, ReasoningLanguage};
use crate::error::{AssumptionError, Result};
use crate::parse::{dedup_sources, parse_assumptions};
use crate::prompt::render_lookup_prompt;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dcf_core::{DEFAULT_PROJECTION_YEARS, ValuationInputs};
use dcf_llm::{CompletionRequest, LLMProvider, Message, StopReason};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Outcome of one successful lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssumptionReport {
    /// Suggested inputs; symbol is always set
    pub inputs: ValuationInputs,

    /// Short rationale for the numbers
    pub reasoning: String,

    /// Source URLs, de-duplicated, in provider order
    pub sources: Vec<String>,

    /// Name of the backend that answered
    pub provider: String,

    pub fetched_at: DateTime<Utc>,
}

/// Something that can suggest valuation inputs for a ticker
///
/// Implementations are best-effort: every failure is returned once, there is
/// no retry.
#[async_trait]
pub trait AssumptionSource: Send + Sync {
    /// Look up inputs for `ticker`
    async fn lookup(&self, ticker: &str) -> Result<AssumptionReport>;

    /// Source name for logs
    fn name(&self) -> &str;
}

#[async_trait]
impl<T: AssumptionSource + ?Sized> AssumptionSource for Box<T> {
    async fn lookup(&self, ticker: &str) -> Result<AssumptionReport> {
        (**self).lookup(ticker).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Assumption source backed by a search-grounded LLM
pub struct LlmAssumptionSource {
    provider: Arc<dyn LLMProvider>,
    model: String,
    language: ReasoningLanguage,
    max_tokens: usize,
}

impl LlmAssumptionSource {
    pub fn new(provider: Arc<dyn LLMProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            language: ReasoningLanguage::English,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Build the provider described by `config`
    pub fn from_config(config: &AssumptionConfig) -> Result<Self> {
        let provider = config.build_provider()?;
        Ok(Self::new(provider, config.model.clone())
            .with_language(config.language)
            .with_max_tokens(config.max_tokens))
    }

    pub fn with_language(mut self, language: ReasoningLanguage) -> Self {
        self.language = language;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn fallback_reasoning(&self) -> String {
        format!("Estimated by {} ({}).", self.provider.name(), self.model)
    }
}

#[async_trait]
impl AssumptionSource for LlmAssumptionSource {
    #[instrument(skip(self), fields(provider = %self.provider.name(), model = %self.model))]
    async fn lookup(&self, ticker: &str) -> Result<AssumptionReport> {
        let symbol = ticker.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(AssumptionError::InvalidSymbol(ticker.to_string()));
        }

        let prompt = render_lookup_prompt(&symbol, DEFAULT_PROJECTION_YEARS, self.language)?;
        let request = CompletionRequest::builder(&self.model)
            .add_message(Message::user(prompt))
            .max_tokens(self.max_tokens)
            .web_search(true)
            .build();

        info!(symbol = %symbol, "Looking up DCF assumptions");

        let response = self.provider.complete(request).await.map_err(|e| {
            error!(symbol = %symbol, error = %e, "Assumption lookup failed");
            AssumptionError::from(e)
        })?;

        debug!(
            tokens = response.usage.total(),
            citations = response.citations.len(),
            "Received lookup reply"
        );

        let truncated = response.stop_reason == StopReason::MaxTokens;
        if truncated {
            warn!(
                symbol = %symbol,
                max_tokens = self.max_tokens,
                "Lookup reply hit the output token limit"
            );
        }

        let parsed = parse_assumptions(response.text(), &symbol).map_err(|e| {
            error!(symbol = %symbol, error = %e, truncated, "Lookup reply was not usable");
            match e {
                AssumptionError::Parse(reason) if truncated => AssumptionError::Parse(format!(
                    "reply cut off at the {} token limit: {reason}",
                    self.max_tokens
                )),
                other => other,
            }
        })?;

        let report = AssumptionReport {
            inputs: parsed.inputs,
            reasoning: parsed
                .reasoning
                .unwrap_or_else(|| self.fallback_reasoning()),
            sources: dedup_sources(response.citations),
            provider: self.provider.name().to_string(),
            fetched_at: Utc::now(),
        };

        info!(
            symbol = %report.inputs.symbol,
            sources = report.sources.len(),
            "Assumptions ready"
        );

        Ok(report)
    }

    fn name(&self) -> &str {
        self.provider.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dcf_llm::{CompletionResponse, LLMError, StopReason, TokenUsage};
    use std::sync::Mutex;

    /// Provider replaying a canned reply and recording the request
    struct CannedProvider {
        reply: std::result::Result<(String, Vec<String>), ()>,
        stop_reason: StopReason,
        seen: Mutex<Vec<CompletionRequest>>,
    }

    impl CannedProvider {
        fn replying(text: &str, citations: &[&str]) -> Self {
            Self {
                reply: Ok((
                    text.to_string(),
                    citations.iter().map(|c| (*c).to_string()).collect(),
                )),
                stop_reason: StopReason::EndTurn,
                seen: Mutex::new(Vec::new()),
            }
        }

        fn truncated(text: &str) -> Self {
            Self {
                stop_reason: StopReason::MaxTokens,
                ..Self::replying(text, &[])
            }
        }

        fn failing() -> Self {
            Self {
                reply: Err(()),
                stop_reason: StopReason::EndTurn,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LLMProvider for CannedProvider {
        async fn complete(&self, request: CompletionRequest) -> dcf_llm::Result<CompletionResponse> {
            self.seen.lock().unwrap().push(request);
            match &self.reply {
                Ok((text, citations)) => Ok(CompletionResponse {
                    message: Message::assistant(text.clone()),
                    stop_reason: self.stop_reason,
                    usage: TokenUsage::default(),
                    citations: citations.clone(),
                }),
                Err(()) => Err(LLMError::RateLimitExceeded("quota".to_string())),
            }
        }

        fn name(&self) -> &str {
            "canned"
        }
    }

    #[tokio::test]
    async fn test_lookup_builds_report() {
        let provider = Arc::new(CannedProvider::replying(
            r#"Sure! {"symbol": "AAPL", "currentPrice": 190, "freeCashFlow": 1e11,
                "growthRate": 7, "discountRate": 9, "terminalGrowthRate": 2.5,
                "sharesOutstanding": 1.5e10, "reasoning": "From the FY24 filing."}"#,
            &["https://a.example", "https://b.example", "https://a.example"],
        ));
        let source = LlmAssumptionSource::new(provider.clone(), "test-model");

        let report = source.lookup(" aapl ").await.unwrap();

        assert_eq!(report.inputs.symbol, "AAPL");
        assert_eq!(report.inputs.current_price, 190.0);
        assert_eq!(report.inputs.projection_years, 5);
        assert_eq!(report.reasoning, "From the FY24 filing.");
        assert_eq!(report.sources, vec!["https://a.example", "https://b.example"]);
        assert_eq!(report.provider, "canned");

        let seen = provider.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].web_search);
        assert_eq!(seen[0].model, "test-model");
        assert!(seen[0].messages[0].text().contains("ticker symbol: AAPL"));
    }

    #[tokio::test]
    async fn test_missing_reasoning_uses_fallback() {
        let provider = Arc::new(CannedProvider::replying(r#"{"currentPrice": 10}"#, &[]));
        let source = LlmAssumptionSource::new(provider, "m1");

        let report = source.lookup("ibm").await.unwrap();
        assert_eq!(report.reasoning, "Estimated by canned (m1).");
        assert!(report.sources.is_empty());
        assert_eq!(report.inputs.growth_rate_pct, 10.0);
    }

    #[tokio::test]
    async fn test_empty_ticker_is_rejected_without_request() {
        let provider = Arc::new(CannedProvider::replying("{}", &[]));
        let source = LlmAssumptionSource::new(provider.clone(), "m");

        let err = source.lookup("   ").await.unwrap_err();
        assert!(matches!(err, AssumptionError::InvalidSymbol(_)));
        assert!(provider.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_provider_failure_is_reported_once() {
        let provider = Arc::new(CannedProvider::failing());
        let source = LlmAssumptionSource::new(provider.clone(), "m");

        let err = source.lookup("TSLA").await.unwrap_err();
        assert!(matches!(err, AssumptionError::Provider(_)));
        assert_eq!(
            err.user_message(),
            "Unable to fetch stock data, please enter the values manually."
        );
        assert_eq!(provider.seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unparseable_reply_is_parse_error() {
        let provider = Arc::new(CannedProvider::replying("{not json}", &[]));
        let source = LlmAssumptionSource::new(provider, "m");

        let err = source.lookup("TSLA").await.unwrap_err();
        assert!(matches!(err, AssumptionError::Parse(_)));
    }

    #[tokio::test]
    async fn test_truncated_reply_names_token_limit() {
        let provider = Arc::new(CannedProvider::truncated(
            r#"{"symbol": "NVDA", "currentPrice": 120, "freeCash"#,
        ));
        let source = LlmAssumptionSource::new(provider.clone(), "m").with_max_tokens(256);

        let err = source.lookup("NVDA").await.unwrap_err();
        match err {
            AssumptionError::Parse(reason) => assert!(reason.contains("256 token limit")),
            other => panic!("expected parse error, got {other:?}"),
        }
        assert_eq!(provider.seen.lock().unwrap()[0].max_tokens, 256);
    }

    #[tokio::test]
    async fn test_default_budget_leaves_room_for_thinking() {
        let provider = Arc::new(CannedProvider::replying(r#"{"currentPrice": 1}"#, &[]));
        let source = LlmAssumptionSource::new(provider.clone(), "m");

        source.lookup("KO").await.unwrap();
        assert_eq!(provider.seen.lock().unwrap()[0].max_tokens, DEFAULT_MAX_TOKENS);
    }
}
