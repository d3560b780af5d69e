//! Configuration for assumption lookups

use crate::error::{AssumptionError, Result};
use dcf_llm::LLMProvider;
use dcf_llm::providers::{GeminiConfig, GeminiProvider, OpenAIConfig, OpenAIProvider};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
/// Output budget per lookup; Gemini 2.5 thinking tokens count against it
pub(crate) const DEFAULT_MAX_TOKENS: usize = 8192;

/// Which LLM backend answers lookups
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Google Gemini with Google Search grounding (default)
    #[default]
    Gemini,
    /// OpenAI or any OpenAI-compatible server; no citations
    OpenAI,
}

impl ProviderKind {
    /// Model used when none is configured
    pub fn default_model(self) -> &'static str {
        match self {
            ProviderKind::Gemini => DEFAULT_GEMINI_MODEL,
            ProviderKind::OpenAI => DEFAULT_OPENAI_MODEL,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Gemini => f.write_str("gemini"),
            ProviderKind::OpenAI => f.write_str("openai"),
        }
    }
}

impl FromStr for ProviderKind {
    type Err = AssumptionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Ok(ProviderKind::Gemini),
            "openai" | "oai" => Ok(ProviderKind::OpenAI),
            other => Err(AssumptionError::Config(format!("unknown provider: {other}"))),
        }
    }
}

/// Language the model writes its `reasoning` in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningLanguage {
    #[default]
    English,
    Chinese,
}

impl FromStr for ReasoningLanguage {
    type Err = AssumptionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(ReasoningLanguage::English),
            "zh" | "zh-cn" | "chinese" => Ok(ReasoningLanguage::Chinese),
            other => Err(AssumptionError::Config(format!("unknown language: {other}"))),
        }
    }
}

/// Configuration for assumption lookups
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssumptionConfig {
    /// Backend to query
    pub provider: ProviderKind,

    /// Model name passed to the provider
    pub model: String,

    /// API key; required for Gemini
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Override for the provider's base URL
    pub api_base: Option<String>,

    /// HTTP timeout for the single lookup request
    pub request_timeout: Duration,

    /// Output token budget for the reply
    pub max_tokens: usize,

    /// Language of the returned reasoning
    pub language: ReasoningLanguage,
}

impl Default for AssumptionConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Gemini,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            api_key: None,
            api_base: None,
            request_timeout: DEFAULT_TIMEOUT,
            max_tokens: DEFAULT_MAX_TOKENS,
            language: ReasoningLanguage::English,
        }
    }
}

impl AssumptionConfig {
    /// Create a new configuration builder
    pub fn builder() -> AssumptionConfigBuilder {
        AssumptionConfigBuilder::default()
    }

    /// Build from environment variables
    ///
    /// | Variable                   | Meaning                               |
    /// |----------------------------|---------------------------------------|
    /// | `DCF_PROVIDER`             | `gemini` (default) or `openai`        |
    /// | `DCF_MODEL`                | model name                            |
    /// | `DCF_LOOKUP_TIMEOUT_SECS`  | request timeout                       |
    /// | `DCF_REASONING_LANGUAGE`   | `en` or `zh`                          |
    /// | `GEMINI_API_KEY`/`API_KEY` | Gemini key                            |
    /// | `GEMINI_API_BASE`          | Gemini base URL                       |
    /// | `OPENAI_API_KEY`           | OpenAI key                            |
    /// | `OPENAI_API_BASE`          | OpenAI-compatible base URL            |
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AssumptionConfig::from_env`] with an injectable variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Self::builder();

        let provider = match lookup("DCF_PROVIDER") {
            Some(p) => p.parse()?,
            None => ProviderKind::Gemini,
        };
        builder = builder.provider(provider);

        if let Some(model) = lookup("DCF_MODEL") {
            builder = builder.model(model);
        }

        if let Some(secs) = lookup("DCF_LOOKUP_TIMEOUT_SECS") {
            let secs = secs.trim().parse::<u64>().map_err(|_| {
                AssumptionError::Config(format!("DCF_LOOKUP_TIMEOUT_SECS is not a number: {secs}"))
            })?;
            builder = builder.request_timeout(Duration::from_secs(secs));
        }

        if let Some(language) = lookup("DCF_REASONING_LANGUAGE") {
            builder = builder.language(language.parse()?);
        }

        let (key, base) = match provider {
            ProviderKind::Gemini => (
                lookup("GEMINI_API_KEY").or_else(|| lookup("API_KEY")),
                lookup("GEMINI_API_BASE"),
            ),
            ProviderKind::OpenAI => (lookup("OPENAI_API_KEY"), lookup("OPENAI_API_BASE")),
        };
        if let Some(key) = key {
            builder = builder.api_key(key);
        }
        if let Some(base) = base {
            builder = builder.api_base(base);
        }

        Ok(builder.build())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.provider == ProviderKind::Gemini
            && self.api_key.as_deref().is_none_or(str::is_empty)
        {
            return Err(AssumptionError::Config(
                "GEMINI_API_KEY is required for the gemini provider".to_string(),
            ));
        }

        if self.request_timeout.is_zero() {
            return Err(AssumptionError::Config(
                "request timeout must be greater than 0".to_string(),
            ));
        }

        if self.model.trim().is_empty() {
            return Err(AssumptionError::Config("model must not be empty".to_string()));
        }

        Ok(())
    }

    /// Construct the configured provider
    pub fn build_provider(&self) -> Result<Arc<dyn LLMProvider>> {
        self.validate()?;
        let timeout = self.request_timeout.as_secs().max(1);

        let provider: Arc<dyn LLMProvider> = match self.provider {
            ProviderKind::Gemini => {
                let mut config =
                    GeminiConfig::new(self.api_key.clone().unwrap_or_default()).with_timeout(timeout);
                if let Some(base) = &self.api_base {
                    config = config.with_api_base(base.clone());
                }
                Arc::new(GeminiProvider::with_config(config)?)
            }
            ProviderKind::OpenAI => {
                // Local OpenAI-compatible servers accept any key
                let key = self.api_key.clone().unwrap_or_else(|| "not-needed".to_string());
                let mut config = OpenAIConfig::new(key).with_timeout(timeout);
                if let Some(base) = &self.api_base {
                    config = config.with_api_base(base.clone());
                }
                Arc::new(OpenAIProvider::with_config(config)?)
            }
        };

        Ok(provider)
    }
}

/// Builder for AssumptionConfig
#[derive(Debug, Default)]
pub struct AssumptionConfigBuilder {
    provider: Option<ProviderKind>,
    model: Option<String>,
    api_key: Option<String>,
    api_base: Option<String>,
    request_timeout: Option<Duration>,
    max_tokens: Option<usize>,
    language: Option<ReasoningLanguage>,
}

impl AssumptionConfigBuilder {
    /// Set the provider
    pub fn provider(mut self, provider: ProviderKind) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the model name
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the API key
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the API base URL
    pub fn api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = Some(base.into());
        self
    }

    /// Set the request timeout
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Set the output token budget
    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the reasoning language
    pub fn language(mut self, language: ReasoningLanguage) -> Self {
        self.language = Some(language);
        self
    }

    /// Build the configuration
    ///
    /// The model defaults per provider when not set.
    pub fn build(self) -> AssumptionConfig {
        let defaults = AssumptionConfig::default();
        let provider = self.provider.unwrap_or(defaults.provider);

        AssumptionConfig {
            provider,
            model: self
                .model
                .unwrap_or_else(|| provider.default_model().to_string()),
            api_key: self.api_key,
            api_base: self.api_base,
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            max_tokens: self.max_tokens.unwrap_or(defaults.max_tokens),
            language: self.language.unwrap_or(defaults.language),
        }
    }
}
