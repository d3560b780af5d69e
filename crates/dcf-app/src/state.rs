//! Valuation session state
//!
//! [`AppState`] changes only through [`AppState::apply`]. Every input change
//! recomputes the valuation synchronously. A lookup is requested by returning
//! an [`Effect`]; whoever runs the effect feeds the outcome back as
//! [`Event::FetchSucceeded`] or [`Event::FetchFailed`]. Responses for a
//! request that is no longer the latest are dropped.

use dcf_assumptions::{AssumptionReport, AssumptionSource};
use dcf_core::{InputField, ValuationInputs, ValuationResult, Verdict, compute, is_terminal_clamped};
use tracing::{debug, error, info};

/// Shown when a lookup is requested without a ticker
pub const EMPTY_TICKER_MESSAGE: &str = "Please enter a ticker symbol.";

/// Something that happened to the session
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    SetField(InputField, f64),
    SetSymbol(String),
    ReplaceInputs(ValuationInputs),
    Reset,
    FetchRequested(String),
    FetchSucceeded {
        request_id: u64,
        report: AssumptionReport,
    },
    FetchFailed {
        request_id: u64,
        message: String,
    },
}

/// Work the state asks its driver to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Lookup { request_id: u64, ticker: String },
}

/// Everything a front end renders
#[derive(Debug, Clone)]
pub struct AppState {
    inputs: ValuationInputs,
    result: ValuationResult,
    loading: bool,
    reasoning: Option<String>,
    sources: Vec<String>,
    error: Option<String>,
    last_request_id: u64,
    pending: Option<u64>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ValuationInputs::default())
    }
}

impl AppState {
    pub fn new(inputs: ValuationInputs) -> Self {
        let inputs = inputs.clamp_projection_years();
        let result = compute(&inputs);
        Self {
            inputs,
            result,
            loading: false,
            reasoning: None,
            sources: Vec::new(),
            error: None,
            last_request_id: 0,
            pending: None,
        }
    }

    pub fn inputs(&self) -> &ValuationInputs {
        &self.inputs
    }

    /// Always equal to `compute(self.inputs())`
    pub fn result(&self) -> &ValuationResult {
        &self.result
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn reasoning(&self) -> Option<&str> {
        self.reasoning.as_deref()
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// User-facing message of the last failure, if any
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Id of the lookup whose answer would still be accepted
    pub fn pending_request(&self) -> Option<u64> {
        self.pending
    }

    pub fn verdict(&self) -> Verdict {
        self.result.verdict(self.inputs.current_price)
    }

    /// Whether the terminal denominator was floored for these inputs
    pub fn terminal_clamped(&self) -> bool {
        is_terminal_clamped(&self.inputs)
    }

    /// Apply one event, returning the effect it requests
    pub fn apply(&mut self, event: Event) -> Option<Effect> {
        match event {
            Event::SetField(field, value) => {
                match self.inputs.set_field(field, value) {
                    Ok(()) => {
                        self.error = None;
                        self.recompute();
                    }
                    Err(e) => self.error = Some(e.to_string()),
                }
                None
            }
            Event::SetSymbol(symbol) => {
                self.inputs.symbol = symbol.trim().to_uppercase();
                None
            }
            Event::ReplaceInputs(inputs) => {
                self.inputs = inputs.clamp_projection_years();
                self.error = None;
                self.recompute();
                None
            }
            Event::Reset => {
                *self = Self {
                    last_request_id: self.last_request_id,
                    ..Self::default()
                };
                None
            }
            Event::FetchRequested(ticker) => {
                let ticker = ticker.trim().to_uppercase();
                if ticker.is_empty() {
                    self.error = Some(EMPTY_TICKER_MESSAGE.to_string());
                    return None;
                }

                self.last_request_id += 1;
                self.pending = Some(self.last_request_id);
                self.loading = true;
                self.error = None;
                self.reasoning = None;
                self.sources.clear();
                self.inputs.symbol.clone_from(&ticker);

                Some(Effect::Lookup {
                    request_id: self.last_request_id,
                    ticker,
                })
            }
            Event::FetchSucceeded { request_id, report } => {
                if !self.accepts(request_id) {
                    debug!(request_id, "Dropping stale lookup result");
                    return None;
                }

                self.pending = None;
                self.loading = false;
                self.error = None;
                self.inputs = report.inputs.clamp_projection_years();
                self.reasoning = Some(report.reasoning);
                self.sources = report.sources;
                self.recompute();
                None
            }
            Event::FetchFailed {
                request_id,
                message,
            } => {
                if !self.accepts(request_id) {
                    debug!(request_id, "Dropping stale lookup failure");
                    return None;
                }

                self.pending = None;
                self.loading = false;
                self.error = Some(message);
                None
            }
        }
    }

    fn accepts(&self, request_id: u64) -> bool {
        self.pending == Some(request_id)
    }

    fn recompute(&mut self) {
        self.result = compute(&self.inputs);
    }
}

/// Runs an [`AppState`] against an assumption source
pub struct App<S> {
    state: AppState,
    source: S,
}

impl<S: AssumptionSource> App<S> {
    pub fn new(source: S) -> Self {
        Self::with_state(source, AppState::default())
    }

    pub fn with_state(source: S, state: AppState) -> Self {
        Self { state, source }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Apply `event` and run every effect it triggers to completion
    pub async fn dispatch(&mut self, event: Event) {
        let mut next = Some(event);
        while let Some(event) = next.take() {
            if let Some(effect) = self.state.apply(event) {
                next = Some(self.run(effect).await);
            }
        }
    }

    async fn run(&self, effect: Effect) -> Event {
        match effect {
            Effect::Lookup { request_id, ticker } => {
                info!(request_id, ticker = %ticker, source = self.source.name(), "Running lookup");
                match self.source.lookup(&ticker).await {
                    Ok(report) => Event::FetchSucceeded { request_id, report },
                    Err(e) => {
                        error!(request_id, ticker = %ticker, error = %e, "Lookup failed");
                        Event::FetchFailed {
                            request_id,
                            message: e.user_message().to_string(),
                        }
                    }
                }
            }
        }
    }
}
