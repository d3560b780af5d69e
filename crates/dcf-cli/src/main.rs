//! Command-line interface for dcf-rs
//!
//! ```bash
//! # Value a company from explicit inputs
//! dcf value --price 190 --fcf 1e11 --shares 1.5e10 --growth 8 --discount 9
//!
//! # Look the inputs up first (needs GEMINI_API_KEY)
//! dcf fetch AAPL
//!
//! # Interactive session
//! dcf repl
//! ```

mod repl;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use dcf_app::{App, AppState, Event, ReportFormat, formatter};
use dcf_assumptions::{
    AssumptionConfig, AssumptionError, AssumptionReport, AssumptionSource, LlmAssumptionSource,
    ProviderKind,
};
use dcf_core::{CompactStyle, ValuationInputs};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "dcf", version)]
#[command(about = "Discounted cash flow valuation", long_about = None)]
struct Cli {
    /// Unit style for large numbers: western (K/M/B/T) or chinese (万/亿)
    #[arg(long, global = true, default_value = "western")]
    compact_style: CompactStyle,

    /// Width of the longest chart bar
    #[arg(long, global = true)]
    chart_width: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Value a company from inputs given on the command line or in a file
    Value(ValueArgs),
    /// Look up inputs for a ticker, then value it
    Fetch(FetchArgs),
    /// Interactive session
    Repl(LookupArgs),
}

#[derive(Args, Debug, Default)]
struct ValueArgs {
    /// JSON file with a full or partial input set
    #[arg(long)]
    input: Option<PathBuf>,

    /// Ticker label
    #[arg(long)]
    symbol: Option<String>,

    /// Current share price
    #[arg(long)]
    price: Option<f64>,

    /// Latest annual free cash flow
    #[arg(long, allow_hyphen_values = true)]
    fcf: Option<f64>,

    /// Annual growth over the forecast window, percent
    #[arg(long, allow_hyphen_values = true)]
    growth: Option<f64>,

    /// Discount rate (WACC), percent
    #[arg(long, allow_hyphen_values = true)]
    discount: Option<f64>,

    /// Perpetual growth after the forecast window, percent
    #[arg(long, allow_hyphen_values = true)]
    terminal_growth: Option<f64>,

    /// Shares outstanding
    #[arg(long)]
    shares: Option<f64>,

    /// Forecast years, clamped to 1..=10
    #[arg(long)]
    years: Option<u32>,

    #[arg(long, default_value = "text")]
    format: ReportFormat,
}

#[derive(Args, Debug, Default)]
struct LookupArgs {
    /// Lookup backend; overrides DCF_PROVIDER
    #[arg(long)]
    provider: Option<ProviderKind>,

    /// Model name; overrides DCF_MODEL
    #[arg(long)]
    model: Option<String>,
}

#[derive(Args, Debug)]
struct FetchArgs {
    /// Ticker symbol, e.g. AAPL or 0700.HK
    ticker: String,

    #[command(flatten)]
    lookup: LookupArgs,

    #[arg(long, default_value = "text")]
    format: ReportFormat,
}

/// Stand-in used when no provider could be configured
///
/// Every lookup fails with the configuration error, so manual entry keeps
/// working.
struct Unconfigured(String);

#[async_trait::async_trait]
impl AssumptionSource for Unconfigured {
    async fn lookup(&self, _ticker: &str) -> dcf_assumptions::Result<AssumptionReport> {
        Err(AssumptionError::Config(self.0.clone()))
    }

    fn name(&self) -> &str {
        "unconfigured"
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dcf_utils::init_tracing();

    let cli = Cli::parse();
    let mut config = dcf_utils::Config::from_env()?;
    if let Some(width) = cli.chart_width {
        config = config.with_chart_width(width);
    }

    info!(environment = %config.environment, "Starting {}", config.app_name);

    match cli.command {
        Commands::Value(args) => {
            let inputs = resolve_inputs(&args)?;
            let state = AppState::new(inputs);
            let output = formatter(args.format, cli.compact_style, config.chart_width)
                .format_report(&state)?;
            println!("{output}");
            Ok(ExitCode::SUCCESS)
        }
        Commands::Fetch(args) => {
            let report_formatter = formatter(args.format, cli.compact_style, config.chart_width);
            let source = match build_source(&args.lookup) {
                Ok(source) => source,
                Err(e) => {
                    warn!(error = %e, "No assumption source available");
                    eprintln!("{}", report_formatter.format_error(e.user_message()));
                    return Ok(ExitCode::FAILURE);
                }
            };

            let mut app = App::new(source);
            app.dispatch(Event::FetchRequested(args.ticker)).await;

            if let Some(message) = app.state().error() {
                eprintln!("{}", report_formatter.format_error(message));
                return Ok(ExitCode::FAILURE);
            }

            println!("{}", report_formatter.format_report(app.state())?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Repl(args) => {
            let source: Box<dyn AssumptionSource> = match build_source(&args) {
                Ok(source) => Box::new(source),
                Err(e) => {
                    warn!(error = %e, "Lookups disabled");
                    Box::new(Unconfigured(e.to_string()))
                }
            };
            repl::run(App::new(source), cli.compact_style, config.chart_width).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Environment configuration with command-line overrides applied
fn build_source(args: &LookupArgs) -> dcf_assumptions::Result<LlmAssumptionSource> {
    let config = AssumptionConfig::from_lookup(|key| match key {
        "DCF_PROVIDER" if args.provider.is_some() => args.provider.map(|p| p.to_string()),
        "DCF_MODEL" if args.model.is_some() => args.model.clone(),
        _ => std::env::var(key).ok(),
    })?;
    LlmAssumptionSource::from_config(&config)
}

/// Defaults, then the input file, then individual flags
fn resolve_inputs(args: &ValueArgs) -> anyhow::Result<ValuationInputs> {
    let base = match &args.input {
        Some(path) => load_inputs(path)?,
        None => ValuationInputs::default(),
    };
    Ok(merge_inputs(base, args))
}

fn load_inputs(path: &Path) -> anyhow::Result<ValuationInputs> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid inputs in {}", path.display()))
}

fn merge_inputs(mut inputs: ValuationInputs, args: &ValueArgs) -> ValuationInputs {
    if let Some(symbol) = &args.symbol {
        inputs.symbol = symbol.trim().to_uppercase();
    }
    if let Some(price) = args.price {
        inputs.current_price = price;
    }
    if let Some(fcf) = args.fcf {
        inputs.free_cash_flow = fcf;
    }
    if let Some(growth) = args.growth {
        inputs.growth_rate_pct = growth;
    }
    if let Some(discount) = args.discount {
        inputs.discount_rate_pct = discount;
    }
    if let Some(terminal) = args.terminal_growth {
        inputs.terminal_growth_rate_pct = terminal;
    }
    if let Some(shares) = args.shares {
        inputs.shares_outstanding = shares;
    }
    if let Some(years) = args.years {
        inputs.projection_years = years;
    }
    inputs.clamp_projection_years()
}
