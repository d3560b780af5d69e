//! Interactive loop

use dcf_app::{App, AppState, Command, Event, JsonFormatter, ReportFormatter, TextFormatter};
use dcf_assumptions::AssumptionSource;
use dcf_core::{CompactStyle, format_currency, format_percent};
use std::io::{self, BufRead, Write};
use tracing::debug;

fn print_banner() {
    println!(
        r"
╔══════════════════════════════════════════════════════════════╗
║                     DCF Valuation                            ║
║                                                              ║
║    /fetch <ticker>       - 查询假设 (Look up assumptions)    ║
║    /set <field> <value>  - 修改输入 (Edit an input)          ║
║    /show                 - 估值报告 (Valuation report)       ║
║    /help                 - 显示帮助 (Help)                   ║
║    /exit                 - 退出 (Exit)                       ║
╚══════════════════════════════════════════════════════════════╝
"
    );
}

/// One-line headline after an edit
fn summary_line(state: &AppState) -> String {
    let result = state.result();
    let mut line = format!(
        "Intrinsic value {} per share",
        format_currency(result.intrinsic_value_per_share)
    );
    if state.inputs().current_price > 0.0 {
        line.push_str(&format!(
            " vs price {} ({}, {})",
            format_currency(state.inputs().current_price),
            format_percent(result.upside_downside_pct),
            state.verdict()
        ));
    }
    line
}

fn prompt(state: &AppState) -> String {
    if state.inputs().symbol.is_empty() {
        "dcf> ".to_string()
    } else {
        format!("dcf {}> ", state.inputs().symbol)
    }
}

pub async fn run<S: AssumptionSource>(
    mut app: App<S>,
    style: CompactStyle,
    chart_width: usize,
) -> anyhow::Result<()> {
    let text = TextFormatter::new(style, chart_width);
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    print_banner();

    loop {
        print!("{}", prompt(app.state()));
        stdout.flush()?;

        let mut input = String::new();
        match stdin.lock().read_line(&mut input) {
            Ok(0) => {
                println!("\nGoodbye!");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error reading input: {e}");
                continue;
            }
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        let command = match Command::parse(input) {
            Ok(command) => command,
            Err(e) => {
                eprintln!("{}\n", text.format_error(&e.to_string()));
                continue;
            }
        };
        debug!(command = command.description(), "Handling command");

        match command {
            Command::Set { field, value } => {
                app.dispatch(Event::SetField(field, value)).await;
                match app.state().error() {
                    Some(error) => eprintln!("{}\n", text.format_error(error)),
                    None => println!("{}\n", summary_line(app.state())),
                }
            }
            Command::Symbol { symbol } => {
                app.dispatch(Event::SetSymbol(symbol)).await;
            }
            Command::Fetch { ticker } => {
                println!("Looking up {ticker}...");
                app.dispatch(Event::FetchRequested(ticker)).await;
                match app.state().error() {
                    Some(error) => eprintln!("{}\n", text.format_error(error)),
                    None => println!("{}", text.format_report(app.state())?),
                }
            }
            Command::Show => println!("{}", text.format_report(app.state())?),
            Command::Chart => println!("{}", text.format_chart(app.state().result())),
            Command::Json => println!("{}\n", JsonFormatter.format_report(app.state())?),
            Command::Reset => {
                app.dispatch(Event::Reset).await;
                println!("Inputs restored to defaults.\n");
            }
            Command::Help => println!("{}", Command::help_text()),
            Command::Exit => {
                println!("Goodbye!");
                break;
            }
        }
    }

    Ok(())
}
