//! Command parsing for the interactive loop

use crate::error::{AppError, Result};
use dcf_core::InputField;

/// Parsed command from user input
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Overwrite one numeric input
    Set { field: InputField, value: f64 },
    /// Change the ticker label without a lookup
    Symbol { symbol: String },
    /// Look up assumptions for a ticker
    Fetch { ticker: String },
    /// Print the valuation report
    Show,
    /// Print only the bar chart
    Chart,
    /// Print inputs and result as JSON
    Json,
    /// Restore default inputs
    Reset,
    /// Show help
    Help,
    /// Leave the loop
    Exit,
}

impl Command {
    /// Parse a command from user input
    ///
    /// Commands start with `/`. A bare ticker such as `AAPL` is shorthand
    /// for `/fetch AAPL`.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();

        if input.is_empty() {
            return Err(AppError::Command("Empty input".to_string()));
        }

        let Some(body) = input.strip_prefix('/') else {
            if input.split_whitespace().count() == 1 {
                return Ok(Command::Fetch {
                    ticker: input.to_uppercase(),
                });
            }
            return Err(AppError::Command(format!(
                "Not a command: {input} (try /help)"
            )));
        };

        let parts: Vec<&str> = body.split_whitespace().collect();
        let Some((cmd, args)) = parts.split_first() else {
            return Err(AppError::Command("Empty command".to_string()));
        };

        match cmd.to_lowercase().as_str() {
            "set" | "s" | "设置" => {
                let [field, value] = args else {
                    return Err(AppError::Command(
                        "Usage: /set <field> <value>".to_string(),
                    ));
                };
                let field: InputField = field.parse()?;
                let value = field.parse_value(value)?;
                Ok(Command::Set { field, value })
            }
            "symbol" | "sym" | "代码" => {
                let symbol = args.first().ok_or_else(|| {
                    AppError::Command("Missing symbol for symbol command".to_string())
                })?;
                Ok(Command::Symbol {
                    symbol: symbol.to_uppercase(),
                })
            }
            "fetch" | "f" | "lookup" | "查询" => {
                let ticker = args.first().ok_or_else(|| {
                    AppError::Command("Missing ticker for fetch command".to_string())
                })?;
                Ok(Command::Fetch {
                    ticker: ticker.to_uppercase(),
                })
            }
            "show" | "v" | "估值" => Ok(Command::Show),
            "chart" | "c" | "图表" => Ok(Command::Chart),
            "json" | "j" => Ok(Command::Json),
            "reset" | "r" | "重置" => Ok(Command::Reset),
            "help" | "h" | "?" | "帮助" => Ok(Command::Help),
            "exit" | "quit" | "q" | "退出" => Ok(Command::Exit),
            _ => Err(AppError::Command(format!("Unknown command: {cmd}"))),
        }
    }

    /// Get help text for all commands
    pub fn help_text() -> &'static str {
        r"
DCF Valuation Commands
======================

Inputs:
  /set <field> <value>   修改输入 (Edit an input)
  /symbol <ticker>       设置代码 (Label the valuation)
  /fetch <ticker>        查询假设 (Look up assumptions online)
  /reset                 重置 (Restore defaults)

Output:
  /show                  估值报告 (Valuation report)
  /chart                 图表 (Discounted cash flow chart)
  /json                  JSON 输出 (Inputs and result as JSON)

Other:
  /help                  帮助 (Show help)
  /exit                  退出 (Exit)

Fields:
  price, fcf, growth, discount (wacc), terminal, shares, years

Aliases:
  /s = /set      /f = /fetch     /v = /show
  /c = /chart    /j = /json      /r = /reset    /q = /exit

Typing a bare ticker such as AAPL is the same as /fetch AAPL.
"
    }

    /// Get a short description of the command
    pub fn description(&self) -> &'static str {
        match self {
            Command::Set { .. } => "Edit an input",
            Command::Symbol { .. } => "Set the ticker label",
            Command::Fetch { .. } => "Look up assumptions",
            Command::Show => "Show valuation report",
            Command::Chart => "Show chart",
            Command::Json => "Show JSON",
            Command::Reset => "Restore defaults",
            Command::Help => "Show help",
            Command::Exit => "Exit",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_set() {
        let cmd = Command::parse("/set growth 12.5").unwrap();
        assert_eq!(
            cmd,
            Command::Set {
                field: InputField::GrowthRate,
                value: 12.5
            }
        );

        let cmd = Command::parse("/s shares 15,441,900,000").unwrap();
        assert_eq!(
            cmd,
            Command::Set {
                field: InputField::SharesOutstanding,
                value: 15_441_900_000.0
            }
        );
    }

    #[test]
    fn test_parse_set_errors() {
        assert!(matches!(
            Command::parse("/set growth"),
            Err(AppError::Command(_))
        ));
        assert!(matches!(
            Command::parse("/set colour 3"),
            Err(AppError::Input(dcf_core::Error::UnknownField(_)))
        ));
        assert!(matches!(
            Command::parse("/set wacc nine"),
            Err(AppError::Input(dcf_core::Error::InvalidNumber { .. }))
        ));
    }

    #[test]
    fn test_parse_fetch() {
        let cmd = Command::parse("/fetch msft").unwrap();
        assert_eq!(
            cmd,
            Command::Fetch {
                ticker: "MSFT".to_string()
            }
        );

        let cmd = Command::parse("/查询 0700.hk").unwrap();
        assert_eq!(
            cmd,
            Command::Fetch {
                ticker: "0700.HK".to_string()
            }
        );
    }

    #[test]
    fn test_bare_ticker_is_fetch() {
        let cmd = Command::parse("  nvda ").unwrap();
        assert_eq!(
            cmd,
            Command::Fetch {
                ticker: "NVDA".to_string()
            }
        );

        assert!(Command::parse("what is apple worth").is_err());
    }

    #[test]
    fn test_parse_missing_arg() {
        assert!(Command::parse("/fetch").is_err());
        assert!(Command::parse("/symbol").is_err());
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(Command::parse("/show").unwrap(), Command::Show);
        assert_eq!(Command::parse("/c").unwrap(), Command::Chart);
        assert_eq!(Command::parse("/JSON").unwrap(), Command::Json);
        assert_eq!(Command::parse("/重置").unwrap(), Command::Reset);
        assert_eq!(Command::parse("/?").unwrap(), Command::Help);
        assert_eq!(Command::parse("/q").unwrap(), Command::Exit);
    }

    #[test]
    fn test_parse_unknown_and_empty() {
        assert!(Command::parse("").is_err());
        assert!(Command::parse("/").is_err());
        assert!(Command::parse("/frobnicate").is_err());
    }
}
