//! # Console Driver
//!
//! Line-oriented operator console. Each input line is parsed into a
//! [`Command`], dispatched to a command handler and answered with JSON.
//!
//! ## Loop
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  stdin line ──► Command::from_str ──► Console::execute ──► handler      │
//! │                      │                        │                         │
//! │                 ParseError                Result<Value, ApiError>       │
//! │                      │                        │                         │
//! │                      └──────────┬─────────────┘                         │
//! │                                 ▼                                       │
//! │  stdout:  { ...response... }   or   { "error": { "code", "message" } }  │
//! │                                                                         │
//! │  Blank lines and lines starting with `#` are skipped; `quit` stops.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Logs go to stderr, so stdout carries only JSON.

use std::str::FromStr;

use bistro_core::{DiscountKind, ProductId, SelectionMode, TableId};
use bistro_gateway::{Credentials, UserInfo};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

use crate::commands::payment::PaymentMethod;
use crate::commands::{history, order, payment, session, tables};
use crate::error::ApiError;
use crate::state::{GatewayState, SessionState, TerminalConfig};

const HELP: &[&str] = &[
    "login <username> <password>",
    "logout",
    "configs",
    "pos <config_id>",
    "reload",
    "floor",
    "open <table>",
    "close <table>",
    "guests <table> <count>",
    "use <table>",
    "select merge|split",
    "toggle <table>",
    "confirm",
    "cancel",
    "products [@category] [query]",
    "add <product>",
    "qty <product> <+n|-n>",
    "remove <product>",
    "discount <product> <value>[%]",
    "bill-discount <value>[%]",
    "customer <id|none>",
    "pricelist <id|none>",
    "promotion <id|none>",
    "order",
    "quote",
    "pay [cash|card|transfer|momo]",
    "history",
    "lines <order_id>",
    "quit",
];

// =============================================================================
// Command Parsing
// =============================================================================

/// Console input that could not be turned into a command.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command: {0} (try `help`)")]
    Unknown(String),

    #[error("{command}: missing <{argument}>")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("Invalid {argument}: {value}")]
    InvalidArgument {
        argument: &'static str,
        value: String,
    },
}

impl From<ParseError> for ApiError {
    fn from(err: ParseError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// One operator command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Quit,
    Login { username: String, password: String },
    Logout,
    Configs,
    Pos(i64),
    Reload,
    Floor,
    Open(TableId),
    Close(TableId),
    Guests { table_id: TableId, guests: u32 },
    Use(TableId),
    Select(SelectionMode),
    Toggle(TableId),
    Confirm,
    Cancel,
    Products { category: Option<i64>, query: String },
    Add(ProductId),
    Qty { product_id: ProductId, delta: i64 },
    Remove(ProductId),
    Discount { product_id: ProductId, kind: DiscountKind, value: Decimal },
    BillDiscount { kind: DiscountKind, value: Decimal },
    Customer(Option<i64>),
    PriceList(Option<i64>),
    Promotion(Option<i64>),
    Order,
    Quote,
    Pay(PaymentMethod),
    History,
    Lines(i64),
}

/// Positional arguments of one command line.
struct Args<'a> {
    command: &'static str,
    rest: std::str::SplitWhitespace<'a>,
}

impl<'a> Args<'a> {
    fn raw(&mut self, argument: &'static str) -> Result<&'a str, ParseError> {
        self.rest.next().ok_or(ParseError::MissingArgument {
            command: self.command,
            argument,
        })
    }

    fn parse<T: FromStr>(&mut self, argument: &'static str) -> Result<T, ParseError> {
        let raw = self.raw(argument)?;
        parse_value(argument, raw)
    }

    /// An id or `none`.
    fn optional_id(&mut self, argument: &'static str) -> Result<Option<i64>, ParseError> {
        match self.raw(argument)? {
            "none" | "-" => Ok(None),
            raw => parse_value(argument, raw).map(Some),
        }
    }

    /// `10%` is a percentage, `5000` an amount.
    fn discount(&mut self) -> Result<(DiscountKind, Decimal), ParseError> {
        let raw = self.raw("value")?;
        let (kind, number) = match raw.strip_suffix('%') {
            Some(number) => (DiscountKind::Percent, number),
            None => (DiscountKind::Amount, raw),
        };
        Ok((kind, parse_value("value", number)?))
    }

    fn remainder(self) -> Vec<&'a str> {
        self.rest.collect()
    }
}

fn parse_value<T: FromStr>(argument: &'static str, raw: &str) -> Result<T, ParseError> {
    raw.parse().map_err(|_| ParseError::InvalidArgument {
        argument,
        value: raw.to_string(),
    })
}

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let word = words.next().ok_or(ParseError::Empty)?.to_lowercase();

        let command: &'static str = match word.as_str() {
            "help" | "?" => return Ok(Command::Help),
            "quit" | "exit" => return Ok(Command::Quit),
            "logout" => return Ok(Command::Logout),
            "configs" => return Ok(Command::Configs),
            "reload" => return Ok(Command::Reload),
            "floor" => return Ok(Command::Floor),
            "confirm" => return Ok(Command::Confirm),
            "cancel" => return Ok(Command::Cancel),
            "order" => return Ok(Command::Order),
            "quote" => return Ok(Command::Quote),
            "history" => return Ok(Command::History),
            "login" => "login",
            "pos" => "pos",
            "open" => "open",
            "close" => "close",
            "guests" => "guests",
            "use" => "use",
            "select" => "select",
            "toggle" => "toggle",
            "products" => "products",
            "add" => "add",
            "qty" => "qty",
            "remove" => "remove",
            "discount" => "discount",
            "bill-discount" => "bill-discount",
            "customer" => "customer",
            "pricelist" => "pricelist",
            "promotion" => "promotion",
            "pay" => "pay",
            "lines" => "lines",
            other => return Err(ParseError::Unknown(other.to_string())),
        };

        let mut args = Args {
            command,
            rest: words,
        };

        Ok(match command {
            "login" => Command::Login {
                username: args.raw("username")?.to_string(),
                password: args.raw("password")?.to_string(),
            },
            "pos" => Command::Pos(args.parse("config_id")?),
            "open" => Command::Open(args.parse("table")?),
            "close" => Command::Close(args.parse("table")?),
            "guests" => Command::Guests {
                table_id: args.parse("table")?,
                guests: args.parse("count")?,
            },
            "use" => Command::Use(args.parse("table")?),
            "select" => Command::Select(args.parse("mode")?),
            "toggle" => Command::Toggle(args.parse("table")?),
            "products" => {
                let mut words = args.remainder();
                let category = match words.first().and_then(|w| w.strip_prefix('@')) {
                    Some(raw) => {
                        let id = parse_value("category", raw)?;
                        words.remove(0);
                        Some(id)
                    }
                    None => None,
                };
                Command::Products {
                    category,
                    query: words.join(" "),
                }
            }
            "add" => Command::Add(args.parse("product")?),
            "qty" => {
                let product_id = args.parse("product")?;
                let raw = args.raw("delta")?;
                Command::Qty {
                    product_id,
                    delta: parse_value("delta", raw.trim_start_matches('+'))?,
                }
            }
            "remove" => Command::Remove(args.parse("product")?),
            "discount" => {
                let product_id = args.parse("product")?;
                let (kind, value) = args.discount()?;
                Command::Discount {
                    product_id,
                    kind,
                    value,
                }
            }
            "bill-discount" => {
                let (kind, value) = args.discount()?;
                Command::BillDiscount { kind, value }
            }
            "customer" => Command::Customer(args.optional_id("customer")?),
            "pricelist" => Command::PriceList(args.optional_id("price_list")?),
            "promotion" => Command::Promotion(args.optional_id("promotion")?),
            "pay" => match args.rest.next() {
                Some(raw) => Command::Pay(parse_value("payment method", raw)?),
                None => Command::Pay(PaymentMethod::default()),
            },
            "lines" => Command::Lines(args.parse("order_id")?),
            other => return Err(ParseError::Unknown(other.to_string())),
        })
    }
}

// =============================================================================
// Console
// =============================================================================

fn to_json<T: Serialize>(value: T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::internal(e.to_string()))
}

/// The operator console over one session and one backend.
#[derive(Debug, Clone)]
pub struct Console {
    session: SessionState,
    gateway: GatewayState,
    config: TerminalConfig,
}

impl Console {
    pub fn new(session: SessionState, gateway: GatewayState, config: TerminalConfig) -> Self {
        Console {
            session,
            gateway,
            config,
        }
    }

    /// Logs in with the configured credentials, if there are any.
    pub async fn auto_login(&self) -> Result<Option<UserInfo>, ApiError> {
        match self.gateway.config().credentials() {
            Some(credentials) => {
                session::login(&self.session, &self.gateway, credentials)
                    .await
                    .map(Some)
            }
            None => Ok(None),
        }
    }

    /// Runs one command.
    pub async fn execute(&self, command: Command) -> Result<Value, ApiError> {
        let (s, g) = (&self.session, &self.gateway);

        match command {
            Command::Help => Ok(json!({ "commands": HELP })),
            Command::Quit => Ok(Value::Null),
            Command::Login { username, password } => {
                let credentials = Credentials {
                    database: g.config().backend.database.clone(),
                    username,
                    password,
                };
                to_json(session::login(s, g, credentials).await?)
            }
            Command::Logout => {
                session::logout(s, g).await?;
                Ok(json!({ "loggedOut": true }))
            }
            Command::Configs => to_json(session::list_pos_configs(s, g).await?),
            Command::Pos(config_id) => to_json(session::open_pos(s, g, config_id).await?),
            Command::Reload => to_json(session::reload_catalog(s, g).await?),
            Command::Floor => to_json(tables::get_floor(s)),
            Command::Open(id) => to_json(tables::open_table(s, id)?),
            Command::Close(id) => to_json(tables::close_table(s, id)?),
            Command::Guests { table_id, guests } => {
                to_json(tables::set_guests(s, table_id, guests)?)
            }
            Command::Use(id) => to_json(tables::use_table(s, id)?),
            Command::Select(mode) => to_json(tables::start_selection(s, mode)),
            Command::Toggle(id) => to_json(tables::toggle_selection(s, id)?),
            Command::Confirm => to_json(tables::confirm_selection(s)?),
            Command::Cancel => to_json(tables::cancel_selection(s)),
            Command::Products { category, query } => {
                to_json(order::search_products(s, category, &query)?)
            }
            Command::Add(id) => to_json(order::add_product(s, id)?),
            Command::Qty { product_id, delta } => {
                to_json(order::change_quantity(s, product_id, delta)?)
            }
            Command::Remove(id) => to_json(order::remove_line(s, id)?),
            Command::Discount {
                product_id,
                kind,
                value,
            } => to_json(order::set_line_discount(s, product_id, kind, value)?),
            Command::BillDiscount { kind, value } => {
                to_json(order::set_bill_discount(s, kind, value)?)
            }
            Command::Customer(id) => to_json(order::set_customer(s, id)?),
            Command::PriceList(id) => to_json(order::set_price_list(s, id)?),
            Command::Promotion(id) => to_json(order::set_promotion(s, id)?),
            Command::Order => to_json(order::get_order(s)?),
            Command::Quote => to_json(payment::quote(s, &self.config)?),
            Command::Pay(method) => to_json(payment::pay(s, g, &self.config, method).await?),
            Command::History => to_json(history::order_history(s, g).await?),
            Command::Lines(order_id) => to_json(history::order_detail(s, g, order_id).await?),
        }
    }

    /// Reads commands line by line until `quit` or end of input.
    pub async fn run<R, W>(&self, input: R, mut output: W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();

        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            debug!(line, "console input");

            let result = match line.parse::<Command>() {
                Ok(Command::Quit) => break,
                Ok(command) => self.execute(command).await,
                Err(e) => Err(e.into()),
            };

            let response = match result {
                Ok(value) => value,
                Err(error) => json!({ "error": error }),
            };

            let mut text = serde_json::to_string_pretty(&response)?;
            text.push('\n');
            output.write_all(text.as_bytes()).await?;
            output.flush().await?;
        }

        info!("Console closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<Command, ParseError> {
        line.parse()
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse("FLOOR").unwrap(), Command::Floor);
        assert_eq!(parse("  open 3 ").unwrap(), Command::Open(3));
        assert_eq!(parse("select merge").unwrap(), Command::Select(SelectionMode::Merge));
        assert_eq!(
            parse("guests 4 6").unwrap(),
            Command::Guests {
                table_id: 4,
                guests: 6
            }
        );
        assert_eq!(parse("pay").unwrap(), Command::Pay(PaymentMethod::Cash));
        assert_eq!(parse("pay momo").unwrap(), Command::Pay(PaymentMethod::Momo));
    }

    #[test]
    fn test_parse_products() {
        assert_eq!(
            parse("products @3 cà phê").unwrap(),
            Command::Products {
                category: Some(3),
                query: "cà phê".to_string()
            }
        );
        assert_eq!(
            parse("products").unwrap(),
            Command::Products {
                category: None,
                query: String::new()
            }
        );
        assert!(matches!(
            parse("products @x"),
            Err(ParseError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_parse_discounts() {
        assert_eq!(
            parse("discount 1 10%").unwrap(),
            Command::Discount {
                product_id: 1,
                kind: DiscountKind::Percent,
                value: Decimal::from(10)
            }
        );
        assert_eq!(
            parse("bill-discount 5000").unwrap(),
            Command::BillDiscount {
                kind: DiscountKind::Amount,
                value: Decimal::from(5000)
            }
        );
        assert_eq!(
            parse("qty 2 +3").unwrap(),
            Command::Qty {
                product_id: 2,
                delta: 3
            }
        );
        assert_eq!(
            parse("qty 2 -1").unwrap(),
            Command::Qty {
                product_id: 2,
                delta: -1
            }
        );
    }

    #[test]
    fn test_parse_optional_ids() {
        assert_eq!(parse("customer 2").unwrap(), Command::Customer(Some(2)));
        assert_eq!(parse("customer none").unwrap(), Command::Customer(None));
        assert_eq!(parse("pricelist -").unwrap(), Command::PriceList(None));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse("   "), Err(ParseError::Empty));
        assert_eq!(parse("dance"), Err(ParseError::Unknown("dance".into())));
        assert_eq!(
            parse("open"),
            Err(ParseError::MissingArgument {
                command: "open",
                argument: "table"
            })
        );
        assert!(matches!(parse("open three"), Err(ParseError::InvalidArgument { .. })));
        assert!(matches!(parse("select join"), Err(ParseError::InvalidArgument { .. })));
        assert!(matches!(parse("pay cheque"), Err(ParseError::InvalidArgument { .. })));
    }

    fn console() -> Console {
        Console::new(
            SessionState::new(16).unwrap(),
            GatewayState::mock(),
            TerminalConfig::default(),
        )
    }

    async fn run_script(console: &Console, script: &str) -> Vec<Value> {
        let mut out = Vec::new();
        console.run(script.as_bytes(), &mut out).await.unwrap();
        serde_json::Deserializer::from_slice(&out)
            .into_iter::<Value>()
            .map(|v| v.unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_run_full_service() {
        let console = console();
        let script = "\
# a table of two
login admin admin
pos 1
open 3
use 3
add 1
add 1
discount 1 10%
customer 2
quote
pay card
quit
floor
";
        let responses = run_script(&console, script).await;
        assert_eq!(responses.len(), 10);

        let quote = &responses[8];
        assert_eq!(quote["amountDueDisplay"], "81.000đ");
        assert_eq!(quote["canPay"], true);

        let receipt = &responses[9];
        assert_eq!(receipt["method"], "card");
        assert_eq!(receipt["releasedTables"], json!([3]));
    }

    #[tokio::test]
    async fn test_run_reports_errors_and_continues() {
        let console = console();
        let responses = run_script(&console, "dance\nfloor\nopen 99\n").await;
        assert_eq!(responses.len(), 3);
        assert_eq!(responses[0]["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(responses[1]["summary"]["available"], 16);
        assert_eq!(responses[2]["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_auto_login_without_credentials() {
        let console = console();
        assert_eq!(console.auto_login().await.unwrap(), None);
    }
}
