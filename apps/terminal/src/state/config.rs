//! # Terminal Configuration
//!
//! Floor size and display settings for one terminal.
//!
//! Backend connection settings live in `bistro_gateway::GatewayConfig`;
//! this struct only covers what the operator sees.

use bistro_core::validation::validate_table_count;
use bistro_core::{Money, DEFAULT_TABLE_COUNT};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Terminal configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerminalConfig {
    /// Number of tables on the floor (ids 1..=table_count)
    pub table_count: u32,

    /// Currency symbol (printed after the amount)
    pub currency_symbol: String,

    /// Number of decimal places shown for money
    pub currency_decimals: u8,

    /// Thousands grouping character
    pub thousands_separator: char,

    /// Use the in-memory backend instead of a remote one
    pub use_mock_gateway: bool,
}

impl Default for TerminalConfig {
    /// Returns the reference deployment: 16 tables, VND display.
    fn default() -> Self {
        TerminalConfig {
            table_count: DEFAULT_TABLE_COUNT,
            currency_symbol: "đ".to_string(),
            currency_decimals: 0,
            thousands_separator: '.',
            use_mock_gateway: true,
        }
    }
}

impl TerminalConfig {
    /// Creates a TerminalConfig from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `BISTRO_TABLE_COUNT`: Number of tables (1..=200)
    /// - `BISTRO_CURRENCY_SYMBOL`: Override currency symbol
    /// - `BISTRO_MOCK_GATEWAY`: `0`/`false` to require a remote backend
    pub fn from_env() -> Self {
        let mut config = TerminalConfig::default();

        if let Ok(count) = std::env::var("BISTRO_TABLE_COUNT") {
            match count.parse::<u32>() {
                Ok(n) if validate_table_count(n).is_ok() => config.table_count = n,
                _ => warn!(count = %count, "Ignoring invalid BISTRO_TABLE_COUNT"),
            }
        }

        if let Ok(symbol) = std::env::var("BISTRO_CURRENCY_SYMBOL") {
            config.currency_symbol = symbol;
        }

        if let Ok(flag) = std::env::var("BISTRO_MOCK_GATEWAY") {
            config.use_mock_gateway = !matches!(flag.to_lowercase().as_str(), "0" | "false" | "no");
        }

        config
    }

    fn decimal_separator(&self) -> char {
        if self.thousands_separator == '.' {
            ','
        } else {
            '.'
        }
    }

    /// Formats an amount for display, rounding half away from zero.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = TerminalConfig::default();
    /// assert_eq!(config.format_currency(Money::from_units(81_000)), "81.000đ");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        let decimals = u32::from(self.currency_decimals);
        let rounded = amount
            .amount()
            .round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
        let negative = rounded.is_sign_negative() && !rounded.is_zero();
        let abs = rounded.abs();
        let whole = abs.trunc();

        let fraction = if decimals > 0 {
            let digits = ((abs - whole) * Decimal::from(10_i64.pow(decimals))).trunc();
            format!(
                "{}{:0>width$}",
                self.decimal_separator(),
                digits.normalize().to_string(),
                width = decimals as usize
            )
        } else {
            String::new()
        };

        format!(
            "{}{}{}{}",
            if negative { "-" } else { "" },
            group_thousands(&whole.normalize().to_string(), self.thousands_separator),
            fraction,
            self.currency_symbol
        )
    }
}

fn group_thousands(digits: &str, separator: char) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency_vnd() {
        let config = TerminalConfig::default();
        assert_eq!(config.format_currency(Money::from_units(81_000)), "81.000đ");
        assert_eq!(config.format_currency(Money::from_units(5_000)), "5.000đ");
        assert_eq!(config.format_currency(Money::from_units(999)), "999đ");
        assert_eq!(config.format_currency(Money::zero()), "0đ");
        assert_eq!(config.format_currency(Money::from_units(1_234_567)), "1.234.567đ");
    }

    #[test]
    fn test_format_currency_rounds_for_display() {
        let config = TerminalConfig::default();
        // 10% of 45,001
        let amount = Money::from_decimal(Decimal::new(40_5009, 1));
        assert_eq!(config.format_currency(amount), "40.501đ");
        assert_eq!(config.format_currency(Money::from_decimal(Decimal::new(5, 1))), "1đ");
    }

    #[test]
    fn test_format_currency_with_decimals() {
        let config = TerminalConfig {
            currency_symbol: "$".to_string(),
            currency_decimals: 2,
            thousands_separator: ',',
            ..TerminalConfig::default()
        };
        assert_eq!(config.format_currency(Money::from_decimal(Decimal::new(123_405, 2))), "1,234.05$");
        assert_eq!(config.format_currency(Money::from_units(-12)), "-12.00$");
    }

    #[test]
    fn test_defaults() {
        let config = TerminalConfig::default();
        assert_eq!(config.table_count, 16);
        assert!(config.use_mock_gateway);
    }
}
