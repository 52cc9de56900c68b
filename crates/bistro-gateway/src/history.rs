//! # Order History
//!
//! Past orders of a POS config, for display only. Nothing here ever feeds
//! back into table or order state.

use bistro_core::{Money, Ref};
use chrono::{DateTime, Days, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Backend order state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryState {
    Draft,
    Paid,
    Done,
    Invoiced,
    Cancelled,
}

impl HistoryState {
    /// Paid, posted or invoiced.
    pub fn is_settled(&self) -> bool {
        matches!(
            self,
            HistoryState::Paid | HistoryState::Done | HistoryState::Invoiced
        )
    }
}

impl std::str::FromStr for HistoryState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(HistoryState::Draft),
            "paid" => Ok(HistoryState::Paid),
            "done" => Ok(HistoryState::Done),
            "invoiced" => Ok(HistoryState::Invoiced),
            "cancel" | "cancelled" => Ok(HistoryState::Cancelled),
            other => Err(format!("Unknown order state: {}", other)),
        }
    }
}

/// One past order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryOrder {
    pub id: i64,
    /// Backend order name, e.g. `POS/001`.
    pub name: String,
    /// Receipt reference printed for the customer.
    pub reference: Option<String>,
    /// Backend time (UTC, no zone).
    pub date_order: NaiveDateTime,
    pub customer: Option<Ref>,
    pub amount_total: Money,
    pub state: HistoryState,
    pub line_ids: Vec<i64>,
}

/// One line of a past order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryLine {
    pub id: i64,
    pub product: Option<Ref>,
    pub qty: Decimal,
    pub price_unit: Money,
    pub discount_percent: Decimal,
    /// Line subtotal including taxes.
    pub subtotal_incl: Money,
}

/// Lower bound for a history query: midnight (UTC) `days` days before `now`.
pub fn history_since(now: DateTime<Utc>, days: u32) -> NaiveDateTime {
    now.date_naive()
        .checked_sub_days(Days::new(u64::from(days)))
        .unwrap_or(chrono::NaiveDate::MIN)
        .and_time(NaiveTime::default())
}
