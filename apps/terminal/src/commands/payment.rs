//! # Payment Commands
//!
//! Quoting and paying the active table's order.
//!
//! ## Payment Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Payment Flow                                         │
//! │                                                                         │
//! │  > quote                                                                │
//! │      OrderTotals + "81.000đ" + can_pay / blocked_reason                 │
//! │                                                                         │
//! │  > pay cash                                                             │
//! │      │                                                                  │
//! │      ▼  (lock)                                                          │
//! │  ┌───────────────────────────────────────────────────────────────────┐  │
//! │  │  resolve primary ──► checkout::complete ──► CompletedOrder        │  │
//! │  └───────────────────────────────────────────────────────────────────┘  │
//! │      │  (unlocked)                                                      │
//! │      ▼                                                                  │
//! │  gateway.submit_order ──fail──► ApiError, table stays occupied          │
//! │      │                                                                  │
//! │      ▼  (lock)                                                          │
//! │  registry.release(primary) ──► whole merge group available              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use std::str::FromStr;

use bistro_core::checkout::{self, check_payable};
use bistro_core::{CompletedOrder, Money, OrderTotals, TableId};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::state::{GatewayState, SessionState, TerminalConfig};

// =============================================================================
// Payment Method
// =============================================================================

/// How the customer paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
    /// Bank transfer
    Transfer,
    /// MoMo e-wallet
    Momo,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::Transfer => "transfer",
            PaymentMethod::Momo => "momo",
        };
        f.write_str(name)
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "card" => Ok(PaymentMethod::Card),
            "transfer" | "bank" => Ok(PaymentMethod::Transfer),
            "momo" => Ok(PaymentMethod::Momo),
            _ => Err(format!("Invalid payment method: {}", s)),
        }
    }
}

// =============================================================================
// Responses
// =============================================================================

/// What the active table owes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentQuote {
    /// Table owning the order
    pub table_id: TableId,
    pub totals: OrderTotals,
    pub amount_due: Money,
    pub amount_due_display: String,
    pub can_pay: bool,
    /// Why payment is blocked, if it is
    pub blocked_reason: Option<String>,
}

/// Result of a successful payment.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceipt {
    pub order: CompletedOrder,
    /// Id the backend assigned to the order
    pub backend_order_id: i64,
    pub method: PaymentMethod,
    pub amount_display: String,
    /// Tables made available by the payment
    pub released_tables: Vec<TableId>,
}

// =============================================================================
// Commands
// =============================================================================

/// Quotes the active table's order.
pub fn quote(session: &SessionState, config: &TerminalConfig) -> Result<PaymentQuote, ApiError> {
    debug!("quote command");

    session.with_session(|s| -> Result<PaymentQuote, ApiError> {
        let table_id = s.registry.resolve(s.active()?)?;
        let order = s.registry.order(table_id)?;
        let totals = OrderTotals::from(order);
        let blocked_reason = check_payable(order).err().map(|e| e.to_string());

        Ok(PaymentQuote {
            table_id,
            amount_due: totals.grand_total,
            amount_due_display: config.format_currency(totals.grand_total),
            can_pay: blocked_reason.is_none(),
            blocked_reason,
            totals,
        })
    })
}

/// Pays the active table's order and releases its tables.
///
/// ## Behavior
/// - Needs an open POS session, a non-empty order and a customer
/// - The order is submitted to the backend without holding the session lock
/// - Tables are released only after the backend accepted the order
pub async fn pay(
    session: &SessionState,
    gateway: &GatewayState,
    config: &TerminalConfig,
    method: PaymentMethod,
) -> Result<PaymentReceipt, ApiError> {
    debug!(%method, "pay command");

    let completed = session.with_session(|s| -> Result<CompletedOrder, ApiError> {
        s.config_id()?;
        let table_id = s.registry.resolve(s.active()?)?;
        Ok(checkout::complete(table_id, s.registry.order(table_id)?, Utc::now())?)
    })?;

    let backend_order_id = match gateway.inner().submit_order(&completed).await {
        Ok(id) => id,
        Err(e) => {
            warn!(
                table_id = completed.table_id,
                reference = %completed.reference,
                retryable = e.is_retryable(),
                "Order submission failed"
            );
            return Err(e.into());
        }
    };

    let released_tables = session.with_session_mut(|s| -> Result<Vec<TableId>, ApiError> {
        let released = s.registry.release(completed.table_id)?;
        s.forget_active_if(&released);
        Ok(released)
    })?;

    info!(
        table_id = completed.table_id,
        backend_order_id,
        %method,
        total = %completed.grand_total,
        released = ?released_tables,
        "Order paid"
    );

    Ok(PaymentReceipt {
        amount_display: config.format_currency(completed.grand_total),
        order: completed,
        backend_order_id,
        method,
        released_tables,
    })
}
