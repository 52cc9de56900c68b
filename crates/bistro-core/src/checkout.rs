//! # Checkout
//!
//! The payment gate and the completed-order payload.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Order ──► can_checkout? ──no──► CustomerRequired / EmptyOrder          │
//! │                 │                                                       │
//! │                yes                                                      │
//! │                 ▼                                                       │
//! │  complete() ──► CompletedOrder ──► payment capture ──► registry.release │
//! │                                      (boundary)                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Building the payload never mutates the order; the caller releases the
//! table only after the boundary reports success.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::order::Order;
use crate::pricing;
use crate::types::{Discount, ProductId, TableId};

/// One line of a completed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CompletedLine {
    pub product_id: ProductId,
    pub quantity: u32,
    pub line_discount: Discount,
}

/// Payload handed to the payment/persistence boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CompletedOrder {
    /// Client-side reference (UUID v4).
    pub reference: String,
    pub table_id: TableId,
    pub lines: Vec<CompletedLine>,
    pub bill_discount: Discount,
    pub customer_id: Option<i64>,
    pub price_list_id: Option<i64>,
    pub promotion_id: Option<i64>,
    pub grand_total: Money,
    #[ts(as = "String")]
    pub completed_at: DateTime<Utc>,
}

/// Checks whether an order may be paid.
///
/// ## Rules
/// - The order has at least one line
/// - A customer is selected
pub fn check_payable(order: &Order) -> CoreResult<()> {
    if order.is_empty() {
        return Err(CoreError::EmptyOrder);
    }
    if order.customer().is_none() {
        return Err(CoreError::CustomerRequired);
    }
    Ok(())
}

/// Boolean form of [`check_payable`], for enabling the pay action.
pub fn can_checkout(order: &Order) -> bool {
    check_payable(order).is_ok()
}

/// Builds the completed-order payload for `table_id`.
pub fn complete(table_id: TableId, order: &Order, now: DateTime<Utc>) -> CoreResult<CompletedOrder> {
    check_payable(order)?;

    Ok(CompletedOrder {
        reference: Uuid::new_v4().to_string(),
        table_id,
        lines: order
            .lines()
            .iter()
            .map(|line| CompletedLine {
                product_id: line.product.id,
                quantity: line.quantity,
                line_discount: line.discount,
            })
            .collect(),
        bill_discount: order.bill_discount(),
        customer_id: order.customer().map(|r| r.id),
        price_list_id: order.price_list().map(|r| r.id),
        promotion_id: order.promotion().map(|r| r.id),
        grand_total: pricing::grand_total(order),
        completed_at: now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::tests::product;
    use crate::types::{DiscountKind, Ref};
    use rust_decimal::Decimal;

    #[test]
    fn test_customer_gate() {
        let mut order = Order::new();
        order.add_product(&product(1, 45_000));
        let before_total = pricing::grand_total(&order);

        assert!(!can_checkout(&order));
        assert_eq!(check_payable(&order), Err(CoreError::CustomerRequired));

        order.set_customer(Some(Ref::new(2, "Nguyễn Văn A")));
        assert!(can_checkout(&order));
        assert_eq!(pricing::grand_total(&order), before_total);
        assert_eq!(order.item_count(), 1);
    }

    #[test]
    fn test_empty_order_not_payable() {
        let mut order = Order::new();
        order.set_customer(Some(Ref::new(1, "Khách lẻ")));
        assert_eq!(check_payable(&order), Err(CoreError::EmptyOrder));
    }

    #[test]
    fn test_complete_payload() {
        let now = Utc::now();
        let mut order = Order::new();
        order.add_product(&product(1, 45_000));
        order.add_product(&product(1, 45_000));
        order
            .set_line_discount(1, DiscountKind::Percent, Decimal::from(10))
            .unwrap();
        order.set_customer(Some(Ref::new(2, "Nguyễn Văn A")));
        order.set_promotion(Some(Ref::new(3, "Mua 2 tặng 1")));

        let completed = complete(7, &order, now).unwrap();

        assert_eq!(completed.table_id, 7);
        assert_eq!(completed.lines.len(), 1);
        assert_eq!(completed.lines[0].quantity, 2);
        assert_eq!(completed.customer_id, Some(2));
        assert_eq!(completed.price_list_id, None);
        assert_eq!(completed.promotion_id, Some(3));
        assert_eq!(completed.grand_total, Money::from_units(81_000));
        assert_eq!(completed.completed_at, now);
        assert!(Uuid::parse_str(&completed.reference).is_ok());
    }

    #[test]
    fn test_complete_blocked_without_customer() {
        let mut order = Order::new();
        order.add_product(&product(1, 45_000));
        assert!(complete(1, &order, Utc::now()).is_err());
    }
}
