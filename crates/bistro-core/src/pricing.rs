//! # Pricing
//!
//! Deterministic total computation from an [`Order`].
//!
//! ## Calculation Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  for each line:                                                         │
//! │    base        = unit price × quantity                                  │
//! │    line total  = base - line discount (capped at base)                  │
//! │                                                                         │
//! │  subtotal      = Σ line totals                                          │
//! │  bill discount = percent: subtotal × min(v,100)/100                     │
//! │                  amount:  min(v, subtotal)                              │
//! │  grand total   = max(0, subtotal - bill discount)                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All results are exact. Rounding to whole currency units is left to
//! whoever renders the amount.
//!
//! ## Example
//! ```rust
//! use bistro_core::money::Money;
//! use bistro_core::order::Order;
//! use bistro_core::pricing;
//! use bistro_core::types::{DiscountKind, ProductRef};
//! use rust_decimal::Decimal;
//!
//! let pho = ProductRef {
//!     id: 1,
//!     name: "Phở bò".to_string(),
//!     price: Money::from_units(45_000),
//!     category: None,
//! };
//!
//! let mut order = Order::new();
//! order.add_product(&pho);
//! order.add_product(&pho);
//! order.set_line_discount(1, DiscountKind::Percent, Decimal::from(10)).unwrap();
//!
//! let line = &order.lines()[0];
//! assert_eq!(pricing::line_total(line), Money::from_units(81_000));
//! assert_eq!(pricing::line_discount_amount(line), Money::from_units(9_000));
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::order::{Order, OrderLine};

// =============================================================================
// Line Level
// =============================================================================

/// Unit price × quantity, before any discount.
pub fn line_base(line: &OrderLine) -> Money {
    line.product.price.multiply_quantity(line.quantity)
}

/// Line total after the line discount, never below zero.
pub fn line_total(line: &OrderLine) -> Money {
    let base = line_base(line);
    (base - line.discount.amount_off(base)).non_negative()
}

/// How much the line discount took off.
pub fn line_discount_amount(line: &OrderLine) -> Money {
    line_base(line) - line_total(line)
}

// =============================================================================
// Order Level
// =============================================================================

/// Sum of undiscounted line bases.
pub fn raw_total(order: &Order) -> Money {
    order.lines().iter().map(line_base).sum()
}

/// Sum of line totals (after line discounts, before the bill discount).
pub fn subtotal(order: &Order) -> Money {
    order.lines().iter().map(line_total).sum()
}

/// Bill discount applied to the subtotal, never more than the subtotal.
pub fn bill_discount_amount(order: &Order) -> Money {
    order.bill_discount().amount_off(subtotal(order))
}

/// What the customer pays.
pub fn grand_total(order: &Order) -> Money {
    (subtotal(order) - bill_discount_amount(order)).non_negative()
}

// =============================================================================
// Totals Summary
// =============================================================================

/// Order totals summary for API responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotals {
    pub item_count: usize,
    #[ts(type = "number")]
    pub total_quantity: u64,
    /// Before any discount.
    pub raw_total: Money,
    /// Sum of line discount amounts.
    pub line_discounts: Money,
    pub subtotal: Money,
    /// Bill discount amount.
    pub bill_discount: Money,
    pub grand_total: Money,
}

impl From<&Order> for OrderTotals {
    fn from(order: &Order) -> Self {
        let line_discounts = order.lines().iter().map(line_discount_amount).sum();
        let subtotal = subtotal(order);
        let bill_discount = order.bill_discount().amount_off(subtotal);

        OrderTotals {
            item_count: order.item_count(),
            total_quantity: order.total_quantity(),
            raw_total: raw_total(order),
            line_discounts,
            subtotal,
            bill_discount,
            grand_total: (subtotal - bill_discount).non_negative(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::tests::product;
    use crate::types::DiscountKind;
    use rust_decimal::Decimal;

    fn order_with(lines: &[(i64, i64, u32)]) -> Order {
        let mut order = Order::new();
        for &(id, price, qty) in lines {
            let p = product(id, price);
            for _ in 0..qty {
                order.add_product(&p);
            }
        }
        order
    }

    #[test]
    fn test_line_percent_discount_scenario() {
        let mut order = order_with(&[(1, 45_000, 2)]);
        order
            .set_line_discount(1, DiscountKind::Percent, Decimal::from(10))
            .unwrap();

        let line = &order.lines()[0];
        assert_eq!(line_total(line), Money::from_units(81_000));
        assert_eq!(line_discount_amount(line), Money::from_units(9_000));
    }

    #[test]
    fn test_line_amount_discount_floors_at_zero() {
        let mut order = order_with(&[(1, 5_000, 1)]);
        order
            .set_line_discount(1, DiscountKind::Amount, Decimal::from(8_000))
            .unwrap();

        let line = &order.lines()[0];
        assert_eq!(line_total(line), Money::zero());
        assert_eq!(line_discount_amount(line), Money::from_units(5_000));
    }

    #[test]
    fn test_line_percent_above_hundred_is_capped() {
        let mut order = order_with(&[(1, 30_000, 1)]);
        order
            .set_line_discount(1, DiscountKind::Percent, Decimal::from(250))
            .unwrap();

        assert_eq!(line_total(&order.lines()[0]), Money::zero());
    }

    #[test]
    fn test_bill_amount_discount_exceeding_subtotal() {
        let mut order = order_with(&[(1, 50_000, 2)]);
        assert_eq!(subtotal(&order), Money::from_units(100_000));

        order.set_bill_discount(DiscountKind::Amount, Decimal::from(150_000));
        assert_eq!(bill_discount_amount(&order), Money::from_units(100_000));
        assert_eq!(grand_total(&order), Money::zero());
    }

    #[test]
    fn test_bill_percent_discount() {
        let mut order = order_with(&[(1, 45_000, 1), (2, 5_000, 1)]);
        order.set_bill_discount(DiscountKind::Percent, Decimal::from(10));

        assert_eq!(bill_discount_amount(&order), Money::from_units(5_000));
        assert_eq!(grand_total(&order), Money::from_units(45_000));
    }

    #[test]
    fn test_exact_fractional_result() {
        let mut order = order_with(&[(1, 45_001, 1)]);
        order
            .set_line_discount(1, DiscountKind::Percent, Decimal::from(10))
            .unwrap();

        // 45001 × 0.9 = 40500.9, left unrounded
        assert_eq!(
            line_total(&order.lines()[0]).amount(),
            Decimal::new(405009, 1)
        );
    }

    #[test]
    fn test_empty_order_totals() {
        let order = Order::new();
        let totals = OrderTotals::from(&order);
        assert_eq!(totals.item_count, 0);
        assert_eq!(totals.grand_total, Money::zero());
    }

    #[test]
    fn test_totals_summary() {
        let mut order = order_with(&[(1, 45_000, 2), (7, 5_000, 3)]);
        order
            .set_line_discount(1, DiscountKind::Percent, Decimal::from(10))
            .unwrap();
        order.set_bill_discount(DiscountKind::Amount, Decimal::from(6_000));

        let totals = OrderTotals::from(&order);
        assert_eq!(totals.item_count, 2);
        assert_eq!(totals.total_quantity, 5);
        assert_eq!(totals.raw_total, Money::from_units(105_000));
        assert_eq!(totals.line_discounts, Money::from_units(9_000));
        assert_eq!(totals.subtotal, Money::from_units(96_000));
        assert_eq!(totals.bill_discount, Money::from_units(6_000));
        assert_eq!(totals.grand_total, Money::from_units(90_000));
        assert_eq!(totals.grand_total, grand_total(&order));
    }

    #[test]
    fn test_grand_total_bounded_by_subtotal() {
        let values = [-10, 0, 5, 10, 50, 99, 100, 101, 1_000, 45_000, 1_000_000];
        let kinds = [DiscountKind::Percent, DiscountKind::Amount];

        for &line_kind in &kinds {
            for &line_value in &values {
                for &bill_kind in &kinds {
                    for &bill_value in &values {
                        let mut order = order_with(&[(1, 45_000, 2), (2, 12_345, 1)]);
                        order
                            .set_line_discount(1, line_kind, Decimal::from(line_value))
                            .unwrap();
                        order.set_bill_discount(bill_kind, Decimal::from(bill_value));

                        let sub = subtotal(&order);
                        let total = grand_total(&order);
                        assert!(!total.is_negative(), "negative total for {:?}", order);
                        assert!(total <= sub, "total above subtotal for {:?}", order);
                        assert!(sub <= raw_total(&order));
                    }
                }
            }
        }
    }
}
