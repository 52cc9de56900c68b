//! # Order
//!
//! The in-progress order embedded in each occupied table.
//!
//! ## Order Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Order Operations                                     │
//! │                                                                         │
//! │  Operator Action          Order Method             State Change         │
//! │  ───────────────          ────────────             ────────────         │
//! │                                                                         │
//! │  Tap Product ────────────► add_product() ────────► qty += 1 or push     │
//! │                                                                         │
//! │  +/- Quantity ───────────► set_quantity() ───────► qty += delta,        │
//! │                                                    line dropped at 0    │
//! │                                                                         │
//! │  Remove Line ────────────► remove_line() ────────► lines.remove(i)      │
//! │                                                                         │
//! │  Line Discount ──────────► set_line_discount() ──► line.discount = d    │
//! │                                                                         │
//! │  Bill Discount ──────────► set_bill_discount() ──► bill_discount = d    │
//! │                                                                         │
//! │  Customer / Price List / Promotion ──► set_*() ──► reference replaced   │
//! │                                                                         │
//! │  NOTE: Totals are never stored on the order. They are always derived    │
//! │        by the pricing module, so every mutation is visible at once.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::types::{Discount, DiscountKind, ProductId, ProductRef, Ref};

/// One product line on an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    /// Product snapshot taken when the line was created.
    pub product: ProductRef,

    /// Always > 0 while the line exists.
    pub quantity: u32,

    /// Line-level discount, zero by default.
    pub discount: Discount,
}

impl OrderLine {
    fn new(product: &ProductRef) -> Self {
        OrderLine {
            product: product.clone(),
            quantity: 1,
            discount: Discount::none(),
        }
    }
}

/// An in-progress order.
///
/// ## Invariants
/// - Lines are unique by product id (adding the same product increments)
/// - Every line has quantity > 0 (a line reaching zero is removed)
/// - Discount values are ≥ 0 (clamped on storage)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    lines: Vec<OrderLine>,
    bill_discount: Discount,
    customer: Option<Ref>,
    price_list: Option<Ref>,
    promotion: Option<Ref>,
}

impl Order {
    /// Creates an empty order.
    pub fn new() -> Self {
        Order::default()
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn line(&self, product_id: ProductId) -> Option<&OrderLine> {
        self.lines.iter().find(|l| l.product.id == product_id)
    }

    pub fn bill_discount(&self) -> Discount {
        self.bill_discount
    }

    pub fn customer(&self) -> Option<&Ref> {
        self.customer.as_ref()
    }

    pub fn price_list(&self) -> Option<&Ref> {
        self.price_list.as_ref()
    }

    pub fn promotion(&self) -> Option<&Ref> {
        self.promotion.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines.
    pub fn item_count(&self) -> usize {
        self.lines.len()
    }

    /// Sum of quantities over all lines.
    pub fn total_quantity(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    /// Adds one unit of `product`.
    ///
    /// ## Behavior
    /// - If a line for the product exists: quantity + 1
    /// - Otherwise: appends a new line with quantity 1 and no discount
    pub fn add_product(&mut self, product: &ProductRef) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.product.id == product.id) {
            line.quantity = line.quantity.saturating_add(1);
            return;
        }

        self.lines.push(OrderLine::new(product));
    }

    /// Changes a line's quantity by `delta`.
    ///
    /// The result is clamped at zero, and a line reaching zero is removed.
    /// Returns the new quantity (0 if the line was removed).
    pub fn set_quantity(&mut self, product_id: ProductId, delta: i64) -> CoreResult<u32> {
        let index = self
            .lines
            .iter()
            .position(|l| l.product.id == product_id)
            .ok_or(CoreError::LineNotFound(product_id))?;

        let current = i64::from(self.lines[index].quantity);
        let next = current.saturating_add(delta).clamp(0, i64::from(u32::MAX));
        // clamped into u32 range above
        let next = next as u32;

        if next == 0 {
            self.lines.remove(index);
        } else {
            self.lines[index].quantity = next;
        }
        Ok(next)
    }

    /// Removes a line regardless of its quantity.
    ///
    /// Returns `true` if a line was removed.
    pub fn remove_line(&mut self, product_id: ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.product.id != product_id);
        self.lines.len() != before
    }

    /// Sets a line's discount. Negative values are stored as zero.
    pub fn set_line_discount(
        &mut self,
        product_id: ProductId,
        kind: DiscountKind,
        value: Decimal,
    ) -> CoreResult<()> {
        let line = self
            .lines
            .iter_mut()
            .find(|l| l.product.id == product_id)
            .ok_or(CoreError::LineNotFound(product_id))?;

        line.discount = Discount::new(kind, value);
        Ok(())
    }

    /// Sets the whole-bill discount. Negative values are stored as zero.
    pub fn set_bill_discount(&mut self, kind: DiscountKind, value: Decimal) {
        self.bill_discount = Discount::new(kind, value);
    }

    /// `None` means walk-in.
    pub fn set_customer(&mut self, customer: Option<Ref>) {
        self.customer = customer;
    }

    /// `None` means the default price list.
    pub fn set_price_list(&mut self, price_list: Option<Ref>) {
        self.price_list = price_list;
    }

    /// `None` means no promotion.
    pub fn set_promotion(&mut self, promotion: Option<Ref>) {
        self.promotion = promotion;
    }

    /// Resets to an empty order.
    pub fn clear(&mut self) {
        *self = Order::default();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::money::Money;

    pub(crate) fn product(id: ProductId, price: i64) -> ProductRef {
        ProductRef {
            id,
            name: format!("Product {}", id),
            price: Money::from_units(price),
            category: None,
        }
    }

    #[test]
    fn test_add_same_product_twice_increments() {
        let mut order = Order::new();
        let pho = product(1, 45_000);

        order.add_product(&pho);
        order.add_product(&pho);

        assert_eq!(order.item_count(), 1);
        assert_eq!(order.lines()[0].quantity, 2);
    }

    #[test]
    fn test_add_different_products_appends_in_order() {
        let mut order = Order::new();
        order.add_product(&product(2, 40_000));
        order.add_product(&product(1, 45_000));

        let ids: Vec<_> = order.lines().iter().map(|l| l.product.id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(order.total_quantity(), 2);
    }

    #[test]
    fn test_set_quantity_to_zero_removes_line() {
        let mut order = Order::new();
        let pho = product(1, 45_000);
        order.add_product(&pho);
        order.add_product(&pho);

        assert_eq!(order.set_quantity(1, -2).unwrap(), 0);
        assert!(order.is_empty());
    }

    #[test]
    fn test_set_quantity_clamps_below_zero() {
        let mut order = Order::new();
        order.add_product(&product(1, 45_000));

        assert_eq!(order.set_quantity(1, -10).unwrap(), 0);
        assert!(order.line(1).is_none());
    }

    #[test]
    fn test_set_quantity_increments() {
        let mut order = Order::new();
        order.add_product(&product(1, 45_000));

        assert_eq!(order.set_quantity(1, 4).unwrap(), 5);
        assert_eq!(order.line(1).unwrap().quantity, 5);
    }

    #[test]
    fn test_set_quantity_unknown_line() {
        let mut order = Order::new();
        assert_eq!(order.set_quantity(9, 1), Err(CoreError::LineNotFound(9)));
    }

    #[test]
    fn test_remove_line() {
        let mut order = Order::new();
        let pho = product(1, 45_000);
        order.add_product(&pho);
        order.add_product(&pho);
        order.add_product(&product(2, 5_000));

        assert!(order.remove_line(1));
        assert!(!order.remove_line(1));
        assert_eq!(order.item_count(), 1);
    }

    #[test]
    fn test_line_discount_negative_clamped() {
        let mut order = Order::new();
        order.add_product(&product(1, 45_000));

        order
            .set_line_discount(1, DiscountKind::Amount, Decimal::from(-3_000))
            .unwrap();
        assert_eq!(order.line(1).unwrap().discount.value(), Decimal::ZERO);
    }

    #[test]
    fn test_line_discount_unknown_line() {
        let mut order = Order::new();
        assert!(order
            .set_line_discount(3, DiscountKind::Percent, Decimal::from(10))
            .is_err());
    }

    #[test]
    fn test_bill_discount_stored_uncapped() {
        let mut order = Order::new();
        order.set_bill_discount(DiscountKind::Percent, Decimal::from(120));
        assert_eq!(order.bill_discount().value(), Decimal::from(120));
    }

    #[test]
    fn test_references_replace_and_reset() {
        let mut order = Order::new();
        order.set_customer(Some(Ref::new(2, "Nguyễn Văn A")));
        order.set_price_list(Some(Ref::new(2, "VIP")));
        order.set_promotion(Some(Ref::new(1, "Happy Hour")));
        assert_eq!(order.customer().map(|c| c.id), Some(2));

        order.set_customer(None);
        assert!(order.customer().is_none());
        assert!(order.price_list().is_some());

        order.clear();
        assert_eq!(order, Order::new());
    }
}
