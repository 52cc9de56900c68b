//! # Domain Types
//!
//! Value types shared by the table registry, orders and pricing.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐        │
//! │  │   ProductRef    │   │      Ref        │   │    Discount     │        │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │        │
//! │  │  id             │   │  id             │   │  kind           │        │
//! │  │  name           │   │  name           │   │  value (≥ 0)    │        │
//! │  │  price (Money)  │   │                 │   │                 │        │
//! │  │  category: Ref? │   │  customer,      │   │  line or bill   │        │
//! │  └─────────────────┘   │  price list,    │   └─────────────────┘        │
//! │                        │  promotion      │                              │
//! │                        └─────────────────┘   ┌─────────────────┐       │
//! │                                              │  DiscountKind   │       │
//! │                                              │  Percent        │       │
//! │                                              │  Amount         │       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Backend Identity
//! Catalog records are owned by the ERP backend, so references carry the
//! backend's integer id plus a display name. The gateway normalizes every
//! loosely-typed reference into a [`Ref`] before it reaches this crate.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::money::Money;
use crate::validation::clamp_discount_value;

/// Table identity, `1..=N` for an N-table floor.
pub type TableId = u32;

/// Backend product id.
pub type ProductId = i64;

// =============================================================================
// References
// =============================================================================

/// An opaque backend reference: id plus display name.
///
/// Used for customers, price lists, promotions and product categories.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Ref {
    pub id: i64,
    pub name: String,
}

impl Ref {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Ref {
            id,
            name: name.into(),
        }
    }
}

/// A catalog product as seen by an order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductRef {
    pub id: ProductId,
    pub name: String,
    /// Unit price.
    pub price: Money,
    pub category: Option<Ref>,
}

// =============================================================================
// Discount
// =============================================================================

/// How a discount value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    /// Percent of the base, capped at 100 when applied.
    #[default]
    Percent,
    /// Fixed amount off, capped at the base when applied.
    Amount,
}

impl fmt::Display for DiscountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscountKind::Percent => write!(f, "percent"),
            DiscountKind::Amount => write!(f, "amount"),
        }
    }
}

impl FromStr for DiscountKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "percent" | "percentage" | "%" => Ok(DiscountKind::Percent),
            "amount" | "fixed" | "fixed_amount" => Ok(DiscountKind::Amount),
            _ => Err(format!("Invalid discount kind: {}", s)),
        }
    }
}

/// A percent-of or fixed-amount-off discount.
///
/// ## Storage vs Application
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  STORED (Discount::new)          APPLIED (Discount::amount_off)         │
/// │  ─────────────────────────       ──────────────────────────────         │
/// │  value < 0   → 0                 value ≤ 0    → nothing off             │
/// │  value ≥ 0   → kept as-is        percent      → base × min(v,100)/100   │
/// │  (150% stays 150%)               amount       → min(v, base)            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Discount {
    pub kind: DiscountKind,
    #[ts(type = "string")]
    value: Decimal,
}

impl Discount {
    /// Creates a discount; negative values are clamped to zero.
    pub fn new(kind: DiscountKind, value: Decimal) -> Self {
        Discount {
            kind,
            value: clamp_discount_value(value),
        }
    }

    /// Percent-of discount.
    pub fn percent(value: impl Into<Decimal>) -> Self {
        Self::new(DiscountKind::Percent, value.into())
    }

    /// Fixed-amount-off discount.
    pub fn amount(value: impl Into<Decimal>) -> Self {
        Self::new(DiscountKind::Amount, value.into())
    }

    /// The zero discount.
    pub fn none() -> Self {
        Discount::default()
    }

    /// The stored (non-negative, uncapped) value.
    pub fn value(&self) -> Decimal {
        self.value
    }

    /// Whether this discount reduces anything.
    pub fn is_active(&self) -> bool {
        self.value > Decimal::ZERO
    }

    /// Amount taken off `base`, never more than `base` itself.
    ///
    /// ## Example
    /// ```rust
    /// use bistro_core::money::Money;
    /// use bistro_core::types::Discount;
    ///
    /// let base = Money::from_units(90_000);
    /// assert_eq!(Discount::percent(10).amount_off(base), Money::from_units(9_000));
    /// assert_eq!(Discount::amount(150_000).amount_off(base), base);
    /// ```
    pub fn amount_off(&self, base: Money) -> Money {
        if !self.is_active() || !base.is_positive() {
            return Money::zero();
        }
        match self.kind {
            DiscountKind::Percent => base.percent_of(self.value),
            DiscountKind::Amount => Money::from_decimal(self.value).min(base),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
