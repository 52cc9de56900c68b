//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    45000 × 2 × (1 - 0.1) = 81000.00000000001  ❌ WRONG!                  │
//! │                                                                         │
//! │  In integer-only systems:                                               │
//! │    10% of 45001 = 4500 (the .1 is silently dropped)                     │
//! │                                                                         │
//! │  OUR SOLUTION: Exact Decimal in Whole Currency Units                    │
//! │    10% of 45001 = 4500.1 exactly                                        │
//! │    Rounding to display precision happens ONLY when rendering            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use bistro_core::money::Money;
//!
//! let price = Money::from_units(45_000); // 45.000đ
//!
//! let doubled = price.multiply_quantity(2);          // 90.000đ
//! let total = doubled + Money::from_units(5_000);    // 95.000đ
//! assert_eq!(total, Money::from_units(95_000));
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in whole currency units (đồng).
///
/// ## Design Decisions
/// - **Decimal (exact)**: percent discounts produce fractional units which
///   must survive until the final total; nothing is rounded inside the engine
/// - **Single field tuple struct**: zero-cost wrapper over `Decimal`
/// - **Serialized as a string**: `"81000"` keeps full precision over JSON
///
/// ## Where Money Flows
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                                                                         │
/// │  ProductRef.price ──► line base ──► line total ──► subtotal             │
/// │                                                        │                │
/// │                                 bill discount ◄────────┤                │
/// │                                                        ▼                │
/// │                                                   grand total ──► pay   │
/// │                                                                         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(#[ts(type = "string")] Decimal);

impl Money {
    /// Creates a Money value from whole currency units.
    ///
    /// ## Example
    /// ```rust
    /// use bistro_core::money::Money;
    ///
    /// let price = Money::from_units(45_000);
    /// assert_eq!(price.round_units(), 45_000);
    /// ```
    #[inline]
    pub fn from_units(units: i64) -> Self {
        Money(Decimal::from(units))
    }

    /// Creates a Money value from an exact decimal amount.
    #[inline]
    pub const fn from_decimal(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Returns the exact decimal amount.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Multiplies a unit price by a line quantity.
    ///
    /// ## Example
    /// ```rust
    /// use bistro_core::money::Money;
    ///
    /// let unit_price = Money::from_units(20_000);
    /// assert_eq!(unit_price.multiply_quantity(3), Money::from_units(60_000));
    /// ```
    #[inline]
    pub fn multiply_quantity(&self, qty: u32) -> Self {
        Money(self.0 * Decimal::from(qty))
    }

    /// Returns `pct` percent of this amount, with `pct` capped to [0, 100].
    ///
    /// ## Example
    /// ```rust
    /// use bistro_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let base = Money::from_units(90_000);
    /// assert_eq!(base.percent_of(Decimal::from(10)), Money::from_units(9_000));
    /// assert_eq!(base.percent_of(Decimal::from(250)), base); // capped at 100%
    /// ```
    pub fn percent_of(&self, pct: Decimal) -> Money {
        let pct = pct.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
        Money(self.0 * pct / Decimal::ONE_HUNDRED)
    }

    /// Clamps negative values to zero.
    #[inline]
    pub fn non_negative(self) -> Self {
        if self.is_negative() {
            Money::zero()
        } else {
            self
        }
    }

    /// Rounds to whole currency units for display (half away from zero).
    ///
    /// The pricing engine never calls this: totals stay exact until they are
    /// rendered.
    ///
    /// ## Example
    /// ```rust
    /// use bistro_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let exact = Money::from_decimal(Decimal::new(40_5005, 1)); // 40500.5
    /// assert_eq!(exact.round_units(), 40_501);
    /// ```
    pub fn round_units(&self) -> i64 {
        let rounded = self
            .0
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        rounded.to_i64().unwrap_or(if rounded.is_sign_negative() {
            i64::MIN
        } else {
            i64::MAX
        })
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows the exact amount, for debugging and logs.
///
/// Use the terminal's currency formatter for operator-facing output.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money(amount)
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by a quantity.
impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
