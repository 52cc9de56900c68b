//! # Validation Module
//!
//! Input validation utilities for Bistro POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Console parser (terminal)                                     │
//! │  ├── Token count, number parsing                                        │
//! │  └── Immediate operator feedback                                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Command handler (terminal)                                   │
//! │  └── THIS MODULE: Business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: TableRegistry / Order                                        │
//! │  ├── State-machine preconditions                                       │
//! │  └── Validate-then-mutate (never partial)                              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use bistro_core::validation::{validate_guest_count, validate_table_count};
//!
//! validate_table_count(16).unwrap();
//! assert!(validate_guest_count(0).is_err());
//! ```

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_GUEST_COUNT, MAX_TABLE_COUNT};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Floor Validators
// =============================================================================

/// Validates the number of tables on the floor.
///
/// ## Rules
/// - At least 1 table
/// - At most MAX_TABLE_COUNT (200)
pub fn validate_table_count(count: u32) -> ValidationResult<()> {
    if count == 0 || count > MAX_TABLE_COUNT {
        return Err(ValidationError::OutOfRange {
            field: "table count".to_string(),
            min: 1,
            max: MAX_TABLE_COUNT as i64,
        });
    }

    Ok(())
}

/// Validates a guest count for an occupied table.
///
/// ## Rules
/// - Must be positive (an occupied table seats at least one guest)
/// - Must not exceed MAX_GUEST_COUNT (99)
pub fn validate_guest_count(guests: u32) -> ValidationResult<()> {
    if guests == 0 {
        return Err(ValidationError::MustBePositive {
            field: "guest count".to_string(),
        });
    }

    if guests > MAX_GUEST_COUNT {
        return Err(ValidationError::OutOfRange {
            field: "guest count".to_string(),
            min: 1,
            max: MAX_GUEST_COUNT as i64,
        });
    }

    Ok(())
}

/// Validates the size of a merge selection.
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Floor: Merge Mode                                                      │
/// │                                                                         │
/// │  Operator toggles tables 3, 5, 6                                        │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_merge_selection(3) ← THIS FUNCTION                            │
/// │       │                                                                 │
/// │       ├── fewer than 2? → Error: "merge selection must be between..."   │
/// │       │                                                                 │
/// │       └── OK → merge(primary = 3, secondaries = [5, 6])                 │
/// │                                                                         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_merge_selection(selected: usize) -> ValidationResult<()> {
    if selected < 2 {
        return Err(ValidationError::OutOfRange {
            field: "merge selection".to_string(),
            min: 2,
            max: MAX_TABLE_COUNT as i64,
        });
    }

    Ok(())
}

/// Validates the size of a split selection (at least one table).
pub fn validate_split_selection(selected: usize) -> ValidationResult<()> {
    if selected == 0 {
        return Err(ValidationError::Required {
            field: "split selection".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Money Validators
// =============================================================================

/// Clamps a discount value to `≥ 0`.
///
/// No upper clamp: percent values above 100 are stored as entered and capped
/// when totals are computed.
///
/// ## Example
/// ```rust
/// use bistro_core::validation::clamp_discount_value;
/// use rust_decimal::Decimal;
///
/// assert_eq!(clamp_discount_value(Decimal::from(-5)), Decimal::ZERO);
/// assert_eq!(clamp_discount_value(Decimal::from(150)), Decimal::from(150));
/// ```
pub fn clamp_discount_value(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

/// Validates a catalog unit price.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (complimentary items)
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: "price".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product search query.
///
/// ## Rules
/// - Can be empty (returns all products in the category)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================
