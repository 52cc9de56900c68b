//! # Error Types
//!
//! Domain-specific error types for bistro-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  bistro-core errors (this file)                                         │
//! │  ├── CoreError        - Table/order rule violations                     │
//! │  └── ValidationError  - Input validation failures                       │
//! │                                                                         │
//! │  bistro-gateway errors (separate crate)                                │
//! │  └── GatewayError     - Backend / config failures                      │
//! │                                                                         │
//! │  Terminal API errors (in app)                                          │
//! │  └── ApiError         - What the operator sees (serialized)            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError ─┐                                  │
//! │                        GatewayError ─┴→ ApiError → Operator            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (table id, product id)
//! 3. Errors are enum variants, never String
//! 4. No error leaves the registry in a partially-mutated state

use thiserror::Error;

use crate::types::{ProductId, TableId};

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent table/order rule violations. Every operation that
/// returns one of these has left all state exactly as it found it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Table id is outside the configured floor.
    ///
    /// ## When This Occurs
    /// - Console input names table 17 on a 16-table floor
    /// - Table id 0 (ids start at 1)
    #[error("Table not found: {0}")]
    TableNotFound(TableId),

    /// Table is not in the state the operation requires.
    ///
    /// ## When This Occurs
    /// - Merging an available table, or a table that is already merged
    /// - Merging a merge primary into another group (groups stay flat)
    /// - Splitting a selection where nothing is linked
    /// - Editing the order of an available table
    ///
    /// ## User Workflow
    /// ```text
    /// Select tables 3, 5 (merge mode)
    ///      │
    ///      ▼
    /// Table 5 is a merge primary of 6
    ///      │
    ///      ▼
    /// InvalidTransition { table_id: 5, reason: "..." }
    ///      │
    ///      ▼
    /// Console shows the reason, floor unchanged
    /// ```
    #[error("Table {table_id}: {reason}")]
    InvalidTransition { table_id: TableId, reason: String },

    /// No line for this product on the order.
    #[error("No order line for product {0}")]
    LineNotFound(ProductId),

    /// Checkout attempted on a non-empty order without a customer.
    #[error("A customer must be selected before payment")]
    CustomerRequired,

    /// Checkout attempted on an order with no lines.
    #[error("Order has no items")]
    EmptyOrder,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Shorthand for building an `InvalidTransition`.
    pub(crate) fn transition(table_id: TableId, reason: impl Into<String>) -> Self {
        CoreError::InvalidTransition {
            table_id,
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when operator input doesn't meet requirements.
/// Used for early validation before any state is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Duplicate value (e.g., the same table selected twice).
    #[error("{field} '{value}' appears more than once")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
