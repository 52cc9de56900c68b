//! # bistro-core: Table/Order Engine for Bistro POS
//!
//! This crate is the **heart** of Bistro POS. It owns the rules for table
//! occupancy, merging and splitting, order composition and pricing, with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bistro POS Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                    Terminal (console driver)                    │    │
//! │  │    Floor ──► Order ──► Discounts ──► Pay ──► History           │     │
//! │  └─────────────────────────────┬───────────────────────────────────┘    │
//! │                                │ commands                               │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ bistro-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │ registry  │  │   order   │  │  pricing  │  │ checkout  │  │   │
//! │  │   │  Tables   │  │ OrderLine │  │  totals   │  │   gate    │  │   │
//! │  │   │ merge/spl │  │ Discount  │  │  (exact)  │  │  payload  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO LOGGING • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                ▲                                        │
//! │  ┌─────────────────────────────┴───────────────────────────────────┐   │
//! │  │                bistro-gateway (ERP boundary)                    │   │
//! │  │        catalog snapshot, sessions, order history               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - References, products, discounts
//! - [`money`] - Exact decimal money
//! - [`order`] - Order lines and order mutations
//! - [`pricing`] - Line, subtotal, discount and grand totals
//! - [`table`] - Table state and views
//! - [`registry`] - The floor: open, close, merge, split
//! - [`selection`] - Merge/split selection mode
//! - [`checkout`] - Payment gate and completed-order payload
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use bistro_core::{pricing, Money, ProductRef, TableRegistry};
//!
//! let mut floor = TableRegistry::new(16).unwrap();
//! floor.open(3).unwrap();
//!
//! let pho = ProductRef {
//!     id: 1,
//!     name: "Phở bò".to_string(),
//!     price: Money::from_units(45_000),
//!     category: None,
//! };
//! floor.order_mut(3).unwrap().add_product(&pho);
//!
//! assert_eq!(pricing::grand_total(floor.order(3).unwrap()), Money::from_units(45_000));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checkout;
pub mod error;
pub mod money;
pub mod order;
pub mod pricing;
pub mod registry;
pub mod selection;
pub mod table;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use bistro_core::Money` instead of
// `use bistro_core::money::Money`

pub use checkout::{CompletedLine, CompletedOrder};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use order::{Order, OrderLine};
pub use pricing::OrderTotals;
pub use registry::{SelectionMode, TableRegistry};
pub use selection::TableSelection;
pub use table::{FloorSummary, Table, TableStatus, TableView};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Tables on the reference floor.
pub const DEFAULT_TABLE_COUNT: u32 = 16;

/// Upper bound for a configured floor.
pub const MAX_TABLE_COUNT: u32 = 200;

/// Maximum guests recorded for one table
///
/// ## Business Reason
/// Catches typos (e.g. 40 instead of 4); large parties merge tables.
pub const MAX_GUEST_COUNT: u32 = 99;
