//! # Order Commands
//!
//! Product search and every edit of the active table's order.
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Order Lifecycle                                      │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐        │
//! │  │  Table   │────►│ Ordering │────►│  Quote   │────►│   Paid   │        │
//! │  │  opened  │     │          │     │          │     │ released │        │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘        │
//! │                        │                               ▲                │
//! │                   add_product                          │                │
//! │                   change_quantity                 pay (payment.rs)      │
//! │                   remove_line                                           │
//! │                   set_*_discount                                        │
//! │                   set_customer / price list / promotion                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every edit goes to the active table's order. A merge secondary resolves
//! to its primary, so both tables show the same lines.

use bistro_core::checkout::can_checkout;
use bistro_core::validation::validate_search_query;
use bistro_core::{CoreError, DiscountKind, Order, OrderTotals, ProductId, TableId};
use bistro_gateway::CatalogProduct;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::{Session, SessionState};

/// Order response including lines and derived totals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    /// The table the operator picked
    pub table_id: TableId,
    /// The table owning the order (differs for a merge secondary)
    pub order_table_id: TableId,
    pub order: Order,
    pub totals: OrderTotals,
    pub can_checkout: bool,
}

impl OrderResponse {
    /// Builds the response for the active table.
    pub fn from_session(s: &Session) -> Result<Self, ApiError> {
        let table_id = s.active()?;
        let order = s.active_order()?;

        Ok(OrderResponse {
            table_id,
            order_table_id: s.registry.resolve(table_id)?,
            order: order.clone(),
            totals: OrderTotals::from(order),
            can_checkout: can_checkout(order),
        })
    }
}

/// Gets the active table's order.
pub fn get_order(session: &SessionState) -> Result<OrderResponse, ApiError> {
    debug!("get_order command");
    session.with_session(OrderResponse::from_session)
}

/// Searches the loaded catalog.
///
/// ## Matching
/// - `category`: only products of that POS category (all when `None`)
/// - `query`: case-insensitive substring of name, internal code or barcode;
///   empty matches everything
pub fn search_products(
    session: &SessionState,
    category: Option<i64>,
    query: &str,
) -> Result<Vec<CatalogProduct>, ApiError> {
    debug!(?category, query = %query, "search_products command");

    let query = validate_search_query(query).map_err(CoreError::from)?;
    session.with_session(|s| -> Result<Vec<CatalogProduct>, ApiError> {
        if let Some(id) = category {
            s.catalog
                .category(id)
                .ok_or_else(|| ApiError::not_found("Category", id))?;
        }
        Ok(s.catalog
            .filter_products(category, &query)
            .into_iter()
            .cloned()
            .collect())
    })
}

/// Adds one unit of a product to the active order.
///
/// The price is frozen on the line when it is first added.
pub fn add_product(
    session: &SessionState,
    product_id: ProductId,
) -> Result<OrderResponse, ApiError> {
    debug!(product_id, "add_product command");

    session.with_session_mut(|s| -> Result<OrderResponse, ApiError> {
        let product = s
            .catalog
            .product(product_id)
            .ok_or_else(|| ApiError::not_found("Product", product_id))?
            .to_ref();

        s.active_order_mut()?.add_product(&product);
        OrderResponse::from_session(s)
    })
}

/// Changes a line's quantity by `delta`; a line reaching zero is removed.
pub fn change_quantity(
    session: &SessionState,
    product_id: ProductId,
    delta: i64,
) -> Result<OrderResponse, ApiError> {
    debug!(product_id, delta, "change_quantity command");

    session.with_session_mut(|s| -> Result<OrderResponse, ApiError> {
        let quantity = s.active_order_mut()?.set_quantity(product_id, delta)?;
        if quantity == 0 {
            info!(product_id, "Line removed at zero quantity");
        }
        OrderResponse::from_session(s)
    })
}

/// Removes a line whatever its quantity.
pub fn remove_line(
    session: &SessionState,
    product_id: ProductId,
) -> Result<OrderResponse, ApiError> {
    debug!(product_id, "remove_line command");

    session.with_session_mut(|s| -> Result<OrderResponse, ApiError> {
        if !s.active_order_mut()?.remove_line(product_id) {
            return Err(CoreError::LineNotFound(product_id).into());
        }
        OrderResponse::from_session(s)
    })
}

/// Sets the discount of one line.
pub fn set_line_discount(
    session: &SessionState,
    product_id: ProductId,
    kind: DiscountKind,
    value: Decimal,
) -> Result<OrderResponse, ApiError> {
    debug!(product_id, %kind, %value, "set_line_discount command");

    session.with_session_mut(|s| -> Result<OrderResponse, ApiError> {
        s.active_order_mut()?
            .set_line_discount(product_id, kind, value)?;
        OrderResponse::from_session(s)
    })
}

/// Sets the whole-bill discount.
pub fn set_bill_discount(
    session: &SessionState,
    kind: DiscountKind,
    value: Decimal,
) -> Result<OrderResponse, ApiError> {
    debug!(%kind, %value, "set_bill_discount command");

    session.with_session_mut(|s| -> Result<OrderResponse, ApiError> {
        s.active_order_mut()?.set_bill_discount(kind, value);
        OrderResponse::from_session(s)
    })
}

/// Sets or clears (`None`) the order's customer.
pub fn set_customer(
    session: &SessionState,
    customer_id: Option<i64>,
) -> Result<OrderResponse, ApiError> {
    debug!(?customer_id, "set_customer command");

    session.with_session_mut(|s| -> Result<OrderResponse, ApiError> {
        let customer = customer_id
            .map(|id| {
                s.catalog
                    .customer(id)
                    .map(|c| c.to_ref())
                    .ok_or_else(|| ApiError::not_found("Customer", id))
            })
            .transpose()?;

        s.active_order_mut()?.set_customer(customer);
        OrderResponse::from_session(s)
    })
}

/// Sets or clears the order's price list.
pub fn set_price_list(
    session: &SessionState,
    price_list_id: Option<i64>,
) -> Result<OrderResponse, ApiError> {
    debug!(?price_list_id, "set_price_list command");

    session.with_session_mut(|s| -> Result<OrderResponse, ApiError> {
        let price_list = price_list_id
            .map(|id| {
                s.catalog
                    .price_list(id)
                    .map(|p| p.to_ref())
                    .ok_or_else(|| ApiError::not_found("Price list", id))
            })
            .transpose()?;

        s.active_order_mut()?.set_price_list(price_list);
        OrderResponse::from_session(s)
    })
}

/// Sets or clears the order's promotion.
///
/// The promotion is recorded on the order and sent with it; it does not
/// change the computed totals.
pub fn set_promotion(
    session: &SessionState,
    promotion_id: Option<i64>,
) -> Result<OrderResponse, ApiError> {
    debug!(?promotion_id, "set_promotion command");

    session.with_session_mut(|s| -> Result<OrderResponse, ApiError> {
        let promotion = promotion_id
            .map(|id| {
                s.catalog
                    .promotion(id)
                    .map(|p| p.to_ref())
                    .ok_or_else(|| ApiError::not_found("Promotion", id))
            })
            .transpose()?;

        s.active_order_mut()?.set_promotion(promotion);
        OrderResponse::from_session(s)
    })
}
