//! # History Commands
//!
//! Past orders of the open POS config, read straight from the backend.
//! Nothing here touches the floor.

use bistro_gateway::{HistoryLine, HistoryOrder};
use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;
use crate::state::{GatewayState, Session, SessionState};

/// One past order with its lines.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    pub order: HistoryOrder,
    pub lines: Vec<HistoryLine>,
}

/// Orders of the open POS config within the configured window, newest first.
pub async fn order_history(
    session: &SessionState,
    gateway: &GatewayState,
) -> Result<Vec<HistoryOrder>, ApiError> {
    let config_id = session.with_session(Session::config_id)?;
    let days = gateway.config().session.history_days;
    debug!(config_id, days, "order_history command");

    Ok(gateway.inner().order_history(config_id, days).await?)
}

/// One past order with its lines.
///
/// The order must be in the current history window.
pub async fn order_detail(
    session: &SessionState,
    gateway: &GatewayState,
    order_id: i64,
) -> Result<OrderDetail, ApiError> {
    debug!(order_id, "order_detail command");

    let order = order_history(session, gateway)
        .await?
        .into_iter()
        .find(|o| o.id == order_id)
        .ok_or_else(|| ApiError::not_found("Order", order_id))?;
    let lines = gateway.inner().order_lines(&order.line_ids).await?;

    Ok(OrderDetail { order, lines })
}
