//! # Table Commands
//!
//! Floor view, table open/close, guest counts and merge/split selection.
//!
//! ## Merge Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  > select merge          selection = Merge, []                          │
//! │  > toggle 3              [3]         (first pick becomes primary)       │
//! │  > toggle 5              [3, 5]                                         │
//! │  > toggle 6              [3, 5, 6]                                      │
//! │  > confirm               merge(3, [5, 6]) ──► selection cleared         │
//! │                                                                         │
//! │  Toggling an unselectable table is ignored; a failed confirm keeps      │
//! │  the selection so it can be corrected.                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use bistro_core::{FloorSummary, SelectionMode, TableId, TableSelection, TableStatus, TableView};
use serde::Serialize;
use tracing::{debug, info};

use crate::commands::order::OrderResponse;
use crate::error::{ApiError, ErrorCode};
use crate::state::{Session, SessionState};

/// The whole floor.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorResponse {
    pub tables: Vec<TableView>,
    pub summary: FloorSummary,
    pub active_table: Option<TableId>,
    pub selection: Option<TableSelection>,
}

impl From<&Session> for FloorResponse {
    fn from(s: &Session) -> Self {
        FloorResponse {
            tables: s.registry.views(),
            summary: s.registry.summary(),
            active_table: s.active_table,
            selection: s.selection.clone(),
        }
    }
}

/// Result of a selection toggle.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionResponse {
    pub table_id: TableId,
    pub selected: bool,
    pub selection: TableSelection,
}

fn no_selection() -> ApiError {
    ApiError::validation("No selection in progress; use `select merge|split` first")
}

/// Gets every table with its status.
pub fn get_floor(session: &SessionState) -> FloorResponse {
    debug!("get_floor command");
    session.with_session(|s| FloorResponse::from(s))
}

/// Opens a table. Opening a table that is already open changes nothing.
pub fn open_table(session: &SessionState, table_id: TableId) -> Result<TableView, ApiError> {
    debug!(table_id, "open_table command");

    session.with_session_mut(|s| -> Result<TableView, ApiError> {
        if s.registry.open(table_id)? {
            info!(table_id, "Table opened");
        }
        Ok(s.registry.view(table_id)?)
    })
}

/// Closes a table, cascading to its secondaries if it is a merge primary.
pub fn close_table(session: &SessionState, table_id: TableId) -> Result<FloorResponse, ApiError> {
    debug!(table_id, "close_table command");

    session.with_session_mut(|s| -> Result<FloorResponse, ApiError> {
        let freed = s.registry.close(table_id)?;
        s.forget_active_if(&freed);
        info!(table_id, freed = ?freed, "Table closed");
        Ok(FloorResponse::from(&*s))
    })
}

/// Sets the guest count of an open table.
pub fn set_guests(
    session: &SessionState,
    table_id: TableId,
    guests: u32,
) -> Result<TableView, ApiError> {
    debug!(table_id, guests, "set_guests command");

    session.with_session_mut(|s| -> Result<TableView, ApiError> {
        s.registry.set_guest_count(table_id, guests)?;
        info!(table_id, guests, "Guest count updated");
        Ok(s.registry.view(table_id)?)
    })
}

/// Picks an open table for ordering.
///
/// A merge secondary may be picked; its edits go to the primary's order.
pub fn use_table(session: &SessionState, table_id: TableId) -> Result<OrderResponse, ApiError> {
    debug!(table_id, "use_table command");

    session.with_session_mut(|s| -> Result<OrderResponse, ApiError> {
        if s.registry.status(table_id)? == TableStatus::Available {
            return Err(ApiError::new(
                ErrorCode::InvalidTransition,
                format!("Table {} is not open", table_id),
            ));
        }
        s.active_table = Some(table_id);
        OrderResponse::from_session(s)
    })
}

/// Starts a merge or split selection, replacing any previous one.
pub fn start_selection(session: &SessionState, mode: SelectionMode) -> FloorResponse {
    debug!(?mode, "start_selection command");

    session.with_session_mut(|s| {
        s.selection = Some(TableSelection::new(mode));
        FloorResponse::from(&*s)
    })
}

/// Adds or removes a table from the selection.
pub fn toggle_selection(
    session: &SessionState,
    table_id: TableId,
) -> Result<SelectionResponse, ApiError> {
    debug!(table_id, "toggle_selection command");

    session.with_session_mut(|s| -> Result<SelectionResponse, ApiError> {
        s.registry.table(table_id)?;
        let selection = s.selection.as_mut().ok_or_else(no_selection)?;
        let selected = selection.toggle(&s.registry, table_id);

        Ok(SelectionResponse {
            table_id,
            selected,
            selection: selection.clone(),
        })
    })
}

/// Applies the selection to the floor.
pub fn confirm_selection(session: &SessionState) -> Result<FloorResponse, ApiError> {
    debug!("confirm_selection command");

    session.with_session_mut(|s| -> Result<FloorResponse, ApiError> {
        let selection = s.selection.as_mut().ok_or_else(no_selection)?;
        let mode = selection.mode;
        let affected = selection.confirm(&mut s.registry)?;

        s.selection = None;
        info!(?mode, tables = ?affected, "Selection applied");
        Ok(FloorResponse::from(&*s))
    })
}

/// Drops the selection without touching the floor.
pub fn cancel_selection(session: &SessionState) -> FloorResponse {
    debug!("cancel_selection command");

    session.with_session_mut(|s| {
        s.selection = None;
        FloorResponse::from(&*s)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::ready;

    #[tokio::test]
    async fn test_open_is_idempotent() {
        let (session, _) = ready().await;
        let first = open_table(&session, 3).unwrap();
        let again = open_table(&session, 3).unwrap();
        assert_eq!(first, again);
        assert_eq!(get_floor(&session).summary.occupied, 1);
    }

    #[tokio::test]
    async fn test_unknown_table() {
        let (session, _) = ready().await;
        let err = open_table(&session, 17).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_use_requires_open_table() {
        let (session, _) = ready().await;
        let err = use_table(&session, 2).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidTransition);

        open_table(&session, 2).unwrap();
        let order = use_table(&session, 2).unwrap();
        assert_eq!(order.table_id, 2);
    }

    #[tokio::test]
    async fn test_merge_via_selection() {
        let (session, _) = ready().await;
        for id in [3, 5, 6] {
            open_table(&session, id).unwrap();
        }

        start_selection(&session, SelectionMode::Merge);
        assert!(toggle_selection(&session, 3).unwrap().selected);
        assert!(toggle_selection(&session, 5).unwrap().selected);
        assert!(toggle_selection(&session, 6).unwrap().selected);
        // Available tables cannot be picked for a merge.
        assert!(!toggle_selection(&session, 7).unwrap().selected);

        let floor = confirm_selection(&session).unwrap();
        assert!(floor.selection.is_none());
        let primary = &floor.tables[2];
        assert_eq!(primary.merged_tables, vec![5, 6]);
        assert_eq!(floor.tables[4].status, TableStatus::Merged);
    }

    #[tokio::test]
    async fn test_failed_confirm_keeps_selection() {
        let (session, _) = ready().await;
        open_table(&session, 3).unwrap();

        start_selection(&session, SelectionMode::Merge);
        toggle_selection(&session, 3).unwrap();
        let err = confirm_selection(&session).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let floor = get_floor(&session);
        assert_eq!(floor.selection.unwrap().selected(), &[3]);
    }

    #[tokio::test]
    async fn test_split_round_trip() {
        let (session, _) = ready().await;
        for id in [1, 2, 3] {
            open_table(&session, id).unwrap();
        }
        start_selection(&session, SelectionMode::Merge);
        for id in [1, 2, 3] {
            toggle_selection(&session, id).unwrap();
        }
        confirm_selection(&session).unwrap();

        start_selection(&session, SelectionMode::Split);
        toggle_selection(&session, 1).unwrap();
        let floor = confirm_selection(&session).unwrap();

        for view in &floor.tables[..3] {
            assert_eq!(view.status, TableStatus::Occupied);
            assert!(view.merged_tables.is_empty());
            assert_eq!(view.merged_with, None);
        }
    }

    #[tokio::test]
    async fn test_close_primary_cascades_and_clears_active() {
        let (session, _) = ready().await;
        for id in [1, 2, 3] {
            open_table(&session, id).unwrap();
        }
        start_selection(&session, SelectionMode::Merge);
        for id in [1, 2, 3] {
            toggle_selection(&session, id).unwrap();
        }
        confirm_selection(&session).unwrap();
        use_table(&session, 2).unwrap();

        let floor = close_table(&session, 1).unwrap();
        assert_eq!(floor.summary.occupied, 0);
        assert_eq!(floor.active_table, None);
    }

    #[tokio::test]
    async fn test_toggle_without_selection() {
        let (session, _) = ready().await;
        let err = toggle_selection(&session, 1).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_guest_count() {
        let (session, _) = ready().await;
        assert!(set_guests(&session, 4, 3).is_err());

        open_table(&session, 4).unwrap();
        assert_eq!(set_guests(&session, 4, 3).unwrap().guest_count, 3);
        assert_eq!(
            set_guests(&session, 4, 0).unwrap_err().code,
            ErrorCode::ValidationError
        );
    }
}
