//! # Tables
//!
//! A single seating unit and its read-only views.
//!
//! ## Table State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │              open                 merge (as secondary)                  │
//! │  AVAILABLE ─────────► OCCUPIED ───────────────────────► MERGED          │
//! │      ▲                  │  ▲                               │            │
//! │      │      close       │  │            split              │            │
//! │      └──────────────────┘  └───────────────────────────────┘            │
//! │      ▲                                                     │            │
//! │      └──────────────── close (or primary closed) ──────────┘            │
//! │                                                                         │
//! │  A merge primary stays OCCUPIED; only secondaries show MERGED.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `Table` only stores occupancy. Merge links live in the registry, which
//! derives `TableStatus::Merged` and the `merged_with` / `merged_tables`
//! fields of [`TableView`] from a single relation map.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::order::Order;
use crate::types::TableId;

/// Displayed table status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TableStatus {
    Available,
    Occupied,
    /// Folded into a merge primary.
    Merged,
}

/// One physical table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    id: TableId,
    occupied: bool,
    guest_count: u32,
    order_time: Option<DateTime<Utc>>,
    order: Order,
}

impl Table {
    pub(crate) fn new(id: TableId) -> Self {
        Table {
            id,
            occupied: false,
            guest_count: 0,
            order_time: None,
            order: Order::new(),
        }
    }

    pub fn id(&self) -> TableId {
        self.id
    }

    /// True for occupied tables and merge secondaries alike.
    pub fn is_occupied(&self) -> bool {
        self.occupied
    }

    pub fn guest_count(&self) -> u32 {
        self.guest_count
    }

    pub fn order_time(&self) -> Option<DateTime<Utc>> {
        self.order_time
    }

    /// The table's own order (dormant while the table is a merge secondary).
    pub fn order(&self) -> &Order {
        &self.order
    }

    /// Time since the table was opened.
    pub fn elapsed(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.order_time.map(|opened| now - opened)
    }

    pub(crate) fn order_mut(&mut self) -> &mut Order {
        &mut self.order
    }

    pub(crate) fn occupy(&mut self, now: DateTime<Utc>) {
        self.occupied = true;
        self.guest_count = 1;
        self.order_time = Some(now);
        self.order.clear();
    }

    pub(crate) fn set_guest_count(&mut self, guests: u32) {
        self.guest_count = guests;
    }

    pub(crate) fn reset(&mut self) {
        *self = Table::new(self.id);
    }
}

/// Read-only table view for the floor display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TableView {
    pub id: TableId,
    pub status: TableStatus,
    /// Primary id when `status` is merged.
    pub merged_with: Option<TableId>,
    /// Secondary ids when this table is a merge primary.
    pub merged_tables: Vec<TableId>,
    pub guest_count: u32,
    #[ts(as = "Option<String>")]
    pub order_time: Option<DateTime<Utc>>,
    /// Lines on the order this table resolves to.
    pub item_count: usize,
}

/// Floor occupancy counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FloorSummary {
    /// Occupied and merged tables.
    pub occupied: u32,
    pub available: u32,
}
