//! # Table Registry
//!
//! Single source of truth for the floor: every table, its occupancy and the
//! merge links between tables. Nothing else mutates occupancy.
//!
//! ## Merge Bookkeeping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ONE relation map, secondary → primary                                  │
//! │                                                                         │
//! │     links = { 5 → 3, 6 → 3 }                                            │
//! │                                                                         │
//! │  Derived on read:                                                       │
//! │     status(5)          = Merged         (5 is a key)                    │
//! │     primary_of(5)      = Some(3)                                        │
//! │     secondaries_of(3)  = [5, 6]         (scan values)                   │
//! │     status(3)          = Occupied       (a primary stays occupied)      │
//! │                                                                         │
//! │  There is no second copy of the relation to drift out of sync.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Failure Model
//! Every operation validates all of its preconditions before touching any
//! table. An `Err` means the registry is exactly as it was.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::order::Order;
use crate::table::{FloorSummary, Table, TableStatus, TableView};
use crate::types::TableId;
use crate::validation::{validate_guest_count, validate_split_selection, validate_table_count};

/// Which kind of multi-table selection the floor is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    Merge,
    Split,
}

impl std::str::FromStr for SelectionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "merge" => Ok(SelectionMode::Merge),
            "split" => Ok(SelectionMode::Split),
            _ => Err(format!("Invalid selection mode: {}", s)),
        }
    }
}

/// All tables of the floor plus their merge links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRegistry {
    tables: Vec<Table>,
    /// secondary → primary
    links: BTreeMap<TableId, TableId>,
}

impl TableRegistry {
    /// Creates a floor with tables `1..=count`, all available.
    pub fn new(count: u32) -> CoreResult<Self> {
        validate_table_count(count)?;
        Ok(TableRegistry {
            tables: (1..=count).map(Table::new).collect(),
            links: BTreeMap::new(),
        })
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    fn index(&self, id: TableId) -> CoreResult<usize> {
        let index = (id as usize)
            .checked_sub(1)
            .filter(|i| *i < self.tables.len())
            .ok_or(CoreError::TableNotFound(id))?;
        Ok(index)
    }

    fn table_mut(&mut self, id: TableId) -> CoreResult<&mut Table> {
        let index = self.index(id)?;
        Ok(&mut self.tables[index])
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn table(&self, id: TableId) -> CoreResult<&Table> {
        let index = self.index(id)?;
        Ok(&self.tables[index])
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.iter()
    }

    pub fn status(&self, id: TableId) -> CoreResult<TableStatus> {
        let table = self.table(id)?;
        Ok(self.status_of(table))
    }

    fn status_of(&self, table: &Table) -> TableStatus {
        if self.links.contains_key(&table.id()) {
            TableStatus::Merged
        } else if table.is_occupied() {
            TableStatus::Occupied
        } else {
            TableStatus::Available
        }
    }

    /// The primary a secondary is merged into.
    pub fn primary_of(&self, id: TableId) -> Option<TableId> {
        self.links.get(&id).copied()
    }

    /// Secondaries merged into `id`, ascending.
    pub fn secondaries_of(&self, id: TableId) -> Vec<TableId> {
        self.links
            .iter()
            .filter(|(_, primary)| **primary == id)
            .map(|(secondary, _)| *secondary)
            .collect()
    }

    pub fn is_primary(&self, id: TableId) -> bool {
        self.links.values().any(|primary| *primary == id)
    }

    pub fn is_secondary(&self, id: TableId) -> bool {
        self.links.contains_key(&id)
    }

    /// The table whose order `id` uses: its primary if merged, else itself.
    pub fn resolve(&self, id: TableId) -> CoreResult<TableId> {
        self.index(id)?;
        Ok(self.primary_of(id).unwrap_or(id))
    }

    /// Whether `id` may be toggled in a selection of the given mode.
    ///
    /// - Merge mode: occupied tables only
    /// - Split mode: merge primaries and merge secondaries
    pub fn selectable(&self, id: TableId, mode: SelectionMode) -> bool {
        match (self.status(id), mode) {
            (Ok(status), SelectionMode::Merge) => status == TableStatus::Occupied,
            (Ok(_), SelectionMode::Split) => self.is_primary(id) || self.is_secondary(id),
            (Err(_), _) => false,
        }
    }

    /// The order `id` resolves to (a secondary shows its primary's order).
    pub fn order(&self, id: TableId) -> CoreResult<&Order> {
        let target = self.resolve(id)?;
        Ok(self.table(target)?.order())
    }

    /// Mutable access to the order `id` resolves to.
    ///
    /// Fails with `InvalidTransition` if that table is not open.
    pub fn order_mut(&mut self, id: TableId) -> CoreResult<&mut Order> {
        let target = self.resolve(id)?;
        let table = self.table_mut(target)?;
        if !table.is_occupied() {
            return Err(CoreError::transition(id, "table is not open"));
        }
        Ok(table.order_mut())
    }

    pub fn view(&self, id: TableId) -> CoreResult<TableView> {
        let table = self.table(id)?;
        self.view_of(table)
    }

    pub fn views(&self) -> Vec<TableView> {
        self.tables
            .iter()
            .filter_map(|table| self.view_of(table).ok())
            .collect()
    }

    fn view_of(&self, table: &Table) -> CoreResult<TableView> {
        let id = table.id();
        Ok(TableView {
            id,
            status: self.status_of(table),
            merged_with: self.primary_of(id),
            merged_tables: self.secondaries_of(id),
            guest_count: table.guest_count(),
            order_time: table.order_time(),
            item_count: self.order(id)?.item_count(),
        })
    }

    /// Occupied (including merged) vs available counts.
    pub fn summary(&self) -> FloorSummary {
        let occupied = self.tables.iter().filter(|t| t.is_occupied()).count() as u32;
        FloorSummary {
            occupied,
            available: self.tables.len() as u32 - occupied,
        }
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Opens an available table now. See [`TableRegistry::open_at`].
    pub fn open(&mut self, id: TableId) -> CoreResult<bool> {
        self.open_at(id, Utc::now())
    }

    /// Opens an available table with one guest and an empty order.
    ///
    /// Opening a table that is not available is a no-op and returns
    /// `Ok(false)`, so a double tap never resets a running order.
    pub fn open_at(&mut self, id: TableId, now: DateTime<Utc>) -> CoreResult<bool> {
        if self.status(id)? != TableStatus::Available {
            return Ok(false);
        }
        self.table_mut(id)?.occupy(now);
        Ok(true)
    }

    /// Resets a table to available and clears its order.
    ///
    /// ## Cascade
    /// - Merge primary: all of its secondaries are reset too
    /// - Merge secondary: only the secondary is reset and unlinked
    ///
    /// Returns the ids that were reset, target first.
    pub fn close(&mut self, id: TableId) -> CoreResult<Vec<TableId>> {
        self.index(id)?;

        let mut released = vec![id];
        if self.is_primary(id) {
            released.extend(self.secondaries_of(id));
        }

        for table_id in &released {
            self.links.remove(table_id);
            self.table_mut(*table_id)?.reset();
        }
        Ok(released)
    }

    /// Releases the group `id` belongs to after payment.
    ///
    /// A secondary releases its primary (and so the whole group).
    pub fn release(&mut self, id: TableId) -> CoreResult<Vec<TableId>> {
        let primary = self.resolve(id)?;
        self.close(primary)
    }

    /// Folds `secondaries` into `primary`.
    ///
    /// ## Preconditions
    /// - At least one secondary, no duplicates, primary not among them
    /// - Primary is occupied and not itself merged
    /// - Every secondary is occupied and not a merge primary (groups stay flat)
    ///
    /// A primary that already has secondaries may take more.
    pub fn merge(&mut self, primary: TableId, secondaries: &[TableId]) -> CoreResult<()> {
        self.index(primary)?;
        for id in secondaries {
            self.index(*id)?;
        }

        if secondaries.is_empty() {
            return Err(CoreError::transition(
                primary,
                "merge needs at least one other table",
            ));
        }

        let mut seen = BTreeSet::new();
        for id in secondaries {
            if !seen.insert(*id) {
                return Err(ValidationError::Duplicate {
                    field: "table".to_string(),
                    value: id.to_string(),
                }
                .into());
            }
        }
        if seen.contains(&primary) {
            return Err(CoreError::transition(
                primary,
                "a table cannot be merged into itself",
            ));
        }

        match self.status(primary)? {
            TableStatus::Occupied => {}
            TableStatus::Available => {
                return Err(CoreError::transition(primary, "merge primary must be open"));
            }
            TableStatus::Merged => {
                return Err(CoreError::transition(
                    primary,
                    format!(
                        "already merged into table {}",
                        self.primary_of(primary).unwrap_or_default()
                    ),
                ));
            }
        }

        for id in secondaries {
            match self.status(*id)? {
                TableStatus::Available => {
                    return Err(CoreError::transition(*id, "only open tables can be merged"));
                }
                TableStatus::Merged => {
                    return Err(CoreError::transition(
                        *id,
                        format!(
                            "already merged into table {}",
                            self.primary_of(*id).unwrap_or_default()
                        ),
                    ));
                }
                TableStatus::Occupied if self.is_primary(*id) => {
                    return Err(CoreError::transition(
                        *id,
                        "table already has merged tables of its own",
                    ));
                }
                TableStatus::Occupied => {}
            }
        }

        for id in secondaries {
            self.links.insert(*id, primary);
        }
        Ok(())
    }

    /// Undoes the merge groups of the primaries in `ids`.
    ///
    /// Every secondary of a selected primary goes back to occupied with its
    /// own order and guest count unchanged. Secondaries in the set are not
    /// split on their own. Returns the freed ids; fails if the set holds no
    /// primary.
    pub fn split(&mut self, ids: &[TableId]) -> CoreResult<Vec<TableId>> {
        validate_split_selection(ids.len())?;
        for id in ids {
            self.index(*id)?;
        }

        let mut freed = BTreeSet::new();
        for id in ids {
            if self.is_primary(*id) {
                freed.extend(self.secondaries_of(*id));
            }
        }

        if freed.is_empty() {
            return Err(CoreError::transition(ids[0], "no merged tables to split"));
        }

        for id in &freed {
            self.links.remove(id);
        }
        Ok(freed.into_iter().collect())
    }

    /// Sets the guest count of an open table.
    pub fn set_guest_count(&mut self, id: TableId, guests: u32) -> CoreResult<()> {
        validate_guest_count(guests)?;
        let table = self.table_mut(id)?;
        if !table.is_occupied() {
            return Err(CoreError::transition(id, "table is not open"));
        }
        table.set_guest_count(guests);
        Ok(())
    }

    #[cfg(test)]
    fn assert_consistent(&self) {
        for (secondary, primary) in &self.links {
            assert_ne!(secondary, primary);
            assert!(!self.links.contains_key(primary), "nested group at {}", primary);
            assert!(self.table(*secondary).unwrap().is_occupied());
            assert!(self.table(*primary).unwrap().is_occupied());
        }
        for table in &self.tables {
            if !table.is_occupied() {
                assert!(table.order().is_empty());
                assert_eq!(table.guest_count(), 0);
                assert!(table.order_time().is_none());
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::tests::product;
    use chrono::TimeZone;

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 18, minute, 0).unwrap()
    }

    /// 16 tables with `open` opened at 18:00.
    fn floor(open: &[TableId]) -> TableRegistry {
        let mut registry = TableRegistry::new(16).unwrap();
        for id in open {
            assert!(registry.open_at(*id, at(0)).unwrap());
        }
        registry
    }

    #[test]
    fn test_new_floor() {
        let registry = TableRegistry::new(16).unwrap();
        assert_eq!(registry.len(), 16);
        assert!(registry
            .tables()
            .all(|t| registry.status(t.id()).unwrap() == TableStatus::Available));
        assert!(TableRegistry::new(0).is_err());
    }

    #[test]
    fn test_unknown_table() {
        let mut registry = floor(&[]);
        assert_eq!(registry.open(0), Err(CoreError::TableNotFound(0)));
        assert_eq!(registry.open(17), Err(CoreError::TableNotFound(17)));
        assert!(!registry.selectable(17, SelectionMode::Merge));
    }

    #[test]
    fn test_open_sets_defaults() {
        let mut registry = floor(&[]);
        assert!(registry.open_at(3, at(15)).unwrap());

        let table = registry.table(3).unwrap();
        assert_eq!(registry.status(3).unwrap(), TableStatus::Occupied);
        assert_eq!(table.guest_count(), 1);
        assert_eq!(table.order_time(), Some(at(15)));
        assert!(table.order().is_empty());
    }

    #[test]
    fn test_open_is_idempotent() {
        let mut once = floor(&[]);
        once.open_at(3, at(0)).unwrap();

        let mut twice = floor(&[]);
        twice.open_at(3, at(0)).unwrap();
        twice.order_mut(3).unwrap().add_product(&product(1, 45_000));
        once.order_mut(3).unwrap().add_product(&product(1, 45_000));

        assert!(!twice.open_at(3, at(10)).unwrap());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_close_plain_table() {
        let mut registry = floor(&[2]);
        registry.order_mut(2).unwrap().add_product(&product(1, 45_000));

        assert_eq!(registry.close(2).unwrap(), vec![2]);
        assert_eq!(registry.status(2).unwrap(), TableStatus::Available);
        assert!(registry.order(2).unwrap().is_empty());
        registry.assert_consistent();
    }

    #[test]
    fn test_merge_links_both_ways() {
        let mut registry = floor(&[3, 5, 6]);
        registry.merge(3, &[5, 6]).unwrap();

        assert_eq!(registry.status(3).unwrap(), TableStatus::Occupied);
        assert_eq!(registry.status(5).unwrap(), TableStatus::Merged);
        assert_eq!(registry.primary_of(6), Some(3));
        assert_eq!(registry.secondaries_of(3), vec![5, 6]);

        let view = registry.view(5).unwrap();
        assert_eq!(view.merged_with, Some(3));
        assert!(view.merged_tables.is_empty());
        assert_eq!(registry.view(3).unwrap().merged_tables, vec![5, 6]);
        registry.assert_consistent();
    }

    #[test]
    fn test_merge_primary_can_absorb_more() {
        let mut registry = floor(&[1, 2, 3]);
        registry.merge(1, &[2]).unwrap();
        registry.merge(1, &[3]).unwrap();
        assert_eq!(registry.secondaries_of(1), vec![2, 3]);
    }

    #[test]
    fn test_merge_rejections_leave_state_untouched() {
        let mut registry = floor(&[1, 2, 3, 4]);
        registry.merge(3, &[4]).unwrap();
        let before = registry.clone();

        // no secondaries
        assert!(registry.merge(1, &[]).is_err());
        // into itself
        assert!(registry.merge(1, &[1]).is_err());
        // duplicate secondary
        assert!(matches!(
            registry.merge(1, &[2, 2]),
            Err(CoreError::Validation(ValidationError::Duplicate { .. }))
        ));
        // available secondary, after a valid one
        assert!(registry.merge(1, &[2, 9]).is_err());
        // available primary
        assert!(registry.merge(9, &[1]).is_err());
        // secondary is already a primary (no nested groups)
        assert!(registry.merge(1, &[3]).is_err());
        // secondary already merged elsewhere
        assert!(registry.merge(1, &[4]).is_err());
        // primary is itself a secondary
        assert!(registry.merge(4, &[1]).is_err());
        // unknown table
        assert_eq!(registry.merge(1, &[2, 40]), Err(CoreError::TableNotFound(40)));

        assert_eq!(registry, before);
    }

    #[test]
    fn test_order_redirects_to_primary() {
        let mut registry = floor(&[3, 5]);
        registry.merge(3, &[5]).unwrap();

        registry.order_mut(5).unwrap().add_product(&product(1, 45_000));

        assert_eq!(registry.order(3).unwrap().item_count(), 1);
        assert_eq!(registry.order(5).unwrap().item_count(), 1);
        assert!(registry.table(5).unwrap().order().is_empty());
        assert_eq!(registry.resolve(5).unwrap(), 3);
    }

    #[test]
    fn test_order_mut_on_available_table() {
        let mut registry = floor(&[]);
        assert!(matches!(
            registry.order_mut(4),
            Err(CoreError::InvalidTransition { table_id: 4, .. })
        ));
    }

    #[test]
    fn test_merge_split_round_trip() {
        let mut registry = floor(&[1, 2, 3]);
        registry.order_mut(1).unwrap().add_product(&product(1, 45_000));
        registry.set_guest_count(1, 4).unwrap();
        registry.order_mut(2).unwrap().add_product(&product(2, 5_000));
        registry.set_guest_count(3, 2).unwrap();
        let before = registry.clone();

        registry.merge(1, &[2, 3]).unwrap();
        let freed = registry.split(&[1]).unwrap();

        assert_eq!(freed, vec![2, 3]);
        for id in [1, 2, 3] {
            assert_eq!(registry.status(id).unwrap(), TableStatus::Occupied);
            assert!(registry.primary_of(id).is_none());
            assert!(registry.secondaries_of(id).is_empty());
        }
        assert_eq!(registry, before);
    }

    #[test]
    fn test_split_single_secondary() {
        let mut registry = floor(&[1, 2, 3]);
        registry.merge(1, &[2, 3]).unwrap();
        let before = registry.clone();

        assert!(matches!(
            registry.split(&[2]),
            Err(CoreError::InvalidTransition { table_id: 2, .. })
        ));
        assert_eq!(registry.status(2).unwrap(), TableStatus::Merged);
        assert_eq!(registry.secondaries_of(1), vec![2, 3]);
        assert_eq!(registry, before);
    }

    #[test]
    fn test_split_secondary_with_its_primary() {
        let mut registry = floor(&[1, 2, 3]);
        registry.merge(1, &[2, 3]).unwrap();

        assert_eq!(registry.split(&[3, 1]).unwrap(), vec![2, 3]);
        assert!(registry.secondaries_of(1).is_empty());
        registry.assert_consistent();
    }

    #[test]
    fn test_split_without_links_fails() {
        let mut registry = floor(&[1, 2]);
        let before = registry.clone();

        assert!(matches!(
            registry.split(&[1, 2]),
            Err(CoreError::InvalidTransition { table_id: 1, .. })
        ));
        assert!(registry.split(&[]).is_err());
        assert_eq!(registry, before);
    }

    #[test]
    fn test_close_primary_cascades() {
        let mut registry = floor(&[1, 2, 3]);
        registry.order_mut(2).unwrap().add_product(&product(2, 5_000));
        registry.merge(1, &[2, 3]).unwrap();
        registry.order_mut(1).unwrap().add_product(&product(1, 45_000));

        let released = registry.close(1).unwrap();

        assert_eq!(released, vec![1, 2, 3]);
        for id in [1, 2, 3] {
            assert_eq!(registry.status(id).unwrap(), TableStatus::Available);
            assert!(registry.table(id).unwrap().order().is_empty());
        }
        assert_eq!(registry, floor(&[]));
    }

    #[test]
    fn test_close_secondary_leaves_primary() {
        let mut registry = floor(&[1, 2, 3]);
        registry.merge(1, &[2, 3]).unwrap();
        registry.order_mut(1).unwrap().add_product(&product(1, 45_000));

        assert_eq!(registry.close(2).unwrap(), vec![2]);
        assert_eq!(registry.status(2).unwrap(), TableStatus::Available);
        assert_eq!(registry.status(1).unwrap(), TableStatus::Occupied);
        assert_eq!(registry.secondaries_of(1), vec![3]);
        assert_eq!(registry.order(1).unwrap().item_count(), 1);
        registry.assert_consistent();
    }

    #[test]
    fn test_release_from_secondary_frees_group() {
        let mut registry = floor(&[1, 2]);
        registry.merge(1, &[2]).unwrap();

        assert_eq!(registry.release(2).unwrap(), vec![1, 2]);
        assert_eq!(registry.summary().available, 16);
    }

    #[test]
    fn test_selectable() {
        let mut registry = floor(&[1, 2, 3]);
        registry.merge(1, &[2]).unwrap();

        assert!(registry.selectable(1, SelectionMode::Merge));
        assert!(!registry.selectable(2, SelectionMode::Merge));
        assert!(registry.selectable(3, SelectionMode::Merge));
        assert!(!registry.selectable(4, SelectionMode::Merge));

        assert!(registry.selectable(1, SelectionMode::Split));
        assert!(registry.selectable(2, SelectionMode::Split));
        assert!(!registry.selectable(3, SelectionMode::Split));
        assert!(!registry.selectable(4, SelectionMode::Split));
    }

    #[test]
    fn test_guest_count() {
        let mut registry = floor(&[1]);
        registry.set_guest_count(1, 6).unwrap();
        assert_eq!(registry.table(1).unwrap().guest_count(), 6);

        assert!(registry.set_guest_count(1, 0).is_err());
        assert!(registry.set_guest_count(2, 2).is_err());
        assert_eq!(registry.table(1).unwrap().guest_count(), 6);
    }

    #[test]
    fn test_summary_counts_merged_as_occupied() {
        let mut registry = floor(&[1, 2, 3]);
        registry.merge(1, &[2]).unwrap();

        let summary = registry.summary();
        assert_eq!(summary.occupied, 3);
        assert_eq!(summary.available, 13);
    }

    #[test]
    fn test_views_cover_floor() {
        let registry = floor(&[4]);
        let views = registry.views();
        assert_eq!(views.len(), 16);
        assert_eq!(views[3].status, TableStatus::Occupied);
        assert_eq!(views[3].order_time, Some(at(0)));
    }

    #[test]
    fn test_selection_mode_from_str() {
        assert_eq!("Merge".parse::<SelectionMode>().unwrap(), SelectionMode::Merge);
        assert!("join".parse::<SelectionMode>().is_err());
    }
}
