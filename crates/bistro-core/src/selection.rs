//! # Table Selection
//!
//! Multi-table selection used by the floor's merge and split modes.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Merge mode                          Split mode                         │
//! │  ──────────                          ──────────                         │
//! │  toggle 3  → [3]                     toggle 3  → [3]     (primary)      │
//! │  toggle 5  → [3, 5]                  toggle 7  → [3, 7]  (secondary)    │
//! │  toggle 6  → [3, 5, 6]               confirm   → split([3, 7])          │
//! │  confirm   → merge(3, [5, 6])                                           │
//! │              ▲                                                          │
//! │              └── first selected table is the primary                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreResult;
use crate::registry::{SelectionMode, TableRegistry};
use crate::types::TableId;
use crate::validation::{validate_merge_selection, validate_split_selection};

/// An in-progress selection, in the order tables were picked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TableSelection {
    pub mode: SelectionMode,
    selected: Vec<TableId>,
}

impl TableSelection {
    pub fn new(mode: SelectionMode) -> Self {
        TableSelection {
            mode,
            selected: Vec::new(),
        }
    }

    pub fn selected(&self) -> &[TableId] {
        &self.selected
    }

    /// Adds or removes `id`. Returns whether `id` is selected afterwards.
    ///
    /// Tables that are not selectable in the current mode are ignored;
    /// deselecting is always allowed.
    pub fn toggle(&mut self, registry: &TableRegistry, id: TableId) -> bool {
        if let Some(pos) = self.selected.iter().position(|t| *t == id) {
            self.selected.remove(pos);
            return false;
        }

        if registry.selectable(id, self.mode) {
            self.selected.push(id);
            true
        } else {
            false
        }
    }

    /// Applies the selection to the registry.
    ///
    /// Merge mode needs at least two tables; split mode at least one.
    /// Returns the tables whose links changed. The selection is cleared on
    /// success and kept on failure so it can be corrected.
    pub fn confirm(&mut self, registry: &mut TableRegistry) -> CoreResult<Vec<TableId>> {
        let affected = match self.mode {
            SelectionMode::Merge => {
                validate_merge_selection(self.selected.len())?;
                let (primary, secondaries) = (self.selected[0], &self.selected[1..]);
                registry.merge(primary, secondaries)?;
                self.selected.clone()
            }
            SelectionMode::Split => {
                validate_split_selection(self.selected.len())?;
                registry.split(&self.selected)?
            }
        };

        self.selected.clear();
        Ok(affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::table::TableStatus;

    fn floor(open: &[TableId]) -> TableRegistry {
        let mut registry = TableRegistry::new(16).unwrap();
        for id in open {
            registry.open(*id).unwrap();
        }
        registry
    }

    #[test]
    fn test_merge_first_selected_is_primary() {
        let mut registry = floor(&[3, 5, 6]);
        let mut selection = TableSelection::new(SelectionMode::Merge);

        assert!(selection.toggle(&registry, 5));
        assert!(selection.toggle(&registry, 3));
        assert!(selection.toggle(&registry, 6));

        assert_eq!(selection.confirm(&mut registry).unwrap(), vec![5, 3, 6]);
        assert_eq!(registry.secondaries_of(5), vec![3, 6]);
        assert!(selection.selected().is_empty());
    }

    #[test]
    fn test_toggle_ignores_unselectable_tables() {
        let registry = floor(&[1]);
        let mut selection = TableSelection::new(SelectionMode::Merge);

        assert!(!selection.toggle(&registry, 2));
        assert!(!selection.toggle(&registry, 99));
        assert!(selection.selected().is_empty());
    }

    #[test]
    fn test_toggle_twice_deselects() {
        let registry = floor(&[1]);
        let mut selection = TableSelection::new(SelectionMode::Merge);

        assert!(selection.toggle(&registry, 1));
        assert!(!selection.toggle(&registry, 1));
        assert!(selection.selected().is_empty());
    }

    #[test]
    fn test_merge_needs_two_tables() {
        let mut registry = floor(&[1]);
        let mut selection = TableSelection::new(SelectionMode::Merge);
        selection.toggle(&registry, 1);

        assert!(matches!(
            selection.confirm(&mut registry),
            Err(CoreError::Validation(_))
        ));
        assert_eq!(selection.selected(), &[1]);
        assert_eq!(registry.status(1).unwrap(), TableStatus::Occupied);
    }

    #[test]
    fn test_split_selection() {
        let mut registry = floor(&[1, 2, 3]);
        registry.merge(1, &[2, 3]).unwrap();

        let mut selection = TableSelection::new(SelectionMode::Split);
        assert!(!selection.toggle(&registry, 4));
        assert!(selection.toggle(&registry, 1));

        assert_eq!(selection.confirm(&mut registry).unwrap(), vec![2, 3]);
        assert!(!registry.is_primary(1));
    }

    #[test]
    fn test_split_of_secondary_alone_is_kept() {
        let mut registry = floor(&[1, 2, 3]);
        registry.merge(1, &[2, 3]).unwrap();

        let mut selection = TableSelection::new(SelectionMode::Split);
        assert!(selection.toggle(&registry, 2));

        assert!(matches!(
            selection.confirm(&mut registry),
            Err(CoreError::InvalidTransition { table_id: 2, .. })
        ));
        assert_eq!(selection.selected(), &[2]);
        assert_eq!(registry.secondaries_of(1), vec![2, 3]);
    }

    #[test]
    fn test_split_needs_one_table() {
        let mut registry = floor(&[]);
        let mut selection = TableSelection::new(SelectionMode::Split);
        assert!(selection.confirm(&mut registry).is_err());
    }
}
