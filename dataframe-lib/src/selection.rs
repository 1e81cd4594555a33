//! Row selection state.
//!
//! Selection is tracked by row id, so it survives sorting, filtering and
//! paging. It is tied to the [`Generation`] of the data set it was made on:
//! a new collection clears it, a re-render of the same one does not.

use std::collections::HashSet;

use log::debug;
use serde::Deserialize;
use serde::Serialize;

use crate::model::Generation;
use crate::model::RowId;

/// How many rows can be selected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// No selection allowed
    None,
    /// Selecting a row replaces the selection
    Single,
    /// Any number of rows
    #[default]
    Multiple,
}

/// Which rows "select all" selects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectAllScope {
    /// Every row passing filters and search, across all pages.
    #[default]
    Filtered,
    /// Only the rows on the current page.
    Page,
}

/// Ids added to and removed from a selection by one operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionChange {
    pub added: Vec<RowId>,
    pub removed: Vec<RowId>,
}

impl SelectionChange {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Id-based selection state.
///
/// # Example
///
/// ```
/// use dataframe_lib::selection::{Selection, SelectionMode};
///
/// let mut selection = Selection::new(SelectionMode::Multiple);
/// selection.toggle("b");
/// selection.toggle("a");
/// assert_eq!(selection.selected(), ["a", "b"]);
///
/// let change = selection.toggle("a");
/// assert_eq!(change.removed, ["a"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    mode: SelectionMode,
    selected: HashSet<RowId>,
    generation: Option<Generation>,
}

impl Selection {
    /// Create an empty selection.
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Get all selected ids, sorted.
    pub fn selected(&self) -> Vec<RowId> {
        let mut ids: Vec<_> = self.selected.iter().cloned().collect();
        ids.sort();
        ids
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Returns `true` if every id in `ids` is selected and `ids` is not empty.
    pub fn all_selected(&self, ids: &[RowId]) -> bool {
        !ids.is_empty() && ids.iter().all(|id| self.selected.contains(id))
    }

    /// Clear the selection.
    pub fn clear(&mut self) -> SelectionChange {
        let mut removed: Vec<_> = self.selected.drain().collect();
        removed.sort();
        SelectionChange {
            added: Vec::new(),
            removed,
        }
    }

    /// Select one id, replacing the rest.
    pub fn select(&mut self, id: &str) -> SelectionChange {
        if self.mode == SelectionMode::None {
            return SelectionChange::default();
        }
        let mut removed: Vec<_> = self.selected.iter().filter(|&i| i != id).cloned().collect();
        removed.sort();
        let was_selected = self.selected.contains(id);
        self.selected.clear();
        self.selected.insert(id.to_string());
        SelectionChange {
            added: if was_selected { vec![] } else { vec![id.to_string()] },
            removed,
        }
    }

    /// Toggle one id. In single mode, selecting replaces the selection.
    pub fn toggle(&mut self, id: &str) -> SelectionChange {
        match self.mode {
            SelectionMode::None => SelectionChange::default(),
            _ if self.selected.remove(id) => SelectionChange {
                added: vec![],
                removed: vec![id.to_string()],
            },
            SelectionMode::Single => self.select(id),
            SelectionMode::Multiple => {
                self.selected.insert(id.to_string());
                SelectionChange {
                    added: vec![id.to_string()],
                    removed: vec![],
                }
            }
        }
    }

    /// The "select all" checkbox. Replaces the selection with exactly
    /// `visible`, or clears it when every visible id is already selected.
    ///
    /// Ids selected outside `visible` are dropped either way and reported
    /// in [`SelectionChange::removed`]. Only multiple mode selects all.
    pub fn set_all(&mut self, visible: &[RowId]) -> SelectionChange {
        if self.mode != SelectionMode::Multiple {
            return SelectionChange::default();
        }
        if self.all_selected(visible) {
            return self.clear();
        }

        let keep: HashSet<&str> = visible.iter().map(String::as_str).collect();
        let mut removed: Vec<_> = self
            .selected
            .iter()
            .filter(|id| !keep.contains(id.as_str()))
            .cloned()
            .collect();
        removed.sort();
        for id in &removed {
            self.selected.remove(id);
        }
        let added = visible
            .iter()
            .filter(|id| self.selected.insert((*id).clone()))
            .cloned()
            .collect();
        SelectionChange { added, removed }
    }

    /// Binds the selection to a data generation.
    ///
    /// A different generation clears the selection; the same one keeps it.
    pub fn reconcile(&mut self, generation: Generation) -> SelectionChange {
        match self.generation.replace(generation) {
            Some(previous) if previous == generation => SelectionChange::default(),
            Some(previous) => {
                debug!("[selection] data changed ({previous} -> {generation}), clearing");
                self.clear()
            }
            None => SelectionChange::default(),
        }
    }
}
