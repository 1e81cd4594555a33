//! Render model produced by the table.

use serde::Serialize;

use super::detail::DetailView;
use crate::column::Alignment;
use crate::column::EditType;
use crate::model::RowId;
use crate::query::ActiveFilter;
use crate::query::Direction;
use crate::query::PageInfo;
use crate::staging::StagingSummary;

/// What the table body shows.
///
/// Loading wins over empty, which wins over rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "text", rename_all = "lowercase")]
pub enum TableState {
    Loading,
    Empty(String),
    Populated,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderView {
    pub id: String,
    pub title: String,
    pub align: Alignment,
    pub sortable: bool,
    /// Set on the column the table is sorted by.
    pub sorted: Option<Direction>,
}

/// The input shown in place of a cell being edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditorView {
    pub kind: EditType,
    pub working: String,
    pub options: Vec<String>,
    pub error: Option<String>,
    pub autofocus: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellView {
    pub column_id: String,
    pub text: String,
    pub align: Alignment,
    pub editable: bool,
    pub editor: Option<EditorView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionView {
    pub id: String,
    pub label: String,
    pub destructive: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowView {
    pub id: RowId,
    pub selected: bool,
    pub cells: Vec<CellView>,
    /// Row actions not disabled for this row.
    pub actions: Vec<ActionView>,
}

/// Everything needed to draw the table once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableView {
    pub state: TableState,
    pub headers: Vec<HeaderView>,
    pub rows: Vec<RowView>,
    /// Footer; `None` when pagination is off.
    pub page: Option<PageInfo>,
    pub page_size_options: Vec<usize>,
    pub search_term: Option<String>,
    pub active_filters: Vec<ActiveFilter>,
    pub selectable: bool,
    pub selected_count: usize,
    /// The "select all" checkbox state over the select-all scope.
    pub all_selected: bool,
    /// Bulk actions, shown while something is selected.
    pub bulk_actions: Vec<ActionView>,
    /// Hidden column ids with their titles, for the column toggle menu.
    pub hidden_columns: Vec<(String, String)>,
    pub staged: Option<StagingSummary>,
    pub awaiting_confirmation: bool,
    pub detail: Option<DetailView>,
    pub export_formats: Vec<String>,
}

impl TableView {
    /// Returns the display text of every visible cell, row by row.
    pub fn grid(&self) -> Vec<Vec<&str>> {
        self.rows
            .iter()
            .map(|row| row.cells.iter().map(|c| c.text.as_str()).collect())
            .collect()
    }

    /// Ids of the rows shown.
    pub fn row_ids(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.id.as_str()).collect()
    }
}
