//! Cell edit state machine.

use log::debug;
use log::warn;

use super::validation::edit_text;
use super::validation::validate_input;
use crate::column::Column;
use crate::error::EditError;
use crate::model::Row;
use crate::model::RowId;
use crate::model::Value;

/// The cell currently in edit mode.
#[derive(Debug, Clone, PartialEq)]
pub struct EditingCell {
    /// Row being edited.
    pub row_id: RowId,
    /// Column being edited.
    pub column_id: String,
    /// Value the cell showed when editing began.
    pub original: Value,
    /// Uncommitted input text.
    pub working: String,
    /// Inline validation message from the last failed commit.
    pub error: Option<String>,
}

/// Edit state of a table.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EditState {
    /// No cell is being edited.
    #[default]
    Display,
    /// One cell is being edited.
    Editing(EditingCell),
}

/// Keys the editor reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKey {
    /// Enter commits unless shift is held.
    Enter { shift: bool },
    /// Escape cancels.
    Escape,
    /// Any other key.
    Other,
}

/// Result of an editor transition.
#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    /// Editing began. `abandoned` holds a previous uncommitted edit that was
    /// discarded to make room.
    Started { abandoned: Option<EditingCell> },
    /// The value passed validation and the commit handler ran.
    Committed {
        row_id: RowId,
        column_id: String,
        value: Value,
    },
    /// Validation failed; the cell stays in edit mode.
    Rejected { message: String },
    /// The edit was discarded; `original` is what the cell shows again.
    Cancelled {
        row_id: RowId,
        column_id: String,
        original: Value,
    },
    /// Nothing happened.
    Ignored,
}

/// Single-cell edit state machine.
///
/// `Display → Editing` on [`begin`](Self::begin); `Editing → Display` on a
/// successful [`commit`](Self::commit) or on [`cancel`](Self::cancel).
/// Starting an edit while another cell is editing abandons the other edit.
#[derive(Debug, Default)]
pub struct CellEditor {
    state: EditState,
}

impl CellEditor {
    /// Create an editor in display state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current state.
    pub fn state(&self) -> &EditState {
        &self.state
    }

    /// Get the cell being edited, if any.
    pub fn editing(&self) -> Option<&EditingCell> {
        match &self.state {
            EditState::Editing(cell) => Some(cell),
            EditState::Display => None,
        }
    }

    /// Check if any cell is being edited.
    pub fn is_editing(&self) -> bool {
        matches!(self.state, EditState::Editing(_))
    }

    /// Check if the given cell is being edited.
    pub fn is_editing_cell(&self, row_id: &str, column_id: &str) -> bool {
        self.editing()
            .is_some_and(|c| c.row_id == row_id && c.column_id == column_id)
    }

    /// Start editing a cell, capturing its current value as the working copy.
    pub fn begin(
        &mut self,
        row_id: &str,
        column: &Column,
        row: &Row,
    ) -> Result<EditOutcome, EditError> {
        let edit = column
            .edit
            .as_ref()
            .ok_or_else(|| EditError::NotEditable(column.id.clone()))?;

        if self.is_editing_cell(row_id, &column.id) {
            return Ok(EditOutcome::Ignored);
        }

        let original = row.get(&column.id).cloned().unwrap_or_default();
        let abandoned = self.abandon();
        if let Some(prev) = &abandoned {
            debug!(
                "[edit] abandoning uncommitted edit of {}/{}",
                prev.row_id, prev.column_id
            );
        }

        debug!("[edit] begin {}/{}", row_id, column.id);
        self.state = EditState::Editing(EditingCell {
            row_id: row_id.to_string(),
            column_id: column.id.clone(),
            working: edit_text(edit.kind, &original),
            original,
            error: None,
        });

        Ok(EditOutcome::Started { abandoned })
    }

    /// Replace the working text. Clears a previous validation message.
    pub fn input(&mut self, text: impl Into<String>) -> Result<(), EditError> {
        match &mut self.state {
            EditState::Editing(cell) => {
                cell.working = text.into();
                cell.error = None;
                Ok(())
            }
            EditState::Display => Err(EditError::NotEditing),
        }
    }

    /// React to a key press.
    pub fn key(&mut self, key: EditKey, columns: &[Column]) -> EditOutcome {
        if !self.is_editing() {
            return EditOutcome::Ignored;
        }
        match key {
            EditKey::Enter { shift: false } => match self.commit(columns) {
                Ok(outcome) => outcome,
                Err(EditError::Invalid { message, .. }) => EditOutcome::Rejected { message },
                Err(_) => EditOutcome::Ignored,
            },
            EditKey::Escape => self.cancel(),
            EditKey::Enter { shift: true } | EditKey::Other => EditOutcome::Ignored,
        }
    }

    /// Validate, convert and commit the working value.
    ///
    /// On success the column's commit handler runs exactly once and the
    /// editor returns to display state. On validation failure the editor
    /// stays in edit mode with the message recorded on the cell.
    pub fn commit(&mut self, columns: &[Column]) -> Result<EditOutcome, EditError> {
        let cell = self.editing().ok_or(EditError::NotEditing)?;

        let Some(edit) = columns
            .iter()
            .find(|c| c.id == cell.column_id)
            .and_then(|c| c.edit.as_ref())
        else {
            let column_id = cell.column_id.clone();
            warn!("[edit] column {column_id} is no longer editable, dropping edit");
            self.state = EditState::Display;
            return Err(EditError::NotEditable(column_id));
        };

        match validate_input(edit, &cell.working) {
            Ok(value) => {
                let row_id = cell.row_id.clone();
                let column_id = cell.column_id.clone();
                let on_commit = edit.on_commit.clone();
                self.state = EditState::Display;

                debug!("[edit] commit {row_id}/{column_id} = {value:?}");
                if let Some(handler) = on_commit {
                    handler(&row_id, &value);
                }
                Ok(EditOutcome::Committed {
                    row_id,
                    column_id,
                    value,
                })
            }
            Err(message) => {
                let column_id = cell.column_id.clone();
                if let EditState::Editing(cell) = &mut self.state {
                    cell.error = Some(message.clone());
                }
                Err(EditError::invalid(column_id, message))
            }
        }
    }

    /// Discard the working value and return to display state.
    pub fn cancel(&mut self) -> EditOutcome {
        match self.abandon() {
            Some(cell) => {
                debug!("[edit] cancel {}/{}", cell.row_id, cell.column_id);
                EditOutcome::Cancelled {
                    row_id: cell.row_id,
                    column_id: cell.column_id,
                    original: cell.original,
                }
            }
            None => EditOutcome::Ignored,
        }
    }

    /// Drop any edit in progress without notifying anyone.
    pub fn abandon(&mut self) -> Option<EditingCell> {
        match std::mem::take(&mut self.state) {
            EditState::Editing(cell) => Some(cell),
            EditState::Display => None,
        }
    }
}
