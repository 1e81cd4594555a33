//! Cell edit errors

/// Errors from the cell edit state machine.
///
/// Validation failures are not exceptional: they keep the cell in edit mode
/// and carry the message shown next to the input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditError {
    /// The working value failed validation.
    #[error("{message}")]
    Invalid { column: String, message: String },

    /// The column is not editable.
    #[error("Column '{0}' is not editable")]
    NotEditable(String),

    /// No cell is currently being edited.
    #[error("No cell is being edited")]
    NotEditing,
}

impl EditError {
    /// Creates a new validation failure.
    pub fn invalid(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Returns the inline message for validation failures.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Invalid { message, .. } => Some(message),
            _ => None,
        }
    }
}
