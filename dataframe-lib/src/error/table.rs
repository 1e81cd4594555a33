//! Table construction and configuration errors

/// Errors raised while assembling a data set or a table.
///
/// None of these are raised by the pipeline, selection or staging logic,
/// which degrade gracefully on malformed rows instead.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TableError {
    /// A row has no value (or a null value) for the identity field.
    #[error("Row {index} has no value for id field '{id_field}'")]
    MissingId { id_field: String, index: usize },

    /// Two rows share the same identity value.
    #[error("Duplicate id '{id}' in field '{id_field}'")]
    DuplicateId { id_field: String, id: String },

    /// A column, sort or filter refers to a column that is not declared.
    #[error("Unknown column '{0}'")]
    UnknownColumn(String),

    /// A column refers to a field the schema does not know about.
    #[error("Column '{column}' does not match any schema field")]
    UnknownField { column: String },

    /// A row or bulk action id is not declared on the table.
    #[error("Unknown action '{0}'")]
    UnknownAction(String),

    /// A row id is not part of the current data set.
    #[error("Unknown row '{0}'")]
    UnknownRow(String),

    /// A bulk action was requested with nothing selected.
    #[error("No rows selected")]
    EmptySelection,

    /// Invalid table configuration document.
    #[error("Invalid table configuration: {0}")]
    Config(String),

    /// Row data could not be parsed.
    #[error("Invalid row data: {0}")]
    Data(String),

    /// A cell edit failed.
    #[error(transparent)]
    Edit(#[from] super::EditError),
}

impl TableError {
    /// Creates a new unknown column error.
    pub fn unknown_column(column: impl Into<String>) -> Self {
        Self::UnknownColumn(column.into())
    }

    /// Creates a new configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

impl From<serde_json::Error> for TableError {
    fn from(err: serde_json::Error) -> Self {
        Self::Data(err.to_string())
    }
}
