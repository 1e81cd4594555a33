//! Typed cell access errors

/// Error returned by the typed getters on a [`Row`](crate::model::Row).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FieldError {
    /// The row has no value under this column id.
    #[error("Row has no value for column '{field}'")]
    Missing { field: String },

    /// The cell holds a value of another kind.
    #[error("Column '{field}' holds {actual}, not {expected}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        actual: &'static str,
    },
}

impl FieldError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self::Missing {
            field: field.into(),
        }
    }

    /// `actual` is the [`Value::type_name`](crate::model::Value::type_name)
    /// of the cell that was found.
    pub fn type_mismatch(
        field: impl Into<String>,
        expected: &'static str,
        actual: &'static str,
    ) -> Self {
        Self::TypeMismatch {
            field: field.into(),
            expected,
            actual,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_column() {
        assert_eq!(
            FieldError::missing("price").to_string(),
            "Row has no value for column 'price'"
        );
        assert_eq!(
            FieldError::type_mismatch("qty", "int", "string").to_string(),
            "Column 'qty' holds string, not int"
        );
    }
}
