//! Field schema for dynamic rows

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;
use serde::Serialize;

use super::Row;
use super::Value;
use super::value::parse_date;
use crate::column::Column;
use crate::error::TableError;

/// Semantic type of a row field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Number,
    Decimal,
    Bool,
    Date,
    List,
    Object,
}

/// A known field and its semantic type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub kind: FieldKind,
}

/// Explicit list of the fields a row collection carries.
///
/// Raw rows arrive as untyped JSON, where dates are strings and money
/// amounts are floats. A schema coerces them into [`Value::Date`] and
/// [`Value::Decimal`] so sorting and filtering see the real types, and lets
/// a table check that every declared column lines up with a known field.
///
/// # Example
///
/// ```
/// use dataframe_lib::model::{FieldKind, Row, Schema, Value};
///
/// let schema = Schema::new()
///     .field("id", FieldKind::Text)
///     .field("created", FieldKind::Date);
///
/// let row = schema.coerce_row(Row::new().set("id", "o-1").set("created", "2024-02-01"));
/// assert!(matches!(row.get("created"), Some(Value::Date(_))));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    fields: Vec<FieldDescriptor>,
}

impl Schema {
    /// Creates an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field (builder pattern).
    pub fn field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push(FieldDescriptor {
            name: name.into(),
            kind,
        });
        self
    }

    /// Returns all field descriptors in declaration order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Looks up a field descriptor by name.
    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns `true` if the schema declares the field.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Coerces every declared field of a row into its semantic type.
    ///
    /// Values that cannot be converted are kept as they are; undeclared
    /// fields pass through untouched.
    pub fn coerce_row(&self, mut row: Row) -> Row {
        for descriptor in &self.fields {
            if let Some(value) = row.fields.remove(&descriptor.name) {
                row.fields
                    .insert(descriptor.name.clone(), coerce_value(descriptor.kind, value));
            }
        }
        row
    }

    /// Coerces a whole collection.
    pub fn coerce_rows(&self, rows: Vec<Row>) -> Vec<Row> {
        rows.into_iter().map(|row| self.coerce_row(row)).collect()
    }

    /// Checks that every non-synthetic column names a declared field.
    pub fn check_columns(&self, columns: &[Column]) -> Result<(), TableError> {
        for column in columns {
            if !column.synthetic && !self.contains(&column.id) {
                return Err(TableError::UnknownField {
                    column: column.id.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Converts a single value into the given semantic type, when possible.
pub fn coerce_value(kind: FieldKind, value: Value) -> Value {
    match (kind, value) {
        (_, Value::Null) => Value::Null,
        (FieldKind::Date, Value::String(s)) => match parse_date(&s) {
            Some(date) => Value::Date(date),
            None => Value::String(s),
        },
        (FieldKind::Decimal, Value::Int(n)) => Value::Decimal(Decimal::from(n)),
        (FieldKind::Decimal, Value::Float(n)) => Decimal::try_from(n)
            .map(Value::Decimal)
            .unwrap_or(Value::Float(n)),
        (FieldKind::Decimal, Value::String(s)) => match Decimal::from_str(s.trim()) {
            Ok(d) => Value::Decimal(d),
            Err(_) => Value::String(s),
        },
        (FieldKind::Number, Value::String(s)) => {
            let trimmed = s.trim();
            if let Ok(n) = trimmed.parse::<i64>() {
                Value::Int(n)
            } else if let Ok(n) = trimmed.parse::<f64>() {
                Value::Float(n)
            } else {
                Value::String(s)
            }
        }
        (FieldKind::Bool, Value::String(s)) => match s.trim().to_lowercase().as_str() {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => Value::String(s),
        },
        (FieldKind::Text, v @ (Value::Int(_) | Value::Float(_) | Value::Bool(_))) => {
            Value::String(v.to_text())
        }
        (_, v) => v,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_decimal_and_number() {
        let schema = Schema::new()
            .field("amount", FieldKind::Decimal)
            .field("qty", FieldKind::Number)
            .field("sku", FieldKind::Text);

        let row = schema.coerce_row(
            Row::new()
                .set("amount", "19.99")
                .set("qty", "4")
                .set("sku", 1001i64)
                .set("other", "kept"),
        );

        assert_eq!(row.get_decimal("amount").unwrap(), Some(Decimal::new(1999, 2)));
        assert_eq!(row.get_int("qty").unwrap(), Some(4));
        assert_eq!(row.get_string("sku").unwrap(), Some("1001"));
        assert_eq!(row.get_string("other").unwrap(), Some("kept"));
    }

    #[test]
    fn test_unparseable_values_are_kept() {
        let schema = Schema::new().field("created", FieldKind::Date);
        let row = schema.coerce_row(Row::new().set("created", "soon"));
        assert_eq!(row.get_string("created").unwrap(), Some("soon"));
    }

    #[test]
    fn test_check_columns() {
        let schema = Schema::new().field("name", FieldKind::Text);
        let ok = vec![Column::new("name", "Name"), Column::new("actions", "").synthetic()];
        assert!(schema.check_columns(&ok).is_ok());

        let bad = vec![Column::new("price", "Price")];
        assert_eq!(
            schema.check_columns(&bad),
            Err(TableError::UnknownField {
                column: "price".into()
            })
        );
    }
}
