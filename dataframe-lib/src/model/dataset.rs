//! Identity-checked row collection

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use super::Row;
use crate::error::TableError;

/// Row identity value, compared by its string form.
pub type RowId = String;

/// Identity of one supplied row collection.
///
/// Every call to [`DataSet::new`] mints a fresh generation; clones share it.
/// Selection and editing state compare generations to tell a refetch (new
/// collection) from a re-render of the same one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(u64);

impl Generation {
    fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Display for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "gen-{}", self.0)
    }
}

/// A row collection with a designated identity field.
///
/// The engine never mutates a data set. Callers replace it wholesale after
/// applying the intents the table emits.
///
/// # Example
///
/// ```
/// use dataframe_lib::model::{DataSet, Row};
///
/// let data = DataSet::new("id", vec![
///     Row::new().set("id", "p-1").set("name", "Widget"),
///     Row::new().set("id", "p-2").set("name", "Gadget"),
/// ]).unwrap();
///
/// assert_eq!(data.get("p-2").unwrap().text("name"), "Gadget");
/// ```
#[derive(Debug, Clone)]
pub struct DataSet {
    id_field: String,
    rows: Arc<Vec<Row>>,
    index: Arc<HashMap<RowId, usize>>,
    generation: Generation,
}

impl DataSet {
    /// Creates a data set, checking that every row has a unique, non-null id.
    pub fn new(id_field: impl Into<String>, rows: Vec<Row>) -> Result<Self, TableError> {
        let id_field = id_field.into();
        let mut index = HashMap::with_capacity(rows.len());

        for (i, row) in rows.iter().enumerate() {
            let id = match row.present(&id_field) {
                Some(value) => value.to_text(),
                None => {
                    return Err(TableError::MissingId {
                        id_field: id_field.clone(),
                        index: i,
                    });
                }
            };
            if index.insert(id.clone(), i).is_some() {
                return Err(TableError::DuplicateId {
                    id_field: id_field.clone(),
                    id,
                });
            }
        }

        Ok(Self {
            id_field,
            rows: Arc::new(rows),
            index: Arc::new(index),
            generation: Generation::next(),
        })
    }

    /// Creates an empty data set.
    pub fn empty(id_field: impl Into<String>) -> Self {
        Self {
            id_field: id_field.into(),
            rows: Arc::new(Vec::new()),
            index: Arc::new(HashMap::new()),
            generation: Generation::next(),
        }
    }

    /// Parses a JSON array of objects.
    pub fn from_json(id_field: impl Into<String>, json: &str) -> Result<Self, TableError> {
        let rows: Vec<Row> = serde_json::from_str(json)?;
        Self::new(id_field, rows)
    }

    /// Returns the identity field name.
    pub fn id_field(&self) -> &str {
        &self.id_field
    }

    /// Returns the rows in caller order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the generation of this collection.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Finds a row by id.
    pub fn get(&self, id: &str) -> Option<&Row> {
        self.index.get(id).and_then(|&i| self.rows.get(i))
    }

    /// Returns `true` if a row with the id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Returns the id of a row in this collection's terms.
    pub fn row_id(&self, row: &Row) -> RowId {
        row.text(&self.id_field)
    }

    /// Returns all row ids in caller order.
    pub fn ids(&self) -> Vec<RowId> {
        self.rows.iter().map(|row| self.row_id(row)).collect()
    }

    /// Clones the rows out, for handing to the caller's own mutation logic.
    pub fn to_vec(&self) -> Vec<Row> {
        self.rows.as_ref().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Value;

    #[test]
    fn test_missing_id_is_rejected() {
        let rows = vec![
            Row::new().set("id", "a"),
            Row::new().set("id", Value::Null),
        ];
        assert_eq!(
            DataSet::new("id", rows).unwrap_err(),
            TableError::MissingId {
                id_field: "id".into(),
                index: 1
            }
        );
    }

    #[test]
    fn test_duplicate_id_is_rejected() {
        let rows = vec![Row::new().set("id", 7i64), Row::new().set("id", "7")];
        assert!(matches!(
            DataSet::new("id", rows),
            Err(TableError::DuplicateId { .. })
        ));
    }

    #[test]
    fn test_generations() {
        let a = DataSet::new("id", vec![Row::new().set("id", "x")]).unwrap();
        let b = DataSet::new("id", vec![Row::new().set("id", "x")]).unwrap();
        assert_eq!(a.generation(), a.clone().generation());
        assert_ne!(a.generation(), b.generation());
    }

    #[test]
    fn test_from_json() {
        let data = DataSet::from_json("sku", r#"[{"sku": "A-1"}, {"sku": "A-2"}]"#).unwrap();
        assert_eq!(data.ids(), vec!["A-1".to_string(), "A-2".to_string()]);
        assert!(DataSet::from_json("sku", "{").is_err());
    }
}
