//! Data-change intents emitted by actions.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;

use crate::model::Row;
use crate::model::RowId;
use crate::model::Value;

/// A change the caller should apply to its row collection.
///
/// The engine never mutates caller data; default action behaviors describe
/// their effect as intents and hand them to an [`IntentSink`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum DataIntent {
    /// Remove the rows with these ids.
    Remove { ids: Vec<RowId> },
    /// Set one field on the rows with these ids.
    SetField {
        ids: Vec<RowId>,
        field: String,
        value: Value,
    },
    /// Append a new row.
    Append { row: Row },
}

impl DataIntent {
    /// Applies the intent to an owned row list.
    ///
    /// A convenience for callers that keep their rows in a `Vec`.
    pub fn apply(&self, rows: &mut Vec<Row>, id_field: &str) {
        match self {
            DataIntent::Remove { ids } => {
                rows.retain(|row| !ids.contains(&row.text(id_field)));
            }
            DataIntent::SetField { ids, field, value } => {
                for row in rows.iter_mut().filter(|r| ids.contains(&r.text(id_field))) {
                    row.insert(field.clone(), value.clone());
                }
            }
            DataIntent::Append { row } => rows.push(row.clone()),
        }
    }
}

/// Receives intents emitted by actions.
pub trait IntentSink {
    fn emit(&self, intent: DataIntent);
}

impl<F> IntentSink for F
where
    F: Fn(DataIntent),
{
    fn emit(&self, intent: DataIntent) {
        self(intent)
    }
}

/// Sink that records intents for later inspection.
#[derive(Debug, Clone, Default)]
pub struct IntentLog {
    intents: Rc<RefCell<Vec<DataIntent>>>,
}

impl IntentLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the recorded intents, leaving the log empty.
    pub fn take(&self) -> Vec<DataIntent> {
        std::mem::take(&mut *self.intents.borrow_mut())
    }

    pub fn len(&self) -> usize {
        self.intents.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.intents.borrow().is_empty()
    }
}

impl IntentSink for IntentLog {
    fn emit(&self, intent: DataIntent) {
        self.intents.borrow_mut().push(intent);
    }
}
