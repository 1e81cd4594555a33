//! Cell editing.
//!
//! A table has at most one cell in edit mode. [`CellEditor`] owns that
//! state machine; [`Rules`] describes what a working value must satisfy
//! before it is converted and handed to the column's commit handler.
//!
//! # Example
//!
//! ```
//! use dataframe_lib::column::{Column, EditType};
//! use dataframe_lib::edit::{CellEditor, EditOutcome, Rules};
//! use dataframe_lib::model::{Row, Value};
//!
//! let columns = vec![
//!     Column::new("qty", "Qty")
//!         .editable(EditType::Number)
//!         .rules(Rules::new().min(1.0, "At least one")),
//! ];
//! let row = Row::new().set("id", "o-1").set("qty", 5i64);
//!
//! let mut editor = CellEditor::new();
//! editor.begin("o-1", &columns[0], &row).unwrap();
//! editor.input("12").unwrap();
//! let outcome = editor.commit(&columns).unwrap();
//! assert!(matches!(outcome, EditOutcome::Committed { value: Value::Int(12), .. }));
//! ```

mod state;
mod validation;

pub use state::{CellEditor, EditKey, EditOutcome, EditState, EditingCell};
pub use validation::{Rules, edit_text, validate_input};
