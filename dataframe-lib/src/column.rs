//! Column declarations.

use std::rc::Rc;

use serde::Deserialize;
use serde::Serialize;

use crate::edit::Rules;
use crate::model::Row;
use crate::model::Value;

/// Custom cell renderer: `(value, row) -> display text`.
pub type CellRenderer = Rc<dyn Fn(&Value, &Row) -> String>;

/// Per-column edit commit handler: `(row_id, new_value)`.
pub type CommitHandler = Rc<dyn Fn(&str, &Value)>;

/// Horizontal alignment for column content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// What a click on a (non-editable) cell does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClickBehavior {
    /// Clicks are ignored.
    #[default]
    None,
    /// Clicks toggle row selection.
    Select,
    /// Clicks open the detail modal for the row.
    Detail,
}

/// Input affordance used while a cell is being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditType {
    #[default]
    Text,
    Number,
    Select,
    Date,
}

/// Edit configuration of an editable column.
#[derive(Clone, Default)]
pub struct ColumnEdit {
    /// Input type, which also decides the committed value's type.
    pub kind: EditType,
    /// Allowed values for [`EditType::Select`].
    pub options: Vec<String>,
    /// Validation rules run on commit.
    pub rules: Rules,
    /// Handler invoked once per successful commit.
    pub on_commit: Option<CommitHandler>,
}

impl std::fmt::Debug for ColumnEdit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColumnEdit")
            .field("kind", &self.kind)
            .field("options", &self.options)
            .field("rules", &self.rules)
            .field("on_commit", &self.on_commit.is_some())
            .finish()
    }
}

/// Column configuration.
///
/// A column names a row field (or a synthetic key such as `actions`),
/// carries its header title and decides how cells are shown, sorted,
/// clicked and edited.
///
/// # Examples
///
/// ```
/// use dataframe_lib::column::{Alignment, Column, EditType};
///
/// let columns = vec![
///     Column::new("id", "Order #"),
///     Column::new("customer", "Customer").sortable(),
///     Column::new("amount", "Amount")
///         .sortable()
///         .align(Alignment::Right)
///         .editable(EditType::Number),
/// ];
/// assert!(columns[2].is_editable());
/// ```
#[derive(Clone)]
pub struct Column {
    /// Field name, or a synthetic key.
    pub id: String,
    /// Header title.
    pub title: String,
    /// Whether the header toggles sorting.
    pub sortable: bool,
    /// Horizontal alignment.
    pub align: Alignment,
    /// Custom display renderer.
    pub render: Option<CellRenderer>,
    /// Edit configuration; `None` for read-only columns.
    pub edit: Option<ColumnEdit>,
    /// Click behavior override for this column.
    pub click: Option<ClickBehavior>,
    /// The column does not correspond to a row field.
    pub synthetic: bool,
}

impl Column {
    /// Create a read-only, unsorted, left-aligned column.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            sortable: false,
            align: Alignment::Left,
            render: None,
            edit: None,
            click: None,
            synthetic: false,
        }
    }

    /// Make the column sortable.
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Set the column alignment.
    pub fn align(mut self, align: Alignment) -> Self {
        self.align = align;
        self
    }

    /// Set a custom renderer.
    pub fn render<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value, &Row) -> String + 'static,
    {
        self.render = Some(Rc::new(f));
        self
    }

    /// Make the column editable with the given input type.
    pub fn editable(mut self, kind: EditType) -> Self {
        let edit = self.edit.get_or_insert_with(ColumnEdit::default);
        edit.kind = kind;
        self
    }

    /// Set the select options (implies an editable select column).
    pub fn options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let edit = self.edit.get_or_insert_with(|| ColumnEdit {
            kind: EditType::Select,
            ..ColumnEdit::default()
        });
        edit.options = options.into_iter().map(Into::into).collect();
        self
    }

    /// Set validation rules (implies an editable column).
    pub fn rules(mut self, rules: Rules) -> Self {
        self.edit.get_or_insert_with(ColumnEdit::default).rules = rules;
        self
    }

    /// Set the commit handler (implies an editable column).
    pub fn on_commit<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &Value) + 'static,
    {
        self.edit.get_or_insert_with(ColumnEdit::default).on_commit = Some(Rc::new(f));
        self
    }

    /// Override the table's click behavior for this column.
    pub fn click(mut self, behavior: ClickBehavior) -> Self {
        self.click = Some(behavior);
        self
    }

    /// Mark the column as not backed by a row field.
    pub fn synthetic(mut self) -> Self {
        self.synthetic = true;
        self
    }

    /// Returns `true` if cells of this column can be edited.
    pub fn is_editable(&self) -> bool {
        self.edit.is_some()
    }

    /// Returns the display text of this column's cell in `row`.
    pub fn display(&self, row: &Row) -> String {
        let value = row.get(&self.id).unwrap_or(&Value::Null);
        match &self.render {
            Some(render) => render(value, row),
            None => value.to_text(),
        }
    }
}

impl std::fmt::Debug for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Column")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("sortable", &self.sortable)
            .field("align", &self.align)
            .field("render", &self.render.is_some())
            .field("edit", &self.edit)
            .field("click", &self.click)
            .field("synthetic", &self.synthetic)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_uses_renderer() {
        let column = Column::new("amount", "Amount").render(|v, _| format!("${}", v.to_text()));
        let row = Row::new().set("amount", 12i64);
        assert_eq!(column.display(&row), "$12");
        assert_eq!(Column::new("missing", "").display(&row), "");
    }

    #[test]
    fn test_options_imply_select() {
        let column = Column::new("status", "Status").options(["draft", "pending"]);
        let edit = column.edit.as_ref().unwrap();
        assert_eq!(edit.kind, EditType::Select);
        assert_eq!(edit.options.len(), 2);
    }
}
