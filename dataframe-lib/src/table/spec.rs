//! JSON table configuration documents.

use std::fs;
use std::path::Path;

use regex::Regex;
use serde::Deserialize;
use serde::Serialize;

use super::config::DEFAULT_EMPTY_TEXT;
use super::config::TableConfig;
use crate::action::ActionKind;
use crate::action::BulkAction;
use crate::action::RowAction;
use crate::column::Alignment;
use crate::column::ClickBehavior;
use crate::column::Column;
use crate::column::EditType;
use crate::edit::Rules;
use crate::error::TableError;
use crate::model::FieldDescriptor;
use crate::model::Schema;
use crate::query::DEFAULT_PAGE_SIZE;
use crate::query::DEFAULT_PAGE_SIZE_OPTIONS;
use crate::query::QuickFilter;
use crate::query::SortSpec;
use crate::selection::SelectAllScope;

/// A column as written in a table document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnSpec {
    pub id: String,
    /// Defaults to the id.
    pub title: Option<String>,
    pub sortable: bool,
    pub align: Alignment,
    pub editable: Option<EditType>,
    pub options: Vec<String>,
    pub required: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<String>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub click: Option<ClickBehavior>,
    pub synthetic: bool,
}

impl ColumnSpec {
    fn into_column(self) -> Result<Column, TableError> {
        let title = self.title.unwrap_or_else(|| self.id.clone());
        let mut column = Column::new(self.id.clone(), title).align(self.align);
        if self.sortable {
            column = column.sortable();
        }
        if self.synthetic {
            column = column.synthetic();
        }
        if let Some(click) = self.click {
            column = column.click(click);
        }
        let Some(kind) = self.editable else {
            return Ok(column);
        };

        let mut rules = Rules::new();
        if self.required {
            rules = rules.required(format!("{} is required", column.title));
        }
        if let Some(n) = self.min_length {
            rules = rules.min_length(n, format!("Must be at least {n} characters"));
        }
        if let Some(n) = self.max_length {
            rules = rules.max_length(n, format!("Must be at most {n} characters"));
        }
        if let Some(pattern) = &self.pattern {
            let re = Regex::new(pattern).map_err(|e| {
                TableError::config(format!("column '{}' has an invalid pattern: {e}", self.id))
            })?;
            rules = rules.pattern(re, "Invalid format");
        }
        if let Some(n) = self.min {
            rules = rules.min(n, format!("Must be at least {n}"));
        }
        if let Some(n) = self.max {
            rules = rules.max(n, format!("Must be at most {n}"));
        }

        column = column.editable(kind).rules(rules);
        if !self.options.is_empty() {
            column = column.options(self.options);
        }
        Ok(column)
    }
}

/// A row or bulk action as written in a table document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSpec {
    pub id: String,
    pub label: String,
    pub kind: ActionKind,
    /// Defaults to `true` for deletes.
    #[serde(default)]
    pub destructive: Option<bool>,
    /// Url template for navigate actions, e.g. `/orders/{id}`.
    #[serde(default)]
    pub url: Option<String>,
}

impl ActionSpec {
    fn into_row_action(self) -> RowAction {
        let mut action = RowAction::new(self.id, self.label, self.kind);
        if let Some(destructive) = self.destructive {
            action.destructive = destructive;
        }
        if let Some(url) = self.url {
            action = action.url(url);
        }
        action
    }

    fn into_bulk_action(self) -> BulkAction {
        let mut action = BulkAction::new(self.id, self.label, self.kind);
        if let Some(destructive) = self.destructive {
            action.destructive = destructive;
        }
        action
    }
}

fn default_id_field() -> String {
    "id".into()
}

fn default_true() -> bool {
    true
}

/// Serializable table configuration.
///
/// Handlers and custom renderers cannot be written in JSON; attach them to
/// the [`TableConfig`] this converts into.
///
/// # Example
///
/// ```
/// use dataframe_lib::table::TableSpec;
///
/// let spec = TableSpec::from_json(r#"{
///     "columns": [
///         {"id": "id", "title": "Order #"},
///         {"id": "amount", "sortable": true, "align": "right"}
///     ],
///     "page_size": 25,
///     "selectable": true
/// }"#).unwrap();
///
/// let config = spec.into_config().unwrap();
/// assert_eq!(config.columns[1].title, "amount");
/// assert_eq!(config.pagination.page_size, 25);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSpec {
    #[serde(default = "default_id_field")]
    pub id_field: String,
    pub columns: Vec<ColumnSpec>,
    /// Schema fields; when present, columns are checked against them.
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
    #[serde(default)]
    pub searchable: bool,
    #[serde(default)]
    pub search_fields: Option<Vec<String>>,
    #[serde(default)]
    pub case_sensitive: bool,
    #[serde(default)]
    pub quick_filters: Vec<QuickFilter>,
    #[serde(default = "default_true")]
    pub paginated: bool,
    #[serde(default)]
    pub page_size: Option<usize>,
    #[serde(default)]
    pub page_size_options: Option<Vec<usize>>,
    #[serde(default)]
    pub sort: Option<SortSpec>,
    #[serde(default)]
    pub selectable: bool,
    #[serde(default)]
    pub select_scope: SelectAllScope,
    #[serde(default)]
    pub row_actions: Vec<ActionSpec>,
    #[serde(default)]
    pub bulk_actions: Vec<ActionSpec>,
    #[serde(default)]
    pub click: ClickBehavior,
    #[serde(default)]
    pub hidden_columns: Vec<String>,
    #[serde(default)]
    pub export_formats: Vec<String>,
    #[serde(default)]
    pub empty_text: Option<String>,
}

impl TableSpec {
    pub fn from_json(json: &str) -> Result<Self, TableError> {
        serde_json::from_str(json).map_err(|e| TableError::config(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .map_err(|e| TableError::config(format!("{}: {e}", path.display())))?;
        Self::from_json(&json)
    }

    /// Converts the document into a validated [`TableConfig`].
    pub fn into_config(self) -> Result<TableConfig, TableError> {
        let columns = self
            .columns
            .into_iter()
            .map(ColumnSpec::into_column)
            .collect::<Result<Vec<_>, _>>()?;

        let mut config = TableConfig::new(columns)
            .id_field(self.id_field)
            .page_size(self.page_size.unwrap_or(DEFAULT_PAGE_SIZE))
            .page_size_options(
                self.page_size_options
                    .unwrap_or_else(|| DEFAULT_PAGE_SIZE_OPTIONS.to_vec()),
            )
            .select_scope(self.select_scope)
            .click(self.click)
            .export_formats(self.export_formats)
            .empty_text(self.empty_text.unwrap_or_else(|| DEFAULT_EMPTY_TEXT.into()));

        if !self.fields.is_empty() {
            let schema = self
                .fields
                .into_iter()
                .fold(Schema::new(), |s, f| s.field(f.name, f.kind));
            config = config.schema(schema);
        }
        if self.searchable || self.search_fields.is_some() {
            config = match self.search_fields {
                Some(fields) => config.searchable(fields),
                None => config.search_all(),
            };
        }
        if self.case_sensitive {
            config = config.case_sensitive_search();
        }
        if !self.paginated {
            config = config.unpaginated();
        }
        if self.selectable {
            config = config.selectable();
        }
        if let Some(sort) = self.sort {
            config = config.sort(sort);
        }
        for filter in self.quick_filters {
            config = config.quick_filter(filter);
        }
        for action in self.row_actions {
            config = config.row_action(action.into_row_action());
        }
        for action in self.bulk_actions {
            config = config.bulk_action(action.into_bulk_action());
        }
        for hidden in self.hidden_columns {
            config = config.hide_column(hidden);
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::SelectionMode;

    const ORDERS: &str = r#"{
        "id_field": "order_id",
        "columns": [
            {"id": "order_id", "title": "Order #"},
            {"id": "customer", "sortable": true},
            {"id": "qty", "editable": "number", "min": 1, "max": 99},
            {"id": "status", "editable": "select", "options": ["pending", "shipped"]},
            {"id": "actions", "synthetic": true}
        ],
        "searchable": true,
        "quick_filters": [
            {"id": "status", "field": "status", "label": "Status",
             "options": [{"label": "Pending", "value": "pending"}]}
        ],
        "selectable": true,
        "select_scope": "page",
        "row_actions": [
            {"id": "view", "label": "View", "kind": "navigate", "url": "/orders/{order_id}"},
            {"id": "rm", "label": "Delete", "kind": "delete"}
        ],
        "bulk_actions": [{"id": "ship", "label": "Ship", "kind": "custom"}],
        "hidden_columns": ["qty"],
        "sort": {"column": "customer", "direction": "desc"}
    }"#;

    #[test]
    fn test_full_document() {
        let config = TableSpec::from_json(ORDERS).unwrap().into_config().unwrap();

        assert_eq!(config.id_field, "order_id");
        assert_eq!(config.columns.len(), 5);
        assert!(config.columns[2].is_editable());
        assert_eq!(
            config.columns[3].edit.as_ref().unwrap().options,
            ["pending", "shipped"]
        );
        assert!(config.searchable);
        assert_eq!(config.selection_mode, SelectionMode::Multiple);
        assert_eq!(config.select_scope, SelectAllScope::Page);
        assert!(config.row_actions[1].destructive);
        assert!(config.hidden_columns.contains("qty"));
        assert_eq!(config.initial_sort, Some(SortSpec::desc("customer")));
    }

    #[test]
    fn test_bad_pattern_is_a_config_error() {
        let json = r#"{"columns": [{"id": "sku", "editable": "text", "pattern": "("}]}"#;
        let err = TableSpec::from_json(json).unwrap().into_config().unwrap_err();
        assert!(matches!(err, TableError::Config(_)));
    }

    #[test]
    fn test_unknown_hidden_column() {
        let json = r#"{"columns": [{"id": "sku"}], "hidden_columns": ["price"]}"#;
        let err = TableSpec::from_json(json).unwrap().into_config().unwrap_err();
        assert_eq!(err, TableError::unknown_column("price"));
    }
}
