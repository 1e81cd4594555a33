//! Table configuration.

use std::collections::BTreeSet;
use std::rc::Rc;

use crate::action::BulkAction;
use crate::action::RowAction;
use crate::column::ClickBehavior;
use crate::column::Column;
use crate::error::TableError;
use crate::model::DataSet;
use crate::model::Row;
use crate::model::RowId;
use crate::model::Schema;
use crate::query::Filter;
use crate::query::Pagination;
use crate::query::QuickFilter;
use crate::query::SearchConfig;
use crate::query::SortSpec;
use crate::selection::SelectAllScope;
use crate::selection::SelectionMode;

/// Text shown when no rows pass filters and search.
pub const DEFAULT_EMPTY_TEXT: &str = "No data available";

/// Called with the full sorted selection after it changes.
pub type SelectionHandler = Rc<dyn Fn(&[RowId])>;

/// Called when a row is clicked: `(row_id, row)`.
pub type RowClickHandler = Rc<dyn Fn(&str, &Row)>;

/// Static configuration of a [`DataFrameTable`](super::DataFrameTable).
///
/// # Example
///
/// ```
/// use dataframe_lib::column::Column;
/// use dataframe_lib::query::QuickFilter;
/// use dataframe_lib::table::TableConfig;
///
/// let config = TableConfig::new(vec![
///         Column::new("id", "Order #"),
///         Column::new("customer", "Customer").sortable(),
///         Column::new("status", "Status"),
///     ])
///     .id_field("id")
///     .searchable(["customer"])
///     .quick_filter(QuickFilter::new("status", "Status").option("Pending", "pending"))
///     .page_size(25)
///     .selectable();
/// assert_eq!(config.pagination.page_size, 25);
/// ```
#[derive(Clone)]
pub struct TableConfig {
    pub columns: Vec<Column>,
    pub id_field: String,
    /// Optional schema checked against the columns and used by
    /// [`dataset`](Self::dataset) to coerce raw rows.
    pub schema: Option<Schema>,
    pub searchable: bool,
    /// Search fields, case mode and initial term.
    pub search: SearchConfig,
    pub quick_filters: Vec<QuickFilter>,
    /// Caller-supplied filters, applied together with quick filters.
    pub filters: Vec<Filter>,
    pub paginated: bool,
    pub pagination: Pagination,
    pub initial_sort: Option<SortSpec>,
    pub selection_mode: SelectionMode,
    pub select_scope: SelectAllScope,
    pub row_actions: Vec<RowAction>,
    pub bulk_actions: Vec<BulkAction>,
    /// Default click behavior for non-editable cells.
    pub click: ClickBehavior,
    pub hidden_columns: BTreeSet<String>,
    pub export_formats: Vec<String>,
    pub empty_text: String,
    pub on_selection_change: Option<SelectionHandler>,
    pub on_row_click: Option<RowClickHandler>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
            id_field: "id".into(),
            schema: None,
            searchable: false,
            search: SearchConfig::default(),
            quick_filters: Vec::new(),
            filters: Vec::new(),
            paginated: true,
            pagination: Pagination::default(),
            initial_sort: None,
            selection_mode: SelectionMode::None,
            select_scope: SelectAllScope::default(),
            row_actions: Vec::new(),
            bulk_actions: Vec::new(),
            click: ClickBehavior::None,
            hidden_columns: BTreeSet::new(),
            export_formats: Vec::new(),
            empty_text: DEFAULT_EMPTY_TEXT.into(),
            on_selection_change: None,
            on_row_click: None,
        }
    }
}

impl TableConfig {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            ..Self::default()
        }
    }

    pub fn id_field(mut self, field: impl Into<String>) -> Self {
        self.id_field = field.into();
        self
    }

    pub fn schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Enables search over the given fields.
    pub fn searchable<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.searchable = true;
        self.search = self.search.fields(fields);
        self
    }

    /// Enables search over every field.
    pub fn search_all(mut self) -> Self {
        self.searchable = true;
        self.search.fields = None;
        self
    }

    pub fn case_sensitive_search(mut self) -> Self {
        self.search.case_sensitive = true;
        self
    }

    pub fn quick_filter(mut self, filter: QuickFilter) -> Self {
        self.quick_filters.push(filter);
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn page_size(mut self, size: usize) -> Self {
        self.pagination = self.pagination.page_size(size);
        self
    }

    pub fn page_size_options(mut self, options: impl Into<Vec<usize>>) -> Self {
        self.pagination = self.pagination.page_size_options(options);
        self
    }

    /// Shows every row on one page.
    pub fn unpaginated(mut self) -> Self {
        self.paginated = false;
        self
    }

    pub fn sort(mut self, sort: SortSpec) -> Self {
        self.initial_sort = Some(sort);
        self
    }

    /// Enables multi-row selection.
    pub fn selectable(mut self) -> Self {
        self.selection_mode = SelectionMode::Multiple;
        self
    }

    pub fn selection_mode(mut self, mode: SelectionMode) -> Self {
        self.selection_mode = mode;
        self
    }

    pub fn select_scope(mut self, scope: SelectAllScope) -> Self {
        self.select_scope = scope;
        self
    }

    pub fn row_action(mut self, action: RowAction) -> Self {
        self.row_actions.push(action);
        self
    }

    pub fn bulk_action(mut self, action: BulkAction) -> Self {
        self.bulk_actions.push(action);
        self
    }

    pub fn click(mut self, behavior: ClickBehavior) -> Self {
        self.click = behavior;
        self
    }

    /// Row clicks open the detail modal.
    pub fn detail_modal(self) -> Self {
        self.click(ClickBehavior::Detail)
    }

    pub fn hide_column(mut self, id: impl Into<String>) -> Self {
        self.hidden_columns.insert(id.into());
        self
    }

    pub fn export_formats<I, S>(mut self, formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.export_formats = formats.into_iter().map(Into::into).collect();
        self
    }

    pub fn empty_text(mut self, text: impl Into<String>) -> Self {
        self.empty_text = text.into();
        self
    }

    pub fn on_selection_change<F: Fn(&[RowId]) + 'static>(mut self, f: F) -> Self {
        self.on_selection_change = Some(Rc::new(f));
        self
    }

    pub fn on_row_click<F: Fn(&str, &Row) + 'static>(mut self, f: F) -> Self {
        self.on_row_click = Some(Rc::new(f));
        self
    }

    /// Looks up a declared column.
    pub fn column(&self, id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == id)
    }

    /// Builds a data set, coercing rows through the schema if one is set.
    pub fn dataset(&self, rows: Vec<Row>) -> Result<DataSet, TableError> {
        let rows = match &self.schema {
            Some(schema) => schema.coerce_rows(rows),
            None => rows,
        };
        DataSet::new(self.id_field.clone(), rows)
    }

    /// Checks internal consistency.
    pub fn validate(&self) -> Result<(), TableError> {
        if self.id_field.is_empty() {
            return Err(TableError::config("id field must not be empty"));
        }
        if let Some(schema) = &self.schema {
            schema.check_columns(&self.columns)?;
        }
        let mut seen = BTreeSet::new();
        for column in &self.columns {
            if !seen.insert(column.id.as_str()) {
                return Err(TableError::config(format!("duplicate column '{}'", column.id)));
            }
        }
        for hidden in &self.hidden_columns {
            if self.column(hidden).is_none() {
                return Err(TableError::unknown_column(hidden.clone()));
            }
        }
        if let Some(sort) = &self.initial_sort
            && self.column(&sort.column).is_none()
        {
            return Err(TableError::unknown_column(sort.column.clone()));
        }
        Ok(())
    }
}

impl std::fmt::Debug for TableConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableConfig")
            .field("columns", &self.columns)
            .field("id_field", &self.id_field)
            .field("searchable", &self.searchable)
            .field("quick_filters", &self.quick_filters)
            .field("pagination", &self.pagination)
            .field("selection_mode", &self.selection_mode)
            .field("select_scope", &self.select_scope)
            .field("row_actions", &self.row_actions)
            .field("bulk_actions", &self.bulk_actions)
            .field("click", &self.click)
            .field("hidden_columns", &self.hidden_columns)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FieldKind;

    #[test]
    fn test_validate_catches_unknown_columns() {
        let config = TableConfig::new(vec![Column::new("name", "Name")]).hide_column("price");
        assert_eq!(config.validate(), Err(TableError::unknown_column("price")));

        let config = TableConfig::new(vec![Column::new("name", "Name")]).sort(SortSpec::asc("x"));
        assert_eq!(config.validate(), Err(TableError::unknown_column("x")));
    }

    #[test]
    fn test_validate_against_schema() {
        let config = TableConfig::new(vec![Column::new("name", "Name"), Column::new("qty", "Qty")])
            .schema(Schema::new().field("name", FieldKind::Text));
        assert!(matches!(
            config.validate(),
            Err(TableError::UnknownField { .. })
        ));
    }

    #[test]
    fn test_dataset_coerces_through_schema() {
        let config = TableConfig::new(vec![Column::new("qty", "Qty")])
            .schema(Schema::new().field("id", FieldKind::Text).field("qty", FieldKind::Number));
        let data = config
            .dataset(vec![Row::new().set("id", "a").set("qty", "7")])
            .unwrap();
        assert_eq!(data.get("a").unwrap().get_int("qty").unwrap(), Some(7));
    }
}
