//! The table orchestrator.
//!
//! [`DataFrameTable`] ties the pieces together: it runs the query pipeline
//! for the visible window, routes cell clicks to editing, selection or the
//! detail modal, runs or stages actions, and renders a [`TableView`].

mod config;
mod detail;
mod export;
mod ownership;
mod spec;
mod view;

use std::borrow::Cow;
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use log::debug;
use log::info;
use uuid::Uuid;

pub use config::*;
pub use detail::*;
pub use export::*;
pub use ownership::*;
pub use spec::*;
pub use view::*;

use crate::action::ActionManager;
use crate::action::DataIntent;
use crate::action::Dispatch;
use crate::action::IntentLog;
use crate::action::RowAction;
use crate::action::StagedRunner;
use crate::column::ClickBehavior;
use crate::column::Column;
use crate::edit::CellEditor;
use crate::edit::EditKey;
use crate::edit::EditOutcome;
use crate::error::EditError;
use crate::error::ExportError;
use crate::error::TableError;
use crate::model::DataSet;
use crate::model::Row;
use crate::model::RowId;
use crate::query::ActiveFilters;
use crate::query::Filter;
use crate::query::PageInfo;
use crate::query::Pagination;
use crate::query::Query;
use crate::query::SearchConfig;
use crate::query::SortSpec;
use crate::selection::SelectAllScope;
use crate::selection::Selection;
use crate::selection::SelectionChange;
use crate::selection::SelectionMode;
use crate::staging::ExecuteRequest;
use crate::staging::ExecutionReport;
use crate::staging::StagedAction;
use crate::staging::StagingQueue;
use crate::staging::StagingSummary;

/// What a cell click did.
#[derive(Debug, Clone, PartialEq)]
pub enum CellClick {
    /// The cell entered edit mode.
    Editing(EditOutcome),
    /// The row's selection was toggled.
    Selected(SelectionChange),
    /// The detail modal opened on the row.
    Detail,
    /// Nothing happened.
    Ignored,
}

/// A configurable data table over an in-memory row collection.
///
/// The table never mutates the rows it is given. Edits reach the caller
/// through column commit handlers, actions through the [`ActionManager`]'s
/// intent sink; the caller applies them and hands back a new [`DataSet`].
///
/// # Example
///
/// ```
/// use dataframe_lib::column::Column;
/// use dataframe_lib::model::{DataSet, Row};
/// use dataframe_lib::query::SortSpec;
/// use dataframe_lib::table::{DataFrameTable, TableConfig};
///
/// let data = DataSet::new("id", vec![
///     Row::new().set("id", "1").set("name", "Widget").set("amount", 20i64),
///     Row::new().set("id", "2").set("name", "Gadget").set("amount", 35i64),
///     Row::new().set("id", "3").set("name", "Widget XL").set("amount", 50i64),
/// ]).unwrap();
///
/// let config = TableConfig::new(vec![
///         Column::new("name", "Name"),
///         Column::new("amount", "Amount").sortable(),
///     ])
///     .search_all()
///     .page_size(1);
///
/// let mut table = DataFrameTable::new(config, data).unwrap();
/// table.set_search("widget");
/// table.set_sort(Some(SortSpec::desc("amount"))).unwrap();
///
/// let view = table.view();
/// assert_eq!(view.row_ids(), ["3"]);
/// assert_eq!(view.page.unwrap().total_pages, 2);
/// ```
pub struct DataFrameTable {
    config: TableConfig,
    data: DataSet,
    loading: bool,
    search: Ownership<String>,
    sort: Ownership<Option<SortSpec>>,
    selection: Ownership<Selection>,
    active: ActiveFilters,
    pagination: Pagination,
    /// Search term and sort the current page was chosen under.
    paged_query: QueryKey,
    hidden: BTreeSet<String>,
    editor: CellEditor,
    detail: Option<RowId>,
    staging: StagingQueue,
    actions: ActionManager,
    intents: IntentLog,
}

type QueryKey = (String, Option<SortSpec>);

impl DataFrameTable {
    /// Builds a table. Fails if the configuration is inconsistent or the
    /// data set uses a different id field.
    pub fn new(config: TableConfig, data: DataSet) -> Result<Self, TableError> {
        config.validate()?;
        check_id_field(&config, &data)?;

        let mut selection = Selection::new(config.selection_mode);
        selection.reconcile(data.generation());
        let intents = IntentLog::new();

        debug!(
            "[table] created with {} columns, {} rows",
            config.columns.len(),
            data.len()
        );
        Ok(Self {
            search: Ownership::Internal(config.search.term.clone()),
            sort: Ownership::Internal(config.initial_sort.clone()),
            selection: Ownership::Internal(selection),
            active: ActiveFilters::new(),
            pagination: config.pagination.clone(),
            paged_query: (config.search.term.clone(), config.initial_sort.clone()),
            hidden: config.hidden_columns.clone(),
            editor: CellEditor::new(),
            detail: None,
            staging: StagingQueue::new(),
            actions: ActionManager::new(intents.clone()).id_field(config.id_field.clone()),
            intents,
            loading: false,
            config,
            data,
        })
    }

    /// Uses a caller-built action manager instead of the default one, whose
    /// intents are only recorded (see [`take_intents`](Self::take_intents)).
    pub fn with_actions(mut self, actions: ActionManager) -> Self {
        self.actions = actions;
        self
    }

    /// Lets the caller own the search term.
    pub fn controlled_search(mut self, source: impl Controlled<String> + 'static) -> Self {
        self.search = Ownership::controlled(source);
        self.paged_query = self.query_key();
        self
    }

    /// Lets the caller own the sort.
    pub fn controlled_sort(mut self, source: impl Controlled<Option<SortSpec>> + 'static) -> Self {
        self.sort = Ownership::controlled(source);
        self.paged_query = self.query_key();
        self
    }

    /// Lets the caller own the selection.
    pub fn controlled_selection(mut self, source: Rc<RefCell<Selection>>) -> Self {
        let generation = self.data.generation();
        source.borrow_mut().reconcile(generation);
        self.selection = Ownership::controlled(source);
        self
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn actions(&self) -> &ActionManager {
        &self.actions
    }

    /// Drains intents emitted by the built-in action manager.
    pub fn take_intents(&self) -> Vec<DataIntent> {
        self.intents.take()
    }

    // -------------------------------------------------------------------------
    // Data
    // -------------------------------------------------------------------------

    pub fn data(&self) -> &DataSet {
        &self.data
    }

    /// Replaces the row collection.
    ///
    /// A new generation clears the selection, the editing cell and the
    /// detail row; handing back the same generation keeps them.
    pub fn set_data(&mut self, data: DataSet) -> Result<(), TableError> {
        check_id_field(&self.config, &data)?;
        let generation = data.generation();
        let replaced = generation != self.data.generation();
        self.data = data;

        if replaced {
            if let Some(cell) = self.editor.abandon() {
                debug!("[table] dropped edit of {}/{}", cell.row_id, cell.column_id);
            }
            self.detail = None;
        }
        let change = self.selection.update(|s| s.reconcile(generation));
        self.notify_selection(&change);

        self.sync_paging();
        let total = self.processed_len();
        let page = self.pagination.page;
        self.pagination.set_page(page, total);
        Ok(())
    }

    /// Shows or hides the loading state. Never touches the selection.
    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    // -------------------------------------------------------------------------
    // Search, filters, sort
    // -------------------------------------------------------------------------

    pub fn search_term(&self) -> String {
        self.search.get()
    }

    /// Sets the search term and returns to page 1.
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search.set(term.into());
        self.reset_page();
    }

    pub fn active_filters(&self) -> &ActiveFilters {
        &self.active
    }

    /// Sets the values of a quick filter and returns to page 1. An empty set
    /// removes the filter.
    pub fn set_filter<I, S>(&mut self, filter_id: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.active.set(filter_id, values);
        self.pagination.reset();
    }

    /// Adds or removes one quick filter value and returns to page 1.
    pub fn toggle_filter_value(&mut self, filter_id: &str, value: &str) {
        self.active.toggle_value(filter_id, value);
        self.pagination.reset();
    }

    pub fn clear_filters(&mut self) {
        self.active.clear();
        self.pagination.reset();
    }

    /// Replaces the caller-supplied filters and returns to page 1.
    pub fn set_custom_filters(&mut self, filters: Vec<Filter>) {
        self.config.filters = filters;
        self.pagination.reset();
    }

    pub fn sort(&self) -> Option<SortSpec> {
        self.sort.get()
    }

    /// Sets the sort and returns to page 1.
    pub fn set_sort(&mut self, sort: Option<SortSpec>) -> Result<(), TableError> {
        if let Some(spec) = &sort
            && self.config.column(&spec.column).is_none()
        {
            return Err(TableError::unknown_column(spec.column.clone()));
        }
        self.sort.set(sort);
        self.reset_page();
        Ok(())
    }

    /// Header click: sorts ascending by a new column, flips the direction on
    /// the current one. Non-sortable columns are ignored.
    pub fn toggle_sort(&mut self, column_id: &str) -> Result<(), TableError> {
        let column = self
            .config
            .column(column_id)
            .ok_or_else(|| TableError::unknown_column(column_id))?;
        if !column.sortable {
            debug!("[table] column {column_id} is not sortable");
            return Ok(());
        }
        let next = match self.sort.get() {
            Some(current) if current.column == column_id => SortSpec {
                direction: current.direction.toggled(),
                ..current
            },
            _ => SortSpec::asc(column_id),
        };
        self.set_sort(Some(next))
    }

    // -------------------------------------------------------------------------
    // Derived rows and pagination
    // -------------------------------------------------------------------------

    fn search_config(&self) -> SearchConfig {
        SearchConfig {
            term: if self.config.searchable {
                self.search.get()
            } else {
                String::new()
            },
            ..self.config.search.clone()
        }
    }

    /// Rows after filters, search and sort, across all pages.
    pub fn processed(&self) -> Vec<&Row> {
        let search = self.search_config();
        let sort = self.sort.get();
        Query::new()
            .filters(&self.config.filters)
            .quick_filters(&self.config.quick_filters)
            .active(&self.active)
            .search(&search)
            .sort(sort.as_ref())
            .derive(self.data.rows())
    }

    fn processed_len(&self) -> usize {
        self.processed().len()
    }

    /// Ids of the processed rows.
    pub fn processed_ids(&self) -> Vec<RowId> {
        self.processed()
            .into_iter()
            .map(|row| self.data.row_id(row))
            .collect()
    }

    /// Rows on the current page.
    pub fn page_rows(&self) -> Vec<&Row> {
        let rows = self.processed();
        if !self.config.paginated {
            return rows;
        }
        self.paging().slice(&rows).to_vec()
    }

    /// Ids of the rows on the current page.
    pub fn page_ids(&self) -> Vec<RowId> {
        self.page_rows()
            .into_iter()
            .map(|row| self.data.row_id(row))
            .collect()
    }

    /// Current paging state.
    ///
    /// A controlled search term or sort changed by the caller puts the table
    /// back on page 1.
    pub fn pagination(&self) -> Cow<'_, Pagination> {
        self.paging()
    }

    pub fn page_info(&self) -> PageInfo {
        self.paging().info(self.processed_len())
    }

    /// Moves to a page, clamped to the available range.
    pub fn set_page(&mut self, page: usize) {
        self.sync_paging();
        let total = self.processed_len();
        self.pagination.set_page(page, total);
    }

    pub fn next_page(&mut self) -> bool {
        self.sync_paging();
        let total = self.processed_len();
        self.pagination.next(total)
    }

    pub fn prev_page(&mut self) -> bool {
        self.sync_paging();
        self.pagination.prev()
    }

    /// Changes the page size and returns to page 1.
    pub fn set_page_size(&mut self, size: usize) {
        self.sync_paging();
        self.pagination.set_page_size(size);
    }

    fn query_key(&self) -> QueryKey {
        (self.search.get(), self.sort.get())
    }

    fn reset_page(&mut self) {
        self.paged_query = self.query_key();
        self.pagination.reset();
    }

    /// Returns to page 1 if the search term or sort moved since the page was
    /// chosen.
    fn sync_paging(&mut self) {
        if self.query_key() != self.paged_query {
            debug!("[table] search or sort changed by owner, back to page 1");
            self.reset_page();
        }
    }

    fn paging(&self) -> Cow<'_, Pagination> {
        if self.query_key() == self.paged_query {
            return Cow::Borrowed(&self.pagination);
        }
        let mut pagination = self.pagination.clone();
        pagination.reset();
        Cow::Owned(pagination)
    }

    // -------------------------------------------------------------------------
    // Columns
    // -------------------------------------------------------------------------

    pub fn visible_columns(&self) -> Vec<&Column> {
        self.config
            .columns
            .iter()
            .filter(|c| !self.hidden.contains(&c.id))
            .collect()
    }

    pub fn is_column_visible(&self, id: &str) -> bool {
        !self.hidden.contains(id)
    }

    pub fn set_column_visible(&mut self, id: &str, visible: bool) -> Result<(), TableError> {
        if self.config.column(id).is_none() {
            return Err(TableError::unknown_column(id));
        }
        if visible {
            self.hidden.remove(id);
        } else {
            self.hidden.insert(id.to_string());
        }
        Ok(())
    }

    /// Flips a column's visibility. Returns the new visibility.
    pub fn toggle_column(&mut self, id: &str) -> Result<bool, TableError> {
        let visible = !self.is_column_visible(id);
        self.set_column_visible(id, visible)?;
        Ok(visible)
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    pub fn selected_ids(&self) -> Vec<RowId> {
        self.selection.get().selected()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.get().is_selected(id)
    }

    /// Toggles one row. Unknown ids are ignored.
    pub fn toggle_row(&mut self, id: &str) -> SelectionChange {
        if !self.data.contains(id) {
            return SelectionChange::default();
        }
        let change = self.selection.update(|s| s.toggle(id));
        self.notify_selection(&change);
        change
    }

    /// Ids the "select all" checkbox covers.
    pub fn select_all_ids(&self) -> Vec<RowId> {
        match self.config.select_scope {
            SelectAllScope::Filtered => self.processed_ids(),
            SelectAllScope::Page => self.page_ids(),
        }
    }

    /// The "select all" checkbox. The selection becomes exactly the rows in
    /// scope; rows hidden by filters, search or paging are deselected.
    pub fn select_all(&mut self) -> SelectionChange {
        let ids = self.select_all_ids();
        let change = self.selection.update(|s| s.set_all(&ids));
        self.notify_selection(&change);
        change
    }

    pub fn clear_selection(&mut self) -> SelectionChange {
        let change = self.selection.update(|s| s.clear());
        self.notify_selection(&change);
        change
    }

    fn notify_selection(&self, change: &SelectionChange) {
        if change.is_empty() {
            return;
        }
        if let Some(handler) = &self.config.on_selection_change {
            handler(&self.selected_ids());
        }
    }

    // -------------------------------------------------------------------------
    // Cell clicks and editing
    // -------------------------------------------------------------------------

    /// Routes a click on a cell.
    ///
    /// Editable cells start editing and do nothing else. Other cells follow
    /// the column's click behavior, falling back to the table's.
    pub fn click_cell(&mut self, row_id: &str, column_id: &str) -> Result<CellClick, TableError> {
        let column = self
            .config
            .column(column_id)
            .ok_or_else(|| TableError::unknown_column(column_id))?;
        let row = self
            .data
            .get(row_id)
            .ok_or_else(|| TableError::UnknownRow(row_id.to_string()))?;

        if column.is_editable() {
            let outcome = self.editor.begin(row_id, column, row)?;
            return Ok(CellClick::Editing(outcome));
        }

        if let Some(handler) = &self.config.on_row_click {
            handler(row_id, row);
        }
        match column.click.unwrap_or(self.config.click) {
            ClickBehavior::Select if self.config.selection_mode != SelectionMode::None => {
                Ok(CellClick::Selected(self.toggle_row(row_id)))
            }
            ClickBehavior::Detail => {
                self.open_detail(row_id)?;
                Ok(CellClick::Detail)
            }
            _ => Ok(CellClick::Ignored),
        }
    }

    pub fn editor(&self) -> &CellEditor {
        &self.editor
    }

    /// Starts editing a cell.
    pub fn begin_edit(&mut self, row_id: &str, column_id: &str) -> Result<EditOutcome, TableError> {
        let column = self
            .config
            .column(column_id)
            .ok_or_else(|| TableError::unknown_column(column_id))?;
        let row = self
            .data
            .get(row_id)
            .ok_or_else(|| TableError::UnknownRow(row_id.to_string()))?;
        Ok(self.editor.begin(row_id, column, row)?)
    }

    pub fn edit_input(&mut self, text: impl Into<String>) -> Result<(), EditError> {
        self.editor.input(text)
    }

    pub fn edit_key(&mut self, key: EditKey) -> EditOutcome {
        self.editor.key(key, &self.config.columns)
    }

    pub fn commit_edit(&mut self) -> Result<EditOutcome, EditError> {
        self.editor.commit(&self.config.columns)
    }

    pub fn cancel_edit(&mut self) -> EditOutcome {
        self.editor.cancel()
    }

    // -------------------------------------------------------------------------
    // Detail modal
    // -------------------------------------------------------------------------

    pub fn open_detail(&mut self, row_id: &str) -> Result<(), TableError> {
        if !self.data.contains(row_id) {
            return Err(TableError::UnknownRow(row_id.to_string()));
        }
        self.detail = Some(row_id.to_string());
        Ok(())
    }

    pub fn detail(&self) -> Option<&Row> {
        self.detail.as_deref().and_then(|id| self.data.get(id))
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
    }

    // -------------------------------------------------------------------------
    // Actions
    // -------------------------------------------------------------------------

    /// Row actions offered for a row: those not disabled for it.
    pub fn available_row_actions(&self, row_id: &str) -> Vec<&RowAction> {
        let Some(row) = self.data.get(row_id) else {
            return Vec::new();
        };
        self.config
            .row_actions
            .iter()
            .filter(|a| !a.is_disabled(row))
            .collect()
    }

    /// Runs a row action immediately.
    pub fn run_row_action(&self, action_id: &str, row_id: &str) -> Result<Dispatch, TableError> {
        let action = self.row_action(action_id)?;
        let row = self
            .data
            .get(row_id)
            .ok_or_else(|| TableError::UnknownRow(row_id.to_string()))?;
        Ok(self.actions.execute(action, row_id, row))
    }

    /// Runs a bulk action on the current selection. The selection is
    /// cleared once the action ran.
    pub fn run_bulk_action(&mut self, action_id: &str) -> Result<Dispatch, TableError> {
        let action = self
            .config
            .bulk_actions
            .iter()
            .find(|a| a.id == action_id)
            .ok_or_else(|| TableError::UnknownAction(action_id.to_string()))?;
        let ids = self.selected_ids();
        if ids.is_empty() {
            return Err(TableError::EmptySelection);
        }

        let dispatch = self.actions.execute_bulk(action, &ids, &self.data);
        if dispatch == Dispatch::Done {
            info!("[table] bulk action {action_id} ran on {} rows", ids.len());
            self.clear_selection();
        }
        Ok(dispatch)
    }

    fn row_action(&self, action_id: &str) -> Result<&RowAction, TableError> {
        self.config
            .row_actions
            .iter()
            .find(|a| a.id == action_id)
            .ok_or_else(|| TableError::UnknownAction(action_id.to_string()))
    }

    // -------------------------------------------------------------------------
    // Staging
    // -------------------------------------------------------------------------

    pub fn staging(&self) -> &StagingQueue {
        &self.staging
    }

    /// Stages a bulk action over the current selection.
    pub fn stage_bulk(&mut self, action_id: &str) -> Result<Uuid, TableError> {
        let action = self
            .config
            .bulk_actions
            .iter()
            .find(|a| a.id == action_id)
            .ok_or_else(|| TableError::UnknownAction(action_id.to_string()))?;
        let ids = self.selected_ids();
        if ids.is_empty() {
            return Err(TableError::EmptySelection);
        }
        let staged = StagedAction::bulk(&action.id, &action.label, ids, action.destructive);
        Ok(self.staging.stage(staged))
    }

    /// Stages a row action on one row.
    pub fn stage_row(&mut self, action_id: &str, row_id: &str) -> Result<Uuid, TableError> {
        let action = self.row_action(action_id)?;
        if !self.data.contains(row_id) {
            return Err(TableError::UnknownRow(row_id.to_string()));
        }
        let staged = StagedAction::row(&action.id, &action.label, row_id, action.destructive);
        Ok(self.staging.stage(staged))
    }

    pub fn staged_summary(&self) -> StagingSummary {
        self.staging.summarize()
    }

    /// Removes every staged entry of an action.
    pub fn unstage(&mut self, action_id: &str) -> usize {
        self.staging.remove(action_id)
    }

    pub fn unstage_entry(&mut self, id: Uuid) -> Option<StagedAction> {
        self.staging.remove_staged(id)
    }

    pub fn clear_staged(&mut self) {
        self.staging.clear();
    }

    /// Runs the staged queue, or holds it for confirmation if it contains
    /// destructive actions.
    pub fn execute_staged(&mut self) -> ExecuteRequest {
        let mut runner = StagedRunner::new(
            &self.actions,
            &self.config.row_actions,
            &self.config.bulk_actions,
            &self.data,
        );
        self.staging.request_execute(&mut runner)
    }

    /// Runs a queue held for confirmation.
    pub fn confirm_staged(&mut self) -> Option<ExecutionReport> {
        let mut runner = StagedRunner::new(
            &self.actions,
            &self.config.row_actions,
            &self.config.bulk_actions,
            &self.data,
        );
        self.staging.confirm_execute(&mut runner)
    }

    pub fn cancel_staged_confirmation(&mut self) {
        self.staging.cancel_confirmation();
    }

    // -------------------------------------------------------------------------
    // Export
    // -------------------------------------------------------------------------

    /// Hands the processed rows (not paginated) to an exporter. Returns the
    /// number of rows exported.
    pub fn export(&self, format: &str, exporter: &mut dyn Exporter) -> Result<usize, ExportError> {
        if !self.config.export_formats.is_empty()
            && !self.config.export_formats.iter().any(|f| f == format)
        {
            return Err(ExportError::UnsupportedFormat(format.to_string()));
        }
        let rows = self.processed();
        let columns = self.visible_columns();
        exporter.export(format, &columns, &rows)?;
        info!("[table] exported {} rows as {format}", rows.len());
        Ok(rows.len())
    }

    // -------------------------------------------------------------------------
    // Rendering
    // -------------------------------------------------------------------------

    /// Renders the current state.
    pub fn view(&self) -> TableView {
        let processed = self.processed();
        let total = processed.len();
        let selection = self.selection.get();
        let columns = self.visible_columns();
        let sort = self.sort.get();

        let paging = self.paging();
        let page_rows: &[&Row] = if self.config.paginated {
            paging.slice(&processed)
        } else {
            &processed
        };

        let state = if self.loading {
            TableState::Loading
        } else if total == 0 {
            TableState::Empty(self.config.empty_text.clone())
        } else {
            TableState::Populated
        };

        let headers = columns
            .iter()
            .map(|c| HeaderView {
                id: c.id.clone(),
                title: c.title.clone(),
                align: c.align,
                sortable: c.sortable,
                sorted: sort
                    .as_ref()
                    .filter(|s| s.column == c.id)
                    .map(|s| s.direction),
            })
            .collect();

        let rows = match state {
            TableState::Populated => page_rows
                .iter()
                .map(|row| self.row_view(row, &columns, &selection))
                .collect(),
            _ => Vec::new(),
        };

        let scope_ids = self.select_all_ids();
        let staged = (!self.staging.is_empty()).then(|| self.staging.summarize());

        TableView {
            state,
            headers,
            rows,
            page: self.config.paginated.then(|| paging.info(total)),
            page_size_options: paging.page_size_options.clone(),
            search_term: self.config.searchable.then(|| self.search.get()),
            active_filters: self.active.iter().cloned().collect(),
            selectable: self.config.selection_mode != SelectionMode::None,
            selected_count: selection.len(),
            all_selected: selection.all_selected(&scope_ids),
            bulk_actions: if selection.is_empty() {
                Vec::new()
            } else {
                self.config
                    .bulk_actions
                    .iter()
                    .map(|a| ActionView {
                        id: a.id.clone(),
                        label: a.label.clone(),
                        destructive: a.destructive,
                    })
                    .collect()
            },
            hidden_columns: self
                .config
                .columns
                .iter()
                .filter(|c| self.hidden.contains(&c.id))
                .map(|c| (c.id.clone(), c.title.clone()))
                .collect(),
            staged,
            awaiting_confirmation: self.staging.is_awaiting_confirmation(),
            detail: self.detail.as_deref().and_then(|id| {
                self.data
                    .get(id)
                    .map(|row| DetailView::new(id, row, &self.config.columns))
            }),
            export_formats: self.config.export_formats.clone(),
        }
    }

    fn row_view(&self, row: &Row, columns: &[&Column], selection: &Selection) -> RowView {
        let id = self.data.row_id(row);
        let cells = columns
            .iter()
            .map(|column| {
                let editor = self
                    .editor
                    .editing()
                    .filter(|cell| cell.row_id == id && cell.column_id == column.id)
                    .and_then(|cell| {
                        column.edit.as_ref().map(|edit| EditorView {
                            kind: edit.kind,
                            working: cell.working.clone(),
                            options: edit.options.clone(),
                            error: cell.error.clone(),
                            autofocus: true,
                        })
                    });
                CellView {
                    column_id: column.id.clone(),
                    text: column.display(row),
                    align: column.align,
                    editable: column.is_editable(),
                    editor,
                }
            })
            .collect();
        let actions = self
            .config
            .row_actions
            .iter()
            .filter(|a| !a.is_disabled(row))
            .map(|a| ActionView {
                id: a.id.clone(),
                label: a.label.clone(),
                destructive: a.destructive,
            })
            .collect();

        RowView {
            selected: selection.is_selected(&id),
            id,
            cells,
            actions,
        }
    }
}

impl std::fmt::Debug for DataFrameTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataFrameTable")
            .field("config", &self.config)
            .field("rows", &self.data.len())
            .field("generation", &self.data.generation())
            .field("loading", &self.loading)
            .field("search", &self.search)
            .field("sort", &self.sort)
            .field("pagination", &self.pagination)
            .field("staged", &self.staging.len())
            .finish_non_exhaustive()
    }
}

fn check_id_field(config: &TableConfig, data: &DataSet) -> Result<(), TableError> {
    if config.id_field != data.id_field() {
        return Err(TableError::config(format!(
            "table id field '{}' does not match data id field '{}'",
            config.id_field,
            data.id_field()
        )));
    }
    Ok(())
}
