//! Row derivation: filter, search, sort.

use log::trace;

use super::filter::ActiveFilters;
use super::filter::Filter;
use super::filter::QuickFilter;
use super::filter::matches_quick_filters;
use super::order::SortSpec;
use super::order::sort_rows;
use super::page::Pagination;
use super::search::SearchConfig;
use crate::model::Row;

/// Everything that decides which rows are shown and in what order.
///
/// Derivation always runs in the same order: custom filters and quick
/// filters, then search, then sort. Pagination is applied by the caller
/// afterwards with [`paginate`].
///
/// # Example
///
/// ```
/// use dataframe_lib::model::Row;
/// use dataframe_lib::query::{ActiveFilters, Query, SearchConfig, SortSpec};
///
/// let rows = vec![
///     Row::new().set("id", "1").set("name", "Widget B").set("status", "pending"),
///     Row::new().set("id", "2").set("name", "Widget A").set("status", "pending"),
///     Row::new().set("id", "3").set("name", "Gadget").set("status", "pending"),
///     Row::new().set("id", "4").set("name", "Widget C").set("status", "shipped"),
/// ];
///
/// let mut active = ActiveFilters::new();
/// active.set("status", ["pending"]);
/// let search = SearchConfig::new().term("widget");
/// let sort = SortSpec::asc("name");
///
/// let shown = Query::new()
///     .active(&active)
///     .search(&search)
///     .sort(Some(&sort))
///     .derive(&rows);
///
/// let ids: Vec<String> = shown.iter().map(|r| r.text("id")).collect();
/// assert_eq!(ids, ["2", "1"]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Query<'q> {
    filters: &'q [Filter],
    quick_filters: &'q [QuickFilter],
    active: Option<&'q ActiveFilters>,
    search: Option<&'q SearchConfig>,
    sort: Option<&'q SortSpec>,
}

impl<'q> Query<'q> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets caller-supplied filters; all of them must pass.
    pub fn filters(mut self, filters: &'q [Filter]) -> Self {
        self.filters = filters;
        self
    }

    /// Sets the declared quick filters used to resolve active filter ids.
    pub fn quick_filters(mut self, quick_filters: &'q [QuickFilter]) -> Self {
        self.quick_filters = quick_filters;
        self
    }

    /// Sets the active quick filter values.
    pub fn active(mut self, active: &'q ActiveFilters) -> Self {
        self.active = Some(active);
        self
    }

    /// Sets the search configuration.
    pub fn search(mut self, search: &'q SearchConfig) -> Self {
        self.search = Some(search);
        self
    }

    /// Sets the sort, `None` keeps the input order.
    pub fn sort(mut self, sort: Option<&'q SortSpec>) -> Self {
        self.sort = sort;
        self
    }

    /// Step 1: keeps rows passing every custom filter and active quick filter.
    pub fn apply_filters<'r>(&self, rows: Vec<&'r Row>) -> Vec<&'r Row> {
        let has_quick = self.active.is_some_and(|a| !a.is_empty());
        if self.filters.is_empty() && !has_quick {
            return rows;
        }
        rows.into_iter()
            .filter(|row| self.filters.iter().all(|f| f.matches(row)))
            .filter(|row| match self.active {
                Some(active) => matches_quick_filters(row, self.quick_filters, active),
                None => true,
            })
            .collect()
    }

    /// Step 2: keeps rows matching the search term.
    pub fn apply_search<'r>(&self, rows: Vec<&'r Row>) -> Vec<&'r Row> {
        match self.search {
            Some(search) if search.is_active() => {
                rows.into_iter().filter(|row| search.matches(row)).collect()
            }
            _ => rows,
        }
    }

    /// Step 3: stable sort.
    pub fn apply_sort<'r>(&self, mut rows: Vec<&'r Row>) -> Vec<&'r Row> {
        if let Some(sort) = self.sort {
            sort_rows(&mut rows, sort);
        }
        rows
    }

    /// Runs all steps in order over `rows`.
    pub fn derive<'r>(&self, rows: &'r [Row]) -> Vec<&'r Row> {
        let filtered = self.apply_filters(rows.iter().collect());
        let searched = self.apply_search(filtered);
        let sorted = self.apply_sort(searched);
        trace!("[query] derived {} of {} rows", sorted.len(), rows.len());
        sorted
    }

    /// Like [`derive`](Self::derive), cloning the result.
    pub fn derive_owned(&self, rows: &[Row]) -> Vec<Row> {
        self.derive(rows).into_iter().cloned().collect()
    }
}

/// Runs the filter, search and sort steps over `rows`.
pub fn derive<'r>(rows: &'r [Row], query: &Query<'_>) -> Vec<&'r Row> {
    query.derive(rows)
}

/// Returns the current page of already-derived rows.
pub fn paginate<'a, T>(rows: &'a [T], pagination: &Pagination) -> &'a [T] {
    pagination.slice(rows)
}
