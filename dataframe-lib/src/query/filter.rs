//! Row filters and quick filters.

use std::cmp::Ordering;
use std::rc::Rc;

use serde::Deserialize;
use serde::Serialize;

use super::order::compare_values;
use crate::model::Row;
use crate::model::Value;

/// Type alias for caller-supplied row predicates.
pub type RowPredicate = Rc<dyn Fn(&Row) -> bool>;

/// A named caller-supplied predicate.
#[derive(Clone)]
pub struct Predicate {
    name: String,
    f: RowPredicate,
}

impl Predicate {
    pub fn new<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Row) -> bool + 'static,
    {
        Self {
            name: name.into(),
            f: Rc::new(f),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn test(&self, row: &Row) -> bool {
        (self.f)(row)
    }
}

impl std::fmt::Debug for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Predicate({:?})", self.name)
    }
}

impl PartialEq for Predicate {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && Rc::ptr_eq(&self.f, &other.f)
    }
}

/// A filter condition on rows.
///
/// Filters can be combined using logical operators (`And`, `Or`, `Not`) to
/// build complex conditions. Comparisons use the same ordering as sorting;
/// text operators are case-insensitive. A missing or null field never
/// satisfies an ordering or text operator.
///
/// # Example
///
/// ```
/// use dataframe_lib::model::Row;
/// use dataframe_lib::query::Filter;
///
/// // Amount range
/// let filter = Filter::ge("amount", 100).and_also(Filter::lt("amount", 500));
///
/// let row = Row::new().set("amount", 250i64);
/// assert!(filter.matches(&row));
///
/// // Escape hatch for anything else
/// let big_spender = Filter::predicate("big spender", |row| {
///     row.get_float("amount").ok().flatten().unwrap_or(0.0) > 1000.0
/// });
/// assert!(!big_spender.matches(&row));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Equality: `field == value`
    Eq(String, Value),
    /// Not equal: `field != value`
    Ne(String, Value),
    /// Greater than: `field > value`
    Gt(String, Value),
    /// Greater than or equal: `field >= value`
    Ge(String, Value),
    /// Less than: `field < value`
    Lt(String, Value),
    /// Less than or equal: `field <= value`
    Le(String, Value),
    /// Field text contains the substring.
    Contains(String, String),
    /// Field text starts with the prefix.
    StartsWith(String, String),
    /// Field text ends with the suffix.
    EndsWith(String, String),
    /// Field text equals one of the values.
    In(String, Vec<String>),
    /// Field is missing or null.
    IsNull(String),
    /// Field is present and not null.
    IsNotNull(String),
    /// Logical AND of multiple filters.
    And(Vec<Filter>),
    /// Logical OR of multiple filters.
    Or(Vec<Filter>),
    /// Negation.
    Not(Box<Filter>),
    /// Caller-supplied predicate (escape hatch).
    Predicate(Predicate),
}

impl Filter {
    /// Creates an equality filter.
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Eq(field.into(), value.into())
    }

    /// Creates a not-equal filter.
    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Ne(field.into(), value.into())
    }

    /// Creates a greater-than filter.
    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Gt(field.into(), value.into())
    }

    /// Creates a greater-than-or-equal filter.
    pub fn ge(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Ge(field.into(), value.into())
    }

    /// Creates a less-than filter.
    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Lt(field.into(), value.into())
    }

    /// Creates a less-than-or-equal filter.
    pub fn le(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Le(field.into(), value.into())
    }

    /// Creates a contains filter.
    pub fn contains(field: impl Into<String>, value: impl Into<String>) -> Self {
        Filter::Contains(field.into(), value.into())
    }

    /// Creates a starts-with filter.
    pub fn starts_with(field: impl Into<String>, value: impl Into<String>) -> Self {
        Filter::StartsWith(field.into(), value.into())
    }

    /// Creates an ends-with filter.
    pub fn ends_with(field: impl Into<String>, value: impl Into<String>) -> Self {
        Filter::EndsWith(field.into(), value.into())
    }

    /// Creates a one-of filter.
    pub fn one_of<I, S>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Filter::In(field.into(), values.into_iter().map(Into::into).collect())
    }

    /// Creates an is-null filter.
    pub fn is_null(field: impl Into<String>) -> Self {
        Filter::IsNull(field.into())
    }

    /// Creates an is-not-null filter.
    pub fn is_not_null(field: impl Into<String>) -> Self {
        Filter::IsNotNull(field.into())
    }

    /// Creates a logical AND of multiple filters.
    pub fn and(filters: impl IntoIterator<Item = Filter>) -> Self {
        Filter::And(filters.into_iter().collect())
    }

    /// Creates a logical OR of multiple filters.
    pub fn or(filters: impl IntoIterator<Item = Filter>) -> Self {
        Filter::Or(filters.into_iter().collect())
    }

    /// Creates a filter from a closure.
    pub fn predicate<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Row) -> bool + 'static,
    {
        Filter::Predicate(Predicate::new(name, f))
    }

    /// Negates this filter.
    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        match self {
            Filter::Not(inner) => *inner,
            other => Filter::Not(Box::new(other)),
        }
    }

    /// Combines this filter with another using logical AND.
    pub fn and_also(self, other: Filter) -> Self {
        match self {
            Filter::And(mut filters) => {
                filters.push(other);
                Filter::And(filters)
            }
            _ => Filter::And(vec![self, other]),
        }
    }

    /// Combines this filter with another using logical OR.
    pub fn or_else(self, other: Filter) -> Self {
        match self {
            Filter::Or(mut filters) => {
                filters.push(other);
                Filter::Or(filters)
            }
            _ => Filter::Or(vec![self, other]),
        }
    }

    /// Evaluates the filter against a row.
    pub fn matches(&self, row: &Row) -> bool {
        match self {
            Filter::Eq(field, value) => cmp_field(row, field, value) == Some(Ordering::Equal),
            Filter::Ne(field, value) => cmp_field(row, field, value) != Some(Ordering::Equal),
            Filter::Gt(field, value) => cmp_field(row, field, value) == Some(Ordering::Greater),
            Filter::Ge(field, value) => matches!(
                cmp_field(row, field, value),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Filter::Lt(field, value) => cmp_field(row, field, value) == Some(Ordering::Less),
            Filter::Le(field, value) => matches!(
                cmp_field(row, field, value),
                Some(Ordering::Less | Ordering::Equal)
            ),
            Filter::Contains(field, needle) => {
                text_of(row, field).is_some_and(|t| t.contains(&needle.to_lowercase()))
            }
            Filter::StartsWith(field, prefix) => {
                text_of(row, field).is_some_and(|t| t.starts_with(&prefix.to_lowercase()))
            }
            Filter::EndsWith(field, suffix) => {
                text_of(row, field).is_some_and(|t| t.ends_with(&suffix.to_lowercase()))
            }
            Filter::In(field, values) => text_of(row, field)
                .is_some_and(|t| values.iter().any(|v| v.to_lowercase() == t)),
            Filter::IsNull(field) => row.present(field).is_none(),
            Filter::IsNotNull(field) => row.present(field).is_some(),
            Filter::And(filters) => filters.iter().all(|f| f.matches(row)),
            Filter::Or(filters) => filters.iter().any(|f| f.matches(row)),
            Filter::Not(inner) => !inner.matches(row),
            Filter::Predicate(p) => p.test(row),
        }
    }
}

fn cmp_field(row: &Row, field: &str, value: &Value) -> Option<Ordering> {
    if value.is_null() {
        return row.present(field).is_none().then_some(Ordering::Equal);
    }
    row.present(field).map(|v| compare_values(v, value))
}

fn text_of(row: &Row, field: &str) -> Option<String> {
    row.present(field).map(|v| v.to_text().to_lowercase())
}

// =============================================================================
// Quick filters
// =============================================================================

/// One choice offered by a quick filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    pub label: String,
    pub value: String,
}

impl FilterOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// A declared quick filter: a field and the values a user can pick from.
///
/// # Example
///
/// ```
/// use dataframe_lib::query::QuickFilter;
///
/// let status = QuickFilter::new("status", "Status")
///     .option("Pending", "pending")
///     .option("Shipped", "shipped");
/// assert_eq!(status.field, "status");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickFilter {
    pub id: String,
    pub field: String,
    pub label: String,
    #[serde(default)]
    pub options: Vec<FilterOption>,
}

impl QuickFilter {
    /// Creates a quick filter whose id is also the filtered field.
    pub fn new(field: impl Into<String>, label: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            id: field.clone(),
            field,
            label: label.into(),
            options: Vec::new(),
        }
    }

    /// Sets a distinct id for the filter.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Adds an option.
    pub fn option(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.push(FilterOption::new(label, value));
        self
    }
}

/// The values chosen for one quick filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveFilter {
    pub filter_id: String,
    pub values: Vec<String>,
}

/// Active quick filters in activation order.
///
/// An entry only exists while it has at least one value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveFilters {
    entries: Vec<ActiveFilter>,
}

impl ActiveFilters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the chosen values of a filter. An empty value set removes it.
    pub fn set<I, S>(&mut self, filter_id: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            self.remove(filter_id);
            return;
        }
        match self.entries.iter_mut().find(|e| e.filter_id == filter_id) {
            Some(entry) => entry.values = values,
            None => self.entries.push(ActiveFilter {
                filter_id: filter_id.to_string(),
                values,
            }),
        }
    }

    /// Adds or removes a single value of a filter.
    pub fn toggle_value(&mut self, filter_id: &str, value: &str) {
        let mut values = self
            .get(filter_id)
            .map(|e| e.values.clone())
            .unwrap_or_default();
        match values.iter().position(|v| v == value) {
            Some(pos) => {
                values.remove(pos);
            }
            None => values.push(value.to_string()),
        }
        self.set(filter_id, values);
    }

    pub fn get(&self, filter_id: &str) -> Option<&ActiveFilter> {
        self.entries.iter().find(|e| e.filter_id == filter_id)
    }

    pub fn remove(&mut self, filter_id: &str) -> Option<ActiveFilter> {
        let pos = self.entries.iter().position(|e| e.filter_id == filter_id)?;
        Some(self.entries.remove(pos))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActiveFilter> {
        self.entries.iter()
    }
}

/// Returns `true` if the row passes every active quick filter.
///
/// Within one filter the chosen values OR together; a value matches when the
/// lowercased field text equals or contains it. An active filter whose id is
/// not declared filters on the field with that name.
pub fn matches_quick_filters(row: &Row, declared: &[QuickFilter], active: &ActiveFilters) -> bool {
    active.iter().all(|entry| {
        let field = declared
            .iter()
            .find(|q| q.id == entry.filter_id)
            .map(|q| q.field.as_str())
            .unwrap_or(entry.filter_id.as_str());
        let text = row.text(field).to_lowercase();
        entry.values.iter().any(|v| {
            let v = v.to_lowercase();
            text == v || text.contains(&v)
        })
    })
}
