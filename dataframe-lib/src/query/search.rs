//! Free-text search.

use serde::Deserialize;
use serde::Serialize;

use crate::model::Row;

/// Free-text search over row fields.
///
/// A row matches when the term is a substring of at least one searched
/// field's text. The search is case-insensitive unless configured
/// otherwise; an empty or whitespace-only term matches every row.
///
/// # Example
///
/// ```
/// use dataframe_lib::model::Row;
/// use dataframe_lib::query::SearchConfig;
///
/// let search = SearchConfig::new()
///     .fields(["customer", "sku"])
///     .term("acme");
///
/// let row = Row::new().set("customer", "ACME Corp").set("note", "rush");
/// assert!(search.matches(&row));
/// assert!(!search.clone().term("rush").matches(&row));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Current search term.
    pub term: String,
    /// Fields to search; `None` searches every field.
    pub fields: Option<Vec<String>>,
    /// Match case exactly.
    pub case_sensitive: bool,
}

impl SearchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the search term.
    pub fn term(mut self, term: impl Into<String>) -> Self {
        self.term = term.into();
        self
    }

    /// Restricts the searched fields.
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Enables case-sensitive matching.
    pub fn case_sensitive(mut self, yes: bool) -> Self {
        self.case_sensitive = yes;
        self
    }

    /// Returns `true` if the term filters anything.
    pub fn is_active(&self) -> bool {
        !self.term.trim().is_empty()
    }

    /// Tests a row against the current term.
    pub fn matches(&self, row: &Row) -> bool {
        matches_term(row, &self.term, self.fields.as_deref(), self.case_sensitive)
    }
}

/// Tests a row against a search term.
pub fn matches_term(row: &Row, term: &str, fields: Option<&[String]>, case_sensitive: bool) -> bool {
    if term.trim().is_empty() {
        return true;
    }

    let needle = if case_sensitive {
        term.to_string()
    } else {
        term.to_lowercase()
    };
    let hit = |text: String| {
        if case_sensitive {
            text.contains(&needle)
        } else {
            text.to_lowercase().contains(&needle)
        }
    };

    match fields {
        Some(fields) => fields
            .iter()
            .filter_map(|f| row.present(f))
            .any(|v| hit(v.to_text())),
        None => row
            .fields()
            .values()
            .filter(|v| !v.is_null())
            .any(|v| hit(v.to_text())),
    }
}
