//! Row and bulk action declarations.

use std::rc::Rc;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;

use crate::model::Row;
use crate::model::RowId;

/// Handler of a row action: `(row_id, row)`.
pub type RowHandler = Rc<dyn Fn(&str, &Row)>;

/// Handler of a bulk action: the selected ids.
pub type BulkHandler = Rc<dyn Fn(&[RowId])>;

/// Builds a navigation url for a row.
pub type UrlBuilder = Rc<dyn Fn(&Row) -> String>;

/// Hides a row action from rows it does not apply to.
pub type DisabledPredicate = Rc<dyn Fn(&Row) -> bool>;

/// Semantic kind of an action, which selects its default behavior.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Navigate,
    Edit,
    Delete,
    Activate,
    Deactivate,
    Duplicate,
    /// Runs the action's own handler.
    Custom,
    /// A kind the engine does not know.
    Other(String),
}

impl ActionKind {
    pub fn as_str(&self) -> &str {
        match self {
            ActionKind::Navigate => "navigate",
            ActionKind::Edit => "edit",
            ActionKind::Delete => "delete",
            ActionKind::Activate => "activate",
            ActionKind::Deactivate => "deactivate",
            ActionKind::Duplicate => "duplicate",
            ActionKind::Custom => "custom",
            ActionKind::Other(s) => s,
        }
    }

    /// Returns `true` for kinds that remove data.
    pub fn is_destructive(&self) -> bool {
        matches!(self, ActionKind::Delete)
    }
}

impl From<&str> for ActionKind {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "navigate" | "view" => ActionKind::Navigate,
            "edit" => ActionKind::Edit,
            "delete" => ActionKind::Delete,
            "activate" => ActionKind::Activate,
            "deactivate" => ActionKind::Deactivate,
            "duplicate" => ActionKind::Duplicate,
            "custom" => ActionKind::Custom,
            _ => ActionKind::Other(s.to_string()),
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ActionKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ActionKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(ActionKind::from(s.as_str()))
    }
}

/// An action offered in each row's menu.
///
/// # Example
///
/// ```
/// use dataframe_lib::action::{ActionKind, RowAction};
/// use dataframe_lib::model::Row;
///
/// let view = RowAction::new("view", "View order", ActionKind::Navigate)
///     .url("/orders/{id}");
/// let cancel = RowAction::new("cancel", "Cancel", ActionKind::Custom)
///     .destructive()
///     .disabled(|row| row.text("status") == "shipped")
///     .handler(|id, _row| println!("cancel {id}"));
///
/// let shipped = Row::new().set("id", "o-1").set("status", "shipped");
/// assert_eq!(view.url_for(&shipped).as_deref(), Some("/orders/o-1"));
/// assert!(cancel.is_disabled(&shipped));
/// ```
#[derive(Clone)]
pub struct RowAction {
    pub id: String,
    pub label: String,
    pub kind: ActionKind,
    pub destructive: bool,
    url: Option<UrlBuilder>,
    disabled: Option<DisabledPredicate>,
    handler: Option<RowHandler>,
}

impl RowAction {
    pub fn new(id: impl Into<String>, label: impl Into<String>, kind: ActionKind) -> Self {
        let destructive = kind.is_destructive();
        Self {
            id: id.into(),
            label: label.into(),
            kind,
            destructive,
            url: None,
            disabled: None,
            handler: None,
        }
    }

    /// Marks the action as destructive.
    pub fn destructive(mut self) -> Self {
        self.destructive = true;
        self
    }

    /// Sets a url template; `{field}` placeholders are replaced with row text.
    pub fn url(mut self, template: impl Into<String>) -> Self {
        let template = template.into();
        self.url = Some(Rc::new(move |row: &Row| expand_template(&template, row)));
        self
    }

    /// Sets a url builder.
    pub fn url_with<F>(mut self, f: F) -> Self
    where
        F: Fn(&Row) -> String + 'static,
    {
        self.url = Some(Rc::new(f));
        self
    }

    /// Hides the action for rows where `f` returns `true`.
    pub fn disabled<F>(mut self, f: F) -> Self
    where
        F: Fn(&Row) -> bool + 'static,
    {
        self.disabled = Some(Rc::new(f));
        self
    }

    /// Sets the handler. For built-in kinds it replaces the default behavior.
    pub fn handler<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &Row) + 'static,
    {
        self.handler = Some(Rc::new(f));
        self
    }

    pub fn url_for(&self, row: &Row) -> Option<String> {
        self.url.as_ref().map(|f| f(row))
    }

    pub fn is_disabled(&self, row: &Row) -> bool {
        self.disabled.as_ref().is_some_and(|f| f(row))
    }

    pub fn handler_fn(&self) -> Option<&RowHandler> {
        self.handler.as_ref()
    }
}

impl std::fmt::Debug for RowAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowAction")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("kind", &self.kind)
            .field("destructive", &self.destructive)
            .field("url", &self.url.is_some())
            .field("disabled", &self.disabled.is_some())
            .field("handler", &self.handler.is_some())
            .finish()
    }
}

/// An action applied to the selected rows.
#[derive(Clone)]
pub struct BulkAction {
    pub id: String,
    pub label: String,
    pub kind: ActionKind,
    pub destructive: bool,
    handler: Option<BulkHandler>,
}

impl BulkAction {
    pub fn new(id: impl Into<String>, label: impl Into<String>, kind: ActionKind) -> Self {
        let destructive = kind.is_destructive();
        Self {
            id: id.into(),
            label: label.into(),
            kind,
            destructive,
            handler: None,
        }
    }

    /// Marks the action as destructive.
    pub fn destructive(mut self) -> Self {
        self.destructive = true;
        self
    }

    /// Sets the handler. For built-in kinds it replaces the default behavior.
    pub fn handler<F>(mut self, f: F) -> Self
    where
        F: Fn(&[RowId]) + 'static,
    {
        self.handler = Some(Rc::new(f));
        self
    }

    pub fn handler_fn(&self) -> Option<&BulkHandler> {
        self.handler.as_ref()
    }
}

impl std::fmt::Debug for BulkAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BulkAction")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("kind", &self.kind)
            .field("destructive", &self.destructive)
            .field("handler", &self.handler.is_some())
            .finish()
    }
}

/// Replaces `{field}` placeholders with the row's field text.
///
/// Unknown fields expand to the empty string; an unclosed `{` is kept.
pub fn expand_template(template: &str, row: &Row) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                out.push_str(&row.text(&after[..close]));
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_str() {
        assert_eq!(ActionKind::from("Delete"), ActionKind::Delete);
        assert_eq!(
            ActionKind::from("archive"),
            ActionKind::Other("archive".into())
        );
        let kind: ActionKind = serde_json::from_str(r#""activate""#).unwrap();
        assert_eq!(kind, ActionKind::Activate);
    }

    #[test]
    fn test_delete_is_destructive_by_default() {
        assert!(BulkAction::new("rm", "Delete", ActionKind::Delete).destructive);
        assert!(!BulkAction::new("on", "Activate", ActionKind::Activate).destructive);
    }

    #[test]
    fn test_expand_template() {
        let row = Row::new().set("id", 42i64).set("kind", "order");
        assert_eq!(expand_template("/{kind}s/{id}/edit", &row), "/orders/42/edit");
        assert_eq!(expand_template("/x/{missing}", &row), "/x/");
        assert_eq!(expand_template("/x/{id", &row), "/x/{id");
    }
}
