//! Built-in row and bulk action behavior.

use std::rc::Rc;

use log::debug;
use log::info;
use log::warn;

use super::config::ActionKind;
use super::config::BulkAction;
use super::config::BulkHandler;
use super::config::RowAction;
use super::config::RowHandler;
use super::confirm::AutoConfirm;
use super::confirm::Confirm;
use super::intent::DataIntent;
use super::intent::IntentSink;
use crate::model::DataSet;
use crate::model::Row;
use crate::model::RowId;
use crate::model::Value;

/// Opens a url; returns an error if the system handler failed.
pub type Opener = Rc<dyn Fn(&str) -> std::io::Result<()>>;

/// Navigation override: receives the url.
pub type NavigateHandler = Rc<dyn Fn(&str)>;

/// Result of dispatching an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// The action ran (default behavior or override).
    Done,
    /// The user declined the confirmation prompt.
    Declined,
    /// The action is disabled for this row.
    Disabled,
    /// Nothing knew how to run the action.
    Unhandled,
}

/// Caller replacements for the built-in behaviors.
#[derive(Clone, Default)]
pub struct ActionOverrides {
    pub navigate: Option<NavigateHandler>,
    pub edit: Option<RowHandler>,
    pub delete: Option<RowHandler>,
    pub activate: Option<RowHandler>,
    pub deactivate: Option<RowHandler>,
    pub duplicate: Option<RowHandler>,
    pub bulk_activate: Option<BulkHandler>,
    pub bulk_deactivate: Option<BulkHandler>,
    pub bulk_delete: Option<BulkHandler>,
}

/// Runs row and bulk actions.
///
/// Built-in kinds have default behaviors that describe their effect as
/// [`DataIntent`]s; every default can be replaced by an override. Deleting
/// asks the [`Confirm`] collaborator first unless overridden.
///
/// # Example
///
/// ```
/// use dataframe_lib::action::{ActionManager, AutoConfirm, DataIntent, IntentLog};
/// use dataframe_lib::model::Row;
///
/// let log = IntentLog::new();
/// let manager = ActionManager::new(log.clone()).confirm(AutoConfirm(true));
///
/// let row = Row::new().set("id", "p-1").set("name", "Widget");
/// manager.delete("p-1", &row);
///
/// assert_eq!(log.take(), vec![DataIntent::Remove { ids: vec!["p-1".into()] }]);
/// ```
#[derive(Clone)]
pub struct ActionManager {
    sink: Rc<dyn IntentSink>,
    confirm: Rc<dyn Confirm>,
    opener: Opener,
    overrides: ActionOverrides,
    id_field: String,
    status_field: String,
}

impl ActionManager {
    /// Creates a manager that emits intents to `sink`.
    ///
    /// Until a prompt is set with [`confirm`](Self::confirm), confirmations
    /// are declined.
    pub fn new(sink: impl IntentSink + 'static) -> Self {
        Self {
            sink: Rc::new(sink),
            confirm: Rc::new(AutoConfirm(false)),
            opener: Rc::new(|url: &str| open::that(url)),
            overrides: ActionOverrides::default(),
            id_field: "id".into(),
            status_field: "status".into(),
        }
    }

    /// Sets the confirmation prompt.
    pub fn confirm(mut self, confirm: impl Confirm + 'static) -> Self {
        self.confirm = Rc::new(confirm);
        self
    }

    /// Returns a copy whose confirmations are already granted, for running
    /// work the user confirmed as a batch.
    pub fn preconfirmed(&self) -> Self {
        Self {
            confirm: Rc::new(AutoConfirm(true)),
            ..self.clone()
        }
    }

    /// Replaces the system url opener.
    pub fn opener<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> std::io::Result<()> + 'static,
    {
        self.opener = Rc::new(f);
        self
    }

    /// Sets all overrides at once.
    pub fn overrides(mut self, overrides: ActionOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Sets the identity field used when duplicating rows.
    pub fn id_field(mut self, field: impl Into<String>) -> Self {
        self.id_field = field.into();
        self
    }

    /// Sets the field activate/deactivate write to.
    pub fn status_field(mut self, field: impl Into<String>) -> Self {
        self.status_field = field.into();
        self
    }

    pub fn on_navigate<F: Fn(&str) + 'static>(mut self, f: F) -> Self {
        self.overrides.navigate = Some(Rc::new(f));
        self
    }

    pub fn on_edit<F: Fn(&str, &Row) + 'static>(mut self, f: F) -> Self {
        self.overrides.edit = Some(Rc::new(f));
        self
    }

    pub fn on_delete<F: Fn(&str, &Row) + 'static>(mut self, f: F) -> Self {
        self.overrides.delete = Some(Rc::new(f));
        self
    }

    pub fn on_activate<F: Fn(&str, &Row) + 'static>(mut self, f: F) -> Self {
        self.overrides.activate = Some(Rc::new(f));
        self
    }

    pub fn on_deactivate<F: Fn(&str, &Row) + 'static>(mut self, f: F) -> Self {
        self.overrides.deactivate = Some(Rc::new(f));
        self
    }

    pub fn on_duplicate<F: Fn(&str, &Row) + 'static>(mut self, f: F) -> Self {
        self.overrides.duplicate = Some(Rc::new(f));
        self
    }

    pub fn on_bulk_activate<F: Fn(&[RowId]) + 'static>(mut self, f: F) -> Self {
        self.overrides.bulk_activate = Some(Rc::new(f));
        self
    }

    pub fn on_bulk_deactivate<F: Fn(&[RowId]) + 'static>(mut self, f: F) -> Self {
        self.overrides.bulk_deactivate = Some(Rc::new(f));
        self
    }

    pub fn on_bulk_delete<F: Fn(&[RowId]) + 'static>(mut self, f: F) -> Self {
        self.overrides.bulk_delete = Some(Rc::new(f));
        self
    }

    // =========================================================================
    // Built-in row actions
    // =========================================================================

    /// Opens a url. Failures are logged.
    pub fn navigate(&self, url: &str) {
        if let Some(f) = &self.overrides.navigate {
            f(url);
            return;
        }
        debug!("[action] opening {url}");
        if let Err(e) = (self.opener)(url) {
            warn!("[action] failed to open {url}: {e}");
        }
    }

    /// Starts editing a row. The default only logs.
    pub fn edit(&self, row_id: &str, row: &Row) {
        match &self.overrides.edit {
            Some(f) => f(row_id, row),
            None => info!("[action] edit requested for {row_id}"),
        }
    }

    /// Deletes a row after confirmation. Returns `false` if declined.
    pub fn delete(&self, row_id: &str, row: &Row) -> bool {
        if let Some(f) = &self.overrides.delete {
            f(row_id, row);
            return true;
        }
        if !self
            .confirm
            .confirm("Delete", "Are you sure you want to delete this item?")
        {
            debug!("[action] delete of {row_id} declined");
            return false;
        }
        self.sink.emit(DataIntent::Remove {
            ids: vec![row_id.to_string()],
        });
        true
    }

    /// Marks a row active.
    pub fn activate(&self, row_id: &str, row: &Row) {
        match &self.overrides.activate {
            Some(f) => f(row_id, row),
            None => self.set_status(&[row_id.to_string()], "active"),
        }
    }

    /// Marks a row inactive.
    pub fn deactivate(&self, row_id: &str, row: &Row) {
        match &self.overrides.deactivate {
            Some(f) => f(row_id, row),
            None => self.set_status(&[row_id.to_string()], "inactive"),
        }
    }

    /// Appends a copy of a row with a derived id.
    pub fn duplicate(&self, row_id: &str, row: &Row) {
        if let Some(f) = &self.overrides.duplicate {
            f(row_id, row);
            return;
        }
        self.sink.emit(DataIntent::Append {
            row: duplicate_row(row, &self.id_field, row_id),
        });
    }

    // =========================================================================
    // Built-in bulk actions
    // =========================================================================

    pub fn bulk_activate(&self, ids: &[RowId]) {
        match &self.overrides.bulk_activate {
            Some(f) => f(ids),
            None => self.set_status(ids, "active"),
        }
    }

    pub fn bulk_deactivate(&self, ids: &[RowId]) {
        match &self.overrides.bulk_deactivate {
            Some(f) => f(ids),
            None => self.set_status(ids, "inactive"),
        }
    }

    /// Deletes rows after one confirmation for the whole batch. Returns
    /// `false` if declined.
    pub fn bulk_delete(&self, ids: &[RowId]) -> bool {
        if let Some(f) = &self.overrides.bulk_delete {
            f(ids);
            return true;
        }
        let message = match ids.len() {
            1 => "Delete 1 item?".to_string(),
            n => format!("Delete {n} items?"),
        };
        if !self.confirm.confirm("Delete", &message) {
            debug!("[action] bulk delete of {} rows declined", ids.len());
            return false;
        }
        self.sink.emit(DataIntent::Remove { ids: ids.to_vec() });
        true
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Runs a row action on one row.
    ///
    /// An action's own handler wins over the built-in behavior of its kind.
    pub fn execute(&self, action: &RowAction, row_id: &str, row: &Row) -> Dispatch {
        if action.is_disabled(row) {
            debug!("[action] {} is disabled for {row_id}", action.id);
            return Dispatch::Disabled;
        }
        if let Some(handler) = action.handler_fn() {
            handler(row_id, row);
            return Dispatch::Done;
        }

        match &action.kind {
            ActionKind::Navigate => match action.url_for(row) {
                Some(url) => self.navigate(&url),
                None => {
                    warn!("[action] {} has no url", action.id);
                    return Dispatch::Unhandled;
                }
            },
            ActionKind::Edit => self.edit(row_id, row),
            ActionKind::Delete => {
                if !self.delete(row_id, row) {
                    return Dispatch::Declined;
                }
            }
            ActionKind::Activate => self.activate(row_id, row),
            ActionKind::Deactivate => self.deactivate(row_id, row),
            ActionKind::Duplicate => self.duplicate(row_id, row),
            ActionKind::Custom => {
                warn!("[action] custom action {} has no handler", action.id);
                return Dispatch::Unhandled;
            }
            ActionKind::Other(kind) => {
                warn!("[action] unknown action kind {kind:?} for {}", action.id);
                return Dispatch::Unhandled;
            }
        }
        Dispatch::Done
    }

    /// Runs a bulk action on a set of ids.
    ///
    /// Kinds without a bulk behavior of their own (edit, duplicate) run their
    /// row behavior once per id found in `data`.
    pub fn execute_bulk(&self, action: &BulkAction, ids: &[RowId], data: &DataSet) -> Dispatch {
        if ids.is_empty() {
            debug!("[action] {} skipped, nothing selected", action.id);
            return Dispatch::Unhandled;
        }
        if let Some(handler) = action.handler_fn() {
            handler(ids);
            return Dispatch::Done;
        }

        match &action.kind {
            ActionKind::Activate => self.bulk_activate(ids),
            ActionKind::Deactivate => self.bulk_deactivate(ids),
            ActionKind::Delete => {
                if !self.bulk_delete(ids) {
                    return Dispatch::Declined;
                }
            }
            ActionKind::Edit | ActionKind::Duplicate => {
                for id in ids {
                    let Some(row) = data.get(id) else {
                        warn!("[action] {} skipped unknown row {id}", action.id);
                        continue;
                    };
                    if action.kind == ActionKind::Edit {
                        self.edit(id, row);
                    } else {
                        self.duplicate(id, row);
                    }
                }
            }
            ActionKind::Navigate | ActionKind::Custom => {
                warn!("[action] bulk action {} has no handler", action.id);
                return Dispatch::Unhandled;
            }
            ActionKind::Other(kind) => {
                warn!("[action] unknown action kind {kind:?} for {}", action.id);
                return Dispatch::Unhandled;
            }
        }
        Dispatch::Done
    }

    fn set_status(&self, ids: &[RowId], status: &str) {
        self.sink.emit(DataIntent::SetField {
            ids: ids.to_vec(),
            field: self.status_field.clone(),
            value: Value::from(status),
        });
    }
}

impl std::fmt::Debug for ActionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionManager")
            .field("id_field", &self.id_field)
            .field("status_field", &self.status_field)
            .finish_non_exhaustive()
    }
}

/// Copies a row with id `"{id}-copy"`, a name decorated with `" (Copy)"`
/// and an SKU with `"-COPY"` when those fields are strings.
pub fn duplicate_row(row: &Row, id_field: &str, row_id: &str) -> Row {
    let mut copy = row.clone();
    copy.insert(id_field, format!("{row_id}-copy"));
    if let Some(Value::String(name)) = row.get("name") {
        copy.insert("name", format!("{name} (Copy)"));
    }
    if let Some(Value::String(sku)) = row.get("sku") {
        copy.insert("sku", format!("{sku}-COPY"));
    }
    copy
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::cell::RefCell;

    use super::*;
    use crate::action::IntentLog;

    fn product() -> Row {
        Row::new()
            .set("id", "p-1")
            .set("name", "Widget")
            .set("sku", "W-1")
            .set("status", "inactive")
    }

    #[test]
    fn test_delete_asks_first() {
        let log = IntentLog::new();
        let asked = Rc::new(RefCell::new(Vec::new()));
        let record = asked.clone();
        let manager = ActionManager::new(log.clone()).confirm(move |_: &str, msg: &str| {
            record.borrow_mut().push(msg.to_string());
            false
        });

        assert!(!manager.delete("p-1", &product()));
        assert!(log.is_empty());
        assert_eq!(
            *asked.borrow(),
            vec!["Are you sure you want to delete this item?".to_string()]
        );
    }

    #[test]
    fn test_delete_override_skips_confirmation() {
        let log = IntentLog::new();
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let manager = ActionManager::new(log.clone()).on_delete(move |_, _| counter.set(counter.get() + 1));

        assert!(manager.delete("p-1", &product()));
        assert_eq!(calls.get(), 1);
        assert!(log.is_empty());
    }

    #[test]
    fn test_activate_emits_status_change() {
        let log = IntentLog::new();
        let manager = ActionManager::new(log.clone());
        manager.activate("p-1", &product());
        assert_eq!(
            log.take(),
            vec![DataIntent::SetField {
                ids: vec!["p-1".into()],
                field: "status".into(),
                value: Value::from("active"),
            }]
        );
    }

    #[test]
    fn test_duplicate_decorates_copy() {
        let copy = duplicate_row(&product(), "id", "p-1");
        assert_eq!(copy.text("id"), "p-1-copy");
        assert_eq!(copy.text("name"), "Widget (Copy)");
        assert_eq!(copy.text("sku"), "W-1-COPY");

        let plain = duplicate_row(&Row::new().set("id", 3i64).set("name", 5i64), "id", "3");
        assert_eq!(plain.text("name"), "5");
    }

    #[test]
    fn test_bulk_delete_confirms_once() {
        let log = IntentLog::new();
        let asked = Rc::new(RefCell::new(Vec::new()));
        let record = asked.clone();
        let manager = ActionManager::new(log.clone()).confirm(move |_: &str, msg: &str| {
            record.borrow_mut().push(msg.to_string());
            true
        });

        let ids: Vec<RowId> = vec!["a".into(), "b".into(), "c".into()];
        assert!(manager.bulk_delete(&ids));
        assert_eq!(*asked.borrow(), vec!["Delete 3 items?".to_string()]);
        assert_eq!(log.take(), vec![DataIntent::Remove { ids }]);
    }

    #[test]
    fn test_navigate_failure_is_logged_not_raised() {
        let manager = ActionManager::new(IntentLog::new())
            .opener(|_| Err(std::io::Error::other("no browser")));
        manager.navigate("https://example.com");
    }

    #[test]
    fn test_execute_routes_by_kind() {
        let log = IntentLog::new();
        let opened = Rc::new(RefCell::new(Vec::new()));
        let record = opened.clone();
        let manager = ActionManager::new(log.clone()).opener(move |url| {
            record.borrow_mut().push(url.to_string());
            Ok(())
        });
        let row = product();

        let view = RowAction::new("view", "View", ActionKind::Navigate).url("/products/{id}");
        assert_eq!(manager.execute(&view, "p-1", &row), Dispatch::Done);
        assert_eq!(*opened.borrow(), vec!["/products/p-1".to_string()]);

        let dup = RowAction::new("dup", "Duplicate", ActionKind::Duplicate);
        assert_eq!(manager.execute(&dup, "p-1", &row), Dispatch::Done);
        assert_eq!(log.len(), 1);

        let odd = RowAction::new("odd", "Odd", ActionKind::from("archive"));
        assert_eq!(manager.execute(&odd, "p-1", &row), Dispatch::Unhandled);

        let hidden = RowAction::new("on", "Activate", ActionKind::Activate)
            .disabled(|r| r.text("status") == "inactive");
        assert_eq!(manager.execute(&hidden, "p-1", &row), Dispatch::Disabled);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_execute_bulk() {
        let log = IntentLog::new();
        let manager = ActionManager::new(log.clone());
        let data = DataSet::new("id", vec![product()]).unwrap();
        let ids: Vec<RowId> = vec!["p-1".into()];

        let off = BulkAction::new("off", "Deactivate", ActionKind::Deactivate);
        assert_eq!(manager.execute_bulk(&off, &ids, &data), Dispatch::Done);

        let rm = BulkAction::new("rm", "Delete", ActionKind::Delete);
        assert_eq!(manager.execute_bulk(&rm, &ids, &data), Dispatch::Declined);

        assert_eq!(manager.execute_bulk(&off, &[], &data), Dispatch::Unhandled);
        assert_eq!(log.len(), 1);
    }
}
