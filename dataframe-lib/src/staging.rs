//! Action staging queue.
//!
//! Users accumulate row and bulk actions here and run them as one batch.
//! Staging never runs anything; [`StagingQueue::request_execute`] runs
//! non-destructive batches at once and holds destructive ones until
//! [`StagingQueue::confirm_execute`].

use std::collections::BTreeMap;

use log::debug;
use log::info;
use log::warn;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::model::RowId;

/// Whether a staged entry targets a bulk action or a row action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StagedKind {
    Bulk,
    Row,
}

/// One staged action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedAction {
    pub id: Uuid,
    pub kind: StagedKind,
    pub action_id: String,
    pub targets: Vec<RowId>,
    pub label: String,
    pub destructive: bool,
}

impl StagedAction {
    /// Stages a bulk action over the given ids.
    pub fn bulk(
        action_id: impl Into<String>,
        label: impl Into<String>,
        targets: Vec<RowId>,
        destructive: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: StagedKind::Bulk,
            action_id: action_id.into(),
            targets,
            label: label.into(),
            destructive,
        }
    }

    /// Stages a row action on one row.
    pub fn row(
        action_id: impl Into<String>,
        label: impl Into<String>,
        target: impl Into<RowId>,
        destructive: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: StagedKind::Row,
            action_id: action_id.into(),
            targets: vec![target.into()],
            label: label.into(),
            destructive,
        }
    }
}

/// Grouped view of the queue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StagingSummary {
    pub total: usize,
    /// Staged entries per action id.
    pub by_action: BTreeMap<String, usize>,
    /// Distinct target ids in first-seen order.
    pub affected_ids: Vec<RowId>,
    pub has_destructive: bool,
}

impl std::fmt::Display for StagingSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} staged action(s) affecting {} row(s)",
            self.total,
            self.affected_ids.len()
        )?;
        for (action, count) in &self.by_action {
            write!(f, "\n  {action}: {count}")?;
        }
        if self.has_destructive {
            write!(f, "\n  includes destructive actions")?;
        }
        Ok(())
    }
}

/// Outcome of running the queue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExecutionReport {
    /// Ids of the staged entries that ran, in queue order.
    pub executed: Vec<Uuid>,
    /// Ids of the staged entries whose action could not be resolved.
    pub skipped: Vec<Uuid>,
}

/// Result of asking to run the queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecuteRequest {
    /// The queue was empty.
    Empty,
    /// The queue had no destructive entries and ran.
    Executed(ExecutionReport),
    /// The queue holds destructive entries; nothing ran.
    NeedsConfirmation(StagingSummary),
}

/// Resolves and runs one staged action.
pub trait StagedExecutor {
    /// Runs the action. Returns `false` if its definition could not be found.
    fn run(&mut self, staged: &StagedAction) -> bool;
}

impl<F> StagedExecutor for F
where
    F: FnMut(&StagedAction) -> bool,
{
    fn run(&mut self, staged: &StagedAction) -> bool {
        self(staged)
    }
}

/// Insertion-ordered queue of staged actions.
///
/// # Example
///
/// ```
/// use dataframe_lib::staging::{ExecuteRequest, StagedAction, StagingQueue};
///
/// let mut queue = StagingQueue::new();
/// queue.stage(StagedAction::bulk("activate", "Activate", vec!["a".into()], false));
/// queue.stage(StagedAction::row("delete", "Delete", "b", true));
///
/// let mut ran = Vec::new();
/// let mut run = |s: &StagedAction| {
///     ran.push(s.action_id.clone());
///     true
/// };
///
/// assert!(matches!(
///     queue.request_execute(&mut run),
///     ExecuteRequest::NeedsConfirmation(_)
/// ));
/// let report = queue.confirm_execute(&mut run).unwrap();
/// assert_eq!(report.executed.len(), 2);
/// assert!(queue.is_empty());
/// drop(run);
/// assert_eq!(ran, ["activate", "delete"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StagingQueue {
    actions: Vec<StagedAction>,
    pending: Option<StagingSummary>,
}

impl StagingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an action. Never runs it.
    pub fn stage(&mut self, action: StagedAction) -> Uuid {
        debug!(
            "[staging] staged {} on {} target(s)",
            action.action_id,
            action.targets.len()
        );
        let id = action.id;
        self.actions.push(action);
        id
    }

    /// Removes every entry with this action id. Returns how many were removed.
    pub fn remove(&mut self, action_id: &str) -> usize {
        let before = self.actions.len();
        self.actions.retain(|a| a.action_id != action_id);
        before - self.actions.len()
    }

    /// Removes a single entry.
    pub fn remove_staged(&mut self, id: Uuid) -> Option<StagedAction> {
        let pos = self.actions.iter().position(|a| a.id == id)?;
        Some(self.actions.remove(pos))
    }

    /// Empties the queue and drops any pending confirmation.
    pub fn clear(&mut self) {
        self.actions.clear();
        self.pending = None;
    }

    pub fn actions(&self) -> &[StagedAction] {
        &self.actions
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Returns `true` while a destructive batch waits for confirmation.
    pub fn is_awaiting_confirmation(&self) -> bool {
        self.pending.is_some()
    }

    pub fn summarize(&self) -> StagingSummary {
        let mut summary = StagingSummary {
            total: self.actions.len(),
            ..StagingSummary::default()
        };
        for action in &self.actions {
            *summary.by_action.entry(action.action_id.clone()).or_default() += 1;
            for target in &action.targets {
                if !summary.affected_ids.contains(target) {
                    summary.affected_ids.push(target.clone());
                }
            }
            summary.has_destructive |= action.destructive;
        }
        summary
    }

    /// Runs every entry in insertion order, then clears the queue.
    ///
    /// This does not check for destructive entries; use
    /// [`request_execute`](Self::request_execute) for the gated flow.
    pub fn execute_all(&mut self, executor: &mut dyn StagedExecutor) -> ExecutionReport {
        let mut report = ExecutionReport::default();
        for action in std::mem::take(&mut self.actions) {
            if executor.run(&action) {
                report.executed.push(action.id);
            } else {
                warn!(
                    "[staging] skipped {}: no such {:?} action",
                    action.action_id, action.kind
                );
                report.skipped.push(action.id);
            }
        }
        self.pending = None;
        info!(
            "[staging] executed {} action(s), skipped {}",
            report.executed.len(),
            report.skipped.len()
        );
        report
    }

    /// Runs the queue unless it holds destructive entries, in which case it
    /// is left untouched and the summary is returned for confirmation.
    pub fn request_execute(&mut self, executor: &mut dyn StagedExecutor) -> ExecuteRequest {
        if self.actions.is_empty() {
            return ExecuteRequest::Empty;
        }
        let summary = self.summarize();
        if summary.has_destructive {
            debug!("[staging] destructive batch awaits confirmation");
            self.pending = Some(summary.clone());
            return ExecuteRequest::NeedsConfirmation(summary);
        }
        ExecuteRequest::Executed(self.execute_all(executor))
    }

    /// Runs a batch held by [`request_execute`](Self::request_execute).
    ///
    /// Returns `None` if no confirmation was pending.
    pub fn confirm_execute(&mut self, executor: &mut dyn StagedExecutor) -> Option<ExecutionReport> {
        if self.pending.take().is_none() {
            warn!("[staging] confirm_execute called with nothing pending");
            return None;
        }
        Some(self.execute_all(executor))
    }

    /// Drops a pending confirmation, keeping the queue.
    pub fn cancel_confirmation(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(list: &[&str]) -> Vec<RowId> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_summary_groups_and_dedups() {
        let mut queue = StagingQueue::new();
        queue.stage(StagedAction::bulk("activate", "Activate", ids(&["a", "b"]), false));
        queue.stage(StagedAction::bulk("activate", "Activate", ids(&["b", "c"]), false));
        queue.stage(StagedAction::row("edit", "Edit", "a", false));

        let summary = queue.summarize();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.by_action["activate"], 2);
        assert_eq!(summary.by_action["edit"], 1);
        assert_eq!(summary.affected_ids, ids(&["a", "b", "c"]));
        assert!(!summary.has_destructive);
    }

    #[test]
    fn test_destructive_batch_waits_for_confirmation() {
        let mut queue = StagingQueue::new();
        queue.stage(StagedAction::bulk("delete", "Delete", ids(&["a"]), true));
        queue.stage(StagedAction::bulk("activate", "Activate", ids(&["b"]), false));

        let mut calls = 0;
        let mut run = |_: &StagedAction| {
            calls += 1;
            true
        };

        let request = queue.request_execute(&mut run);
        assert!(matches!(request, ExecuteRequest::NeedsConfirmation(ref s) if s.has_destructive));
        assert_eq!(queue.len(), 2);

        queue.cancel_confirmation();
        assert!(queue.confirm_execute(&mut run).is_none());
        assert_eq!(queue.len(), 2);

        queue.request_execute(&mut run);
        let report = queue.confirm_execute(&mut run).unwrap();
        assert_eq!(report.executed.len(), 2);
        assert!(queue.is_empty());
        drop(run);
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_non_destructive_runs_immediately() {
        let mut queue = StagingQueue::new();
        let staged = queue.stage(StagedAction::row("edit", "Edit", "a", false));
        let missing = queue.stage(StagedAction::row("gone", "Gone", "a", false));

        let mut run = |s: &StagedAction| s.action_id != "gone";
        match queue.request_execute(&mut run) {
            ExecuteRequest::Executed(report) => {
                assert_eq!(report.executed, vec![staged]);
                assert_eq!(report.skipped, vec![missing]);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(queue.request_execute(&mut run), ExecuteRequest::Empty);
    }

    #[test]
    fn test_remove_by_action_and_by_entry() {
        let mut queue = StagingQueue::new();
        queue.stage(StagedAction::row("edit", "Edit", "a", false));
        queue.stage(StagedAction::row("edit", "Edit", "b", false));
        let keep = queue.stage(StagedAction::row("view", "View", "a", false));

        assert_eq!(queue.remove("edit"), 2);
        assert_eq!(queue.remove_staged(keep).map(|a| a.action_id), Some("view".into()));
        assert!(queue.is_empty());
    }
}
