//! Runs staged actions against declared row and bulk actions.

use log::warn;

use super::config::BulkAction;
use super::config::RowAction;
use super::manager::ActionManager;
use super::manager::Dispatch;
use crate::model::DataSet;
use crate::staging::StagedAction;
use crate::staging::StagedExecutor;
use crate::staging::StagedKind;

/// Resolves staged entries by action id and runs them through an
/// [`ActionManager`].
///
/// Bulk entries run the bulk action with every target; row entries run the
/// row action on the first target. Confirmation prompts are skipped since
/// the batch as a whole was confirmed.
pub struct StagedRunner<'a> {
    manager: ActionManager,
    row_actions: &'a [RowAction],
    bulk_actions: &'a [BulkAction],
    data: &'a DataSet,
}

impl<'a> StagedRunner<'a> {
    pub fn new(
        manager: &ActionManager,
        row_actions: &'a [RowAction],
        bulk_actions: &'a [BulkAction],
        data: &'a DataSet,
    ) -> Self {
        Self {
            manager: manager.preconfirmed(),
            row_actions,
            bulk_actions,
            data,
        }
    }
}

impl StagedExecutor for StagedRunner<'_> {
    fn run(&mut self, staged: &StagedAction) -> bool {
        let dispatch = match staged.kind {
            StagedKind::Bulk => {
                let Some(action) = self.bulk_actions.iter().find(|a| a.id == staged.action_id)
                else {
                    return false;
                };
                self.manager.execute_bulk(action, &staged.targets, self.data)
            }
            StagedKind::Row => {
                let Some(action) = self.row_actions.iter().find(|a| a.id == staged.action_id)
                else {
                    return false;
                };
                let Some(target) = staged.targets.first() else {
                    return false;
                };
                let Some(row) = self.data.get(target) else {
                    warn!("[staging] row {target} no longer exists");
                    return false;
                };
                self.manager.execute(action, target, row)
            }
        };
        dispatch == Dispatch::Done
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionKind;
    use crate::action::IntentLog;
    use crate::model::Row;
    use crate::staging::StagingQueue;

    #[test]
    fn test_runner_resolves_by_id() {
        let data = DataSet::new(
            "id",
            vec![Row::new().set("id", "a"), Row::new().set("id", "b")],
        )
        .unwrap();
        let log = IntentLog::new();
        let manager = ActionManager::new(log.clone());
        let rows = [RowAction::new("dup", "Duplicate", ActionKind::Duplicate)];
        let bulk = [BulkAction::new("rm", "Delete", ActionKind::Delete)];

        let mut queue = StagingQueue::new();
        queue.stage(StagedAction::bulk("rm", "Delete", vec!["a".into()], true));
        queue.stage(StagedAction::row("dup", "Duplicate", "b", false));
        queue.stage(StagedAction::row("dup", "Duplicate", "zzz", false));
        queue.stage(StagedAction::row("nope", "Nope", "a", false));

        let mut runner = StagedRunner::new(&manager, &rows, &bulk, &data);
        queue.request_execute(&mut runner);
        let report = queue.confirm_execute(&mut runner).unwrap();

        assert_eq!(report.executed.len(), 2);
        assert_eq!(report.skipped.len(), 2);
        // The manager declines prompts by default, but the batch was confirmed.
        assert_eq!(log.len(), 2);
    }
}
