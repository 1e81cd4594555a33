//! End-to-end behavior of the table orchestrator.

use std::cell::Cell;
use std::cell::RefCell;
use std::rc::Rc;

use dataframe_lib::action::ActionKind;
use dataframe_lib::action::ActionManager;
use dataframe_lib::action::AutoConfirm;
use dataframe_lib::action::BulkAction;
use dataframe_lib::action::DataIntent;
use dataframe_lib::action::Dispatch;
use dataframe_lib::action::IntentLog;
use dataframe_lib::action::RowAction;
use dataframe_lib::column::Column;
use dataframe_lib::column::EditType;
use dataframe_lib::edit::EditKey;
use dataframe_lib::edit::EditOutcome;
use dataframe_lib::error::ExportError;
use dataframe_lib::model::DataSet;
use dataframe_lib::model::Row;
use dataframe_lib::model::Value;
use dataframe_lib::query::QuickFilter;
use dataframe_lib::query::SortSpec;
use dataframe_lib::selection::SelectAllScope;
use dataframe_lib::selection::Selection;
use dataframe_lib::selection::SelectionMode;
use dataframe_lib::staging::ExecuteRequest;
use dataframe_lib::table::DataFrameTable;
use dataframe_lib::table::TableConfig;
use dataframe_lib::table::TableState;

fn orders() -> DataSet {
    let raw = [
        ("o-1", "Blue Widget", "pending", 120),
        ("o-2", "Gear", "draft", 80),
        ("o-3", "Red Widget", "pending", 300),
        ("o-4", "Bolt", "pending", 15),
        ("o-5", "Widget Kit", "approved", 500),
        ("o-6", "Nut", "pending", 10),
        ("o-7", "Spring", "draft", 45),
        ("o-8", "Phone Case", "approved", 60),
        ("o-9", "Lever", "approved", 70),
        ("o-10", "Axle", "draft", 95),
    ];
    let rows = raw
        .into_iter()
        .map(|(id, name, status, amount)| {
            Row::new()
                .set("id", id)
                .set("name", name)
                .set("status", status)
                .set("amount", amount as i64)
        })
        .collect();
    DataSet::new("id", rows).unwrap()
}

fn config() -> TableConfig {
    TableConfig::new(vec![
        Column::new("name", "Name").sortable(),
        Column::new("status", "Status"),
        Column::new("amount", "Amount").sortable(),
    ])
    .searchable(["name"])
    .quick_filter(QuickFilter::new("status", "Status"))
    .selectable()
}

#[test]
fn filtered_searched_sorted_second_page() {
    let mut table = DataFrameTable::new(config(), orders()).unwrap();
    table.set_filter("status", ["pending"]);
    table.set_search("widget");
    table.set_sort(Some(SortSpec::desc("amount"))).unwrap();
    table.set_page_size(1);
    table.set_page(2);

    let view = table.view();
    assert_eq!(view.row_ids(), ["o-1"]);
    let page = view.page.unwrap();
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.page, 2);
    assert_eq!(page.to_string(), "Showing 2 to 2 of 2 results (page 2 of 2)");
}

#[test]
fn export_receives_every_filtered_row() {
    let mut table = DataFrameTable::new(config().export_formats(["csv"]), orders()).unwrap();
    table.set_search("widget");
    table.set_page_size(1);
    assert_eq!(table.page_rows().len(), 1);

    let mut exported = Vec::new();
    let mut exporter = |format: &str, columns: &[&Column], rows: &[&Row]| -> Result<(), ExportError> {
        assert_eq!(format, "csv");
        assert_eq!(columns.len(), 3);
        exported.extend(rows.iter().map(|r| r.text("id")));
        Ok(())
    };
    assert!(matches!(
        table.export("xlsx", &mut exporter),
        Err(ExportError::UnsupportedFormat(_))
    ));
    assert_eq!(table.export("csv", &mut exporter).unwrap(), 3);
    assert_eq!(exported, ["o-1", "o-3", "o-5"]);
}

#[test]
fn new_data_resets_selection_but_loading_does_not() {
    let changes = Rc::new(Cell::new(0));
    let counter = changes.clone();
    let config = config().on_selection_change(move |_| counter.set(counter.get() + 1));
    let mut table = DataFrameTable::new(config, orders()).unwrap();

    table.toggle_row("o-1");
    table.toggle_row("o-2");
    assert_eq!(table.selected_ids(), ["o-1", "o-2"]);

    table.set_loading(true);
    table.set_data(table.data().clone()).unwrap();
    table.set_loading(false);
    assert_eq!(table.selected_ids(), ["o-1", "o-2"]);
    assert_eq!(changes.get(), 2);

    table.set_data(orders()).unwrap();
    assert!(table.selected_ids().is_empty());
    assert_eq!(changes.get(), 3);
}

#[test]
fn select_all_follows_scope() {
    let mut filtered = DataFrameTable::new(config().page_size(2), orders()).unwrap();
    filtered.set_filter("status", ["draft"]);
    filtered.select_all();
    assert_eq!(filtered.selected_ids(), ["o-10", "o-2", "o-7"]);
    assert!(filtered.view().all_selected);

    let mut paged = DataFrameTable::new(
        config().page_size(2).select_scope(SelectAllScope::Page),
        orders(),
    )
    .unwrap();
    paged.set_filter("status", ["draft"]);
    paged.select_all();
    assert_eq!(paged.selected_ids(), ["o-2", "o-7"]);

    paged.select_all();
    assert!(paged.selected_ids().is_empty());
}

#[test]
fn select_all_drops_rows_the_filter_hides() {
    let mut table = DataFrameTable::new(config().page_size(2), orders()).unwrap();
    table.toggle_row("o-5");
    table.set_filter("status", ["draft"]);

    let change = table.select_all();
    assert_eq!(change.removed, ["o-5"]);
    assert_eq!(table.selected_ids(), ["o-10", "o-2", "o-7"]);
    assert!(table.view().all_selected);

    table.select_all();
    assert!(table.selected_ids().is_empty());
}

#[test]
fn page_select_all_drops_rows_off_the_page() {
    let mut table = DataFrameTable::new(
        config().page_size(2).select_scope(SelectAllScope::Page),
        orders(),
    )
    .unwrap();
    table.toggle_row("o-5");
    table.toggle_row("o-10");
    table.set_filter("status", ["draft"]);

    let change = table.select_all();
    assert_eq!(change.added, ["o-2", "o-7"]);
    assert_eq!(change.removed, ["o-10", "o-5"]);
    assert_eq!(table.selected_ids(), ["o-2", "o-7"]);
}

#[test]
fn bulk_action_after_select_all_skips_hidden_rows() {
    let intents = IntentLog::new();
    let manager = ActionManager::new(intents.clone()).confirm(AutoConfirm(true));
    let config = config().bulk_action(BulkAction::new("rm", "Delete", ActionKind::Delete));
    let mut table = DataFrameTable::new(config, orders()).unwrap().with_actions(manager);

    table.toggle_row("o-5");
    table.set_search("widget");
    table.set_filter("status", ["pending"]);
    table.select_all();
    assert_eq!(table.run_bulk_action("rm").unwrap(), Dispatch::Done);
    assert_eq!(
        intents.take(),
        [DataIntent::Remove {
            ids: vec!["o-1".to_string(), "o-3".to_string()]
        }]
    );
}

#[test]
fn edit_commit_and_cancel() {
    let commits = Rc::new(RefCell::new(Vec::new()));
    let log = commits.clone();
    let config = TableConfig::new(vec![
        Column::new("name", "Name"),
        Column::new("qty", "Qty")
            .editable(EditType::Number)
            .on_commit(move |id, value| log.borrow_mut().push((id.to_string(), value.clone()))),
    ]);
    let data = DataSet::new("id", vec![Row::new().set("id", "r1").set("name", "Bolt").set("qty", 5i64)]).unwrap();
    let mut table = DataFrameTable::new(config, data).unwrap();

    table.begin_edit("r1", "qty").unwrap();
    assert_eq!(table.editor().editing().unwrap().working, "5");
    table.edit_input("12").unwrap();
    assert!(matches!(table.edit_key(EditKey::Escape), EditOutcome::Cancelled { .. }));
    assert_eq!(table.view().grid(), [["Bolt", "5"]]);
    assert!(commits.borrow().is_empty());

    table.begin_edit("r1", "qty").unwrap();
    table.edit_input("12").unwrap();
    let outcome = table.edit_key(EditKey::Enter { shift: false });
    assert!(matches!(outcome, EditOutcome::Committed { .. }));
    assert!(!table.editor().is_editing());
    assert_eq!(*commits.borrow(), [("r1".to_string(), Value::Int(12))]);
}

#[test]
fn destructive_queue_waits_for_confirmation() {
    let deleted = Rc::new(Cell::new(0));
    let activated = Rc::new(Cell::new(0));
    let (d, a) = (deleted.clone(), activated.clone());

    let config = config()
        .bulk_action(
            BulkAction::new("delete", "Delete", ActionKind::Delete).handler(move |ids| d.set(d.get() + ids.len())),
        )
        .row_action(
            RowAction::new("activate", "Activate", ActionKind::Activate).handler(move |_, _| a.set(a.get() + 1)),
        );
    let mut table = DataFrameTable::new(config, orders()).unwrap();

    table.toggle_row("o-1");
    table.toggle_row("o-2");
    table.stage_bulk("delete").unwrap();
    table.stage_row("activate", "o-3").unwrap();

    let summary = table.staged_summary();
    assert_eq!(summary.total, 2);
    assert!(summary.has_destructive);
    assert_eq!(summary.affected_ids, ["o-1", "o-2", "o-3"]);

    assert!(matches!(table.execute_staged(), ExecuteRequest::NeedsConfirmation(_)));
    assert!(table.view().awaiting_confirmation);
    assert_eq!((deleted.get(), activated.get()), (0, 0));

    let report = table.confirm_staged().unwrap();
    assert_eq!(report.executed.len(), 2);
    assert_eq!((deleted.get(), activated.get()), (2, 1));
    assert!(table.staging().is_empty());
}

#[test]
fn bulk_delete_emits_one_intent_after_confirmation() {
    let intents = IntentLog::new();
    let manager = ActionManager::new(intents.clone()).confirm(AutoConfirm(true));
    let config = config().bulk_action(BulkAction::new("rm", "Delete", ActionKind::Delete));
    let mut table = DataFrameTable::new(config, orders()).unwrap().with_actions(manager);

    table.toggle_row("o-4");
    table.toggle_row("o-6");
    assert_eq!(table.run_bulk_action("rm").unwrap(), Dispatch::Done);
    assert!(table.selected_ids().is_empty());
    assert_eq!(
        intents.take(),
        [DataIntent::Remove {
            ids: vec!["o-4".to_string(), "o-6".to_string()]
        }]
    );
}

#[test]
fn controlled_state_lives_with_the_caller() {
    let term = Rc::new(RefCell::new(String::from("widget")));
    let selection = Rc::new(RefCell::new(Selection::new(SelectionMode::Multiple)));
    let mut table = DataFrameTable::new(config(), orders())
        .unwrap()
        .controlled_search(term.clone())
        .controlled_selection(selection.clone());

    assert_eq!(table.processed().len(), 3);

    *term.borrow_mut() = "gear".into();
    assert_eq!(table.page_ids(), ["o-2"]);

    table.set_search("bolt");
    assert_eq!(*term.borrow(), "bolt");

    table.toggle_row("o-4");
    assert!(selection.borrow().is_selected("o-4"));
}

#[test]
fn empty_and_loading_states() {
    let mut table = DataFrameTable::new(config().empty_text("No orders"), orders()).unwrap();
    table.set_search("nothing matches this");
    let view = table.view();
    assert_eq!(view.state, TableState::Empty("No orders".into()));
    assert!(view.rows.is_empty());
    assert_eq!(view.page.unwrap().to_string(), "Showing 0 to 0 of 0 results (page 1 of 1)");

    table.set_loading(true);
    assert_eq!(table.view().state, TableState::Loading);
}
