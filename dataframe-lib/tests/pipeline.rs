//! Properties of the filter, search, sort and paginate pipeline.

use dataframe_lib::model::Row;
use dataframe_lib::query::ActiveFilters;
use dataframe_lib::query::Direction;
use dataframe_lib::query::Pagination;
use dataframe_lib::query::Query;
use dataframe_lib::query::QuickFilter;
use dataframe_lib::query::SearchConfig;
use dataframe_lib::query::SortSpec;
use dataframe_lib::query::paginate;

fn orders() -> Vec<Row> {
    let raw = [
        ("1", "Widget", "pending", "due", Some(40)),
        ("2", "Gadget", "pending", "paid", Some(15)),
        ("3", "Widget Pro", "approved", "overdue", Some(90)),
        ("4", "Sprocket", "pending", "overdue", None),
        ("5", "widget mini", "pending", "due", Some(5)),
        ("6", "Gizmo", "draft", "due", Some(60)),
        ("7", "Item 10", "approved", "paid", Some(25)),
        ("8", "Item 2", "draft", "overdue", None),
    ];
    raw.into_iter()
        .map(|(id, name, status, payment, amount)| {
            let row = Row::new()
                .set("id", id)
                .set("name", name)
                .set("status", status)
                .set("paymentStatus", payment);
            match amount {
                Some(n) => row.set("amount", n as i64),
                None => row,
            }
        })
        .collect()
}

fn ids(rows: &[&Row]) -> Vec<String> {
    rows.iter().map(|r| r.text("id")).collect()
}

#[test]
fn engine_output_equals_sort_of_search_of_filter() {
    let data = orders();
    let declared = [QuickFilter::new("status", "Status")];
    let mut active = ActiveFilters::new();
    active.set("status", ["pending", "approved"]);
    let search = SearchConfig::new().term("widget");
    let sort = SortSpec::desc("amount");

    let query = Query::new()
        .quick_filters(&declared)
        .active(&active)
        .search(&search)
        .sort(Some(&sort));

    let stepwise = query.apply_sort(query.apply_search(query.apply_filters(data.iter().collect())));
    let derived = query.derive(&data);
    assert_eq!(ids(&derived), ids(&stepwise));
    assert_eq!(ids(&derived), ["3", "1", "5"]);
}

#[test]
fn windowing_before_filtering_changes_the_result() {
    let data = orders();
    let mut active = ActiveFilters::new();
    active.set("status", ["draft"]);
    let query = Query::new().active(&active);
    let pages = Pagination::new().page_size(3);

    let derived = query.derive(&data);
    let correct = ids(paginate(&derived, &pages));

    let all: Vec<&Row> = data.iter().collect();
    let windowed = paginate(&all, &pages).to_vec();
    let wrong = ids(&query.apply_filters(windowed));

    assert_eq!(correct, ["6", "8"]);
    assert!(wrong.is_empty());
    assert_ne!(correct, wrong);
}

#[test]
fn search_is_idempotent() {
    let data = orders();
    let search = SearchConfig::new().term("WIDGET");
    let query = Query::new().search(&search);

    let once = query.apply_search(data.iter().collect());
    let twice = query.apply_search(once.clone());
    assert_eq!(ids(&once), ids(&twice));
    assert_eq!(ids(&once), ["1", "3", "5"]);
}

#[test]
fn whitespace_search_is_disabled() {
    let data = orders();
    let search = SearchConfig::new().term("   ");
    assert_eq!(Query::new().search(&search).derive(&data).len(), data.len());
}

#[test]
fn sorting_sorted_input_is_a_no_op() {
    let data = orders();
    let sort = SortSpec::asc("name");
    let query = Query::new().sort(Some(&sort));

    let once = query.derive(&data);
    let twice = query.apply_sort(once.clone());
    assert_eq!(ids(&once), ids(&twice));
}

#[test]
fn names_sort_naturally() {
    let data = orders();
    let sort = SortSpec::asc("name");
    let names: Vec<String> = Query::new()
        .sort(Some(&sort))
        .derive(&data)
        .iter()
        .map(|r| r.text("name"))
        .collect();
    let item2 = names.iter().position(|n| n == "Item 2").unwrap();
    let item10 = names.iter().position(|n| n == "Item 10").unwrap();
    assert!(item2 < item10);
}

#[test]
fn descending_exactly_reverses_ascending() {
    let data = orders();
    let asc = SortSpec::asc("id");
    let desc = SortSpec {
        direction: Direction::Desc,
        ..asc.clone()
    };

    let mut up = ids(&Query::new().sort(Some(&asc)).derive(&data));
    let down = ids(&Query::new().sort(Some(&desc)).derive(&data));
    up.reverse();
    assert_eq!(up, down);
}

#[test]
fn nulls_sort_last_both_ways() {
    let data = orders();
    for sort in [SortSpec::asc("amount"), SortSpec::desc("amount")] {
        let sorted = ids(&Query::new().sort(Some(&sort)).derive(&data));
        assert_eq!(&sorted[6..], ["4", "8"], "direction {:?}", sort.direction);
    }
}

#[test]
fn pages_concatenate_to_the_whole() {
    let data = orders();
    let sort = SortSpec::desc("amount");
    let derived = Query::new().sort(Some(&sort)).derive(&data);

    let mut pages = Pagination::new().page_size(3);
    let total_pages = pages.total_pages(derived.len());
    assert_eq!(total_pages, 3);

    let mut joined = Vec::new();
    for page in 1..=total_pages {
        pages.set_page(page, derived.len());
        joined.extend(ids(paginate(&derived, &pages)));
    }
    assert_eq!(joined, ids(&derived));
}

#[test]
fn quick_filters_and_across_or_within() {
    let data = orders();
    let declared = [
        QuickFilter::new("status", "Status"),
        QuickFilter::new("paymentStatus", "Payment"),
    ];
    let mut active = ActiveFilters::new();
    active.set("status", ["pending"]);
    active.set("paymentStatus", ["due", "overdue"]);

    let shown = Query::new()
        .quick_filters(&declared)
        .active(&active)
        .derive(&data);
    assert_eq!(ids(&shown), ["1", "4", "5"]);
}
