//! Plain-text rendering of a table view.

use std::fmt::Write;

use dataframe_lib::column::Alignment;
use dataframe_lib::query::Direction;
use dataframe_lib::table::DetailView;
use dataframe_lib::table::TableState;
use dataframe_lib::table::TableView;

/// Renders the view as a text grid with its toolbar and footer lines.
pub fn render(view: &TableView) -> String {
    let mut out = String::new();

    let toolbar = toolbar(view);
    if !toolbar.is_empty() {
        let _ = writeln!(out, "{toolbar}");
    }

    match &view.state {
        TableState::Loading => {
            let _ = writeln!(out, "Loading...");
        }
        TableState::Empty(text) => {
            let _ = writeln!(out, "{text}");
        }
        TableState::Populated => grid(view, &mut out),
    }

    if let Some(page) = &view.page {
        let _ = writeln!(out, "{page}");
    }
    if !view.hidden_columns.is_empty() {
        let titles: Vec<&str> = view.hidden_columns.iter().map(|(_, t)| t.as_str()).collect();
        let _ = writeln!(out, "Hidden columns: {}", titles.join(", "));
    }
    if view.selected_count > 0 {
        let _ = writeln!(out, "{} selected", view.selected_count);
    }
    if let Some(staged) = &view.staged {
        let _ = writeln!(out, "Staged: {staged}");
    }
    if let Some(detail) = &view.detail {
        out.push('\n');
        out.push_str(&render_detail(detail));
    }
    out
}

/// Renders a detail view as aligned label/value lines.
pub fn render_detail(detail: &DetailView) -> String {
    let width = detail
        .fields
        .iter()
        .map(|f| f.label.chars().count())
        .max()
        .unwrap_or(0);
    let mut out = String::new();
    let _ = writeln!(out, "Row {}", detail.row_id);
    for field in &detail.fields {
        let _ = writeln!(out, "  {}: {}", pad(&field.label, width, Alignment::Left), field.value);
    }
    out
}

fn toolbar(view: &TableView) -> String {
    let mut parts = Vec::new();
    if let Some(term) = view.search_term.as_deref().filter(|t| !t.trim().is_empty()) {
        parts.push(format!("[search: {term}]"));
    }
    for filter in &view.active_filters {
        parts.push(format!("[{}: {}]", filter.filter_id, filter.values.join(" | ")));
    }
    parts.join(" ")
}

fn grid(view: &TableView, out: &mut String) {
    let titles: Vec<String> = view
        .headers
        .iter()
        .map(|h| match h.sorted {
            Some(Direction::Asc) => format!("{} ^", h.title),
            Some(Direction::Desc) => format!("{} v", h.title),
            None => h.title.clone(),
        })
        .collect();

    let mut widths: Vec<usize> = titles.iter().map(|t| t.chars().count()).collect();
    for row in &view.rows {
        for (i, cell) in row.cells.iter().enumerate() {
            let text = cell_text(cell);
            widths[i] = widths[i].max(text.chars().count());
        }
    }

    let marker = if view.selectable { "    " } else { "" };
    let header: Vec<String> = titles
        .iter()
        .zip(&view.headers)
        .zip(&widths)
        .map(|((title, h), w)| pad(title, *w, h.align))
        .collect();
    let _ = writeln!(out, "{marker}{}", header.join(" | "));
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{marker}{}", rule.join("-+-"));

    for row in &view.rows {
        let check = match (view.selectable, row.selected) {
            (false, _) => "",
            (true, true) => "[x] ",
            (true, false) => "[ ] ",
        };
        let cells: Vec<String> = row
            .cells
            .iter()
            .zip(&widths)
            .map(|(cell, w)| pad(&cell_text(cell), *w, cell.align))
            .collect();
        let _ = write!(out, "{check}{}", cells.join(" | "));
        if !row.actions.is_empty() {
            let labels: Vec<&str> = row.actions.iter().map(|a| a.label.as_str()).collect();
            let _ = write!(out, "  ({})", labels.join(", "));
        }
        out.push('\n');
        for cell in &row.cells {
            if let Some(error) = cell.editor.as_ref().and_then(|e| e.error.as_deref()) {
                let _ = writeln!(out, "{marker}  ! {}: {error}", cell.column_id);
            }
        }
    }
}

fn cell_text(cell: &dataframe_lib::table::CellView) -> String {
    match &cell.editor {
        Some(editor) => format!("[{}]", editor.working),
        None => cell.text.clone(),
    }
}

fn pad(text: &str, width: usize, align: Alignment) -> String {
    let len = text.chars().count();
    let fill = width.saturating_sub(len);
    match align {
        Alignment::Left => format!("{text}{}", " ".repeat(fill)),
        Alignment::Right => format!("{}{text}", " ".repeat(fill)),
        Alignment::Center => {
            let left = fill / 2;
            format!("{}{text}{}", " ".repeat(left), " ".repeat(fill - left))
        }
    }
}

#[cfg(test)]
mod tests {
    use dataframe_lib::DataFrameTable;
    use dataframe_lib::TableConfig;
    use dataframe_lib::column::Column;
    use dataframe_lib::model::DataSet;
    use dataframe_lib::model::Row;
    use dataframe_lib::query::SortSpec;

    use super::*;

    fn table() -> DataFrameTable {
        let data = DataSet::new(
            "id",
            vec![
                Row::new().set("id", "1").set("name", "Widget").set("qty", 5i64),
                Row::new().set("id", "2").set("name", "Gadget").set("qty", 12i64),
            ],
        )
        .unwrap();
        let config = TableConfig::new(vec![
            Column::new("name", "Name").sortable(),
            Column::new("qty", "Qty").align(Alignment::Right),
        ]);
        DataFrameTable::new(config, data).unwrap()
    }

    #[test]
    fn test_grid_layout() {
        let mut table = table();
        table.set_sort(Some(SortSpec::asc("name"))).unwrap();
        let text = render(&table.view());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Name ^ | Qty");
        assert_eq!(lines[1], "-------+----");
        assert_eq!(lines[2], "Gadget |  12");
        assert_eq!(lines[3], "Widget |   5");
        assert_eq!(lines[4], "Showing 1 to 2 of 2 results (page 1 of 1)");
    }

    #[test]
    fn test_empty_state() {
        let mut table = table();
        table.set_data(DataSet::empty("id")).unwrap();
        let text = render(&table.view());
        assert!(text.starts_with("No data available\n"));
    }

    #[test]
    fn test_pad() {
        assert_eq!(pad("ab", 6, Alignment::Center), "  ab  ");
        assert_eq!(pad("abcdef", 3, Alignment::Left), "abcdef");
    }
}
