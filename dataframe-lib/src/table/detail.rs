//! Row detail modal content.

use serde::Serialize;

use crate::column::Column;
use crate::model::Row;
use crate::model::RowId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailField {
    pub label: String,
    pub value: String,
}

/// One row laid out as label/value pairs.
///
/// Every declared field column is listed, hidden ones included; synthetic
/// columns are left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailView {
    pub row_id: RowId,
    pub fields: Vec<DetailField>,
}

impl DetailView {
    pub fn new(row_id: &str, row: &Row, columns: &[Column]) -> Self {
        let fields = columns
            .iter()
            .filter(|c| !c.synthetic)
            .map(|c| DetailField {
                label: c.title.clone(),
                value: c.display(row),
            })
            .collect();
        Self {
            row_id: row_id.to_string(),
            fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_lists_field_columns() {
        let columns = vec![
            Column::new("name", "Name"),
            Column::new("amount", "Amount").render(|v, _| format!("${}", v.to_text())),
            Column::new("actions", "").synthetic(),
        ];
        let row = Row::new().set("name", "Widget").set("amount", 5i64);
        let detail = DetailView::new("p-1", &row, &columns);

        assert_eq!(detail.fields.len(), 2);
        assert_eq!(detail.fields[1].value, "$5");
    }
}
