//! CSV and JSON exporters.

use std::io::Write;

use dataframe_lib::column::Column;
use dataframe_lib::error::ExportError;
use dataframe_lib::model::Row;
use dataframe_lib::table::Exporter;
use serde_json::Map;

/// Export formats the CLI can write.
pub const FORMATS: [&str; 2] = ["csv", "json"];

/// Writes rows as CSV or JSON to any writer.
///
/// CSV cells hold the column display text under a header of column titles.
/// JSON is an array of objects keyed by column id holding the raw values.
pub struct WriterExporter<W: Write> {
    out: W,
}

impl<W: Write> WriterExporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_csv(&mut self, columns: &[&Column], rows: &[&Row]) -> Result<(), ExportError> {
        let mut wtr = csv::Writer::from_writer(&mut self.out);
        let header = columns.iter().map(|c| c.title.as_str());
        wtr.write_record(header).map_err(csv_error)?;
        for row in rows {
            wtr.write_record(columns.iter().map(|c| c.display(row)))
                .map_err(csv_error)?;
        }
        wtr.flush()?;
        Ok(())
    }

    fn write_json(&mut self, columns: &[&Column], rows: &[&Row]) -> Result<(), ExportError> {
        let objects: Vec<Map<String, serde_json::Value>> = rows
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .filter(|c| !c.synthetic)
                    .map(|c| {
                        let value = row.get(&c.id).map(|v| v.to_json()).unwrap_or_default();
                        (c.id.clone(), value)
                    })
                    .collect()
            })
            .collect();
        serde_json::to_writer_pretty(&mut self.out, &objects)
            .map_err(|e| ExportError::Serialization(e.to_string()))?;
        writeln!(self.out)?;
        Ok(())
    }
}

impl<W: Write> Exporter for WriterExporter<W> {
    fn export(&mut self, format: &str, columns: &[&Column], rows: &[&Row]) -> Result<(), ExportError> {
        match format {
            "csv" => self.write_csv(columns, rows),
            "json" => self.write_json(columns, rows),
            other => Err(ExportError::UnsupportedFormat(other.to_string())),
        }
    }
}

fn csv_error(err: csv::Error) -> ExportError {
    if err.is_io_error() {
        match err.into_kind() {
            csv::ErrorKind::Io(e) => ExportError::Io(e),
            other => ExportError::Serialization(format!("{other:?}")),
        }
    } else {
        ExportError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (Vec<Column>, Vec<Row>) {
        let columns = vec![
            Column::new("name", "Name"),
            Column::new("amount", "Amount").render(|v, _| {
                if v.is_null() {
                    String::new()
                } else {
                    format!("${}", v.to_text())
                }
            }),
        ];
        let rows = vec![
            Row::new().set("name", "Widget, large").set("amount", 20i64),
            Row::new().set("name", "Gadget"),
        ];
        (columns, rows)
    }

    #[test]
    fn test_csv_uses_titles_and_display_text() {
        let (columns, rows) = fixture();
        let columns: Vec<&Column> = columns.iter().collect();
        let rows: Vec<&Row> = rows.iter().collect();

        let mut exporter = WriterExporter::new(Vec::new());
        exporter.export("csv", &columns, &rows).unwrap();
        let text = String::from_utf8(exporter.into_inner()).unwrap();
        assert_eq!(text, "Name,Amount\n\"Widget, large\",$20\nGadget,\n");
    }

    #[test]
    fn test_json_keeps_raw_values() {
        let (columns, rows) = fixture();
        let columns: Vec<&Column> = columns.iter().collect();
        let rows: Vec<&Row> = rows.iter().collect();

        let mut exporter = WriterExporter::new(Vec::new());
        exporter.export("json", &columns, &rows).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&exporter.into_inner()).unwrap();
        assert_eq!(parsed[0]["amount"], 20);
        assert!(parsed[1]["amount"].is_null());
    }

    #[test]
    fn test_unknown_format() {
        let mut exporter = WriterExporter::new(Vec::new());
        assert!(matches!(
            exporter.export("xlsx", &[], &[]),
            Err(ExportError::UnsupportedFormat(_))
        ));
    }
}
