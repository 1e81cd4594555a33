//! Export hand-off.

use crate::column::Column;
use crate::error::ExportError;
use crate::model::Row;

/// Receives the processed rows of a table for export.
///
/// The rows are filtered, searched and sorted but not paginated. `columns`
/// are the visible columns in display order.
pub trait Exporter {
    fn export(&mut self, format: &str, columns: &[&Column], rows: &[&Row]) -> Result<(), ExportError>;
}

impl<F> Exporter for F
where
    F: FnMut(&str, &[&Column], &[&Row]) -> Result<(), ExportError>,
{
    fn export(&mut self, format: &str, columns: &[&Column], rows: &[&Row]) -> Result<(), ExportError> {
        self(format, columns, rows)
    }
}
