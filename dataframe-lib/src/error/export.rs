//! Export errors

/// Error returned by an [`Exporter`](crate::table::Exporter).
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The exporter does not handle the requested format.
    #[error("Unsupported export format '{0}'")]
    UnsupportedFormat(String),

    /// Writing the export failed.
    #[error("export I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing rows failed.
    #[error("export serialization error: {0}")]
    Serialization(String),
}
