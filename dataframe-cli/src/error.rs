//! CLI errors

use dataframe_lib::error::ExportError;
use dataframe_lib::error::TableError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid argument: {0}")]
    Argument(String),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("invalid row data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not initialize logging: {0}")]
    Logger(#[from] log::SetLoggerError),
}

impl CliError {
    pub fn argument(message: impl Into<String>) -> Self {
        Self::Argument(message.into())
    }
}
