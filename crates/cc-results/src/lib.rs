//! cc-results: history exports for plotting tools.

pub mod csv;
pub mod store;
pub mod types;

pub use csv::write_history_csv;
pub use store::HistoryStore;
pub use types::*;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Export not found: {export_id}")]
    ExportNotFound { export_id: String },

    #[error("Invalid path: {message}")]
    InvalidPath { message: String },
}
