//! Error type for the command-line front end.

/// Unified error returned from `main`.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Session error: {0}")]
    Config(#[from] cc_config::ConfigError),

    #[error("Simulation error: {0}")]
    Simulation(#[from] cc_sim::SimError),

    #[error("Export error: {0}")]
    Results(#[from] cc_results::ResultsError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type CliResult<T> = Result<T, CliError>;
