//! Error types for controller configuration.

use cc_core::CoreError;
use thiserror::Error;

/// Result type for control system operations.
pub type ControlResult<T> = Result<T, ControlError>;

/// Errors that can occur while configuring a controller.
///
/// None of these can occur once a controller has been built; evaluation is
/// total over validated parameters.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControlError {
    /// A parameter failed a numeric check.
    #[error("Invalid controller parameter: {0}")]
    InvalidParam(#[from] CoreError),
}
