//! Error types for simulation setup.

use cc_controls::ControlError;
use cc_core::CoreError;
use thiserror::Error;

/// Errors encountered while building or driving a simulation.
///
/// A constructed engine never fails a tick; everything here is raised at
/// setup time or by the driver thread plumbing.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Invalid controller configuration: {0}")]
    Control(#[from] ControlError),

    #[error("Invalid value: {0}")]
    Core(#[from] CoreError),

    #[error("Failed to spawn tick driver thread")]
    Spawn(#[source] std::io::Error),

    #[error("Tick driver thread panicked")]
    DriverPanicked,
}

pub type SimResult<T> = Result<T, SimError>;
