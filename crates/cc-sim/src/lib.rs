//! Fixed-rate cruise governor simulation.
//!
//! Provides:
//! - `SimState` / `StateSnapshot`: the mutable controller and vehicle state
//! - `HistoryLog`: per-tick samples for plotting collaborators
//! - `PerturbationQueue`: pending speed drops requested by the operator
//! - `SimulationEngine`: the tick state transition
//! - `Governor`: lock-serialized command boundary shared across threads
//! - `TickDriver`: background thread invoking `tick()` every `dt`

pub mod command;
pub mod driver;
pub mod engine;
pub mod error;
pub mod governor;
pub mod history;
pub mod perturbation;
pub mod state;

// Re-exports for public API
pub use command::Command;
pub use driver::TickDriver;
pub use engine::{EngineSetup, SimulationEngine};
pub use error::{SimError, SimResult};
pub use governor::Governor;
pub use history::{HistoryLog, HistorySample, HistorySlice};
pub use perturbation::{DEFAULT_MAGNITUDES, MAX_AD_HOC_PENDING, PerturbationQueue};
pub use state::{Mode, SimState, SpeedLimits, StateSnapshot};
