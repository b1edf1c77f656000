//! Operator commands accepted at the simulation boundary.

use cc_controls::Term;
use cc_core::Real;
use serde::{Deserialize, Serialize};

use crate::state::Mode;

/// One operator input. Applying a command never fails: out-of-range speeds
/// are clamped and invalid perturbations are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    SetInitialSpeed { speed: Real },
    SetDesiredSpeed { speed: Real },
    SetMode { mode: Mode },
    ToggleMode,
    TogglePause,
    SetPaused { paused: bool },
    ToggleTerm { term: Term },
    SetTerm { term: Term, enabled: bool },
    RequestPerturbation { magnitude: Real },
}
