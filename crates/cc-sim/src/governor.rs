//! Thread-safe command boundary around a `SimulationEngine`.
//!
//! Every command and every tick takes the same lock for its whole duration,
//! so a tick always sees one consistent set of targets and flags, and a
//! command issued before a tick starts is visible to that tick.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use cc_controls::{ControllerParams, Term};
use cc_core::Real;

use crate::command::Command;
use crate::engine::{EngineSetup, SimulationEngine};
use crate::error::SimResult;
use crate::history::{HistorySample, HistorySlice};
use crate::state::{Mode, StateSnapshot};

/// Cloneable handle shared by the tick driver and command issuers.
#[derive(Debug, Clone)]
pub struct Governor {
    inner: Arc<Mutex<SimulationEngine>>,
}

impl Governor {
    pub fn new(setup: EngineSetup) -> SimResult<Self> {
        Ok(Self::from_engine(SimulationEngine::new(setup)?))
    }

    pub fn from_engine(engine: SimulationEngine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    // Engine state is consistent between statements, so a panic in another
    // holder does not invalidate it.
    fn lock(&self) -> MutexGuard<'_, SimulationEngine> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn params(&self) -> ControllerParams {
        *self.lock().params()
    }

    pub fn tick(&self) -> Option<HistorySample> {
        self.lock().tick()
    }

    pub fn apply(&self, command: Command) {
        self.lock().apply(command);
    }

    pub fn set_initial_speed(&self, speed: Real) {
        self.lock().set_initial_speed(speed);
    }

    pub fn set_desired_speed(&self, speed: Real) {
        self.lock().set_desired_speed(speed);
    }

    pub fn set_mode(&self, mode: Mode) {
        self.lock().set_mode(mode);
    }

    pub fn toggle_mode(&self) -> Mode {
        self.lock().toggle_mode()
    }

    pub fn toggle_pause(&self) -> bool {
        self.lock().toggle_pause()
    }

    pub fn set_paused(&self, paused: bool) {
        self.lock().set_paused(paused);
    }

    pub fn toggle_term(&self, term: Term) -> bool {
        self.lock().toggle_term(term)
    }

    pub fn set_term(&self, term: Term, enabled: bool) {
        self.lock().set_term(term, enabled);
    }

    pub fn request_perturbation(&self, magnitude: Real) -> bool {
        self.lock().request_perturbation(magnitude)
    }

    pub fn snapshot_state(&self) -> StateSnapshot {
        self.lock().snapshot_state()
    }

    pub fn snapshot_history(&self) -> Vec<HistorySample> {
        self.lock().snapshot_history()
    }

    pub fn snapshot_history_since(&self, epoch: u64, from: usize) -> HistorySlice {
        self.lock().snapshot_history_since(epoch, from)
    }
}
