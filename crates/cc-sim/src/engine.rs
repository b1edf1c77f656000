//! The governor tick.
//!
//! `SimulationEngine::tick` is a pure state transition: it knows nothing about
//! wall-clock time or threads, so tests can step it deterministically and the
//! `TickDriver` can schedule it in real time.

use cc_controls::{ControllerParams, PidController, PidState, SlewLimiter, Term, TermFlags};
use cc_core::{Real, floor_at_zero};
use tracing::{debug, trace, warn};

use crate::command::Command;
use crate::error::SimResult;
use crate::history::{HistoryLog, HistorySample, HistorySlice};
use crate::perturbation::{DEFAULT_MAGNITUDES, PerturbationQueue};
use crate::state::{Mode, SimState, SpeedLimits, StateSnapshot};

/// Everything needed to start a session.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSetup {
    pub params: ControllerParams,
    pub limits: SpeedLimits,
    pub initial_speed: Real,
    pub desired_speed: Real,
    pub terms: TermFlags,
    pub perturbation_magnitudes: Vec<Real>,
}

impl Default for EngineSetup {
    fn default() -> Self {
        Self {
            params: ControllerParams::default(),
            limits: SpeedLimits::default(),
            initial_speed: 60.0,
            desired_speed: 100.0,
            terms: TermFlags::default(),
            perturbation_magnitudes: DEFAULT_MAGNITUDES.to_vec(),
        }
    }
}

/// Cruise governor: state, history and pending perturbations for one session.
#[derive(Debug, Clone)]
pub struct SimulationEngine {
    params: ControllerParams,
    pid: PidController,
    limiter: SlewLimiter,
    limits: SpeedLimits,
    state: SimState,
    history: HistoryLog,
    perturbations: PerturbationQueue,
}

impl SimulationEngine {
    /// Validate `setup` and build an engine in manual mode.
    ///
    /// # Errors
    ///
    /// Configuration errors (`dt <= 0`, negative gains, bad speed range,
    /// non-positive perturbation buttons) are only ever raised here.
    pub fn new(setup: EngineSetup) -> SimResult<Self> {
        let EngineSetup {
            params,
            limits,
            initial_speed,
            desired_speed,
            terms,
            perturbation_magnitudes,
        } = setup;

        params.validate()?;
        limits.validate()?;
        let limiter = SlewLimiter::new(params.max_delta)?;
        let perturbations = PerturbationQueue::with_magnitudes(&perturbation_magnitudes)?;

        let initial_speed = clamp_target(&limits, initial_speed, "initial_speed", limits.min_speed);
        let desired_speed = clamp_target(&limits, desired_speed, "desired_speed", limits.min_speed);

        debug!(
            kp = params.kp,
            ki = params.ki,
            kd = params.kd,
            max_delta = params.max_delta,
            dt = params.dt,
            drag_coeff = params.drag_coeff,
            "governor engine created"
        );

        Ok(Self {
            pid: PidController::from_params(&params),
            limiter,
            limits,
            state: SimState::new(initial_speed, desired_speed, terms, params.drag_coeff),
            history: HistoryLog::new(),
            perturbations,
            params,
        })
    }

    pub fn params(&self) -> &ControllerParams {
        &self.params
    }

    pub fn limits(&self) -> &SpeedLimits {
        &self.limits
    }

    pub fn state(&self) -> &SimState {
        &self.state
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn perturbations(&self) -> &PerturbationQueue {
        &self.perturbations
    }

    /// Advance the simulation by one `dt`.
    ///
    /// Returns the appended sample, or `None` while paused.
    pub fn tick(&mut self) -> Option<HistorySample> {
        self.state.elapsed_time += self.params.dt;

        if self.state.paused {
            trace!(time = self.state.elapsed_time, "paused tick");
            return None;
        }

        let sample = match self.state.mode {
            Mode::Manual => self.manual_step(),
            Mode::Cruise => self.cruise_step(),
        };
        trace!(
            time = sample.time,
            mode = %self.state.mode,
            speed = sample.speed,
            throttle = sample.throttle,
            error = sample.error,
            "tick"
        );
        self.history.append(sample);
        Some(sample)
    }

    fn manual_step(&mut self) -> HistorySample {
        self.state.actual_speed = self.state.initial_speed;
        HistorySample {
            time: self.state.elapsed_time,
            speed: self.state.actual_speed,
            input_speed: self.state.initial_speed,
            ..HistorySample::default()
        }
    }

    fn cruise_step(&mut self) -> HistorySample {
        let mut applied = 0.0;
        for magnitude in self.perturbations.drain() {
            self.state.actual_speed = floor_at_zero(self.state.actual_speed - magnitude);
            applied += magnitude;
        }
        if applied > 0.0 {
            debug!(magnitude = applied, speed = self.state.actual_speed, "perturbation applied");
        }

        let (pid, terms) = self.pid.update(
            &self.state.pid,
            self.state.terms,
            self.state.desired_speed,
            self.state.actual_speed,
        );
        self.state.pid = pid;

        let raw = terms.raw();
        if self.limiter.saturates(self.state.previous_throttle, raw) {
            trace!(raw, previous = self.state.previous_throttle, "throttle slew-limited");
        }
        let throttle = self.limiter.limit(self.state.previous_throttle, raw);
        self.state.previous_throttle = throttle;

        let accel = throttle - self.params.drag_coeff * self.state.actual_speed;
        self.state.actual_speed = floor_at_zero(self.state.actual_speed + accel * self.params.dt);

        HistorySample {
            time: self.state.elapsed_time,
            error: terms.error,
            p_term: terms.p,
            i_term: terms.i,
            d_term: terms.d,
            throttle,
            speed: self.state.actual_speed,
            input_speed: self.state.desired_speed,
            perturbation_magnitude: applied,
        }
    }

    /// Switch modes. Entering cruise from manual starts a fresh control
    /// episode; every other transition keeps state as is.
    pub fn set_mode(&mut self, mode: Mode) {
        if self.state.mode == mode {
            return;
        }
        self.state.mode = mode;
        if mode == Mode::Cruise {
            self.reset_episode();
        }
        debug!(%mode, speed = self.state.actual_speed, "mode changed");
    }

    pub fn toggle_mode(&mut self) -> Mode {
        let next = match self.state.mode {
            Mode::Manual => Mode::Cruise,
            Mode::Cruise => Mode::Manual,
        };
        self.set_mode(next);
        next
    }

    fn reset_episode(&mut self) {
        self.state.pid = PidState::default();
        self.state.previous_throttle = self.params.holding_throttle(self.state.actual_speed);
        self.state.elapsed_time = 0.0;
        self.history.clear();
        self.perturbations.clear();
    }

    pub fn set_paused(&mut self, paused: bool) {
        if self.state.paused != paused {
            self.state.paused = paused;
            debug!(paused, "pause changed");
        }
    }

    pub fn toggle_pause(&mut self) -> bool {
        let paused = !self.state.paused;
        self.set_paused(paused);
        paused
    }

    pub fn set_term(&mut self, term: Term, enabled: bool) {
        self.state.terms.set(term, enabled);
        debug!(?term, enabled, "controller term set");
    }

    pub fn toggle_term(&mut self, term: Term) -> bool {
        let enabled = self.state.terms.toggle(term);
        debug!(?term, enabled, "controller term toggled");
        enabled
    }

    /// Non-finite input is ignored; everything else is clamped into range.
    pub fn set_initial_speed(&mut self, speed: Real) {
        self.state.initial_speed =
            clamp_target(&self.limits, speed, "initial_speed", self.state.initial_speed);
    }

    pub fn set_desired_speed(&mut self, speed: Real) {
        self.state.desired_speed =
            clamp_target(&self.limits, speed, "desired_speed", self.state.desired_speed);
    }

    /// Accepted in any mode; only cruise ticks consume requests.
    pub fn request_perturbation(&mut self, magnitude: Real) -> bool {
        let accepted = self.perturbations.request(magnitude);
        if accepted {
            debug!(magnitude, mode = %self.state.mode, "perturbation requested");
        } else {
            warn!(magnitude, "perturbation rejected");
        }
        accepted
    }

    pub fn apply(&mut self, command: Command) {
        match command {
            Command::SetInitialSpeed { speed } => self.set_initial_speed(speed),
            Command::SetDesiredSpeed { speed } => self.set_desired_speed(speed),
            Command::SetMode { mode } => self.set_mode(mode),
            Command::ToggleMode => {
                self.toggle_mode();
            }
            Command::TogglePause => {
                self.toggle_pause();
            }
            Command::SetPaused { paused } => self.set_paused(paused),
            Command::ToggleTerm { term } => {
                self.toggle_term(term);
            }
            Command::SetTerm { term, enabled } => self.set_term(term, enabled),
            Command::RequestPerturbation { magnitude } => {
                self.request_perturbation(magnitude);
            }
        }
    }

    pub fn snapshot_state(&self) -> StateSnapshot {
        self.state.snapshot()
    }

    pub fn snapshot_history(&self) -> Vec<HistorySample> {
        self.history.snapshot()
    }

    pub fn snapshot_history_since(&self, epoch: u64, from: usize) -> HistorySlice {
        self.history.since(epoch, from)
    }
}

fn clamp_target(limits: &SpeedLimits, speed: Real, what: &'static str, fallback: Real) -> Real {
    if !speed.is_finite() {
        warn!(what, speed, "ignoring non-finite speed target");
        return fallback;
    }
    let clamped = limits.clamp(speed);
    if clamped != speed {
        warn!(what, speed, clamped, "speed target clamped into range");
    }
    clamped
}
