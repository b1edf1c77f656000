//! PID term evaluation.
//!
//! One law covers every governor variant:
//! - **P**: `kp * error`
//! - **I**: `ki * integral`, where the integral only accumulates while enabled
//! - **D**: `kd * (error - previous_error) / dt`
//!
//! Disabled terms contribute zero. There is no integral clamp here; the only
//! output shaping is the slew limiter applied afterwards.

use cc_core::Real;
use serde::{Deserialize, Serialize};

use crate::params::ControllerParams;

/// One of the three controller terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Term {
    P,
    I,
    D,
}

/// Per-term activation flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TermFlags {
    pub p: bool,
    pub i: bool,
    pub d: bool,
}

impl Default for TermFlags {
    fn default() -> Self {
        Self {
            p: true,
            i: true,
            d: false,
        }
    }
}

impl TermFlags {
    pub fn is_enabled(&self, term: Term) -> bool {
        match term {
            Term::P => self.p,
            Term::I => self.i,
            Term::D => self.d,
        }
    }

    pub fn set(&mut self, term: Term, enabled: bool) {
        match term {
            Term::P => self.p = enabled,
            Term::I => self.i = enabled,
            Term::D => self.d = enabled,
        }
    }

    /// Flip one flag and return its new value.
    pub fn toggle(&mut self, term: Term) -> bool {
        let enabled = !self.is_enabled(term);
        self.set(term, enabled);
        enabled
    }
}

/// Memory carried between controller updates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PidState {
    /// Accumulated error-time product.
    pub integral: Real,
    /// Error seen on the previous update.
    pub previous_error: Real,
}

/// Term breakdown for one update.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PidTerms {
    pub error: Real,
    pub p: Real,
    pub i: Real,
    pub d: Real,
}

impl PidTerms {
    /// Unshaped controller output.
    pub fn raw(&self) -> Real {
        self.p + self.i + self.d
    }
}

/// PID gains bound to a tick period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PidController {
    pub kp: Real,
    pub ki: Real,
    pub kd: Real,
    /// Update period (seconds), always positive.
    pub dt: Real,
}

impl PidController {
    /// Build from already-validated parameters.
    pub fn from_params(params: &ControllerParams) -> Self {
        Self {
            kp: params.kp,
            ki: params.ki,
            kd: params.kd,
            dt: params.dt,
        }
    }

    /// Compute the terms for `error = setpoint - measured`.
    ///
    /// # Returns
    ///
    /// Updated state and the term breakdown.
    pub fn update(
        &self,
        state: &PidState,
        flags: TermFlags,
        setpoint: Real,
        measured: Real,
    ) -> (PidState, PidTerms) {
        let error = setpoint - measured;

        // Held, not zeroed, while I is disabled
        let integral = if flags.i {
            state.integral + error * self.dt
        } else {
            state.integral
        };

        let p = if flags.p { self.kp * error } else { 0.0 };
        let i = if flags.i { self.ki * integral } else { 0.0 };
        let d = if flags.d {
            self.kd * (error - state.previous_error) / self.dt
        } else {
            0.0
        };

        let new_state = PidState {
            integral,
            previous_error: error,
        };

        (new_state, PidTerms { error, p, i, d })
    }
}
