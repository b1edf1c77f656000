//! Vehicle and controller state shared by the tick loop and the command boundary.

use std::fmt;

use cc_controls::{PidState, TermFlags};
use cc_core::{Real, ensure_finite};
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Operating mode of the governor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Actual speed tracks the operator's initial speed, no feedback.
    #[default]
    Manual,
    /// Feedback control toward the desired speed.
    Cruise,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Manual => f.write_str("manual"),
            Mode::Cruise => f.write_str("cruise"),
        }
    }
}

/// Accepted range for operator speed targets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedLimits {
    pub min_speed: Real,
    pub max_speed: Real,
}

impl Default for SpeedLimits {
    fn default() -> Self {
        Self {
            min_speed: 0.0,
            max_speed: 200.0,
        }
    }
}

impl SpeedLimits {
    pub fn new(min_speed: Real, max_speed: Real) -> SimResult<Self> {
        let limits = Self {
            min_speed,
            max_speed,
        };
        limits.validate()?;
        Ok(limits)
    }

    pub fn validate(&self) -> SimResult<()> {
        ensure_finite(self.min_speed, "min_speed")?;
        ensure_finite(self.max_speed, "max_speed")?;
        if self.min_speed < 0.0 {
            return Err(SimError::InvalidArg {
                what: "min_speed must be non-negative",
            });
        }
        if self.min_speed >= self.max_speed {
            return Err(SimError::InvalidArg {
                what: "min_speed must be less than max_speed",
            });
        }
        Ok(())
    }

    pub fn clamp(&self, v: Real) -> Real {
        v.clamp(self.min_speed, self.max_speed)
    }

    pub fn contains(&self, v: Real) -> bool {
        v >= self.min_speed && v <= self.max_speed
    }
}

/// Complete mutable state of one governor session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimState {
    pub mode: Mode,
    pub paused: bool,
    pub terms: TermFlags,
    /// Speed the vehicle holds in manual mode.
    pub initial_speed: Real,
    /// Cruise setpoint.
    pub desired_speed: Real,
    /// Simulated speed, never negative.
    pub actual_speed: Real,
    /// Integral accumulator and last error.
    pub pid: PidState,
    /// Last applied (slew-limited) throttle.
    pub previous_throttle: Real,
    /// Simulation clock (seconds), restarted on cruise entry.
    pub elapsed_time: Real,
}

impl SimState {
    /// Manual mode at `initial_speed`, throttle balancing drag.
    pub fn new(initial_speed: Real, desired_speed: Real, terms: TermFlags, drag_coeff: Real) -> Self {
        Self {
            mode: Mode::Manual,
            paused: false,
            terms,
            initial_speed,
            desired_speed,
            actual_speed: initial_speed,
            pid: PidState::default(),
            previous_throttle: initial_speed * drag_coeff,
            elapsed_time: 0.0,
        }
    }

    pub fn integral(&self) -> Real {
        self.pid.integral
    }

    pub fn previous_error(&self) -> Real {
        self.pid.previous_error
    }

    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            actual_speed: self.actual_speed,
            mode: self.mode,
            paused: self.paused,
            desired_speed: self.desired_speed,
            initial_speed: self.initial_speed,
            terms: self.terms,
            elapsed_time: self.elapsed_time,
        }
    }
}

/// Read-only view of the state for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub actual_speed: Real,
    pub mode: Mode,
    pub paused: bool,
    pub desired_speed: Real,
    pub initial_speed: Real,
    pub terms: TermFlags,
    pub elapsed_time: Real,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_starts_manual_at_initial_speed() {
        let state = SimState::new(60.0, 100.0, TermFlags::default(), 0.01);
        assert_eq!(state.mode, Mode::Manual);
        assert!(!state.paused);
        assert_eq!(state.actual_speed, 60.0);
        assert!((state.previous_throttle - 0.6).abs() < 1e-12);
        assert_eq!(state.integral(), 0.0);
        assert_eq!(state.elapsed_time, 0.0);
    }

    #[test]
    fn limits_clamp_out_of_range() {
        let limits = SpeedLimits::default();
        assert_eq!(limits.clamp(-5.0), 0.0);
        assert_eq!(limits.clamp(250.0), 200.0);
        assert_eq!(limits.clamp(120.0), 120.0);
        assert!(limits.contains(200.0));
        assert!(!limits.contains(200.5));
    }

    #[test]
    fn inverted_limits_are_rejected() {
        assert!(SpeedLimits::new(100.0, 50.0).is_err());
        assert!(SpeedLimits::new(-1.0, 50.0).is_err());
        assert!(SpeedLimits::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn mode_serializes_lowercase() {
        assert_eq!(Mode::Cruise.to_string(), "cruise");
        assert_eq!(Mode::default(), Mode::Manual);
    }
}
