//! Per-session controller tuning.

use cc_core::{Real, Time, ensure_non_negative, ensure_positive, s};
use serde::{Deserialize, Serialize};

use crate::error::ControlResult;

/// Tunable constants for one governor session.
///
/// Set once when a session starts; the engine only ever reads them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerParams {
    /// Proportional gain.
    pub kp: Real,
    /// Integral gain.
    pub ki: Real,
    /// Derivative gain.
    pub kd: Real,
    /// Maximum throttle change per tick.
    pub max_delta: Real,
    /// Tick period (seconds).
    pub dt: Real,
    /// Linear drag coefficient (1/s).
    pub drag_coeff: Real,
}

impl Default for ControllerParams {
    fn default() -> Self {
        Self {
            kp: 0.2,
            ki: 0.05,
            kd: 0.0,
            max_delta: 0.5,
            dt: 0.1,
            drag_coeff: 0.01,
        }
    }
}

impl ControllerParams {
    /// Create validated controller parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if any gain or `drag_coeff` is negative, if `dt` or
    /// `max_delta` is not positive, or if any value is non-finite.
    pub fn new(
        kp: Real,
        ki: Real,
        kd: Real,
        max_delta: Real,
        dt: Real,
        drag_coeff: Real,
    ) -> ControlResult<Self> {
        let params = Self {
            kp,
            ki,
            kd,
            max_delta,
            dt,
            drag_coeff,
        };
        params.validate()?;
        Ok(params)
    }

    /// Check every field. Deserialized parameters must pass through here
    /// before they reach an engine.
    pub fn validate(&self) -> ControlResult<()> {
        ensure_non_negative(self.kp, "kp")?;
        ensure_non_negative(self.ki, "ki")?;
        ensure_non_negative(self.kd, "kd")?;
        ensure_positive(self.max_delta, "max_delta")?;
        ensure_positive(self.dt, "dt")?;
        ensure_non_negative(self.drag_coeff, "drag_coeff")?;
        Ok(())
    }

    /// Tick period as a typed quantity.
    pub fn period(&self) -> Time {
        s(self.dt)
    }

    /// Throttle that exactly balances drag at `speed`.
    pub fn holding_throttle(&self, speed: Real) -> Real {
        speed * self.drag_coeff
    }
}
