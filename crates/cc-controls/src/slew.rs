//! Output slew-rate limiting.
//!
//! The limiter bounds how far the controller output may move in one tick.
//! It shapes the output only; the integral keeps accumulating while the
//! output is pinned against the limit.

use cc_core::{Real, ensure_positive};
use serde::{Deserialize, Serialize};

use crate::error::ControlResult;

/// Per-tick rate limiter for a scalar output.
///
/// # Example
///
/// ```
/// use cc_controls::SlewLimiter;
///
/// let limiter = SlewLimiter::new(0.5).unwrap();
/// assert_eq!(limiter.limit(1.0, 4.0), 1.5);
/// assert_eq!(limiter.limit(1.0, -4.0), 0.5);
/// assert_eq!(limiter.limit(1.0, 1.2), 1.2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlewLimiter {
    /// Maximum change per tick, must be positive
    pub max_delta: Real,
}

impl SlewLimiter {
    /// Create a new limiter.
    ///
    /// # Errors
    ///
    /// Returns error if `max_delta` is not positive.
    pub fn new(max_delta: Real) -> ControlResult<Self> {
        let max_delta = ensure_positive(max_delta, "max_delta")?;
        Ok(Self { max_delta })
    }

    /// Move from `previous` toward `raw` by at most `max_delta`.
    pub fn limit(&self, previous: Real, raw: Real) -> Real {
        let delta = raw - previous;
        if delta > self.max_delta {
            previous + self.max_delta
        } else if delta < -self.max_delta {
            previous - self.max_delta
        } else {
            raw
        }
    }

    /// True if `raw` would be clipped.
    pub fn saturates(&self, previous: Real, raw: Real) -> bool {
        (raw - previous).abs() > self.max_delta
    }
}
