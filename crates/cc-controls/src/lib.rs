//! Controller primitives for the cruise governor.
//!
//! The governor runs one sampled PID law per tick:
//! - `params` holds the per-session tuning (gains, slew limit, tick period, drag)
//! - `controller` evaluates the P, I and D terms with per-term enable flags
//! - `slew` bounds the per-tick change of the controller output
//!
//! Variants such as P-only, PI or PID are not separate controllers; they are
//! selected by gains and `TermFlags` at runtime.

pub mod controller;
pub mod error;
pub mod params;
pub mod slew;

pub use controller::{PidController, PidState, PidTerms, Term, TermFlags};
pub use error::{ControlError, ControlResult};
pub use params::ControllerParams;
pub use slew::SlewLimiter;
