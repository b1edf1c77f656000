//! cc-core: shared foundation for the cruise governor.
//!
//! Contains:
//! - numeric (Real + tolerances + float helpers)
//! - units (uom speed/time types + constructors)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

pub use error::{CoreError, CoreResult};
pub use numeric::*;
pub use units::*;
