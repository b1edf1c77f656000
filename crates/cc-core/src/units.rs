// cc-core/src/units.rs

use std::time::Duration;

use uom::si::f64::{Time as UomTime, Velocity as UomVelocity};

use crate::{CoreError, CoreResult, Real};

// Public canonical unit types (SI, f64)
pub type Time = UomTime;
pub type Speed = UomVelocity;

#[inline]
pub fn s(v: f64) -> Time {
    use uom::si::time::second;
    Time::new::<second>(v)
}

#[inline]
pub fn kph(v: f64) -> Speed {
    use uom::si::velocity::kilometer_per_hour;
    Speed::new::<kilometer_per_hour>(v)
}

/// Simulation speeds are plain km/h numbers.
#[inline]
pub fn as_kph(v: Speed) -> Real {
    use uom::si::velocity::kilometer_per_hour;
    v.get::<kilometer_per_hour>()
}

#[inline]
pub fn as_seconds(t: Time) -> Real {
    use uom::si::time::second;
    t.get::<second>()
}

/// `"98.4 km/h"`
pub fn display_kph(v: Real) -> String {
    use uom::fmt::DisplayStyle::Abbreviation;
    use uom::si::velocity::kilometer_per_hour;
    format!("{:.1}", kph(v).into_format_args(kilometer_per_hour, Abbreviation))
}

/// Convert a simulation period into a wall-clock sleep.
pub fn to_duration(t: Time) -> CoreResult<Duration> {
    let secs = as_seconds(t);
    if !secs.is_finite() || secs <= 0.0 {
        return Err(CoreError::InvalidArg {
            what: "period must be finite and positive",
        });
    }
    Duration::try_from_secs_f64(secs).map_err(|_| CoreError::InvalidArg {
        what: "period does not fit in a Duration",
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kph_roundtrip() {
        let v = kph(100.0);
        assert!((as_kph(v) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn kph_display_uses_abbreviation() {
        assert_eq!(display_kph(98.44), "98.4 km/h");
    }

    #[test]
    fn tick_period_to_duration() {
        let d = to_duration(s(0.1)).unwrap();
        assert_eq!(d.as_millis(), 100);
    }

    #[test]
    fn zero_period_is_rejected() {
        assert!(to_duration(s(0.0)).is_err());
        assert!(to_duration(s(f64::NAN)).is_err());
    }
}
