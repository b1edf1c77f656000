use crate::CoreError;

/// Floating point type used throughout system
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CoreError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Finite and `>= 0`.
pub fn ensure_non_negative(v: Real, what: &'static str) -> Result<Real, CoreError> {
    let v = ensure_finite(v, what)?;
    if v < 0.0 {
        return Err(CoreError::OutOfRange {
            what,
            value: v,
            expected: ">= 0",
        });
    }
    Ok(v)
}

/// Finite and `> 0`.
pub fn ensure_positive(v: Real, what: &'static str) -> Result<Real, CoreError> {
    let v = ensure_finite(v, what)?;
    if v <= 0.0 {
        return Err(CoreError::OutOfRange {
            what,
            value: v,
            expected: "> 0",
        });
    }
    Ok(v)
}

/// Speeds never go negative; the floor is applied after every update.
#[inline]
pub fn floor_at_zero(v: Real) -> Real {
    v.max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        };
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn positive_rejects_zero_and_negative() {
        assert!(ensure_positive(0.0, "dt").is_err());
        assert!(ensure_positive(-0.1, "dt").is_err());
        assert_eq!(ensure_positive(0.1, "dt").unwrap(), 0.1);
    }

    #[test]
    fn non_negative_accepts_zero() {
        assert_eq!(ensure_non_negative(0.0, "kd").unwrap(), 0.0);
        assert!(ensure_non_negative(-1e-9, "kd").is_err());
        assert!(ensure_non_negative(Real::INFINITY, "kd").is_err());
    }

    #[test]
    fn floor_at_zero_clamps_negatives() {
        assert_eq!(floor_at_zero(-3.0), 0.0);
        assert_eq!(floor_at_zero(4.5), 4.5);
    }
}
