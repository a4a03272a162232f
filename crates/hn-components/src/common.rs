//! Common utilities for component calculations.

use hn_core::Real;

use crate::error::{ComponentError, ComponentResult};

/// Ensure a value is finite, returning it unchanged.
pub fn check_finite(value: Real, what: &'static str) -> ComponentResult<Real> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ComponentError::NonFinite { what, value })
    }
}

/// Ensure a configuration parameter is finite and strictly positive.
pub fn require_positive(value: Real, what: &'static str) -> ComponentResult<Real> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ComponentError::InvalidArg { what })
    }
}

/// Ensure a configuration parameter is finite and not negative.
pub fn require_non_negative(value: Real, what: &'static str) -> ComponentResult<Real> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ComponentError::InvalidArg { what })
    }
}

/// Clamp a normalized signal to [0, 1].
pub fn clamp_unit(value: Real) -> Real {
    value.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_finite() {
        assert_eq!(check_finite(1.0, "test"), Ok(1.0));
        assert!(check_finite(f64::INFINITY, "test").is_err());
        assert!(check_finite(f64::NAN, "test").is_err());
    }

    #[test]
    fn test_require_positive() {
        assert!(require_positive(2.0, "flow").is_ok());
        assert!(require_positive(0.0, "flow").is_err());
        assert!(require_non_negative(0.0, "ua").is_ok());
        assert!(require_non_negative(-1.0, "ua").is_err());
    }

    #[test]
    fn test_clamp_unit() {
        assert_eq!(clamp_unit(-0.5), 0.0);
        assert_eq!(clamp_unit(0.25), 0.25);
        assert_eq!(clamp_unit(3.0), 1.0);
    }
}
