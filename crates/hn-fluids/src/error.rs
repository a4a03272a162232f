//! Fluid property errors.

use hn_core::HnError;
use thiserror::Error;

/// Result type for fluid operations.
pub type FluidResult<T> = Result<T, FluidError>;

/// Errors that can occur during fluid and moist-air property calculations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FluidError {
    /// Non-physical values (negative density, pressure, etc.).
    #[error("Non-physical value for {what}: {value}")]
    NonPhysical { what: &'static str, value: f64 },

    /// Value outside the fitted range of a correlation.
    #[error("Value out of range for {what}: {value}")]
    OutOfRange { what: &'static str, value: f64 },
}

impl From<FluidError> for HnError {
    fn from(err: FluidError) -> Self {
        HnError::Invariant {
            what: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = FluidError::NonPhysical {
            what: "density",
            value: -1.0,
        };
        assert!(err.to_string().contains("density"));
    }

    #[test]
    fn error_to_core_error() {
        let err: HnError = FluidError::OutOfRange {
            what: "drybulb",
            value: 900.0,
        }
        .into();
        assert!(matches!(err, HnError::Invariant { .. }));
    }
}
