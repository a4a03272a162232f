//! Error types for component operations.

use hn_core::HnError;
use hn_fluids::FluidError;
use thiserror::Error;

/// Errors that can occur during component construction or evaluation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComponentError {
    #[error("Non-finite value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Operating point outside model domain: {what}")]
    OutOfDomain { what: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Element '{element}' is not linked to a plant")]
    MissingLink { element: String },

    #[error("Element '{element}' cannot serve as {role} of plant '{plant}'")]
    LinkMismatch {
        plant: String,
        element: String,
        role: &'static str,
    },

    #[error("Element '{element}' is linked to more than one plant")]
    DuplicateLink { element: String },

    #[error("Fluid property error: {0}")]
    Fluid(#[from] FluidError),
}

pub type ComponentResult<T> = Result<T, ComponentError>;

impl From<ComponentError> for HnError {
    fn from(e: ComponentError) -> Self {
        match e {
            ComponentError::NonFinite { what, value } => HnError::NonFinite { what, value },
            ComponentError::InvalidArg { what } => HnError::InvalidArg { what },
            other => HnError::Invariant {
                what: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ComponentError::MissingLink {
            element: "Evap-1".into(),
        };
        assert!(err.to_string().contains("Evap-1"));
    }

    #[test]
    fn error_conversion() {
        let err: HnError = ComponentError::InvalidArg { what: "test" }.into();
        assert!(matches!(err, HnError::InvalidArg { .. }));

        let err: HnError = ComponentError::OutOfDomain { what: "pump" }.into();
        assert!(matches!(err, HnError::Invariant { .. }));
    }
}
