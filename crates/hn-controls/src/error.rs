//! Error types for sensors and controllers.

use hn_components::ComponentError;
use hn_core::HnError;
use thiserror::Error;

/// Result type for control operations.
pub type ControlResult<T> = Result<T, ControlError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControlError {
    /// Invalid argument provided to a control constructor.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// A sensor or controller refers to an object of the wrong kind.
    #[error("Invalid reference: {what}")]
    InvalidReference { what: String },

    /// Controller state does not belong to the controller kind.
    #[error("Controller state error: {what}")]
    StateError { what: String },

    /// Reading a measurement failed in the element layer.
    #[error("Measurement failed: {0}")]
    Component(#[from] ComponentError),
}

impl From<ControlError> for HnError {
    fn from(e: ControlError) -> Self {
        match e {
            ControlError::InvalidArg { what } => HnError::InvalidArg { what },
            other => HnError::Invariant {
                what: other.to_string(),
            },
        }
    }
}
