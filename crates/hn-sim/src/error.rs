//! Error types for network assembly and time stepping.

use hn_components::ComponentError;
use hn_controls::ControlError;
use hn_core::HnError;
use hn_graph::GraphError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// A reference points outside the network or at the wrong kind of object.
    #[error("Invalid reference: {what}")]
    InvalidReference { what: String },

    /// Structurally valid but unsimulable network.
    #[error("Invalid network: {what}")]
    InvalidNetwork { what: String },

    #[error("Non-finite {quantity} at '{object}': {value}")]
    NonFinite {
        object: String,
        quantity: &'static str,
        value: f64,
    },

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Component error: {0}")]
    Component(#[from] ComponentError),

    #[error("Control error: {0}")]
    Control(#[from] ControlError),
}

pub type SimResult<T> = Result<T, SimError>;

impl From<SimError> for HnError {
    fn from(e: SimError) -> Self {
        match e {
            SimError::InvalidArg { what } => HnError::InvalidArg { what },
            other => HnError::Invariant {
                what: other.to_string(),
            },
        }
    }
}
