//! hn-controls: sensors and controller signals.
//!
//! Provides:
//! - Sensors reading node, element and valve state through an
//!   [`hn_components::EvalContext`]
//! - Controllers with a normalized `[0, 1]` output: constant, hourly
//!   schedule, load-based staging with hysteresis, PI
//! - A two-phase state advance: `next_state` reads committed measurements,
//!   `commit` assigns

pub mod controller;
pub mod error;
pub mod load_based;
pub mod pi;
pub mod sensor;

pub use controller::{Controller, ControllerKind, ControllerState, Setpoint};
pub use error::{ControlError, ControlResult};
pub use load_based::{LoadBasedController, LoadBasedState};
pub use pi::{ControlAction, PiController, PiState};
pub use sensor::{AirsideControl, Sensor, SensorKind};
