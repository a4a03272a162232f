//! hn-fluids: working-fluid and moist-air properties for hydronet.
//!
//! Provides:
//! - `FluidModel` trait for the loop fluid (density, specific heat)
//! - Constant-property `Water`
//! - IP-unit psychrometric relations used by cooling-tower models
//!
//! # Example
//!
//! ```
//! use hn_fluids::{FluidModel, Water};
//!
//! let water = Water::default();
//! // Btu/hr per (GPM·°F), the familiar "500" factor.
//! let factor = water.capacity_rate_per_gpm();
//! assert!((factor - 500.5).abs() < 0.1);
//! ```

pub mod error;
pub mod model;
pub mod psychro;

pub use error::{FluidError, FluidResult};
pub use model::{FluidModel, Water};
