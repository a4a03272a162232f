//! hn-core: stable foundation for hydronet.
//!
//! Contains:
//! - units (fixed engineering units: GPM, °F, ft of head, Btu/hr, kW)
//! - numeric (Real + float helpers)
//! - ids (stable compact IDs for network objects)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

pub use error::HnError;
pub use ids::*;
pub use numeric::*;
pub use units::*;
