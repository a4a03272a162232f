//! hn-sim: network registry and explicit time integration.
//!
//! Provides:
//! - [`NetworkBuilder`]: two-pass assembly that resolves topology, links
//!   plants to their side elements and validates every reference
//! - [`Network`]: owner of all objects, and the [`hn_components::EvalContext`]
//!   elements are evaluated against
//! - Double-buffered node states with a compute/commit step
//!   ([`Integrator`]), optionally parallel over nodes
//! - [`run_sim`] with decimated recording into a [`ReportFrame`]

pub mod error;
pub mod integrator;
pub mod network;
pub mod node;
pub mod report;
pub mod sim;

mod validate;

pub use error::{SimError, SimResult};
pub use integrator::{
    Integrator, StepOptions, compute_next_state, compute_next_states_in_order,
};
pub use network::{Network, NetworkBuilder};
pub use node::{NodeBuffers, NodeKind};
pub use report::{Column, ReportFrame, snapshot};
pub use sim::{SimOptions, run_sim};
