//! Explicit two-phase time stepping.
//!
//! Each step has a compute phase, a commit phase and a post-step hook:
//!
//! 1. every dynamic node computes its next state from the committed state
//!    of the whole network (serially or on the rayon pool);
//! 2. all next states become current at once;
//! 3. providers move to the new time, then every controller computes its
//!    next state from the committed network and all of them are assigned.
//!
//! Node updates:
//!
//! ```text
//! P' = P + dt·α·(ΣQ_in − ΣQ_out)
//! T' = T − dt / ΣC_in · (Σadvection_in − Σgain_in)
//! ```
//!
//! where the sums over `_in` run over the elements discharging into the node.

use hn_components::{EvalContext, NodeState};
use hn_controls::ControllerState;
use hn_core::{NodeId, Real};
use rayon::prelude::*;

use crate::error::{SimError, SimResult};
use crate::network::Network;
use crate::node::NodeKind;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepOptions {
    /// Step size [hr].
    pub dt_hours: Real,
    /// Evaluate the compute phase on the rayon pool.
    pub parallel: bool,
}

impl Default for StepOptions {
    fn default() -> Self {
        Self {
            dt_hours: 0.001,
            parallel: false,
        }
    }
}

/// Next state of one node, from committed states only.
pub fn compute_next_state(net: &Network, node: NodeId, dt: Real) -> SimResult<NodeState> {
    let state = net.node(node);
    let NodeKind::Dynamic { alpha } = net.node_kind(node) else {
        return Ok(state);
    };
    let graph = net.graph();
    let fluid = net.fluid();

    let mut inflow = 0.0;
    let mut capacity = 0.0;
    let mut advection = 0.0;
    let mut gain = 0.0;
    for &e in graph.inlet_elements(node) {
        let elem = net.element(e);
        inflow += elem.flow(net)?;
        capacity += elem.heat_capacity(fluid);
        advection += elem.heat_advection(net)?;
        gain += elem.heat_gain(net)?;
    }
    let mut outflow = 0.0;
    for &e in graph.outlet_elements(node) {
        outflow += net.element(e).flow(net)?;
    }

    let next = NodeState {
        pressure: state.pressure + dt * alpha * (inflow - outflow),
        temperature: state.temperature - dt / capacity * (advection - gain),
    };
    for (quantity, value) in [("pressure", next.pressure), ("temperature", next.temperature)] {
        if !value.is_finite() {
            return Err(SimError::NonFinite {
                object: net.node_name(node).to_string(),
                quantity,
                value,
            });
        }
    }
    Ok(next)
}

/// Compute phase visiting nodes in `order`; results are indexed by node.
///
/// Nodes missing from `order` keep their current state.
pub fn compute_next_states_in_order(
    net: &Network,
    order: &[NodeId],
    dt: Real,
) -> SimResult<Vec<NodeState>> {
    let mut next = net.node_states().to_vec();
    for &node in order {
        next[node.idx()] = compute_next_state(net, node, dt)?;
    }
    Ok(next)
}

/// Drives a network forward with fixed steps.
#[derive(Clone, Copy, Debug)]
pub struct Integrator {
    opts: StepOptions,
}

impl Integrator {
    pub fn new(opts: StepOptions) -> SimResult<Self> {
        if !(opts.dt_hours.is_finite() && opts.dt_hours > 0.0) {
            return Err(SimError::InvalidArg {
                what: "dt_hours must be positive",
            });
        }
        Ok(Self { opts })
    }

    pub fn options(&self) -> StepOptions {
        self.opts
    }

    /// Advance `net` by one step.
    pub fn step(&self, net: &mut Network) -> SimResult<()> {
        let dt = self.opts.dt_hours;

        let mut next = net.states.take_next();
        let computed = {
            let view: &Network = net;
            let fill = |(i, slot): (usize, &mut NodeState)| -> SimResult<()> {
                *slot = compute_next_state(view, NodeId::from_usize(i), dt)?;
                Ok(())
            };
            if self.opts.parallel {
                next.par_iter_mut().enumerate().try_for_each(fill)
            } else {
                next.iter_mut().enumerate().try_for_each(fill)
            }
        };
        if let Err(e) = computed {
            net.states.restore_next(next);
            return Err(e);
        }

        net.states.commit(next);
        net.time_hours += dt;
        post_step(net, dt)
    }
}

fn post_step(net: &mut Network, dt: Real) -> SimResult<()> {
    let time = net.time_hours;
    net.weather.advance_to(time);
    for load in &mut net.loads {
        load.advance_to(time);
    }

    let view: &Network = net;
    let next = view
        .controllers
        .iter()
        .map(|c| c.next_state(view, view.sensors(), time, dt))
        .collect::<Result<Vec<ControllerState>, _>>()?;
    for (ctrl, state) in net.controllers.iter_mut().zip(next) {
        ctrl.commit(state);
    }
    Ok(())
}
