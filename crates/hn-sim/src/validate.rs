//! Reference and state checks run once when a network is built.

use hn_controls::SensorKind;
use hn_core::Id;

use crate::error::{SimError, SimResult};
use crate::network::Network;

fn check_id(owner: &str, what: &str, id: Id, len: usize) -> SimResult<()> {
    if id.idx() < len {
        Ok(())
    } else {
        Err(SimError::InvalidReference {
            what: format!("'{owner}' refers to {what} #{} but only {len} exist", id.index()),
        })
    }
}

pub(crate) fn check_node_states(net: &Network) -> SimResult<()> {
    for (i, state) in net.node_states().iter().enumerate() {
        let name = net.node_name(Id::from_usize(i));
        let fields = [("pressure", state.pressure), ("temperature", state.temperature)];
        for (quantity, value) in fields {
            if !value.is_finite() {
                return Err(SimError::NonFinite {
                    object: name.to_string(),
                    quantity,
                    value,
                });
            }
        }
    }
    Ok(())
}

pub(crate) fn check_references(net: &Network) -> SimResult<()> {
    let nodes = net.node_count();
    let elements = net.elements().len();
    let controllers = net.controllers().len();
    let sensors = net.sensors().len();

    for elem in net.elements() {
        if let Some(c) = elem.controller() {
            check_id(&elem.name, "controller", c, controllers)?;
        }
        if let Some(l) = elem.load() {
            check_id(&elem.name, "load", l, net.load_count())?;
        }
    }
    for plant in net.plants() {
        if let Some(c) = plant.controller() {
            check_id(&plant.name, "controller", c, controllers)?;
        }
    }
    for sensor in net.sensors() {
        let owner = sensor.name.as_str();
        match &sensor.kind {
            SensorKind::NodeTemperature { node } | SensorKind::NodePressure { node } => {
                check_id(owner, "node", *node, nodes)?;
            }
            SensorKind::DifferentialPressure { high, low } => {
                check_id(owner, "node", *high, nodes)?;
                check_id(owner, "node", *low, nodes)?;
            }
            SensorKind::Flow { element } => check_id(owner, "element", *element, elements)?,
            SensorKind::BtuMeter {
                flow,
                inlet,
                outlet,
                ..
            } => {
                check_id(owner, "element", *flow, elements)?;
                check_id(owner, "node", *inlet, nodes)?;
                check_id(owner, "node", *outlet, nodes)?;
            }
            SensorKind::MaxValvePosition { valves } => {
                for v in valves {
                    check_id(owner, "element", *v, elements)?;
                }
            }
            SensorKind::CoilFlowSetpoint { coil, .. } => {
                check_id(owner, "element", *coil, elements)?;
            }
        }
    }
    for ctrl in net.controllers() {
        for s in ctrl.sensor_refs() {
            check_id(&ctrl.name, "sensor", s, sensors)?;
        }
    }
    Ok(())
}
