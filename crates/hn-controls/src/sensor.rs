//! Sensors: named measurements of the network, read on demand.

use hn_components::EvalContext;
use hn_core::{ElemId, NodeId, Real, SensorId, btuh_to_tons};
use serde::{Deserialize, Serialize};

use crate::error::{ControlError, ControlResult};

/// Air-side control of the coil a flow setpoint is computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AirsideControl {
    /// Constant air volume.
    Cav,
    /// Variable air volume.
    Vav,
}

impl AirsideControl {
    /// Load-ratio curve coefficients `(c1, c2)`: `c1·LR + c2·LR²`.
    fn coefficients(self) -> (Real, Real) {
        match self {
            AirsideControl::Cav => (-0.091_549, 1.101_282_6),
            AirsideControl::Vav => (0.629_428, 0.355_645),
        }
    }
}

/// Setpoint reduction per °F of CHWST above design.
const CHWST_RESET_PER_DEG: Real = 0.05;

#[derive(Debug, Clone, PartialEq)]
pub enum SensorKind {
    NodeTemperature {
        node: NodeId,
    },
    NodePressure {
        node: NodeId,
    },
    /// `high − low` pressure [ft].
    DifferentialPressure {
        high: NodeId,
        low: NodeId,
    },
    Flow {
        element: ElemId,
    },
    /// Load through a flow path as a fraction of `full_scale_tons`.
    BtuMeter {
        flow: ElemId,
        inlet: NodeId,
        outlet: NodeId,
        full_scale_tons: Real,
    },
    /// Largest opening among a set of valves.
    MaxValvePosition {
        valves: Vec<ElemId>,
    },
    /// Chilled-water flow a coil should receive for its current load [GPM].
    CoilFlowSetpoint {
        coil: ElemId,
        airside: AirsideControl,
        /// Design chilled-water supply temperature [°F].
        nominal_chwst: Real,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sensor {
    pub id: SensorId,
    pub name: String,
    pub kind: SensorKind,
}

impl Sensor {
    pub fn new(id: SensorId, name: impl Into<String>, kind: SensorKind) -> ControlResult<Self> {
        if let SensorKind::BtuMeter {
            full_scale_tons, ..
        } = kind
        {
            if !(full_scale_tons.is_finite() && full_scale_tons > 0.0) {
                return Err(ControlError::InvalidArg {
                    what: "Btu meter full scale must be positive",
                });
            }
        }
        Ok(Self {
            id,
            name: name.into(),
            kind,
        })
    }

    /// Check that referenced elements have the kind this sensor needs.
    pub fn check_references(&self, ctx: &dyn EvalContext) -> ControlResult<()> {
        match &self.kind {
            SensorKind::MaxValvePosition { valves } => {
                for &v in valves {
                    let elem = ctx.element(v);
                    if elem.as_valve().is_none() {
                        return Err(ControlError::InvalidReference {
                            what: format!("sensor '{}': '{}' is not a valve", self.name, elem.name),
                        });
                    }
                }
            }
            SensorKind::CoilFlowSetpoint { coil, .. } => {
                let elem = ctx.element(*coil);
                if elem.as_coil().is_none() {
                    return Err(ControlError::InvalidReference {
                        what: format!("sensor '{}': '{}' is not a coil", self.name, elem.name),
                    });
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Current reading.
    pub fn read(&self, ctx: &dyn EvalContext) -> ControlResult<Real> {
        let value = match &self.kind {
            SensorKind::NodeTemperature { node } => ctx.node(*node).temperature,
            SensorKind::NodePressure { node } => ctx.node(*node).pressure,
            SensorKind::DifferentialPressure { high, low } => {
                ctx.node(*high).pressure - ctx.node(*low).pressure
            }
            SensorKind::Flow { element } => ctx.element(*element).flow(ctx)?,
            SensorKind::BtuMeter {
                flow,
                inlet,
                outlet,
                full_scale_tons,
            } => {
                let q = ctx.element(*flow).flow(ctx)?;
                let dt = ctx.node(*inlet).temperature - ctx.node(*outlet).temperature;
                btuh_to_tons(500.0 * q * dt) / full_scale_tons
            }
            SensorKind::MaxValvePosition { valves } => valves
                .iter()
                .filter_map(|&v| ctx.element(v).as_valve())
                .map(|valve| valve.position(ctx))
                .fold(0.0, Real::max),
            SensorKind::CoilFlowSetpoint {
                coil,
                airside,
                nominal_chwst,
            } => {
                let elem = ctx.element(*coil);
                let model = elem.as_coil().ok_or_else(|| ControlError::InvalidReference {
                    what: format!("sensor '{}': '{}' is not a coil", self.name, elem.name),
                })?;
                let load_ratio = ctx.load(model.load).total_load() / model.nominal_capacity;
                let dt = nominal_chwst - elem.inlet_temperature(ctx);
                let (c1, c2) = airside.coefficients();
                model.law.nominal_flow
                    * (c1 * load_ratio + c2 * load_ratio * load_ratio - dt * CHWST_RESET_PER_DEG)
            }
        };
        Ok(value)
    }
}

