//! Elements whose heat comes from an associated plant.

use hn_core::Real;

use crate::error::{ComponentError, ComponentResult};
use crate::flow_law::PowerLaw;
use crate::traits::{ElementModel, EvalContext, PortStates};

/// Evaporator, condenser or exchanger side: power-law hydraulics, heat
/// gain delegated through the association table to the owning plant.
#[derive(Clone, Debug, PartialEq)]
pub struct PlantSide {
    pub law: PowerLaw,
    /// Volume used when none is configured [ft³].
    pub volume: Real,
}

impl PlantSide {
    pub fn chiller_barrel(law: PowerLaw) -> Self {
        Self {
            law,
            volume: 20.0 * std::f64::consts::PI * 3.0,
        }
    }

    pub fn exchanger(law: PowerLaw) -> Self {
        Self { law, volume: 10.0 }
    }

    /// Capacity rate at nominal flow [Btu/(hr·°F)].
    pub fn nominal_capacity_rate(&self, rate_per_gpm: Real) -> Real {
        rate_per_gpm * self.law.nominal_flow
    }
}

impl ElementModel for PlantSide {
    fn flow(&self, _ctx: &dyn EvalContext, ports: &PortStates<'_>) -> ComponentResult<Real> {
        Ok(self.law.flow(ports.pressure_drop()))
    }

    fn heat_gain(&self, ctx: &dyn EvalContext, ports: &PortStates<'_>) -> ComponentResult<Real> {
        let link = ctx
            .side_link(ports.elem)
            .ok_or_else(|| ComponentError::MissingLink {
                element: ports.name.to_string(),
            })?;
        ctx.plant(link.plant).side_heat(ctx, link.role)
    }

    fn default_volume(&self) -> Real {
        self.volume
    }
}
