//! Pipe segment with optional heat exchange to its surroundings.

use hn_core::Real;

use crate::common::require_non_negative;
use crate::error::ComponentResult;
use crate::flow_law::PowerLaw;
use crate::traits::{ElementModel, EvalContext, PortStates};

#[derive(Clone, Debug, PartialEq)]
pub struct Pipe {
    pub law: PowerLaw,
    /// Conductance to the environment [Btu/(hr·°F)].
    pub ua: Real,
    /// Surrounding temperature [°F].
    pub environment_temperature: Real,
}

impl Pipe {
    pub fn new(law: PowerLaw, ua: Real, environment_temperature: Real) -> ComponentResult<Self> {
        Ok(Self {
            law,
            ua: require_non_negative(ua, "pipe UA must not be negative")?,
            environment_temperature,
        })
    }

    /// Adiabatic pipe.
    pub fn adiabatic(law: PowerLaw) -> Self {
        Self {
            law,
            ua: 0.0,
            environment_temperature: 0.0,
        }
    }
}

impl ElementModel for Pipe {
    fn flow(&self, _ctx: &dyn EvalContext, ports: &PortStates<'_>) -> ComponentResult<Real> {
        Ok(self.law.flow(ports.pressure_drop()))
    }

    fn heat_gain(&self, _ctx: &dyn EvalContext, ports: &PortStates<'_>) -> ComponentResult<Real> {
        let average = 0.5 * (ports.inlet.temperature + ports.outlet.temperature);
        Ok(self.ua * (self.environment_temperature - average))
    }

    fn default_volume(&self) -> Real {
        std::f64::consts::PI * 50.0
    }
}
