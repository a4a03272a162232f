//! Load-serving coils.

use hn_core::{LoadId, Real, btuh_to_kw, fahrenheit_to_celsius};

use crate::common::require_positive;
use crate::error::{ComponentError, ComponentResult};
use crate::flow_law::PowerLaw;
use crate::traits::{ElementModel, EvalContext, PortStates, ReportValue};

/// Pressure-driven coil that picks up its building load.
#[derive(Clone, Debug, PartialEq)]
pub struct Coil {
    pub law: PowerLaw,
    /// Design load [Btu/hr], used by flow-setpoint sensors.
    pub nominal_capacity: Real,
    pub load: LoadId,
}

impl Coil {
    pub fn new(law: PowerLaw, nominal_capacity: Real, load: LoadId) -> ComponentResult<Self> {
        Ok(Self {
            law,
            nominal_capacity: require_positive(
                nominal_capacity,
                "coil nominal capacity must be positive",
            )?,
            load,
        })
    }

    /// Load picked up by the water, never negative [Btu/hr].
    pub fn load_picked_up(&self, ctx: &dyn EvalContext) -> Real {
        ctx.load(self.load).total_load().max(0.0)
    }
}

impl ElementModel for Coil {
    fn flow(&self, _ctx: &dyn EvalContext, ports: &PortStates<'_>) -> ComponentResult<Real> {
        Ok(self.law.flow(ports.pressure_drop()))
    }

    fn heat_gain(&self, ctx: &dyn EvalContext, _ports: &PortStates<'_>) -> ComponentResult<Real> {
        Ok(self.load_picked_up(ctx))
    }

    fn default_volume(&self) -> Real {
        5.0
    }

    fn report(
        &self,
        ctx: &dyn EvalContext,
        ports: &PortStates<'_>,
        out: &mut Vec<ReportValue>,
    ) -> ComponentResult<()> {
        out.push(ReportValue::new("Load", "Btu/hr", self.load_picked_up(ctx)));
        out.push(ReportValue::new("Flow", "GPM", self.flow(ctx, ports)?));
        out.push(ReportValue::new("Pressure Drop", "ft", ports.pressure_drop()));
        out.push(ReportValue::new("Inlet Temperature", "F", ports.inlet.temperature));
        out.push(ReportValue::new("Outlet Temperature", "F", ports.outlet.temperature));
        Ok(())
    }
}

/// Coil whose flow is imposed by a fitted valve-control correlation:
///
/// ```text
/// Q [m³/s] = exp(c1 + c2·ln(load_kW)² + c3·exp(c4·Tw_C))
/// ```
///
/// converted to GPM. No load means no flow.
#[derive(Clone, Debug, PartialEq)]
pub struct LoadCoil {
    pub coefficients: [Real; 4],
    pub load: LoadId,
}

// Correlation output to GPM.
const FLOW_SCALE: Real = 4.403 * 3600.0;

impl LoadCoil {
    pub fn new(coefficients: [Real; 4], load: LoadId) -> ComponentResult<Self> {
        if coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ComponentError::InvalidArg {
                what: "load coil coefficients must be finite",
            });
        }
        Ok(Self { coefficients, load })
    }

    fn flow_at(&self, load_btuh: Real, water_temp: Real) -> Real {
        let load_kw = btuh_to_kw(load_btuh);
        if load_kw <= 0.0 {
            return 0.0;
        }
        let [c1, c2, c3, c4] = self.coefficients;
        let tw = fahrenheit_to_celsius(water_temp);
        (c1 + c2 * load_kw.ln().powi(2) + c3 * (c4 * tw).exp()).exp() * FLOW_SCALE
    }
}

impl ElementModel for LoadCoil {
    fn flow(&self, ctx: &dyn EvalContext, ports: &PortStates<'_>) -> ComponentResult<Real> {
        Ok(self.flow_at(ctx.load(self.load).total_load(), ports.inlet.temperature))
    }

    fn heat_gain(&self, ctx: &dyn EvalContext, _ports: &PortStates<'_>) -> ComponentResult<Real> {
        Ok(ctx.load(self.load).total_load())
    }

    fn default_volume(&self) -> Real {
        10.0
    }

    fn report(
        &self,
        ctx: &dyn EvalContext,
        ports: &PortStates<'_>,
        out: &mut Vec<ReportValue>,
    ) -> ComponentResult<()> {
        out.push(ReportValue::new("Flow", "GPM", self.flow(ctx, ports)?));
        out.push(ReportValue::new("Pressure Drop", "ft", ports.pressure_drop()));
        out.push(ReportValue::new("Inlet Temperature", "F", ports.inlet.temperature));
        out.push(ReportValue::new("Outlet Temperature", "F", ports.outlet.temperature));
        out.push(ReportValue::new("Load", "Btu/hr", self.heat_gain(ctx, ports)?));
        Ok(())
    }
}
