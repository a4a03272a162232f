//! Simple heat sources and sinks.

use hn_core::{CtrlId, Real};

use crate::common::{check_finite, require_non_negative};
use crate::error::ComponentResult;
use crate::flow_law::PowerLaw;
use crate::traits::{ElementModel, EvalContext, PortStates, ReportValue};

/// Removes a controller-scaled fraction of its nominal duty,
/// `Qn · ΔTn` at design capacity rate.
#[derive(Clone, Debug, PartialEq)]
pub struct HeatSink {
    pub law: PowerLaw,
    /// Design temperature drop [°F].
    pub nominal_dt: Real,
    pub controller: CtrlId,
}

impl HeatSink {
    pub fn new(law: PowerLaw, nominal_dt: Real, controller: CtrlId) -> ComponentResult<Self> {
        Ok(Self {
            law,
            nominal_dt: require_non_negative(nominal_dt, "sink nominal dT must be non-negative")?,
            controller,
        })
    }

    fn nominal_removal(&self, ctx: &dyn EvalContext) -> Real {
        ctx.fluid().capacity_rate_per_gpm() * self.law.nominal_flow * self.nominal_dt
    }
}

impl ElementModel for HeatSink {
    fn flow(&self, _ctx: &dyn EvalContext, ports: &PortStates<'_>) -> ComponentResult<Real> {
        Ok(self.law.flow(ports.pressure_drop()))
    }

    fn heat_gain(&self, ctx: &dyn EvalContext, _ports: &PortStates<'_>) -> ComponentResult<Real> {
        Ok(-ctx.controller_output(self.controller) * self.nominal_removal(ctx))
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
        out.push(ReportValue::new("Heat Removed", "Btu/hr", -self.heat_gain(ctx, ports)?));
        Ok(())
    }
}

/// Constant flow with a constant heat gain, independent of node state.
///
/// Useful as a boundary device and for exercising the integrator.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedFlow {
    pub flow: Real,
    pub heat_gain: Real,
}

impl FixedFlow {
    pub fn new(flow: Real, heat_gain: Real) -> ComponentResult<Self> {
        Ok(Self {
            flow: check_finite(flow, "fixed flow")?,
            heat_gain: check_finite(heat_gain, "fixed heat gain")?,
        })
    }
}

impl ElementModel for FixedFlow {
    fn flow(&self, _ctx: &dyn EvalContext, _ports: &PortStates<'_>) -> ComponentResult<Real> {
        Ok(self.flow)
    }

    fn heat_gain(&self, _ctx: &dyn EvalContext, _ports: &PortStates<'_>) -> ComponentResult<Real> {
        Ok(self.heat_gain)
    }

    fn default_volume(&self) -> Real {
        1.0
    }
}
