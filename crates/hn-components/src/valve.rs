//! Modulating valve ports.

use hn_core::{CtrlId, Real, signum_or_zero};
use serde::{Deserialize, Serialize};

use crate::common::{clamp_unit, require_positive};
use crate::error::ComponentResult;
use crate::traits::{ElementModel, EvalContext, PortStates, ReportValue};

/// Which path of a (possibly three-way) valve this element models.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValvePort {
    /// Opens with the controller signal.
    #[default]
    A,
    /// Closes as the controller signal rises.
    B,
}

/// Linear-characteristic valve: `Q = sign(ΔP) · pos · K · |ΔP|^(1/k)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Valve {
    /// Flow coefficient `K = Qn / ΔPn^(1/k)`, fixed at construction.
    pub coefficient: Real,
    pub exponent: Real,
    pub port: ValvePort,
    pub controller: CtrlId,
}

impl Valve {
    pub fn new(
        nominal_flow: Real,
        nominal_dp: Real,
        exponent: Real,
        port: ValvePort,
        controller: CtrlId,
    ) -> ComponentResult<Self> {
        let nominal_flow = require_positive(nominal_flow, "valve nominal flow must be positive")?;
        let nominal_dp =
            require_positive(nominal_dp, "valve nominal pressure drop must be positive")?;
        let exponent = require_positive(exponent, "valve pressure exponent must be positive")?;
        Ok(Self {
            coefficient: nominal_flow / nominal_dp.powf(1.0 / exponent),
            exponent,
            port,
            controller,
        })
    }

    /// Current opening of this port in [0, 1].
    pub fn position(&self, ctx: &dyn EvalContext) -> Real {
        let signal = clamp_unit(ctx.controller_output(self.controller));
        match self.port {
            ValvePort::A => signal,
            ValvePort::B => 1.0 - signal,
        }
    }

    fn flow_at(&self, position: Real, dp: Real) -> Real {
        signum_or_zero(dp) * position * self.coefficient * dp.abs().powf(1.0 / self.exponent)
    }
}

impl ElementModel for Valve {
    fn flow(&self, ctx: &dyn EvalContext, ports: &PortStates<'_>) -> ComponentResult<Real> {
        Ok(self.flow_at(self.position(ctx), ports.pressure_drop()))
    }

    fn default_volume(&self) -> Real {
        std::f64::consts::PI * 3.0
    }

    fn report(
        &self,
        ctx: &dyn EvalContext,
        ports: &PortStates<'_>,
        out: &mut Vec<ReportValue>,
    ) -> ComponentResult<()> {
        out.push(ReportValue::new("Flow", "GPM", self.flow(ctx, ports)?));
        out.push(ReportValue::new("Pressure Drop", "ft", ports.pressure_drop()));
        out.push(ReportValue::new("Position", "", self.position(ctx)));
        Ok(())
    }
}
