//! Variable-speed pumps.
//!
//! Two models are available:
//! - [`CurvePump`]: a normalized quadratic head curve inverted in closed form,
//!   with affinity-law speed scaling and a shutoff-head guard
//! - [`EmpiricalPump`]: a fitted power-law head curve with a quadratic
//!   efficiency curve
//!
//! Both read pump speed (0..1) from their controller.

use hn_core::{CtrlId, GPM_FT_PER_WHP, KW_PER_HP, Real, kw_to_btuh};

use crate::common::require_positive;
use crate::error::{ComponentError, ComponentResult};
use crate::traits::{ElementModel, EvalContext, PortStates, ReportValue};

// Normalized head curve: H/Hn = C1 + C2·(Q/Qn) + C3·(Q/Qn)².
const C1: Real = 1.353_482_96;
const C2: Real = 0.015_931_7;
const C3: Real = -0.369_414_42;
// Normalized power curve: P/Pn = C4 + C5·(Q/Qn) + C6·(Q/Qn)².
const C4: Real = 0.369_773_92;
const C5: Real = 0.840_375_01;
const C6: Real = -0.210_148_81;

#[derive(Clone, Debug, PartialEq)]
pub struct CurvePump {
    /// Design flow [GPM].
    pub nominal_flow: Real,
    /// Design head [ft].
    pub nominal_head: Real,
    /// Pump (hydraulic) efficiency at design.
    pub nominal_efficiency: Real,
    pub motor_efficiency: Real,
    pub controller: CtrlId,
}

impl CurvePump {
    pub fn new(
        nominal_flow: Real,
        nominal_head: Real,
        nominal_efficiency: Real,
        motor_efficiency: Real,
        controller: CtrlId,
    ) -> ComponentResult<Self> {
        Ok(Self {
            nominal_flow: require_positive(nominal_flow, "pump nominal flow must be positive")?,
            nominal_head: require_positive(nominal_head, "pump nominal head must be positive")?,
            nominal_efficiency: require_positive(
                nominal_efficiency,
                "pump efficiency must be positive",
            )?,
            motor_efficiency: require_positive(
                motor_efficiency,
                "motor efficiency must be positive",
            )?,
            controller,
        })
    }

    /// Head at which flow stops for speed `s` [ft].
    pub fn shutoff_head(&self, speed: Real) -> Real {
        C1 * self.nominal_head * speed * speed
    }

    /// Flow the curve would deliver at full speed for the head ratio seen at
    /// speed `s`, i.e. the flow before affinity scaling [GPM].
    fn full_speed_flow(&self, gain: Real, speed: Real) -> ComponentResult<Real> {
        let head_ratio = gain / (self.nominal_head * speed * speed);
        let disc = C2 * C2 - 4.0 * C3 * (C1 - head_ratio);
        if disc < 0.0 {
            return Err(ComponentError::OutOfDomain {
                what: "pump curve has no real root at this head",
            });
        }
        Ok((-C2 - disc.sqrt()) / (2.0 * C3) * self.nominal_flow)
    }

    fn design_power(&self) -> Real {
        KW_PER_HP * self.nominal_flow * self.nominal_head
            / self.nominal_efficiency
            / self.motor_efficiency
            / GPM_FT_PER_WHP
    }

    fn flow_at(&self, gain: Real, speed: Real) -> ComponentResult<Real> {
        if speed <= 0.0 || gain >= self.shutoff_head(speed) {
            return Ok(0.0);
        }
        Ok(self.full_speed_flow(gain, speed)? * speed)
    }

    fn power_at(&self, gain: Real, speed: Real) -> ComponentResult<Real> {
        if self.flow_at(gain, speed)? == 0.0 {
            return Ok(0.0);
        }
        let r = self.full_speed_flow(gain, speed)? / self.nominal_flow;
        Ok((C4 + C5 * r + C6 * r * r) * self.design_power() * speed.powi(3))
    }
}

impl ElementModel for CurvePump {
    fn flow(&self, ctx: &dyn EvalContext, ports: &PortStates<'_>) -> ComponentResult<Real> {
        self.flow_at(ports.pressure_gain(), ctx.controller_output(self.controller))
    }

    /// Motor losses and shaft work end up in the water.
    fn heat_gain(&self, ctx: &dyn EvalContext, ports: &PortStates<'_>) -> ComponentResult<Real> {
        Ok(kw_to_btuh(self.electric_power(ctx, ports)? * self.motor_efficiency))
    }

    fn electric_power(
        &self,
        ctx: &dyn EvalContext,
        ports: &PortStates<'_>,
    ) -> ComponentResult<Real> {
        self.power_at(ports.pressure_gain(), ctx.controller_output(self.controller))
    }

    fn default_volume(&self) -> Real {
        25.0
    }

    fn report(
        &self,
        ctx: &dyn EvalContext,
        ports: &PortStates<'_>,
        out: &mut Vec<ReportValue>,
    ) -> ComponentResult<()> {
        let speed = ctx.controller_output(self.controller);
        out.push(ReportValue::new("Flow", "GPM", self.flow(ctx, ports)?));
        out.push(ReportValue::new("Pressure Gain", "ft", ports.pressure_gain()));
        out.push(ReportValue::new("Speed", "", speed));
        out.push(ReportValue::new("Power", "kW", self.electric_power(ctx, ports)?));
        out.push(ReportValue::new("Heat Gain", "Btu/hr", self.heat_gain(ctx, ports)?));
        out.push(ReportValue::new("Shutoff Head", "ft", self.shutoff_head(speed)));
        Ok(())
    }
}

/// Fitted pump model.
///
/// ```text
/// Q   = c5 · s · Qn · (1 − H / (c4 · Hn · s²))^(1/c6)
/// eff = c1 + c2·x + c3·x²,  x = Q / (c5 · s · Qn)
/// ```
///
/// Heat of compression is not added to the water.
#[derive(Clone, Debug, PartialEq)]
pub struct EmpiricalPump {
    pub nominal_flow: Real,
    pub nominal_head: Real,
    pub coefficients: [Real; 6],
    pub controller: CtrlId,
}

const WATER_HP_GPM_FT: Real = 3956.0;

impl EmpiricalPump {
    pub fn new(
        nominal_flow: Real,
        nominal_head: Real,
        coefficients: [Real; 6],
        controller: CtrlId,
    ) -> ComponentResult<Self> {
        if coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ComponentError::InvalidArg {
                what: "pump coefficients must be finite",
            });
        }
        require_positive(coefficients[3], "pump coefficient c4 must be positive")?;
        require_positive(coefficients[4], "pump coefficient c5 must be positive")?;
        require_positive(coefficients[5], "pump coefficient c6 must be positive")?;
        Ok(Self {
            nominal_flow: require_positive(nominal_flow, "pump nominal flow must be positive")?,
            nominal_head: require_positive(nominal_head, "pump nominal head must be positive")?,
            coefficients,
            controller,
        })
    }

    fn flow_at(&self, gain: Real, speed: Real) -> Real {
        let [_, _, _, c4, c5, c6] = self.coefficients;
        if speed <= 0.0 {
            return 0.0;
        }
        let base = 1.0 - gain / (c4 * self.nominal_head * speed * speed);
        if base <= 0.0 {
            return 0.0;
        }
        c5 * speed * self.nominal_flow * base.powf(1.0 / c6)
    }

    fn efficiency_at(&self, flow: Real, speed: Real) -> Real {
        let [c1, c2, c3, _, c5, _] = self.coefficients;
        let x = flow / c5 / speed / self.nominal_flow;
        c1 + c2 * x + c3 * x * x
    }
}

impl ElementModel for EmpiricalPump {
    fn flow(&self, ctx: &dyn EvalContext, ports: &PortStates<'_>) -> ComponentResult<Real> {
        Ok(self.flow_at(ports.pressure_gain(), ctx.controller_output(self.controller)))
    }

    fn electric_power(
        &self,
        ctx: &dyn EvalContext,
        ports: &PortStates<'_>,
    ) -> ComponentResult<Real> {
        let speed = ctx.controller_output(self.controller);
        let gain = ports.pressure_gain();
        let flow = self.flow_at(gain, speed);
        if flow == 0.0 {
            return Ok(0.0);
        }
        let eff = self.efficiency_at(flow, speed);
        if eff <= 0.0 {
            return Err(ComponentError::OutOfDomain {
                what: "pump efficiency curve is not positive at this flow",
            });
        }
        Ok(flow * gain / WATER_HP_GPM_FT / eff * KW_PER_HP)
    }

    fn default_volume(&self) -> Real {
        25.0
    }

    fn report(
        &self,
        ctx: &dyn EvalContext,
        ports: &PortStates<'_>,
        out: &mut Vec<ReportValue>,
    ) -> ComponentResult<()> {
        out.push(ReportValue::new("Flow", "GPM", self.flow(ctx, ports)?));
        out.push(ReportValue::new("Pressure Gain", "ft", ports.pressure_gain()));
        out.push(ReportValue::new("Speed", "", ctx.controller_output(self.controller)));
        out.push(ReportValue::new("Power", "kW", self.electric_power(ctx, ports)?));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hn_core::Id;

    fn pump() -> CurvePump {
        CurvePump::new(100.0, 50.0, 0.7, 0.9, Id::from_index(0)).unwrap()
    }

    #[test]
    fn zero_head_flow_is_curve_root() {
        let expected = (-C2 - (C2 * C2 - 4.0 * C3 * C1).sqrt()) / (2.0 * C3) * 100.0;
        let q = pump().flow_at(0.0, 1.0).unwrap();
        assert!((q - expected).abs() < 1e-9);
        assert!((q - 193.58).abs() < 0.01, "q = {q}");
    }

    #[test]
    fn shutoff_guard() {
        let p = pump();
        assert_eq!(p.flow_at(p.shutoff_head(1.0), 1.0).unwrap(), 0.0);
        assert_eq!(p.flow_at(p.shutoff_head(0.5) + 1.0, 0.5).unwrap(), 0.0);
        assert_eq!(p.power_at(100.0, 1.0).unwrap(), 0.0);
    }

    #[test]
    fn stopped_pump_has_no_flow() {
        assert_eq!(pump().flow_at(0.0, 0.0).unwrap(), 0.0);
        assert_eq!(pump().power_at(0.0, 0.0).unwrap(), 0.0);
    }

    #[test]
    fn design_point_is_near_nominal() {
        // The normalized curve passes close to (1, 1).
        let q = pump().flow_at(50.0, 1.0).unwrap();
        assert!((q / 100.0 - 1.0).abs() < 0.01, "q = {q}");
    }

    #[test]
    fn affinity_scaling() {
        let p = pump();
        let full = p.flow_at(40.0, 1.0).unwrap();
        let half = p.flow_at(10.0, 0.5).unwrap();
        assert!((half - 0.5 * full).abs() < 1e-9);

        let p_full = p.power_at(40.0, 1.0).unwrap();
        let p_half = p.power_at(10.0, 0.5).unwrap();
        assert!((p_half - p_full / 8.0).abs() < 1e-9);
    }

    #[test]
    fn empirical_pump_flow() {
        let pump = EmpiricalPump::new(
            100.0,
            50.0,
            [0.2, 1.0, -0.5, 1.2, 1.1, 2.0],
            Id::from_index(0),
        )
        .unwrap();
        assert!((pump.flow_at(0.0, 1.0) - 110.0).abs() < 1e-9);
        assert_eq!(pump.flow_at(60.0, 1.0), 0.0);
        assert_eq!(pump.flow_at(10.0, 0.0), 0.0);
        // x = 1 at zero head → eff = 0.7
        assert!((pump.efficiency_at(110.0, 1.0) - 0.7).abs() < 1e-12);
    }
}
