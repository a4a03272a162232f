//! Cooling towers.
//!
//! Both models lift water through a static head before any flow occurs and
//! spend fan power proportional to the cube of the fan signal.

use hn_core::{BTUH_PER_KW, CtrlId, Real, fahrenheit_to_celsius};
use hn_fluids::psychro;

use crate::error::ComponentResult;
use crate::flow_law::{PowerLaw, lifted_flow};
use crate::hx::{FlowArrangement, effectiveness};
use crate::traits::{ElementModel, EvalContext, PortStates, ReportValue};

/// Tower hydraulics shared by both models.
#[derive(Clone, Debug, PartialEq)]
pub struct TowerHydraulics {
    /// Nominal flow against nominal friction head.
    pub friction: PowerLaw,
    /// Lift from basin to distribution header [ft].
    pub static_head: Real,
}

impl TowerHydraulics {
    pub fn flow(&self, dp: Real) -> Real {
        lifted_flow(&self.friction, self.static_head, dp)
    }
}

fn fan_power(design_fan_power: Real, signal: Real) -> Real {
    design_fan_power * signal.powi(3)
}

fn tower_report(
    model: &dyn ElementModel,
    ctx: &dyn EvalContext,
    ports: &PortStates<'_>,
    controller: CtrlId,
    out: &mut Vec<ReportValue>,
) -> ComponentResult<()> {
    out.push(ReportValue::new("Water Flow", "GPM", model.flow(ctx, ports)?));
    out.push(ReportValue::new("Inlet Water Temperature", "F", ports.inlet.temperature));
    out.push(ReportValue::new("Outlet Water Temperature", "F", ports.outlet.temperature));
    out.push(ReportValue::new(
        "Approach",
        "F",
        ports.outlet.temperature - ctx.weather().wetbulb(),
    ));
    out.push(ReportValue::new("Fan Signal", "", ctx.controller_output(controller)));
    out.push(ReportValue::new("Fan Power", "kW", model.electric_power(ctx, ports)?));
    Ok(())
}

/// Capacity-ratio tower: design duty scaled by approach, range and airflow
/// curves, normalized by the same curves at design conditions.
#[derive(Clone, Debug, PartialEq)]
pub struct CurveTower {
    pub hydraulics: TowerHydraulics,
    pub design_wetbulb: Real,
    pub design_approach: Real,
    pub design_range: Real,
    /// Airflow fraction delivered by natural draft with the fan off.
    pub fan_off_flow: Real,
    /// Fan power at full speed [kW].
    pub design_fan_power: Real,
    pub controller: CtrlId,
}

impl CurveTower {
    fn cap_f_approach_wetbulb(approach: Real, wb: Real) -> Real {
        0.500_613_93 + 0.005_882_51 * approach + 0.000_216_3 * approach * approach
            - 0.019_131_89 * wb
            + 0.000_223_6 * wb * wb
            + 0.001_061_08 * approach * wb
    }

    fn cap_f_range_wetbulb(range: Real, wb: Real) -> Real {
        0.083_523_59 + 0.112_472_73 * range - 0.001_358_47 * range * range
            + 0.000_034_17 * wb
            + 0.000_031_25 * wb * wb
            - 0.000_340_01 * range * wb
    }

    fn cap_f_airflow(airflow: Real) -> Real {
        0.049_768_25 + 1.046_697_62 * airflow - 0.096_468_16 * airflow * airflow
    }

    fn design_ratio(&self) -> Real {
        Self::cap_f_approach_wetbulb(self.design_approach, self.design_wetbulb)
            * Self::cap_f_range_wetbulb(self.design_range, self.design_wetbulb)
            * Self::cap_f_airflow(1.0)
    }
}

impl ElementModel for CurveTower {
    fn flow(&self, _ctx: &dyn EvalContext, ports: &PortStates<'_>) -> ComponentResult<Real> {
        Ok(self.hydraulics.flow(ports.pressure_drop()))
    }

    fn heat_gain(&self, ctx: &dyn EvalContext, ports: &PortStates<'_>) -> ComponentResult<Real> {
        let wb = ctx.weather().wetbulb();
        let approach = ports.outlet.temperature - wb;
        let range = ports.inlet.temperature - ports.outlet.temperature;
        let airflow = self.fan_off_flow.max(ctx.controller_output(self.controller));
        let design_capacity = ctx.fluid().capacity_rate_per_gpm()
            * self.hydraulics.friction.nominal_flow
            * self.design_range;
        let ratio = Self::cap_f_approach_wetbulb(approach, wb)
            * Self::cap_f_range_wetbulb(range, wb)
            * Self::cap_f_airflow(airflow);
        Ok(-ratio / self.design_ratio() * design_capacity)
    }

    fn electric_power(
        &self,
        ctx: &dyn EvalContext,
        _ports: &PortStates<'_>,
    ) -> ComponentResult<Real> {
        Ok(fan_power(self.design_fan_power, ctx.controller_output(self.controller)))
    }

    fn default_volume(&self) -> Real {
        20.0 * 20.0 * 10.0
    }

    fn report(
        &self,
        ctx: &dyn EvalContext,
        ports: &PortStates<'_>,
        out: &mut Vec<ReportValue>,
    ) -> ComponentResult<()> {
        tower_report(self, ctx, ports, self.controller, out)
    }
}

// Standard air density [lb/ft³].
const AIR_DENSITY: Real = 0.079_620_620_9;
// GPM → lb/min of water.
const WATER_LB_PER_GAL: Real = 0.133_681 * 62.2407;
const BTU_PER_LB_TO_KJ_PER_KG: Real = 2.326;
const LB_PER_HR_TO_KG_PER_S: Real = 0.000_125_998;
const WATER_CP_KJ: Real = 4.181;

/// Merkel-analogy tower: an effectiveness-NTU exchanger between an air
/// enthalpy stream and the water stream, with `NTU = c1 · C_air^c2 / max(1, Cmin)`.
#[derive(Clone, Debug, PartialEq)]
pub struct MerkelTower {
    pub hydraulics: TowerHydraulics,
    /// Airflow at full fan speed [CFM].
    pub nominal_airflow: Real,
    pub c1: Real,
    pub c2: Real,
    pub design_fan_power: Real,
    pub controller: CtrlId,
}

impl MerkelTower {
    /// Heat rejected [kW] for a given water flow and inlet temperature.
    fn rejection_kw(&self, ctx: &dyn EvalContext, flow: Real, t_in: Real) -> ComponentResult<Real> {
        let weather = ctx.weather();
        let cfm = ctx.controller_output(self.controller) * self.nominal_airflow;
        let h_sat = psychro::saturated_enthalpy(t_in, weather.pressure())?;

        let m_air = 60.0 * AIR_DENSITY * cfm * LB_PER_HR_TO_KG_PER_S;
        let m_water = WATER_LB_PER_GAL * 60.0 * flow * LB_PER_HR_TO_KG_PER_S;

        let c_air = m_air * (h_sat - weather.enthalpy()) * BTU_PER_LB_TO_KJ_PER_KG;
        let c_water = m_water
            * WATER_CP_KJ
            * (fahrenheit_to_celsius(t_in) - fahrenheit_to_celsius(weather.wetbulb()));
        let c_min = c_air.min(c_water);
        let c_max = c_air.max(c_water);
        if c_min <= 0.0 {
            return Ok(0.0);
        }

        let ntu = self.c1 * c_air.powf(self.c2) / c_min.max(1.0);
        let cr = (c_min / c_max).min(0.999);
        Ok(effectiveness(ntu, cr, FlowArrangement::CounterFlow) * c_min)
    }
}

impl ElementModel for MerkelTower {
    fn flow(&self, _ctx: &dyn EvalContext, ports: &PortStates<'_>) -> ComponentResult<Real> {
        Ok(self.hydraulics.flow(ports.pressure_drop()))
    }

    fn heat_gain(&self, ctx: &dyn EvalContext, ports: &PortStates<'_>) -> ComponentResult<Real> {
        let flow = self.flow(ctx, ports)?;
        Ok(-self.rejection_kw(ctx, flow, ports.inlet.temperature)? * BTUH_PER_KW)
    }

    fn electric_power(
        &self,
        ctx: &dyn EvalContext,
        _ports: &PortStates<'_>,
    ) -> ComponentResult<Real> {
        Ok(fan_power(self.design_fan_power, ctx.controller_output(self.controller)))
    }

    fn default_volume(&self) -> Real {
        20.0 * 20.0 * 10.0
    }

    fn report(
        &self,
        ctx: &dyn EvalContext,
        ports: &PortStates<'_>,
        out: &mut Vec<ReportValue>,
    ) -> ComponentResult<()> {
        tower_report(self, ctx, ports, self.controller, out)
    }
}
