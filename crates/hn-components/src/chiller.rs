//! Chiller models.
//!
//! A chiller is not an element: it owns no nodes and carries no flow. Its
//! evaporator and condenser are [`PlantSide`](crate::side::PlantSide)
//! elements that ask the chiller for their heat gain through the
//! association table.

use hn_core::{
    CtrlId, ElemId, Real, btuh_to_kw, btuh_to_tons, fahrenheit_to_kelvin, kw_per_ton_to_eir,
    kw_to_btuh, tons_to_btuh,
};

use crate::common::require_positive;
use crate::curves::Curve;
use crate::error::{ComponentError, ComponentResult};
use crate::traits::{EvalContext, NodeState, ReportValue};

/// Assumed design condenser split used to estimate entering condenser
/// temperature at part load [°F].
const DESIGN_CONDENSER_RANGE: Real = 10.0;

/// Inlet and outlet node states of a side element.
pub(crate) fn side_states(ctx: &dyn EvalContext, elem: ElemId) -> (NodeState, NodeState) {
    let e = ctx.element(elem);
    (ctx.node(e.inlet), ctx.node(e.outlet))
}

/// Evaporator and condenser heats plus electric input of one chiller.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChillerDuty {
    /// Heat added to chilled water, ≤ 0 [Btu/hr].
    pub evaporator: Real,
    /// Heat added to condenser water [Btu/hr].
    pub condenser: Real,
    /// Electric input [kW].
    pub power: Real,
    /// Capacity available at current temperatures [Btu/hr].
    pub capacity: Real,
}

impl ChillerDuty {
    pub fn part_load_ratio(&self) -> Real {
        if self.capacity > 0.0 {
            -self.evaporator / self.capacity
        } else {
            0.0
        }
    }

    /// Operating efficiency [kW/ton], zero when idle.
    pub fn kw_per_ton(&self) -> Real {
        if self.evaporator == 0.0 {
            0.0
        } else {
            self.power / btuh_to_tons(-self.evaporator)
        }
    }
}

/// Performance-curve chiller.
///
/// - capacity = nominal × capFT(CHWS, ECT)
/// - EIR = nominal EIR × eirFT(CHWS, ECT′) × eirFPLR(PLR, ECT′ − CHWS)
///
/// where ECT′ corrects entering condenser temperature to the design split.
#[derive(Clone, Debug, PartialEq)]
pub struct CurveChiller {
    pub evaporator: ElemId,
    pub condenser: ElemId,
    pub nominal_tons: Real,
    /// Full-load efficiency at design [kW/ton].
    pub nominal_kw_per_ton: Real,
    pub cap_ft: Curve,
    pub eir_ft: Curve,
    pub eir_fplr: Curve,
    pub controller: CtrlId,
}

impl CurveChiller {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        evaporator: ElemId,
        condenser: ElemId,
        nominal_tons: Real,
        nominal_kw_per_ton: Real,
        cap_ft: Curve,
        eir_ft: Curve,
        eir_fplr: Curve,
        controller: CtrlId,
    ) -> ComponentResult<Self> {
        Ok(Self {
            evaporator,
            condenser,
            nominal_tons: require_positive(nominal_tons, "chiller capacity must be positive")?,
            nominal_kw_per_ton: require_positive(
                nominal_kw_per_ton,
                "chiller efficiency must be positive",
            )?,
            cap_ft,
            eir_ft,
            eir_fplr,
            controller,
        })
    }

    pub fn duty(&self, ctx: &dyn EvalContext) -> ChillerDuty {
        let (_, evap_out) = side_states(ctx, self.evaporator);
        let (cond_in, cond_out) = side_states(ctx, self.condenser);
        let chws = evap_out.temperature;

        let capacity =
            self.cap_ft.eval2(chws, cond_in.temperature) * tons_to_btuh(self.nominal_tons);
        let evaporator = -ctx.controller_output(self.controller) * capacity;
        let plr = if capacity != 0.0 { -evaporator / capacity } else { 0.0 };

        let ect = cond_in.temperature
            + (DESIGN_CONDENSER_RANGE - (cond_out.temperature - cond_in.temperature));
        let lift = ect - chws;

        let power = if evaporator == 0.0 {
            0.0
        } else {
            btuh_to_kw(
                capacity
                    * self.eir_ft.eval2(chws, ect)
                    * self.eir_fplr.eval2(plr, lift)
                    * kw_per_ton_to_eir(self.nominal_kw_per_ton),
            )
        };

        ChillerDuty {
            evaporator,
            condenser: -evaporator + kw_to_btuh(power),
            power,
            capacity,
        }
    }
}

/// Three-coefficient thermodynamic (Gordon-Ng style) chiller.
///
/// With load `L` [kW], CHWS and LCT in kelvin:
///
/// ```text
/// P = L · (LCT · (1 + c1·CHWS/L + c2·(LCT − CHWS)/LCT/L) + c3·L − CHWS) / (CHWS − c3·L)
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ParametricChiller {
    pub evaporator: ElemId,
    pub condenser: ElemId,
    /// Capacity at full signal [Btu/hr].
    pub nominal_capacity: Real,
    pub c1: Real,
    pub c2: Real,
    pub c3: Real,
    pub controller: CtrlId,
}

impl ParametricChiller {
    pub fn new(
        evaporator: ElemId,
        condenser: ElemId,
        nominal_capacity: Real,
        coefficients: [Real; 3],
        controller: CtrlId,
    ) -> ComponentResult<Self> {
        if coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ComponentError::InvalidArg {
                what: "chiller coefficients must be finite",
            });
        }
        let [c1, c2, c3] = coefficients;
        Ok(Self {
            evaporator,
            condenser,
            nominal_capacity: require_positive(
                nominal_capacity,
                "chiller capacity must be positive",
            )?,
            c1,
            c2,
            c3,
            controller,
        })
    }

    pub fn duty(&self, ctx: &dyn EvalContext) -> ChillerDuty {
        let (_, evap_out) = side_states(ctx, self.evaporator);
        let (_, cond_out) = side_states(ctx, self.condenser);

        let evaporator = -ctx.controller_output(self.controller) * self.nominal_capacity;
        let load = btuh_to_kw(-evaporator);
        let power = if load == 0.0 {
            0.0
        } else {
            let chw = fahrenheit_to_kelvin(evap_out.temperature);
            let lct = fahrenheit_to_kelvin(cond_out.temperature);
            load * (lct * (1.0 + self.c1 * chw / load + self.c2 * (lct - chw) / lct / load)
                + self.c3 * load
                - chw)
                / (chw - self.c3 * load)
        };

        ChillerDuty {
            evaporator,
            condenser: -evaporator + kw_to_btuh(power),
            power,
            capacity: self.nominal_capacity,
        }
    }
}

pub(crate) fn chiller_report(
    ctx: &dyn EvalContext,
    evaporator: ElemId,
    condenser: ElemId,
    duty: &ChillerDuty,
) -> ComponentResult<Vec<ReportValue>> {
    let (evap_in, evap_out) = side_states(ctx, evaporator);
    let (cond_in, cond_out) = side_states(ctx, condenser);
    Ok(vec![
        ReportValue::new("Evaporator Flow", "GPM", ctx.element(evaporator).flow(ctx)?),
        ReportValue::new("CHWS Temperature", "F", evap_out.temperature),
        ReportValue::new("CHWR Temperature", "F", evap_in.temperature),
        ReportValue::new("Condenser Inlet Temperature", "F", cond_in.temperature),
        ReportValue::new("Condenser Outlet Temperature", "F", cond_out.temperature),
        ReportValue::new("Load", "tons", btuh_to_tons(-duty.evaporator)),
        ReportValue::new("Part Load Ratio", "", duty.part_load_ratio()),
        ReportValue::new("Efficiency", "kW/ton", duty.kw_per_ton()),
        ReportValue::new("Power", "kW", duty.power),
    ])
}
