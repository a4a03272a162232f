//! Liquid-to-liquid heat exchangers.
//!
//! Both sides are [`PlantSide`](crate::side::PlantSide) elements. The cold
//! side gains exactly what the hot side loses.

use hn_core::{ElemId, Real};

use crate::chiller::side_states;
use crate::common::require_positive;
use crate::error::{ComponentError, ComponentResult};
use crate::hx::{FlowArrangement, effectiveness, lmtd};
use crate::traits::{EvalContext, ReportValue, SideRole};

/// Terminal temperature differences are floored here before the LMTD.
const MIN_TERMINAL_DT: Real = 1e-4;

/// Effectiveness-NTU exchanger with NTU fixed from design conditions.
#[derive(Clone, Debug, PartialEq)]
pub struct NtuExchanger {
    pub primary: ElemId,
    pub secondary: ElemId,
    /// Design duty [Btu/hr].
    pub nominal_capacity: Real,
    /// Design hot-in minus cold-out [°F].
    pub nominal_inlet_dt: Real,
    /// Design hot-out minus cold-in [°F].
    pub nominal_outlet_dt: Real,
    pub arrangement: FlowArrangement,
    /// Filled in by the link pass.
    pub nominal_ntu: Option<Real>,
}

/// Signed heat transfer for each side of an exchanger at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExchangerDuty {
    pub primary: Real,
    pub secondary: Real,
}

impl ExchangerDuty {
    pub fn for_role(&self, role: SideRole) -> Real {
        match role {
            SideRole::Secondary => self.secondary,
            _ => self.primary,
        }
    }

    /// Magnitude of heat moved from hot to cold side [Btu/hr].
    pub fn transferred(&self) -> Real {
        self.primary.abs()
    }
}

impl NtuExchanger {
    pub fn new(
        primary: ElemId,
        secondary: ElemId,
        nominal_capacity: Real,
        nominal_inlet_dt: Real,
        nominal_outlet_dt: Real,
        arrangement: FlowArrangement,
    ) -> ComponentResult<Self> {
        Ok(Self {
            primary,
            secondary,
            nominal_capacity: require_positive(
                nominal_capacity,
                "exchanger capacity must be positive",
            )?,
            nominal_inlet_dt: require_positive(
                nominal_inlet_dt,
                "exchanger inlet DT must be positive",
            )?,
            nominal_outlet_dt: require_positive(
                nominal_outlet_dt,
                "exchanger outlet DT must be positive",
            )?,
            arrangement,
            nominal_ntu: None,
        })
    }

    /// Fix NTU from design duty, design terminal differences and the
    /// smaller of the two design capacity rates.
    pub fn compute_nominal_ntu(
        &mut self,
        primary_rate: Real,
        secondary_rate: Real,
    ) -> ComponentResult<Real> {
        let c_min = primary_rate.min(secondary_rate);
        let ntu =
            self.nominal_capacity / (c_min * lmtd(self.nominal_inlet_dt, self.nominal_outlet_dt));
        if !(ntu.is_finite() && ntu > 0.0) {
            return Err(ComponentError::InvalidArg {
                what: "exchanger design point gives no positive NTU",
            });
        }
        self.nominal_ntu = Some(ntu);
        Ok(ntu)
    }

    pub fn duty(&self, ctx: &dyn EvalContext) -> ComponentResult<ExchangerDuty> {
        let ntu = self.nominal_ntu.ok_or(ComponentError::InvalidArg {
            what: "exchanger used before the link pass",
        })?;
        let rate = ctx.fluid().capacity_rate_per_gpm();
        let c1 = rate * ctx.element(self.primary).flow(ctx)?;
        let c2 = rate * ctx.element(self.secondary).flow(ctx)?;
        let t1 = side_states(ctx, self.primary).0.temperature;
        let t2 = side_states(ctx, self.secondary).0.temperature;

        let c_min = c1.min(c2);
        let c_max = c1.max(c2);
        if c_min <= 0.0 || c_max <= 0.0 {
            return Ok(ExchangerDuty {
                primary: 0.0,
                secondary: 0.0,
            });
        }

        let eps = effectiveness(ntu, c_min / c_max, self.arrangement);
        let q = eps * c_min * (t1.max(t2) - t1.min(t2));
        // Ties go to the secondary side as cold; the duty is zero then anyway.
        let primary_is_cold = t1 < t2;
        Ok(if primary_is_cold {
            ExchangerDuty {
                primary: q,
                secondary: -q,
            }
        } else {
            ExchangerDuty {
                primary: -q,
                secondary: q,
            }
        })
    }

    pub fn report(&self, ctx: &dyn EvalContext) -> ComponentResult<Vec<ReportValue>> {
        let duty = self.duty(ctx)?;
        Ok(vec![
            ReportValue::new("NTU", "", self.nominal_ntu.unwrap_or(0.0)),
            ReportValue::new("Heat Transfer", "Btu/hr", duty.transferred()),
        ])
    }
}

/// UA/LMTD exchanger with flow-fraction corrected UA.
///
/// ```text
/// fixed = c1 / (c2·max(1, ffh − c3)² + c2·max(1, ffc − c3)²)
/// UA    = UAn / (fixed + c4/ffh^c5 + c4/ffc^c6)
/// ```
///
/// `primary` is the cold side, `secondary` the hot side.
#[derive(Clone, Debug, PartialEq)]
pub struct UaExchanger {
    pub cold: ElemId,
    pub hot: ElemId,
    /// Design UA [Btu/(hr·°F)].
    pub nominal_ua: Real,
    pub coefficients: [Real; 6],
    /// Design flows of cold and hot side, filled in by the link pass [GPM].
    pub nominal_flows: Option<(Real, Real)>,
}

impl UaExchanger {
    pub fn new(
        cold: ElemId,
        hot: ElemId,
        nominal_ua: Real,
        coefficients: [Real; 6],
    ) -> ComponentResult<Self> {
        if coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ComponentError::InvalidArg {
                what: "exchanger coefficients must be finite",
            });
        }
        Ok(Self {
            cold,
            hot,
            nominal_ua: require_positive(nominal_ua, "exchanger UA must be positive")?,
            coefficients,
            nominal_flows: None,
        })
    }

    /// Corrected UA for the given hot and cold flow fractions.
    pub fn ua(&self, hot_ff: Real, cold_ff: Real) -> Real {
        if hot_ff <= 0.0 || cold_ff <= 0.0 {
            return 0.0;
        }
        let [c1, c2, c3, c4, c5, c6] = self.coefficients;
        let fixed = c1
            / (c2 * (hot_ff - c3).max(1.0).powi(2) + c2 * (cold_ff - c3).max(1.0).powi(2));
        self.nominal_ua / (fixed + c4 / hot_ff.powf(c5) + c4 / cold_ff.powf(c6))
    }

    fn ua_and_lmtd(&self, ctx: &dyn EvalContext) -> ComponentResult<(Real, Real)> {
        let (cold_n, hot_n) = self.nominal_flows.ok_or(ComponentError::InvalidArg {
            what: "exchanger used before the link pass",
        })?;
        let cold_ff = ctx.element(self.cold).flow(ctx)? / cold_n;
        let hot_ff = ctx.element(self.hot).flow(ctx)? / hot_n;

        let (cold_in, cold_out) = side_states(ctx, self.cold);
        let (hot_in, hot_out) = side_states(ctx, self.hot);
        let dt_a = (hot_in.temperature - cold_out.temperature).max(MIN_TERMINAL_DT);
        let dt_b = (hot_out.temperature - cold_in.temperature).max(MIN_TERMINAL_DT);

        Ok((self.ua(hot_ff, cold_ff), lmtd(dt_a, dt_b)))
    }

    pub fn duty(&self, ctx: &dyn EvalContext) -> ComponentResult<ExchangerDuty> {
        let (ua, lmtd) = self.ua_and_lmtd(ctx)?;
        let q = ua * lmtd;
        Ok(ExchangerDuty {
            primary: q,
            secondary: -q,
        })
    }

    pub fn report(&self, ctx: &dyn EvalContext) -> ComponentResult<Vec<ReportValue>> {
        let (ua, lmtd) = self.ua_and_lmtd(ctx)?;
        Ok(vec![
            ReportValue::new("UA", "Btu/hr-F", ua),
            ReportValue::new("LMTD", "F", lmtd),
            ReportValue::new("Heat Transfer", "Btu/hr", ua * lmtd),
        ])
    }
}
