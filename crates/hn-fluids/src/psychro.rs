//! Moist-air psychrometrics in IP units.
//!
//! Temperatures in °F, pressures in psia, humidity ratio in lb_w/lb_da,
//! enthalpy in Btu/lb_da. Saturation pressure follows the ASHRAE
//! Fundamentals correlations over ice (below 32 °F) and over liquid water.

use hn_core::Real;

use crate::error::{FluidError, FluidResult};

/// Standard atmospheric pressure at sea level [psia].
pub const STANDARD_PRESSURE_PSIA: Real = 14.696;

const RANKINE_OFFSET: Real = 459.67;
const MW_RATIO: Real = 0.621945;

// Over ice, -148 °F to 32 °F.
const C1: Real = -1.0214165e4;
const C2: Real = -4.8932428;
const C3: Real = -5.3765794e-3;
const C4: Real = 1.9202377e-7;
const C5: Real = 3.5575832e-10;
const C6: Real = -9.0344688e-14;
const C7: Real = 4.1635019;

// Over liquid water, 32 °F to 392 °F.
const C8: Real = -1.0440397e4;
const C9: Real = -1.1294650e1;
const C10: Real = -2.7022355e-2;
const C11: Real = 1.2890360e-5;
const C12: Real = -2.4780681e-9;
const C13: Real = 6.5459673;

/// Saturation vapour pressure [psia] at `t` °F.
pub fn saturation_pressure(t: Real) -> FluidResult<Real> {
    if !(-148.0..=392.0).contains(&t) {
        return Err(FluidError::OutOfRange {
            what: "saturation temperature",
            value: t,
        });
    }
    let tr = t + RANKINE_OFFSET;
    let ln_p = if t < 32.0 {
        C1 / tr + C2 + C3 * tr + C4 * tr.powi(2) + C5 * tr.powi(3) + C6 * tr.powi(4) + C7 * tr.ln()
    } else {
        C8 / tr + C9 + C10 * tr + C11 * tr.powi(2) + C12 * tr.powi(3) + C13 * tr.ln()
    };
    Ok(ln_p.exp())
}

/// Humidity ratio of saturated air at `t` °F and total pressure `p`.
pub fn saturation_humidity_ratio(t: Real, p: Real) -> FluidResult<Real> {
    let pws = saturation_pressure(t)?;
    if pws >= p {
        return Err(FluidError::OutOfRange {
            what: "saturation pressure above total pressure",
            value: pws,
        });
    }
    Ok(MW_RATIO * pws / (p - pws))
}

/// Humidity ratio from dry-bulb and wet-bulb temperatures.
pub fn humidity_ratio_from_wetbulb(drybulb: Real, wetbulb: Real, p: Real) -> FluidResult<Real> {
    if wetbulb > drybulb + 1e-9 {
        return Err(FluidError::NonPhysical {
            what: "wet bulb above dry bulb",
            value: wetbulb,
        });
    }
    let ws_star = saturation_humidity_ratio(wetbulb, p)?;
    let w = if wetbulb >= 32.0 {
        ((1093.0 - 0.556 * wetbulb) * ws_star - 0.240 * (drybulb - wetbulb))
            / (1093.0 + 0.444 * drybulb - wetbulb)
    } else {
        ((1220.0 - 0.04 * wetbulb) * ws_star - 0.240 * (drybulb - wetbulb))
            / (1220.0 + 0.444 * drybulb - 0.48 * wetbulb)
    };
    Ok(w.max(0.0))
}

/// Moist-air enthalpy [Btu/lb_da].
pub fn enthalpy(drybulb: Real, humidity_ratio: Real) -> Real {
    0.240 * drybulb + humidity_ratio * (1061.0 + 0.444 * drybulb)
}

/// Moist-air enthalpy from dry-bulb and wet-bulb temperatures.
pub fn enthalpy_from_wetbulb(drybulb: Real, wetbulb: Real, p: Real) -> FluidResult<Real> {
    let w = humidity_ratio_from_wetbulb(drybulb, wetbulb, p)?;
    Ok(enthalpy(drybulb, w))
}

/// Enthalpy of saturated air at `t` °F.
pub fn saturated_enthalpy(t: Real, p: Real) -> FluidResult<Real> {
    enthalpy_from_wetbulb(t, t, p)
}
