// hn-core/src/units.rs
//
// The network works in one fixed set of engineering units:
// flow [GPM], pressure [ft of head], temperature [°F], heat [Btu/hr],
// electric power [kW], time [hr]. Conversions to SI are only needed by
// the few correlations that were fitted in SI.

use uom::si::f64::ThermodynamicTemperature as UomTemperature;
use uom::si::thermodynamic_temperature::{degree_celsius, degree_fahrenheit, kelvin};

use crate::Real;

/// US gallons per cubic foot.
pub const GAL_PER_FT3: Real = 7.48052;
/// Minutes per hour.
pub const MIN_PER_HR: Real = 60.0;
/// Btu/hr per kW.
pub const BTUH_PER_KW: Real = 3412.14;
/// Btu/hr per ton of refrigeration.
pub const BTUH_PER_TON: Real = 12_000.0;
/// kW per horsepower.
pub const KW_PER_HP: Real = 0.7456;
/// GPM·ft of head per water horsepower.
pub const GPM_FT_PER_WHP: Real = 3960.0;

/// Btu/hr ↔ kW.
#[inline]
pub fn kw_to_btuh(kw: Real) -> Real {
    kw * BTUH_PER_KW
}

#[inline]
pub fn btuh_to_kw(btuh: Real) -> Real {
    btuh / BTUH_PER_KW
}

#[inline]
pub fn btuh_to_tons(btuh: Real) -> Real {
    btuh / BTUH_PER_TON
}

#[inline]
pub fn tons_to_btuh(tons: Real) -> Real {
    tons * BTUH_PER_TON
}

/// Convert a kW/ton efficiency rating into a dimensionless electric input ratio.
#[inline]
pub fn kw_per_ton_to_eir(kw_per_ton: Real) -> Real {
    kw_per_ton * BTUH_PER_KW / BTUH_PER_TON
}

/// Heat capacity rate per GPM [Btu/hr·°F per GPM] for a fluid with the
/// given density [lb/ft³] and specific heat [Btu/lb·°F].
#[inline]
pub fn capacity_rate_per_gpm(density: Real, specific_heat: Real) -> Real {
    MIN_PER_HR / GAL_PER_FT3 * density * specific_heat
}

#[inline]
pub fn fahrenheit_to_kelvin(deg_f: Real) -> Real {
    UomTemperature::new::<degree_fahrenheit>(deg_f).get::<kelvin>()
}

#[inline]
pub fn fahrenheit_to_celsius(deg_f: Real) -> Real {
    UomTemperature::new::<degree_fahrenheit>(deg_f).get::<degree_celsius>()
}
