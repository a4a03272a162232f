//! Power-law flow/pressure relation shared by most passive elements.
//!
//! ```text
//! Q = sign(ΔP) · Qn · (|ΔP| / ΔPn)^(1/k)
//! ```
//!
//! k = 2 is the turbulent-orifice case; other exponents come from curve fits.

use hn_core::{Real, signum_or_zero};

use crate::common::require_positive;
use crate::error::ComponentResult;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PowerLaw {
    /// Flow at the nominal pressure drop [GPM].
    pub nominal_flow: Real,
    /// Pressure drop at nominal flow [ft].
    pub nominal_dp: Real,
    /// Pressure exponent k.
    pub exponent: Real,
}

impl PowerLaw {
    pub fn new(nominal_flow: Real, nominal_dp: Real, exponent: Real) -> ComponentResult<Self> {
        Ok(Self {
            nominal_flow: require_positive(nominal_flow, "nominal flow must be positive")?,
            nominal_dp: require_positive(nominal_dp, "nominal pressure drop must be positive")?,
            exponent: require_positive(exponent, "pressure exponent must be positive")?,
        })
    }

    /// Signed flow [GPM] for a signed pressure drop [ft].
    pub fn flow(&self, dp: Real) -> Real {
        let ratio = dp.abs() / self.nominal_dp;
        signum_or_zero(dp) * self.nominal_flow * ratio.powf(1.0 / self.exponent)
    }

    /// Inverse relation: signed pressure drop that produces `flow`.
    pub fn pressure_drop(&self, flow: Real) -> Real {
        let ratio = flow.abs() / self.nominal_flow;
        signum_or_zero(flow) * self.nominal_dp * ratio.powf(self.exponent)
    }
}

/// Flow through a device that must first overcome a static lift.
///
/// No flow (and no reverse flow) until the pressure drop exceeds `static_head`.
pub fn lifted_flow(law: &PowerLaw, static_head: Real, dp: Real) -> Real {
    let driving = dp - static_head;
    if driving < 0.0 { 0.0 } else { law.flow(driving) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn law() -> PowerLaw {
        PowerLaw::new(100.0, 10.0, 2.0).unwrap()
    }

    #[test]
    fn nominal_point() {
        assert!((law().flow(10.0) - 100.0).abs() < 1e-12);
        assert!((law().flow(2.5) - 50.0).abs() < 1e-12);
    }

    #[test]
    fn zero_drop_gives_zero_flow() {
        assert_eq!(law().flow(0.0), 0.0);
    }

    #[test]
    fn lifted_flow_below_static_head_is_zero() {
        assert_eq!(lifted_flow(&law(), 5.0, 4.0), 0.0);
        assert_eq!(lifted_flow(&law(), 5.0, -4.0), 0.0);
        assert!((lifted_flow(&law(), 5.0, 15.0) - 100.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_bad_parameters() {
        assert!(PowerLaw::new(0.0, 1.0, 2.0).is_err());
        assert!(PowerLaw::new(1.0, -1.0, 2.0).is_err());
        assert!(PowerLaw::new(1.0, 1.0, f64::NAN).is_err());
    }

    proptest! {
        #[test]
        fn round_trip(
            qn in 1.0f64..2000.0,
            dpn in 0.5f64..80.0,
            k in 1.2f64..2.5,
            dp in -200.0f64..200.0,
        ) {
            let law = PowerLaw::new(qn, dpn, k).unwrap();
            let q = law.flow(dp);
            let back = law.pressure_drop(q);
            prop_assert!((back - dp).abs() <= 1e-9 * dp.abs().max(1.0));
        }

        #[test]
        fn odd_symmetry(
            qn in 1.0f64..2000.0,
            dpn in 0.5f64..80.0,
            k in 1.2f64..2.5,
            dp in 0.0f64..200.0,
        ) {
            let law = PowerLaw::new(qn, dpn, k).unwrap();
            prop_assert_eq!(law.flow(-dp), -law.flow(dp));
        }
    }
}
