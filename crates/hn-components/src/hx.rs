//! Heat-exchange relations: log-mean temperature difference and
//! effectiveness-NTU closed forms.

use hn_core::Real;
use serde::{Deserialize, Serialize};

/// Terminal differences closer than this use the arithmetic mean.
pub const LMTD_EQUAL_TOL: Real = 1e-4;

/// Capacity ratios this close to one use the cr → 1 limit.
pub const CR_UNITY_TOL: Real = 1e-4;

/// Log-mean temperature difference of two terminal differences.
///
/// Falls back to the arithmetic mean when `|dt_a - dt_b|` is below
/// [`LMTD_EQUAL_TOL`].
pub fn lmtd(dt_a: Real, dt_b: Real) -> Real {
    if (dt_a - dt_b).abs() < LMTD_EQUAL_TOL {
        0.5 * (dt_a + dt_b)
    } else {
        (dt_a - dt_b) / (dt_a / dt_b).ln()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FlowArrangement {
    #[default]
    CounterFlow,
    ParallelFlow,
}

/// Exchanger effectiveness for a number of transfer units and capacity ratio
/// `cr = Cmin / Cmax` in [0, 1].
pub fn effectiveness(ntu: Real, cr: Real, arrangement: FlowArrangement) -> Real {
    match arrangement {
        FlowArrangement::CounterFlow => {
            if (cr - 1.0).abs() < CR_UNITY_TOL {
                ntu / (1.0 + ntu)
            } else {
                let e = (-ntu * (1.0 - cr)).exp();
                (1.0 - e) / (1.0 - cr * e)
            }
        }
        FlowArrangement::ParallelFlow => (1.0 - (-ntu * (1.0 + cr)).exp()) / (1.0 + cr),
    }
}
