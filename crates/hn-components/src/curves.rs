//! Performance curves.
//!
//! Single-variable curves ignore their second argument, so every curve can
//! stand in wherever a two-input function is expected.

use hn_core::Real;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Curve {
    Constant {
        value: Real,
    },
    Linear {
        c0: Real,
        c1: Real,
    },
    Quadratic {
        c0: Real,
        c1: Real,
        c2: Real,
    },
    Cubic {
        c0: Real,
        c1: Real,
        c2: Real,
        c3: Real,
    },
    /// c0 + c1·x + c2·x² + c3·y + c4·y² + c5·x·y
    Biquadratic {
        c0: Real,
        c1: Real,
        c2: Real,
        c3: Real,
        c4: Real,
        c5: Real,
    },
}

impl Curve {
    /// Evaluate at `x`, ignoring any second input.
    pub fn eval1(&self, x: Real) -> Real {
        self.eval2(x, 0.0)
    }

    pub fn eval2(&self, x: Real, y: Real) -> Real {
        match *self {
            Curve::Constant { value } => value,
            Curve::Linear { c0, c1 } => c0 + c1 * x,
            Curve::Quadratic { c0, c1, c2 } => c0 + x * (c1 + c2 * x),
            Curve::Cubic { c0, c1, c2, c3 } => c0 + x * (c1 + x * (c2 + c3 * x)),
            Curve::Biquadratic {
                c0,
                c1,
                c2,
                c3,
                c4,
                c5,
            } => c0 + c1 * x + c2 * x * x + c3 * y + c4 * y * y + c5 * x * y,
        }
    }

    pub fn is_bivariate(&self) -> bool {
        matches!(self, Curve::Biquadratic { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polynomial_evaluation() {
        let q = Curve::Quadratic {
            c0: 1.0,
            c1: 2.0,
            c2: 3.0,
        };
        assert_eq!(q.eval1(2.0), 17.0);

        let c = Curve::Cubic {
            c0: 0.0,
            c1: 0.0,
            c2: 0.0,
            c3: 1.0,
        };
        assert_eq!(c.eval2(3.0, 99.0), 27.0);
    }

    #[test]
    fn biquadratic_evaluation() {
        let b = Curve::Biquadratic {
            c0: 1.0,
            c1: 1.0,
            c2: 1.0,
            c3: 1.0,
            c4: 1.0,
            c5: 1.0,
        };
        // 1 + 2 + 4 + 3 + 9 + 6
        assert_eq!(b.eval2(2.0, 3.0), 25.0);
        assert!(b.is_bivariate());
    }
}
