//! Proportional-integral loop.
//!
//! Sampled operation: the loop is updated once per integrator step, after
//! node states commit. The output is clamped to `[out_min, out_max]` and the
//! integral is frozen while the output saturates.

use hn_core::Real;
use serde::{Deserialize, Serialize};

use crate::error::{ControlError, ControlResult};

/// Sign convention for the control error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ControlAction {
    /// Output rises while the measurement is above setpoint (`e = pv − sp`).
    Direct,
    /// Output rises while the measurement is below setpoint (`e = sp − pv`).
    #[default]
    Reverse,
}

/// PI controller configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PiController {
    /// Proportional gain.
    pub kp: Real,
    /// Integral time [hr]. Larger values reduce integral action.
    pub ti: Real,
    pub out_min: Real,
    pub out_max: Real,
    pub action: ControlAction,
    /// Integral windup limit. If None, only the saturation freeze applies.
    pub integral_limit: Option<Real>,
}

impl PiController {
    pub fn new(kp: Real, ti: Real, action: ControlAction) -> ControlResult<Self> {
        Self::with_limits(kp, ti, action, 0.0, 1.0)
    }

    pub fn with_limits(
        kp: Real,
        ti: Real,
        action: ControlAction,
        out_min: Real,
        out_max: Real,
    ) -> ControlResult<Self> {
        if !kp.is_finite() {
            return Err(ControlError::InvalidArg {
                what: "kp must be finite",
            });
        }
        if !(ti.is_finite() && ti > 0.0) {
            return Err(ControlError::InvalidArg {
                what: "ti must be positive",
            });
        }
        if out_min >= out_max {
            return Err(ControlError::InvalidArg {
                what: "out_min must be less than out_max",
            });
        }
        if out_min < 0.0 || out_max > 1.0 {
            return Err(ControlError::InvalidArg {
                what: "output limits must lie in [0, 1]",
            });
        }
        Ok(Self {
            kp,
            ti,
            out_min,
            out_max,
            action,
            integral_limit: None,
        })
    }

    pub fn with_integral_limit(mut self, limit: Real) -> Self {
        self.integral_limit = Some(limit);
        self
    }

    /// Advance the loop by `dt` hours.
    pub fn update(&self, state: &PiState, pv: Real, sp: Real, dt: Real) -> PiState {
        let error = match self.action {
            ControlAction::Direct => pv - sp,
            ControlAction::Reverse => sp - pv,
        };

        let p_term = self.kp * error;

        let ki = self.kp / self.ti;
        let new_integral = state.integral + error * dt;
        let clamped_integral = match self.integral_limit {
            Some(limit) => new_integral.clamp(-limit, limit),
            None => new_integral,
        };

        let output_raw = p_term + ki * clamped_integral;
        let output = output_raw.clamp(self.out_min, self.out_max);

        // Saturated: keep the old integral.
        let integral = if output == output_raw {
            clamped_integral
        } else {
            state.integral
        };

        PiState { integral, output }
    }
}

/// PI controller state.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PiState {
    pub integral: Real,
    /// Output held until the next update.
    pub output: Real,
}
