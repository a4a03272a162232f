//! Load-based staging: a binary on/off command driven by a load signal
//! crossing ordered thresholds.
//!
//! Thresholds split the signal range into bands. With `band` the number of
//! thresholds strictly below the signal, minus one:
//!
//! - band −1 (below every threshold): turn off once the signal drops under
//!   `t[0] − deadband`;
//! - even band: turn on once the signal exceeds `t[band] + deadband`;
//! - odd band below the top: turn off once the signal drops under
//!   `t[band + 1] − deadband`;
//! - odd top band: hold.
//!
//! A transition is only taken once `min_cycle` hours have elapsed since the
//! previous one.

use hn_core::{Real, SensorId};
use serde::{Deserialize, Serialize};

use crate::error::{ControlError, ControlResult};

#[derive(Debug, Clone, PartialEq)]
pub struct LoadBasedController {
    pub signal: SensorId,
    thresholds: Vec<Real>,
    pub deadband: Real,
    /// Minimum dwell between transitions [hr].
    pub min_cycle: Real,
}

/// Commanded state plus dwell timer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoadBasedState {
    pub on: bool,
    /// Time since the last transition [hr].
    pub since_transition: Real,
}

impl LoadBasedController {
    pub fn new(
        signal: SensorId,
        thresholds: Vec<Real>,
        deadband: Real,
        min_cycle: Real,
    ) -> ControlResult<Self> {
        if thresholds.is_empty() {
            return Err(ControlError::InvalidArg {
                what: "load-based controller needs at least one threshold",
            });
        }
        if thresholds.iter().any(|t| !t.is_finite()) {
            return Err(ControlError::InvalidArg {
                what: "thresholds must be finite",
            });
        }
        if thresholds.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ControlError::InvalidArg {
                what: "thresholds must be strictly increasing",
            });
        }
        if !(deadband.is_finite() && deadband >= 0.0) {
            return Err(ControlError::InvalidArg {
                what: "deadband must be non-negative",
            });
        }
        if !(min_cycle.is_finite() && min_cycle >= 0.0) {
            return Err(ControlError::InvalidArg {
                what: "min_cycle must be non-negative",
            });
        }
        Ok(Self {
            signal,
            thresholds,
            deadband,
            min_cycle,
        })
    }

    pub fn thresholds(&self) -> &[Real] {
        &self.thresholds
    }

    /// Starts on, with the dwell already satisfied.
    pub fn initial_state(&self) -> LoadBasedState {
        LoadBasedState {
            on: true,
            since_transition: self.min_cycle,
        }
    }

    /// Band index of `signal`; −1 below the first threshold.
    pub fn band(&self, signal: Real) -> isize {
        self.thresholds.iter().filter(|&&t| t < signal).count() as isize - 1
    }

    /// Command wanted for `signal` ignoring the dwell timer.
    pub fn target(&self, on: bool, signal: Real) -> bool {
        let t = &self.thresholds;
        let band = self.band(signal);
        if band < 0 {
            if signal < t[0] - self.deadband {
                return false;
            }
            return on;
        }
        let b = band as usize;
        if b % 2 == 0 {
            if signal > t[b] + self.deadband {
                return true;
            }
            on
        } else {
            match t.get(b + 1) {
                Some(&next) if signal < next - self.deadband => false,
                _ => on,
            }
        }
    }

    /// State after a step of `dt` hours, given the committed signal.
    pub fn advance(&self, state: &LoadBasedState, signal: Real, dt: Real) -> LoadBasedState {
        let mut next = *state;
        if state.since_transition >= self.min_cycle {
            let target = self.target(state.on, signal);
            if target != state.on {
                next.on = target;
                next.since_transition = 0.0;
            }
        }
        next.since_transition += dt;
        next
    }
}
