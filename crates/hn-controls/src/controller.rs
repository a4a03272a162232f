//! Controller signals consumed by elements.
//!
//! A controller exposes one normalized output in `[0, 1]`. Reads are pure:
//! the output is a function of the committed [`ControllerState`]. Stateful
//! controllers compute their next state from committed measurements with
//! [`Controller::next_state`] and the integrator assigns every next state
//! together with [`Controller::commit`].

use hn_components::EvalContext;
use hn_core::{CtrlId, Real, SensorId};
use serde::{Deserialize, Serialize};

use crate::error::{ControlError, ControlResult};
use crate::load_based::{LoadBasedController, LoadBasedState};
use crate::pi::{PiController, PiState};
use crate::sensor::Sensor;

/// Where a PI loop takes its setpoint from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Setpoint {
    Fixed(Real),
    Sensor(SensorId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ControllerKind {
    Constant {
        value: Real,
    },
    /// Hourly values, repeated once the list is exhausted.
    Schedule {
        values: Vec<Real>,
    },
    LoadBased(LoadBasedController),
    Pi {
        pi: PiController,
        process: SensorId,
        setpoint: Setpoint,
        initial_output: Real,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ControllerState {
    Held { output: Real },
    LoadBased(LoadBasedState),
    Pi(PiState),
}

impl ControllerState {
    pub fn output(&self) -> Real {
        match self {
            ControllerState::Held { output } => *output,
            ControllerState::LoadBased(s) => {
                if s.on {
                    1.0
                } else {
                    0.0
                }
            }
            ControllerState::Pi(s) => s.output,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Controller {
    pub id: CtrlId,
    pub name: String,
    pub kind: ControllerKind,
    state: ControllerState,
}

fn check_unit(value: Real, what: &'static str) -> ControlResult<Real> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(ControlError::InvalidArg { what })
    }
}

fn schedule_value(values: &[Real], time_hours: Real) -> Real {
    let hour = (time_hours + 1e-9).floor().max(0.0) as usize;
    values[hour % values.len()]
}

impl Controller {
    pub fn new(id: CtrlId, name: impl Into<String>, kind: ControllerKind) -> ControlResult<Self> {
        let state = match &kind {
            ControllerKind::Constant { value } => ControllerState::Held {
                output: check_unit(*value, "constant output must lie in [0, 1]")?,
            },
            ControllerKind::Schedule { values } => {
                if values.is_empty() {
                    return Err(ControlError::InvalidArg {
                        what: "schedule needs at least one value",
                    });
                }
                for &v in values {
                    check_unit(v, "schedule values must lie in [0, 1]")?;
                }
                ControllerState::Held { output: values[0] }
            }
            ControllerKind::LoadBased(lb) => ControllerState::LoadBased(lb.initial_state()),
            ControllerKind::Pi {
                pi, initial_output, ..
            } => {
                let output = check_unit(*initial_output, "initial output must lie in [0, 1]")?
                    .clamp(pi.out_min, pi.out_max);
                // Bumpless start: zero error reproduces the initial output.
                let integral = if pi.kp != 0.0 {
                    output * pi.ti / pi.kp
                } else {
                    0.0
                };
                ControllerState::Pi(PiState { integral, output })
            }
        };
        Ok(Self {
            id,
            name: name.into(),
            kind,
            state,
        })
    }

    /// Current normalized output.
    pub fn output(&self) -> Real {
        self.state.output()
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    /// Sensors this controller reads.
    pub fn sensor_refs(&self) -> Vec<SensorId> {
        match &self.kind {
            ControllerKind::Constant { .. } | ControllerKind::Schedule { .. } => Vec::new(),
            ControllerKind::LoadBased(lb) => vec![lb.signal],
            ControllerKind::Pi {
                process, setpoint, ..
            } => match setpoint {
                Setpoint::Fixed(_) => vec![*process],
                Setpoint::Sensor(sp) => vec![*process, *sp],
            },
        }
    }

    /// State after a step ending at `time_hours`. Does not mutate `self`.
    pub fn next_state(
        &self,
        ctx: &dyn EvalContext,
        sensors: &[Sensor],
        time_hours: Real,
        dt_hours: Real,
    ) -> ControlResult<ControllerState> {
        let next = match (&self.kind, &self.state) {
            (ControllerKind::Constant { .. }, state) => *state,
            (ControllerKind::Schedule { values }, _) => ControllerState::Held {
                output: schedule_value(values, time_hours),
            },
            (ControllerKind::LoadBased(lb), ControllerState::LoadBased(s)) => {
                let signal = read(sensors, lb.signal, ctx)?;
                ControllerState::LoadBased(lb.advance(s, signal, dt_hours))
            }
            (
                ControllerKind::Pi {
                    pi,
                    process,
                    setpoint,
                    ..
                },
                ControllerState::Pi(s),
            ) => {
                let pv = read(sensors, *process, ctx)?;
                let sp = match setpoint {
                    Setpoint::Fixed(v) => *v,
                    Setpoint::Sensor(id) => read(sensors, *id, ctx)?,
                };
                ControllerState::Pi(pi.update(s, pv, sp, dt_hours))
            }
            _ => {
                return Err(ControlError::StateError {
                    what: format!("controller '{}' holds a foreign state", self.name),
                });
            }
        };
        Ok(next)
    }

    pub fn commit(&mut self, state: ControllerState) {
        self.state = state;
    }
}

fn read(sensors: &[Sensor], id: SensorId, ctx: &dyn EvalContext) -> ControlResult<Real> {
    let sensor = sensors
        .get(id.idx())
        .ok_or_else(|| ControlError::InvalidReference {
            what: format!("sensor #{} does not exist", id.index()),
        })?;
    sensor.read(ctx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cid() -> CtrlId {
        CtrlId::from_index(0)
    }

    #[test]
    fn constant_rejects_out_of_range() {
        assert!(Controller::new(cid(), "c", ControllerKind::Constant { value: 1.5 }).is_err());
        let c = Controller::new(cid(), "c", ControllerKind::Constant { value: 0.4 }).unwrap();
        assert_eq!(c.output(), 0.4);
    }

    #[test]
    fn schedule_wraps() {
        let values = [0.0, 0.5, 1.0];
        assert_eq!(schedule_value(&values, 0.0), 0.0);
        assert_eq!(schedule_value(&values, 1.0), 0.5);
        assert_eq!(schedule_value(&values, 2.999), 1.0);
        assert_eq!(schedule_value(&values, 3.0), 0.0);
        // Accumulated step error just below the hour.
        assert_eq!(schedule_value(&values, 1.0 - 1e-12), 0.5);
    }

    #[test]
    fn pi_starts_bumpless() {
        let pi = PiController::new(0.5, 2.0, crate::pi::ControlAction::Reverse).unwrap();
        let c = Controller::new(
            cid(),
            "loop",
            ControllerKind::Pi {
                pi: pi.clone(),
                process: SensorId::from_index(0),
                setpoint: Setpoint::Fixed(10.0),
                initial_output: 0.6,
            },
        )
        .unwrap();
        assert_eq!(c.output(), 0.6);
        let ControllerState::Pi(state) = *c.state() else {
            panic!("expected PI state");
        };
        let next = pi.update(&state, 10.0, 10.0, 0.1);
        assert!((next.output - 0.6).abs() < 1e-12);
    }
}
