//! Run loop and result recording.

use hn_core::Real;
use tracing::{debug, info};

use crate::error::{SimError, SimResult};
use crate::integrator::{Integrator, StepOptions};
use crate::network::Network;
use crate::report::ReportFrame;

/// Options for simulation runs.
#[derive(Clone, Debug, PartialEq)]
pub struct SimOptions {
    /// Fixed time step [hr].
    pub dt_hours: Real,
    /// Simulated span [hr].
    pub duration_hours: Real,
    /// Record every N-th step.
    pub record_every: usize,
    /// Maximum number of steps (safety limit).
    pub max_steps: usize,
    pub parallel: bool,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            dt_hours: 0.001,
            duration_hours: 1.0,
            record_every: 100,
            max_steps: 10_000_000,
            parallel: false,
        }
    }
}

impl SimOptions {
    pub fn step_options(&self) -> StepOptions {
        StepOptions {
            dt_hours: self.dt_hours,
            parallel: self.parallel,
        }
    }

    /// Steps needed to cover the duration.
    pub fn step_count(&self) -> usize {
        ((self.duration_hours / self.dt_hours) - 1e-9).ceil().max(0.0) as usize
    }
}

/// Step `net` from its current time over `opts.duration_hours`.
///
/// The initial state is always recorded, as is the final one.
pub fn run_sim(net: &mut Network, opts: &SimOptions) -> SimResult<ReportFrame> {
    if !(opts.duration_hours.is_finite() && opts.duration_hours >= 0.0) {
        return Err(SimError::InvalidArg {
            what: "duration_hours must be non-negative",
        });
    }
    if opts.record_every == 0 {
        return Err(SimError::InvalidArg {
            what: "record_every must be positive",
        });
    }
    let integrator = Integrator::new(opts.step_options())?;
    let steps = opts.step_count();
    if steps > opts.max_steps {
        return Err(SimError::InvalidArg {
            what: "run exceeds max_steps",
        });
    }

    info!(
        steps,
        dt_hours = opts.dt_hours,
        parallel = opts.parallel,
        "starting run"
    );

    let mut frame = ReportFrame::default();
    frame.record(net)?;

    for step in 1..=steps {
        integrator.step(net)?;
        if step % opts.record_every == 0 {
            frame.record(net)?;
            debug!(step, time_hours = net.time_hours(), "recorded");
        }
    }
    if steps % opts.record_every != 0 {
        frame.record(net)?;
    }

    info!(
        rows = frame.len(),
        time_hours = net.time_hours(),
        "run finished"
    );
    Ok(frame)
}
