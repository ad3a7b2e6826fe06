//! Temperature schedules: quenches and annealing ramps.

use std::ops::ControlFlow;

use rand::RngCore;
use tracing::debug;

use crate::error::{check_temperature, Error, Result};
use crate::lattice::Lattice;
use crate::metropolis::{run_sweeps, SweepStats};
use crate::observables::Observables;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Schedule {
    /// Hold one temperature for `steps` steps (a quench when started from a
    /// hot configuration).
    Constant { temperature: f64, steps: usize },
    /// Evenly spaced from `start` to `end` inclusive.
    Linear { start: f64, end: f64, steps: usize },
    /// Constant ratio from `start` to `end` inclusive.
    Geometric { start: f64, end: f64, steps: usize },
}

impl Schedule {
    pub fn steps(&self) -> usize {
        match *self {
            Schedule::Constant { steps, .. }
            | Schedule::Linear { steps, .. }
            | Schedule::Geometric { steps, .. } => steps,
        }
    }

    /// The temperature of every step; all strictly positive.
    pub fn temperatures(&self) -> Result<Vec<f64>> {
        let steps = self.steps();
        if steps < 1 {
            return Err(Error::config("schedule needs at least one step"));
        }
        let frac = |i: usize| {
            if steps == 1 {
                0.0
            } else {
                i as f64 / (steps - 1) as f64
            }
        };
        let temps: Vec<f64> = match *self {
            Schedule::Constant { temperature, .. } => vec![temperature; steps],
            Schedule::Linear { start, end, .. } => (0..steps)
                .map(|i| {
                    let f = frac(i);
                    start * (1.0 - f) + end * f
                })
                .collect(),
            Schedule::Geometric { start, end, .. } => {
                check_temperature(start)?;
                check_temperature(end)?;
                (0..steps)
                    .map(|i| match i {
                        0 => start,
                        i if i == steps - 1 => end,
                        i => start * (end / start).powf(frac(i)),
                    })
                    .collect()
            }
        };
        for &t in &temps {
            check_temperature(t)?;
        }
        Ok(temps)
    }
}

/// What the annealing loop reports after each step.
#[derive(Debug, Clone, Copy)]
pub struct StepReport {
    pub step: usize,
    pub temperature: f64,
    pub stats: SweepStats,
    pub observables: Observables,
}

/// Walk the schedule: set the temperature, run `sweeps_per_step` sweeps,
/// report. The callback can stop the run between steps with
/// `ControlFlow::Break`.
pub fn anneal<R, F>(
    lattice: &mut Lattice<R>,
    schedule: &Schedule,
    sweeps_per_step: usize,
    mut on_step: F,
) -> Result<SweepStats>
where
    R: RngCore,
    F: FnMut(&StepReport) -> ControlFlow<()>,
{
    let temperatures = schedule.temperatures()?;
    let mut total = SweepStats::default();

    for (step, &temperature) in temperatures.iter().enumerate() {
        lattice.set_temperature(temperature)?;
        let stats = run_sweeps(lattice, sweeps_per_step)?;
        total += stats;

        let report = StepReport {
            step,
            temperature,
            stats,
            observables: Observables::measure(lattice),
        };
        debug!(
            step,
            temperature,
            energy = report.observables.energy_per_site,
            magnetization = report.observables.magnetization,
            "anneal step"
        );
        if on_step(&report).is_break() {
            break;
        }
    }
    Ok(total)
}
