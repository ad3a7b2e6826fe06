// src/bin/anneal.rs - Cool (or heat) one lattice along a schedule and record
// the observables after every step.

use std::ops::ControlFlow;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use csv::WriterBuilder;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use xy_sim::observables::count_vortices;
use xy_sim::schedule::{anneal, Schedule, StepReport};
use xy_sim::Lattice;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Ramp {
    Linear,
    Geometric,
    Quench,
}

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, short, default_value = "64")]
    width: usize,

    #[arg(long, default_value = "0.0")]
    field: f64,

    /// Starting temperature (ignored by `quench`)
    #[arg(long, default_value = "2.0")]
    t_start: f64,

    #[arg(long, default_value = "0.1")]
    t_end: f64,

    #[arg(long, value_enum, default_value = "linear")]
    ramp: Ramp,

    /// Number of schedule steps
    #[arg(long, default_value = "200")]
    steps: usize,

    /// Sweeps per schedule step
    #[arg(long, default_value = "50")]
    sweeps: usize,

    #[arg(long, default_value = "7")]
    seed: u64,

    #[arg(long, short, default_value = "anneal.csv")]
    output: PathBuf,
}

#[derive(Debug, Serialize)]
struct Row {
    step: usize,
    temperature: f64,
    energy_per_site: f64,
    bond_energy_per_site: f64,
    magnetization: f64,
    mx: f64,
    my: f64,
    vortex_density: f64,
    acceptance: f64,
}

impl From<&StepReport> for Row {
    fn from(r: &StepReport) -> Self {
        Self {
            step: r.step,
            temperature: r.temperature,
            energy_per_site: r.observables.energy_per_site,
            bond_energy_per_site: r.observables.bond_energy_per_site,
            magnetization: r.observables.magnetization,
            mx: r.observables.mx,
            my: r.observables.my,
            vortex_density: r.observables.vortex_density,
            acceptance: r.stats.acceptance_rate(),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let cli = Cli::parse();
    let schedule = match cli.ramp {
        Ramp::Linear => Schedule::Linear {
            start: cli.t_start,
            end: cli.t_end,
            steps: cli.steps,
        },
        Ramp::Geometric => Schedule::Geometric {
            start: cli.t_start,
            end: cli.t_end,
            steps: cli.steps,
        },
        Ramp::Quench => Schedule::Constant {
            temperature: cli.t_end,
            steps: cli.steps,
        },
    };
    let temps = schedule.temperatures()?;

    let mut lattice = Lattice::new(cli.width, temps[0], cli.field, cli.seed)?;
    info!(width = cli.width, ?schedule, "annealing");

    let mut wtr = WriterBuilder::new()
        .from_path(&cli.output)
        .with_context(|| format!("cannot create {}", cli.output.display()))?;

    let bar = ProgressBar::new(temps.len() as u64);
    bar.set_style(ProgressStyle::with_template(
        " {bar:40.cyan/blue} {pos}/{len} T={msg} [{elapsed_precise}]",
    )?);

    let mut write_err = None;
    let total = anneal(&mut lattice, &schedule, cli.sweeps, |report| {
        bar.set_message(format!("{:.3}", report.temperature));
        bar.inc(1);
        match wtr.serialize(Row::from(report)) {
            Ok(()) => ControlFlow::Continue(()),
            Err(e) => {
                write_err = Some(e);
                ControlFlow::Break(())
            }
        }
    })?;
    bar.finish();
    if let Some(e) = write_err {
        return Err(e).context("writing anneal rows");
    }
    wtr.flush()?;

    let vortices = count_vortices(&lattice);
    info!(
        acceptance = total.acceptance_rate(),
        energy = lattice.energy_per_site(),
        magnetization = lattice.magnetization().magnitude,
        vortices = vortices.vortices,
        antivortices = vortices.antivortices,
        output = %cli.output.display(),
        "anneal complete"
    );
    Ok(())
}
