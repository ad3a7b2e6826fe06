//! Single-spin-flip Metropolis dynamics.
//!
//! A sweep visits every site exactly once in a freshly shuffled order and
//! proposes a new angle drawn uniformly from `[0, 2π)`. Sites are updated
//! strictly in sequence, so later trials see spins changed earlier in the
//! same sweep.
//!
//! Each trial always consumes two uniforms (proposal, acceptance) so the
//! number of draws per sweep is fixed: `2·size` plus `size - 1` for the
//! shuffle.

use std::ops::AddAssign;
use std::sync::Arc;

use rand::RngCore;
use rayon::prelude::*;
use tracing::debug;

use crate::energy::{local_energy, site_energy};
use crate::error::{Error, Result};
use crate::lattice::Lattice;
use crate::utils::rng::{next_seed, shuffle, substream, uniform01, uniform_angle};

/// Trial counts, returned by every sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepStats {
    pub trials: u64,
    pub accepted: u64,
}

impl SweepStats {
    #[inline]
    fn record(&mut self, accepted: bool) {
        self.trials += 1;
        self.accepted += accepted as u64;
    }

    pub fn acceptance_rate(&self) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            self.accepted as f64 / self.trials as f64
        }
    }
}

impl AddAssign for SweepStats {
    fn add_assign(&mut self, rhs: Self) {
        self.trials += rhs.trials;
        self.accepted += rhs.accepted;
    }
}

/// Metropolis rule: always accept `ΔE ≤ 0`, otherwise accept when
/// `u < exp(-ΔE / T)`.
#[inline(always)]
pub fn accepts(delta_e: f64, temperature: f64, u: f64) -> bool {
    delta_e <= 0.0 || u < (-delta_e / temperature).exp()
}

/// One trial at `site`. Returns whether the proposal was accepted.
pub fn trial<R: RngCore>(lattice: &mut Lattice<R>, site: usize) -> Result<bool> {
    let old_angle = lattice.spins[site];
    let e_old = local_energy(lattice, site, old_angle);
    let new_angle = uniform_angle(&mut lattice.rng)?;
    let e_new = local_energy(lattice, site, new_angle);
    let u = uniform01(&mut lattice.rng)?;

    let accepted = accepts(e_new - e_old, lattice.temperature, u);
    if accepted {
        lattice.spins[site] = new_angle;
    }
    Ok(accepted)
}

/// One sweep: `size` trials, one per site, in random order.
///
/// On `RandomSourceExhausted` the lattice is left valid but only partially
/// swept.
pub fn sweep<R: RngCore>(lattice: &mut Lattice<R>) -> Result<SweepStats> {
    let mut order = std::mem::take(&mut lattice.order);
    let result = sweep_in_order(lattice, &mut order);
    lattice.order = order;
    result
}

fn sweep_in_order<R: RngCore>(lattice: &mut Lattice<R>, order: &mut [usize]) -> Result<SweepStats> {
    shuffle(order, &mut lattice.rng)?;
    let mut stats = SweepStats::default();
    for &site in order.iter() {
        stats.record(trial(lattice, site)?);
    }
    Ok(stats)
}

/// `n` consecutive sweeps, no early exit.
pub fn run_sweeps<R: RngCore>(lattice: &mut Lattice<R>, n: usize) -> Result<SweepStats> {
    let mut total = SweepStats::default();
    for _ in 0..n {
        total += sweep(lattice)?;
    }
    debug!(
        sweeps = n,
        temperature = lattice.temperature,
        acceptance = total.acceptance_rate(),
        "metropolis sweeps done"
    );
    Ok(total)
}

/// Parallel sweep by checkerboard decomposition.
///
/// Sites of one color have no neighbors of the same color, so a half sweep
/// updates them all against the other color's frozen spins; then the colors
/// swap. Every row of a half sweep draws from its own ChaCha20 substream
/// seeded from one master draw of the lattice RNG, which keeps the result
/// independent of the thread count. Requires an even width.
///
/// This is a different (still valid) Markov chain from [`sweep`]: the visit
/// order is fixed by color rather than shuffled.
pub fn checkerboard_sweep<R: RngCore>(lattice: &mut Lattice<R>) -> Result<SweepStats> {
    if !lattice.topology.is_bipartite() {
        return Err(Error::config(format!(
            "checkerboard sweep needs an even width, got {}",
            lattice.width()
        )));
    }
    let master = next_seed(&mut lattice.rng)?;
    let mut stats = SweepStats::default();
    for color in 0..2 {
        stats += half_sweep(lattice, master, color);
    }
    Ok(stats)
}

fn half_sweep<R>(lattice: &mut Lattice<R>, master: u64, color: usize) -> SweepStats {
    let topology = Arc::clone(&lattice.topology);
    let width = topology.width();
    let temperature = lattice.temperature;
    let field = lattice.external_field;
    let spins = &lattice.spins;

    let rows: Vec<(Vec<(usize, f64)>, SweepStats)> = (0..width)
        .into_par_iter()
        .map(|row| {
            // substreams are never bounded, so draws cannot fail here
            let mut rng = substream(master, (color * width + row) as u64);
            let mut updates = Vec::with_capacity(width / 2);
            let mut stats = SweepStats::default();
            for col in ((row + color) % 2..width).step_by(2) {
                let site = topology.site(row, col);
                let old_angle = spins[site];
                let new_angle = uniform_angle(&mut rng).unwrap_or(old_angle);
                let u = uniform01(&mut rng).unwrap_or(1.0);
                let delta_e = site_energy(&topology, spins, field, site, new_angle)
                    - site_energy(&topology, spins, field, site, old_angle);
                let accepted = accepts(delta_e, temperature, u);
                if accepted {
                    updates.push((site, new_angle));
                }
                stats.record(accepted);
            }
            (updates, stats)
        })
        .collect();

    let mut stats = SweepStats::default();
    for (updates, row_stats) in rows {
        for (site, angle) in updates {
            lattice.spins[site] = angle;
        }
        stats += row_stats;
    }
    stats
}

/// `n` checkerboard sweeps.
pub fn run_checkerboard_sweeps<R: RngCore>(lattice: &mut Lattice<R>, n: usize) -> Result<SweepStats> {
    let mut total = SweepStats::default();
    for _ in 0..n {
        total += checkerboard_sweep(lattice)?;
    }
    debug!(
        sweeps = n,
        temperature = lattice.temperature,
        acceptance = total.acceptance_rate(),
        "checkerboard sweeps done"
    );
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downhill_always_accepted() {
        for &u in &[0.0, 0.5, 0.999_999] {
            assert!(accepts(-1.0, 1e-6, u));
            assert!(accepts(0.0, 1e-6, u));
        }
    }

    #[test]
    fn uphill_uses_boltzmann_factor() {
        // exp(-1) ≈ 0.3679
        assert!(accepts(1.0, 1.0, 0.36));
        assert!(!accepts(1.0, 1.0, 0.37));
        assert!(!accepts(1e-3, 1e-6, 0.0));
    }

    #[test]
    fn stats_accumulate() {
        let mut s = SweepStats::default();
        s.record(true);
        s.record(false);
        s += SweepStats {
            trials: 2,
            accepted: 2,
        };
        assert_eq!(s.trials, 4);
        assert_eq!(s.accepted, 3);
        assert_eq!(s.acceptance_rate(), 0.75);
    }
}
