//! Energy of the XY Hamiltonian
//!
//!   H = -Σ_<ij> cos(θᵢ - θⱼ) - h Σᵢ cos θᵢ
//!
//! Convention: [`total_energy`] is the plain sum of [`local_energy`] over
//! all sites, so every bond is counted twice and the field term once.
//! [`hamiltonian`] counts each bond once.

use serde::Serialize;

use crate::lattice::Lattice;
use crate::topology::Topology;

/// Energy of `site` if its spin were at `angle`, given the current
/// neighbors: `-Σ_n cos(angle - θ_n) - h cos(angle)`.
#[inline]
pub fn local_energy<R>(lattice: &Lattice<R>, site: usize, angle: f64) -> f64 {
    site_energy(
        lattice.topology(),
        lattice.spins(),
        lattice.external_field(),
        site,
        angle,
    )
}

/// Same as [`local_energy`] on raw parts; the checkerboard sweep evaluates
/// it against a frozen spin slice.
#[inline(always)]
pub(crate) fn site_energy(
    topology: &Topology,
    spins: &[f64],
    external_field: f64,
    site: usize,
    angle: f64,
) -> f64 {
    let [e, s, w, n] = topology.neighbors(site);
    let coupling = (angle - spins[e]).cos()
        + (angle - spins[s]).cos()
        + (angle - spins[w]).cos()
        + (angle - spins[n]).cos();
    -coupling - external_field * angle.cos()
}

/// Σ over sites of the local energy (bonds double-counted).
pub fn total_energy<R>(lattice: &Lattice<R>) -> f64 {
    lattice
        .spins()
        .iter()
        .enumerate()
        .map(|(site, &theta)| local_energy(lattice, site, theta))
        .sum()
}

/// Total energy split into its pairwise and field parts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnergyBreakdown {
    /// `-Σ_site Σ_n cos(θ_site - θ_n)`, each bond counted twice.
    pub coupling: f64,
    /// `-h Σ cos θ`.
    pub field: f64,
}

impl EnergyBreakdown {
    /// Equals [`total_energy`] up to summation order.
    pub fn total(&self) -> f64 {
        self.coupling + self.field
    }

    /// Physical energy, each bond counted once.
    pub fn hamiltonian(&self) -> f64 {
        0.5 * self.coupling + self.field
    }
}

pub fn breakdown<R>(lattice: &Lattice<R>) -> EnergyBreakdown {
    let topology = lattice.topology();
    let spins = lattice.spins();
    let mut coupling = 0.0;
    let mut cos_sum = 0.0;
    for (site, &theta) in spins.iter().enumerate() {
        for n in topology.neighbors(site) {
            coupling -= (theta - spins[n]).cos();
        }
        cos_sum += theta.cos();
    }
    EnergyBreakdown {
        coupling,
        field: -lattice.external_field() * cos_sum,
    }
}

/// Physical energy of the configuration (each bond once).
pub fn hamiltonian<R>(lattice: &Lattice<R>) -> f64 {
    breakdown(lattice).hamiltonian()
}
