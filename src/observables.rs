// observables.rs - Order parameters and topological defects of the XY model

use std::f64::consts::TAU;

use num_complex::Complex64;
use serde::Serialize;

use crate::energy::{hamiltonian, total_energy};
use crate::lattice::Lattice;
use crate::utils::rng::wrap_difference;

/// Energy per site with the double-counted bond convention of
/// [`total_energy`].
pub fn energy_per_site<R>(lattice: &Lattice<R>) -> f64 {
    total_energy(lattice) / lattice.size() as f64
}

/// Physical energy per site, each bond counted once.
pub fn bond_energy_per_site<R>(lattice: &Lattice<R>) -> f64 {
    hamiltonian(lattice) / lattice.size() as f64
}

/// Vector order parameter `⟨e^{iθ}⟩`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Magnetization {
    pub mx: f64,
    pub my: f64,
    /// `√(mx² + my²)`, never above 1.
    pub magnitude: f64,
}

pub fn magnetization<R>(lattice: &Lattice<R>) -> Magnetization {
    let n = lattice.size() as f64;
    let z = lattice
        .spins()
        .iter()
        .map(|&theta| Complex64::from_polar(1.0, theta))
        .sum::<Complex64>()
        / n;
    Magnetization {
        mx: z.re,
        my: z.im,
        magnitude: z.norm().min(1.0),
    }
}

/// `Σ cos θ / size`: the projection onto the field axis, i.e. `mx`.
///
/// Older drivers reported this as "the" magnetization; it vanishes for an
/// ordered state pointing along y, so prefer [`magnetization`]`.magnitude`.
pub fn magnetization_projection<R>(lattice: &Lattice<R>) -> f64 {
    lattice.spins().iter().map(|t| t.cos()).sum::<f64>() / lattice.size() as f64
}

/// Plaquettes with winding +1 (vortices) and -1 (antivortices).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VortexCount {
    pub vortices: usize,
    pub antivortices: usize,
}

impl VortexCount {
    /// Defects per site.
    pub fn density(&self, size: usize) -> f64 {
        (self.vortices + self.antivortices) as f64 / size as f64
    }

    /// Net topological charge; zero on a torus.
    pub fn net_charge(&self) -> i64 {
        self.vortices as i64 - self.antivortices as i64
    }
}

/// Winding number of every elementary plaquette, walking
/// site → east → south-east → south → site.
pub fn count_vortices<R>(lattice: &Lattice<R>) -> VortexCount {
    let topology = lattice.topology();
    let spins = lattice.spins();
    let mut count = VortexCount::default();

    for s in 0..lattice.size() {
        let e = topology.east(s);
        let corners = [s, e, topology.south(e), topology.south(s)];
        let mut winding = 0.0;
        for k in 0..4 {
            let a = spins[corners[k]];
            let b = spins[corners[(k + 1) % 4]];
            winding += wrap_difference(b - a);
        }
        let q = (winding / TAU).round() as i64;
        if q > 0 {
            count.vortices += q as usize;
        } else if q < 0 {
            count.antivortices += (-q) as usize;
        }
    }
    count
}

/// Everything a driver records per measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Observables {
    pub energy_per_site: f64,
    pub bond_energy_per_site: f64,
    pub magnetization: f64,
    pub mx: f64,
    pub my: f64,
    pub vortex_density: f64,
}

impl Observables {
    pub fn measure<R>(lattice: &Lattice<R>) -> Self {
        let m = magnetization(lattice);
        Self {
            energy_per_site: energy_per_site(lattice),
            bond_energy_per_site: bond_energy_per_site(lattice),
            magnetization: m.magnitude,
            mx: m.mx,
            my: m.my,
            vortex_density: count_vortices(lattice).density(lattice.size()),
        }
    }
}
