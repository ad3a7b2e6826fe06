use std::sync::Arc;

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64;

use crate::error::{check_field, check_temperature, Error, Result};
use crate::metropolis::{self, SweepStats};
use crate::observables::{self, Magnetization};
use crate::snapshot::LatticeView;
use crate::topology::Topology;
use crate::utils::rng::{reduce_angle, uniform_angle};

/// Spin configuration of an L×L XY model plus its thermodynamic parameters.
///
/// The lattice owns its random source; spins are only written by the
/// Metropolis engine. `Clone` deep-copies the spins and the RNG state, so a
/// clone continues bit-identically. For two trajectories that are free to
/// diverge from the same configuration use [`Lattice::fork`] or
/// [`Lattice::fork_with`].
#[derive(Debug, Clone)]
pub struct Lattice<R = Pcg64> {
    pub(crate) spins: Vec<f64>,
    pub(crate) temperature: f64,
    pub(crate) external_field: f64,
    pub(crate) topology: Arc<Topology>,
    pub(crate) rng: R,
    /// Sweep order, reshuffled in place every sweep.
    pub(crate) order: Vec<usize>,
}

impl Lattice<Pcg64> {
    /// Random start seeded from `seed`.
    pub fn new(width: usize, temperature: f64, external_field: f64, seed: u64) -> Result<Self> {
        Self::with_rng(
            width,
            temperature,
            external_field,
            Pcg64::seed_from_u64(seed),
        )
    }
}

impl<R: RngCore> Lattice<R> {
    /// Random start: every spin uniform in `[0, 2π)` drawn from `rng`.
    pub fn with_rng(width: usize, temperature: f64, external_field: f64, rng: R) -> Result<Self> {
        let topology = Arc::new(Topology::build(width)?);
        Self::with_topology(topology, temperature, external_field, rng)
    }

    /// Random start on an existing (shared) topology.
    pub fn with_topology(
        topology: Arc<Topology>,
        temperature: f64,
        external_field: f64,
        mut rng: R,
    ) -> Result<Self> {
        check_temperature(temperature)?;
        check_field(external_field)?;
        let spins = (0..topology.size())
            .map(|_| uniform_angle(&mut rng))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::assemble(topology, spins, temperature, external_field, rng))
    }

    /// Start from explicit angles (row-major); values are reduced into `[0, 2π)`.
    pub fn from_angles(
        width: usize,
        temperature: f64,
        external_field: f64,
        angles: Vec<f64>,
        rng: R,
    ) -> Result<Self> {
        check_temperature(temperature)?;
        check_field(external_field)?;
        let topology = Arc::new(Topology::build(width)?);
        if angles.len() != topology.size() {
            return Err(Error::config(format!(
                "expected {} angles for width {width}, got {}",
                topology.size(),
                angles.len()
            )));
        }
        if let Some(bad) = angles.iter().find(|a| !a.is_finite()) {
            return Err(Error::config(format!("spin angle must be finite, got {bad}")));
        }
        let spins = angles.into_iter().map(reduce_angle).collect();
        Ok(Self::assemble(topology, spins, temperature, external_field, rng))
    }

    /// Fully aligned start, every spin at angle 0.
    pub fn ordered(width: usize, temperature: f64, external_field: f64, rng: R) -> Result<Self> {
        check_temperature(temperature)?;
        check_field(external_field)?;
        // the topology rejects oversized widths before anything is allocated
        let topology = Arc::new(Topology::build(width)?);
        let spins = vec![0.0; topology.size()];
        Ok(Self::assemble(topology, spins, temperature, external_field, rng))
    }

    fn assemble(
        topology: Arc<Topology>,
        spins: Vec<f64>,
        temperature: f64,
        external_field: f64,
        rng: R,
    ) -> Self {
        let order = (0..topology.size()).collect();
        Self {
            spins,
            temperature,
            external_field,
            topology,
            rng,
            order,
        }
    }

    /// Replace the temperature; takes effect on the next sweep.
    pub fn set_temperature(&mut self, temperature: f64) -> Result<()> {
        check_temperature(temperature)?;
        self.temperature = temperature;
        Ok(())
    }

    pub fn set_external_field(&mut self, external_field: f64) -> Result<()> {
        check_field(external_field)?;
        self.external_field = external_field;
        Ok(())
    }

    /// One Metropolis sweep in random site order.
    pub fn sweep(&mut self) -> Result<SweepStats> {
        metropolis::sweep(self)
    }

    pub fn run_sweeps(&mut self, n: usize) -> Result<SweepStats> {
        metropolis::run_sweeps(self, n)
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }
}

impl<R> Lattice<R> {
    #[inline(always)]
    pub fn spins(&self) -> &[f64] {
        &self.spins
    }

    #[inline(always)]
    pub fn spin(&self, site: usize) -> f64 {
        self.spins[site]
    }

    #[inline(always)]
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Inverse temperature `1/T`.
    #[inline]
    pub fn beta(&self) -> f64 {
        1.0 / self.temperature
    }

    #[inline(always)]
    pub fn external_field(&self) -> f64 {
        self.external_field
    }

    #[inline(always)]
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Shared handle to the topology, for building sibling lattices.
    pub fn topology_arc(&self) -> Arc<Topology> {
        Arc::clone(&self.topology)
    }

    #[inline(always)]
    pub fn width(&self) -> usize {
        self.topology.width()
    }

    #[inline(always)]
    pub fn size(&self) -> usize {
        self.topology.size()
    }

    /// Read-only 2D view for renderers and exporters.
    pub fn snapshot(&self) -> LatticeView<'_> {
        LatticeView::new(self.topology.width(), &self.spins)
    }

    pub fn energy_per_site(&self) -> f64 {
        observables::energy_per_site(self)
    }

    pub fn magnetization(&self) -> Magnetization {
        observables::magnetization(self)
    }

    /// Copy of this configuration driven by a different random source.
    pub fn fork_with<S>(&self, rng: S) -> Lattice<S> {
        Lattice {
            spins: self.spins.clone(),
            temperature: self.temperature,
            external_field: self.external_field,
            topology: Arc::clone(&self.topology),
            rng,
            order: self.order.clone(),
        }
    }

    /// Copy of this configuration with a fresh `Pcg64` stream.
    pub fn fork(&self, seed: u64) -> Lattice<Pcg64> {
        self.fork_with(Pcg64::seed_from_u64(seed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::rng::TapeRng;
    use std::f64::consts::TAU;

    #[test]
    fn construction_validates() {
        assert!(matches!(
            Lattice::new(0, 1.0, 0.0, 1),
            Err(Error::InvalidConfiguration(_))
        ));
        assert!(matches!(
            Lattice::new(4, 0.0, 0.0, 1),
            Err(Error::InvalidConfiguration(_))
        ));
        assert!(matches!(
            Lattice::new(4, -2.0, 0.0, 1),
            Err(Error::InvalidConfiguration(_))
        ));
        assert!(matches!(
            Lattice::new(4, 1.0, f64::NAN, 1),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn initial_spins_in_range() {
        let lat = Lattice::new(16, 1.0, 0.0, 3).unwrap();
        assert_eq!(lat.spins().len(), 256);
        assert!(lat.spins().iter().all(|&s| (0.0..TAU).contains(&s)));
    }

    #[test]
    fn set_temperature_rejects_non_positive() {
        let mut lat = Lattice::new(4, 1.0, 0.0, 3).unwrap();
        assert!(lat.set_temperature(0.0).is_err());
        assert_eq!(lat.temperature(), 1.0);
        lat.set_temperature(0.5).unwrap();
        assert_eq!(lat.temperature(), 0.5);
        assert_eq!(lat.beta(), 2.0);
    }

    #[test]
    fn bounded_source_exhausts_during_init() {
        let tape = TapeRng::from_uniforms(&[0.1; 10]);
        let err = Lattice::with_rng(4, 1.0, 0.0, tape).unwrap_err();
        assert_eq!(err, Error::RandomSourceExhausted { draws: 10 });
    }

    #[test]
    fn from_angles_reduces() {
        let lat = Lattice::from_angles(
            2,
            1.0,
            0.0,
            vec![-0.5, TAU, 7.0, 1.0],
            TapeRng::new(vec![]),
        )
        .unwrap();
        assert!((lat.spin(0) - (TAU - 0.5)).abs() < 1e-12);
        assert_eq!(lat.spin(1), 0.0);
        assert!((lat.spin(2) - (7.0 - TAU)).abs() < 1e-12);

        assert!(Lattice::from_angles(2, 1.0, 0.0, vec![0.0; 3], TapeRng::new(vec![])).is_err());
    }

    #[test]
    fn fork_shares_topology_not_spins() {
        let lat = Lattice::new(4, 1.0, 0.0, 3).unwrap();
        let mut other = lat.fork(99);
        assert!(Arc::ptr_eq(&lat.topology, &other.topology));
        other.spins[0] = 1.234;
        assert_ne!(lat.spins[0], other.spins[0]);
    }
}
