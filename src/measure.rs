//! Record time-series observables and reduce them to thermodynamic averages
use serde::Serialize;

use crate::error_analysis::ErrorAnalysis;
use crate::observables::Observables;

#[derive(Debug, Default, Clone)]
pub struct Recorder {
    /// Physical energy per site (each bond once).
    pub energy: Vec<f64>,
    /// Magnetization magnitude.
    pub magnetization: Vec<f64>,
    pub vortex_density: Vec<f64>,
}

/// Averages and fluctuation observables at one temperature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThermoSummary {
    pub samples: usize,
    pub mean_energy: f64,
    pub energy_error: f64,
    /// `N (⟨e²⟩ - ⟨e⟩²) / T²`, per site.
    pub specific_heat: f64,
    pub mean_magnetization: f64,
    pub magnetization_error: f64,
    /// `N (⟨m²⟩ - ⟨m⟩²) / T`.
    pub susceptibility: f64,
    /// `1 - ⟨m⁴⟩ / (3 ⟨m²⟩²)`.
    pub binder_cumulant: f64,
    pub mean_vortex_density: f64,
    /// Integrated autocorrelation time of the energy, in samples.
    pub tau_int: f64,
}

impl Recorder {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            energy: Vec::with_capacity(n),
            magnetization: Vec::with_capacity(n),
            vortex_density: Vec::with_capacity(n),
        }
    }

    pub fn push(&mut self, obs: &Observables) {
        self.energy.push(obs.bond_energy_per_site);
        self.magnetization.push(obs.magnetization);
        self.vortex_density.push(obs.vortex_density);
    }

    pub fn len(&self) -> usize {
        self.energy.len()
    }

    pub fn is_empty(&self) -> bool {
        self.energy.is_empty()
    }

    /// Reduce the series; `None` with fewer than two samples.
    pub fn summary(&self, temperature: f64, size: usize) -> Option<ThermoSummary> {
        let e = ErrorAnalysis::new(&self.energy)?;
        let m = ErrorAnalysis::new(&self.magnetization)?;
        let n = size as f64;

        let e2 = moment(&self.energy, 2);
        let m2 = moment(&self.magnetization, 2);
        let m4 = moment(&self.magnetization, 4);

        let binder_cumulant = if m2 > 0.0 {
            1.0 - m4 / (3.0 * m2 * m2)
        } else {
            0.0
        };

        Some(ThermoSummary {
            samples: self.len(),
            mean_energy: e.mean,
            energy_error: e.stat_error,
            specific_heat: n * (e2 - e.mean * e.mean).max(0.0) / (temperature * temperature),
            mean_magnetization: m.mean,
            magnetization_error: m.stat_error,
            susceptibility: n * (m2 - m.mean * m.mean).max(0.0) / temperature,
            binder_cumulant,
            mean_vortex_density: moment(&self.vortex_density, 1),
            tau_int: e.tau_int,
        })
    }
}

fn moment(data: &[f64], k: i32) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().map(|x| x.powi(k)).sum::<f64>() / data.len() as f64
}
