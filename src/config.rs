use crate::error::{check_field, Error, Result};
use crate::scan::derive_seed;

/// Run-time configuration for one equilibrate-then-measure run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub width: usize,
    pub external_field: f64,
    /// Base seed of a scan. [`crate::scan::run_point`] takes its seed
    /// explicitly; drivers hand it [`RunConfig::seed_for`] per point.
    pub seed: u64,
    /// Sweeps discarded before measuring.
    pub equil_sweeps: usize,
    /// Sweeps in the measurement phase.
    pub measure_sweeps: usize,
    /// Measure every `sample_every` sweeps.
    pub sample_every: usize,
    /// Use the checkerboard sweep (even widths only).
    pub parallel: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            width: 32,
            external_field: 0.0,
            seed: 0x5EED,
            equil_sweeps: 2_000,
            measure_sweeps: 10_000,
            sample_every: 10,
            parallel: false,
        }
    }
}

impl RunConfig {
    pub fn validate(&self) -> Result<()> {
        if self.width < 1 {
            return Err(Error::config("width must be >= 1"));
        }
        if self.parallel && self.width % 2 != 0 {
            return Err(Error::config(format!(
                "parallel sweeps need an even width, got {}",
                self.width
            )));
        }
        check_field(self.external_field)?;
        if self.sample_every < 1 {
            return Err(Error::config("sample_every must be >= 1"));
        }
        if self.measure_sweeps / self.sample_every < 2 {
            return Err(Error::config(
                "measure_sweeps / sample_every must leave at least 2 samples",
            ));
        }
        Ok(())
    }

    /// Seed of the `index`-th point of a scan.
    pub fn seed_for(&self, index: usize) -> u64 {
        derive_seed(self.seed, index as u64)
    }

    /// Number of measurements the run will record.
    pub fn n_samples(&self) -> usize {
        self.measure_sweeps / self.sample_every.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let cfg = RunConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.n_samples(), 1_000);
    }

    #[test]
    fn point_seeds_follow_base_seed() {
        let cfg = RunConfig::default();
        assert_eq!(cfg.seed_for(3), derive_seed(cfg.seed, 3));
        assert_ne!(cfg.seed_for(0), cfg.seed_for(1));
        let other = RunConfig {
            seed: 7,
            ..RunConfig::default()
        };
        assert_ne!(cfg.seed_for(0), other.seed_for(0));
    }

    #[test]
    fn rejects_odd_parallel_and_short_runs() {
        let cfg = RunConfig {
            width: 15,
            parallel: true,
            ..RunConfig::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = RunConfig {
            measure_sweeps: 10,
            sample_every: 10,
            ..RunConfig::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = RunConfig {
            sample_every: 0,
            ..RunConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
