//! Classical 2D XY model on a periodic square lattice, sampled with
//! single-spin-flip Metropolis Monte Carlo.
//!
//! ```no_run
//! use xy_sim::{observables, Lattice};
//!
//! let mut lattice = Lattice::new(32, 0.9, 0.0, 42)?;
//! lattice.run_sweeps(1_000)?;
//! let m = observables::magnetization(&lattice);
//! println!("e = {:.4}, |m| = {:.4}", lattice.energy_per_site(), m.magnitude);
//! # Ok::<(), xy_sim::Error>(())
//! ```

pub mod config;
pub mod energy;
pub mod error;
pub mod error_analysis;
pub mod lattice;
pub mod measure;
pub mod metropolis;
pub mod observables;
pub mod scan;
pub mod schedule;
pub mod snapshot;
pub mod topology;
pub mod utils;

pub use config::RunConfig;
pub use error::{Error, Result};
pub use lattice::Lattice;
pub use metropolis::SweepStats;
pub use observables::{Magnetization, Observables};
pub use snapshot::LatticeView;
pub use topology::Topology;
