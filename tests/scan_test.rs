use xy_sim::scan::{run_point, temperature_grid};
use xy_sim::{Error, RunConfig};

fn small_config() -> RunConfig {
    RunConfig {
        width: 8,
        external_field: 0.0,
        seed: 1,
        equil_sweeps: 300,
        measure_sweeps: 600,
        sample_every: 3,
        parallel: false,
    }
}

#[test]
fn test_cold_point_is_more_ordered_than_hot() {
    let config = small_config();
    let cold = run_point(&config, 0.3, config.seed_for(0)).unwrap();
    let hot = run_point(&config, 3.0, config.seed_for(1)).unwrap();

    assert_eq!(cold.samples, 200);
    assert!(cold.mean_energy < hot.mean_energy);
    assert!(cold.mean_magnetization > hot.mean_magnetization);
    assert!(cold.vortex_density <= hot.vortex_density);
    assert!(cold.acceptance < hot.acceptance);
    for p in [&cold, &hot] {
        assert!(p.mean_magnetization >= 0.0 && p.mean_magnetization <= 1.0);
        assert!(p.specific_heat >= 0.0 && p.susceptibility >= 0.0);
        assert!(p.energy_error.is_finite());
    }
}

#[test]
fn test_run_point_reproducible() {
    let config = small_config();
    let a = run_point(&config, 0.9, 77).unwrap();
    let b = run_point(&config, 0.9, 77).unwrap();
    assert_eq!(a.mean_energy, b.mean_energy);
    assert_eq!(a.mean_magnetization, b.mean_magnetization);
}

#[test]
fn test_parallel_point() {
    let config = RunConfig {
        parallel: true,
        ..small_config()
    };
    let point = run_point(&config, 0.5, 3).unwrap();
    assert_eq!(point.samples, 200);
    assert!(point.mean_energy < -1.0, "e = {}", point.mean_energy);
}

#[test]
fn test_invalid_config_rejected() {
    let odd_parallel = RunConfig {
        width: 7,
        parallel: true,
        ..small_config()
    };
    assert!(matches!(
        run_point(&odd_parallel, 1.0, 1),
        Err(Error::InvalidConfiguration(_))
    ));

    let too_few = RunConfig {
        measure_sweeps: 3,
        sample_every: 3,
        ..small_config()
    };
    assert!(run_point(&too_few, 1.0, 1).is_err());
    assert!(run_point(&small_config(), 0.0, 1).is_err());
}

#[test]
fn test_temperature_grid_hits_both_ends() {
    let grid = temperature_grid(0.3, 1.7, 15).unwrap();
    assert_eq!(grid.len(), 15);
    assert_eq!(grid[0], 0.3);
    assert_eq!(grid[14], 1.7, "t_max must be the last grid point");
    assert!(grid.windows(2).all(|w| w[0] < w[1]));
}
