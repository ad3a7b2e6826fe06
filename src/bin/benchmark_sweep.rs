// Sweep throughput: sequential random-order sweeps vs checkerboard sweeps

use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use xy_sim::{metropolis, Lattice};

#[derive(Parser)]
struct Cli {
    /// Lattice widths to time (even, for the checkerboard column)
    #[arg(long, value_delimiter = ',', default_value = "32,64,128,256")]
    widths: Vec<usize>,

    #[arg(long, default_value = "200")]
    sweeps: usize,

    #[arg(long, default_value = "0.9")]
    temperature: f64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    println!("=== SWEEP BENCHMARK ===");
    println!(
        "{:>6} {:>16} {:>16} {:>9}",
        "L", "seq [Msite/s]", "chk [Msite/s]", "speedup"
    );

    for &width in &cli.widths {
        let mut lattice = Lattice::new(width, cli.temperature, 0.0, 1)?;
        let sites = (lattice.size() * cli.sweeps) as f64;

        let start = Instant::now();
        metropolis::run_sweeps(&mut lattice, cli.sweeps)?;
        let seq = sites / start.elapsed().as_secs_f64() / 1e6;

        let chk = if width % 2 == 0 {
            let start = Instant::now();
            metropolis::run_checkerboard_sweeps(&mut lattice, cli.sweeps)?;
            sites / start.elapsed().as_secs_f64() / 1e6
        } else {
            f64::NAN
        };

        println!("{width:>6} {seq:>16.2} {chk:>16.2} {:>8.2}x", chk / seq);
    }
    Ok(())
}
