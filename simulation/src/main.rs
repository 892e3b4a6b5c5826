//! Swarm Simulation Benchmark
//!
//! Standalone benchmark/demo for the simulation engine.

use std::path::Path;

use simulation::{SimulationConfig, SimulationWorld};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = match std::env::args().nth(1) {
        Some(path) => SimulationConfig::from_json_file(Path::new(&path))?,
        None => SimulationConfig::default(),
    };

    info!("Swarm simulation engine starting...");

    let initial_points = config.initial_point_count;
    let mut world = SimulationWorld::new(config)?;
    world.seed_points(initial_points);
    info!("Swarm seeded. Point count: {}", world.point_count());

    // Ten simulated seconds at 60 fps, with a scatter halfway through
    let ticks: u64 = 600;
    let frame_ms = 1000.0 / 60.0;

    info!("Running {} tick benchmark...", ticks);
    let start = std::time::Instant::now();
    for tick in 0..ticks {
        if tick == ticks / 2 {
            world.scatter_now();
        }
        world.advance(tick as f64 * frame_ms);
    }
    let elapsed = start.elapsed();

    info!(
        "Benchmark complete: {:?} total, {:?} per tick, {} points across {} occupied cells",
        elapsed,
        elapsed / ticks as u32,
        world.index.point_count(),
        world.index.occupied_cells()
    );

    Ok(())
}
