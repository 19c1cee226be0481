//! `hexbench`: headless front end for the hex pathfinding workbench.
//!
//! ```text
//! hexbench [run|bench] [rows] [cols] [rounds] [budget] [seed] [wall%]
//! ```
//!
//! `run` drives a watched search on the worker thread and prints the final
//! frame; `bench` runs the timed benchmark. The algorithm is the reference
//! breadth-first flood.

mod ascii;

use std::env;
use std::error::Error;
use std::sync::mpsc;
use std::time::Duration;

use hexbench_core::{Settings, TileGrid};
use hexbench_paths::fixtures::StepwiseFlood;
use hexbench_session::{NoRepaint, Workbench};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use ascii::AsciiCanvas;

/// Largest map the front end will generate.
const MAX_TILES: usize = 1 << 24;

/// Number of tiles in a `rows` × `cols` map; negative sizes count as empty.
fn tile_count(rows: i32, cols: i32) -> Result<usize, Box<dyn Error>> {
    let (rows, cols) = (rows.max(0) as usize, cols.max(0) as usize);
    match rows.checked_mul(cols) {
        Some(n) if n <= MAX_TILES => Ok(n),
        _ => Err(format!("a {rows}x{cols} grid exceeds {MAX_TILES} tiles").into()),
    }
}

/// Random weights 1..=4 with `wall_percent`% impassable tiles; the corners
/// stay passable.
fn random_grid(rows: i32, cols: i32, wall_percent: u32, seed: u64) -> Result<TileGrid, Box<dyn Error>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let len = tile_count(rows, cols)?;
    let mut weights: Vec<u8> = (0..len)
        .map(|_| {
            if rng.random_range(0..100) < wall_percent {
                0
            } else {
                rng.random_range(1..=4)
            }
        })
        .collect();
    if let Some(w) = weights.first_mut() {
        *w = 1;
    }
    if let Some(w) = weights.last_mut() {
        *w = 1;
    }
    Ok(TileGrid::from_weights(rows, cols, 1.0, weights)?)
}

fn run_watched(grid: TileGrid, settings: Settings) -> Result<(), Box<dyn Error>> {
    let (tx, rx) = mpsc::channel();
    let canvas = AsciiCanvas::new();
    let wb = Workbench::spawn(
        grid,
        StepwiseFlood::new(),
        canvas.clone(),
        move || {
            let _ = tx.send(());
        },
        settings,
    )?;
    if !wb.can_initialize() {
        return Err("corner endpoints could not be armed".into());
    }
    wb.run_toggle();
    rx.recv_timeout(Duration::from_secs(60))?;
    wb.paint();

    let snap = wb.snapshot();
    println!("{}", canvas.frame());
    log::info!(
        "{:?} after {} iteration(s) in {:?}; path length {}",
        snap.state,
        snap.iterations,
        snap.elapsed,
        snap.solution.len()
    );
    for fault in wb.drain_faults() {
        log::warn!("{fault}");
    }
    Ok(())
}

fn run_bench(grid: TileGrid, settings: Settings) -> Result<(), Box<dyn Error>> {
    let wb = Workbench::manual(grid, StepwiseFlood::new(), AsciiCanvas::new(), NoRepaint, settings)?;
    let config = wb.benchmark_config();
    let report = wb.timed_benchmark(config.fast_tick_budget, config.rounds)?;
    log::info!(
        "{} round(s): total {:?}, mean {:?}, completed {}",
        report.rounds,
        report.total,
        report.mean,
        report.completed
    );
    for fault in &report.faults {
        log::warn!("{fault}");
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let mode = args.get(1).map(String::as_str).unwrap_or("run");
    let rows: i32 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(20);
    let cols: i32 = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(30);
    let rounds: u32 = args.get(4).and_then(|s| s.parse().ok()).unwrap_or(5);
    let budget: u32 = args.get(5).and_then(|s| s.parse().ok()).unwrap_or(100_000);
    let seed: u64 = args.get(6).and_then(|s| s.parse().ok()).unwrap_or(7);
    let walls: u32 = args.get(7).and_then(|s| s.parse().ok()).unwrap_or(20);

    log::info!("=== hexbench {mode} ===");
    log::info!("Grid: {rows}x{cols}, walls {walls}%, seed {seed}");

    let settings = Settings::default()
        .with_rounds(rounds)
        .with_fast_tick_budget(budget)
        .with_tick_budget(4);
    let grid = random_grid(rows, cols, walls.min(100), seed)?;

    match mode {
        "run" => run_watched(grid, settings),
        "bench" => run_bench(grid, settings),
        other => Err(format!("unknown mode {other:?}; expected run or bench").into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_count_widens_before_multiplying() {
        assert_eq!(tile_count(20, 30).unwrap(), 600);
        assert_eq!(tile_count(-3, 30).unwrap(), 0);
        assert_eq!(tile_count(4096, 4096).unwrap(), MAX_TILES);
        assert!(tile_count(i32::MAX, 2).is_err());
        assert!(tile_count(i32::MAX, i32::MAX).is_err());
    }

    #[test]
    fn oversized_grid_is_an_error_not_a_panic() {
        assert!(random_grid(i32::MAX, i32::MAX, 0, 1).is_err());
        assert!(random_grid(0, 5, 0, 1).is_err());
    }

    #[test]
    fn random_grid_keeps_corners_open() {
        let g = random_grid(6, 7, 100, 3).unwrap();
        assert!(g.is_passable(hexbench_core::Coord::new(0, 0)));
        assert!(g.is_passable(hexbench_core::Coord::new(5, 6)));
        assert!(!g.is_passable(hexbench_core::Coord::new(2, 3)));
    }
}
