//! Timed benchmark harness.
//!
//! Runs the algorithm start to finish several times in a row, each round a
//! single `update` with a large budget, and reports the mean wall time per
//! round. Nothing is drawn while it runs.

use std::time::{Duration, Instant};

use hexbench_core::{Coord, Settings, TileGrid};
use hexbench_paths::DrivenAlgorithm;

use crate::error::{ConfigurationFault, Fault};
use crate::lifecycle::Initialize;
use crate::validator::Validator;

/// How a benchmark is run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BenchmarkConfig {
    /// Budget for the single `update` of each round.
    pub fast_tick_budget: u32,
    /// At least one.
    pub rounds: u32,
}

impl BenchmarkConfig {
    pub fn new(fast_tick_budget: u32, rounds: u32) -> Self {
        Self {
            fast_tick_budget,
            rounds: rounds.max(1),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.fast_tick_budget, settings.rounds)
    }
}

/// Outcome of a benchmark.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BenchmarkReport {
    pub rounds: u32,
    pub fast_tick_budget: u32,
    /// Wall time across all rounds.
    pub total: Duration,
    /// `total / rounds`.
    pub mean: Duration,
    /// Whether the final round finished within its budget.
    pub completed: bool,
    /// Final round's path, goal first.
    pub solution: Vec<Coord>,
    pub faults: Vec<Fault>,
}

impl BenchmarkReport {
    /// Whether the run completed with a valid path.
    pub fn is_clean(&self) -> bool {
        self.completed && self.faults.is_empty()
    }
}

/// Benchmark `algorithm` between `start` and `goal`.
///
/// Each round enters fresh, updates once with the fast budget and exits.
/// The final round's completion state and solution are kept; a completed
/// run has its solution validated, an incomplete one reports
/// [`Fault::BenchmarkTimeout`].
pub fn run_benchmark<A: DrivenAlgorithm + ?Sized>(
    algorithm: &mut A,
    grid: &mut TileGrid,
    start: Coord,
    goal: Coord,
    config: BenchmarkConfig,
) -> BenchmarkReport {
    let rounds = config.rounds.max(1);
    grid.reset_drawing();
    let mut completed = false;
    let mut solution = Vec::new();

    let t0 = Instant::now();
    for round in 1..=rounds {
        algorithm.enter(grid, start, goal);
        algorithm.update(grid, config.fast_tick_budget);
        if round == rounds {
            completed = algorithm.is_done();
            solution = algorithm.solution();
        }
        algorithm.exit();
    }
    let total = t0.elapsed();
    let mean = total / rounds;

    let faults = if completed {
        Validator::new(grid, start, goal)
            .validate(&solution, true)
            .into_faults()
            .into_iter()
            .map(Fault::from)
            .collect()
    } else {
        log::warn!(
            "benchmark did not finish within budget {} ({rounds} round(s))",
            config.fast_tick_budget
        );
        vec![Fault::BenchmarkTimeout {
            rounds,
            fast_tick_budget: config.fast_tick_budget,
        }]
    };
    log::info!("benchmark: {rounds} round(s), total {total:?}, mean {mean:?}, completed {completed}");

    BenchmarkReport {
        rounds,
        fast_tick_budget: config.fast_tick_budget,
        total,
        mean,
        completed,
        solution,
        faults,
    }
}

impl Initialize<'_> {
    /// Benchmark from this `Initializable` session and record the outcome
    /// on it.
    pub fn benchmark<A: DrivenAlgorithm + ?Sized>(
        self,
        algorithm: &mut A,
        grid: &mut TileGrid,
        config: BenchmarkConfig,
    ) -> Result<BenchmarkReport, ConfigurationFault> {
        let (start, goal) = (self.start(), self.goal());
        let report = run_benchmark(algorithm, grid, start, goal, config);
        self.into_session().record_benchmark(&report)?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::{SearchSession, SearchState};
    use hexbench_paths::fixtures::{Scripted, StepwiseFlood};

    #[test]
    fn mean_covers_per_round_sleep() {
        let t = Duration::from_millis(10);
        let mut g = TileGrid::new(3, 3, 8.0).unwrap();
        let path = vec![Coord::new(0, 1), Coord::new(0, 0)];
        let mut alg = Scripted::sleeping(t, path.clone());
        let probe = alg.probe();
        let r = run_benchmark(&mut alg, &mut g, Coord::new(0, 0), Coord::new(0, 1), BenchmarkConfig::new(100, 5));
        assert_eq!(r.rounds, 5);
        assert!(r.mean >= t, "{:?}", r.mean);
        assert!(r.mean < t * 20, "{:?}", r.mean);
        assert_eq!(r.mean, r.total / 5);
        assert!(r.is_clean(), "{:?}", r.faults);
        assert_eq!(r.solution, path);
        assert_eq!((probe.enters(), probe.updates(), probe.exits()), (5, 5, 5));
        assert_eq!(probe.budgets(), vec![100; 5]);
    }

    #[test]
    fn unfinished_run_times_out() {
        let mut g = TileGrid::new(20, 20, 8.0).unwrap();
        let mut alg = StepwiseFlood::new();
        alg.initialize(&g);
        let r = run_benchmark(&mut alg, &mut g, Coord::new(0, 0), Coord::new(19, 19), BenchmarkConfig::new(3, 2));
        assert!(!r.completed);
        assert_eq!(
            r.faults,
            vec![Fault::BenchmarkTimeout {
                rounds: 2,
                fast_tick_budget: 3
            }]
        );
    }

    #[test]
    fn zero_rounds_means_one() {
        let mut g = TileGrid::new(3, 3, 8.0).unwrap();
        let mut alg = Scripted::new(1, vec![Coord::new(1, 1), Coord::new(0, 0)]);
        let r = run_benchmark(&mut alg, &mut g, Coord::new(0, 0), Coord::new(1, 1), BenchmarkConfig { fast_tick_budget: 1, rounds: 0 });
        assert_eq!(r.rounds, 1);
        assert!(r.completed);
    }

    #[test]
    fn records_on_session() {
        let mut g = TileGrid::new(8, 8, 8.0).unwrap();
        let mut alg = StepwiseFlood::new();
        alg.initialize(&g);
        let mut s = SearchSession::new(0);
        s.set_endpoints(&g, Coord::new(0, 0), Coord::new(7, 7)).unwrap();
        let init = s.initializable().unwrap();
        let r = init.benchmark(&mut alg, &mut g, BenchmarkConfig::new(10_000, 3)).unwrap();
        assert!(r.is_clean(), "{:?}", r.faults);
        assert_eq!(s.state(), SearchState::Done);
        assert_eq!(s.last_solution(), r.solution.as_slice());
        assert!(!s.is_entered());
        assert!(s.is_consistent());

        let mut s = SearchSession::new(0);
        s.set_endpoints(&g, Coord::new(0, 0), Coord::new(7, 7)).unwrap();
        let r = s.initializable().unwrap().benchmark(&mut alg, &mut g, BenchmarkConfig::new(1, 1)).unwrap();
        assert!(!r.completed);
        assert_eq!(s.state(), SearchState::Initializable);
    }
}
