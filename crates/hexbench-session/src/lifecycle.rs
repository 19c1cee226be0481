//! The search lifecycle state machine.
//!
//! ```text
//!            set_endpoints              begin_or_step
//!   Idle ─────────────────▶ Initializable ─────────────▶ Active ──┐ tick
//!    ▲                                                     │  ◀───┘
//!    │                    reset (exit if entered)          │ is_done
//!    └──────────────────────────────────────────────  Done ◀┘
//! ```
//!
//! Actions that need a particular state take a typed handle that can only
//! be obtained from the matching guard: [`SearchSession::initializable`]
//! yields an [`Initialize`] and [`SearchSession::runnable`] yields a
//! [`Run`].

use std::time::{Duration, Instant};

use hexbench_core::{Coord, TileGrid};
use hexbench_paths::DrivenAlgorithm;

use crate::benchmark::BenchmarkReport;
use crate::error::ConfigurationFault;

/// Where a session is in its lifecycle.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchState {
    #[default]
    Idle,
    Initializable,
    Active,
    Done,
}

/// How a session is being advanced.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BeginMode {
    /// Continuous run: ticks use the session's tick budget; beginning does
    /// not tick.
    Run,
    /// Single step: ticks use a budget of 0; beginning also ticks once.
    Step,
}

/// One search over a grid.
///
/// Every mutation bumps [`generation`](Self::generation).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchSession {
    state: SearchState,
    start: Option<Coord>,
    goal: Option<Coord>,
    tick_budget: u32,
    elapsed: Duration,
    iterations: u64,
    last_solution: Vec<Coord>,
    generation: u64,
    entered: bool,
}

impl SearchSession {
    pub fn new(tick_budget: u32) -> Self {
        Self {
            tick_budget,
            ..Self::default()
        }
    }

    #[inline]
    pub fn state(&self) -> SearchState {
        self.state
    }

    #[inline]
    pub fn start(&self) -> Option<Coord> {
        self.start
    }

    #[inline]
    pub fn goal(&self) -> Option<Coord> {
        self.goal
    }

    #[inline]
    pub fn tick_budget(&self) -> u32 {
        self.tick_budget
    }

    /// Wall time spent in ticks since the search began.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    #[inline]
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// The path reported when the search finished, goal first.
    #[inline]
    pub fn last_solution(&self) -> &[Coord] {
        &self.last_solution
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether the algorithm has been entered and not yet exited.
    #[inline]
    pub fn is_entered(&self) -> bool {
        self.entered
    }

    #[inline]
    pub fn can_initialize(&self) -> bool {
        self.state == SearchState::Initializable
    }

    #[inline]
    pub fn can_run(&self) -> bool {
        self.state == SearchState::Active
    }

    #[inline]
    pub fn is_done(&self) -> bool {
        self.state == SearchState::Done
    }

    #[inline]
    fn touch(&mut self) {
        self.generation += 1;
    }

    fn is_pristine(&self) -> bool {
        self.state == SearchState::Idle
            && !self.entered
            && self.start.is_none()
            && self.goal.is_none()
            && self.iterations == 0
            && self.elapsed.is_zero()
            && self.last_solution.is_empty()
    }

    /// Return to `Idle`, calling the algorithm's `exit` first if it was
    /// entered, and clear tile drawing, timing and the last solution.
    /// Resetting a pristine session changes nothing.
    pub fn reset<A: DrivenAlgorithm + ?Sized>(&mut self, algorithm: &mut A, grid: &mut TileGrid) {
        grid.reset_drawing();
        if self.is_pristine() {
            return;
        }
        if self.entered {
            algorithm.exit();
            self.entered = false;
        }
        log::info!("session reset from {:?}", self.state);
        self.state = SearchState::Idle;
        self.start = None;
        self.goal = None;
        self.elapsed = Duration::ZERO;
        self.iterations = 0;
        self.last_solution.clear();
        self.touch();
    }

    /// Check `start`/`goal` against `grid` without touching the session.
    pub fn check_endpoints(grid: &TileGrid, start: Coord, goal: Coord) -> Result<(), ConfigurationFault> {
        check_tile(grid, start)?;
        check_tile(grid, goal)?;
        if start == goal {
            return Err(ConfigurationFault::SameEndpoints(start));
        }
        Ok(())
    }

    /// Configure the endpoints, moving to `Initializable`.
    ///
    /// Fails with no change if the session is `Active` or `Done`, or if
    /// either tile is outside the grid or impassable, or if they coincide.
    pub fn set_endpoints(&mut self, grid: &TileGrid, start: Coord, goal: Coord) -> Result<(), ConfigurationFault> {
        if matches!(self.state, SearchState::Active | SearchState::Done) {
            return Err(ConfigurationFault::SessionInProgress);
        }
        Self::check_endpoints(grid, start, goal)?;
        self.start = Some(start);
        self.goal = Some(goal);
        self.state = SearchState::Initializable;
        self.touch();
        log::debug!("endpoints set: {start} -> {goal}");
        Ok(())
    }

    pub fn set_tick_budget(&mut self, budget: u32) {
        self.tick_budget = budget;
        self.touch();
    }

    /// Handle for beginning the search, if the session is `Initializable`.
    pub fn initializable(&mut self) -> Option<Initialize<'_>> {
        if !self.can_initialize() {
            return None;
        }
        let (start, goal) = (self.start?, self.goal?);
        Some(Initialize {
            session: self,
            start,
            goal,
        })
    }

    /// Handle for ticking the search, if the session is `Active`.
    pub fn runnable(&mut self) -> Option<Run<'_>> {
        if self.can_run() { Some(Run { session: self }) } else { None }
    }

    /// Begin the search (`Initializable`), or tick it once (`Active`).
    /// Returns the resulting state, or `None` if neither applies.
    pub fn begin_or_step<A: DrivenAlgorithm + ?Sized>(
        &mut self,
        algorithm: &mut A,
        grid: &mut TileGrid,
        mode: BeginMode,
    ) -> Option<SearchState> {
        if let Some(init) = self.initializable() {
            return Some(init.begin(algorithm, grid, mode));
        }
        self.runnable().map(|run| run.tick(algorithm, grid, mode))
    }

    /// Install the outcome of a timed benchmark run from `Initializable`.
    ///
    /// A completed run moves to `Done` with the final round's solution; the
    /// algorithm has already been exited. A timed-out run stays
    /// `Initializable`.
    pub fn record_benchmark(&mut self, report: &BenchmarkReport) -> Result<(), ConfigurationFault> {
        if !self.can_initialize() {
            return Err(ConfigurationFault::SessionInProgress);
        }
        self.elapsed = report.total;
        self.iterations = u64::from(report.rounds);
        if report.completed {
            self.state = SearchState::Done;
            self.last_solution = report.solution.clone();
        }
        self.touch();
        Ok(())
    }

    /// Whether the session's fields agree with its state.
    pub fn is_consistent(&self) -> bool {
        let endpoints = self.start.is_some() && self.goal.is_some();
        match self.state {
            SearchState::Idle => {
                !self.entered
                    && self.start.is_none()
                    && self.goal.is_none()
                    && self.iterations == 0
                    && self.last_solution.is_empty()
            }
            SearchState::Initializable => endpoints && !self.entered && self.last_solution.is_empty(),
            SearchState::Active => endpoints && self.entered && self.last_solution.is_empty(),
            SearchState::Done => endpoints,
        }
    }

    fn tick<A: DrivenAlgorithm + ?Sized>(&mut self, algorithm: &mut A, grid: &mut TileGrid, mode: BeginMode) {
        let budget = match mode {
            BeginMode::Run => self.tick_budget,
            BeginMode::Step => 0,
        };
        let t0 = Instant::now();
        algorithm.update(grid, budget);
        self.elapsed += t0.elapsed();
        self.iterations += 1;
        self.finish_if_done(algorithm);
        self.touch();
        log::debug!("tick {} (budget {budget}) -> {:?}", self.iterations, self.state);
    }

    fn finish_if_done<A: DrivenAlgorithm + ?Sized>(&mut self, algorithm: &A) {
        if algorithm.is_done() {
            self.state = SearchState::Done;
            self.last_solution = algorithm.solution();
            log::info!(
                "search done after {} iteration(s) in {:?}, path length {}",
                self.iterations,
                self.elapsed,
                self.last_solution.len()
            );
        }
    }
}

/// Check that `c` is an in-grid, passable tile.
pub fn check_tile(grid: &TileGrid, c: Coord) -> Result<(), ConfigurationFault> {
    match grid.tile(c) {
        None => Err(ConfigurationFault::OutOfGrid(c)),
        Some(t) if !t.is_passable() => Err(ConfigurationFault::Impassable(c)),
        Some(_) => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Guard handles
// ---------------------------------------------------------------------------

/// Proof that a session is `Initializable`.
pub struct Initialize<'a> {
    session: &'a mut SearchSession,
    start: Coord,
    goal: Coord,
}

impl<'a> Initialize<'a> {
    #[inline]
    pub fn start(&self) -> Coord {
        self.start
    }

    #[inline]
    pub fn goal(&self) -> Coord {
        self.goal
    }

    /// Enter the algorithm and move to `Active` (or straight to `Done` if
    /// the algorithm finishes). In [`BeginMode::Step`] also ticks once.
    pub fn begin<A: DrivenAlgorithm + ?Sized>(self, algorithm: &mut A, grid: &mut TileGrid, mode: BeginMode) -> SearchState {
        let s = self.session;
        grid.reset_drawing();
        s.elapsed = Duration::ZERO;
        s.iterations = 0;
        s.last_solution.clear();
        algorithm.enter(grid, self.start, self.goal);
        s.entered = true;
        s.state = SearchState::Active;
        s.touch();
        log::info!("search entered: {} -> {}", self.start, self.goal);
        s.finish_if_done(algorithm);
        if mode == BeginMode::Step && s.state == SearchState::Active {
            s.tick(algorithm, grid, mode);
        }
        s.state
    }

    pub(crate) fn into_session(self) -> &'a mut SearchSession {
        self.session
    }
}

/// Proof that a session is `Active`.
pub struct Run<'a> {
    session: &'a mut SearchSession,
}

impl Run<'_> {
    /// Advance the algorithm by one tick.
    pub fn tick<A: DrivenAlgorithm + ?Sized>(self, algorithm: &mut A, grid: &mut TileGrid, mode: BeginMode) -> SearchState {
        self.session.tick(algorithm, grid, mode);
        self.session.state
    }
}
