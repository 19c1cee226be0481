//! The concurrency coordinator: one session lock shared by a worker thread
//! driving the algorithm and a UI thread issuing commands and painting.
//!
//! Everything mutable lives in one [`BenchState`] behind one `Mutex`. A
//! `Condvar` paired with it only schedules the worker (run toggles and
//! shutdown wake it). Commands take the lock, mutate, release, and report
//! whether the caller should repaint; the caller repaints outside the lock
//! by calling [`Workbench::paint`].
//!
//! There is no per-tick timeout: an algorithm that never returns from
//! `update` stalls the worker with the lock held.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError, TryLockError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use hexbench_core::{Canvas, Coord, GridError, Scene, Settings, TileGrid, Viewport};
use hexbench_paths::DrivenAlgorithm;

use crate::benchmark::{BenchmarkConfig, BenchmarkReport};
use crate::error::{ConfigurationFault, Fault, ParameterError, WorkbenchError};
use crate::lifecycle::{BeginMode, SearchSession, SearchState};
use crate::params::{InputParameters, ParamId, Parameter, ParameterList};
use crate::validator::Validator;
use crate::worker::{self, WorkerStep};

/// Receives "please repaint" requests from the worker thread.
pub trait RepaintSink: Send + Sync {
    fn request_repaint(&self);
}

impl<F: Fn() + Send + Sync> RepaintSink for F {
    fn request_repaint(&self) {
        self()
    }
}

/// A sink that ignores repaint requests.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoRepaint;

impl RepaintSink for NoRepaint {
    fn request_repaint(&self) {}
}

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Everything guarded by the session lock.
pub(crate) struct BenchState {
    pub(crate) session: SearchSession,
    pub(crate) grid: TileGrid,
    pub(crate) algorithm: Box<dyn DrivenAlgorithm>,
    pub(crate) canvas: Box<dyn Canvas>,
    pub(crate) viewport: Viewport,
    /// Next redraw must be a full one.
    pub(crate) render_intent: bool,
    pub(crate) params: InputParameters,
    pub(crate) running: bool,
    pub(crate) faults: Vec<Fault>,
}

fn scene_of<'a>(session: &'a SearchSession, grid: &'a TileGrid, viewport: Viewport) -> Scene<'a> {
    Scene::new(grid, viewport)
        .with_endpoints(session.start(), session.goal())
        .with_solution(session.last_solution())
        .with_generation(session.generation())
}

fn fitted(mut grid: TileGrid, settings: &Settings) -> Result<TileGrid, GridError> {
    let radius = TileGrid::fit_radius(grid.rows(), grid.cols(), settings.min_tile_radius());
    grid.set_radius(radius)?;
    Ok(grid)
}

impl BenchState {
    fn new(
        grid: TileGrid,
        algorithm: Box<dyn DrivenAlgorithm>,
        canvas: Box<dyn Canvas>,
        settings: Settings,
    ) -> Result<Self, GridError> {
        let grid = fitted(grid, &settings)?;
        let (w, h) = grid.pixel_size();
        let mut st = Self {
            session: SearchSession::new(settings.tick_budget),
            params: InputParameters::new(&settings, grid.rows(), grid.cols()),
            viewport: Viewport::new(w.ceil() as i32, h.ceil() as i32),
            grid,
            algorithm,
            canvas,
            render_intent: true,
            running: false,
            faults: Vec::new(),
        };
        st.install_grid();
        Ok(st)
    }

    /// Initialize the algorithm on the current grid and arm the default
    /// endpoints.
    fn install_grid(&mut self) {
        self.algorithm.initialize(&self.grid);
        let (rows, cols) = (self.grid.rows(), self.grid.cols());
        self.params.start = Coord::new(0, 0);
        self.params.goal = Coord::new(rows - 1, cols - 1);
        self.viewport.home();
        let size = self.viewport.size;
        self.viewport.resize(size.x, size.y, &self.grid);
        self.render_intent = true;
        log::info!(
            "grid loaded: {rows}x{cols}, tile radius {:.2}",
            self.grid.radius()
        );
        let _ = self.arm_endpoints();
    }

    /// Return the session to `Idle`, exiting the algorithm if it was entered.
    pub(crate) fn teardown_session(&mut self) {
        self.session.reset(&mut *self.algorithm, &mut self.grid);
    }

    /// Configure the session with the endpoints held in the parameters.
    fn arm_endpoints(&mut self) -> Result<(), ConfigurationFault> {
        let (start, goal) = (self.params.start, self.params.goal);
        self.session.set_endpoints(&self.grid, start, goal).inspect_err(|e| {
            log::warn!("endpoints {start} -> {goal} not armed: {e}");
        })
    }

    /// Full redraw and present.
    pub(crate) fn render_full(&mut self) {
        let scene = scene_of(&self.session, &self.grid, self.viewport);
        log::debug!("full redraw of {} at generation {}", scene.visible, scene.generation);
        self.canvas.render_full(&scene);
        self.canvas.present();
        self.render_intent = self.algorithm.incremental().is_none();
    }

    /// Enter the algorithm from `Initializable` and redraw everything.
    pub(crate) fn begin(&mut self, mode: BeginMode) -> Option<SearchState> {
        let state = self
            .session
            .initializable()?
            .begin(&mut *self.algorithm, &mut self.grid, mode);
        self.render_full();
        Some(state)
    }

    /// Tick an `Active` session, redrawing fully or incrementally.
    pub(crate) fn tick(&mut self, mode: BeginMode) -> Option<SearchState> {
        if !self.session.can_run() {
            return None;
        }
        if self.render_intent || self.algorithm.incremental().is_none() {
            let state = self
                .session
                .runnable()?
                .tick(&mut *self.algorithm, &mut self.grid, mode);
            self.render_full();
            return Some(state);
        }

        let scene = scene_of(&self.session, &self.grid, self.viewport);
        if let Some(inc) = self.algorithm.incremental() {
            inc.begin_redraw(&scene, &mut *self.canvas);
        }
        let state = self
            .session
            .runnable()?
            .tick(&mut *self.algorithm, &mut self.grid, mode);
        let scene = scene_of(&self.session, &self.grid, self.viewport);
        if let Some(inc) = self.algorithm.incremental() {
            inc.end_redraw(&scene, &mut *self.canvas);
        }
        self.canvas.present();
        Some(state)
    }

    /// Validate the finished session's path, queueing any faults.
    pub(crate) fn validate_if_done(&mut self) {
        if !self.session.is_done() {
            return;
        }
        let (Some(start), Some(goal)) = (self.session.start(), self.session.goal()) else {
            return;
        };
        let report = Validator::new(&self.grid, start, goal).validate(self.session.last_solution(), true);
        self.faults.extend(report.into_faults().into_iter().map(Fault::from));
    }

    /// Tear down for good: exit and shut the algorithm down.
    fn close(&mut self) {
        self.running = false;
        self.teardown_session();
        self.algorithm.shutdown();
        log::info!("workbench closed");
    }
}

pub(crate) struct Shared {
    state: Mutex<BenchState>,
    /// Set once by [`Workbench::shutdown`]. Lives outside the session lock
    /// so a stalled `update` cannot delay it.
    stop: AtomicBool,
    pub(crate) wake: Condvar,
    pub(crate) repaint: Box<dyn RepaintSink>,
    pub(crate) interval: Duration,
    /// Upper bound on an idle wait, so a missed wake-up only delays
    /// shutdown by this much.
    pub(crate) poll: Duration,
    ack: (Mutex<bool>, Condvar),
}

impl Shared {
    /// Take the session lock, recovering from poisoning.
    pub(crate) fn lock(&self) -> MutexGuard<'_, BenchState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[inline]
    pub(crate) fn stopping(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }

    /// Called by the worker once it has stopped touching shared state.
    pub(crate) fn acknowledge_shutdown(&self) {
        let (lock, cvar) = &self.ack;
        *lock.lock().unwrap_or_else(PoisonError::into_inner) = true;
        cvar.notify_all();
    }

    /// Wait for the worker's acknowledgement, checking every `poll` and
    /// giving up after `timeout`.
    fn wait_for_ack(&self, poll: Duration, timeout: Duration) -> bool {
        let (lock, cvar) = &self.ack;
        let deadline = Instant::now() + timeout;
        let mut acked = lock.lock().unwrap_or_else(PoisonError::into_inner);
        while !*acked {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            acked = cvar
                .wait_timeout(acked, poll.min(deadline - now))
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
        true
    }
}

// ---------------------------------------------------------------------------
// Observations
// ---------------------------------------------------------------------------

/// A copy of the session and UI state taken under the lock.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionSnapshot {
    pub state: SearchState,
    pub start: Option<Coord>,
    pub goal: Option<Coord>,
    pub tick_budget: u32,
    pub elapsed: Duration,
    pub iterations: u64,
    pub solution: Vec<Coord>,
    pub generation: u64,
    pub running: bool,
    pub render_intent: bool,
    pub viewport: Viewport,
    pub pending_faults: usize,
}

/// Borrowed view of the locked state, handed to [`Workbench::inspect`].
pub struct WorkbenchView<'a> {
    pub session: &'a SearchSession,
    pub grid: &'a TileGrid,
    pub viewport: Viewport,
    pub render_intent: bool,
    pub running: bool,
}

// ---------------------------------------------------------------------------
// Workbench
// ---------------------------------------------------------------------------

/// The coordinator: owns the grid, algorithm and canvas, and the worker
/// thread that drives the algorithm.
///
/// Dropping the workbench shuts it down.
pub struct Workbench {
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
    settings: Settings,
    closed: bool,
}

impl Workbench {
    /// Build a workbench and start its worker thread.
    ///
    /// The grid's radius is refitted to the display and the algorithm is
    /// initialized on it.
    pub fn spawn<A, C, R>(
        grid: TileGrid,
        algorithm: A,
        canvas: C,
        repaint: R,
        settings: Settings,
    ) -> Result<Self, WorkbenchError>
    where
        A: DrivenAlgorithm + 'static,
        C: Canvas + 'static,
        R: RepaintSink + 'static,
    {
        let mut bench = Self::build(grid, Box::new(algorithm), Box::new(canvas), Box::new(repaint), settings)?;
        let shared = Arc::clone(&bench.shared);
        let handle = thread::Builder::new()
            .name("hexbench-worker".into())
            .spawn(move || worker::run(&shared))?;
        bench.worker = Some(handle);
        Ok(bench)
    }

    /// Build a workbench without a worker thread; drive it with
    /// [`pump`](Self::pump).
    pub fn manual<A, C, R>(
        grid: TileGrid,
        algorithm: A,
        canvas: C,
        repaint: R,
        settings: Settings,
    ) -> Result<Self, WorkbenchError>
    where
        A: DrivenAlgorithm + 'static,
        C: Canvas + 'static,
        R: RepaintSink + 'static,
    {
        Self::build(grid, Box::new(algorithm), Box::new(canvas), Box::new(repaint), settings)
    }

    fn build(
        grid: TileGrid,
        algorithm: Box<dyn DrivenAlgorithm>,
        canvas: Box<dyn Canvas>,
        repaint: Box<dyn RepaintSink>,
        settings: Settings,
    ) -> Result<Self, WorkbenchError> {
        let state = BenchState::new(grid, algorithm, canvas, settings)?;
        let shared = Shared {
            state: Mutex::new(state),
            stop: AtomicBool::new(false),
            wake: Condvar::new(),
            repaint,
            interval: settings.worker_interval(),
            poll: settings.shutdown_poll(),
            ack: (Mutex::new(false), Condvar::new()),
        };
        Ok(Self {
            shared: Arc::new(shared),
            worker: None,
            settings,
            closed: false,
        })
    }

    /// Run one worker iteration on the calling thread, without waiting.
    pub fn pump(&self) -> WorkerStep {
        worker::iterate(&self.shared)
    }

    #[inline]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    // -- commands -----------------------------------------------------------

    /// Abandon the current search and re-arm the configured endpoints.
    pub fn reset(&self) -> bool {
        let mut st = self.shared.lock();
        st.running = false;
        st.teardown_session();
        let _ = st.arm_endpoints();
        st.render_intent = true;
        true
    }

    /// Move the start endpoint. A search in progress is abandoned.
    pub fn set_start(&self, row: i32, col: i32) -> Result<bool, ConfigurationFault> {
        self.set_endpoint(Coord::new(row, col), true)
    }

    /// Move the goal endpoint. A search in progress is abandoned.
    pub fn set_goal(&self, row: i32, col: i32) -> Result<bool, ConfigurationFault> {
        self.set_endpoint(Coord::new(row, col), false)
    }

    /// The whole pair is checked before anything is torn down, so a
    /// rejected endpoint leaves the session untouched. When the other
    /// endpoint is itself unusable (a freshly loaded map with a walled
    /// corner), fix it first or edit both through the input parameters.
    fn set_endpoint(&self, c: Coord, is_start: bool) -> Result<bool, ConfigurationFault> {
        let mut st = self.shared.lock();
        let (start, goal) = if is_start {
            (c, st.params.goal)
        } else {
            (st.params.start, c)
        };
        if let Err(e) = SearchSession::check_endpoints(&st.grid, start, goal) {
            log::warn!("endpoints {start} -> {goal} rejected: {e}");
            return Err(e);
        }
        st.running = false;
        st.teardown_session();
        st.params.start = start;
        st.params.goal = goal;
        st.arm_endpoints()?;
        st.render_intent = true;
        Ok(true)
    }

    /// Start or stop continuous running.
    ///
    /// Stopping validates a finished search and always warrants a repaint.
    /// Starting renders the first frame itself and hands over to the worker.
    pub fn run_toggle(&self) -> bool {
        let mut st = self.shared.lock();
        if st.running {
            st.running = false;
            st.validate_if_done();
            return true;
        }
        if !(st.session.can_run() || st.session.can_initialize()) {
            return false;
        }
        st.running = true;
        st.render_full();
        drop(st);
        self.shared.wake.notify_all();
        false
    }

    /// Advance by one unit: begin the search if needed, otherwise tick once
    /// with a budget of 0. Stops continuous running.
    pub fn step(&self) -> bool {
        let mut st = self.shared.lock();
        st.running = false;
        let state = if st.session.can_initialize() {
            st.begin(BeginMode::Step)
        } else {
            st.tick(BeginMode::Step)
        };
        match state {
            Some(SearchState::Done) => {
                st.validate_if_done();
                true
            }
            Some(_) => true,
            None => false,
        }
    }

    /// Run the timed benchmark from a fresh session and record its outcome.
    ///
    /// Any search in progress is abandoned first. A completed benchmark
    /// leaves the session `Done`; a timed-out one leaves it `Initializable`.
    /// Faults are queued as well as returned in the report. Success always
    /// warrants a repaint.
    pub fn timed_benchmark(&self, fast_tick_budget: u32, rounds: u32) -> Result<BenchmarkReport, ConfigurationFault> {
        let mut guard = self.shared.lock();
        let st = &mut *guard;
        st.running = false;
        st.teardown_session();
        st.arm_endpoints()?;
        let config = BenchmarkConfig::new(fast_tick_budget, rounds);
        let init = st
            .session
            .initializable()
            .ok_or(ConfigurationFault::MissingEndpoints)?;
        let report = init.benchmark(&mut *st.algorithm, &mut st.grid, config)?;
        st.faults.extend(report.faults.iter().cloned());
        st.render_intent = true;
        Ok(report)
    }

    /// Scroll the view. Returns whether the UI should repaint now; while
    /// running, the worker picks up the forced full redraw instead.
    pub fn scroll_viewport(&self, dx: i32, dy: i32) -> bool {
        let mut guard = self.shared.lock();
        let st = &mut *guard;
        if !st.viewport.scroll_by(dx, dy, &st.grid) {
            return false;
        }
        st.render_intent = true;
        log::debug!("viewport scrolled to {}", st.viewport.offset);
        !st.running
    }

    /// Resize the view. Same repaint rule as [`scroll_viewport`](Self::scroll_viewport).
    pub fn resize_viewport(&self, width: i32, height: i32) -> bool {
        let mut guard = self.shared.lock();
        let st = &mut *guard;
        if !st.viewport.resize(width, height, &st.grid) {
            return false;
        }
        st.render_intent = true;
        !st.running
    }

    /// Replace the grid: abandon any search, shut the algorithm down on the
    /// old grid, fit the radius, re-initialize, and arm corner endpoints.
    pub fn load_grid(&self, grid: TileGrid) -> Result<bool, GridError> {
        let grid = fitted(grid, &self.settings)?;
        let mut st = self.shared.lock();
        st.running = false;
        st.teardown_session();
        st.algorithm.shutdown();
        st.grid = grid;
        st.install_grid();
        Ok(true)
    }

    /// Paint event: full redraw and present.
    pub fn paint(&self) {
        self.shared.lock().render_full();
    }

    // -- parameters ---------------------------------------------------------

    pub fn input_parameter_count(&self) -> usize {
        self.shared.lock().params.input_parameter_count()
    }

    pub fn input_parameter(&self, index: usize) -> Option<Parameter> {
        self.shared.lock().params.input_parameter(index)
    }

    /// Edit a parameter from raw text. Any edit stops continuous running.
    ///
    /// Endpoint edits abandon the current search and re-arm; if the new
    /// endpoints cannot be armed the value is kept and the reason returned.
    pub fn set_input_parameter(&self, index: usize, raw: &str) -> Result<bool, ParameterError> {
        let id = ParamId::from_index(index).ok_or(ParameterError::UnknownIndex(index))?;
        let mut st = self.shared.lock();
        st.params.set_input_parameter(index, raw)?;
        st.running = false;
        st.render_intent = true;
        if id.is_endpoint() {
            st.teardown_session();
            st.arm_endpoints()?;
        } else if id == ParamId::RunTickBudget {
            let budget = st.params.tick_budget;
            st.session.set_tick_budget(budget);
        }
        Ok(true)
    }

    /// Benchmark configuration from the current parameters.
    pub fn benchmark_config(&self) -> BenchmarkConfig {
        self.shared.lock().params.benchmark_config()
    }

    // -- queries ------------------------------------------------------------

    pub fn can_initialize(&self) -> bool {
        self.shared.lock().session.can_initialize()
    }

    pub fn can_run(&self) -> bool {
        self.shared.lock().session.can_run()
    }

    pub fn is_done(&self) -> bool {
        self.shared.lock().session.is_done()
    }

    pub fn is_running(&self) -> bool {
        self.shared.lock().running
    }

    /// Copy of the session and UI state, taken atomically.
    pub fn snapshot(&self) -> SessionSnapshot {
        let st = self.shared.lock();
        let s = &st.session;
        SessionSnapshot {
            state: s.state(),
            start: s.start(),
            goal: s.goal(),
            tick_budget: s.tick_budget(),
            elapsed: s.elapsed(),
            iterations: s.iterations(),
            solution: s.last_solution().to_vec(),
            generation: s.generation(),
            running: st.running,
            render_intent: st.render_intent,
            viewport: st.viewport,
            pending_faults: st.faults.len(),
        }
    }

    /// Run `f` on the locked state.
    pub fn inspect<R>(&self, f: impl FnOnce(&WorkbenchView<'_>) -> R) -> R {
        let st = self.shared.lock();
        let view = WorkbenchView {
            session: &st.session,
            grid: &st.grid,
            viewport: st.viewport,
            render_intent: st.render_intent,
            running: st.running,
        };
        f(&view)
    }

    /// Take every queued fault.
    pub fn drain_faults(&self) -> Vec<Fault> {
        std::mem::take(&mut self.shared.lock().faults)
    }

    // -- shutdown -----------------------------------------------------------

    /// Stop the worker and tear the algorithm down.
    ///
    /// Returns whether the worker acknowledged within the shutdown timeout.
    /// Calling it again does nothing.
    pub fn shutdown(&mut self) -> bool {
        if self.closed {
            return true;
        }
        self.closed = true;
        self.shared.stop.store(true, Ordering::Release);
        self.shared.wake.notify_all();

        let acked = match self.worker.take() {
            None => true,
            Some(handle) => {
                let timeout = self.settings.shutdown_timeout();
                if self.shared.wait_for_ack(self.settings.shutdown_poll(), timeout) {
                    if handle.join().is_err() {
                        log::error!("worker thread panicked");
                    }
                    true
                } else {
                    log::error!("worker did not stop within {timeout:?}; detaching it");
                    false
                }
            }
        };

        match self.shared.state.try_lock() {
            Ok(mut st) => st.close(),
            Err(TryLockError::Poisoned(p)) => p.into_inner().close(),
            Err(TryLockError::WouldBlock) => {
                log::error!("session lock still held; skipping algorithm teardown")
            }
        }
        acked
    }
}

impl Drop for Workbench {
    fn drop(&mut self) {
        self.shutdown();
    }
}
