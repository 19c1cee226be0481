//! Reference algorithms for exercising the workbench.
//!
//! None of these is meant as a product feature: [`StepwiseFlood`] is a
//! plain breadth-first flood that exposes its frontier on the tiles,
//! [`Scripted`] replays a fixed path after a fixed number of ticks, and
//! [`Scripted::sleeping`] adds a per-update delay for timing tests. All of
//! them report what the workbench asked of them through a shared [`Probe`].

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use hexbench_core::{Canvas, Color, Coord, Scene, TileGrid};

use crate::neighbors::HexNeighbors;
use crate::traits::{DrivenAlgorithm, IncrementalRedraw};

/// Fill for tiles waiting on the frontier.
pub const OPEN: Color = Color::from_rgb(96, 160, 255);
/// Fill for expanded tiles.
pub const CLOSED: Color = Color::from_rgb(40, 80, 160);
/// Parent link colour.
pub const PARENT: Color = Color::from_rgb(255, 200, 0);

// ---------------------------------------------------------------------------
// Probe
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct ProbeState {
    initializes: AtomicUsize,
    enters: AtomicUsize,
    updates: AtomicUsize,
    exits: AtomicUsize,
    shutdowns: AtomicUsize,
    in_update: AtomicBool,
    entered: AtomicBool,
    budgets: Mutex<Vec<u32>>,
}

/// Shared counters describing how an algorithm has been driven.
///
/// Clones observe the same state.
#[derive(Clone, Debug, Default)]
pub struct Probe {
    state: Arc<ProbeState>,
}

impl Probe {
    pub fn initializes(&self) -> usize {
        self.state.initializes.load(Ordering::SeqCst)
    }

    pub fn enters(&self) -> usize {
        self.state.enters.load(Ordering::SeqCst)
    }

    pub fn updates(&self) -> usize {
        self.state.updates.load(Ordering::SeqCst)
    }

    pub fn exits(&self) -> usize {
        self.state.exits.load(Ordering::SeqCst)
    }

    pub fn shutdowns(&self) -> usize {
        self.state.shutdowns.load(Ordering::SeqCst)
    }

    /// Whether an `update` call is executing right now.
    pub fn in_update(&self) -> bool {
        self.state.in_update.load(Ordering::SeqCst)
    }

    /// Whether `enter` has been called without a matching `exit`.
    pub fn is_entered(&self) -> bool {
        self.state.entered.load(Ordering::SeqCst)
    }

    /// Every budget passed to `update`, in call order.
    pub fn budgets(&self) -> Vec<u32> {
        self.state.budgets.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn on_initialize(&self) {
        self.state.initializes.fetch_add(1, Ordering::SeqCst);
    }

    fn on_enter(&self) {
        self.state.enters.fetch_add(1, Ordering::SeqCst);
        self.state.entered.store(true, Ordering::SeqCst);
    }

    fn on_update_begin(&self, budget: u32) {
        self.state.in_update.store(true, Ordering::SeqCst);
        self.state.updates.fetch_add(1, Ordering::SeqCst);
        self.state
            .budgets
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(budget);
    }

    fn on_update_end(&self) {
        self.state.in_update.store(false, Ordering::SeqCst);
    }

    fn on_exit(&self) {
        self.state.exits.fetch_add(1, Ordering::SeqCst);
        self.state.entered.store(false, Ordering::SeqCst);
    }

    fn on_shutdown(&self) {
        self.state.shutdowns.fetch_add(1, Ordering::SeqCst);
    }
}

// ---------------------------------------------------------------------------
// StepwiseFlood
// ---------------------------------------------------------------------------

/// Breadth-first flood over passable tiles, one expansion per budget unit.
///
/// Reaches `Done` with an empty solution when the goal is unreachable.
#[derive(Debug, Default)]
pub struct StepwiseFlood {
    cols: i32,
    goal: Coord,
    parents: Vec<Option<Coord>>,
    seen: Vec<bool>,
    frontier: VecDeque<Coord>,
    solution: Vec<Coord>,
    done: bool,
    touched: Vec<Coord>,
    expansions: usize,
    probe: Probe,
}

impl StepwiseFlood {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn probe(&self) -> Probe {
        self.probe.clone()
    }

    /// Tiles expanded so far in the current search.
    pub fn expansions(&self) -> usize {
        self.expansions
    }

    #[inline]
    fn idx(&self, c: Coord) -> usize {
        c.row as usize * self.cols as usize + c.col as usize
    }

    fn discover(&mut self, grid: &mut TileGrid, c: Coord, parent: Option<Coord>) {
        let i = self.idx(c);
        self.seen[i] = true;
        self.parents[i] = parent;
        self.frontier.push_back(c);
        self.touched.push(c);
        if let Some(t) = grid.tile_mut(c) {
            t.set_fill(Some(OPEN));
            if let Some(p) = parent {
                t.add_line(p, PARENT);
            }
        }
    }

    fn trace_back(&self) -> Vec<Coord> {
        let mut path = vec![self.goal];
        let mut cur = self.goal;
        while let Some(p) = self.parents[self.idx(cur)] {
            path.push(p);
            cur = p;
        }
        path
    }

    fn expand_one(&mut self, grid: &mut TileGrid, nb: &mut HexNeighbors) {
        let Some(cur) = self.frontier.pop_front() else {
            log::debug!("flood exhausted after {} expansions, goal unreachable", self.expansions);
            self.done = true;
            return;
        };
        self.expansions += 1;
        if let Some(t) = grid.tile_mut(cur) {
            t.set_fill(Some(CLOSED));
        }
        self.touched.push(cur);
        if cur == self.goal {
            self.solution = self.trace_back();
            self.done = true;
            log::debug!(
                "flood reached goal after {} expansions, path length {}",
                self.expansions,
                self.solution.len()
            );
            return;
        }
        let next: Vec<Coord> = nb
            .all(cur, |n| grid.is_passable(n) && !self.seen[self.idx(n)])
            .to_vec();
        for n in next {
            self.discover(grid, n, Some(cur));
        }
    }
}

impl DrivenAlgorithm for StepwiseFlood {
    fn initialize(&mut self, grid: &TileGrid) {
        self.probe.on_initialize();
        self.cols = grid.cols();
    }

    fn enter(&mut self, grid: &mut TileGrid, start: Coord, goal: Coord) {
        self.probe.on_enter();
        let len = grid.bounds().len();
        self.cols = grid.cols();
        self.goal = goal;
        self.parents = vec![None; len];
        self.seen = vec![false; len];
        self.frontier.clear();
        self.solution.clear();
        self.touched.clear();
        self.done = false;
        self.expansions = 0;
        if grid.contains(start) {
            self.discover(grid, start, None);
        }
    }

    fn update(&mut self, grid: &mut TileGrid, tick_budget: u32) {
        self.probe.on_update_begin(tick_budget);
        let mut nb = HexNeighbors::new();
        for _ in 0..tick_budget.max(1) {
            if self.done {
                break;
            }
            self.expand_one(grid, &mut nb);
        }
        self.probe.on_update_end();
    }

    fn is_done(&self) -> bool {
        self.done
    }

    fn solution(&self) -> Vec<Coord> {
        self.solution.clone()
    }

    fn exit(&mut self) {
        self.probe.on_exit();
        self.frontier.clear();
        self.touched.clear();
    }

    fn shutdown(&mut self) {
        self.probe.on_shutdown();
        self.parents = Vec::new();
        self.seen = Vec::new();
    }

    fn incremental(&mut self) -> Option<&mut dyn IncrementalRedraw> {
        Some(self)
    }
}

impl IncrementalRedraw for StepwiseFlood {
    fn begin_redraw(&mut self, _scene: &Scene<'_>, _canvas: &mut dyn Canvas) {
        self.touched.clear();
    }

    fn end_redraw(&mut self, scene: &Scene<'_>, canvas: &mut dyn Canvas) {
        let visible: Vec<Coord> = self.touched.drain(..).filter(|&c| scene.is_visible(c)).collect();
        if !visible.is_empty() {
            canvas.repaint_tiles(scene, &visible);
        }
    }
}

// ---------------------------------------------------------------------------
// Scripted
// ---------------------------------------------------------------------------

/// Finishes after a fixed number of `update` calls and reports a fixed path,
/// whatever the endpoints.
#[derive(Debug, Clone, Default)]
pub struct Scripted {
    ticks_to_finish: usize,
    path: Vec<Coord>,
    delay: Duration,
    ticks: usize,
    probe: Probe,
}

impl Scripted {
    /// Done after `ticks_to_finish` updates (0 means done right after
    /// `enter`), reporting `path`.
    pub fn new(ticks_to_finish: usize, path: Vec<Coord>) -> Self {
        Self {
            ticks_to_finish,
            path,
            ..Self::default()
        }
    }

    /// Done after one update that sleeps for `per_update`.
    pub fn sleeping(per_update: Duration, path: Vec<Coord>) -> Self {
        Self::new(1, path).with_delay(per_update)
    }

    /// Sleep this long inside every `update` (builder).
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn probe(&self) -> Probe {
        self.probe.clone()
    }
}

impl DrivenAlgorithm for Scripted {
    fn initialize(&mut self, _grid: &TileGrid) {
        self.probe.on_initialize();
    }

    fn enter(&mut self, _grid: &mut TileGrid, _start: Coord, _goal: Coord) {
        self.probe.on_enter();
        self.ticks = 0;
    }

    fn update(&mut self, grid: &mut TileGrid, tick_budget: u32) {
        self.probe.on_update_begin(tick_budget);
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        self.ticks += 1;
        if let Some(t) = self.path.get(self.ticks - 1).and_then(|&c| grid.tile_mut(c)) {
            t.set_marker(Some(OPEN));
        }
        self.probe.on_update_end();
    }

    fn is_done(&self) -> bool {
        self.ticks >= self.ticks_to_finish
    }

    fn solution(&self) -> Vec<Coord> {
        if self.is_done() { self.path.clone() } else { Vec::new() }
    }

    fn exit(&mut self) {
        self.probe.on_exit();
    }

    fn shutdown(&mut self) {
        self.probe.on_shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexbench_core::Viewport;
    use hexbench_core::fixtures::RecordingCanvas;

    fn run_to_done(alg: &mut StepwiseFlood, grid: &mut TileGrid, budget: u32) -> usize {
        let mut ticks = 0;
        while !alg.is_done() {
            alg.update(grid, budget);
            ticks += 1;
            assert!(ticks < 10_000);
        }
        ticks
    }

    #[test]
    fn flood_finds_goal_to_start_path() {
        let mut g = TileGrid::new(6, 6, 8.0).unwrap();
        let mut alg = StepwiseFlood::new();
        alg.initialize(&g);
        let (start, goal) = (Coord::new(0, 0), Coord::new(5, 5));
        alg.enter(&mut g, start, goal);
        run_to_done(&mut alg, &mut g, 0);
        let path = alg.solution();
        assert_eq!(path.first(), Some(&goal));
        assert_eq!(path.last(), Some(&start));
        assert_eq!(path.len() as i32, crate::hex_distance(start, goal) + 1);
        for w in path.windows(2) {
            assert!(crate::are_adjacent(w[0], w[1]));
        }
        assert!(g.tile(start).unwrap().fill.is_some());
    }

    #[test]
    fn flood_budget_is_expansions() {
        let mut g = TileGrid::new(10, 10, 8.0).unwrap();
        let mut alg = StepwiseFlood::new();
        alg.enter(&mut g, Coord::new(0, 0), Coord::new(9, 9));
        alg.update(&mut g, 0);
        assert_eq!(alg.expansions(), 1);
        alg.update(&mut g, 5);
        assert_eq!(alg.expansions(), 6);
        assert_eq!(alg.probe().budgets(), vec![0, 5]);
    }

    #[test]
    fn flood_walled_off_goal_finishes_empty() {
        // Row 1 is a wall.
        let mut w = vec![1u8; 16];
        for c in 0..4 {
            w[4 + c] = 0;
        }
        let mut g = TileGrid::from_weights(4, 4, 8.0, w).unwrap();
        let mut alg = StepwiseFlood::new();
        alg.enter(&mut g, Coord::new(0, 0), Coord::new(3, 3));
        run_to_done(&mut alg, &mut g, 3);
        assert!(alg.solution().is_empty());
    }

    #[test]
    fn flood_repaints_only_visible_touched_tiles() {
        let mut g = TileGrid::new(40, 40, 8.0).unwrap();
        let mut alg = StepwiseFlood::new();
        let mut rec = RecordingCanvas::new();
        alg.enter(&mut g, Coord::new(0, 0), Coord::new(39, 39));
        let vp = Viewport::new(40, 40);

        let scene = Scene::new(&g, vp);
        alg.incremental().unwrap().begin_redraw(&scene, &mut rec);
        alg.update(&mut g, 1);
        let scene = Scene::new(&g, vp);
        alg.incremental().unwrap().end_redraw(&scene, &mut rec);

        let log = rec.log();
        assert_eq!(log.partial_repaints, 1);
        assert!(log.repainted_tiles.contains(&Coord::new(0, 0)));
        assert!(log.repainted_tiles.iter().all(|&c| scene.is_visible(c)));
    }

    #[test]
    fn scripted_counts_ticks() {
        let path = vec![Coord::new(1, 1), Coord::new(0, 1)];
        let mut alg = Scripted::new(2, path.clone());
        let probe = alg.probe();
        let mut g = TileGrid::new(3, 3, 5.0).unwrap();
        alg.enter(&mut g, Coord::new(0, 1), Coord::new(1, 1));
        assert!(probe.is_entered());
        alg.update(&mut g, 7);
        assert!(!alg.is_done());
        assert!(alg.solution().is_empty());
        alg.update(&mut g, 7);
        assert!(alg.is_done());
        assert_eq!(alg.solution(), path);
        alg.exit();
        assert!(!probe.is_entered());
        assert_eq!((probe.enters(), probe.updates(), probe.exits()), (1, 2, 1));
        assert!(alg.incremental().is_none());
    }
}
