use hexbench_core::{Canvas, Coord, Scene, TileGrid};

/// A pathfinding algorithm driven one tick at a time by the workbench.
///
/// The workbench owns the grid and calls these hooks with the session lock
/// held, so an implementation never races the renderer. Hooks may mark
/// tiles (`fill`, `outline`, `marker`, lines) to expose internal state.
///
/// Call order per grid: `initialize`, then any number of
/// `enter` → `update`* → `exit` sessions, then `shutdown`.
pub trait DrivenAlgorithm: Send {
    /// A new grid was loaded.
    fn initialize(&mut self, grid: &TileGrid);

    /// Begin a search from `start` to `goal`.
    fn enter(&mut self, grid: &mut TileGrid, start: Coord, goal: Coord);

    /// Advance the search. A budget of 0 means the smallest unit of work;
    /// larger budgets let the algorithm do more per call.
    fn update(&mut self, grid: &mut TileGrid, tick_budget: u32);

    /// Whether the search has finished, with or without a path.
    fn is_done(&self) -> bool;

    /// The path found, goal first and start last. Empty if none.
    fn solution(&self) -> Vec<Coord>;

    /// End the current search.
    fn exit(&mut self);

    /// The grid is being unloaded.
    fn shutdown(&mut self);

    /// Incremental redraw support. `None` means every tick gets a full
    /// redraw.
    fn incremental(&mut self) -> Option<&mut dyn IncrementalRedraw> {
        None
    }
}

/// Hooks bracketing an `update` so only changed tiles are repainted.
pub trait IncrementalRedraw {
    /// Called just before `update`.
    fn begin_redraw(&mut self, scene: &Scene<'_>, canvas: &mut dyn Canvas);

    /// Called just after `update`; repaint whatever changed.
    fn end_redraw(&mut self, scene: &Scene<'_>, canvas: &mut dyn Canvas);
}

impl<A: DrivenAlgorithm + ?Sized> DrivenAlgorithm for Box<A> {
    fn initialize(&mut self, grid: &TileGrid) {
        (**self).initialize(grid)
    }

    fn enter(&mut self, grid: &mut TileGrid, start: Coord, goal: Coord) {
        (**self).enter(grid, start, goal)
    }

    fn update(&mut self, grid: &mut TileGrid, tick_budget: u32) {
        (**self).update(grid, tick_budget)
    }

    fn is_done(&self) -> bool {
        (**self).is_done()
    }

    fn solution(&self) -> Vec<Coord> {
        (**self).solution()
    }

    fn exit(&mut self) {
        (**self).exit()
    }

    fn shutdown(&mut self) {
        (**self).shutdown()
    }

    fn incremental(&mut self) -> Option<&mut dyn IncrementalRedraw> {
        (**self).incremental()
    }
}
