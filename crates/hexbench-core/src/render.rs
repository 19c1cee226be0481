//! The render seam between the workbench and whatever draws hexagons.
//!
//! The workbench never draws pixels itself. It hands a [`Scene`] (a borrowed
//! snapshot of everything worth drawing) to a [`Canvas`], always while the
//! session lock is held, so a canvas never sees a half-updated grid.

use crate::geom::{Coord, TileRange};
use crate::grid::TileGrid;
use crate::viewport::Viewport;

/// Everything a canvas needs to draw one frame.
#[derive(Copy, Clone, Debug)]
pub struct Scene<'a> {
    pub grid: &'a TileGrid,
    pub viewport: Viewport,
    /// Culled tile block for `viewport`.
    pub visible: TileRange,
    pub start: Option<Coord>,
    pub goal: Option<Coord>,
    /// Last reported solution, goal first.
    pub solution: &'a [Coord],
    /// Session edit generation this frame was taken at.
    pub generation: u64,
}

impl<'a> Scene<'a> {
    /// Build a scene, culling `grid` against `viewport`.
    pub fn new(grid: &'a TileGrid, viewport: Viewport) -> Self {
        Self {
            grid,
            viewport,
            visible: viewport.visible_tiles(grid),
            start: None,
            goal: None,
            solution: &[],
            generation: 0,
        }
    }

    /// Set endpoints (builder).
    pub fn with_endpoints(mut self, start: Option<Coord>, goal: Option<Coord>) -> Self {
        self.start = start;
        self.goal = goal;
        self
    }

    /// Set the overlaid solution (builder).
    pub fn with_solution(mut self, solution: &'a [Coord]) -> Self {
        self.solution = solution;
        self
    }

    /// Set the generation tag (builder).
    pub fn with_generation(mut self, generation: u64) -> Self {
        self.generation = generation;
        self
    }

    /// Whether `c` falls inside the culled block.
    #[inline]
    pub fn is_visible(&self, c: Coord) -> bool {
        self.visible.contains(c)
    }
}

/// A drawing surface.
///
/// `render_full` redraws the visible block off-screen; `repaint_tiles`
/// redraws only the listed tiles; `present` flips the result to screen.
pub trait Canvas: Send {
    fn render_full(&mut self, scene: &Scene<'_>);

    fn repaint_tiles(&mut self, scene: &Scene<'_>, tiles: &[Coord]);

    fn present(&mut self);
}

impl<C: Canvas + ?Sized> Canvas for Box<C> {
    fn render_full(&mut self, scene: &Scene<'_>) {
        (**self).render_full(scene)
    }

    fn repaint_tiles(&mut self, scene: &Scene<'_>, tiles: &[Coord]) {
        (**self).repaint_tiles(scene, tiles)
    }

    fn present(&mut self) {
        (**self).present()
    }
}

/// A canvas that draws nothing.
#[derive(Copy, Clone, Debug, Default)]
pub struct NullCanvas;

impl Canvas for NullCanvas {
    fn render_full(&mut self, _scene: &Scene<'_>) {}

    fn repaint_tiles(&mut self, _scene: &Scene<'_>, _tiles: &[Coord]) {}

    fn present(&mut self) {}
}
