//! Test doubles for the render seam.

use std::sync::{Arc, Mutex, PoisonError};

use crate::geom::Coord;
use crate::render::{Canvas, Scene};

/// What a [`RecordingCanvas`] has been asked to do so far.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CanvasLog {
    pub full_renders: usize,
    pub partial_repaints: usize,
    pub repainted_tiles: Vec<Coord>,
    pub presents: usize,
    /// Scene generation of every render or repaint, in call order.
    pub generations: Vec<u64>,
}

/// A canvas that records calls instead of drawing.
///
/// Clones share one log, so a test can keep a handle after moving the
/// canvas into a workbench.
#[derive(Clone, Debug, Default)]
pub struct RecordingCanvas {
    log: Arc<Mutex<CanvasLog>>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the log.
    pub fn log(&self) -> CanvasLog {
        self.log.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        *self.log.lock().unwrap_or_else(PoisonError::into_inner) = CanvasLog::default();
    }

    fn with_log(&self, f: impl FnOnce(&mut CanvasLog)) {
        f(&mut self.log.lock().unwrap_or_else(PoisonError::into_inner));
    }
}

impl Canvas for RecordingCanvas {
    fn render_full(&mut self, scene: &Scene<'_>) {
        self.with_log(|l| {
            l.full_renders += 1;
            l.generations.push(scene.generation);
        });
    }

    fn repaint_tiles(&mut self, scene: &Scene<'_>, tiles: &[Coord]) {
        self.with_log(|l| {
            l.partial_repaints += 1;
            l.repainted_tiles.extend_from_slice(tiles);
            l.generations.push(scene.generation);
        });
    }

    fn present(&mut self) {
        self.with_log(|l| l.presents += 1);
    }
}
