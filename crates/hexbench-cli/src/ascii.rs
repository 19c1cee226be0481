//! A text canvas: one character per tile, odd rows indented half a cell.

use std::sync::{Arc, Mutex, PoisonError};

use hexbench_core::{Canvas, Coord, Scene};
use hexbench_paths::fixtures::{CLOSED, OPEN};

/// Renders scenes to text. Clones share the last presented frame.
#[derive(Clone, Debug, Default)]
pub struct AsciiCanvas {
    back: String,
    front: Arc<Mutex<String>>,
}

impl AsciiCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last presented frame.
    pub fn frame(&self) -> String {
        self.front.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn glyph(scene: &Scene<'_>, c: Coord) -> char {
        if scene.start == Some(c) {
            return 'S';
        }
        if scene.goal == Some(c) {
            return 'G';
        }
        if scene.solution.contains(&c) {
            return '*';
        }
        let Some(tile) = scene.grid.tile(c) else {
            return ' ';
        };
        if !tile.is_passable() {
            return '#';
        }
        match tile.fill {
            Some(f) if f == OPEN => 'o',
            Some(f) if f == CLOSED => ':',
            _ => char::from_digit(u32::from(tile.weight.min(9)), 10).unwrap_or('?'),
        }
    }

    fn draw(&mut self, scene: &Scene<'_>) {
        self.back.clear();
        let v = scene.visible;
        for row in v.row_start()..v.row_end() {
            if row & 1 == 1 {
                self.back.push(' ');
            }
            for col in v.col_start()..v.col_end() {
                self.back.push(Self::glyph(scene, Coord::new(row, col)));
                self.back.push(' ');
            }
            self.back.push('\n');
        }
    }
}

impl Canvas for AsciiCanvas {
    fn render_full(&mut self, scene: &Scene<'_>) {
        self.draw(scene);
    }

    fn repaint_tiles(&mut self, scene: &Scene<'_>, tiles: &[Coord]) {
        log::trace!("repainting {} tile(s)", tiles.len());
        self.draw(scene);
    }

    fn present(&mut self) {
        let mut front = self.front.lock().unwrap_or_else(PoisonError::into_inner);
        front.clone_from(&self.back);
    }
}
