//! Viewport state: where the map sits on screen and how much of it shows.

use crate::geom::{Point, TileRange};
use crate::grid::TileGrid;
use crate::hex;

/// Scroll offset and size of the visible surface, in pixels.
///
/// `offset` is the screen position of the map origin; scrolling moves it
/// towards negative values, never past the map's far edge.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Viewport {
    pub offset: Point,
    pub size: Point,
}

impl Viewport {
    #[inline]
    pub const fn new(width: i32, height: i32) -> Self {
        Self {
            offset: Point::ZERO,
            size: Point::new(width, height),
        }
    }

    /// Tiles of `grid` that may overlap the visible surface.
    pub fn visible_tiles(&self, grid: &TileGrid) -> TileRange {
        hex::cull(grid.radius(), grid.rows(), grid.cols(), self.offset, self.size.x, self.size.y)
    }

    /// Scroll by `(dx, dy)` pixels (positive moves the view right/down over
    /// the map). Returns whether the offset changed.
    pub fn scroll_by(&mut self, dx: i32, dy: i32, grid: &TileGrid) -> bool {
        let before = self.offset;
        self.offset = self.offset.shift(-dx, -dy);
        self.clamp_to(grid);
        self.offset != before
    }

    /// Resize the visible surface, re-clamping the offset. Returns whether
    /// anything changed.
    pub fn resize(&mut self, width: i32, height: i32, grid: &TileGrid) -> bool {
        let before = *self;
        self.size = Point::new(width.max(0), height.max(0));
        self.clamp_to(grid);
        *self != before
    }

    /// Move back to the map origin.
    #[inline]
    pub fn home(&mut self) {
        self.offset = Point::ZERO;
    }

    fn clamp_to(&mut self, grid: &TileGrid) {
        let (w, h) = grid.pixel_size();
        let min_x = -((w.ceil() as i32) - self.size.x).max(0);
        let min_y = -((h.ceil() as i32) - self.size.y).max(0);
        self.offset = Point::new(self.offset.x.clamp(min_x, 0), self.offset.y.clamp(min_y, 0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> TileGrid {
        // 210 x ~179 pixels.
        TileGrid::new(10, 10, 10.0).unwrap()
    }

    #[test]
    fn scroll_is_clamped_to_map() {
        let g = grid();
        let mut v = Viewport::new(100, 100);
        assert!(!v.scroll_by(-5, -5, &g));
        assert!(v.scroll_by(30, 20, &g));
        assert_eq!(v.offset, Point::new(-30, -20));
        assert!(v.scroll_by(1000, 1000, &g));
        assert_eq!(v.offset, Point::new(-110, -79));
        assert!(!v.scroll_by(1, 1, &g));
    }

    #[test]
    fn map_smaller_than_view_never_scrolls() {
        let g = grid();
        let mut v = Viewport::new(400, 400);
        assert!(!v.scroll_by(10, 10, &g));
        assert_eq!(v.offset, Point::ZERO);
    }

    #[test]
    fn resize_reclamps() {
        let g = grid();
        let mut v = Viewport::new(100, 100);
        v.scroll_by(1000, 0, &g);
        assert!(v.resize(200, 100, &g));
        assert_eq!(v.offset.x, -10);
        assert!(!v.resize(200, 100, &g));
    }

    #[test]
    fn visible_tiles_follow_offset() {
        let g = grid();
        let mut v = Viewport::new(50, 50);
        let before = v.visible_tiles(&g);
        assert!(before.contains(crate::Coord::new(0, 0)));
        v.scroll_by(100, 100, &g);
        let after = v.visible_tiles(&g);
        assert_ne!(before, after);
        assert!(!after.contains(crate::Coord::new(0, 0)));
    }
}
