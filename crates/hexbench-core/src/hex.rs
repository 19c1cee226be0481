//! Hexagonal tile layout and viewport culling.
//!
//! Tiles are pointy-top hexagons whose centres sit on a triangular lattice:
//! columns are `2·r` apart, rows are `r·√3` apart, and odd rows are shifted
//! right by half a column. `r` is the tile radius (the apothem), so any two
//! neighbouring centres are exactly `2·r` apart.

use crate::geom::{Coord, PixelPoint, Point, TileRange};

/// `√3`.
pub const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// Pixel geometry of a hex grid with a given tile radius.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HexLayout {
    radius: f64,
}

impl HexLayout {
    #[inline]
    pub const fn new(radius: f64) -> Self {
        Self { radius }
    }

    #[inline]
    pub const fn radius(self) -> f64 {
        self.radius
    }

    /// Vertical distance between consecutive rows.
    #[inline]
    pub fn row_pitch(self) -> f64 {
        self.radius * SQRT_3
    }

    /// Horizontal distance between consecutive columns.
    #[inline]
    pub fn col_pitch(self) -> f64 {
        2.0 * self.radius
    }

    /// Distance from a centre to the top/bottom vertex.
    #[inline]
    pub fn half_height(self) -> f64 {
        2.0 * self.radius / SQRT_3
    }

    /// Centre distance between two neighbouring tiles.
    #[inline]
    pub fn adjacent_distance(self) -> f64 {
        2.0 * self.radius
    }

    /// Pixel centre of the tile at `c`.
    #[inline]
    pub fn center(self, c: Coord) -> PixelPoint {
        let shift = if c.is_odd_row() { 1.0 } else { 0.0 };
        PixelPoint::new(
            self.radius * (2.0 * f64::from(c.col) + 1.0 + shift),
            self.half_height() + f64::from(c.row) * self.row_pitch(),
        )
    }

    /// Pixel extent `(width, height)` of a `rows` × `cols` map.
    pub fn map_size(self, rows: i32, cols: i32) -> (f64, f64) {
        let rows = f64::from(rows.max(0));
        let cols = f64::from(cols.max(0));
        (
            (2.0 * cols + 1.0) * self.radius,
            (3.0 * rows + 1.0) * self.radius / SQRT_3,
        )
    }
}

/// Compute the block of tiles that may be visible through a viewport.
///
/// `offset` is the screen position of the map origin (non-positive once the
/// map has been scrolled). The inverse pixel-to-grid mapping is rounded
/// outward, so the result may include up to one extra row or column on each
/// side but never misses a tile whose hexagon overlaps the viewport. The
/// result is clamped to `[0, row_count]` × `[0, col_count]`.
pub fn cull(
    radius: f64,
    row_count: i32,
    col_count: i32,
    offset: Point,
    viewport_width: i32,
    viewport_height: i32,
) -> TileRange {
    if !radius.is_finite()
        || radius <= 0.0
        || row_count <= 0
        || col_count <= 0
        || viewport_width <= 0
        || viewport_height <= 0
    {
        return TileRange::default();
    }

    let layout = HexLayout::new(radius);
    let x0 = -f64::from(offset.x);
    let x1 = x0 + f64::from(viewport_width);
    let y0 = -f64::from(offset.y);
    let y1 = y0 + f64::from(viewport_height);

    // Row `r` spans `[r·pitch, r·pitch + 2·half_height]` vertically.
    let row_pitch = layout.row_pitch();
    let row_start = ((y0 - 2.0 * layout.half_height()) / row_pitch).floor();
    let row_end = (y1 / row_pitch).ceil();

    // Column `c` spans `[2rc, 2rc + 2r]`, or one radius further right on odd
    // rows; the extra column on the left covers the shifted rows.
    let col_pitch = layout.col_pitch();
    let col_start = (x0 / col_pitch).floor() - 1.0;
    let col_end = (x1 / col_pitch).ceil();

    let range = TileRange::new(
        clamp_index(row_start, row_count),
        clamp_index(row_end, row_count),
        clamp_index(col_start, col_count),
        clamp_index(col_end, col_count),
    );
    if range.is_empty() {
        TileRange::default()
    } else {
        range
    }
}

#[inline]
fn clamp_index(v: f64, hi: i32) -> i32 {
    if v.is_nan() {
        return 0;
    }
    v.clamp(0.0, f64::from(hi)) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overlaps_viewport(layout: HexLayout, c: Coord, offset: Point, w: i32, h: i32) -> bool {
        let p = layout.center(c);
        let (x0, y0) = (-f64::from(offset.x), -f64::from(offset.y));
        let (x1, y1) = (x0 + f64::from(w), y0 + f64::from(h));
        let r = layout.radius();
        let hh = layout.half_height();
        p.x + r > x0 && p.x - r < x1 && p.y + hh > y0 && p.y - hh < y1
    }

    #[test]
    fn centers_follow_lattice() {
        let l = HexLayout::new(10.0);
        assert_eq!(l.center(Coord::new(0, 0)).x, 10.0);
        assert_eq!(l.center(Coord::new(0, 1)).x, 30.0);
        assert_eq!(l.center(Coord::new(1, 0)).x, 20.0);
        let dy = l.center(Coord::new(1, 0)).y - l.center(Coord::new(0, 0)).y;
        assert!((dy - 10.0 * SQRT_3).abs() < 1e-9);
    }

    #[test]
    fn neighbours_are_two_radii_apart() {
        let l = HexLayout::new(7.5);
        let expected = l.adjacent_distance().powi(2);
        let c = Coord::new(3, 3);
        for n in [
            Coord::new(3, 4),
            Coord::new(3, 2),
            Coord::new(2, 3),
            Coord::new(2, 4),
            Coord::new(4, 3),
            Coord::new(4, 4),
        ] {
            let d = l.center(c).distance_sq(l.center(n));
            assert!((d - expected).abs() < 1e-9, "{n} at {d}");
        }
    }

    #[test]
    fn map_size_matches_layout() {
        let l = HexLayout::new(10.0);
        let (w, h) = l.map_size(10, 10);
        assert_eq!(w, 210.0);
        assert!((h - 310.0 / SQRT_3).abs() < 1e-9);
    }

    #[test]
    fn cull_small_grid_at_origin() {
        let r = cull(10.0, 10, 10, Point::ZERO, 200, 200);
        assert!(r.row_start() >= 0 && r.row_end() <= 10);
        assert!(r.col_start() >= 0 && r.col_end() <= 10);
        assert!(r.contains(Coord::new(0, 0)));
        assert_eq!(r, TileRange::new(0, 10, 0, 10));
    }

    #[test]
    fn cull_scrolled_window() {
        let r = cull(10.0, 50, 50, Point::new(-100, -50), 50, 50);
        assert_eq!(r, TileRange::new(1, 6, 4, 8));
    }

    #[test]
    fn cull_never_misses_a_visible_tile() {
        let radius = 6.0;
        let layout = HexLayout::new(radius);
        let (rows, cols) = (30, 25);
        for &(ox, oy, w, h) in &[
            (0, 0, 40, 40),
            (-17, -33, 61, 29),
            (-150, -200, 80, 120),
            (-299, -1, 5, 5),
            (12, 8, 100, 100),
        ] {
            let offset = Point::new(ox, oy);
            let range = cull(radius, rows, cols, offset, w, h);
            for c in TileRange::full(rows, cols) {
                if overlaps_viewport(layout, c, offset, w, h) {
                    assert!(range.contains(c), "{c} missing for offset {offset} {range}");
                }
            }
            // Over-inclusion stays bounded.
            let visible_rows = (f64::from(h) / layout.row_pitch()).ceil() as i32 + 2;
            let visible_cols = (f64::from(w) / layout.col_pitch()).ceil() as i32 + 2;
            assert!(range.row_count() <= visible_rows + 2);
            assert!(range.col_count() <= visible_cols + 1);
        }
    }

    #[test]
    fn cull_degenerate_inputs_are_empty() {
        assert!(cull(0.0, 10, 10, Point::ZERO, 100, 100).is_empty());
        assert!(cull(f64::NAN, 10, 10, Point::ZERO, 100, 100).is_empty());
        assert!(cull(10.0, 0, 10, Point::ZERO, 100, 100).is_empty());
        assert!(cull(10.0, 10, 10, Point::ZERO, 0, 100).is_empty());
        // Scrolled entirely past the map.
        assert!(cull(10.0, 10, 10, Point::new(-5000, 0), 100, 100).is_empty());
    }
}
