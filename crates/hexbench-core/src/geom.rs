//! Geometry primitives: [`Point`], [`Coord`], [`PixelPoint`] and
//! [`TileRange`].
//!
//! `Point` is an integer screen-space vector (viewport offsets and sizes),
//! `Coord` addresses a tile by row and column, and `PixelPoint` is a tile
//! centre in map pixel space.

use std::fmt;
use std::ops::{Add, Neg, Sub};

// ---------------------------------------------------------------------------
// Point
// ---------------------------------------------------------------------------

/// A 2D integer point. X grows right, Y grows down (screen coordinates).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// Origin (0, 0).
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Create a new point.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Return a point shifted by (dx, dy).
    #[inline]
    pub const fn shift(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Add for Point {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Point {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

// ---------------------------------------------------------------------------
// Coord
// ---------------------------------------------------------------------------

/// Address of a tile in a [`TileGrid`](crate::TileGrid).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coord {
    pub row: i32,
    pub col: i32,
}

impl Coord {
    #[inline]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Whether the tile sits on a row shifted right by half a column.
    #[inline]
    pub const fn is_odd_row(self) -> bool {
        self.row & 1 == 1
    }
}

impl PartialOrd for Coord {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Coord {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.row.cmp(&other.row).then(self.col.cmp(&other.col))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[row {}, col {}]", self.row, self.col)
    }
}

// ---------------------------------------------------------------------------
// PixelPoint
// ---------------------------------------------------------------------------

/// A position in map pixel space.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to `other`.
    #[inline]
    pub fn distance_sq(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

// ---------------------------------------------------------------------------
// TileRange
// ---------------------------------------------------------------------------

/// A half-open block of tiles: rows `[min.row, max.row)` and columns
/// `[min.col, max.col)`.
///
/// All empty ranges compare equal.
#[derive(Copy, Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileRange {
    pub min: Coord,
    pub max: Coord,
}

impl PartialEq for TileRange {
    fn eq(&self, other: &Self) -> bool {
        (self.min == other.min && self.max == other.max) || (self.is_empty() && other.is_empty())
    }
}

impl Eq for TileRange {}

impl TileRange {
    /// Build a range from explicit row and column bounds.
    #[inline]
    pub const fn new(row_start: i32, row_end: i32, col_start: i32, col_end: i32) -> Self {
        Self {
            min: Coord::new(row_start, col_start),
            max: Coord::new(row_end, col_end),
        }
    }

    /// The whole of a `rows` × `cols` grid.
    #[inline]
    pub const fn full(rows: i32, cols: i32) -> Self {
        Self::new(0, rows, 0, cols)
    }

    #[inline]
    pub const fn row_start(self) -> i32 {
        self.min.row
    }

    #[inline]
    pub const fn row_end(self) -> i32 {
        self.max.row
    }

    #[inline]
    pub const fn col_start(self) -> i32 {
        self.min.col
    }

    #[inline]
    pub const fn col_end(self) -> i32 {
        self.max.col
    }

    /// Number of rows covered.
    #[inline]
    pub fn row_count(self) -> i32 {
        (self.max.row - self.min.row).max(0)
    }

    /// Number of columns covered.
    #[inline]
    pub fn col_count(self) -> i32 {
        (self.max.col - self.min.col).max(0)
    }

    /// Whether the range covers no tile.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.min.row >= self.max.row || self.min.col >= self.max.col
    }

    /// Total number of tiles in the range.
    #[inline]
    pub fn len(self) -> usize {
        if self.is_empty() {
            return 0;
        }
        (self.row_count() as usize) * (self.col_count() as usize)
    }

    #[inline]
    pub fn contains(self, c: Coord) -> bool {
        c.row >= self.min.row && c.row < self.max.row && c.col >= self.min.col && c.col < self.max.col
    }

    /// Intersection of two ranges (the zero range when they do not overlap).
    #[inline]
    pub fn intersect(self, other: TileRange) -> Self {
        let r = Self {
            min: Coord::new(self.min.row.max(other.min.row), self.min.col.max(other.min.col)),
            max: Coord::new(self.max.row.min(other.max.row), self.max.col.min(other.max.col)),
        };
        if r.is_empty() { Self::default() } else { r }
    }

    /// Row-major iterator over every tile address in the range.
    #[inline]
    pub fn iter(self) -> TileRangeIter {
        TileRangeIter {
            range: self,
            cur: self.min,
        }
    }
}

impl IntoIterator for TileRange {
    type Item = Coord;
    type IntoIter = TileRangeIter;
    #[inline]
    fn into_iter(self) -> TileRangeIter {
        self.iter()
    }
}

impl fmt::Display for TileRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rows {}..{}, cols {}..{}",
            self.min.row, self.max.row, self.min.col, self.max.col
        )
    }
}

/// Row-major iterator over the coordinates in a [`TileRange`].
#[derive(Clone, Debug)]
pub struct TileRangeIter {
    range: TileRange,
    cur: Coord,
}

impl Iterator for TileRangeIter {
    type Item = Coord;

    #[inline]
    fn next(&mut self) -> Option<Coord> {
        if self.range.is_empty() || self.cur.row >= self.range.max.row {
            return None;
        }
        let c = self.cur;
        self.cur.col += 1;
        if self.cur.col >= self.range.max.col {
            self.cur.col = self.range.min.col;
            self.cur.row += 1;
        }
        Some(c)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.range.is_empty() || self.cur.row >= self.range.max.row {
            return (0, Some(0));
        }
        let w = self.range.col_count() as usize;
        let remaining_in_row = (self.range.max.col - self.cur.col) as usize;
        let remaining_rows = (self.range.max.row - self.cur.row - 1) as usize;
        let total = remaining_in_row + remaining_rows * w;
        (total, Some(total))
    }
}

impl ExactSizeIterator for TileRangeIter {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_arithmetic() {
        let a = Point::new(1, 2);
        let b = Point::new(3, 4);
        assert_eq!(a + b, Point::new(4, 6));
        assert_eq!(b - a, Point::new(2, 2));
        assert_eq!(-a, Point::new(-1, -2));
        assert_eq!(a.shift(-1, 1), Point::new(0, 3));
    }

    #[test]
    fn coord_order_is_row_major() {
        let mut v = vec![Coord::new(1, 0), Coord::new(0, 5), Coord::new(0, 1)];
        v.sort();
        assert_eq!(v, vec![Coord::new(0, 1), Coord::new(0, 5), Coord::new(1, 0)]);
    }

    #[test]
    fn pixel_distance() {
        let a = PixelPoint::new(0.0, 0.0);
        let b = PixelPoint::new(3.0, 4.0);
        assert_eq!(a.distance_sq(b), 25.0);
    }

    #[test]
    fn range_basics() {
        let r = TileRange::new(0, 2, 0, 3);
        assert_eq!(r.len(), 6);
        assert!(r.contains(Coord::new(1, 2)));
        assert!(!r.contains(Coord::new(2, 0)));
        assert!(!r.contains(Coord::new(0, 3)));
    }

    #[test]
    fn range_iter_row_major() {
        let pts: Vec<_> = TileRange::new(1, 3, 2, 4).iter().collect();
        assert_eq!(
            pts,
            vec![
                Coord::new(1, 2),
                Coord::new(1, 3),
                Coord::new(2, 2),
                Coord::new(2, 3)
            ]
        );
        assert_eq!(TileRange::new(0, 3, 0, 3).iter().len(), 9);
    }

    #[test]
    fn empty_ranges_compare_equal() {
        assert_eq!(TileRange::new(4, 4, 0, 9), TileRange::new(0, 9, 2, 1));
        assert_eq!(TileRange::new(5, 2, 0, 1).iter().count(), 0);
    }

    #[test]
    fn intersect_clips_and_empties() {
        let a = TileRange::new(0, 4, 0, 4);
        assert_eq!(a.intersect(TileRange::new(2, 6, 2, 6)), TileRange::new(2, 4, 2, 4));
        assert!(a.intersect(TileRange::new(5, 7, 5, 7)).is_empty());
    }
}
