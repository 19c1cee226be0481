//! The [`TileGrid`] type: a fixed-shape row-major array of hex [`Tile`]s.

use thiserror::Error;

use crate::geom::{Coord, TileRange};
use crate::hex::HexLayout;
use crate::tile::Tile;

/// Errors building or reshaping a [`TileGrid`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    #[error("invalid grid dimensions {rows}x{cols}")]
    InvalidDimensions { rows: i32, cols: i32 },

    #[error("expected {expected} weights, got {actual}")]
    WeightCount { expected: usize, actual: usize },

    #[error("invalid tile radius {0}")]
    InvalidRadius(f64),
}

/// A hex tile map.
///
/// Tile centres are derived from the shared radius and recomputed whenever
/// it changes, so geometry and adjacency tolerance always agree.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileGrid {
    rows: i32,
    cols: i32,
    radius: f64,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Create an all-passable grid (every weight 1).
    pub fn new(rows: i32, cols: i32, radius: f64) -> Result<Self, GridError> {
        let len = Self::checked_len(rows, cols)?;
        Self::from_weights(rows, cols, radius, vec![1; len])
    }

    /// Create a grid from row-major weights (0 = impassable).
    pub fn from_weights(rows: i32, cols: i32, radius: f64, weights: Vec<u8>) -> Result<Self, GridError> {
        let len = Self::checked_len(rows, cols)?;
        check_radius(radius)?;
        if weights.len() != len {
            return Err(GridError::WeightCount {
                expected: len,
                actual: weights.len(),
            });
        }
        let layout = HexLayout::new(radius);
        let tiles = TileRange::full(rows, cols)
            .iter()
            .zip(weights)
            .map(|(c, w)| Tile::new(c, layout.center(c), w))
            .collect();
        Ok(Self {
            rows,
            cols,
            radius,
            tiles,
        })
    }

    fn checked_len(rows: i32, cols: i32) -> Result<usize, GridError> {
        if rows <= 0 || cols <= 0 {
            return Err(GridError::InvalidDimensions { rows, cols });
        }
        Ok(rows as usize * cols as usize)
    }

    #[inline]
    pub const fn rows(&self) -> i32 {
        self.rows
    }

    #[inline]
    pub const fn cols(&self) -> i32 {
        self.cols
    }

    #[inline]
    pub const fn radius(&self) -> f64 {
        self.radius
    }

    #[inline]
    pub const fn layout(&self) -> HexLayout {
        HexLayout::new(self.radius)
    }

    /// The range covering every tile.
    #[inline]
    pub const fn bounds(&self) -> TileRange {
        TileRange::full(self.rows, self.cols)
    }

    #[inline]
    pub fn contains(&self, c: Coord) -> bool {
        self.bounds().contains(c)
    }

    #[inline]
    fn index(&self, c: Coord) -> Option<usize> {
        if self.contains(c) {
            Some(c.row as usize * self.cols as usize + c.col as usize)
        } else {
            None
        }
    }

    /// The tile at `c`, or `None` outside the grid.
    #[inline]
    pub fn tile(&self, c: Coord) -> Option<&Tile> {
        self.index(c).map(|i| &self.tiles[i])
    }

    #[inline]
    pub fn tile_mut(&mut self, c: Coord) -> Option<&mut Tile> {
        self.index(c).map(|i| &mut self.tiles[i])
    }

    /// Whether `c` lies in the grid and has non-zero weight.
    #[inline]
    pub fn is_passable(&self, c: Coord) -> bool {
        self.tile(c).is_some_and(Tile::is_passable)
    }

    /// Change the tile radius and recompute every centre.
    pub fn set_radius(&mut self, radius: f64) -> Result<(), GridError> {
        check_radius(radius)?;
        self.radius = radius;
        let layout = self.layout();
        for t in &mut self.tiles {
            t.center = layout.center(t.coord);
        }
        Ok(())
    }

    /// Pixel extent `(width, height)` of the whole map.
    #[inline]
    pub fn pixel_size(&self) -> (f64, f64) {
        self.layout().map_size(self.rows, self.cols)
    }

    /// Clear all algorithm drawing state.
    pub fn reset_drawing(&mut self) {
        for t in &mut self.tiles {
            t.reset_drawing();
        }
    }

    /// Row-major iterator over all tiles.
    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// Radius that fits a `rows` × `cols` map into the default display area,
    /// never smaller than `min_radius`.
    pub fn fit_radius(rows: i32, cols: i32, min_radius: f64) -> f64 {
        let rows = f64::from(rows.max(1));
        let cols = f64::from(cols.max(1));
        let across = (if cols < 20.0 { 354.0 } else { 372.0 }) / cols;
        let down = (if rows < 20.0 { 338.0 } else { 360.0 }) / rows;
        across.max(min_radius).min(down.max(min_radius))
    }
}

fn check_radius(radius: f64) -> Result<(), GridError> {
    if radius.is_finite() && radius > 0.0 {
        Ok(())
    } else {
        Err(GridError::InvalidRadius(radius))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_passable() {
        let g = TileGrid::new(3, 4, 10.0).unwrap();
        assert_eq!(g.iter().count(), 12);
        assert!(g.iter().all(Tile::is_passable));
        assert_eq!(g.tile(Coord::new(2, 3)).unwrap().coord, Coord::new(2, 3));
        assert!(g.tile(Coord::new(3, 0)).is_none());
        assert!(g.tile(Coord::new(0, -1)).is_none());
    }

    #[test]
    fn from_weights_checks_shape() {
        assert_eq!(
            TileGrid::from_weights(2, 2, 5.0, vec![1, 1, 1]),
            Err(GridError::WeightCount {
                expected: 4,
                actual: 3
            })
        );
        assert!(matches!(
            TileGrid::new(0, 3, 5.0),
            Err(GridError::InvalidDimensions { .. })
        ));
        assert!(matches!(TileGrid::new(2, 2, -1.0), Err(GridError::InvalidRadius(_))));
        let g = TileGrid::from_weights(2, 2, 5.0, vec![1, 0, 3, 1]).unwrap();
        assert!(!g.is_passable(Coord::new(0, 1)));
        assert_eq!(g.tile(Coord::new(1, 0)).unwrap().weight, 3);
    }

    #[test]
    fn set_radius_moves_centres() {
        let mut g = TileGrid::new(2, 2, 5.0).unwrap();
        g.set_radius(10.0).unwrap();
        let c = Coord::new(1, 1);
        assert_eq!(g.tile(c).unwrap().center, g.layout().center(c));
        assert_eq!(g.tile(c).unwrap().center.x, 40.0);
        assert!(g.set_radius(f64::INFINITY).is_err());
        assert_eq!(g.radius(), 10.0);
    }

    #[test]
    fn fit_radius_respects_minimum() {
        assert_eq!(TileGrid::fit_radius(10, 10, 4.0), 33.8);
        assert_eq!(TileGrid::fit_radius(20, 30, 4.0), 12.4);
        assert_eq!(TileGrid::fit_radius(500, 500, 4.0), 4.0);
    }
}
