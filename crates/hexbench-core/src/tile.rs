//! The [`Tile`] type: one hexagon of a [`TileGrid`](crate::TileGrid).
//!
//! Besides its traversal weight a tile carries the drawing state the driven
//! algorithm uses to expose its internals (open/closed markers, parent
//! links). That state is cleared between searches; the weight is not.

use crate::color::Color;
use crate::geom::{Coord, PixelPoint};

/// A tagged segment from a tile's centre to another tile's centre.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileLine {
    pub to: Coord,
    pub color: Color,
}

/// A single hex tile.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tile {
    pub coord: Coord,
    pub center: PixelPoint,
    /// Traversal cost; 0 means impassable.
    pub weight: u8,
    pub fill: Option<Color>,
    pub outline: Option<Color>,
    pub marker: Option<Color>,
    pub lines: Vec<TileLine>,
}

impl Tile {
    pub fn new(coord: Coord, center: PixelPoint, weight: u8) -> Self {
        Self {
            coord,
            center,
            weight,
            fill: None,
            outline: None,
            marker: None,
            lines: Vec::new(),
        }
    }

    #[inline]
    pub const fn is_passable(&self) -> bool {
        self.weight != 0
    }

    /// Set the fill colour (builder).
    #[inline]
    pub fn with_fill(mut self, color: Color) -> Self {
        self.fill = Some(color);
        self
    }

    #[inline]
    pub fn set_fill(&mut self, color: Option<Color>) {
        self.fill = color;
    }

    #[inline]
    pub fn set_outline(&mut self, color: Option<Color>) {
        self.outline = color;
    }

    #[inline]
    pub fn set_marker(&mut self, color: Option<Color>) {
        self.marker = color;
    }

    /// Add a line to `to`, replacing any existing line to the same tile.
    pub fn add_line(&mut self, to: Coord, color: Color) {
        match self.lines.iter_mut().find(|l| l.to == to) {
            Some(line) => line.color = color,
            None => self.lines.push(TileLine { to, color }),
        }
    }

    /// Whether the tile carries any algorithm drawing state.
    pub fn has_drawing(&self) -> bool {
        self.fill.is_some() || self.outline.is_some() || self.marker.is_some() || !self.lines.is_empty()
    }

    /// Clear markers and lines, keeping coordinates and weight.
    pub fn reset_drawing(&mut self) {
        self.fill = None;
        self.outline = None;
        self.marker = None;
        self.lines.clear();
    }
}
