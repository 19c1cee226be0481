//! **hexbench-core**: core types for the hex pathfinding workbench.
//!
//! Geometry primitives, the hex layout and viewport culler, the tile grid
//! data model, colours, the viewport, the [`Canvas`] render seam and the
//! shared [`Settings`].

pub mod color;
pub mod geom;
pub mod grid;
pub mod hex;
pub mod render;
pub mod settings;
pub mod tile;
pub mod viewport;

#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;

pub use color::Color;
pub use geom::{Coord, PixelPoint, Point, TileRange, TileRangeIter};
pub use grid::{GridError, TileGrid};
pub use hex::{HexLayout, cull};
pub use render::{Canvas, NullCanvas, Scene};
pub use settings::{MIN_TILE_RADIUS, Settings};
pub use tile::{Tile, TileLine};
pub use viewport::Viewport;
