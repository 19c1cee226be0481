//! The algorithm side of the hex pathfinding workbench.
//!
//! - [`DrivenAlgorithm`]: the contract a pathfinding algorithm implements so
//!   the workbench can drive it tick by tick.
//! - [`IncrementalRedraw`]: optional hooks letting the algorithm repaint
//!   only what changed during a tick.
//! - [`HexNeighbors`], [`are_adjacent`], [`hex_distance`]: hex
//!   neighbourhood helpers for implementers.
//!
//! The `fixtures` feature adds reference algorithms for tests.

mod distance;
mod neighbors;
mod traits;

#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;

pub use distance::hex_distance;
pub use neighbors::{HexNeighbors, are_adjacent};
pub use traits::{DrivenAlgorithm, IncrementalRedraw};
