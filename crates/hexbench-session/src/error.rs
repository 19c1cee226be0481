//! Fault taxonomy.
//!
//! Nothing here triggers a retry or an abort: every fault is handed back to
//! the caller, or queued on the workbench for the UI to drain.

use hexbench_core::Coord;
use thiserror::Error;

/// A problem with a reported solution path. Non-fatal.
#[derive(Debug, Clone, PartialEq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValidationFault {
    #[error("search finished without a path")]
    NoPathOnCompletion,

    #[error("path ends at {found}, expected the start {expected}")]
    StartMismatch { expected: Coord, found: Coord },

    #[error("path begins at {found}, expected the goal {expected}")]
    GoalMismatch { expected: Coord, found: Coord },

    #[error("step {index} from {from} to {to} does not join neighbouring tiles (squared distance {distance_sq})")]
    NonAdjacentStep {
        index: usize,
        from: Coord,
        to: Coord,
        distance_sq: f64,
    },

    #[error("path element {index} at {coord} lies outside the grid")]
    OutOfGrid { index: usize, coord: Coord },
}

/// A rejected session configuration. The session is left unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConfigurationFault {
    #[error("tile {0} is outside the grid")]
    OutOfGrid(Coord),

    #[error("tile {0} is impassable")]
    Impassable(Coord),

    #[error("start and goal are both {0}")]
    SameEndpoints(Coord),

    #[error("a search is in progress; reset first")]
    SessionInProgress,

    #[error("start and goal are not both configured")]
    MissingEndpoints,
}

/// What the workbench queues for the UI.
#[derive(Debug, Clone, PartialEq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Fault {
    #[error(transparent)]
    Validation(#[from] ValidationFault),

    #[error("benchmark of {rounds} round(s) at budget {fast_tick_budget} did not finish")]
    BenchmarkTimeout { rounds: u32, fast_tick_budget: u32 },
}

/// A rejected input parameter edit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParameterError {
    #[error("no input parameter at index {0}")]
    UnknownIndex(usize),

    #[error("{label}: cannot parse {text:?}")]
    Unparsable { label: &'static str, text: String },

    #[error("{label}: {value} is outside {min}..={max}")]
    OutOfRange {
        label: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error(transparent)]
    Configuration(#[from] ConfigurationFault),
}

/// Failure to construct a workbench.
#[derive(Debug, Error)]
pub enum WorkbenchError {
    #[error("grid error: {0}")]
    Grid(#[from] hexbench_core::GridError),

    #[error("could not start worker thread: {0}")]
    Spawn(#[from] std::io::Error),
}
