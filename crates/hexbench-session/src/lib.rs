//! **hexbench-session**: drives a pathfinding algorithm over a hex grid.
//!
//! - [`lifecycle`]: the Idle → Initializable → Active → Done state machine,
//!   with guard-issued handles for the actions each state allows.
//! - [`validator`]: checks a reported path's endpoints and adjacency.
//! - [`benchmark`]: repeated timed runs reporting mean latency.
//! - [`Workbench`]: the coordinator sharing one session lock between a
//!   worker thread and the UI.
//! - [`params`]: the editable input parameter table.

pub mod benchmark;
pub mod coordinator;
pub mod error;
pub mod lifecycle;
pub mod params;
pub mod validator;
mod worker;

pub use benchmark::{BenchmarkConfig, BenchmarkReport, run_benchmark};
pub use coordinator::{NoRepaint, RepaintSink, SessionSnapshot, Workbench, WorkbenchView};
pub use error::{ConfigurationFault, Fault, ParameterError, ValidationFault, WorkbenchError};
pub use lifecycle::{BeginMode, Initialize, Run, SearchSession, SearchState};
pub use params::{InputParameters, ParamId, Parameter, ParameterList};
pub use validator::{ADJACENCY_EPSILON, ValidationReport, Validator};
pub use worker::WorkerStep;
