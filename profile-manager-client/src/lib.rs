//! Load-test client for the profile manager.
//!
//! Each virtual user repeats the scenario create, retrieve, list, delete and
//! verify-gone, recording the outcome of every check and the latency of every
//! request.

pub mod report;
pub mod scenario;

pub use report::{CheckCount, LatencySummary, Report};
pub use scenario::{run_iteration, run_virtual_user, ScenarioConfig};
