#![warn(missing_docs)]
//! Duelbench Measurement Primitives
//!
//! The low-noise parts of the harness:
//! - Candidate command construction with optional CPU-affinity prefixing
//! - A timed executor that waits on a child with per-child resource
//!   accounting (`wait4`), not aggregated child totals
//! - Environment probing: CPU model, scaling governor, and calibration of
//!   the fixed process-launch overhead

mod command;
mod executor;
mod probe;

pub use command::CandidateCommand;
pub use executor::{
    per_child_accounting_supported, ExecError, OsRunner, TrialOutput, TrialRunner,
};
pub use probe::{
    detect_cpu_model, detect_governor, find_in_path, measure_spawn_overhead,
    EnvironmentSnapshot, DEFAULT_SPAWN_SAMPLES,
};
