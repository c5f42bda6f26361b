#![warn(missing_docs)]
//! Duelbench Report
//!
//! Pure formatting over per-method summary statistics: the report data
//! model, human-readable terminal rendering, and the machine-readable JSON
//! report. Nothing here mutates measurement data.

mod human;
mod json;
mod report;

pub use human::{format_environment, format_human_output};
pub use json::generate_json_report;
pub use report::{
    Calibration, DatasetInfo, DistributionMetrics, MethodMetrics, MethodReport, Report,
    ReportMeta, RunConfigInfo, SpeedupSummary, Stability, SystemInfo, SCHEMA_VERSION,
};
