//! Candidate Commands
//!
//! A candidate is an ordered argv plus a short label used in progress rows
//! and the report. Commands are immutable once constructed; the affinity
//! wrapper produces a new command rather than mutating in place.

use std::path::Path;

/// One benchmarked command: a label and a non-empty argv.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateCommand {
    label: String,
    argv: Vec<String>,
}

impl CandidateCommand {
    /// Build a command from a label and argv. `argv` must be non-empty.
    pub fn new(label: impl Into<String>, argv: Vec<String>) -> Self {
        debug_assert!(!argv.is_empty(), "candidate argv must name a program");
        Self {
            label: label.into(),
            argv,
        }
    }

    /// Method label shown in progress rows and the report.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Program to execute (first argv element).
    pub fn program(&self) -> &str {
        &self.argv[0]
    }

    /// Arguments after the program name.
    pub fn args(&self) -> &[String] {
        &self.argv[1..]
    }

    /// Full argv including the program.
    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    /// Return a copy prefixed with `taskset -c <core>` so the child runs
    /// pinned to one CPU.
    pub fn with_affinity(&self, taskset: &Path, core: u32) -> Self {
        let mut argv = vec![
            taskset.to_string_lossy().into_owned(),
            "-c".to_string(),
            core.to_string(),
        ];
        argv.extend(self.argv.iter().cloned());
        Self {
            label: self.label.clone(),
            argv,
        }
    }

    /// Space-joined command line for error messages and logs.
    pub fn command_line(&self) -> String {
        self.argv.join(" ")
    }
}
