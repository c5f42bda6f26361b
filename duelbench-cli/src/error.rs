//! Error Taxonomy
//!
//! Every variant is fatal: nothing is retried, and any fatal condition
//! terminates the run with a non-zero exit. Advisory conditions (governor,
//! noisy CV) are warnings, not errors, and never appear here.

use duelbench_core::ExecError;
use duelbench_stats::SummaryError;
use thiserror::Error;

/// Fatal harness error.
#[derive(Debug, Error)]
pub enum BenchError {
    /// Environment: the host cannot attribute resource usage per child.
    #[error("this harness requires per-child resource accounting (Linux wait4)")]
    UnsupportedPlatform,

    /// Environment: a required external tool is missing.
    #[error("required tool '{tool}' was not found in PATH")]
    MissingTool {
        /// Tool name, e.g. `taskset`.
        tool: String,
    },

    /// Setup: dataset missing, unreadable, or empty.
    #[error("dataset {path}: {reason}")]
    Dataset {
        /// Dataset path as given.
        path: String,
        /// What was wrong with it.
        reason: String,
    },

    /// Setup: the build command failed.
    #[error("build command failed: `{command}`\nstderr: {stderr}")]
    BuildFailed {
        /// Full build command line.
        command: String,
        /// Captured standard error, trimmed.
        stderr: String,
    },

    /// Setup: a candidate program does not exist after the build step.
    #[error("candidate program not found: {program}")]
    MissingProgram {
        /// Program path or name that could not be resolved.
        program: String,
    },

    /// Setup: a candidate expanded to an empty argv.
    #[error("candidate '{label}' has an empty command")]
    EmptyCommand {
        /// Candidate name from the configuration.
        label: String,
    },

    /// Setup: a comparison needs at least two candidates.
    #[error("need at least two candidates to compare, got {count}")]
    TooFewCandidates {
        /// Number of configured candidates.
        count: usize,
    },

    /// Execution: spawning, waiting, or a non-zero child exit.
    #[error(transparent)]
    Exec(#[from] ExecError),

    /// Consistency: candidates disagree before measurement even starts,
    /// so the dataset or tooling is broken.
    #[error(
        "baseline output mismatch: {first_label}={first_output} {other_label}={other_output}"
    )]
    BaselineMismatch {
        /// First candidate's label.
        first_label: String,
        /// First candidate's baseline output.
        first_output: String,
        /// Disagreeing candidate's label.
        other_label: String,
        /// Disagreeing candidate's output.
        other_output: String,
    },

    /// Consistency: a mid-run trial diverged from the baseline oracle.
    #[error("output mismatch in round {round} for '{label}': expected {expected}, got {got}")]
    TrialMismatch {
        /// Method that diverged.
        label: String,
        /// Measurement round index (1-based).
        round: usize,
        /// Oracle output.
        expected: String,
        /// Observed output.
        got: String,
    },

    /// Statistical input: an empty sample set reached the summarizer.
    #[error(transparent)]
    Summary(#[from] SummaryError),
}
