//! Timed Child Execution
//!
//! Spawns one candidate process, blocks until it exits, and reports
//! wall-clock time plus the OS resource usage of that specific child.
//! A plain `Child::wait` only yields an exit status; attributing user/sys
//! CPU time and peak RSS to the child requires `wait4`, so the Linux path
//! reaps the child itself and reads the returned `rusage`.
//!
//! The wait is blocking and has no timeout: only one benchmarked process
//! runs at a time, and a hung candidate hangs the harness by design.

use crate::command::CandidateCommand;
use std::io::Read;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::Instant;
use thiserror::Error;

/// Executor failure. Every variant is fatal for the whole run.
#[derive(Debug, Error)]
pub enum ExecError {
    /// The process could not be started.
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        /// Full command line.
        command: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// Waiting on the child failed.
    #[error("failed to wait for `{command}`: {source}")]
    Wait {
        /// Full command line.
        command: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// Reading the child's captured output failed.
    #[error("failed to read output of `{command}`: {source}")]
    Output {
        /// Full command line.
        command: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// The child exited unsuccessfully. A candidate that cannot succeed
    /// even once invalidates the comparison.
    #[error("command failed: `{command}` ({status})\nstderr: {stderr}")]
    NonZeroExit {
        /// Full command line.
        command: String,
        /// Human-readable exit status or signal.
        status: String,
        /// Captured standard error, trimmed.
        stderr: String,
    },

    /// The host OS offers no per-child resource accounting at wait time.
    #[error("per-child resource accounting (wait4) is not available on this platform")]
    UnsupportedPlatform,
}

/// Result of one timed execution.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialOutput {
    /// Captured standard output, trimmed.
    pub stdout: String,
    /// Wall-clock seconds from just before spawn until the child exited.
    /// Includes the fixed launch overhead; the scheduler nets that out.
    pub wall_s: f64,
    /// User CPU seconds for this child only.
    pub user_s: f64,
    /// System CPU seconds for this child only.
    pub sys_s: f64,
    /// Peak resident set size, KiB.
    pub max_rss_kb: i64,
}

/// Blocking child-wait abstraction. The scheduler is generic over this so
/// ordering and consistency logic can be tested with a deterministic fake.
pub trait TrialRunner {
    /// Run one candidate to completion and return its timing and output.
    fn run(&mut self, command: &CandidateCommand) -> Result<TrialOutput, ExecError>;
}

/// Whether this platform yields per-child resource usage at wait time.
pub fn per_child_accounting_supported() -> bool {
    cfg!(target_os = "linux")
}

/// Real executor spawning OS processes.
#[derive(Debug, Clone)]
pub struct OsRunner {
    cwd: PathBuf,
    env: Vec<(String, String)>,
}

impl OsRunner {
    /// Executor running children in `cwd` with the inherited environment.
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            env: Vec::new(),
        }
    }

    /// Layer one environment variable over the inherited environment.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }
}

impl TrialRunner for OsRunner {
    #[cfg(target_os = "linux")]
    fn run(&mut self, command: &CandidateCommand) -> Result<TrialOutput, ExecError> {
        let command_line = command.command_line();

        let mut cmd = Command::new(command.program());
        cmd.args(command.args())
            .current_dir(&self.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        for (key, value) in &self.env {
            cmd.env(key, value);
        }

        let start = Instant::now();
        let mut child = cmd.spawn().map_err(|source| ExecError::Spawn {
            command: command_line.clone(),
            source,
        })?;

        // wait4 reaps the child and fills rusage for that pid only.
        // Candidates emit a single scalar line, so the pipes stay far
        // below their buffer size and reading after the wait cannot
        // deadlock.
        let (status, usage) =
            wait4(child.id() as libc::pid_t).map_err(|source| ExecError::Wait {
                command: command_line.clone(),
                source,
            })?;
        let wall_s = start.elapsed().as_secs_f64();

        let stdout = read_pipe(child.stdout.take(), &command_line)?;
        let stderr = read_pipe(child.stderr.take(), &command_line)?;

        if !exited_cleanly(status) {
            return Err(ExecError::NonZeroExit {
                command: command_line,
                status: describe_status(status),
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(TrialOutput {
            stdout: stdout.trim().to_string(),
            wall_s,
            user_s: timeval_secs(usage.ru_utime),
            sys_s: timeval_secs(usage.ru_stime),
            max_rss_kb: usage.ru_maxrss,
        })
    }

    #[cfg(not(target_os = "linux"))]
    fn run(&mut self, _command: &CandidateCommand) -> Result<TrialOutput, ExecError> {
        Err(ExecError::UnsupportedPlatform)
    }
}

#[cfg(target_os = "linux")]
fn wait4(pid: libc::pid_t) -> std::io::Result<(libc::c_int, libc::rusage)> {
    let mut status: libc::c_int = 0;
    // SAFETY: zeroed rusage is a valid out-param for wait4, which fully
    // overwrites it on success.
    let mut usage: libc::rusage = unsafe { std::mem::zeroed() };
    let ret = unsafe { libc::wait4(pid, &mut status, 0, &mut usage) };
    if ret == -1 {
        Err(std::io::Error::last_os_error())
    } else {
        Ok((status, usage))
    }
}

#[cfg(target_os = "linux")]
fn exited_cleanly(status: libc::c_int) -> bool {
    libc::WIFEXITED(status) && libc::WEXITSTATUS(status) == 0
}

#[cfg(target_os = "linux")]
fn describe_status(status: libc::c_int) -> String {
    if libc::WIFEXITED(status) {
        format!("exit status {}", libc::WEXITSTATUS(status))
    } else if libc::WIFSIGNALED(status) {
        format!("killed by signal {}", libc::WTERMSIG(status))
    } else {
        format!("raw wait status {status}")
    }
}

#[cfg(target_os = "linux")]
fn timeval_secs(tv: libc::timeval) -> f64 {
    tv.tv_sec as f64 + tv.tv_usec as f64 / 1_000_000.0
}

#[cfg(target_os = "linux")]
fn read_pipe<R: Read>(pipe: Option<R>, command_line: &str) -> Result<String, ExecError> {
    let mut buf = String::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_string(&mut buf)
            .map_err(|source| ExecError::Output {
                command: command_line.to_string(),
                source,
            })?;
    }
    Ok(buf)
}
