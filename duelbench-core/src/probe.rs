//! Environment Probe
//!
//! Inspects host state that affects timing noise and calibrates the fixed
//! cost of launching a process. Everything here is diagnostic: probe
//! failures degrade to `"unknown"` or zero, never abort the run.

use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::Instant;

use duelbench_stats::median;

/// Default number of no-op launches used to calibrate spawn overhead.
pub const DEFAULT_SPAWN_SAMPLES: usize = 50;

const GOVERNOR_PATH: &str = "/sys/devices/system/cpu/cpu0/cpufreq/scaling_governor";

/// Host state captured once at startup, immutable afterward.
///
/// Passed explicitly into the scheduler instead of living in a global, so
/// tests can inject synthetic overhead values.
#[derive(Debug, Clone)]
pub struct EnvironmentSnapshot {
    /// Human-readable CPU model, or `"unknown"`.
    pub cpu_model: String,
    /// Active frequency-scaling governor, or `"unknown"`.
    pub governor: String,
    /// Median wall-clock cost of launching a no-op process, seconds.
    pub spawn_overhead_s: f64,
}

impl EnvironmentSnapshot {
    /// Probe the host and calibrate spawn overhead with `spawn_samples`
    /// no-op launches.
    pub fn capture(spawn_samples: usize) -> Self {
        let governor = detect_governor();
        if governor != "performance" && governor != "unknown" {
            tracing::warn!(
                %governor,
                "CPU governor is not 'performance'; results may contain frequency-scaling jitter"
            );
        }
        Self {
            cpu_model: detect_cpu_model(),
            governor,
            spawn_overhead_s: measure_spawn_overhead(spawn_samples),
        }
    }

    /// Snapshot with a fixed overhead and unknown host details, for tests.
    pub fn synthetic(spawn_overhead_s: f64) -> Self {
        Self {
            cpu_model: "unknown".to_string(),
            governor: "unknown".to_string(),
            spawn_overhead_s,
        }
    }
}

/// Read the active CPU frequency-scaling governor, `"unknown"` if the
/// platform does not expose it.
pub fn detect_governor() -> String {
    std::fs::read_to_string(GOVERNOR_PATH)
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|_| "unknown".to_string())
}

/// Best-effort CPU model from /proc/cpuinfo, `"unknown"` on failure.
pub fn detect_cpu_model() -> String {
    std::fs::read_to_string("/proc/cpuinfo")
        .ok()
        .and_then(|content| {
            content
                .lines()
                .find(|l| l.starts_with("model name"))
                .and_then(|l| l.split(':').nth(1))
                .map(|s| s.trim().to_string())
        })
        .unwrap_or_else(|| "unknown".to_string())
}

/// Median wall-clock cost of fork+exec of a no-op binary.
///
/// This fixed overhead is later subtracted from measured wall times to
/// approximate pure in-program time. Returns 0.0 if the no-op binary
/// cannot be launched.
pub fn measure_spawn_overhead(samples: usize) -> f64 {
    let noop = find_in_path("true").unwrap_or_else(|| PathBuf::from("/bin/true"));
    let mut times = Vec::with_capacity(samples);
    for _ in 0..samples {
        let start = Instant::now();
        let status = Command::new(&noop)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        if status.is_err() {
            tracing::warn!("could not launch {:?}; spawn overhead defaults to 0", noop);
            return 0.0;
        }
        times.push(start.elapsed().as_secs_f64());
    }
    median(&times)
}

/// Locate an executable by searching PATH.
pub fn find_in_path(name: &str) -> Option<PathBuf> {
    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_never_fails() {
        // Values are host-dependent; the contract is only "never empty".
        assert!(!detect_governor().is_empty());
        assert!(!detect_cpu_model().is_empty());
    }

    #[test]
    fn test_synthetic_snapshot() {
        let snap = EnvironmentSnapshot::synthetic(0.0025);
        assert_eq!(snap.governor, "unknown");
        assert!((snap.spawn_overhead_s - 0.0025).abs() < f64::EPSILON);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_spawn_overhead_positive() {
        let overhead = measure_spawn_overhead(3);
        assert!(overhead > 0.0);
        // Launching /bin/true should not take longer than a second
        assert!(overhead < 1.0);
    }

    #[test]
    fn test_find_in_path() {
        // `true` exists on any reasonable unix PATH
        assert!(find_in_path("true").is_some());
        assert!(find_in_path("duelbench-no-such-tool-xyz").is_none());
    }
}
