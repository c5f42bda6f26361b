//! Summary Statistics
//!
//! Reduces one method's measurement samples into a read-only aggregate.
//! Wall-clock time and derived throughput get the same descriptive set;
//! peak memory is summarized by its median only.

use crate::percentiles::{median, nearest_rank_sorted};
use crate::{GIB, NOISE_CV_THRESHOLD_PCT};
use thiserror::Error;

/// Error summarizing a sample set.
///
/// Only reachable through a logic defect: the scheduler guarantees every
/// method has at least one measurement sample on success.
#[derive(Debug, Error)]
pub enum SummaryError {
    /// No samples were provided.
    #[error("no samples available for summary")]
    EmptySampleSet,
}

/// Descriptive statistics for one metric.
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    /// Smallest sample.
    pub min: f64,
    /// Largest sample.
    pub max: f64,
    /// Arithmetic mean.
    pub mean: f64,
    /// Median (even-length sets average the two middle elements).
    pub median: f64,
    /// Sample standard deviation; zero for a single sample.
    pub stdev: f64,
    /// Coefficient of variation as a percentage; zero when the mean is zero.
    pub cv_pct: f64,
    /// 95th percentile, nearest-rank.
    pub p95: f64,
    /// 99th percentile, nearest-rank.
    pub p99: f64,
}

/// Whether a sample set is quiet enough to trust.
///
/// Advisory only; printed, never enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stability {
    /// CV at or below the noise threshold.
    Stable,
    /// CV above the noise threshold.
    Noisy,
}

impl Stability {
    /// Uppercase tag used in the human-readable summary.
    pub fn tag(self) -> &'static str {
        match self {
            Stability::Stable => "[STABLE]",
            Stability::Noisy => "[NOISY]",
        }
    }
}

/// Summary of one method's measurement phase.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryStats {
    /// Number of samples.
    pub n: usize,
    /// Wall-clock elapsed time, seconds.
    pub wall_s: Distribution,
    /// Derived throughput, GiB/s.
    pub throughput_gib_s: Distribution,
    /// Median peak resident set size, MB.
    pub median_rss_mb: f64,
}

impl SummaryStats {
    /// Noise indicator based on the wall-clock CV.
    pub fn stability(&self) -> Stability {
        if self.wall_s.cv_pct > NOISE_CV_THRESHOLD_PCT {
            Stability::Noisy
        } else {
            Stability::Stable
        }
    }
}

/// Compute descriptive statistics over a non-empty sample slice.
pub fn describe(samples: &[f64]) -> Distribution {
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let n = samples.len();
    let mean = samples.iter().sum::<f64>() / n as f64;
    let stdev = if n < 2 {
        0.0
    } else {
        let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        variance.sqrt()
    };
    let cv_pct = if mean == 0.0 {
        0.0
    } else {
        stdev / mean * 100.0
    };

    Distribution {
        min: sorted[0],
        max: sorted[n - 1],
        mean,
        median: median(samples),
        stdev,
        cv_pct,
        p95: nearest_rank_sorted(&sorted, 95.0),
        p99: nearest_rank_sorted(&sorted, 99.0),
    }
}

/// Summarize one method's wall-clock samples, RSS samples, and the dataset
/// size that throughput is derived from.
///
/// Throughput is computed per-sample as `data_size_bytes / elapsed / 2^30`
/// and then summarized with the same descriptive set as elapsed time.
pub fn summarize(
    samples_s: &[f64],
    rss_samples_kb: &[f64],
    data_size_bytes: u64,
) -> Result<SummaryStats, SummaryError> {
    if samples_s.is_empty() {
        return Err(SummaryError::EmptySampleSet);
    }

    let throughputs: Vec<f64> = samples_s
        .iter()
        .map(|&s| data_size_bytes as f64 / s / GIB)
        .collect();

    Ok(SummaryStats {
        n: samples_s.len(),
        wall_s: describe(samples_s),
        throughput_gib_s: describe(&throughputs),
        median_rss_mb: median(rss_samples_kb) / 1024.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_summary() {
        let samples = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let stats = summarize(&samples, &[1024.0], 0).unwrap();

        assert_eq!(stats.n, 5);
        assert!((stats.wall_s.mean - 3.0).abs() < 1e-12);
        assert!((stats.wall_s.median - 3.0).abs() < 1e-12);
        assert_eq!(stats.wall_s.min, 1.0);
        assert_eq!(stats.wall_s.max, 5.0);
        assert_eq!(stats.wall_s.p95, 5.0);
        assert!((stats.median_rss_mb - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_ordering_invariants() {
        let samples = vec![0.42, 0.39, 0.47, 0.40, 0.41, 0.55, 0.38];
        let stats = summarize(&samples, &[2048.0], 1 << 30).unwrap();

        let w = &stats.wall_s;
        assert!(w.min <= w.median && w.median <= w.max);
        assert!(w.min <= w.p95 && w.p95 <= w.p99 && w.p99 <= w.max);

        let t = &stats.throughput_gib_s;
        assert!(t.min <= t.median && t.median <= t.max);
        assert!(t.min <= t.p95 && t.p95 <= t.p99 && t.p99 <= t.max);
    }

    #[test]
    fn test_single_sample_zero_spread() {
        let stats = summarize(&[0.5], &[512.0], 1 << 30).unwrap();
        assert_eq!(stats.wall_s.stdev, 0.0);
        assert_eq!(stats.wall_s.cv_pct, 0.0);
        assert_eq!(stats.stability(), Stability::Stable);
    }

    #[test]
    fn test_zero_mean_zero_cv() {
        let d = describe(&[0.0, 0.0, 0.0]);
        assert_eq!(d.mean, 0.0);
        assert_eq!(d.cv_pct, 0.0);
    }

    #[test]
    fn test_throughput_halves_when_time_doubles() {
        let one_gib = 1u64 << 30;
        let fast = summarize(&[0.5], &[0.0], one_gib).unwrap();
        let slow = summarize(&[1.0], &[0.0], one_gib).unwrap();

        assert!((fast.throughput_gib_s.median - 2.0).abs() < 1e-9);
        assert!((slow.throughput_gib_s.median - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_noisy_label() {
        // Mean 1.0, large spread: CV well above 5%
        let stats = summarize(&[0.5, 1.5, 0.6, 1.4], &[0.0], 1 << 30).unwrap();
        assert_eq!(stats.stability(), Stability::Noisy);
        assert_eq!(stats.stability().tag(), "[NOISY]");
    }

    #[test]
    fn test_empty_samples_is_error() {
        let err = summarize(&[], &[], 1 << 30).unwrap_err();
        assert!(matches!(err, SummaryError::EmptySampleSet));
    }
}
