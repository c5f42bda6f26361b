//! Report Data Structures

use chrono::{DateTime, Utc};
use duelbench_stats::{Distribution, SummaryStats};
use serde::{Deserialize, Serialize};

/// Version of the JSON report schema.
pub const SCHEMA_VERSION: u32 = 1;

/// Complete comparison report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Run metadata: host, calibration, dataset, configuration.
    pub meta: ReportMeta,
    /// Per-method summaries, in candidate order.
    pub methods: Vec<MethodReport>,
    /// Headline speedup figure.
    pub speedup: SpeedupSummary,
}

/// Report metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    /// JSON schema version.
    pub schema_version: u32,
    /// Harness version.
    pub version: String,
    /// UTC time of report generation.
    pub timestamp: DateTime<Utc>,
    /// Host details.
    pub system: SystemInfo,
    /// Measured fixed overheads.
    pub calibration: Calibration,
    /// Input dataset.
    pub dataset: DatasetInfo,
    /// Effective run configuration.
    pub config: RunConfigInfo,
}

/// Host details relevant to timing noise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemInfo {
    /// Operating system name.
    pub os: String,
    /// CPU architecture.
    pub arch: String,
    /// CPU model string, or "unknown".
    pub cpu_model: String,
    /// Frequency-scaling governor, or "unknown".
    pub governor: String,
}

/// Calibration figures netted out of measurements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Calibration {
    /// Median process-launch overhead, seconds.
    pub spawn_overhead_s: f64,
    /// Number of no-op launches used for calibration.
    pub spawn_samples: usize,
}

/// The benchmarked dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetInfo {
    /// Path as given on the command line.
    pub path: String,
    /// Byte size, the sole input to throughput computation.
    pub size_bytes: u64,
}

impl DatasetInfo {
    /// Dataset size in GiB.
    pub fn size_gib(&self) -> f64 {
        self.size_bytes as f64 / duelbench_stats::GIB
    }
}

/// Effective run configuration after config-file and CLI layering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfigInfo {
    /// Measurement rounds.
    pub rounds: usize,
    /// Warmup rounds (timings discarded).
    pub warmup_rounds: usize,
    /// Seed for the interleaving shuffle.
    pub seed: u64,
    /// Thread hint passed through to candidates that take one.
    pub threads: usize,
    /// CPU core the candidates were pinned to, if any.
    pub pin_core: Option<u32>,
}

/// One method's summary in the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodReport {
    /// Method label.
    pub label: String,
    /// Advisory noise indicator.
    pub stability: Stability,
    /// Summarized metrics.
    pub metrics: MethodMetrics,
}

/// Serializable mirror of the stats crate's stability label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stability {
    /// CV at or below the noise threshold.
    Stable,
    /// CV above the noise threshold.
    Noisy,
}

impl From<duelbench_stats::Stability> for Stability {
    fn from(s: duelbench_stats::Stability) -> Self {
        match s {
            duelbench_stats::Stability::Stable => Stability::Stable,
            duelbench_stats::Stability::Noisy => Stability::Noisy,
        }
    }
}

/// Serializable descriptive statistics for one metric.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionMetrics {
    /// Smallest sample.
    pub min: f64,
    /// Largest sample.
    pub max: f64,
    /// Arithmetic mean.
    pub mean: f64,
    /// Median.
    pub median: f64,
    /// Sample standard deviation.
    pub stdev: f64,
    /// Coefficient of variation, percent.
    pub cv_pct: f64,
    /// 95th percentile, nearest-rank.
    pub p95: f64,
    /// 99th percentile, nearest-rank.
    pub p99: f64,
}

impl From<&Distribution> for DistributionMetrics {
    fn from(d: &Distribution) -> Self {
        Self {
            min: d.min,
            max: d.max,
            mean: d.mean,
            median: d.median,
            stdev: d.stdev,
            cv_pct: d.cv_pct,
            p95: d.p95,
            p99: d.p99,
        }
    }
}

/// One method's summarized metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodMetrics {
    /// Number of measurement samples.
    pub n: usize,
    /// Wall-clock elapsed seconds.
    pub wall_s: DistributionMetrics,
    /// Derived throughput, GiB/s.
    pub throughput_gib_s: DistributionMetrics,
    /// Median peak RSS, MB.
    pub median_rss_mb: f64,
}

impl From<&SummaryStats> for MethodMetrics {
    fn from(stats: &SummaryStats) -> Self {
        Self {
            n: stats.n,
            wall_s: (&stats.wall_s).into(),
            throughput_gib_s: (&stats.throughput_gib_s).into(),
            median_rss_mb: stats.median_rss_mb,
        }
    }
}

/// Headline comparison: ratio of the slower median over the faster one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeedupSummary {
    /// Label of the method with the smaller median wall time.
    pub faster: String,
    /// Label of the method with the larger median wall time.
    pub slower: String,
    /// `slower.median / faster.median`.
    pub median_speedup: f64,
}

impl SpeedupSummary {
    /// Compute the headline speedup from `(label, median wall seconds)`
    /// pairs. Requires at least two methods; with more than two, the
    /// headline compares the slowest against the fastest.
    pub fn from_medians(medians: &[(String, f64)]) -> Option<Self> {
        if medians.len() < 2 {
            return None;
        }
        let faster = medians
            .iter()
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))?;
        let slower = medians
            .iter()
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))?;
        let median_speedup = if faster.1 > 0.0 { slower.1 / faster.1 } else { 0.0 };
        Some(Self {
            faster: faster.0.clone(),
            slower: slower.0.clone(),
            median_speedup,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speedup_from_medians() {
        let medians = vec![("fast".to_string(), 0.5), ("slow".to_string(), 1.0)];
        let s = SpeedupSummary::from_medians(&medians).unwrap();
        assert_eq!(s.faster, "fast");
        assert_eq!(s.slower, "slow");
        assert!((s.median_speedup - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_speedup_three_methods_takes_extremes() {
        let medians = vec![
            ("a".to_string(), 0.4),
            ("b".to_string(), 0.8),
            ("c".to_string(), 1.2),
        ];
        let s = SpeedupSummary::from_medians(&medians).unwrap();
        assert_eq!(s.faster, "a");
        assert_eq!(s.slower, "c");
        assert!((s.median_speedup - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_speedup_needs_two_methods() {
        assert!(SpeedupSummary::from_medians(&[("only".to_string(), 1.0)]).is_none());
    }

    #[test]
    fn test_dataset_size_gib() {
        let d = DatasetInfo {
            path: "x.log".to_string(),
            size_bytes: 1 << 30,
        };
        assert!((d.size_gib() - 1.0).abs() < 1e-12);
    }
}
