#![warn(missing_docs)]
//! Duelbench Statistical Engine
//!
//! Reduces raw timing samples into descriptive statistics:
//! - Nearest-rank percentiles (p95/p99 reproducible across implementations)
//! - Mean, median, stdev and coefficient of variation
//! - Derived throughput figures (GiB/s) summarized the same way as time
//! - A stability label based on CV, advisory only

mod percentiles;
mod summary;

pub use percentiles::{compute_percentile, median, nearest_rank_sorted};
pub use summary::{describe, summarize, Distribution, Stability, SummaryError, SummaryStats};

/// One gibibyte, the unit for all throughput figures.
pub const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// CV above this percentage marks a sample set as noisy.
pub const NOISE_CV_THRESHOLD_PCT: f64 = 5.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(GIB, 1_073_741_824.0);
        assert!((NOISE_CV_THRESHOLD_PCT - 5.0).abs() < f64::EPSILON);
    }
}
