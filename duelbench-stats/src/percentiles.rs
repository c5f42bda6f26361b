//! Percentile Computation
//!
//! Nearest-rank percentiles: for percentile `p` over `n` samples, the
//! reported value is the element at index `ceil(p/100 * n) - 1` of the
//! ascending-sorted list, clamped to `[0, n-1]`. No interpolation — two
//! implementations following this rule report identical p95/p99 values.

/// Compute a nearest-rank percentile over an already sorted slice.
pub fn nearest_rank_sorted(sorted: &[f64], percentile: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let n = sorted.len();
    let rank = ((percentile / 100.0) * n as f64).ceil() as isize - 1;
    let idx = rank.clamp(0, n as isize - 1) as usize;
    sorted[idx]
}

/// Compute a nearest-rank percentile from unsorted samples.
pub fn compute_percentile(samples: &[f64], percentile: f64) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    nearest_rank_sorted(&sorted, percentile)
}

/// Median of a sample set.
///
/// Even-length sets report the mean of the two middle elements, matching
/// the usual convention rather than the nearest-rank rule.
pub fn median(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let n = sorted.len();
    if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    }
}
