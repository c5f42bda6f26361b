//! Human-Readable Output
//!
//! Terminal rendering of the environment header and the final comparison.
//! Pure string building; per-trial progress rows are printed by the
//! scheduler as they happen, not here.

use crate::report::{Report, ReportMeta, Stability};

/// Format the environment-analysis header printed before measurement.
pub fn format_environment(meta: &ReportMeta) -> String {
    let mut output = String::new();

    output.push_str("=== Environment Analysis ===\n");
    output.push_str(&format!("cpu_model={}\n", meta.system.cpu_model));
    output.push_str(&format!("scaling_governor={}\n", meta.system.governor));
    output.push_str(&format!(
        "base_process_spawn_overhead={:.3} ms\n",
        meta.calibration.spawn_overhead_s * 1000.0
    ));
    output.push_str(&format!("dataset_gib={:.3}\n", meta.dataset.size_gib()));
    output.push('\n');

    output
}

/// Format the final comparison for terminal display.
pub fn format_human_output(report: &Report) -> String {
    let mut output = String::new();

    output.push('\n');
    output.push_str("=== Advanced Summary (Wall Clock) ===\n");

    for method in &report.methods {
        let tag = match method.stability {
            Stability::Stable => "[STABLE]",
            Stability::Noisy => "[NOISY]",
        };
        let m = &method.metrics;
        output.push_str(&format!(
            "{} {} (CV: {:.2}%):\n",
            method.label.to_uppercase(),
            tag,
            m.wall_s.cv_pct
        ));
        output.push_str(&format!(
            "  Wall Time : Median={:.3}ms  Mean={:.3}ms  p95={:.3}ms  p99={:.3}ms\n",
            m.wall_s.median * 1000.0,
            m.wall_s.mean * 1000.0,
            m.wall_s.p95 * 1000.0,
            m.wall_s.p99 * 1000.0
        ));
        output.push_str(&format!(
            "  Net T-Put : Median={:.3} GiB/s  Max={:.3} GiB/s\n",
            m.throughput_gib_s.median, m.throughput_gib_s.max
        ));
        output.push_str(&format!(
            "  Memory    : Peak RSS={:.2} MB\n",
            m.median_rss_mb
        ));
    }

    output.push_str(&format!(
        "\nOverall Median Speedup: {:.3}x ({} vs {})\n",
        report.speedup.median_speedup, report.speedup.faster, report.speedup.slower
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::*;
    use chrono::Utc;

    fn dummy_metrics(median_s: f64) -> MethodMetrics {
        let d = DistributionMetrics {
            min: median_s * 0.9,
            max: median_s * 1.1,
            mean: median_s,
            median: median_s,
            stdev: median_s * 0.01,
            cv_pct: 1.0,
            p95: median_s * 1.08,
            p99: median_s * 1.1,
        };
        MethodMetrics {
            n: 15,
            wall_s: d.clone(),
            throughput_gib_s: d,
            median_rss_mb: 8.5,
        }
    }

    fn dummy_report() -> Report {
        Report {
            meta: ReportMeta {
                schema_version: SCHEMA_VERSION,
                version: "0.1.0".to_string(),
                timestamp: Utc::now(),
                system: SystemInfo {
                    os: "linux".to_string(),
                    arch: "x86_64".to_string(),
                    cpu_model: "test cpu".to_string(),
                    governor: "performance".to_string(),
                },
                calibration: Calibration {
                    spawn_overhead_s: 0.002,
                    spawn_samples: 50,
                },
                dataset: DatasetInfo {
                    path: "bench.log".to_string(),
                    size_bytes: 1 << 30,
                },
                config: RunConfigInfo {
                    rounds: 15,
                    warmup_rounds: 5,
                    seed: 42,
                    threads: 1,
                    pin_core: None,
                },
            },
            methods: vec![
                MethodReport {
                    label: "scanner".to_string(),
                    stability: Stability::Stable,
                    metrics: dummy_metrics(0.5),
                },
                MethodReport {
                    label: "grep".to_string(),
                    stability: Stability::Noisy,
                    metrics: dummy_metrics(1.0),
                },
            ],
            speedup: SpeedupSummary {
                faster: "scanner".to_string(),
                slower: "grep".to_string(),
                median_speedup: 2.0,
            },
        }
    }

    #[test]
    fn test_environment_header() {
        let out = format_environment(&dummy_report().meta);
        assert!(out.contains("cpu_model=test cpu"));
        assert!(out.contains("scaling_governor=performance"));
        assert!(out.contains("base_process_spawn_overhead=2.000 ms"));
        assert!(out.contains("dataset_gib=1.000"));
    }

    #[test]
    fn test_summary_output() {
        let out = format_human_output(&dummy_report());
        assert!(out.contains("SCANNER [STABLE]"));
        assert!(out.contains("GREP [NOISY]"));
        assert!(out.contains("Overall Median Speedup: 2.000x (scanner vs grep)"));
    }
}
