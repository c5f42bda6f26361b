//! JSON Output

use crate::report::Report;

/// Generate the prettified machine-readable report.
pub fn generate_json_report(report: &Report) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::*;
    use chrono::Utc;

    #[test]
    fn test_json_round_trip() {
        let report = Report {
            meta: ReportMeta {
                schema_version: SCHEMA_VERSION,
                version: "0.1.0".to_string(),
                timestamp: Utc::now(),
                system: SystemInfo {
                    os: "linux".to_string(),
                    arch: "x86_64".to_string(),
                    cpu_model: "unknown".to_string(),
                    governor: "unknown".to_string(),
                },
                calibration: Calibration {
                    spawn_overhead_s: 0.0,
                    spawn_samples: 0,
                },
                dataset: DatasetInfo {
                    path: "bench.log".to_string(),
                    size_bytes: 1024,
                },
                config: RunConfigInfo {
                    rounds: 2,
                    warmup_rounds: 1,
                    seed: 7,
                    threads: 1,
                    pin_core: Some(2),
                },
            },
            methods: vec![],
            speedup: SpeedupSummary {
                faster: "a".to_string(),
                slower: "b".to_string(),
                median_speedup: 1.5,
            },
        };

        let json = generate_json_report(&report).unwrap();
        let parsed: Report = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.meta.schema_version, SCHEMA_VERSION);
        assert_eq!(parsed.meta.config.pin_core, Some(2));
        assert_eq!(parsed.speedup.faster, "a");
    }
}
