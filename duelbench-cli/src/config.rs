//! Configuration loading from duel.toml
//!
//! Candidates, round counts, and output options can be specified in a
//! `duel.toml` discovered by walking up from the current directory.
//! CLI flags override configuration values.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Duelbench configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuelConfig {
    /// Runner configuration.
    #[serde(default)]
    pub runner: RunnerConfig,
    /// Build-step configuration.
    #[serde(default)]
    pub build: BuildConfig,
    /// Output configuration.
    #[serde(default)]
    pub output: OutputConfig,
    /// Candidate programs to race. At least two are required.
    #[serde(default = "default_candidates", rename = "candidate")]
    pub candidates: Vec<CandidateConfig>,
}

impl Default for DuelConfig {
    fn default() -> Self {
        Self {
            runner: RunnerConfig::default(),
            build: BuildConfig::default(),
            output: OutputConfig::default(),
            candidates: default_candidates(),
        }
    }
}

/// Runner configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Dataset path.
    #[serde(default = "default_dataset")]
    pub dataset: String,
    /// Measurement rounds.
    #[serde(default = "default_runs")]
    pub runs: usize,
    /// Warmup rounds (timings discarded).
    #[serde(default = "default_warmup")]
    pub warmup: usize,
    /// Thread hint substituted into candidate templates.
    #[serde(default = "default_threads")]
    pub threads: usize,
    /// CPU core to pin candidates to via taskset.
    #[serde(default)]
    pub pin_core: Option<u32>,
    /// Seed for the interleaving shuffle.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// No-op launches used to calibrate spawn overhead.
    #[serde(default = "default_spawn_samples")]
    pub spawn_samples: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            dataset: default_dataset(),
            runs: default_runs(),
            warmup: default_warmup(),
            threads: default_threads(),
            pin_core: None,
            seed: default_seed(),
            spawn_samples: default_spawn_samples(),
        }
    }
}

fn default_dataset() -> String {
    "bench.log".to_string()
}
fn default_runs() -> usize {
    15
}
fn default_warmup() -> usize {
    5
}
fn default_threads() -> usize {
    1
}
fn default_seed() -> u64 {
    42
}
fn default_spawn_samples() -> usize {
    duelbench_core::DEFAULT_SPAWN_SAMPLES
}

/// Build-step configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Whether to run the build command before benchmarking.
    #[serde(default = "default_auto")]
    pub auto: bool,
    /// Explicit build command; when absent, `cargo build --bins` with
    /// `--release` unless the debug profile is selected.
    #[serde(default)]
    pub command: Option<Vec<String>>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            auto: default_auto(),
            command: None,
        }
    }
}

fn default_auto() -> bool {
    true
}

impl BuildConfig {
    /// The build command to run for the selected profile.
    pub fn command_for(&self, debug: bool) -> Vec<String> {
        if let Some(ref command) = self.command {
            return command.clone();
        }
        let mut cmd = vec!["cargo".to_string(), "build".to_string()];
        if !debug {
            cmd.push("--release".to_string());
        }
        cmd.push("--bins".to_string());
        cmd
    }
}

/// Output configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Path for the machine-readable JSON report, if wanted.
    #[serde(default)]
    pub json_path: Option<String>,
}

/// One candidate program, as an argv template.
///
/// Placeholders: `{dataset}` → dataset path, `{threads}` → thread hint,
/// `{bin}` → the profile's binary directory (`target/release` or
/// `target/debug`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateConfig {
    /// Method label.
    pub name: String,
    /// Argv template with placeholders.
    pub args: Vec<String>,
}

fn default_candidates() -> Vec<CandidateConfig> {
    vec![
        CandidateConfig {
            name: "scanner".to_string(),
            args: vec![
                "{bin}/scan-newlines".to_string(),
                "{dataset}".to_string(),
                "{threads}".to_string(),
                "--quiet".to_string(),
            ],
        },
        CandidateConfig {
            name: "grep".to_string(),
            args: vec![
                "grep".to_string(),
                "-c".to_string(),
                "^".to_string(),
                "{dataset}".to_string(),
            ],
        },
    ]
}

/// Values substituted into candidate argv templates.
#[derive(Debug, Clone)]
pub struct TemplateVars<'a> {
    /// Dataset path.
    pub dataset: &'a str,
    /// Thread hint.
    pub threads: usize,
    /// Binary directory for the selected profile.
    pub bin_dir: &'a str,
}

/// Expand placeholders in a candidate argv template.
pub fn expand_args(args: &[String], vars: &TemplateVars<'_>) -> Vec<String> {
    args.iter()
        .map(|arg| {
            arg.replace("{dataset}", vars.dataset)
                .replace("{threads}", &vars.threads.to_string())
                .replace("{bin}", vars.bin_dir)
        })
        .collect()
}

impl DuelConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Try to discover and load configuration by walking up from the
    /// current directory.
    pub fn discover() -> Option<Self> {
        let mut dir = std::env::current_dir().ok()?;
        loop {
            let config_path = dir.join("duel.toml");
            if config_path.exists() {
                return Self::load(&config_path).ok();
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }

    /// Generate a default configuration as a TOML string.
    pub fn default_toml() -> String {
        r#"# Duelbench Configuration

[runner]
# Dataset to scan; its byte size drives throughput figures
dataset = "bench.log"
# Measurement rounds
runs = 15
# Warmup rounds (timings discarded)
warmup = 5
# Thread hint substituted into candidate templates
threads = 1
# Seed for the round-interleaving shuffle
seed = 42
# No-op launches used to calibrate spawn overhead
spawn_samples = 50
# CPU core to pin candidates to (uncomment to enable)
# pin_core = 2

[build]
# Run the build command before benchmarking
auto = true
# Explicit build command (uncomment to override the cargo default)
# command = ["cargo", "build", "--release", "--bins"]

[output]
# Machine-readable report path (uncomment to enable)
# json_path = "duelbench.json"

# Candidates are argv templates. Placeholders:
#   {dataset} - dataset path
#   {threads} - thread hint
#   {bin}     - target/release or target/debug
[[candidate]]
name = "scanner"
args = ["{bin}/scan-newlines", "{dataset}", "{threads}", "--quiet"]

[[candidate]]
name = "grep"
args = ["grep", "-c", "^", "{dataset}"]
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DuelConfig::default();
        assert_eq!(config.runner.runs, 15);
        assert_eq!(config.runner.warmup, 5);
        assert_eq!(config.runner.seed, 42);
        assert_eq!(config.candidates.len(), 2);
        assert!(config.build.auto);
    }

    #[test]
    fn test_parse_toml_with_defaults() {
        let toml_str = r#"
            [runner]
            runs = 3
            warmup = 1

            [[candidate]]
            name = "wc"
            args = ["wc", "-l", "{dataset}"]

            [[candidate]]
            name = "grep"
            args = ["grep", "-c", "^", "{dataset}"]
        "#;

        let config: DuelConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.runner.runs, 3);
        assert_eq!(config.runner.warmup, 1);
        // Defaults still apply to omitted keys
        assert_eq!(config.runner.seed, 42);
        assert_eq!(config.candidates.len(), 2);
        assert_eq!(config.candidates[0].name, "wc");
    }

    #[test]
    fn test_default_toml_parses() {
        let config: DuelConfig = toml::from_str(&DuelConfig::default_toml()).unwrap();
        assert_eq!(config.runner.dataset, "bench.log");
        assert_eq!(config.candidates.len(), 2);
    }

    #[test]
    fn test_expand_args() {
        let vars = TemplateVars {
            dataset: "data/big.log",
            threads: 4,
            bin_dir: "target/release",
        };
        let args = vec![
            "{bin}/scan-newlines".to_string(),
            "{dataset}".to_string(),
            "{threads}".to_string(),
            "--quiet".to_string(),
        ];
        assert_eq!(
            expand_args(&args, &vars),
            [
                "target/release/scan-newlines",
                "data/big.log",
                "4",
                "--quiet"
            ]
        );
    }

    #[test]
    fn test_build_command_profiles() {
        let build = BuildConfig::default();
        assert_eq!(
            build.command_for(false),
            ["cargo", "build", "--release", "--bins"]
        );
        assert_eq!(build.command_for(true), ["cargo", "build", "--bins"]);

        let custom = BuildConfig {
            auto: true,
            command: Some(vec!["make".to_string(), "all".to_string()]),
        };
        assert_eq!(custom.command_for(false), ["make", "all"]);
    }
}
