#![warn(missing_docs)]
//! Duelbench CLI
//!
//! Wires the harness together: configuration layering (duel.toml → CLI
//! flags), pre-flight checks, the environment probe, the trial scheduler,
//! statistical summarization, and report rendering.

mod config;
mod error;
mod scheduler;
mod setup;

pub use config::{
    expand_args, BuildConfig, CandidateConfig, DuelConfig, OutputConfig, RunnerConfig,
    TemplateVars,
};
pub use error::BenchError;
pub use scheduler::{round_order, MethodSamples, RunRecord, Scheduler, SchedulerConfig,
    NET_TIME_FLOOR_S};

use clap::{Parser, Subcommand};
use duelbench_core::{CandidateCommand, EnvironmentSnapshot, OsRunner};
use duelbench_report::{
    format_environment, format_human_output, generate_json_report, Calibration, DatasetInfo,
    MethodMetrics, MethodReport, Report, ReportMeta, RunConfigInfo, SpeedupSummary, SystemInfo,
    SCHEMA_VERSION,
};
use duelbench_stats::{summarize, SummaryStats};
use std::path::PathBuf;

/// Duelbench CLI arguments. Flags override duel.toml values.
#[derive(Parser, Debug)]
#[command(name = "duelbench")]
#[command(author, version, about = "Precision comparative benchmark harness")]
pub struct Cli {
    /// Optional subcommand; defaults to running the benchmark.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Dataset path.
    #[arg(long)]
    pub dataset: Option<PathBuf>,

    /// Number of measurement rounds.
    #[arg(long)]
    pub runs: Option<usize>,

    /// Number of warmup rounds (timings discarded).
    #[arg(long)]
    pub warmup: Option<usize>,

    /// Thread hint substituted into candidate templates.
    #[arg(long)]
    pub threads: Option<usize>,

    /// Pin candidates to this CPU core via taskset.
    #[arg(long)]
    pub pin_core: Option<u32>,

    /// Seed for the round-interleaving shuffle.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Benchmark debug-profile binaries instead of release.
    #[arg(long)]
    pub debug: bool,

    /// Skip the build step.
    #[arg(long)]
    pub no_build: bool,

    /// Write the machine-readable JSON report to this path.
    #[arg(long)]
    pub json_out: Option<PathBuf>,

    /// Verbose logging.
    #[arg(short, long)]
    pub verbose: bool,
}

/// CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the comparison (default).
    Run,
    /// Write a default duel.toml to the current directory.
    Init,
}

/// Effective settings after layering duel.toml under the CLI flags.
#[derive(Debug, Clone)]
struct RunSettings {
    dataset: PathBuf,
    runs: usize,
    warmup: usize,
    threads: usize,
    pin_core: Option<u32>,
    seed: u64,
    spawn_samples: usize,
    debug: bool,
    build: bool,
    json_out: Option<PathBuf>,
    build_config: BuildConfig,
    candidates: Vec<CandidateConfig>,
}

fn merge_settings(cli: &Cli, config: &DuelConfig) -> RunSettings {
    RunSettings {
        dataset: cli
            .dataset
            .clone()
            .unwrap_or_else(|| PathBuf::from(&config.runner.dataset)),
        runs: cli.runs.unwrap_or(config.runner.runs),
        warmup: cli.warmup.unwrap_or(config.runner.warmup),
        threads: cli.threads.unwrap_or(config.runner.threads).max(1),
        pin_core: cli.pin_core.or(config.runner.pin_core),
        seed: cli.seed.unwrap_or(config.runner.seed),
        spawn_samples: config.runner.spawn_samples,
        debug: cli.debug,
        build: config.build.auto && !cli.no_build,
        json_out: cli
            .json_out
            .clone()
            .or_else(|| config.output.json_path.as_ref().map(PathBuf::from)),
        build_config: config.build.clone(),
        candidates: config.candidates.clone(),
    }
}

/// Run the duelbench CLI. Entry point for the binary.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "duelbench=debug"
    } else {
        "duelbench=info"
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Some(Commands::Init) => init_config(),
        Some(Commands::Run) | None => run_bench(&cli),
    }
}

fn init_config() -> anyhow::Result<()> {
    let path = PathBuf::from("duel.toml");
    if path.exists() {
        anyhow::bail!("duel.toml already exists");
    }
    std::fs::write(&path, DuelConfig::default_toml())?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn run_bench(cli: &Cli) -> anyhow::Result<()> {
    setup::check_platform()?;

    let config = DuelConfig::discover().unwrap_or_default();
    let settings = merge_settings(cli, &config);
    let cwd = std::env::current_dir()?;

    if settings.build {
        setup::run_build(&settings.build_config.command_for(settings.debug), &cwd)?;
    }

    let data_size_bytes = setup::check_dataset(&settings.dataset)?;
    let commands = build_commands(&settings, &cwd)?;

    let snapshot = EnvironmentSnapshot::capture(settings.spawn_samples);
    let mut meta = build_report_meta(&snapshot, &settings, data_size_bytes);
    print!("{}", format_environment(&meta));

    let runner = OsRunner::new(&cwd).env("LC_ALL", "C");
    let sched = Scheduler::new(
        runner,
        commands,
        SchedulerConfig {
            warmup_rounds: settings.warmup,
            rounds: settings.runs,
            seed: settings.seed,
            spawn_overhead_s: snapshot.spawn_overhead_s,
            data_size_bytes,
        },
    );
    let sets = sched.run()?;

    let mut stats: Vec<(String, SummaryStats)> = Vec::with_capacity(sets.len());
    for set in &sets {
        let summary = summarize(&set.wall_samples(), &set.rss_samples(), data_size_bytes)?;
        stats.push((set.label.clone(), summary));
    }

    let report = build_report(&mut meta, &stats)?;
    print!("{}", format_human_output(&report));

    if let Some(ref path) = settings.json_out {
        let json = generate_json_report(&report)?;
        std::fs::write(path, json)?;
        eprintln!("JSON report written to: {}", path.display());
    }

    Ok(())
}

/// Expand candidate templates, verify their programs exist, and apply the
/// optional affinity prefix.
fn build_commands(
    settings: &RunSettings,
    cwd: &std::path::Path,
) -> Result<Vec<CandidateCommand>, BenchError> {
    if settings.candidates.len() < 2 {
        return Err(BenchError::TooFewCandidates {
            count: settings.candidates.len(),
        });
    }

    let profile_dir = if settings.debug {
        "target/debug"
    } else {
        "target/release"
    };
    let dataset = settings.dataset.display().to_string();
    let vars = TemplateVars {
        dataset: &dataset,
        threads: settings.threads,
        bin_dir: profile_dir,
    };

    let taskset = match settings.pin_core {
        Some(_) => Some(setup::require_taskset()?),
        None => None,
    };

    let mut commands = Vec::with_capacity(settings.candidates.len());
    for candidate in &settings.candidates {
        let argv = expand_args(&candidate.args, &vars);
        if argv.is_empty() {
            return Err(BenchError::EmptyCommand {
                label: candidate.name.clone(),
            });
        }
        setup::resolve_program(&argv[0], cwd)?;

        let mut command = CandidateCommand::new(&candidate.name, argv);
        if let (Some(core), Some(ref taskset)) = (settings.pin_core, &taskset) {
            command = command.with_affinity(taskset, core);
        }
        commands.push(command);
    }
    Ok(commands)
}

fn build_report_meta(
    snapshot: &EnvironmentSnapshot,
    settings: &RunSettings,
    data_size_bytes: u64,
) -> ReportMeta {
    ReportMeta {
        schema_version: SCHEMA_VERSION,
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        system: SystemInfo {
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            cpu_model: snapshot.cpu_model.clone(),
            governor: snapshot.governor.clone(),
        },
        calibration: Calibration {
            spawn_overhead_s: snapshot.spawn_overhead_s,
            spawn_samples: settings.spawn_samples,
        },
        dataset: DatasetInfo {
            path: settings.dataset.display().to_string(),
            size_bytes: data_size_bytes,
        },
        config: RunConfigInfo {
            rounds: settings.runs,
            warmup_rounds: settings.warmup,
            seed: settings.seed,
            threads: settings.threads,
            pin_core: settings.pin_core,
        },
    }
}

fn build_report(
    meta: &mut ReportMeta,
    stats: &[(String, SummaryStats)],
) -> Result<Report, BenchError> {
    let medians: Vec<(String, f64)> = stats
        .iter()
        .map(|(label, s)| (label.clone(), s.wall_s.median))
        .collect();
    let speedup = SpeedupSummary::from_medians(&medians).ok_or(BenchError::TooFewCandidates {
        count: stats.len(),
    })?;

    let methods = stats
        .iter()
        .map(|(label, s)| MethodReport {
            label: label.clone(),
            stability: s.stability().into(),
            metrics: MethodMetrics::from(s),
        })
        .collect();

    Ok(Report {
        meta: meta.clone(),
        methods,
        speedup,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_cli_overrides_config() {
        let cli = parse(&["duelbench", "--runs", "3", "--seed", "7"]);
        let config = DuelConfig::default();
        let settings = merge_settings(&cli, &config);

        assert_eq!(settings.runs, 3);
        assert_eq!(settings.seed, 7);
        // Untouched values fall through to the config
        assert_eq!(settings.warmup, config.runner.warmup);
        assert_eq!(settings.dataset, PathBuf::from("bench.log"));
    }

    #[test]
    fn test_no_build_flag() {
        let cli = parse(&["duelbench", "--no-build"]);
        let settings = merge_settings(&cli, &DuelConfig::default());
        assert!(!settings.build);
    }

    #[test]
    fn test_threads_floor_at_one() {
        let cli = parse(&["duelbench", "--threads", "0"]);
        let settings = merge_settings(&cli, &DuelConfig::default());
        assert_eq!(settings.threads, 1);
    }

    #[test]
    fn test_json_out_falls_back_to_config() {
        let cli = parse(&["duelbench"]);
        let mut config = DuelConfig::default();
        config.output.json_path = Some("out.json".to_string());
        let settings = merge_settings(&cli, &config);
        assert_eq!(settings.json_out, Some(PathBuf::from("out.json")));

        let cli = parse(&["duelbench", "--json-out", "cli.json"]);
        let settings = merge_settings(&cli, &config);
        assert_eq!(settings.json_out, Some(PathBuf::from("cli.json")));
    }

    #[test]
    fn test_too_few_candidates() {
        let cli = parse(&["duelbench"]);
        let mut config = DuelConfig::default();
        config.candidates.truncate(1);
        let settings = merge_settings(&cli, &config);
        let cwd = std::env::current_dir().unwrap();
        assert!(matches!(
            build_commands(&settings, &cwd),
            Err(BenchError::TooFewCandidates { count: 1 })
        ));
    }
}
