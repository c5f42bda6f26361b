//! Trial Scheduler
//!
//! Drives three strictly ordered phases:
//! 1. Baseline — each candidate runs once; the agreed output becomes the
//!    correctness oracle for every later trial.
//! 2. Warmup — W rounds with randomized interleaving, timings discarded.
//! 3. Measurement — R rounds with the same interleaving discipline; every
//!    trial's output is re-checked against the oracle.
//!
//! Randomizing the within-round order cancels systematic bias (thermal
//! drift, cache warmth, I/O ordering) against whichever method would
//! otherwise always run first. Rounds themselves execute in strict
//! sequence; no two trials ever run concurrently.

use crate::error::BenchError;
use duelbench_core::{CandidateCommand, TrialRunner};
use duelbench_stats::GIB;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Net time is floored here so throughput stays finite when the measured
/// wall time dips below the calibrated spawn overhead.
pub const NET_TIME_FLOOR_S: f64 = 1e-4;

/// The result of one timed trial. Immutable once created.
#[derive(Debug, Clone)]
pub struct RunRecord {
    /// Method label.
    pub method: String,
    /// Measurement round, 1-based.
    pub round: usize,
    /// Wall-clock elapsed seconds (includes spawn overhead).
    pub wall_s: f64,
    /// User CPU seconds for the child.
    pub user_s: f64,
    /// System CPU seconds for the child.
    pub sys_s: f64,
    /// Peak resident set size, KiB.
    pub max_rss_kb: i64,
    /// Net throughput, GiB/s, using the overhead-corrected denominator.
    pub throughput_gib_s: f64,
}

/// All records for one method across the measurement phase.
#[derive(Debug, Clone)]
pub struct MethodSamples {
    /// Method label.
    pub label: String,
    /// Records in round order.
    pub records: Vec<RunRecord>,
}

impl MethodSamples {
    /// Wall-clock samples in seconds.
    pub fn wall_samples(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.wall_s).collect()
    }

    /// Peak RSS samples in KiB.
    pub fn rss_samples(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.max_rss_kb as f64).collect()
    }
}

/// Scheduler configuration, built from the environment snapshot and the
/// effective run settings.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Warmup rounds.
    pub warmup_rounds: usize,
    /// Measurement rounds.
    pub rounds: usize,
    /// Shuffle seed; a fixed seed reproduces the exact trial order.
    pub seed: u64,
    /// Calibrated spawn overhead, netted out of throughput denominators.
    pub spawn_overhead_s: f64,
    /// Dataset byte size.
    pub data_size_bytes: u64,
}

/// Produce a uniformly shuffled execution order for one round.
///
/// Pure with respect to execution: ordering is decided before any process
/// is spawned, so it can be tested without a real executor.
pub fn round_order(methods: usize, rng: &mut StdRng) -> Vec<usize> {
    let mut order: Vec<usize> = (0..methods).collect();
    order.shuffle(rng);
    order
}

/// Drives candidates through baseline, warmup, and measurement.
pub struct Scheduler<R: TrialRunner> {
    runner: R,
    candidates: Vec<CandidateCommand>,
    config: SchedulerConfig,
}

impl<R: TrialRunner> Scheduler<R> {
    /// Build a scheduler over at least two candidates.
    pub fn new(runner: R, candidates: Vec<CandidateCommand>, config: SchedulerConfig) -> Self {
        debug_assert!(candidates.len() >= 2, "comparison needs two candidates");
        Self {
            runner,
            candidates,
            config,
        }
    }

    /// Run all three phases and return the per-method sample sets, in
    /// candidate order. Any failure aborts immediately; partial benchmark
    /// data is not meaningful.
    pub fn run(mut self) -> Result<Vec<MethodSamples>, BenchError> {
        let oracle = self.baseline()?;
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        self.warmup(&mut rng)?;
        self.measure(&mut rng, &oracle)
    }

    /// Run each candidate once and establish the correctness oracle.
    fn baseline(&mut self) -> Result<String, BenchError> {
        let mut first: Option<(String, String)> = None;
        for candidate in &self.candidates {
            let out = self.runner.run(candidate)?;
            match &first {
                None => first = Some((candidate.label().to_string(), out.stdout)),
                Some((first_label, first_output)) => {
                    if !outputs_match(first_output, &out.stdout) {
                        return Err(BenchError::BaselineMismatch {
                            first_label: first_label.clone(),
                            first_output: first_output.clone(),
                            other_label: candidate.label().to_string(),
                            other_output: out.stdout,
                        });
                    }
                }
            }
        }
        // new() guarantees at least two candidates
        Ok(first.expect("baseline ran at least one candidate").1)
    }

    fn warmup(&mut self, rng: &mut StdRng) -> Result<(), BenchError> {
        println!("=== Warmup Phase ===");
        for round in 1..=self.config.warmup_rounds {
            for idx in round_order(self.candidates.len(), rng) {
                let candidate = &self.candidates[idx];
                let out = self.runner.run(candidate)?;
                println!(
                    "warmup={:02} method={:<8} wall_ms={:8.3}",
                    round,
                    candidate.label(),
                    out.wall_s * 1000.0
                );
            }
        }
        println!();
        Ok(())
    }

    fn measure(
        &mut self,
        rng: &mut StdRng,
        oracle: &str,
    ) -> Result<Vec<MethodSamples>, BenchError> {
        let mut sets: Vec<MethodSamples> = self
            .candidates
            .iter()
            .map(|c| MethodSamples {
                label: c.label().to_string(),
                records: Vec::with_capacity(self.config.rounds),
            })
            .collect();

        println!("=== Measurement Phase ===");
        for round in 1..=self.config.rounds {
            for idx in round_order(self.candidates.len(), rng) {
                let candidate = &self.candidates[idx];
                let out = self.runner.run(candidate)?;

                if !outputs_match(oracle, &out.stdout) {
                    return Err(BenchError::TrialMismatch {
                        label: candidate.label().to_string(),
                        round,
                        expected: oracle.to_string(),
                        got: out.stdout,
                    });
                }

                let net_s = (out.wall_s - self.config.spawn_overhead_s).max(NET_TIME_FLOOR_S);
                let throughput_gib_s = self.config.data_size_bytes as f64 / net_s / GIB;

                println!(
                    "run={:02} method={:<8} wall_ms={:8.3} cpu_ms={:8.3} max_rss_mb={:6.1} net_gib_s={:6.3}",
                    round,
                    candidate.label(),
                    out.wall_s * 1000.0,
                    (out.user_s + out.sys_s) * 1000.0,
                    out.max_rss_kb as f64 / 1024.0,
                    throughput_gib_s
                );

                sets[idx].records.push(RunRecord {
                    method: candidate.label().to_string(),
                    round,
                    wall_s: out.wall_s,
                    user_s: out.user_s,
                    sys_s: out.sys_s,
                    max_rss_kb: out.max_rss_kb,
                    throughput_gib_s,
                });
            }
        }
        Ok(sets)
    }
}

/// Two outputs agree when they are numerically equal, falling back to an
/// exact trimmed comparison for non-numeric output.
fn outputs_match(a: &str, b: &str) -> bool {
    let (a, b) = (a.trim(), b.trim());
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x == y,
        _ => a == b,
    }
}
