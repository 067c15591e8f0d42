// Benchmark Report Types
// Structured output for cross-algorithm tracking comparison

use serde::Serialize;
use retarget_lab::{Algorithm, ScenarioKind};
use retarget_lab::calibration::CalibrationEntry;

// ─── Statistics (per-metric Monte Carlo aggregation) ────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct Stats {
    pub mean: f64,
    pub std_dev: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
    pub min: f64,
    pub max: f64,
    pub n: usize,
}

impl Stats {
    /// Aggregate one metric (deviation %, MAE, max error, runtime) across
    /// the seeded runs of a case.
    pub fn from_samples(samples: &[f64]) -> Self {
        let n = samples.len();
        if n == 0 {
            return Self { mean: 0.0, std_dev: 0.0, ci_lower: 0.0, ci_upper: 0.0, min: 0.0, max: 0.0, n: 0 };
        }
        let mean = samples.iter().sum::<f64>() / n as f64;
        let variance = if n > 1 {
            samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
        } else {
            0.0
        };
        let std_dev = variance.sqrt();
        let stderr = std_dev / (n as f64).sqrt();
        let z = 1.96; // 95% CI
        Self {
            mean,
            std_dev,
            ci_lower: mean - z * stderr,
            ci_upper: mean + z * stderr,
            min: samples.iter().cloned().fold(f64::INFINITY, f64::min),
            max: samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
            n,
        }
    }

    /// Half-width of the confidence interval.
    pub fn margin(&self) -> f64 {
        (self.ci_upper - self.ci_lower) / 2.0
    }
}

// ─── Single-Run Result ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct BenchResult {
    pub algorithm: Algorithm,
    pub scenario: ScenarioKind,
    pub seed: u64,
    pub nominal_window: i64,
    pub effective_window: usize,
    pub heights: u64,
    pub mean_deviation_percent: f64,
    pub mean_abs_error: f64,
    pub max_abs_error: f64,
    pub elapsed_ms: u128,
    pub heights_per_sec: f64,
}

// ─── Monte Carlo Report (per algorithm/scenario pair) ───────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct MonteCarloReport {
    pub algorithm: Algorithm,
    pub scenario: ScenarioKind,
    pub effective_window: usize,
    pub n_runs: usize,
    pub mean_deviation_percent: Stats,
    pub mean_abs_error: Stats,
    pub max_abs_error: Stats,
    pub elapsed_ms: Stats,
    pub individual_runs: Vec<BenchResult>,
}

// ─── Top-Level Report ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct BenchReport {
    pub version: &'static str,
    pub prng: &'static str,
    pub n_runs_per_case: usize,
    pub base_seed: u64,
    pub nominal_window: i64,
    pub max_height: u64,
    pub best_per_scenario: Vec<ScenarioWinner>,
    pub cases: Vec<MonteCarloReport>,
    pub calibration: Option<Vec<CalibrationEntry>>,
}

/// Lowest mean deviation among the algorithms run on one scenario.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioWinner {
    pub scenario: ScenarioKind,
    pub algorithm: Algorithm,
    pub mean_deviation_percent: f64,
}

pub fn best_per_scenario(reports: &[MonteCarloReport]) -> Vec<ScenarioWinner> {
    ScenarioKind::ALL
        .iter()
        .filter_map(|&scenario| {
            reports
                .iter()
                .filter(|r| r.scenario == scenario)
                .min_by(|a, b| {
                    a.mean_deviation_percent.mean.total_cmp(&b.mean_deviation_percent.mean)
                })
                .map(|r| ScenarioWinner {
                    scenario,
                    algorithm: r.algorithm,
                    mean_deviation_percent: r.mean_deviation_percent.mean,
                })
        })
        .collect()
}
