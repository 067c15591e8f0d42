// Monte Carlo Infrastructure — N seeded runs per algorithm/scenario pair
// Each case runs with seeds base..base+N, computing mean ± 95% CI

use retarget_lab::*;

use crate::report::*;

use std::time::Instant;

/// One algorithm/scenario pair to evaluate.
#[derive(Debug, Clone, Copy)]
pub struct Case {
    pub algorithm: Algorithm,
    pub scenario: ScenarioKind,
}

/// Run a single case iteration with a specific seed.
pub fn run_single(
    case: Case,
    nominal_window: i64,
    max_height: u64,
    seed: u64,
) -> Result<BenchResult, RetargetError> {
    let start = Instant::now();
    let engine = SimulationEngine::new(SimulationConfig {
        max_height,
        seed: Some(seed),
        ..Default::default()
    });
    let result = engine.run(case.algorithm, nominal_window, case.scenario)?;
    let summary = result.summary();

    let elapsed = start.elapsed();
    let elapsed_secs = elapsed.as_secs_f64().max(0.001);

    Ok(BenchResult {
        algorithm: case.algorithm,
        scenario: case.scenario,
        seed,
        nominal_window,
        effective_window: result.effective_window,
        heights: summary.heights,
        mean_deviation_percent: result.mean_deviation_percent,
        mean_abs_error: summary.mean_abs_error,
        max_abs_error: summary.max_abs_error,
        elapsed_ms: elapsed.as_millis(),
        heights_per_sec: summary.heights as f64 / elapsed_secs,
    })
}

/// Run Monte Carlo: N runs of a case, aggregate stats.
pub fn run_monte_carlo(
    case: Case,
    nominal_window: i64,
    max_height: u64,
    n_runs: usize,
    base_seed: u64,
) -> Result<MonteCarloReport, RetargetError> {
    let mut results = Vec::with_capacity(n_runs);
    for i in 0..n_runs {
        let seed = base_seed + i as u64;
        let result = run_single(case, nominal_window, max_height, seed)?;
        log::debug!(
            "{} / {} seed {}: deviation {:.4}%",
            case.algorithm, case.scenario, seed, result.mean_deviation_percent
        );
        results.push(result);
    }
    let effective_window = window::to_effective_window(NominalWindow::new(nominal_window)?, case.algorithm);
    Ok(aggregate(case, effective_window, results))
}

/// Aggregate individual runs into a MonteCarloReport.
fn aggregate(case: Case, effective_window: usize, results: Vec<BenchResult>) -> MonteCarloReport {
    let collect = |f: fn(&BenchResult) -> f64| Stats::from_samples(&results.iter().map(f).collect::<Vec<_>>());

    MonteCarloReport {
        algorithm: case.algorithm,
        scenario: case.scenario,
        effective_window,
        n_runs: results.len(),
        mean_deviation_percent: collect(|r| r.mean_deviation_percent),
        mean_abs_error: collect(|r| r.mean_abs_error),
        max_abs_error: collect(|r| r.max_abs_error),
        elapsed_ms: collect(|r| r.elapsed_ms as f64),
        individual_runs: results,
    }
}
