// Retarget Benchmark Runner v0.1.0 — cross-algorithm tracking comparison
// Monte Carlo (N=30), seedable PRNG, optional delay calibration table
//
// Usage:
//   cargo run --release --bin bench                          # All algorithms × scenarios
//   cargo run --release --bin bench -- --runs 5              # Quick mode (5 runs each)
//   cargo run --release --bin bench -- --algorithm cn        # Filter by algorithm
//   cargo run --release --bin bench -- --scenario hopping    # Filter by scenario
//   cargo run --release --bin bench -- --calibrate           # Print step-delay table
//   cargo run --release --bin bench -- --json                # Report as JSON on stdout

mod report;
mod monte_carlo;

use clap::Parser;
use monte_carlo::Case;
use report::*;
use retarget_lab::calibration::{self, CalibrationEntry};
use retarget_lab::{Algorithm, NominalWindow, ScenarioKind, TrimParams};
use std::time::Instant;

// ─── CLI Parsing ────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "bench", about = "Compare difficulty smoothing algorithms on synthetic signals")]
struct CliArgs {
    /// Seeded runs per algorithm/scenario pair
    #[arg(long, default_value_t = 30)]
    runs: usize,

    /// Base seed; run i uses seed + i
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Nominal window before per-algorithm normalization
    #[arg(long, default_value_t = 52)]
    window: i64,

    /// Heights simulated per run
    #[arg(long, default_value_t = retarget_lab::MAX_HEIGHT)]
    max_height: u64,

    /// Only run this algorithm (ma, lwma, cn, ema)
    #[arg(long)]
    algorithm: Option<Algorithm>,

    /// Only run this scenario (stable, hopping, sine)
    #[arg(long)]
    scenario: Option<ScenarioKind>,

    /// Include the step-response delay calibration table
    #[arg(long)]
    calibrate: bool,

    /// Print the full report as JSON instead of the table
    #[arg(long)]
    json: bool,
}

fn cases(cli: &CliArgs) -> Vec<Case> {
    let (algorithm_filter, scenario_filter) = (cli.algorithm, cli.scenario);
    ScenarioKind::ALL
        .into_iter()
        .filter(|s| scenario_filter.map_or(true, |f| f == *s))
        .flat_map(move |scenario| {
            Algorithm::ALL
                .into_iter()
                .filter(move |a| algorithm_filter.map_or(true, |f| f == *a))
                .map(move |algorithm| Case { algorithm, scenario })
        })
        .collect()
}

fn print_calibration(table: &[CalibrationEntry]) {
    println!("\n  Step-response delay (raw window {}):", table.first().map_or(0, |e| e.window));
    println!("  {:<26} {:>8} {:>12} {:>10}", "Algorithm", "Delay", "Measured×", "Table×");
    for entry in table {
        let delay = entry.delay.map_or("—".to_string(), |d| d.to_string());
        let measured = entry.measured_multiplier.map_or("—".to_string(), |m| format!("{:.3}", m));
        println!("  {:<26} {:>8} {:>12} {:>10.2}",
            entry.algorithm.label(), delay, measured, entry.table_multiplier);
    }
    println!();
}

// ─── Main ───────────────────────────────────────────────────────────────────

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = CliArgs::parse();

    let to_run = cases(&cli);
    if to_run.is_empty() {
        eprintln!("No cases match the given filters");
        std::process::exit(1);
    }

    if !cli.json {
        println!("\n  Retarget Benchmark Runner v0.1.0");
        println!("  PRNG: ChaCha8Rng | Runs/case: {} | Base seed: {} | Window: {} | Heights: {}",
            cli.runs, cli.seed, cli.window, cli.max_height);
        println!("  Running {} case(s)...\n", to_run.len());
        println!("  {:<10} {:<6} {:>6} {:>18} {:>10} {:>10} {:>8}",
            "Scenario", "Algo", "Win", "Deviation%", "MAE", "MaxErr", "Time");
        println!("  {}", "-".repeat(76));
    }

    let suite_start = Instant::now();
    let mut mc_reports = Vec::with_capacity(to_run.len());

    for case in &to_run {
        let report = match monte_carlo::run_monte_carlo(*case, cli.window, cli.max_height, cli.runs, cli.seed) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("  {} / {}: {}", case.scenario, case.algorithm, e);
                std::process::exit(2);
            }
        };

        if !cli.json {
            println!("  {:<10} {:<6} {:>6} {:>10.4}±{:<7.4} {:>10.4} {:>10.4} {:>6.0}ms",
                report.scenario.id(),
                report.algorithm.id(),
                report.effective_window,
                report.mean_deviation_percent.mean,
                report.mean_deviation_percent.margin(),
                report.mean_abs_error.mean,
                report.max_abs_error.mean,
                report.elapsed_ms.mean,
            );
        }
        mc_reports.push(report);
    }

    let suite_elapsed = suite_start.elapsed();
    let winners = best_per_scenario(&mc_reports);
    let calibration_table = if cli.calibrate {
        let table = NominalWindow::new(cli.window)
            .and_then(|nominal| calibration::calibrate(nominal, TrimParams::default()));
        match table {
            Ok(t) => Some(t),
            Err(e) => {
                eprintln!("  Calibration skipped: {}", e);
                None
            }
        }
    } else {
        None
    };

    if cli.json {
        let report = BenchReport {
            version: "0.1.0",
            prng: "ChaCha8Rng",
            n_runs_per_case: cli.runs,
            base_seed: cli.seed,
            nominal_window: cli.window,
            max_height: cli.max_height,
            best_per_scenario: winners,
            cases: mc_reports,
            calibration: calibration_table,
        };
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to serialize report: {}", e);
                std::process::exit(2);
            }
        }
        return;
    }

    println!("  {}", "-".repeat(76));
    println!("  Cases: {}  Suite time: {:.1}s\n", mc_reports.len(), suite_elapsed.as_secs_f64());
    println!("  Best tracker per scenario:");
    for w in &winners {
        println!("    {:<10} {:<26} {:.4}%", w.scenario.id(), w.algorithm.label(), w.mean_deviation_percent);
    }

    if let Some(table) = &calibration_table {
        print_calibration(table);
    } else {
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_narrow_the_case_matrix() {
        let all = CliArgs::parse_from(["bench"]);
        assert_eq!(cases(&all).len(), 12);

        let one_algo = CliArgs::parse_from(["bench", "--algorithm", "cn"]);
        let c = cases(&one_algo);
        assert_eq!(c.len(), 3);
        assert!(c.iter().all(|c| c.algorithm == Algorithm::Cn));

        let pair = CliArgs::parse_from(["bench", "--algorithm", "ema", "--scenario", "sine"]);
        assert_eq!(cases(&pair).len(), 1);
    }

    #[test]
    fn unknown_algorithm_is_a_cli_error() {
        assert!(CliArgs::try_parse_from(["bench", "--algorithm", "sma"]).is_err());
    }
}
