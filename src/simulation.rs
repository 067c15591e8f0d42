// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Difficulty Retarget Lab - Simulation Core

use rand::Rng;

use crate::algorithms::Smoother;
use crate::scenario::SignalGenerator;
use crate::types::*;
use crate::window;

// ─── SimulationEngine ───────────────────────────────────────────────────────

/// Drives one algorithm over a synthetic difficulty series and scores how
/// closely it tracks the noise-free reference.
#[derive(Debug, Clone, Default)]
pub struct SimulationEngine {
    config: SimulationConfig,
}

/// Growing buffers for a single run. Dropped on failure, so callers never
/// see a partial result.
struct RunBuffers {
    history: Vec<f64>,
    heights: Vec<Option<u64>>,
    reference: Vec<f64>,
    computed: Vec<f64>,
    total_deviation: f64,
}

impl RunBuffers {
    fn with_anchors(capacity: usize) -> Self {
        let mut buffers = Self {
            history: Vec::with_capacity(capacity),
            heights: Vec::with_capacity(capacity),
            reference: Vec::with_capacity(capacity),
            computed: Vec::with_capacity(capacity),
            total_deviation: 0.0,
        };
        for anchor in CHART_ANCHORS {
            buffers.history.push(anchor);
            buffers.heights.push(None);
            buffers.reference.push(anchor);
            buffers.computed.push(anchor);
        }
        buffers
    }
}

impl SimulationEngine {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Run with the configured noise source: seeded ChaCha8 when the config
    /// carries a seed, the thread-local RNG otherwise.
    pub fn run(
        &self,
        algorithm: Algorithm,
        nominal_window: i64,
        scenario: ScenarioKind,
    ) -> Result<RunResult, RetargetError> {
        match self.config.seed {
            Some(seed) => {
                let mut signal = SignalGenerator::seeded(scenario, seed);
                self.run_with_signal(algorithm, nominal_window, &mut signal)
            }
            None => {
                let mut signal = SignalGenerator::unseeded(scenario);
                self.run_with_signal(algorithm, nominal_window, &mut signal)
            }
        }
    }

    /// Parse raw identifiers (as typed into a form) and run.
    pub fn run_from_inputs(
        &self,
        algorithm: &str,
        nominal_window: &str,
        scenario: &str,
    ) -> Result<RunResult, RetargetError> {
        let algorithm: Algorithm = algorithm.parse()?;
        let window: NominalWindow = nominal_window.parse()?;
        let scenario: ScenarioKind = scenario.parse()?;
        self.run(algorithm, window.get() as i64, scenario)
    }

    /// Run against a caller-supplied signal, e.g. a seeded generator in tests.
    pub fn run_with_signal<R: Rng>(
        &self,
        algorithm: Algorithm,
        nominal_window: i64,
        signal: &mut SignalGenerator<R>,
    ) -> Result<RunResult, RetargetError> {
        let nominal = NominalWindow::new(nominal_window)?;
        let max_height = self.config.max_height;
        if max_height == 0 {
            return Err(RetargetError::InvalidMaxHeight);
        }

        let effective_window = window::to_effective_window(nominal, algorithm);
        let smoother = Smoother::new(algorithm, self.config.trim);
        log::debug!(
            "run {} on {}: nominal window {} -> effective {}, {} heights",
            algorithm,
            signal.kind(),
            nominal.get(),
            effective_window,
            max_height
        );

        let mut buf = RunBuffers::with_anchors(max_height as usize + CHART_ANCHORS.len());
        for height in 0..max_height {
            let sample = signal.sample(height);
            buf.history.push(sample.noisy);
            buf.heights.push(Some(height));
            buf.reference.push(sample.reference);

            let estimate = smoother.estimate(&buf.history, effective_window);
            buf.computed.push(estimate);
            buf.total_deviation += (sample.reference - estimate).abs().sqrt();
        }

        let mean_deviation_percent = buf.total_deviation / max_height as f64 * 100.0;
        log::info!(
            "run {} on {} complete: window {}, mean deviation {:.4}%",
            algorithm,
            signal.kind(),
            effective_window,
            mean_deviation_percent
        );

        Ok(RunResult {
            algorithm,
            scenario: signal.kind(),
            heights: buf.heights,
            observed: buf.history,
            reference: buf.reference,
            computed: buf.computed,
            mean_deviation_percent,
            effective_window,
        })
    }
}

/// One-shot run with default trim constants and an unseeded noise source.
pub fn simulate(
    algorithm: Algorithm,
    nominal_window: i64,
    scenario: ScenarioKind,
    max_height: u64,
) -> Result<RunResult, RetargetError> {
    let config = SimulationConfig { max_height, ..Default::default() };
    SimulationEngine::new(config).run(algorithm, nominal_window, scenario)
}
