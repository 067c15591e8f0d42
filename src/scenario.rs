// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Difficulty Retarget Lab - Synthetic Difficulty Signals

use rand::rngs::ThreadRng;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::types::{Sample, ScenarioKind};

const STABLE_BASELINE: f64 = 0.5;
const HOP_PERIOD: u64 = 400;
const HOP_THRESHOLD: u64 = 200;
const SINE_PERIOD_DIVISOR: f64 = 100.0;

/// Noise-free signal for a scenario at `height`.
pub fn reference_at(kind: ScenarioKind, height: u64) -> f64 {
    match kind {
        ScenarioKind::Stable => STABLE_BASELINE,
        ScenarioKind::Hopping => hop_base(height),
        ScenarioKind::Sine => sine_base(height),
    }
}

fn hop_base(height: u64) -> f64 {
    if height % HOP_PERIOD > HOP_THRESHOLD { 1.0 } else { 0.0 }
}

fn sine_base(height: u64) -> f64 {
    (height as f64 / SINE_PERIOD_DIVISOR).sin()
}

/// Per-height observation source. Sampling a height never depends on which
/// heights were sampled before; the only state is the noise RNG.
pub struct SignalGenerator<R: Rng> {
    kind: ScenarioKind,
    rng: R,
}

impl SignalGenerator<ThreadRng> {
    /// Unseeded generator: noise comes from the thread-local RNG.
    pub fn unseeded(kind: ScenarioKind) -> Self {
        Self::with_rng(kind, rand::thread_rng())
    }
}

impl SignalGenerator<ChaCha8Rng> {
    /// Reproducible generator: equal seeds give bit-identical noise.
    pub fn seeded(kind: ScenarioKind, seed: u64) -> Self {
        Self::with_rng(kind, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> SignalGenerator<R> {
    pub fn with_rng(kind: ScenarioKind, rng: R) -> Self {
        Self { kind, rng }
    }

    pub fn kind(&self) -> ScenarioKind {
        self.kind
    }

    pub fn sample(&mut self, height: u64) -> Sample {
        let reference = reference_at(self.kind, height);
        let noisy = match self.kind {
            // Pure noise, not baseline + noise.
            ScenarioKind::Stable => self.rng.gen::<f64>(),
            ScenarioKind::Hopping => hop_base(height) + self.rng.gen::<f64>(),
            ScenarioKind::Sine => reference,
        };
        Sample { noisy, reference }
    }
}
