// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Difficulty Retarget Lab - Type Definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ─── Behavior Constants ─────────────────────────────────────────────────────

/// Number of heights simulated per run by default.
pub const MAX_HEIGHT: u64 = 100_000;

/// Total count of outliers discarded by the cryptonote trimmed mean (half per side).
pub const DIFFICULTY_CUT: usize = 12;

/// Most recent samples hidden from the cryptonote trimmed mean.
pub const DIFFICULTY_LAG: usize = 3;

/// Values prepended to every run's history and series, pinning the chart's y-range.
pub const CHART_ANCHORS: [f64; 2] = [0.0, 1.0];

// ─── Errors ─────────────────────────────────────────────────────────────────

/// Input validation failures. All are raised before a run starts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RetargetError {
    #[error("unknown algorithm `{0}` (expected one of ma, lwma, cn, ema)")]
    InvalidAlgorithm(String),
    #[error("unknown scenario `{0}` (expected one of stable, hopping, sine)")]
    InvalidScenario(String),
    #[error("invalid window `{0}`: must be a positive integer")]
    InvalidWindow(String),
    #[error("max height must be at least 1")]
    InvalidMaxHeight,
}

// ─── Algorithm ──────────────────────────────────────────────────────────────

/// Difficulty smoothing algorithm identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Simple moving average.
    Ma,
    /// Linearly-weighted moving average.
    Lwma,
    /// Cryptonote-style lagged trimmed mean.
    Cn,
    /// Quadratically-weighted moving average, labelled EMA by convention.
    Ema,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [Self::Ma, Self::Lwma, Self::Cn, Self::Ema];

    pub fn id(&self) -> &'static str {
        match self {
            Self::Ma => "ma",
            Self::Lwma => "lwma",
            Self::Cn => "cn",
            Self::Ema => "ema",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Ma => "Moving Average",
            Self::Lwma => "Linearly-Weighted MA",
            Self::Cn => "Cryptonote Trimmed Mean",
            Self::Ema => "EMA (quadratic weights)",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Algorithm {
    type Err = RetargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ma" => Ok(Self::Ma),
            "lwma" => Ok(Self::Lwma),
            "cn" => Ok(Self::Cn),
            "ema" => Ok(Self::Ema),
            other => Err(RetargetError::InvalidAlgorithm(other.to_string())),
        }
    }
}

// ─── Scenario ───────────────────────────────────────────────────────────────

/// Synthetic difficulty trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioKind {
    /// Flat 0.5 baseline; observations are pure uniform noise.
    Stable,
    /// Square wave between 0 and 1 (period 400) plus uniform noise.
    Hopping,
    /// Noise-free sine wave.
    Sine,
}

impl ScenarioKind {
    pub const ALL: [ScenarioKind; 3] = [Self::Stable, Self::Hopping, Self::Sine];

    pub fn id(&self) -> &'static str {
        match self {
            Self::Stable => "stable",
            Self::Hopping => "hopping",
            Self::Sine => "sine",
        }
    }
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ScenarioKind {
    type Err = RetargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "stable" => Ok(Self::Stable),
            "hopping" => Ok(Self::Hopping),
            "sine" => Ok(Self::Sine),
            other => Err(RetargetError::InvalidScenario(other.to_string())),
        }
    }
}

// ─── Nominal Window ─────────────────────────────────────────────────────────

/// User-facing window length before per-algorithm normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NominalWindow(u32);

impl NominalWindow {
    pub fn new(blocks: i64) -> Result<Self, RetargetError> {
        if blocks <= 0 || blocks > u32::MAX as i64 {
            return Err(RetargetError::InvalidWindow(blocks.to_string()));
        }
        Ok(Self(blocks as u32))
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl FromStr for NominalWindow {
    type Err = RetargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let blocks: i64 = s
            .trim()
            .parse()
            .map_err(|_| RetargetError::InvalidWindow(s.to_string()))?;
        Self::new(blocks)
    }
}

// ─── Parameters ─────────────────────────────────────────────────────────────

/// Trim/lag constants for the cryptonote trimmed mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrimParams {
    /// Outliers discarded after sorting, split evenly between both ends.
    pub cut: usize,
    /// Most recent samples skipped to model a delayed difficulty read.
    pub lag: usize,
}

impl Default for TrimParams {
    fn default() -> Self {
        Self { cut: DIFFICULTY_CUT, lag: DIFFICULTY_LAG }
    }
}

/// Run-level configuration. The defaults reproduce the reference tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub max_height: u64,
    pub trim: TrimParams,
    /// Seed for the noise channel. `None` draws from the thread-local RNG.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self { max_height: MAX_HEIGHT, trim: TrimParams::default(), seed: None }
    }
}

// ─── Samples & Results ──────────────────────────────────────────────────────

/// One scenario observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub noisy: f64,
    pub reference: f64,
}

/// Complete output of one simulation run.
///
/// All series share one length: the chart anchors followed by one entry per
/// simulated height. Anchor entries carry no height label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub algorithm: Algorithm,
    pub scenario: ScenarioKind,
    pub heights: Vec<Option<u64>>,
    pub observed: Vec<f64>,
    pub reference: Vec<f64>,
    pub computed: Vec<f64>,
    pub mean_deviation_percent: f64,
    pub effective_window: usize,
}

/// Tracking-error summary over the simulated heights (anchors excluded).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub heights: u64,
    pub mean_abs_error: f64,
    pub max_abs_error: f64,
    pub mean_deviation_percent: f64,
}

impl RunResult {
    /// Number of simulated heights (anchors excluded).
    pub fn simulated_heights(&self) -> usize {
        self.heights.iter().filter(|h| h.is_some()).count()
    }

    pub fn summary(&self) -> RunSummary {
        let errors: Vec<f64> = self
            .heights
            .iter()
            .zip(self.reference.iter().zip(&self.computed))
            .filter(|(h, _)| h.is_some())
            .map(|(_, (r, c))| (r - c).abs())
            .collect();
        let n = errors.len();
        let mean_abs_error = if n > 0 {
            errors.iter().sum::<f64>() / n as f64
        } else {
            0.0
        };
        RunSummary {
            heights: n as u64,
            mean_abs_error,
            max_abs_error: errors.iter().cloned().fold(0.0, f64::max),
            mean_deviation_percent: self.mean_deviation_percent,
        }
    }
}
