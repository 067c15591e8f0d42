// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Difficulty Retarget Lab - Delay Calibration

//! Step-response delay measurement.
//!
//! The window multipliers come from comparing how many blocks each
//! algorithm needs to react to a difficulty jump. A noise-free history of
//! zeros is followed by ones; the delay is the number of ones appended
//! before the estimate reaches the midpoint.

use serde::Serialize;

use crate::algorithms::Smoother;
use crate::types::{Algorithm, NominalWindow, RetargetError, TrimParams};
use crate::window;

const STEP_LOW: f64 = 0.0;
const STEP_HIGH: f64 = 1.0;
const MIDPOINT: f64 = 0.5;

/// Largest raw window accepted by `calibrate`. Measurement cost grows with
/// the square of the window.
pub const MAX_CALIBRATION_WINDOW: u32 = 5_000;

/// Delay measurement for one algorithm at one raw window.
#[derive(Debug, Clone, Serialize)]
pub struct CalibrationEntry {
    pub algorithm: Algorithm,
    pub window: usize,
    pub delay: Option<u64>,
    /// `ma_delay / delay`, the measured MA-equivalent multiplier.
    pub measured_multiplier: Option<f64>,
    /// Multiplier the window normalizer applies.
    pub table_multiplier: f64,
}

/// Blocks after a unit step until the estimate first reaches 0.5.
pub fn measure_delay(algorithm: Algorithm, window: usize, trim: TrimParams) -> Option<u64> {
    let smoother = Smoother::new(algorithm, trim);
    let window = window.max(1);
    // Enough leading zeros that the pre-step estimate is exactly zero.
    let mut history = vec![STEP_LOW; window.saturating_mul(2).saturating_add(trim.lag)];
    let bound = window.saturating_mul(4).saturating_add(trim.lag + trim.cut);
    for step in 1..=bound {
        history.push(STEP_HIGH);
        if smoother.estimate(&history, window) >= MIDPOINT {
            return Some(step as u64);
        }
    }
    None
}

fn delay_ratio(reference: Option<u64>, delay: Option<u64>) -> Option<f64> {
    match (reference?, delay?) {
        (_, 0) => None,
        (r, d) => Some(r as f64 / d as f64),
    }
}

pub fn equivalent_multiplier(algorithm: Algorithm, window: usize, trim: TrimParams) -> Option<f64> {
    delay_ratio(
        measure_delay(Algorithm::Ma, window, trim),
        measure_delay(algorithm, window, trim),
    )
}

/// Calibration table for every algorithm at one raw window.
pub fn calibrate(
    nominal: NominalWindow,
    trim: TrimParams,
) -> Result<Vec<CalibrationEntry>, RetargetError> {
    if nominal.get() > MAX_CALIBRATION_WINDOW {
        return Err(RetargetError::InvalidWindow(nominal.get().to_string()));
    }
    let blocks = nominal.get() as usize;
    let ma_delay = measure_delay(Algorithm::Ma, blocks, trim);
    Ok(Algorithm::ALL
        .iter()
        .map(|&algorithm| {
            let delay = measure_delay(algorithm, blocks, trim);
            CalibrationEntry {
                algorithm,
                window: blocks,
                delay,
                measured_multiplier: delay_ratio(ma_delay, delay),
                table_multiplier: window::multiplier(algorithm),
            }
        })
        .collect())
}
