// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Difficulty Retarget Lab - Window Equivalence

//! Nominal-to-effective window conversion.
//!
//! Each algorithm reaches the same estimate delay at a different raw window
//! size. The multipliers below were calibrated against a simple moving
//! average on a unit step (see `calibration`).

use crate::types::{Algorithm, NominalWindow};

const MULTIPLIER_MA: f64 = 1.0;
const MULTIPLIER_LWMA: f64 = 1.45;
const MULTIPLIER_CN: f64 = 0.85;
const MULTIPLIER_EMA: f64 = 2.0;

/// MA-equivalent window multiplier for an algorithm.
pub fn multiplier(algorithm: Algorithm) -> f64 {
    match algorithm {
        Algorithm::Ma => MULTIPLIER_MA,
        Algorithm::Lwma => MULTIPLIER_LWMA,
        Algorithm::Cn => MULTIPLIER_CN,
        Algorithm::Ema => MULTIPLIER_EMA,
    }
}

/// `round(nominal * multiplier)`, never below one block.
pub fn to_effective_window(nominal: NominalWindow, algorithm: Algorithm) -> usize {
    let scaled = (nominal.get() as f64 * multiplier(algorithm)).round();
    (scaled as usize).max(1)
}
