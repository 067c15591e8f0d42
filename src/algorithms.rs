// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Difficulty Retarget Lab - Smoothing Algorithms

//! Difficulty estimators over an append-only history.
//!
//! Every estimator looks at the most recent `window` observations (the whole
//! history when it is shorter) and returns one value for the current height.
//! An empty history estimates `0.0`.

use crate::types::{Algorithm, TrimParams};

/// Closed set of estimators, dispatched by `Algorithm`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Smoother {
    pub algorithm: Algorithm,
    pub trim: TrimParams,
}

impl Smoother {
    pub fn new(algorithm: Algorithm, trim: TrimParams) -> Self {
        Self { algorithm, trim }
    }

    pub fn estimate(&self, history: &[f64], window: usize) -> f64 {
        match self.algorithm {
            Algorithm::Ma => moving_average(history, window),
            Algorithm::Lwma => linearly_weighted(history, window),
            Algorithm::Cn => cryptonote_trimmed(history, window, self.trim),
            Algorithm::Ema => quadratic_weighted(history, window),
        }
    }
}

/// Most recent `window` values, or all of them.
fn tail(history: &[f64], window: usize) -> &[f64] {
    &history[history.len().saturating_sub(window)..]
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Weighted mean where the `i`-th oldest value weighs `weight(i + 1)`.
fn weighted_mean(values: &[f64], weight: impl Fn(f64) -> f64) -> f64 {
    let (sum, total) = values
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(sum, total), (i, v)| {
            let w = weight((i + 1) as f64);
            (sum + v * w, total + w)
        });
    if total > 0.0 { sum / total } else { 0.0 }
}

pub fn moving_average(history: &[f64], window: usize) -> f64 {
    mean(tail(history, window))
}

pub fn linearly_weighted(history: &[f64], window: usize) -> f64 {
    weighted_mean(tail(history, window), |p| p)
}

pub fn quadratic_weighted(history: &[f64], window: usize) -> f64 {
    weighted_mean(tail(history, window), |p| p * p)
}

/// Cryptonote-style estimate: skip the newest `lag` samples once the history
/// is long enough, sort, drop `cut / 2` from each end when more than
/// `cut + 2` remain, then average.
pub fn cryptonote_trimmed(history: &[f64], window: usize, trim: TrimParams) -> f64 {
    let span = if history.len() > window + trim.lag {
        let extended = tail(history, window + trim.lag);
        &extended[..window]
    } else {
        history
    };

    let mut sorted = span.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let n = sorted.len();
    let kept = if n > trim.cut + 2 {
        &sorted[trim.cut / 2..n - trim.cut / 2]
    } else {
        &sorted[..]
    };
    mean(kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    fn all_smoothers() -> Vec<Smoother> {
        Algorithm::ALL
            .iter()
            .map(|&a| Smoother::new(a, TrimParams::default()))
            .collect()
    }

    // Reference formulas over the entire slice, no windowing.
    fn full_history_formula(algorithm: Algorithm, values: &[f64]) -> f64 {
        match algorithm {
            Algorithm::Ma => values.iter().sum::<f64>() / values.len() as f64,
            Algorithm::Lwma | Algorithm::Ema => {
                let pow = if algorithm == Algorithm::Lwma { 1 } else { 2 };
                let mut sum = 0.0;
                let mut tot = 0.0;
                for (i, v) in values.iter().enumerate() {
                    let w = ((i + 1) as f64).powi(pow);
                    sum += v * w;
                    tot += w;
                }
                sum / tot
            }
            Algorithm::Cn => {
                let mut sorted = values.to_vec();
                sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
                let n = sorted.len();
                let kept = if n > 14 { &sorted[6..n - 6] } else { &sorted[..] };
                kept.iter().sum::<f64>() / kept.len() as f64
            }
        }
    }

    #[test]
    fn short_history_uses_everything() {
        let window = 20;
        let series: Vec<f64> = (0..window).map(|i| ((i * 7) % 11) as f64 / 3.0).collect();
        for smoother in all_smoothers() {
            for len in 1..=window {
                let history = &series[..len];
                let got = smoother.estimate(history, window);
                let want = full_history_formula(smoother.algorithm, history);
                assert!(
                    (got - want).abs() < EPS,
                    "{} len={len}: got {got}, want {want}",
                    smoother.algorithm
                );
            }
        }
    }

    #[test]
    fn single_element_returns_itself() {
        for smoother in all_smoothers() {
            assert!((smoother.estimate(&[0.37], 10) - 0.37).abs() < EPS);
        }
    }

    #[test]
    fn empty_history_is_finite() {
        for smoother in all_smoothers() {
            assert_eq!(smoother.estimate(&[], 10), 0.0);
        }
    }

    #[test]
    fn moving_average_of_constant_is_constant() {
        for n in [1, 5, 50] {
            for w in [1, 3, 50, 200] {
                let history = vec![0.73; n];
                assert!((moving_average(&history, w) - 0.73).abs() < EPS);
            }
        }
    }

    #[test]
    fn moving_average_keeps_only_the_suffix() {
        let history = [100.0, 100.0, 1.0, 2.0, 3.0];
        assert!((moving_average(&history, 3) - 2.0).abs() < EPS);
    }

    #[test]
    fn weighted_variants_lean_toward_recent() {
        let (a, b) = (0.2, 0.9);
        let plain = (a + b) / 2.0;
        for w in [2, 5] {
            let lw = linearly_weighted(&[a, b], w);
            let qw = quadratic_weighted(&[a, b], w);
            assert!(lw > plain, "lwma {lw} should move toward {b}");
            assert!(qw > plain, "ema {qw} should move toward {b}");
            assert!(qw > lw, "quadratic weights favour the newest sample more");
        }
        // Reverse ordering pulls the other way.
        assert!(linearly_weighted(&[b, a], 2) < plain);
        assert!(quadratic_weighted(&[b, a], 2) < plain);
    }

    #[test]
    fn linearly_weighted_matches_hand_computation() {
        // (1*1 + 2*2 + 3*3) / 6
        assert!((linearly_weighted(&[9.0, 1.0, 2.0, 3.0], 3) - 14.0 / 6.0).abs() < EPS);
    }

    #[test]
    fn quadratic_weighted_matches_hand_computation() {
        // (1*1 + 2*4 + 3*9) / 14
        assert!((quadratic_weighted(&[9.0, 1.0, 2.0, 3.0], 3) - 36.0 / 14.0).abs() < EPS);
    }

    #[test]
    fn cryptonote_is_order_invariant() {
        let values: Vec<f64> = (0..30).map(|i| ((i * 13) % 29) as f64).collect();
        let mut reversed = values.clone();
        reversed.reverse();
        let mut shuffled = values.clone();
        shuffled.rotate_left(11);
        let trim = TrimParams::default();
        // Window covers the entire history so only ordering differs.
        let base = cryptonote_trimmed(&values, 40, trim);
        assert!((cryptonote_trimmed(&reversed, 40, trim) - base).abs() < EPS);
        assert!((cryptonote_trimmed(&shuffled, 40, trim) - base).abs() < EPS);
    }

    #[test]
    fn cryptonote_trims_extremes_past_threshold() {
        let trim = TrimParams::default();
        // 15 values > cut + 2: six huge and six tiny outliers vanish.
        let mut values = vec![1000.0; 6];
        values.extend([5.0, 5.0, 5.0]);
        values.extend(vec![-1000.0; 6]);
        assert!((cryptonote_trimmed(&values, 100, trim) - 5.0).abs() < EPS);

        // Exactly cut + 2 values: no trimming.
        let small = vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 14.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        assert_eq!(small.len(), 14);
        assert!((cryptonote_trimmed(&small, 100, trim) - 1.0).abs() < EPS);
    }

    #[test]
    fn cryptonote_ignores_the_most_recent_lag() {
        let trim = TrimParams { cut: 0, lag: 3 };
        // Window 4, history 8 > 4 + 3: keep [1, 2, 3, 4], skip [50, 60, 70].
        let history = [0.0, 1.0, 2.0, 3.0, 4.0, 50.0, 60.0, 70.0];
        assert!((cryptonote_trimmed(&history, 4, trim) - 2.5).abs() < EPS);

        // History 7 == 4 + 3: no lag applied yet, whole history averaged.
        let short = &history[1..];
        let want = short.iter().sum::<f64>() / short.len() as f64;
        assert!((cryptonote_trimmed(short, 4, trim) - want).abs() < EPS);
    }

    #[test]
    fn cryptonote_without_cut_or_lag_is_a_moving_average() {
        let trim = TrimParams { cut: 0, lag: 0 };
        let history: Vec<f64> = (0..50).map(|i| (i as f64 * 0.37).sin()).collect();
        for w in [1, 7, 25, 60] {
            assert!((cryptonote_trimmed(&history, w, trim) - moving_average(&history, w)).abs() < EPS);
        }
    }

    #[test]
    fn estimate_never_mutates_history() {
        let history = vec![3.0, 1.0, 2.0, 9.0, 0.5];
        let copy = history.clone();
        for smoother in all_smoothers() {
            smoother.estimate(&history, 3);
        }
        assert_eq!(history, copy);
    }
}
