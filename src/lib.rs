// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Difficulty Retarget Lab

pub mod types;
pub mod window;
pub mod algorithms;
pub mod scenario;
pub mod simulation;
pub mod calibration;

pub use types::*;
pub use algorithms::Smoother;
pub use scenario::SignalGenerator;
pub use simulation::{simulate, SimulationEngine};

use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console, js_name = log)]
    fn console_log(s: &str);
}

// ─── Session State ──────────────────────────────────────────────────────────

/// Browser-facing session. Holds at most one completed run; every successful
/// `compute` replaces it wholesale.
#[wasm_bindgen]
pub struct RetargetLab {
    engine: SimulationEngine,
    last: Option<RunResult>,
}

impl Default for RetargetLab {
    fn default() -> Self {
        Self { engine: SimulationEngine::default(), last: None }
    }
}

// ─── Internal Logic (Testable, pure Rust) ────────────────────────────────────

impl RetargetLab {
    pub fn with_config(config: SimulationConfig) -> Self {
        Self { engine: SimulationEngine::new(config), last: None }
    }

    /// Validate, run to completion, then store. A failed run leaves the
    /// previous result in place.
    pub fn compute_core(
        &mut self,
        algorithm: &str,
        window: &str,
        scenario: &str,
    ) -> Result<&RunResult, RetargetError> {
        let result = self.engine.run_from_inputs(algorithm, window, scenario)?;
        Ok(self.last.insert(result))
    }

    pub fn last_result(&self) -> Option<&RunResult> {
        self.last.as_ref()
    }
}

// ─── WASM Interface ──────────────────────────────────────────────────────────

#[wasm_bindgen]
impl RetargetLab {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        #[cfg(target_arch = "wasm32")]
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));
        Self::default()
    }

    /// Make subsequent runs reproducible.
    pub fn set_seed(&mut self, seed: u64) {
        let config = SimulationConfig { seed: Some(seed), ..self.engine.config().clone() };
        self.engine = SimulationEngine::new(config);
    }

    pub fn set_max_height(&mut self, max_height: u32) {
        let config = SimulationConfig {
            max_height: max_height as u64,
            ..self.engine.config().clone()
        };
        self.engine = SimulationEngine::new(config);
    }

    pub fn compute(
        &mut self,
        algorithm: &str,
        window: &str,
        scenario: &str,
    ) -> Result<JsValue, JsError> {
        let result = self.compute_core(algorithm, window, scenario)?;
        console_log(&format!(
            "{} on {}: window is {}, deviation {}",
            result.algorithm, result.scenario, result.effective_window, result.mean_deviation_percent
        ));
        Ok(serde_wasm_bindgen::to_value(result)?)
    }

    pub fn get_result(&self) -> JsValue {
        match &self.last {
            Some(r) => serde_wasm_bindgen::to_value(r).unwrap_or(JsValue::NULL),
            None => JsValue::NULL,
        }
    }

    pub fn get_summary(&self) -> JsValue {
        match &self.last {
            Some(r) => serde_wasm_bindgen::to_value(&r.summary()).unwrap_or(JsValue::NULL),
            None => JsValue::NULL,
        }
    }

    pub fn mean_deviation_percent(&self) -> Option<f64> {
        self.last.as_ref().map(|r| r.mean_deviation_percent)
    }

    pub fn effective_window(&self) -> Option<u32> {
        self.last.as_ref().map(|r| r.effective_window as u32)
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// Nominal window -> algorithm-specific effective window.
#[wasm_bindgen(js_name = toEffectiveWindow)]
pub fn to_effective_window_js(nominal_window: &str, algorithm: &str) -> Result<u32, JsError> {
    let algorithm: Algorithm = algorithm.parse()?;
    let nominal: NominalWindow = nominal_window.parse()?;
    Ok(window::to_effective_window(nominal, algorithm) as u32)
}

/// Step-response calibration table at a raw window.
#[wasm_bindgen(js_name = calibrateDelays)]
pub fn calibrate_delays_js(nominal_window: &str) -> Result<JsValue, JsError> {
    let nominal: NominalWindow = nominal_window.parse()?;
    let table = calibration::calibrate(nominal, TrimParams::default())?;
    Ok(serde_wasm_bindgen::to_value(&table)?)
}
