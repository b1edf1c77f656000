//! Session file schema.

use cc_controls::{ControllerParams, TermFlags};
use cc_core::Real;
use cc_sim::{Command, DEFAULT_MAGNITUDES, EngineSetup, Mode, SpeedLimits};
use serde::{Deserialize, Serialize};

pub const LATEST_VERSION: u32 = 1;

/// Everything needed to start one governor session.
///
/// Every field has a default, so an empty document is a valid session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    pub version: u32,
    pub name: String,
    pub controller: ControllerParams,
    pub sliders: SliderDef,
    pub initial_speed: Real,
    pub desired_speed: Real,
    pub start_mode: Mode,
    pub terms: TermFlags,
    pub perturbations: Vec<Real>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub script: Vec<ScriptStep>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            version: LATEST_VERSION,
            name: "cruise".to_string(),
            controller: ControllerParams::default(),
            sliders: SliderDef::default(),
            initial_speed: 60.0,
            desired_speed: 100.0,
            start_mode: Mode::Manual,
            terms: TermFlags::default(),
            perturbations: DEFAULT_MAGNITUDES.to_vec(),
            script: Vec::new(),
        }
    }
}

impl SessionConfig {
    pub fn engine_setup(&self) -> EngineSetup {
        EngineSetup {
            params: self.controller,
            limits: self.sliders.limits(),
            initial_speed: self.initial_speed,
            desired_speed: self.desired_speed,
            terms: self.terms,
            perturbation_magnitudes: self.perturbations.clone(),
        }
    }
}

/// Operator slider range and quantization steps.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SliderDef {
    pub min_speed: Real,
    pub max_speed: Real,
    /// Step of the initial-speed slider.
    pub step_manual: Real,
    /// Step of the desired-speed slider.
    pub step_cruise: Real,
}

impl Default for SliderDef {
    fn default() -> Self {
        Self {
            min_speed: 0.0,
            max_speed: 200.0,
            step_manual: 1.0,
            step_cruise: 5.0,
        }
    }
}

impl SliderDef {
    pub fn limits(&self) -> SpeedLimits {
        SpeedLimits {
            min_speed: self.min_speed,
            max_speed: self.max_speed,
        }
    }

    /// Snap `v` to the nearest step above `min_speed`, inside the range.
    pub fn quantize(&self, v: Real, step: Real) -> Real {
        let clamped = v.clamp(self.min_speed, self.max_speed);
        let steps = ((clamped - self.min_speed) / step).round();
        (self.min_speed + steps * step).min(self.max_speed)
    }

    pub fn quantize_initial(&self, v: Real) -> Real {
        self.quantize(v, self.step_manual)
    }

    pub fn quantize_desired(&self, v: Real) -> Real {
        self.quantize(v, self.step_cruise)
    }
}

/// Command applied just before tick `at_tick` (0-based) of a scripted run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ScriptStep {
    pub at_tick: u64,
    pub command: Command,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantize_snaps_to_steps() {
        let sliders = SliderDef::default();
        assert_eq!(sliders.quantize_desired(103.0), 105.0);
        assert_eq!(sliders.quantize_desired(102.0), 100.0);
        assert_eq!(sliders.quantize_initial(59.6), 60.0);
        assert_eq!(sliders.quantize_desired(-10.0), 0.0);
        assert_eq!(sliders.quantize_desired(400.0), 200.0);
    }

    #[test]
    fn quantize_never_exceeds_max() {
        let sliders = SliderDef {
            min_speed: 0.0,
            max_speed: 198.0,
            step_manual: 1.0,
            step_cruise: 5.0,
        };
        assert_eq!(sliders.quantize_desired(198.0), 198.0);
    }

    #[test]
    fn engine_setup_carries_fields() {
        let config = SessionConfig {
            initial_speed: 40.0,
            perturbations: vec![3.0],
            ..SessionConfig::default()
        };
        let setup = config.engine_setup();
        assert_eq!(setup.initial_speed, 40.0);
        assert_eq!(setup.perturbation_magnitudes, vec![3.0]);
        assert_eq!(setup.limits.max_speed, 200.0);
    }
}
