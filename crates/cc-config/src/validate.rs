//! Session validation logic.

use cc_sim::Command;

use crate::schema::{LATEST_VERSION, SessionConfig, SliderDef};

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid controller parameters: {0}")]
    Controller(#[from] cc_controls::ControlError),

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: &str, value: f64, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

pub fn validate_session(config: &SessionConfig) -> Result<(), ValidationError> {
    if config.version == 0 || config.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: config.version,
        });
    }

    config.controller.validate()?;
    validate_sliders(&config.sliders)?;

    let limits = config.sliders.limits();
    if !limits.contains(config.initial_speed) {
        return Err(invalid(
            "initial_speed",
            config.initial_speed,
            "outside slider range",
        ));
    }
    if !limits.contains(config.desired_speed) {
        return Err(invalid(
            "desired_speed",
            config.desired_speed,
            "outside slider range",
        ));
    }

    for &m in &config.perturbations {
        if !m.is_finite() || m <= 0.0 {
            return Err(invalid("perturbations", m, "must be positive"));
        }
    }

    for step in &config.script {
        if let Command::RequestPerturbation { magnitude } = step.command
            && (!magnitude.is_finite() || magnitude <= 0.0)
        {
            return Err(invalid(
                "script.request_perturbation.magnitude",
                magnitude,
                "must be positive",
            ));
        }
    }

    Ok(())
}

fn validate_sliders(sliders: &SliderDef) -> Result<(), ValidationError> {
    if !sliders.min_speed.is_finite() || sliders.min_speed < 0.0 {
        return Err(invalid("sliders.min_speed", sliders.min_speed, "must be >= 0"));
    }
    if !sliders.max_speed.is_finite() || sliders.max_speed <= sliders.min_speed {
        return Err(invalid(
            "sliders.max_speed",
            sliders.max_speed,
            "must exceed min_speed",
        ));
    }
    let span = sliders.max_speed - sliders.min_speed;
    for (field, step) in [
        ("sliders.step_manual", sliders.step_manual),
        ("sliders.step_cruise", sliders.step_cruise),
    ] {
        if !step.is_finite() || step <= 0.0 || step > span {
            return Err(invalid(field, step, "must be positive and within range"));
        }
    }
    Ok(())
}
