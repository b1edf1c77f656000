//! cc-config: session file format, validation and scripted runs.

pub mod schema;
pub mod script;
pub mod validate;

pub use schema::*;
pub use script::{Script, build_engine, run_script};
pub use validate::{ValidationError, validate_session};

use std::path::Path;

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Simulation setup error: {0}")]
    Setup(#[from] cc_sim::SimError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_yaml(path: &Path) -> ConfigResult<SessionConfig> {
    let content = std::fs::read_to_string(path)?;
    parse_yaml(&content)
}

pub fn parse_yaml(content: &str) -> ConfigResult<SessionConfig> {
    // An empty document deserializes to unit, not to an all-default map
    let config: SessionConfig = if content.trim().is_empty() {
        SessionConfig::default()
    } else {
        serde_yaml::from_str(content)?
    };
    validate_session(&config)?;
    Ok(config)
}

pub fn save_yaml(path: &Path, config: &SessionConfig) -> ConfigResult<()> {
    validate_session(config)?;
    let content = serde_yaml::to_string(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &Path) -> ConfigResult<SessionConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: SessionConfig = serde_json::from_str(&content)?;
    validate_session(&config)?;
    Ok(config)
}

/// Pick the format from the file extension; anything but `.json` is YAML.
pub fn load(path: &Path) -> ConfigResult<SessionConfig> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => load_json(path),
        _ => load_yaml(path),
    }
}
