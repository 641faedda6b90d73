//! Configuration loading: optional JSON file, then environment overrides

use std::path::Path;

use monosprite_config::EditorConfig;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

/// Environment variables read by [`apply_env_overrides`]
pub const ENV_ZOOM: &str = "MONOSPRITE_ZOOM";
pub const ENV_THRESHOLD: &str = "MONOSPRITE_THRESHOLD";
pub const ENV_MAX_HISTORY: &str = "MONOSPRITE_MAX_HISTORY";

/// Load the editor config from an optional file and the process environment
pub fn load(path: Option<&Path>) -> Result<EditorConfig, ConfigError> {
    let config = match path {
        Some(path) => read_file(path)?,
        None => EditorConfig::default(),
    };
    let config = apply_env_overrides(config, |key| std::env::var(key).ok());
    Ok(config.sanitized())
}

fn read_file(path: &Path) -> Result<EditorConfig, ConfigError> {
    let shown = path.display().to_string();
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: shown.clone(),
        source,
    })?;
    let config = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
        path: shown.clone(),
        source,
    })?;
    info!("Loaded config from {}", shown);
    Ok(config)
}

/// Apply `MONOSPRITE_*` overrides; unparsable values are ignored with a warning
pub fn apply_env_overrides(
    mut config: EditorConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> EditorConfig {
    if let Some(zoom) = parse_var(&lookup, ENV_ZOOM) {
        config.zoom = zoom;
    }
    if let Some(threshold) = parse_var(&lookup, ENV_THRESHOLD) {
        config.threshold = threshold;
    }
    if let Some(max_history) = parse_var(&lookup, ENV_MAX_HISTORY) {
        config.max_history = max_history;
    }
    config
}

fn parse_var<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring {}={:?}: not a valid value", key, raw);
            None
        }
    }
}
