use crate::hal::SessionConfig;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Load and validate a session configuration from a JSON file.
///
/// Missing keys fall back to their defaults.
pub fn load(path: impl AsRef<Path>) -> Result<SessionConfig> {
    let path = path.as_ref();
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read session config from {:?}", path))?;

    let config: SessionConfig = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse session config {:?}", path))?;

    config
        .validate()
        .with_context(|| format!("Invalid session config {:?}", path))?;

    Ok(config)
}

/// Write a session configuration as pretty-printed JSON.
pub fn save(path: impl AsRef<Path>, config: &SessionConfig) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(config).context("Failed to serialize session config")?;

    fs::write(path, json).with_context(|| format!("Failed to write session config to {:?}", path))?;

    Ok(())
}
