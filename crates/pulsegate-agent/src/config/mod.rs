//! Agent config loader (strict parsing).

pub mod schema;

use std::fs;
use std::path::Path;

use pulsegate_core::error::{Error, Result};

pub use schema::{AgentConfig, ExporterSection, HttpSection, ServiceSection};

pub fn load_from_file(path: &str) -> Result<AgentConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<AgentConfig> {
    let cfg: AgentConfig =
        serde_yaml::from_str(s).map_err(|e| Error::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Load `path` when it exists, otherwise fall back to built-in defaults.
/// A malformed file is still a hard error; only absence is forgiven.
pub fn load_or_default(path: &str) -> Result<AgentConfig> {
    if Path::new(path).exists() {
        load_from_file(path)
    } else {
        tracing::warn!(path, "config file not found, using defaults");
        Ok(AgentConfig::default())
    }
}
