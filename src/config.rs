//! Engine configuration.

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::{CalGridError, CalGridResult};

const DEFAULT_MAX_WINDOW_DAYS: i64 = 366;

fn default_max_window_days() -> i64 {
    DEFAULT_MAX_WINDOW_DAYS
}

/// Engine tuning knobs, loadable from `~/.config/calgrid/config.toml`.
///
/// `max_window_days` bounds the query window span so an unbounded rule
/// can never be asked to expand indefinitely. `clamp_zero_interval`
/// selects the recovery policy for an interval of 0: reject (default)
/// or clamp to 1 with a logged warning.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_max_window_days")]
    pub max_window_days: i64,

    #[serde(default)]
    pub clamp_zero_interval: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            max_window_days: DEFAULT_MAX_WINDOW_DAYS,
            clamp_zero_interval: false,
        }
    }
}

impl EngineConfig {
    pub fn config_path() -> CalGridResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CalGridError::Config("Could not determine config directory".into()))?
            .join("calgrid");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default path, falling back to defaults when the file
    /// does not exist.
    pub fn load() -> CalGridResult<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(EngineConfig::default());
        }
        Self::load_from(&path)
    }

    pub fn load_from(path: &std::path::Path) -> CalGridResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: EngineConfig = toml::from_str(&content)
            .map_err(|e| CalGridError::Config(format!("Invalid config file: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CalGridResult<()> {
        if self.max_window_days < 1 {
            return Err(CalGridError::Config(
                "max_window_days must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
