use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::{olog_debug, Error, Result};

fn default_time_scale() -> f64 {
    1.0
}

fn default_queue_depth() -> usize {
    64
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Multiplier applied to demo prep times (0.01 runs the tour in
    /// hundredths of real time). Must be positive.
    #[serde(default = "default_time_scale")]
    pub time_scale: f64,
    /// Capacity of the batch event channel.
    #[serde(default = "default_queue_depth")]
    pub queue_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            time_scale: default_time_scale(),
            queue_depth: default_queue_depth(),
        }
    }
}

impl Config {
    pub fn orderly_dir() -> Result<PathBuf> {
        Ok(dirs::home_dir().ok_or(Error::NoHomeDir)?.join(".orderly"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::orderly_dir()?.join("orderly.toml"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        olog_debug!("Config::load path={}", path.display());
        if !path.exists() {
            olog_debug!("Config file not found, using defaults");
            return Ok(Self::default());
        }
        let config: Self = toml::from_str(&fs::read_to_string(&path)?)?;
        config.validate()?;
        olog_debug!(
            "Config loaded: time_scale={}, queue_depth={}",
            config.time_scale,
            config.queue_depth
        );
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.validate()?;
        let orderly_dir = Self::orderly_dir()?;
        olog_debug!("Config::save orderly_dir={}", orderly_dir.display());
        if !orderly_dir.exists() {
            fs::create_dir_all(&orderly_dir)?;
        }
        let path = Self::config_path()?;
        fs::write(&path, toml::to_string_pretty(self)?)?;
        olog_debug!("Config saved to {}", path.display());
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.time_scale.is_nan() || self.time_scale <= 0.0 {
            return Err(Error::Validation(format!(
                "time_scale must be positive, got {}",
                self.time_scale
            )));
        }
        if self.queue_depth == 0 {
            return Err(Error::Validation(
                "queue_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
