//! Configuration management for voxrelay CLI
//!
//! Stores the relay URL, polling cadence and default voice in
//! ~/.config/voxrelay/config.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use voxrelay::PollSettings;

const CONFIG_DIR: &str = "voxrelay";
const CONFIG_FILE: &str = "config.toml";

/// CLI Configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Wait between polls, in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Maximum polls per question (0 = no cap)
    #[serde(default = "default_max_poll_attempts")]
    pub max_poll_attempts: u32,
    /// Give up on a question after this many seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poll_deadline_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_voice: Option<String>,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_poll_interval_ms() -> u64 {
    1500
}

fn default_max_poll_attempts() -> u32 {
    40
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            poll_interval_ms: default_poll_interval_ms(),
            max_poll_attempts: default_max_poll_attempts(),
            poll_deadline_secs: None,
            default_voice: None,
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join(CONFIG_DIR);
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;

        let config: Config =
            toml::from_str(&content).with_context(|| "Failed to parse config file")?;

        Ok(config)
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let dir = Self::config_dir()?;
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config directory {:?}", dir))?;

        let path = Self::config_path()?;
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&path, content)
            .with_context(|| format!("Failed to write config to {:?}", path))?;

        Ok(())
    }

    /// Polling settings for the run driver
    pub fn poll_settings(&self) -> PollSettings {
        PollSettings {
            interval: Duration::from_millis(self.poll_interval_ms),
            max_attempts: (self.max_poll_attempts > 0).then_some(self.max_poll_attempts),
            deadline: self.poll_deadline_secs.map(Duration::from_secs),
        }
    }

    /// Voice to use: explicit choice, else the configured default
    pub fn voice_or_default(&self, voice: Option<String>) -> Option<String> {
        voice.or_else(|| self.default_voice.clone())
    }
}
