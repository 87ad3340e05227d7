use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// User settings read from `config.json`. Every field is optional in the file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub debounce_ms: u64,
    pub log_group_cap: usize,
    pub log_stream_limit: usize,
    pub log_event_limit: usize,
    pub aws_bin: String,
    pub command_timeout_secs: u64,
    pub tick_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debounce_ms: 400,
            log_group_cap: 50,
            log_stream_limit: 50,
            log_event_limit: 200,
            aws_bin: "aws".to_string(),
            command_timeout_secs: 30,
            tick_ms: 50,
        }
    }
}

impl Settings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs.max(1))
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms.clamp(10, 1000))
    }

    /// Reads `path`. A missing file yields the defaults; a malformed one is an
    /// error.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(err) => return Err(err).with_context(|| format!("read {}", path.display())),
        };
        let settings: Settings = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse {}", path.display()))?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.aws_bin.trim().is_empty() {
            anyhow::bail!("aws_bin must not be empty");
        }
        if self.log_group_cap == 0 {
            anyhow::bail!("log_group_cap must be at least 1");
        }
        Ok(())
    }
}

/// `<config dir>/awstui/config.json`, when the platform has a config dir.
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("awstui").join("config.json"))
}

/// Command-line values that take precedence over the file.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub aws_bin: Option<String>,
    pub debounce_ms: Option<u64>,
}

impl Overrides {
    pub fn apply(self, mut settings: Settings) -> Settings {
        if let Some(bin) = self.aws_bin {
            settings.aws_bin = bin;
        }
        if let Some(ms) = self.debounce_ms {
            settings.debounce_ms = ms;
        }
        settings
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
