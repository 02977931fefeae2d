use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::speech::Backend;

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SpeechConfig {
    pub backend: Backend,
    /// espeak words per minute.
    pub rate: u32,
    /// Speech Dispatcher rate, -100..=100. Left to the daemon when unset.
    pub dispatcher_rate: Option<i32>,
    pub poll_interval_ms: u64,
    pub wait_timeout_ms: Option<u64>,
    pub socket_path: Option<PathBuf>,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        return Self {
            backend: Backend::Auto,
            rate: 400,
            dispatcher_rate: None,
            poll_interval_ms: 5,
            wait_timeout_ms: None,
            socket_path: None,
        };
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub speech: SpeechConfig,
    /// Echo the report on stdout before speaking it.
    pub print: bool,
}

impl Default for Config {
    fn default() -> Self {
        return Self { speech: SpeechConfig::default(), print: true };
    }
}

impl Config {
    /// `<config_dir>/recmon/config.json`
    pub fn default_path() -> Option<PathBuf> {
        return dirs::config_dir().map(|dir| dir.join("recmon").join("config.json"));
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        return Ok(serde_json::from_str(&text)?);
    }

    /// An explicit path must exist; the default one may be missing.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        let Some(path) = Self::default_path() else {
            return Ok(Self::default());
        };
        return match Self::from_file(&path) {
            Err(ConfigError::Io(err)) if err.kind() == ErrorKind::NotFound => Ok(Self::default()),
            other => other,
        };
    }
}
