use std::io::ErrorKind;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, ErrorConversion, Result};

pub const DEFAULT_BOARD_SIZE: i16 = 20;
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 100;
pub const DEFAULT_SCORE_INCREMENT: u32 = 10;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub board_size: i16,
    pub tick_interval_ms: u64,
    pub score_increment: u32,
    pub initial_length: i16,
    pub seed: Option<u64>,
    pub log_file: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            board_size: DEFAULT_BOARD_SIZE,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            score_increment: DEFAULT_SCORE_INCREMENT,
            initial_length: 1,
            seed: None,
            log_file: None,
        }
    }
}

impl Settings {
    /// Reads settings from a YAML file. A missing file yields the defaults.
    pub fn load(path: &str) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_yaml(&content).with_trace_step(format!("reading {}", path)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(Error::from(err).with_trace_step(format!("reading {}", path))),
        }
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml_ng::from_str(content)
            .map_err(|e| Error::settings(format!("Failed to deserialize settings: {}", e)))
    }

    pub fn validate(&self) -> Result {
        if self.board_size < 5 || self.board_size > 50 {
            return Err(Error::settings("Board size must be between 5 and 50"));
        }
        if self.tick_interval_ms < 50 || self.tick_interval_ms > 5000 {
            return Err(Error::settings("Tick interval must be between 50ms and 5000ms"));
        }
        if self.score_increment < 1 {
            return Err(Error::settings("Score increment must be at least 1"));
        }
        if self.initial_length < 1 || self.initial_length > self.board_size / 2 {
            return Err(Error::settings(format!(
                "Initial length must be between 1 and {}",
                self.board_size / 2
            )));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}
