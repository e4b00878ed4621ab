//! Configuration loading and parsing.
//!
//! Parses `lined.toml` (or an override path provided by the binary). Every
//! section is optional and falls back to the defaults the tool has always used:
//! 80 000 reserved history slots growing by 10 000, 1024-byte lines, `.` as the
//! print placeholder and a `lined.log` file in the working directory.
//!
//! Unknown fields are ignored and an unparsable file falls back to defaults,
//! so a stale config never prevents a session from starting. Values that make
//! no sense (a zero growth increment, a zero line limit) are clamped by
//! `Config::effective` and the clamp is logged under the `config` target.

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

pub const CONFIG_FILE_NAME: &str = "lined.toml";

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct HistoryConfig {
    #[serde(default = "HistoryConfig::default_initial_capacity")]
    pub initial_capacity: usize,
    #[serde(default = "HistoryConfig::default_growth_increment")]
    pub growth_increment: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            initial_capacity: Self::default_initial_capacity(),
            growth_increment: Self::default_growth_increment(),
        }
    }
}

impl HistoryConfig {
    const fn default_initial_capacity() -> usize {
        80_000
    }
    const fn default_growth_increment() -> usize {
        10_000
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct InputConfig {
    #[serde(default = "InputConfig::default_max_line_bytes")]
    pub max_line_bytes: usize,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            max_line_bytes: Self::default_max_line_bytes(),
        }
    }
}

impl InputConfig {
    const fn default_max_line_bytes() -> usize {
        1024
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    #[serde(default = "OutputConfig::default_placeholder")]
    pub placeholder: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            placeholder: Self::default_placeholder(),
        }
    }
}

impl OutputConfig {
    fn default_placeholder() -> String {
        ".".to_string()
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct LogConfig {
    #[serde(default = "LogConfig::default_enabled")]
    pub enabled: bool,
    #[serde(default = "LogConfig::default_directory")]
    pub directory: PathBuf,
    #[serde(default = "LogConfig::default_file")]
    pub file: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: Self::default_enabled(),
            directory: Self::default_directory(),
            file: Self::default_file(),
        }
    }
}

impl LogConfig {
    const fn default_enabled() -> bool {
        true
    }
    fn default_directory() -> PathBuf {
        PathBuf::from(".")
    }
    fn default_file() -> String {
        "lined.log".to_string()
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parsed file, or defaults when it was missing or unparsable.
    pub file: ConfigFile,
    pub source: Option<PathBuf>,
}

/// Values the session actually runs with, after clamping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveConfig {
    pub initial_capacity: usize,
    pub growth_increment: usize,
    pub max_line_bytes: usize,
    pub placeholder: Vec<u8>,
}

/// Config path: `./lined.toml` when present, else the platform config dir.
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("lined").join(CONFIG_FILE_NAME);
    }
    PathBuf::from(CONFIG_FILE_NAME)
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            info!(target: "config", path = %path.display(), "config_loaded");
            Ok(Config {
                file,
                source: Some(path),
            })
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed_using_defaults");
            Ok(Config::default())
        }
    }
}

impl Config {
    /// Clamp nonsensical values and return the settings a session runs with.
    pub fn effective(&self) -> EffectiveConfig {
        let history = &self.file.history;
        let growth_increment = history.growth_increment.max(1);
        if growth_increment != history.growth_increment {
            info!(
                target: "config",
                raw = history.growth_increment,
                clamped = growth_increment,
                "history_growth_increment_clamped"
            );
        }
        let max_line_bytes = self.file.input.max_line_bytes.max(1);
        if max_line_bytes != self.file.input.max_line_bytes {
            info!(
                target: "config",
                raw = self.file.input.max_line_bytes,
                clamped = max_line_bytes,
                "input_max_line_bytes_clamped"
            );
        }
        EffectiveConfig {
            initial_capacity: history.initial_capacity,
            growth_increment,
            max_line_bytes,
            placeholder: self.file.output.placeholder.as_bytes().to_vec(),
        }
    }
}
