//! Serializable logger settings

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::error::{ConfigError, ConfigResult};
use crate::logging::{Level, DEFAULT_EXIT_CODE, DEFAULT_TEMPLATE, DEFAULT_TIME_FORMAT};

/// Settings used to build a `MsgLogger`
///
/// Missing keys take their defaults:
///
/// ```yaml
/// name: MyPackage
/// template: "%pkg %(-27)time %(-7)type %file %line - %msg"
/// time_format: "%Y-%m-%d %H:%M:%S%.3f %Z"
/// exit_code: 1
/// debug: true
/// info: true
/// warning: true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Rendered by `%pkg`
    pub name: String,
    pub template: String,
    /// strftime pattern for `%time` and `%utc`
    pub time_format: String,
    /// Exit code used by `err`
    pub exit_code: i32,
    pub debug: bool,
    pub info: bool,
    pub warning: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            name: "msgkit".to_string(),
            template: DEFAULT_TEMPLATE.to_string(),
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            exit_code: DEFAULT_EXIT_CODE,
            debug: true,
            info: true,
            warning: true,
        }
    }
}

impl LoggerConfig {
    /// Default config file path (~/.config/msgkit/config.yaml)
    pub fn user_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".config"));
        config_dir.join("msgkit").join("config.yaml")
    }

    /// Parse settings from YAML text
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load settings from a file. A missing file yields the defaults.
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn to_yaml(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Write settings to a file, creating parent directories
    pub fn save(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_yaml()?)?;
        Ok(())
    }

    /// Enable `level` and above, disable the levels below it
    pub fn set_min_level(&mut self, level: Level) {
        self.debug = Level::Debug >= level;
        self.info = Level::Info >= level;
        self.warning = Level::Warning >= level;
    }

    /// Apply `MSGKIT_*` overrides from the process environment
    pub fn with_env(self) -> ConfigResult<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply `MSGKIT_*` overrides from `lookup`
    pub fn with_overrides<F>(mut self, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(name) = lookup("MSGKIT_NAME") {
            self.name = name;
        }
        if let Some(template) = lookup("MSGKIT_TEMPLATE") {
            self.template = template;
        }
        if let Some(time_format) = lookup("MSGKIT_TIME_FORMAT") {
            self.time_format = time_format;
        }
        if let Some(level) = lookup("MSGKIT_LOG_LEVEL") {
            let level: Level = level
                .parse()
                .map_err(|_| ConfigError::invalid_value("MSGKIT_LOG_LEVEL", level.as_str()))?;
            self.set_min_level(level);
        }
        if let Some(code) = lookup("MSGKIT_EXIT_CODE") {
            self.exit_code = code
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid_value("MSGKIT_EXIT_CODE", code.as_str()))?;
        }
        Ok(self)
    }
}
