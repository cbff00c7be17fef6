use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "default_report_path")]
    pub report_path: String,
    #[serde(default = "default_log_path")]
    pub log_path: String,
    #[serde(default = "default_cpu_sample_interval_ms")]
    pub cpu_sample_interval_ms: u64,
    #[serde(default)]
    pub platform_detail: PlatformDetailConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlatformDetailConfig {
    #[serde(default = "default_profiler_command")]
    pub command: String,
    #[serde(default = "default_profiler_args")]
    pub args: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            report_path: default_report_path(),
            log_path: default_log_path(),
            cpu_sample_interval_ms: default_cpu_sample_interval_ms(),
            platform_detail: PlatformDetailConfig::default(),
        }
    }
}

impl Default for PlatformDetailConfig {
    fn default() -> Self {
        Self {
            command: default_profiler_command(),
            args: default_profiler_args(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse YAML in {path}: {source}")]
    Parse {
        path: String,
        source: serde_yaml::Error,
    },
    #[error("invalid configuration: {0}")]
    Validation(String),
}

impl Config {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path_ref = path.as_ref();
        let path_display = path_ref.display().to_string();
        let text = fs::read_to_string(path_ref).map_err(|source| ConfigError::Read {
            path: path_display.clone(),
            source,
        })?;

        let cfg: Config = serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path_display,
            source,
        })?;

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.report_path.trim().is_empty() {
            return Err(ConfigError::Validation(
                "report_path must not be empty".to_string(),
            ));
        }
        if self.log_path.trim().is_empty() {
            return Err(ConfigError::Validation(
                "log_path must not be empty".to_string(),
            ));
        }
        if self.report_path == self.log_path {
            return Err(ConfigError::Validation(
                "report_path and log_path must point to different files".to_string(),
            ));
        }
        if !(100..=60_000).contains(&self.cpu_sample_interval_ms) {
            return Err(ConfigError::Validation(
                "cpu_sample_interval_ms must be in the range 100..60000".to_string(),
            ));
        }
        if self.platform_detail.command.trim().is_empty() {
            return Err(ConfigError::Validation(
                "platform_detail.command must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    pub fn cpu_sample_interval(&self) -> Duration {
        Duration::from_millis(self.cpu_sample_interval_ms)
    }

    pub fn example_yaml() -> &'static str {
        include_str!("../config.yaml.example")
    }
}

fn default_report_path() -> String {
    "system_report.json".to_string()
}

fn default_log_path() -> String {
    "system_report.log".to_string()
}

const fn default_cpu_sample_interval_ms() -> u64 {
    1000
}

fn default_profiler_command() -> String {
    "system_profiler".to_string()
}

fn default_profiler_args() -> Vec<String> {
    [
        "SPHardwareDataType",
        "SPStorageDataType",
        "SPMemoryDataType",
        "SPDisplaysDataType",
        "SPNetworkDataType",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
