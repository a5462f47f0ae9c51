use crate::indicators::IndicatorParams;
use crate::processor::WorkerConfig;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Prefix of environment overrides, e.g. `INDICATOR_ENGINE__WORKER__THREADS=4`.
pub const ENV_PREFIX: &str = "INDICATOR_ENGINE";
const DEFAULT_CONFIG_FILE: &str = "indicator-engine";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Full,
    Compact,
    Pretty,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    pub level: String,
    pub format: LogFormat,
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Full,
            ansi: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub worker: WorkerConfig,
    pub indicators: IndicatorParams,
}

impl AppConfig {
    /// Layers defaults, then the config file, then `INDICATOR_ENGINE__*`
    /// environment variables.
    ///
    /// An explicit `path` must exist; otherwise `indicator-engine.{toml,json,yaml}`
    /// in the working directory is read when present.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let config = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let app_config: AppConfig = config.try_deserialize()?;
        if app_config.worker.threads == 0 {
            return Err(ConfigError::Message("worker.threads must be at least 1".to_string()));
        }
        Ok(app_config)
    }
}
