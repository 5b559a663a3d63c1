//! meterctl configuration
//!
//! Layered with figment, lowest priority first:
//! 1. Built-in defaults
//! 2. `<config-dir>/meterctl.{toml,yaml,json}`
//! 3. File given with `--config`
//! 4. `METERCTL_` environment variables (`__` separates nested keys, e.g.
//!    `METERCTL_RULES__PARENT_SS400_FOR_132KV=false`)

use std::path::Path;

use clap::ValueEnum;
use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use voltage_hierarchy::TierRules;

pub const ENV_PREFIX: &str = "METERCTL_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(String),

    #[error("Unsupported config file format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to load configuration: {0}")]
    Load(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Indented tree for terminals
    #[default]
    Tree,
    /// Forest as JSON, as consumed by the dashboard
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeterctlConfig {
    /// tracing filter used when neither `--verbose` nor `RUST_LOG` is set
    pub log_level: String,
    pub color: bool,
    pub rules: TierRules,
    pub output: OutputConfig,
}

impl Default for MeterctlConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            color: true,
            rules: TierRules::default(),
            output: OutputConfig::default(),
        }
    }
}

/// Load configuration from defaults, the config directory, an optional
/// explicit file and the environment
pub fn load_config(
    config_dir: &Path,
    explicit: Option<&Path>,
) -> Result<MeterctlConfig, ConfigError> {
    let mut figment = Figment::from(Serialized::defaults(MeterctlConfig::default()))
        .merge(Toml::file(config_dir.join("meterctl.toml")))
        .merge(Yaml::file(config_dir.join("meterctl.yaml")))
        .merge(Json::file(config_dir.join("meterctl.json")));

    if let Some(path) = explicit {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let extension = path.extension().and_then(|s| s.to_str()).unwrap_or_default();
        figment = match extension {
            "toml" => figment.merge(Toml::file(path)),
            "yaml" | "yml" => figment.merge(Yaml::file(path)),
            "json" => figment.merge(Json::file(path)),
            other => return Err(ConfigError::UnsupportedFormat(other.to_string())),
        };
    }

    figment
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| ConfigError::Load(e.to_string()))
}
