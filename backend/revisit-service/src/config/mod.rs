//! Service configuration
//!
//! Every section is read from `REVISIT_`-prefixed environment variables.
//! Personalization fallbacks use the longer `REVISIT_DEFAULT_` prefix.

use crate::error::ConfigError;
use crate::models::PersonalizationSettings;
use crate::services::EngineOptions;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use validator::Validate;

const ENV_PREFIX: &str = "REVISIT_";
const DEFAULTS_PREFIX: &str = "REVISIT_DEFAULT_";

#[derive(Debug, Clone)]
pub struct Config {
    pub service: ServiceConfig,
    pub engine: EngineConfig,
    pub defaults: DefaultsConfig,
    pub snapshot: SnapshotConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ServiceConfig {
    #[validate(length(min = 1))]
    #[serde(default = "default_service_name")]
    pub service_name: String,

    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EngineConfig {
    /// Number of most recent visits considered per run
    #[validate(range(min = 1, max = 10000))]
    #[serde(default = "default_history_window")]
    pub history_window: usize,

    #[validate(range(min = 1))]
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Limit used by the binary when none is given on the command line
    #[validate(range(min = 1))]
    #[serde(default = "default_limit")]
    pub default_limit: usize,
}

/// Fallbacks for personalization fields missing from the settings store
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DefaultsConfig {
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(default = "default_recency_weight")]
    pub recency_weight: f64,

    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(default = "default_frequency_weight")]
    pub frequency_weight: f64,

    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(default = "default_feedback_weight")]
    pub feedback_weight: f64,

    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(default)]
    pub min_score: f64,

    #[validate(range(min = 1))]
    #[serde(default = "default_max_recommendations")]
    pub max_recommendations: usize,
}

/// JSON exports read by the binary
#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotConfig {
    #[serde(default = "default_history_path")]
    pub history_path: PathBuf,
    pub feedback_path: Option<PathBuf>,
    pub settings_path: Option<PathBuf>,
}

fn default_service_name() -> String {
    "revisit-service".to_string()
}

fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}

fn default_history_window() -> usize {
    crate::sources::DEFAULT_HISTORY_WINDOW
}

fn default_cache_ttl_secs() -> u64 {
    crate::services::cache::DEFAULT_TTL.as_secs()
}

fn default_limit() -> usize {
    5
}

fn default_recency_weight() -> f64 {
    PersonalizationSettings::default().recency_weight
}

fn default_frequency_weight() -> f64 {
    PersonalizationSettings::default().frequency_weight
}

fn default_feedback_weight() -> f64 {
    PersonalizationSettings::default().feedback_weight
}

fn default_max_recommendations() -> usize {
    PersonalizationSettings::default().max_recommendations
}

fn default_history_path() -> PathBuf {
    PathBuf::from("history.json")
}

impl Config {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Build the configuration from an explicit set of variables.
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let vars: Vec<(String, String)> = vars.into_iter().collect();

        // `REVISIT_DEFAULT_*` also matches the plain prefix

        let (defaults_vars, plain_vars): (Vec<_>, Vec<_>) = vars
            .into_iter()
            .partition(|(key, _)| key.starts_with(DEFAULTS_PREFIX));

        let config = Config {
            service: envy::prefixed(ENV_PREFIX).from_iter(plain_vars.clone())?,
            engine: envy::prefixed(ENV_PREFIX).from_iter(plain_vars.clone())?,
            defaults: envy::prefixed(DEFAULTS_PREFIX).from_iter(defaults_vars)?,
            snapshot: envy::prefixed(ENV_PREFIX).from_iter(plain_vars)?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.service.validate()?;
        self.engine.validate()?;
        self.defaults.validate()?;
        Ok(())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.engine.cache_ttl_secs)
    }

    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            history_window: self.engine.history_window,
            defaults: self.defaults.settings(),
        }
    }
}

impl DefaultsConfig {
    pub fn settings(&self) -> PersonalizationSettings {
        PersonalizationSettings {
            recency_weight: self.recency_weight,
            frequency_weight: self.frequency_weight,
            feedback_weight: self.feedback_weight,
            min_score: self.min_score,
            max_recommendations: self.max_recommendations,
        }
    }
}
