use config::{builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::core::{FieldWeights, WeightConfigError, DEFAULT_PARALLEL_THRESHOLD, DEFAULT_WEIGHTS};
use crate::models::{SortKey, SurveyField};

/// Errors raised while loading settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid weight configuration: {0}")]
    Weights(#[from] WeightConfigError),
}

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    pub supabase: SupabaseSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

#[derive(Debug, Clone, Deserialize)]
pub struct SupabaseSettings {
    pub url: String,
    pub service_key: String,
    #[serde(default = "default_schema")]
    pub schema: String,
    #[serde(default = "default_profiles_table")]
    pub profiles_table: String,
    #[serde(default = "default_survey_table")]
    pub survey_table: String,
    pub request_timeout_secs: Option<u64>,
}

fn default_schema() -> String { "public".to_string() }
fn default_profiles_table() -> String { "profiles".to_string() }
fn default_survey_table() -> String { "survey_answers".to_string() }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheSettings {
    pub pool_ttl_secs: Option<u64>,
    pub pool_cache_size: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_limit")]
    pub default_limit: u16,
    #[serde(default = "default_max_limit")]
    pub max_limit: u16,
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,
    #[serde(default)]
    pub default_sort: SortKey,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
            parallel_threshold: default_parallel_threshold(),
            default_sort: SortKey::default(),
        }
    }
}

fn default_limit() -> u16 { 20 }
fn default_max_limit() -> u16 { 100 }
fn default_parallel_threshold() -> usize { DEFAULT_PARALLEL_THRESHOLD }

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringSettings {
    /// Survey field key (or short alias) -> weight
    #[serde(default = "default_weights")]
    pub weights: BTreeMap<String, f64>,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            weights: default_weights(),
        }
    }
}

fn default_weights() -> BTreeMap<String, f64> {
    SurveyField::ALL
        .iter()
        .map(|field| (field.key().to_string(), DEFAULT_WEIGHTS[field.index()]))
        .collect()
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with NESTMATE__)
    /// 5. SUPABASE_URL / SUPABASE_SERVICE_KEY
    pub fn load() -> Result<Self, SettingsError> {
        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., NESTMATE__SERVER__PORT -> server.port
            .add_source(env_source());

        let settings = with_supabase_env(builder)?.build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Validated weight table
    pub fn field_weights(&self) -> Result<FieldWeights, WeightConfigError> {
        FieldWeights::from_entries(
            self.scoring
                .weights
                .iter()
                .map(|(key, weight)| (key.as_str(), *weight)),
        )
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("NESTMATE")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Apply the conventional Supabase variables on top of the layered config
fn with_supabase_env(mut builder: ConfigBuilder<DefaultState>) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    if let Ok(url) = std::env::var("SUPABASE_URL") {
        builder = builder.set_override("supabase.url", url)?;
    }
    if let Ok(key) = std::env::var("SUPABASE_SERVICE_KEY") {
        builder = builder.set_override("supabase.service_key", key)?;
    }

    Ok(builder)
}
