use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::core::distance::ReferencePoint;
use crate::models::{ScoringWeights, SelectionLimits};
use crate::services::{EmbeddingLimits, SupabaseTables};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub supabase: SupabaseSettings,
    pub embedding: EmbeddingSettings,
    #[serde(default)]
    pub catalog: CatalogSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub selection: SelectionSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SupabaseSettings {
    pub url: String,
    pub service_role_key: String,
    #[serde(default = "default_preferences_table")]
    pub preferences_table: String,
    #[serde(default = "default_history_table")]
    pub history_table: String,
    #[serde(default = "default_liked_table")]
    pub liked_table: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl SupabaseSettings {
    pub fn tables(&self) -> SupabaseTables {
        SupabaseTables {
            user_preferences: self.preferences_table.clone(),
            viewed_recommendations: self.history_table.clone(),
            liked_recommendations: self.liked_table.clone(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_preferences_table() -> String { "user_preferences".to_string() }
fn default_history_table() -> String { "viewed_recommendations".to_string() }
fn default_liked_table() -> String { "liked_recommendations".to_string() }
fn default_timeout_secs() -> u64 { 30 }

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingSettings {
    #[serde(default = "default_embedding_endpoint")]
    pub endpoint: String,
    pub api_key: String,
    #[serde(default = "default_embedding_model")]
    pub model: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_in_flight")]
    pub max_in_flight: usize,
}

impl EmbeddingSettings {
    pub fn limits(&self) -> EmbeddingLimits {
        EmbeddingLimits {
            timeout: Duration::from_secs(self.timeout_secs),
            max_in_flight: self.max_in_flight,
        }
    }
}

fn default_embedding_endpoint() -> String { "https://api.openai.com/v1".to_string() }
fn default_embedding_model() -> String { "text-embedding-3-small".to_string() }
fn default_max_in_flight() -> usize { 16 }

/// Where the experience catalog comes from
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogSettings {
    /// `.toml` or `.json` file; the built-in catalog is used when unset
    pub path: Option<String>,
    /// Hotel coordinates used to derive missing distances
    pub reference_latitude: Option<f64>,
    pub reference_longitude: Option<f64>,
}

impl CatalogSettings {
    pub fn reference_point(&self) -> Option<ReferencePoint> {
        match (self.reference_latitude, self.reference_longitude) {
            (Some(latitude), Some(longitude)) => Some(ReferencePoint { latitude, longitude }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringSettings {
    #[serde(default = "default_proximity_weight")]
    pub proximity_weight: f64,
    #[serde(default = "default_partner_weight")]
    pub partner_weight: f64,
    #[serde(default = "default_proximity_horizon_km")]
    pub proximity_horizon_km: f64,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            proximity_weight: default_proximity_weight(),
            partner_weight: default_partner_weight(),
            proximity_horizon_km: default_proximity_horizon_km(),
        }
    }
}

impl From<&ScoringSettings> for ScoringWeights {
    fn from(settings: &ScoringSettings) -> Self {
        Self {
            proximity: settings.proximity_weight,
            partner: settings.partner_weight,
            proximity_horizon_km: settings.proximity_horizon_km,
        }
    }
}

fn default_proximity_weight() -> f64 { 0.2 }
fn default_partner_weight() -> f64 { 0.1 }
fn default_proximity_horizon_km() -> f64 { 20.0 }

#[derive(Debug, Clone, Deserialize)]
pub struct SelectionSettings {
    #[serde(default = "default_target_count")]
    pub target_count: usize,
    #[serde(default = "default_max_per_category")]
    pub max_per_category: usize,
    #[serde(default = "default_min_count")]
    pub min_count: usize,
}

impl Default for SelectionSettings {
    fn default() -> Self {
        Self {
            target_count: default_target_count(),
            max_per_category: default_max_per_category(),
            min_count: default_min_count(),
        }
    }
}

impl From<&SelectionSettings> for SelectionLimits {
    fn from(settings: &SelectionSettings) -> Self {
        Self {
            target_count: settings.target_count,
            max_per_category: settings.max_per_category,
            min_count: settings.min_count.min(settings.target_count),
        }
    }
}

fn default_target_count() -> usize { 10 }
fn default_max_per_category() -> usize { 2 }
fn default_min_count() -> usize { 5 }

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
    /// 4. Environment variables (prefixed with MEMORA__)
    /// 5. SUPABASE_URL, SUPABASE_SERVICE_ROLE_KEY and OPENAI_API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., MEMORA__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("MEMORA")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings = apply_well_known_env(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("MEMORA")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Override config values with the env vars the hosted functions already use
fn apply_well_known_env(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    for (var, key) in [
        ("SUPABASE_URL", "supabase.url"),
        ("SUPABASE_SERVICE_ROLE_KEY", "supabase.service_role_key"),
        ("OPENAI_API_KEY", "embedding.api_key"),
    ] {
        if let Ok(value) = env::var(var) {
            builder = builder.set_override(key, value)?;
        }
    }

    builder.build()
}
