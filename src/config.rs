use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub firestore: FirestoreSettings,
    #[serde(default)]
    pub auth: AuthSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
    /// CORS allow-list; unset means permissive (local development).
    #[serde(default)]
    pub allowed_origins: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FirestoreSettings {
    #[serde(default = "default_firestore_base_url")]
    pub base_url: String,
    pub project_id: String,
    pub api_token: String,
}

fn default_firestore_base_url() -> String {
    "https://firestore.googleapis.com/v1".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    #[serde(default = "default_jwks_url")]
    pub jwks_url: String,
    /// Firebase project id used for issuer/audience checks. Falls back to
    /// `firestore.project_id` when unset.
    #[serde(default)]
    pub project_id: Option<String>,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            jwks_url: default_jwks_url(),
            project_id: None,
        }
    }
}

fn default_jwks_url() -> String {
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com"
        .to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchingSettings {
    /// Cap applied to match responses by the HTTP layer. Unset = unlimited.
    pub max_results: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_species_weight")]
    pub species: u32,
    #[serde(default = "default_breed_weight")]
    pub breed: u32,
    #[serde(default = "default_sex_same_weight")]
    pub sex_same: u32,
    #[serde(default = "default_sex_different_weight")]
    pub sex_different: u32,
    #[serde(default = "default_colour_weight")]
    pub colour: u32,
    #[serde(default = "default_location_weight")]
    pub location: u32,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            species: default_species_weight(),
            breed: default_breed_weight(),
            sex_same: default_sex_same_weight(),
            sex_different: default_sex_different_weight(),
            colour: default_colour_weight(),
            location: default_location_weight(),
        }
    }
}

fn default_species_weight() -> u32 { 5 }
fn default_breed_weight() -> u32 { 3 }
fn default_sex_same_weight() -> u32 { 1 }
fn default_sex_different_weight() -> u32 { 2 }
fn default_colour_weight() -> u32 { 1 }
fn default_location_weight() -> u32 { 2 }

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
    /// 2. Configuration file (config/default.toml, config/local.toml)
    /// 3. Environment variables (prefixed with PETPROTO_)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            // Add default config file
            .add_source(File::with_name("config/default").required(false))
            // Add local config file (for development overrides)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables (prefixed with PETPROTO_)
            // e.g., PETPROTO_SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("PETPROTO")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("PETPROTO")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Overlay the well-known deployment environment variables on top of the
/// file-based configuration. `GOOGLE_PROJECT_ID` and `FIRESTORE_API_TOKEN`
/// are what the hosting platform injects; the `PETPROTO_`-prefixed forms
/// always win when both are set.
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let project_id = env::var("GOOGLE_PROJECT_ID")
        .or_else(|_| env::var("PETPROTO_FIRESTORE__PROJECT_ID"))
        .ok();

    let api_token = env::var("FIRESTORE_API_TOKEN")
        .or_else(|_| env::var("PETPROTO_FIRESTORE__API_TOKEN"))
        .ok();

    let mut builder = Config::builder().add_source(settings);

    if let Some(project_id) = project_id {
        builder = builder.set_override("firestore.project_id", project_id)?;
    }
    if let Some(api_token) = api_token {
        builder = builder.set_override("firestore.api_token", api_token)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let weights = WeightsConfig::default();
        assert_eq!(weights.species, 5);
        assert_eq!(weights.breed, 3);
        assert_eq!(weights.sex_same, 1);
        assert_eq!(weights.sex_different, 2);
        assert_eq!(weights.colour, 1);
        assert_eq!(weights.location, 2);
    }

    #[test]
    fn test_default_logging() {
        let logging = LoggingSettings::default();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, "json");
    }

    #[test]
    fn test_default_jwks_url_points_at_secure_token_keys() {
        let auth = AuthSettings::default();
        assert!(auth.jwks_url.contains("securetoken@system.gserviceaccount.com"));
    }
}
