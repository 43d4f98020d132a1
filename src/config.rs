use crate::models::DeckTuning;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub deck: DeckSettings,
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
fn default_port() -> u16 { 8090 }

/// Matching service used as profile source and decision sink
#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    /// Base URL, decks fall back to `deck.seed_file` when unset
    pub endpoint: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_photo_url_template")]
    pub photo_url_template: String,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_secs: default_timeout_secs(),
            photo_url_template: default_photo_url_template(),
        }
    }
}

fn default_timeout_secs() -> u64 { 10 }
fn default_photo_url_template() -> String { "/photos/{id}".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct DeckSettings {
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_max_sessions")]
    pub max_sessions: u64,
    #[serde(default = "default_session_idle_secs")]
    pub session_idle_secs: u64,
    /// JSON array of profiles served when no matching endpoint is configured
    pub seed_file: Option<String>,
    #[serde(default)]
    pub gesture: DeckTuning,
}

impl Default for DeckSettings {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            max_sessions: default_max_sessions(),
            session_idle_secs: default_session_idle_secs(),
            seed_file: None,
            gesture: DeckTuning::default(),
        }
    }
}

fn default_batch_size() -> usize { 20 }
fn default_max_sessions() -> u64 { 10_000 }
fn default_session_idle_secs() -> u64 { 1800 }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with LUME_)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., LUME_DECK__GESTURE__EXIT_DURATION_MS -> deck.gesture.exit_duration_ms
            .add_source(
                Environment::with_prefix("LUME")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path instead of the config/ directory
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("LUME")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }
}

/// MATCHING_SERVICE_URL wins over the configured matching endpoint
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    let mut builder = Config::builder().add_source(settings);

    if let Ok(endpoint) = std::env::var("MATCHING_SERVICE_URL") {
        builder = builder.set_override("matching.endpoint", endpoint)?;
    }

    builder.build()
}
