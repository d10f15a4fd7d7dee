use serde::Deserialize;

use crate::domain::ReasoningProfile;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub service: ServiceConfig,
    pub validator: ValidatorConfig,
    pub linker: LinkerConfig,
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Reasoning service endpoint and credential lookup
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    /// Environment variable holding the API key
    pub api_key_env: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    pub batch_size: usize,
    pub profile: ReasoningProfile,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LinkerConfig {
    pub profile: ReasoningProfile,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory of the file-backed interaction store
    pub path: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            timeout_secs: 300,
            api_key_env: "GOOGLE_API_KEY".to_string(),
        }
    }
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            batch_size: 1,
            profile: ReasoningProfile::evidence_audit(),
        }
    }
}

impl Default for LinkerConfig {
    fn default() -> Self {
        Self {
            profile: ReasoningProfile::chain_link(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: "protein_interactions".to_string(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
