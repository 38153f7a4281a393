//! Settings file management

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::filesys::file::File;
use crate::logs::LogLevel;
use crate::sim::session::SimulationOptions;

/// Builder settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Emit JSON logs
    #[serde(default)]
    pub json_logs: bool,

    /// Generation capability configuration
    #[serde(default)]
    pub generator: GeneratorSettings,

    /// Simulation configuration
    #[serde(default)]
    pub simulation: SimulationSettings,
}

impl Settings {
    /// Read settings, falling back to defaults when the file is missing or
    /// unreadable
    pub async fn load(file: &File) -> Self {
        match file.read_optional().await {
            Ok(Some(contents)) => match serde_json::from_str(&contents) {
                Ok(settings) => settings,
                Err(e) => {
                    warn!("Ignoring malformed settings file {:?}: {}", file.path(), e);
                    Self::default()
                }
            },
            Ok(None) => {
                debug!("No settings file at {:?}, using defaults", file.path());
                Self::default()
            }
            Err(e) => {
                warn!("Unable to read settings file {:?}: {}", file.path(), e);
                Self::default()
            }
        }
    }
}

/// Hosted model settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorSettings {
    /// Base URL of the generateContent API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key; when absent it is read from `api_key_env`
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Model used for whole-flow generation
    #[serde(default = "default_architect_model")]
    pub architect_model: String,

    /// Model used for cheap title/description suggestions
    #[serde(default = "default_suggestion_model")]
    pub suggestion_model: String,

    /// Model used for simulated replies
    #[serde(default = "default_simulation_model")]
    pub simulation_model: String,

    /// HTTP request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl GeneratorSettings {
    /// Configured key, else `api_key_env`, else `API_KEY`
    pub fn resolve_api_key(&self) -> Option<SecretString> {
        if let Some(key) = &self.api_key {
            return Some(key.clone());
        }
        [self.api_key_env.as_str(), "API_KEY"]
            .iter()
            .filter_map(|name| std::env::var(name).ok())
            .find(|value| !value.trim().is_empty())
            .map(SecretString::from)
    }
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_architect_model() -> String {
    "gemini-3-pro-preview".to_string()
}

fn default_suggestion_model() -> String {
    "gemini-flash-lite-latest".to_string()
}

fn default_simulation_model() -> String {
    "gemini-3-flash-preview".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            api_key_env: default_api_key_env(),
            architect_model: default_architect_model(),
            suggestion_model: default_suggestion_model(),
            simulation_model: default_simulation_model(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Simulation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationSettings {
    /// Seconds to wait for a simulated reply before falling back
    #[serde(default = "default_reply_timeout")]
    pub reply_timeout_secs: u64,
}

fn default_reply_timeout() -> u64 {
    20
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            reply_timeout_secs: default_reply_timeout(),
        }
    }
}

impl From<&SimulationSettings> for SimulationOptions {
    fn from(settings: &SimulationSettings) -> Self {
        Self {
            reply_timeout: std::time::Duration::from_secs(settings.reply_timeout_secs),
        }
    }
}
