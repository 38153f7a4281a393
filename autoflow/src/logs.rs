//! Tracing setup for the builder and its CLI
//!
//! Output goes to stderr; stdout belongs to the simulator conversation.

use serde::{Deserialize, Serialize};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::errors::FlowError;

/// Verbosity read from `settings.json`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    #[default]
    #[serde(alias = "warning")]
    Warn,
    Error,
    Off,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Off => LevelFilter::OFF,
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_value(serde_json::Value::String(s.trim().to_ascii_lowercase()))
            .map_err(|_| FlowError::ConfigError(format!("unknown log level {:?}", s)))
    }
}

#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    /// Overridden by `RUST_LOG` when set
    pub log_level: LogLevel,

    /// JSON lines instead of human readable output
    pub json_format: bool,
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(options: LogOptions) -> Result<(), FlowError> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from(options.log_level).into())
        .from_env_lossy();

    let registry = tracing_subscriber::registry().with(filter);
    let installed = if options.json_format {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init()
    };

    installed.map_err(|e| FlowError::ConfigError(format!("logging already initialized: {}", e)))
}
