//! Error types for the automation builder

use thiserror::Error;

/// Main error type for the automation builder
#[derive(Error, Debug)]
pub enum FlowError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Invalid step type: {0}")]
    InvalidType(String),

    #[error("Step not found: {0}")]
    StepNotFound(String),

    #[error("Dangling reference: {0}")]
    DanglingReference(String),

    #[error("Client not found: {0}")]
    ClientNotFound(String),

    #[error("Automation not found: {0}")]
    AutomationNotFound(String),

    #[error("Generation capability failure: {0}")]
    Capability(String),

    #[error("Persisted state corrupt: {0}")]
    PersistedStateCorrupt(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
