//! Error taxonomy for CogniCode.
//!
//! Search outcomes (syntax errors, failing harnesses, timeouts) are not errors:
//! they are graded results. These variants cover configuration and host I/O.

/// CogniCode errors.
#[derive(Debug, thiserror::Error)]
pub enum SynthError {
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for CogniCode operations.
pub type Result<T> = std::result::Result<T, SynthError>;
