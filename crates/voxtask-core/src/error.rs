use thiserror::Error;

/// Top-level error type for voxtask.
///
/// Subsystem crates define their own error types for the batch pipeline;
/// this one covers configuration, I/O and anything that ends an
/// interaction cycle.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VoxtaskError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Remote service error: {0}")]
    Remote(String),
}

impl From<toml::de::Error> for VoxtaskError {
    fn from(err: toml::de::Error) -> Self {
        VoxtaskError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for VoxtaskError {
    fn from(err: toml::ser::Error) -> Self {
        VoxtaskError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for VoxtaskError {
    fn from(err: serde_json::Error) -> Self {
        VoxtaskError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for voxtask operations.
pub type Result<T> = std::result::Result<T, VoxtaskError>;
