//! Error types for configuration loading.

/// Errors that can occur while loading or reloading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Filesystem I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parse/deserialization error.
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Config validation error (e.g. out-of-range field values).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Filesystem watcher error.
    #[error("Notify watcher error: {0}")]
    Notify(#[from] notify::Error),
}

/// Result alias for loader operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
