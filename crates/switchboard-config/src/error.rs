//! Configuration error types.

/// Errors produced while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A config file could not be read.
    #[error("cannot read config file {path}: {source}")]
    Io {
        /// Path of the offending file.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A config file is not valid TOML or does not match the schema.
    #[error("cannot parse config file {path}: {source}")]
    Parse {
        /// Path of the offending file (or `<embedded defaults>`).
        path: String,
        /// Underlying TOML error.
        #[source]
        source: toml::de::Error,
    },

    /// An environment override carries an unparseable value.
    #[error("invalid value in {var}: {message}")]
    EnvOverride {
        /// Name of the environment variable.
        var: String,
        /// What was wrong with the value.
        message: String,
    },

    /// A field value is out of range or violates a cross-field invariant.
    #[error("invalid config field {field}: {message}")]
    Validation {
        /// Dotted path of the offending field.
        field: String,
        /// What was wrong with the value.
        message: String,
    },
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
