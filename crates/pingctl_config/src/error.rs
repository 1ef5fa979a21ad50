//! Error types for the configuration engine.

use std::path::PathBuf;

use thiserror::Error;

use crate::sources::ValueSource;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Failure to turn a raw string into a typed value.
///
/// Carries no key or source; [`ParseError::at`] lifts it into a [`ConfigError`]
/// once the caller knows which setting and layer supplied the input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("'{value}' is not a valid {expected}")]
    InvalidValue { value: String, expected: &'static str },

    #[error("'{value}' is not a valid {expected}")]
    InvalidFormat { value: String, expected: &'static str },

    #[error("unrecognized value '{value}'. Allowed: {allowed}")]
    UnrecognizedValue { value: String, allowed: String },
}

impl ParseError {
    /// Attach the logical key and originating layer.
    pub fn at(self, key: impl Into<String>, origin: ValueSource) -> ConfigError {
        let key = key.into();
        match self {
            ParseError::InvalidValue { value, expected } => ConfigError::InvalidValue {
                key,
                value,
                origin,
                expected,
            },
            ParseError::InvalidFormat { value, expected } => ConfigError::InvalidFormat {
                key,
                value,
                origin,
                expected,
            },
            ParseError::UnrecognizedValue { value, allowed } => ConfigError::UnrecognizedValue {
                key,
                value,
                origin,
                allowed,
            },
        }
    }
}

/// Coarse error classification used by callers for exit-code mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    InvalidName,
    AlreadyExists,
    NotFound,
    ActiveProfileConflict,
    UnknownKey,
    InvalidValue,
    Registration,
    PersistenceFailure,
}

/// Errors that can occur while resolving, mutating or persisting configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid profile name: '{name}'. {reason}")]
    InvalidName { name: String, reason: String },

    #[error("invalid profile name: '{0}' profile already exists")]
    AlreadyExists(String),

    #[error("invalid profile name: '{0}' profile does not exist")]
    ProfileNotFound(String),

    #[error("'{0}' is the active profile and cannot be deleted")]
    ActiveProfileConflict(String),

    #[error(
        "key '{key}' is not recognized as a valid configuration key. Valid keys: {}",
        .valid_keys.join(", ")
    )]
    UnknownKey { key: String, valid_keys: Vec<String> },

    #[error("invalid value '{value}' for '{key}' from {origin}: expected a {expected}")]
    InvalidValue {
        key: String,
        value: String,
        origin: ValueSource,
        expected: &'static str,
    },

    #[error("invalid format '{value}' for '{key}' from {origin}: expected a {expected}")]
    InvalidFormat {
        key: String,
        value: String,
        origin: ValueSource,
        expected: &'static str,
    },

    #[error("unrecognized value '{value}' for '{key}' from {origin}. Allowed: {allowed}")]
    UnrecognizedValue {
        key: String,
        value: String,
        origin: ValueSource,
        allowed: String,
    },

    #[error("option '{0}' is registered more than once")]
    DuplicateOption(String),

    #[error("option '{key}' is invalid: {reason}")]
    InvalidOption { key: String, reason: String },

    #[error("failed to read configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write configuration file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration file {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("configuration file {path} is invalid: {message}")]
    Corrupt { path: PathBuf, message: String },
}

impl ConfigError {
    /// The taxonomy tag for this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ConfigError::InvalidName { .. } => ErrorCategory::InvalidName,
            ConfigError::AlreadyExists(_) => ErrorCategory::AlreadyExists,
            ConfigError::ProfileNotFound(_) => ErrorCategory::NotFound,
            ConfigError::ActiveProfileConflict(_) => ErrorCategory::ActiveProfileConflict,
            ConfigError::UnknownKey { .. } => ErrorCategory::UnknownKey,
            ConfigError::InvalidValue { .. }
            | ConfigError::InvalidFormat { .. }
            | ConfigError::UnrecognizedValue { .. } => ErrorCategory::InvalidValue,
            ConfigError::DuplicateOption(_) | ConfigError::InvalidOption { .. } => {
                ErrorCategory::Registration
            }
            ConfigError::Read { .. }
            | ConfigError::Write { .. }
            | ConfigError::Yaml { .. }
            | ConfigError::Corrupt { .. } => ErrorCategory::PersistenceFailure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_keeps_key_and_origin() {
        let err = ParseError::UnrecognizedValue {
            value: "XX".to_string(),
            allowed: "AP, CA, EU, NA".to_string(),
        }
        .at("export.pingone.region", ValueSource::Env);

        assert_eq!(err.category(), ErrorCategory::InvalidValue);
        let message = err.to_string();
        assert!(message.contains("export.pingone.region"));
        assert!(message.contains("'XX'"));
        assert!(message.contains("environment variable"));
    }

    #[test]
    fn test_unknown_key_lists_valid_keys() {
        let err = ConfigError::UnknownKey {
            key: "export.nope".to_string(),
            valid_keys: vec!["export.overwrite".to_string(), "pingctl.color".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "key 'export.nope' is not recognized as a valid configuration key. \
             Valid keys: export.overwrite, pingctl.color"
        );
    }
}
