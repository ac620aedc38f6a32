//! Structured error types for configuration loading and export.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Resolution errors
    MissingEnvironmentConfig,
    MissingParentConfig,

    // Input errors
    IoError,
    ParseError,
    InvalidPattern,

    // Output errors
    SerializeError,
}

/// Errors raised while loading, resolving or exporting configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A project has no entry for the requested environment and nothing in its
    /// default entry excuses that.
    #[error("Can not read \"{env}\" config for project \"{project}\"")]
    MissingEnvironmentConfig { project: String, env: String },

    /// An `inherit` directive names a project that was never resolved.
    #[error("Can not load {parent} config (inherited by \"{project}\")")]
    MissingParentConfig { parent: String, project: String },

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid {format} in {}: {message}", .path.display())]
    Parse {
        path: PathBuf,
        format: String,
        message: String,
    },

    #[error("Invalid path pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ConfigError {
    pub fn missing_env(project: &str, env: &str) -> Self {
        Self::MissingEnvironmentConfig {
            project: project.to_string(),
            env: env.to_string(),
        }
    }

    pub fn missing_parent(parent: &str, project: &str) -> Self {
        Self::MissingParentConfig {
            parent: parent.to_string(),
            project: project.to_string(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, format: &str, err: impl std::fmt::Display) -> Self {
        Self::Parse {
            path: path.into(),
            format: format.to_string(),
            message: err.to_string(),
        }
    }

    /// Stable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::MissingEnvironmentConfig { .. } => ErrorCode::MissingEnvironmentConfig,
            Self::MissingParentConfig { .. } => ErrorCode::MissingParentConfig,
            Self::Io { .. } => ErrorCode::IoError,
            Self::Parse { .. } => ErrorCode::ParseError,
            Self::Pattern { .. } => ErrorCode::InvalidPattern,
            Self::Serialize(_) => ErrorCode::SerializeError,
        }
    }
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
