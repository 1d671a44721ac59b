//! CLI error types with exit code handling
//!
//! This module provides a unified error type for CLI operations that
//! maps errors to appropriate exit codes.

use miette::Diagnostic;
use permscope_core::CoreError;
use permscope_kube::KubeError;
use thiserror::Error;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum CliError {
    /// Manifest could not be decoded
    #[error("Invalid manifest: {message}")]
    #[diagnostic(code(permscope::cli::manifest))]
    Manifest {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Configuration file is invalid
    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(permscope::cli::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Release revisions could not be read
    #[error("Release storage error: {message}")]
    #[diagnostic(code(permscope::cli::storage))]
    Storage { message: String },

    /// Talking to the cluster failed
    #[error("Cluster error: {message}")]
    #[diagnostic(code(permscope::cli::cluster))]
    Cluster {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Invalid arguments or options
    #[error("{message}")]
    #[diagnostic(code(permscope::cli::usage))]
    Usage { message: String },

    /// IO error (file not found, permissions, etc.)
    #[error("IO error: {message}")]
    #[diagnostic(code(permscope::cli::io))]
    Io { message: String },

    /// Internal error (runtime, unexpected failure)
    #[error("Internal error: {message}")]
    #[diagnostic(code(permscope::cli::internal))]
    Internal { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Manifest { .. } => exit_codes::INPUT_ERROR,
            CliError::Config { .. } => exit_codes::INPUT_ERROR,
            CliError::Storage { .. } => exit_codes::INPUT_ERROR,
            CliError::Cluster { .. } => exit_codes::CLUSTER_ERROR,
            CliError::Usage { .. } => exit_codes::USAGE_ERROR,
            CliError::Io { .. } => exit_codes::IO_ERROR,
            CliError::Internal { .. } => exit_codes::ERROR,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Create a configuration error with help text
    pub fn config_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: Some(help.into()),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io {
            message: err.to_string(),
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Io(e) => e.into(),
            CoreError::Decode { .. } | CoreError::YamlParse(_) => {
                CliError::Manifest {
                    message: err.to_string(),
                    help: Some(
                        "every document needs a mapping with 'apiVersion' and 'kind'".to_string(),
                    ),
                }
            }
            CoreError::InvalidAction { .. } => CliError::Usage {
                message: err.to_string(),
            },
            CoreError::InvalidConfig { message } => CliError::Config {
                message,
                help: None,
            },
        }
    }
}

impl From<KubeError> for CliError {
    fn from(err: KubeError) -> Self {
        match err {
            KubeError::Decode(e) => e.into(),
            KubeError::Storage(message) | KubeError::Serialization(message) => {
                CliError::Storage { message }
            }
            KubeError::InvalidConfig(message) => CliError::Cluster {
                message,
                help: Some("check your kubeconfig or KUBECONFIG environment variable".to_string()),
            },
            err if err.is_unauthorized() => CliError::Cluster {
                message: err.to_string(),
                help: Some("your credentials were rejected by the API server".to_string()),
            },
            err => CliError::Cluster {
                message: err.to_string(),
                help: None,
            },
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
