//! Error types for permscope-kube

use thiserror::Error;

/// Result type for permscope-kube operations
pub type Result<T> = std::result::Result<T, KubeError>;

/// Errors that can occur during Kubernetes operations
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum KubeError {
    /// Kubernetes API error
    #[error("Kubernetes API error: {0}")]
    Api(#[from] kube::Error),

    /// Manifest could not be decoded
    #[error("invalid manifest: {0}")]
    Decode(#[from] permscope_core::CoreError),

    /// The discovery service does not know this group/version
    #[error("group/version '{group_version}' is not served by the cluster")]
    GroupVersionNotFound { group_version: String },

    /// Resource discovery failed for a reason other than an unknown group/version
    #[error("resource discovery failed for '{group_version}': {message}")]
    Discovery {
        group_version: String,
        message: String,
    },

    /// The authorization backend could not answer (not a denial)
    #[error("access review for '{verb}' on '{resource}' failed: {message}")]
    AccessReview {
        verb: String,
        resource: String,
        message: String,
    },

    /// Release revision store error
    #[error("storage error: {0}")]
    Storage(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<serde_json::Error> for KubeError {
    fn from(e: serde_json::Error) -> Self {
        KubeError::Serialization(e.to_string())
    }
}

impl KubeError {
    /// Check if this is a Kubernetes 404 Not Found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, KubeError::Api(kube::Error::Api(resp)) if resp.code == 404)
            || matches!(self, KubeError::GroupVersionNotFound { .. })
    }

    /// Check if this is an authorization failure of the caller itself (401/403)
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, KubeError::Api(kube::Error::Api(resp)) if resp.code == 401 || resp.code == 403)
    }
}
