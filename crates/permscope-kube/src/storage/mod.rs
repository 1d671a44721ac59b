//! Release revision stores
//!
//! A store hands out the raw revision history, one entry per deployment
//! attempt. Aggregation into the current state happens in
//! [`crate::aggregate`]; stores never de-duplicate.
//!
//! - **Secrets** (default): Helm release Secrets in the cluster
//! - **File**: a local YAML/JSON list of revisions (offline use)
//! - **Mock**: in-memory, for tests

mod file;
mod mock;
mod secrets;

pub use file::FileStore;
pub use mock::{MockRevisionStore, OperationCounts};
pub use secrets::{HELM_OWNER_LABEL, SecretsStore, decode_helm_release};

use async_trait::async_trait;
use permscope_core::ReleaseRevision;

use crate::error::Result;

/// Source of release revisions
///
/// Implementations must be Send + Sync for use across async tasks.
#[async_trait]
pub trait RevisionStore: Send + Sync {
    /// List every known revision, optionally restricted to one namespace
    async fn list_revisions(&self, namespace: Option<&str>) -> Result<Vec<ReleaseRevision>>;
}
