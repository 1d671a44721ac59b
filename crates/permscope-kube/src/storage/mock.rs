//! Mock revision store for testing
//!
//! This store keeps revisions in memory, useful for unit tests
//! without requiring a Kubernetes cluster.

use async_trait::async_trait;
use permscope_core::ReleaseRevision;
use std::sync::{Arc, RwLock};

use super::RevisionStore;
use crate::error::{KubeError, Result};

/// In-memory revision store for testing
#[derive(Clone, Default)]
pub struct MockRevisionStore {
    revisions: Arc<RwLock<Vec<ReleaseRevision>>>,
    failure: Option<String>,
    operations: Arc<RwLock<OperationCounts>>,
}

/// Counts of operations performed for testing assertions
#[derive(Debug, Default, Clone)]
pub struct OperationCounts {
    pub lists: usize,
}

impl MockRevisionStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with pre-populated revisions
    pub fn with_revisions(revisions: Vec<ReleaseRevision>) -> Self {
        Self {
            revisions: Arc::new(RwLock::new(revisions)),
            ..Self::default()
        }
    }

    /// Make every listing fail with a storage error
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    /// Append a revision
    pub fn push(&self, revision: ReleaseRevision) {
        let mut revisions = self.revisions.write().unwrap_or_else(|e| e.into_inner());
        revisions.push(revision);
    }

    /// Get operation counts for assertions
    pub fn operation_counts(&self) -> OperationCounts {
        self.operations
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl RevisionStore for MockRevisionStore {
    async fn list_revisions(&self, namespace: Option<&str>) -> Result<Vec<ReleaseRevision>> {
        {
            let mut ops = self.operations.write().unwrap_or_else(|e| e.into_inner());
            ops.lists += 1;
        }

        if let Some(message) = &self.failure {
            return Err(KubeError::Storage(message.clone()));
        }

        let revisions = self
            .revisions
            .read()
            .map_err(|_| KubeError::Storage("revision store lock poisoned".to_string()))?;
        Ok(revisions
            .iter()
            .filter(|r| namespace.is_none_or(|ns| r.namespace == ns))
            .cloned()
            .collect())
    }
}
