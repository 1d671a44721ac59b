//! File-based revision store
//!
//! Reads release revisions from a local YAML (or JSON) file holding a list of
//! revisions. Useful for:
//! - Inspecting exported release history without a cluster
//! - Tests and demos

use async_trait::async_trait;
use permscope_core::ReleaseRevision;
use std::path::{Path, PathBuf};

use super::RevisionStore;
use crate::error::{KubeError, Result};

/// Revision store backed by a local file
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Create a store reading from `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the revisions file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Vec<ReleaseRevision>> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            KubeError::Storage(format!("failed to read {}: {}", self.path.display(), e))
        })?;

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_yaml::from_str(&content).map_err(|e| {
            KubeError::Storage(format!("invalid revisions file {}: {}", self.path.display(), e))
        })
    }
}

#[async_trait]
impl RevisionStore for FileStore {
    async fn list_revisions(&self, namespace: Option<&str>) -> Result<Vec<ReleaseRevision>> {
        let mut revisions = self.read_all()?;
        if let Some(ns) = namespace {
            revisions.retain(|r| r.namespace == ns);
        }
        Ok(revisions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REVISIONS: &str = r#"
- releaseName: foo
  namespace: my_ns
  revision: 1
  chartName: wordpress
  chartVersion: 1.0.0
  statusCode: DEPLOYED
- releaseName: bar
  namespace: other_ns
  revision: 1
  chartName: wordpress
  chartVersion: 1.0.0
  statusCode: 2
"#;

    #[tokio::test]
    async fn test_file_store_lists_all() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("revisions.yaml");
        std::fs::write(&path, REVISIONS).unwrap();

        let store = FileStore::new(&path);
        let revisions = store.list_revisions(None).await.unwrap();
        assert_eq!(revisions.len(), 2);
        assert_eq!(revisions[1].status_code, "2");
    }

    #[tokio::test]
    async fn test_file_store_filters_namespace() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("revisions.yaml");
        std::fs::write(&path, REVISIONS).unwrap();

        let store = FileStore::new(&path);
        let revisions = store.list_revisions(Some("other_ns")).await.unwrap();
        assert_eq!(revisions.len(), 1);
        assert_eq!(revisions[0].release_name, "bar");
    }

    #[tokio::test]
    async fn test_file_store_reads_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("revisions.json");
        std::fs::write(
            &path,
            r#"[{"releaseName":"a","namespace":"n","revisionNumber":7,"chartName":"c","chartVersion":"1.2.3","statusCode":"failed"}]"#,
        )
        .unwrap();

        let revisions = FileStore::new(&path).list_revisions(None).await.unwrap();
        assert_eq!(revisions[0].revision_number, 7);
    }

    #[tokio::test]
    async fn test_file_store_missing_file() {
        let store = FileStore::new("/nonexistent/revisions.yaml");
        let err = store.list_revisions(None).await.unwrap_err();
        assert!(matches!(err, KubeError::Storage(_)));
    }

    #[tokio::test]
    async fn test_file_store_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("revisions.yaml");
        std::fs::write(&path, "\n").unwrap();

        assert!(FileStore::new(&path).list_revisions(None).await.unwrap().is_empty());
    }
}
