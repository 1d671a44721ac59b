//! Permscope Kube - Kubernetes integration for permscope
//!
//! This crate answers two questions against a cluster:
//!
//! ## Permissions
//! - [`ActionExtractor`]: manifest objects to distinct `(group, resource, namespace)` actions
//! - [`PermissionChecker`]: bounded concurrent access reviews, reporting only denials
//!
//! ## Releases
//! - [`RevisionStore`]: raw revision history (Helm Secrets, file, in-memory)
//! - [`ReleaseAggregator`]: one overview per release from its latest revision
//!
//! [`KubeClient`] ties both together behind narrow collaborator traits
//! ([`ResourceMapper`], [`AccessReviewer`], [`RevisionStore`]) so tests run
//! without a cluster.

pub mod access;
pub mod aggregate;
pub mod checker;
pub mod client;
pub mod discovery;
pub mod error;
pub mod extract;
pub mod scope;
pub mod storage;

pub use access::{AccessReviewer, SelfSubjectReviewer, StaticReviewer};
pub use aggregate::{ListOptions, ReleaseAggregator, aggregate};
pub use checker::{DEFAULT_CONCURRENCY, PermissionChecker};
pub use client::{DEFAULT_NAMESPACE, KubeClient, connect, connect_client};
pub use discovery::{ApiResourceEntry, ApiResourceList, DiscoveryMapper, ResourceMapper, StaticMapper};
pub use error::{KubeError, Result};
pub use extract::ActionExtractor;
pub use scope::{KnownScopes, ScopeClassifier};
pub use storage::{
    FileStore, HELM_OWNER_LABEL, MockRevisionStore, OperationCounts, RevisionStore, SecretsStore,
    decode_helm_release,
};
