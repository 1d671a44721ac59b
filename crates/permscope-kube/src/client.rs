//! High-level client combining the permission and release pipelines
//!
//! [`KubeClient`] is the surface the CLI talks to: it decodes manifests,
//! extracts the actions they need, checks them against the authorization
//! oracle, and lists release overviews from the revision store.

use permscope_core::{
    Action, AppOverview, ReleaseAction, ResourceObject, Settings, decode_manifest,
};

use crate::access::{AccessReviewer, SelfSubjectReviewer};
use crate::aggregate::{ListOptions, ReleaseAggregator};
use crate::checker::PermissionChecker;
use crate::discovery::{DiscoveryMapper, ResourceMapper};
use crate::error::{KubeError, Result};
use crate::extract::ActionExtractor;
use crate::storage::{RevisionStore, SecretsStore};

/// Namespace used when neither the caller nor the kube config names one
pub const DEFAULT_NAMESPACE: &str = "default";

/// High-level client for permission and release queries
pub struct KubeClient<
    S: RevisionStore,
    M: ResourceMapper = DiscoveryMapper,
    R: AccessReviewer = SelfSubjectReviewer,
> {
    extractor: ActionExtractor<M>,
    checker: PermissionChecker<R>,
    aggregator: ReleaseAggregator<S>,
    default_namespace: String,
}

impl<S: RevisionStore, M: ResourceMapper, R: AccessReviewer> KubeClient<S, M, R> {
    /// Assemble a client from its collaborators
    pub fn from_parts(store: S, mapper: M, reviewer: R) -> Self {
        Self {
            extractor: ActionExtractor::new(mapper),
            checker: PermissionChecker::new(reviewer),
            aggregator: ReleaseAggregator::new(store),
            default_namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }

    /// Set the maximum number of concurrent access reviews
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.checker = self.checker.with_concurrency(concurrency);
        self
    }

    /// Set the namespace used for objects that declare none
    pub fn with_default_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.default_namespace = namespace.into();
        self
    }

    /// Namespace used for objects that declare none
    pub fn default_namespace(&self) -> &str {
        &self.default_namespace
    }

    /// Get the permission checker
    pub fn checker(&self) -> &PermissionChecker<R> {
        &self.checker
    }

    // ========== Permissions ==========

    /// Actions of `manifest` the current user may not perform
    ///
    /// An empty `namespace` falls back to the client's default namespace.
    pub async fn forbidden_actions(
        &self,
        namespace: &str,
        action: &ReleaseAction,
        manifest: &str,
    ) -> Result<Vec<Action>> {
        let resources = decode_manifest(manifest)?;
        self.forbidden_for_resources(namespace, action, &resources).await
    }

    /// Like [`Self::forbidden_actions`] for an already decoded manifest
    pub async fn forbidden_for_resources(
        &self,
        namespace: &str,
        action: &ReleaseAction,
        resources: &[ResourceObject],
    ) -> Result<Vec<Action>> {
        let namespace = if namespace.is_empty() {
            self.default_namespace.as_str()
        } else {
            namespace
        };

        let actions = self
            .extractor
            .extract(resources, &action.verbs(), namespace)
            .await?;
        self.checker.check_forbidden(&actions).await
    }

    /// Check whether the user can read releases in `namespace`
    pub async fn validate_for_namespace(&self, namespace: &str) -> Result<bool> {
        self.checker.validate_for_namespace(namespace).await
    }

    // ========== Releases ==========

    /// List the current state of every release matching `options`
    pub async fn list_releases(&self, options: &ListOptions) -> Result<Vec<AppOverview>> {
        self.aggregator.list(options).await
    }
}

/// Build a kube client from the local kubeconfig or in-cluster environment
///
/// `impersonate` makes every request on behalf of that user. Returns the
/// client and the namespace of the active context.
pub async fn connect_client(impersonate: Option<&str>) -> Result<(kube::Client, String)> {
    let mut config = kube::Config::infer()
        .await
        .map_err(|e| KubeError::InvalidConfig(e.to_string()))?;

    if let Some(user) = impersonate {
        tracing::debug!("impersonating {}", user);
        config.auth_info.impersonate = Some(user.to_string());
    }

    let namespace = config.default_namespace.clone();
    let client = kube::Client::try_from(config)?;
    Ok((client, namespace))
}

/// Connect to the cluster with Secrets-backed release storage
pub async fn connect(settings: &Settings) -> Result<KubeClient<SecretsStore>> {
    let (client, namespace) = connect_client(settings.impersonate.as_deref()).await?;

    Ok(KubeClient::from_parts(
        SecretsStore::new(client.clone()),
        DiscoveryMapper::new(client.clone()),
        SelfSubjectReviewer::new(client),
    )
    .with_concurrency(settings.concurrency)
    .with_default_namespace(namespace))
}
