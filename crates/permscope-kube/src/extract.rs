//! Derive permission requirements from decoded manifests
//!
//! Every object of a manifest implies the same set of verbs on its
//! `(group, resource)` in the namespace it will land in. Objects that share
//! a group, resource and namespace collapse into a single [`Action`] whose
//! verbs are the union of all contributions.

use permscope_core::{Action, ActionKey, ResourceObject};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::discovery::{ApiResourceList, ResourceMapper};
use crate::error::{KubeError, Result};
use crate::scope::{KnownScopes, ScopeClassifier};

/// Turns resource objects into distinct [`Action`]s
pub struct ActionExtractor<M: ResourceMapper> {
    mapper: M,
    scopes: Box<dyn ScopeClassifier>,
}

impl<M: ResourceMapper> ActionExtractor<M> {
    /// Create an extractor using the built-in cluster-scope classification
    pub fn new(mapper: M) -> Self {
        Self {
            mapper,
            scopes: Box::new(KnownScopes::builtin()),
        }
    }

    /// Replace the cluster-scope classification
    pub fn with_scopes(mut self, scopes: impl ScopeClassifier + 'static) -> Self {
        self.scopes = Box::new(scopes);
        self
    }

    /// Get the resource mapper
    pub fn mapper(&self) -> &M {
        &self.mapper
    }

    /// Extract the actions needed to apply `resources` with `verbs`
    ///
    /// Objects without a declared namespace fall back to `default_namespace`;
    /// cluster-scoped objects always map to a cluster-wide action. Objects
    /// whose group/version is unknown to the mapper are skipped. The result
    /// is sorted by action key.
    pub async fn extract(
        &self,
        resources: &[ResourceObject],
        verbs: &BTreeSet<String>,
        default_namespace: &str,
    ) -> Result<Vec<Action>> {
        // Lookups are cached for this pass only
        let mut lists: HashMap<String, Option<ApiResourceList>> = HashMap::new();
        let mut actions: BTreeMap<ActionKey, BTreeSet<String>> = BTreeMap::new();

        for object in resources {
            if !lists.contains_key(&object.api_version) {
                let list = self.lookup(&object.api_version).await?;
                lists.insert(object.api_version.clone(), list);
            }

            let Some(list) = lists.get(&object.api_version).and_then(Option::as_ref) else {
                tracing::warn!(
                    "skipping {}: {} is not served by the cluster",
                    object.display_name(),
                    object.api_version
                );
                continue;
            };

            let Some(resource) = list.find_kind(&object.kind) else {
                tracing::warn!(
                    "skipping {}: kind {} not found in {}",
                    object.display_name(),
                    object.kind,
                    object.api_version
                );
                continue;
            };

            let cluster_wide =
                !resource.namespaced || self.scopes.is_cluster_scoped(object.group(), &object.kind);
            let namespace = if cluster_wide {
                String::new()
            } else if object.has_namespace() {
                object.namespace.clone()
            } else {
                default_namespace.to_string()
            };

            let key = ActionKey {
                api_group: object.group().to_string(),
                resource: resource.name.clone(),
                namespace,
                cluster_wide,
            };
            actions
                .entry(key)
                .or_default()
                .extend(verbs.iter().cloned());
        }

        tracing::debug!(
            "extracted {} action(s) from {} resource(s)",
            actions.len(),
            resources.len()
        );

        Ok(actions
            .into_iter()
            .map(|(key, verbs)| Action::from(key).with_verbs(verbs))
            .collect())
    }

    /// Resolve a group/version, treating "not found" as absent
    async fn lookup(&self, group_version: &str) -> Result<Option<ApiResourceList>> {
        match self.mapper.resources_for(group_version).await {
            Ok(list) => Ok(Some(list)),
            Err(KubeError::GroupVersionNotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
