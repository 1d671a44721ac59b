//! REST mapping: which resources a group/version serves
//!
//! The extractor needs to turn `(apiVersion, kind)` into the plural resource
//! name used by authorization checks. [`ResourceMapper`] is the narrow seam
//! for that lookup:
//! - [`DiscoveryMapper`] asks the API server (`/api/v1`, `/apis/{group}/{version}`)
//! - [`StaticMapper`] answers from an in-memory table (tests, offline use)

use async_trait::async_trait;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::APIResourceList;
use kube::Client;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{KubeError, Result};

/// One resource served by a group/version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResourceEntry {
    /// Plural resource name (`deployments`)
    pub name: String,
    /// Kind (`Deployment`)
    pub kind: String,
    /// Whether objects live in a namespace
    pub namespaced: bool,
}

/// Resources served by one group/version
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApiResourceList {
    pub group_version: String,
    pub resources: Vec<ApiResourceEntry>,
}

impl ApiResourceList {
    /// Find the top-level resource serving a kind (subresources are ignored)
    pub fn find_kind(&self, kind: &str) -> Option<&ApiResourceEntry> {
        self.resources
            .iter()
            .find(|r| r.kind == kind && !r.name.contains('/'))
    }
}

impl From<APIResourceList> for ApiResourceList {
    fn from(list: APIResourceList) -> Self {
        Self {
            group_version: list.group_version,
            resources: list
                .resources
                .into_iter()
                .map(|r| ApiResourceEntry {
                    name: r.name,
                    kind: r.kind,
                    namespaced: r.namespaced,
                })
                .collect(),
        }
    }
}

/// Group/version resource lookup
///
/// Implementations must report an unknown group/version as
/// [`KubeError::GroupVersionNotFound`] so callers can tell it apart from
/// transport failures.
#[async_trait]
pub trait ResourceMapper: Send + Sync {
    /// List the resources served by a group/version (`v1`, `apps/v1`)
    async fn resources_for(&self, group_version: &str) -> Result<ApiResourceList>;
}

/// Mapper backed by the API server's discovery endpoints
#[derive(Clone)]
pub struct DiscoveryMapper {
    client: Client,
}

impl DiscoveryMapper {
    /// Create with an existing client
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResourceMapper for DiscoveryMapper {
    async fn resources_for(&self, group_version: &str) -> Result<ApiResourceList> {
        let response = if group_version.contains('/') {
            self.client.list_api_group_resources(group_version).await
        } else {
            self.client.list_core_api_resources(group_version).await
        };

        match response {
            Ok(list) => Ok(list.into()),
            Err(kube::Error::Api(resp)) if resp.code == 404 => Err(KubeError::GroupVersionNotFound {
                group_version: group_version.to_string(),
            }),
            Err(e) => Err(KubeError::Discovery {
                group_version: group_version.to_string(),
                message: e.to_string(),
            }),
        }
    }
}

/// In-memory mapper for tests and offline checks
#[derive(Clone, Default)]
pub struct StaticMapper {
    lists: HashMap<String, ApiResourceList>,
    failures: HashMap<String, String>,
    lookups: Arc<AtomicUsize>,
}

impl StaticMapper {
    /// Create an empty mapper (every group/version is unknown)
    pub fn new() -> Self {
        Self::default()
    }

    /// Mapper knowing the common built-in Kubernetes resources
    pub fn builtin() -> Self {
        let table: &[(&str, &str, &str, bool)] = &[
            ("v1", "configmaps", "ConfigMap", true),
            ("v1", "secrets", "Secret", true),
            ("v1", "services", "Service", true),
            ("v1", "serviceaccounts", "ServiceAccount", true),
            ("v1", "pods", "Pod", true),
            ("v1", "persistentvolumeclaims", "PersistentVolumeClaim", true),
            ("v1", "persistentvolumes", "PersistentVolume", false),
            ("v1", "namespaces", "Namespace", false),
            ("apps/v1", "deployments", "Deployment", true),
            ("apps/v1", "statefulsets", "StatefulSet", true),
            ("apps/v1", "daemonsets", "DaemonSet", true),
            ("apps/v1", "replicasets", "ReplicaSet", true),
            ("batch/v1", "jobs", "Job", true),
            ("batch/v1", "cronjobs", "CronJob", true),
            ("autoscaling/v2", "horizontalpodautoscalers", "HorizontalPodAutoscaler", true),
            ("policy/v1", "poddisruptionbudgets", "PodDisruptionBudget", true),
            ("networking.k8s.io/v1", "ingresses", "Ingress", true),
            ("networking.k8s.io/v1", "networkpolicies", "NetworkPolicy", true),
            ("networking.k8s.io/v1", "ingressclasses", "IngressClass", false),
            ("rbac.authorization.k8s.io/v1", "roles", "Role", true),
            ("rbac.authorization.k8s.io/v1", "rolebindings", "RoleBinding", true),
            ("rbac.authorization.k8s.io/v1", "clusterroles", "ClusterRole", false),
            ("rbac.authorization.k8s.io/v1", "clusterrolebindings", "ClusterRoleBinding", false),
            ("storage.k8s.io/v1", "storageclasses", "StorageClass", false),
            (
                "apiextensions.k8s.io/v1",
                "customresourcedefinitions",
                "CustomResourceDefinition",
                false,
            ),
        ];

        table
            .iter()
            .fold(Self::new(), |mapper, (gv, name, kind, namespaced)| {
                mapper.with_resource(gv, name, kind, *namespaced)
            })
    }

    /// Register a resource for a group/version
    pub fn with_resource(
        mut self,
        group_version: &str,
        name: &str,
        kind: &str,
        namespaced: bool,
    ) -> Self {
        let list = self
            .lists
            .entry(group_version.to_string())
            .or_insert_with(|| ApiResourceList {
                group_version: group_version.to_string(),
                resources: Vec::new(),
            });
        list.resources.push(ApiResourceEntry {
            name: name.to_string(),
            kind: kind.to_string(),
            namespaced,
        });
        self
    }

    /// Make lookups of a group/version fail with a transport error
    pub fn with_failure(mut self, group_version: &str, message: &str) -> Self {
        self.failures
            .insert(group_version.to_string(), message.to_string());
        self
    }

    /// Number of lookups served so far
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ResourceMapper for StaticMapper {
    async fn resources_for(&self, group_version: &str) -> Result<ApiResourceList> {
        self.lookups.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = self.failures.get(group_version) {
            return Err(KubeError::Discovery {
                group_version: group_version.to_string(),
                message: message.clone(),
            });
        }

        self.lists
            .get(group_version)
            .cloned()
            .ok_or_else(|| KubeError::GroupVersionNotFound {
                group_version: group_version.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::APIResource;

    #[tokio::test]
    async fn test_static_mapper_lookup() {
        let mapper = StaticMapper::builtin();

        let apps = mapper.resources_for("apps/v1").await.unwrap();
        let deployment = apps.find_kind("Deployment").unwrap();
        assert_eq!(deployment.name, "deployments");
        assert!(deployment.namespaced);

        let core = mapper.resources_for("v1").await.unwrap();
        assert!(!core.find_kind("Namespace").unwrap().namespaced);
        assert_eq!(mapper.lookup_count(), 2);
    }

    #[tokio::test]
    async fn test_static_mapper_unknown_group_version() {
        let mapper = StaticMapper::builtin();
        let err = mapper.resources_for("example.com/v1").await.unwrap_err();
        assert!(matches!(err, KubeError::GroupVersionNotFound { .. }));
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_static_mapper_failure_is_not_not_found() {
        let mapper = StaticMapper::builtin().with_failure("apps/v1", "connection refused");
        let err = mapper.resources_for("apps/v1").await.unwrap_err();
        assert!(matches!(err, KubeError::Discovery { .. }));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_find_kind_skips_subresources() {
        let list = ApiResourceList {
            group_version: "apps/v1".to_string(),
            resources: vec![
                ApiResourceEntry {
                    name: "deployments/scale".to_string(),
                    kind: "Scale".to_string(),
                    namespaced: true,
                },
                ApiResourceEntry {
                    name: "deployments/status".to_string(),
                    kind: "Deployment".to_string(),
                    namespaced: true,
                },
                ApiResourceEntry {
                    name: "deployments".to_string(),
                    kind: "Deployment".to_string(),
                    namespaced: true,
                },
            ],
        };
        assert_eq!(list.find_kind("Deployment").unwrap().name, "deployments");
        assert!(list.find_kind("Scale").is_none());
    }

    #[test]
    fn test_convert_from_api_resource_list() {
        let list = APIResourceList {
            group_version: "v1".to_string(),
            resources: vec![APIResource {
                name: "configmaps".to_string(),
                kind: "ConfigMap".to_string(),
                namespaced: true,
                verbs: vec!["get".to_string(), "create".to_string()],
                ..Default::default()
            }],
        };
        let converted = ApiResourceList::from(list);
        assert_eq!(converted.group_version, "v1");
        assert_eq!(converted.resources[0].name, "configmaps");
        assert_eq!(converted.resources[0].kind, "ConfigMap");
        assert!(converted.resources[0].namespaced);
    }
}
