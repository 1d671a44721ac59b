//! Cluster-scope classification of resource kinds
//!
//! Discovery already reports whether a resource is namespaced. The
//! classification here covers manifests that are checked against a mapper
//! without scope information, and lets callers register extra cluster-scoped
//! kinds (e.g. custom resources they know about).

use std::collections::BTreeSet;

/// Decides whether a kind is cluster-scoped
pub trait ScopeClassifier: Send + Sync {
    /// Check if objects of this group/kind live outside any namespace
    fn is_cluster_scoped(&self, group: &str, kind: &str) -> bool;
}

/// Built-in Kubernetes cluster-scoped kinds, keyed by (group, kind)
const BUILTIN_CLUSTER_KINDS: &[(&str, &str)] = &[
    ("", "Namespace"),
    ("", "Node"),
    ("", "PersistentVolume"),
    ("", "ComponentStatus"),
    ("rbac.authorization.k8s.io", "ClusterRole"),
    ("rbac.authorization.k8s.io", "ClusterRoleBinding"),
    ("apiextensions.k8s.io", "CustomResourceDefinition"),
    ("apiregistration.k8s.io", "APIService"),
    ("storage.k8s.io", "StorageClass"),
    ("storage.k8s.io", "CSIDriver"),
    ("storage.k8s.io", "CSINode"),
    ("storage.k8s.io", "VolumeAttachment"),
    ("scheduling.k8s.io", "PriorityClass"),
    ("networking.k8s.io", "IngressClass"),
    ("node.k8s.io", "RuntimeClass"),
    ("policy", "PodSecurityPolicy"),
    ("admissionregistration.k8s.io", "MutatingWebhookConfiguration"),
    ("admissionregistration.k8s.io", "ValidatingWebhookConfiguration"),
    ("admissionregistration.k8s.io", "ValidatingAdmissionPolicy"),
    ("admissionregistration.k8s.io", "ValidatingAdmissionPolicyBinding"),
    ("certificates.k8s.io", "CertificateSigningRequest"),
    ("flowcontrol.apiserver.k8s.io", "FlowSchema"),
    ("flowcontrol.apiserver.k8s.io", "PriorityLevelConfiguration"),
];

/// Classification by a fixed set of known cluster-scoped kinds
#[derive(Debug, Clone)]
pub struct KnownScopes {
    kinds: BTreeSet<(String, String)>,
}

impl KnownScopes {
    /// Kubernetes built-in cluster-scoped kinds
    pub fn builtin() -> Self {
        Self {
            kinds: BUILTIN_CLUSTER_KINDS
                .iter()
                .map(|(g, k)| (g.to_string(), k.to_string()))
                .collect(),
        }
    }

    /// No kind is cluster-scoped unless registered
    pub fn empty() -> Self {
        Self {
            kinds: BTreeSet::new(),
        }
    }

    /// Register an additional cluster-scoped kind
    pub fn with_kind(mut self, group: impl Into<String>, kind: impl Into<String>) -> Self {
        self.kinds.insert((group.into(), kind.into()));
        self
    }
}

impl Default for KnownScopes {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ScopeClassifier for KnownScopes {
    fn is_cluster_scoped(&self, group: &str, kind: &str) -> bool {
        self.kinds.contains(&(group.to_string(), kind.to_string()))
    }
}
