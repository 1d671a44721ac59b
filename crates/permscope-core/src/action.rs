//! Permission requirements derived from manifests

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::error::{CoreError, Result};

/// Kubernetes API verbs used by release operations
pub mod verbs {
    pub const GET: &str = "get";
    pub const CREATE: &str = "create";
    pub const UPDATE: &str = "update";
    pub const DELETE: &str = "delete";
}

/// A distinct permission requirement: verbs needed on one resource in one scope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    /// API group (empty for the core group)
    pub api_group: String,
    /// Plural resource name (`deployments`, `clusterroles`)
    pub resource: String,
    /// Target namespace, always empty when `cluster_wide`
    pub namespace: String,
    /// Whether the requirement applies cluster-wide
    pub cluster_wide: bool,
    /// Verbs required (sorted, no duplicates)
    pub verbs: BTreeSet<String>,
}

/// Uniqueness key of an [`Action`]; also its reporting order
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActionKey {
    pub api_group: String,
    pub resource: String,
    pub namespace: String,
    pub cluster_wide: bool,
}

impl Action {
    /// Create an action; cluster-wide actions never carry a namespace
    pub fn new(
        api_group: impl Into<String>,
        resource: impl Into<String>,
        namespace: impl Into<String>,
        cluster_wide: bool,
    ) -> Self {
        let namespace = if cluster_wide {
            String::new()
        } else {
            namespace.into()
        };
        Self {
            api_group: api_group.into(),
            resource: resource.into(),
            namespace,
            cluster_wide,
            verbs: BTreeSet::new(),
        }
    }

    /// Builder-style verb insertion
    pub fn with_verbs<I, S>(mut self, verbs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.verbs.extend(verbs.into_iter().map(Into::into));
        self
    }

    /// The uniqueness key of this action
    pub fn key(&self) -> ActionKey {
        ActionKey {
            api_group: self.api_group.clone(),
            resource: self.resource.clone(),
            namespace: self.namespace.clone(),
            cluster_wide: self.cluster_wide,
        }
    }

    /// Same requirement restricted to the given verbs
    pub fn restricted_to(&self, verbs: BTreeSet<String>) -> Self {
        Self {
            verbs,
            ..self.clone()
        }
    }
}

impl From<ActionKey> for Action {
    fn from(key: ActionKey) -> Self {
        Action::new(key.api_group, key.resource, key.namespace, key.cluster_wide)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let resource = if self.api_group.is_empty() {
            self.resource.clone()
        } else {
            format!("{}.{}", self.resource, self.api_group)
        };
        let scope = if self.cluster_wide {
            "cluster-wide".to_string()
        } else {
            format!("namespace {}", self.namespace)
        };
        let verbs: Vec<&str> = self.verbs.iter().map(String::as_str).collect();
        write!(f, "{} {} ({})", verbs.join(","), resource, scope)
    }
}

/// A release operation the user wants to perform with a manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseAction {
    /// Install a new release
    Create,
    /// Upgrade an existing release (resources may appear, change or vanish)
    Upgrade,
    /// Remove a release
    Delete,
    /// Any other operation, checked as a single verb
    Custom(String),
}

impl ReleaseAction {
    /// Parse an action name (case-insensitive)
    ///
    /// Any name other than the known operations must be a single API verb.
    pub fn parse(name: &str) -> Result<Self> {
        let name = name.trim().to_ascii_lowercase();
        let action = match name.as_str() {
            "create" | "install" => Self::Create,
            "upgrade" => Self::Upgrade,
            "delete" | "uninstall" => Self::Delete,
            verb if is_verb(verb) => Self::Custom(verb.to_string()),
            _ => return Err(CoreError::InvalidAction { name: name.clone() }),
        };
        Ok(action)
    }

    /// Verbs the operation requires on every resource of the manifest
    pub fn verbs(&self) -> BTreeSet<String> {
        let verbs: &[&str] = match self {
            Self::Create => &[verbs::CREATE],
            Self::Upgrade => &[verbs::CREATE, verbs::UPDATE, verbs::DELETE],
            Self::Delete => &[verbs::DELETE],
            Self::Custom(verb) => return BTreeSet::from([verb.clone()]),
        };
        verbs.iter().map(|v| v.to_string()).collect()
    }
}

fn is_verb(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cluster_wide_clears_namespace() {
        let action = Action::new("rbac.authorization.k8s.io", "clusterroles", "default", true);
        assert_eq!(action.namespace, "");
        assert!(action.cluster_wide);
    }

    #[test]
    fn test_key_ordering() {
        let a = Action::new("", "services", "a", false).key();
        let b = Action::new("apps", "deployments", "a", false).key();
        let c = Action::new("apps", "deployments", "b", false).key();
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn test_verbs_are_deduplicated() {
        let action = Action::new("apps", "deployments", "ns", false)
            .with_verbs(["update", "create", "update"]);
        let verbs: Vec<_> = action.verbs.iter().map(String::as_str).collect();
        assert_eq!(verbs, vec!["create", "update"]);
    }

    #[test]
    fn test_action_serializes_camel_case() {
        let action = Action::new("apps", "deployments", "shop", false).with_verbs(["create"]);
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["apiGroup"], "apps");
        assert_eq!(json["clusterWide"], false);
        assert_eq!(json["verbs"], serde_json::json!(["create"]));
    }

    #[test]
    fn test_action_display() {
        let action = Action::new("apps", "deployments", "shop", false).with_verbs(["delete", "create"]);
        assert_eq!(action.to_string(), "create,delete deployments.apps (namespace shop)");

        let action = Action::new("", "namespaces", "", true).with_verbs(["create"]);
        assert_eq!(action.to_string(), "create namespaces (cluster-wide)");
    }

    #[test]
    fn test_release_action_verbs() {
        let upgrade: Vec<_> = ReleaseAction::parse("upgrade")
            .unwrap()
            .verbs()
            .into_iter()
            .collect();
        assert_eq!(upgrade, vec!["create", "delete", "update"]);

        assert_eq!(ReleaseAction::parse("Create").unwrap(), ReleaseAction::Create);
        assert_eq!(ReleaseAction::parse("uninstall").unwrap(), ReleaseAction::Delete);
        assert_eq!(
            ReleaseAction::parse("PATCH").unwrap().verbs(),
            BTreeSet::from(["patch".to_string()])
        );
    }

    #[test]
    fn test_release_action_rejects_empty_or_malformed_names() {
        for name in ["", "   ", "get list", "create,delete", "*"] {
            let err = ReleaseAction::parse(name).unwrap_err();
            assert!(matches!(err, CoreError::InvalidAction { .. }), "{name:?}");
        }
        assert_eq!(
            ReleaseAction::parse(" Watch ").unwrap(),
            ReleaseAction::Custom("watch".to_string())
        );
    }
}
