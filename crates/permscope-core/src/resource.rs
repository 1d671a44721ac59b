//! Decoding of multi-document Kubernetes manifests
//!
//! A manifest is a YAML stream of documents separated by `---`. Every
//! non-empty document must be a Kubernetes object carrying `apiVersion` and
//! `kind`. `*List` documents (e.g. `v1/List`) are flattened into their items,
//! so callers always see individual objects in manifest order.

use serde::Deserialize;
use serde_yaml::Value;

use crate::error::{CoreError, Result};

/// One decoded manifest document
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceObject {
    /// Full apiVersion (`apps/v1`, `v1`, ...)
    pub api_version: String,
    /// Object kind
    pub kind: String,
    /// metadata.name (empty if absent)
    pub name: String,
    /// metadata.namespace (empty if the document declares none)
    pub namespace: String,
    /// The complete decoded document
    pub body: Value,
}

impl ResourceObject {
    /// API group, empty for the core group
    pub fn group(&self) -> &str {
        split_api_version(&self.api_version).0
    }

    /// API version without the group
    pub fn version(&self) -> &str {
        split_api_version(&self.api_version).1
    }

    /// Whether the document declares a namespace
    pub fn has_namespace(&self) -> bool {
        !self.namespace.is_empty()
    }

    /// Get display name for logging
    pub fn display_name(&self) -> String {
        let name = if self.name.is_empty() {
            "unnamed"
        } else {
            &self.name
        };
        if self.has_namespace() {
            format!("{}/{}/{}", self.namespace, self.kind, name)
        } else {
            format!("{}/{}", self.kind, name)
        }
    }

    fn from_value(body: Value, document: usize) -> Result<Self> {
        let field = |key: &str| -> Option<String> {
            body.get(key).and_then(Value::as_str).map(str::to_string)
        };

        let api_version = field("apiVersion").ok_or_else(|| CoreError::Decode {
            document,
            message: "object is missing 'apiVersion'".to_string(),
        })?;
        let kind = field("kind").ok_or_else(|| CoreError::Decode {
            document,
            message: "object is missing 'kind'".to_string(),
        })?;

        let metadata = body.get("metadata");
        let meta_field = |key: &str| -> String {
            metadata
                .and_then(|m| m.get(key))
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        let name = meta_field("name");
        let namespace = meta_field("namespace");

        Ok(Self {
            api_version,
            kind,
            name,
            namespace,
            body,
        })
    }
}

/// Split an apiVersion into (group, version)
///
/// - "apps/v1" -> ("apps", "v1")
/// - "v1" -> ("", "v1") (core API)
pub fn split_api_version(api_version: &str) -> (&str, &str) {
    match api_version.rsplit_once('/') {
        Some((group, version)) => (group, version),
        None => ("", api_version),
    }
}

/// Decode a multi-document manifest into resource objects
///
/// Empty and `null` documents are skipped. The first malformed document
/// aborts the whole decode.
pub fn decode_manifest(manifest: &str) -> Result<Vec<ResourceObject>> {
    let mut objects = Vec::new();

    for (index, document) in serde_yaml::Deserializer::from_str(manifest).enumerate() {
        let value = Value::deserialize(document).map_err(|e| CoreError::Decode {
            document: index,
            message: e.to_string(),
        })?;

        match value {
            Value::Null => continue,
            Value::Mapping(_) => {}
            other => {
                return Err(CoreError::Decode {
                    document: index,
                    message: format!("expected an object, found {}", value_type(&other)),
                });
            }
        }

        let object = ResourceObject::from_value(value, index)?;
        if is_list(&object) {
            objects.extend(flatten_list(object, index)?);
        } else {
            objects.push(object);
        }
    }

    Ok(objects)
}

fn is_list(object: &ResourceObject) -> bool {
    object.kind.ends_with("List") && object.body.get("items").is_some_and(Value::is_sequence)
}

fn flatten_list(list: ResourceObject, document: usize) -> Result<Vec<ResourceObject>> {
    let Value::Mapping(mut body) = list.body else {
        return Ok(Vec::new());
    };
    let Some(Value::Sequence(items)) = body.remove("items") else {
        return Ok(Vec::new());
    };

    items
        .into_iter()
        .filter(|item| !item.is_null())
        .map(|item| ResourceObject::from_value(item, document))
        .collect()
}

fn value_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_api_version() {
        assert_eq!(split_api_version("apps/v1"), ("apps", "v1"));
        assert_eq!(split_api_version("v1"), ("", "v1"));
        assert_eq!(
            split_api_version("rbac.authorization.k8s.io/v1"),
            ("rbac.authorization.k8s.io", "v1")
        );
    }

    #[test]
    fn test_decode_multiple_documents() {
        let manifest = r#"
apiVersion: apps/v1
kind: Deployment
metadata:
  name: web
  namespace: shop
---
apiVersion: rbac.authorization.k8s.io/v1
kind: ClusterRole
metadata:
  name: reader
"#;
        let objects = decode_manifest(manifest).unwrap();
        assert_eq!(objects.len(), 2);

        assert_eq!(objects[0].kind, "Deployment");
        assert_eq!(objects[0].group(), "apps");
        assert_eq!(objects[0].version(), "v1");
        assert_eq!(objects[0].namespace, "shop");
        assert_eq!(objects[0].display_name(), "shop/Deployment/web");

        assert_eq!(objects[1].kind, "ClusterRole");
        assert!(!objects[1].has_namespace());
        assert_eq!(objects[1].display_name(), "ClusterRole/reader");
    }

    #[test]
    fn test_decode_skips_empty_documents() {
        let manifest = "---\n---\n# only a comment\n---\napiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: cfg\n---\nnull\n";
        let objects = decode_manifest(manifest).unwrap();
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].name, "cfg");
    }

    #[test]
    fn test_decode_empty_manifest() {
        assert!(decode_manifest("").unwrap().is_empty());
    }

    #[test]
    fn test_decode_flattens_lists() {
        let manifest = r#"
apiVersion: v1
kind: List
items:
  - apiVersion: v1
    kind: Service
    metadata:
      name: a
  - apiVersion: v1
    kind: Secret
    metadata:
      name: b
"#;
        let objects = decode_manifest(manifest).unwrap();
        let kinds: Vec<_> = objects.iter().map(|o| o.kind.as_str()).collect();
        assert_eq!(kinds, vec!["Service", "Secret"]);
    }

    #[test]
    fn test_decode_missing_kind_fails() {
        let manifest = "apiVersion: v1\nkind: ConfigMap\n---\napiVersion: v1\nmetadata:\n  name: x\n";
        let err = decode_manifest(manifest).unwrap_err();
        assert!(matches!(err, CoreError::Decode { document: 1, .. }));
        assert!(err.to_string().contains("kind"));
    }

    #[test]
    fn test_decode_malformed_yaml_fails() {
        let manifest = "apiVersion: v1\nkind: ConfigMap\nmetadata: [unclosed\n";
        assert!(matches!(
            decode_manifest(manifest),
            Err(CoreError::Decode { document: 0, .. })
        ));
    }

    #[test]
    fn test_decode_scalar_document_fails() {
        let err = decode_manifest("just a string").unwrap_err();
        assert!(err.to_string().contains("a string"));
    }
}
