//! Helm release Secrets
//!
//! Helm keeps one Secret per revision, labelled `owner=helm`, of type
//! `helm.sh/release.v1`. `data.release` holds the release as base64 text of
//! gzip-compressed JSON (older payloads may be uncompressed JSON).

use async_trait::async_trait;
use base64::Engine as _;
use k8s_openapi::api::core::v1::Secret;
use kube::Client;
use kube::api::{Api, ListParams};
use permscope_core::ReleaseRevision;
use serde::Deserialize;
use std::io::Read;

use super::RevisionStore;
use crate::error::{KubeError, Result};

/// Label selector matching Helm release Secrets
pub const HELM_OWNER_LABEL: &str = "owner=helm";

const GZIP_MAGIC: [u8; 3] = [0x1f, 0x8b, 0x08];

/// Revision store reading Helm release Secrets
pub struct SecretsStore {
    client: Client,
}

impl SecretsStore {
    /// Create with an existing client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn parse_secret(secret: &Secret) -> Result<ReleaseRevision> {
        let data = secret
            .data
            .as_ref()
            .and_then(|d| d.get("release"))
            .ok_or_else(|| KubeError::Storage("Secret missing 'release' data".to_string()))?;

        decode_helm_release(&data.0)
    }
}

#[async_trait]
impl RevisionStore for SecretsStore {
    async fn list_revisions(&self, namespace: Option<&str>) -> Result<Vec<ReleaseRevision>> {
        let api: Api<Secret> = match namespace {
            Some(ns) => Api::namespaced(self.client.clone(), ns),
            None => Api::all(self.client.clone()),
        };
        let lp = ListParams::default().labels(HELM_OWNER_LABEL);

        let secrets = api.list(&lp).await.map_err(|e| {
            KubeError::Storage(format!("failed to list release secrets: {}", e))
        })?;

        let mut revisions = Vec::with_capacity(secrets.items.len());
        for secret in &secrets.items {
            match Self::parse_secret(secret) {
                Ok(revision) => revisions.push(revision),
                Err(e) => tracing::warn!(
                    "skipping release secret {}/{}: {}",
                    secret.metadata.namespace.as_deref().unwrap_or_default(),
                    secret.metadata.name.as_deref().unwrap_or("unnamed"),
                    e
                ),
            }
        }

        tracing::debug!("read {} release revision(s)", revisions.len());
        Ok(revisions)
    }
}

#[derive(Deserialize)]
struct HelmRelease {
    name: String,
    #[serde(default)]
    namespace: String,
    version: u32,
    #[serde(default)]
    info: Option<HelmInfo>,
    #[serde(default)]
    chart: Option<HelmChart>,
    #[serde(default)]
    manifest: String,
}

#[derive(Deserialize)]
struct HelmInfo {
    #[serde(default)]
    status: String,
}

#[derive(Deserialize)]
struct HelmChart {
    #[serde(default)]
    metadata: Option<HelmChartMetadata>,
}

#[derive(Deserialize, Default)]
struct HelmChartMetadata {
    #[serde(default)]
    name: String,
    #[serde(default)]
    version: String,
    #[serde(default)]
    icon: String,
}

/// Decode a Helm release payload (base64 text, optionally gzipped JSON)
pub fn decode_helm_release(data: &[u8]) -> Result<ReleaseRevision> {
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(data.trim_ascii())
        .map_err(|e| KubeError::Serialization(format!("base64 decode error: {}", e)))?;

    let json = if decoded.starts_with(&GZIP_MAGIC) {
        let mut decompressed = Vec::new();
        flate2::read::GzDecoder::new(decoded.as_slice())
            .read_to_end(&mut decompressed)
            .map_err(|e| KubeError::Serialization(format!("gzip decode error: {}", e)))?;
        decompressed
    } else {
        decoded
    };

    let release: HelmRelease = serde_json::from_slice(&json)?;
    let metadata = release
        .chart
        .and_then(|c| c.metadata)
        .unwrap_or_default();

    Ok(ReleaseRevision {
        release_name: release.name,
        namespace: release.namespace,
        revision_number: release.version,
        chart_name: metadata.name,
        chart_version: metadata.version,
        chart_icon: metadata.icon,
        status_code: release.info.map(|i| i.status).unwrap_or_default(),
        manifest_text: release.manifest,
    })
}
