//! Authorization oracle: "can I perform this verb on this resource?"
//!
//! - [`SelfSubjectReviewer`] creates `SelfSubjectAccessReview`s for the
//!   identity of the kube client (optionally impersonated)
//! - [`StaticReviewer`] answers from a fixed deny list (tests, offline use)

use async_trait::async_trait;
use k8s_openapi::api::authorization::v1::{
    ResourceAttributes, SelfSubjectAccessReview, SelfSubjectAccessReviewSpec,
};
use kube::Client;
use kube::api::{Api, PostParams};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::error::{KubeError, Result};

/// A narrow authorization capability
///
/// `Ok(false)` is a policy denial; `Err` means the backend could not answer.
#[async_trait]
pub trait AccessReviewer: Send + Sync {
    /// Check whether the current identity may perform `verb`
    ///
    /// An empty `namespace` asks about the whole cluster.
    async fn can_i(&self, verb: &str, group: &str, resource: &str, namespace: &str)
    -> Result<bool>;
}

/// Reviewer backed by the Kubernetes authorization API
#[derive(Clone)]
pub struct SelfSubjectReviewer {
    client: Client,
}

impl SelfSubjectReviewer {
    /// Create with an existing client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn review_for(verb: &str, group: &str, resource: &str, namespace: &str) -> SelfSubjectAccessReview {
        SelfSubjectAccessReview {
            spec: SelfSubjectAccessReviewSpec {
                resource_attributes: Some(ResourceAttributes {
                    group: Some(group.to_string()),
                    resource: Some(resource.to_string()),
                    namespace: (!namespace.is_empty()).then(|| namespace.to_string()),
                    verb: Some(verb.to_string()),
                    ..Default::default()
                }),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

#[async_trait]
impl AccessReviewer for SelfSubjectReviewer {
    async fn can_i(
        &self,
        verb: &str,
        group: &str,
        resource: &str,
        namespace: &str,
    ) -> Result<bool> {
        let api: Api<SelfSubjectAccessReview> = Api::all(self.client.clone());
        let review = Self::review_for(verb, group, resource, namespace);

        let response = api
            .create(&PostParams::default(), &review)
            .await
            .map_err(|e| KubeError::AccessReview {
                verb: verb.to_string(),
                resource: resource.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status.ok_or_else(|| KubeError::AccessReview {
            verb: verb.to_string(),
            resource: resource.to_string(),
            message: "the API server answered with an empty status".to_string(),
        })?;

        Ok(status.allowed)
    }
}

/// Deterministic reviewer for tests
///
/// Everything is allowed unless denied. Counts calls and completed reviews,
/// and tracks the peak number of concurrent reviews.
#[derive(Clone, Default)]
pub struct StaticReviewer {
    denied: HashSet<(String, String, String, String)>,
    deny_all: bool,
    failures: HashMap<(String, String), String>,
    delays: HashMap<(String, String), Duration>,
    calls: Arc<AtomicUsize>,
    completed: Arc<AtomicUsize>,
    in_flight: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

impl StaticReviewer {
    /// Create a reviewer that allows everything
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// Create a reviewer that denies everything
    pub fn deny_all() -> Self {
        Self {
            deny_all: true,
            ..Self::default()
        }
    }

    /// Deny one verb on a resource in a namespace ("" = cluster-wide)
    pub fn deny(mut self, verb: &str, group: &str, resource: &str, namespace: &str) -> Self {
        self.denied.insert((
            verb.to_string(),
            group.to_string(),
            resource.to_string(),
            namespace.to_string(),
        ));
        self
    }

    /// Fail every review of `verb` on `resource`
    pub fn with_failure(mut self, verb: &str, resource: &str, message: &str) -> Self {
        self.failures
            .insert((verb.to_string(), resource.to_string()), message.to_string());
        self
    }

    /// Delay every review of `verb` on `resource` before it answers
    pub fn with_delay(mut self, verb: &str, resource: &str, delay: Duration) -> Self {
        self.delays
            .insert((verb.to_string(), resource.to_string()), delay);
        self
    }

    /// Number of reviews started
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of reviews that ran to an answer or an error
    pub fn completed_count(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    /// Highest number of reviews observed in flight at once
    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AccessReviewer for StaticReviewer {
    async fn can_i(
        &self,
        verb: &str,
        group: &str,
        resource: &str,
        namespace: &str,
    ) -> Result<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(current, Ordering::SeqCst);

        // Give other reviews a chance to start
        tokio::task::yield_now().await;
        let target = (verb.to_string(), resource.to_string());
        if let Some(delay) = self.delays.get(&target) {
            tokio::time::sleep(*delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.completed.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = self.failures.get(&target) {
            return Err(KubeError::AccessReview {
                verb: verb.to_string(),
                resource: resource.to_string(),
                message: message.clone(),
            });
        }

        let key = (
            verb.to_string(),
            group.to_string(),
            resource.to_string(),
            namespace.to_string(),
        );
        Ok(!self.deny_all && !self.denied.contains(&key))
    }
}
