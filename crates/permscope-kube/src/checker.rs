//! Partition actions into allowed and forbidden
//!
//! One access review is issued per `(action, verb)`. Reviews run concurrently
//! up to a fixed bound; the report is ordered by action key and verb, so the
//! same answers always yield the same report. The first failing review
//! aborts the check and drops every review still pending.

use futures::{StreamExt, TryStreamExt};
use permscope_core::{Action, ActionKey, verbs};
use std::collections::{BTreeMap, BTreeSet};

use crate::access::AccessReviewer;
use crate::error::{KubeError, Result};

/// Default number of concurrent access reviews
pub const DEFAULT_CONCURRENCY: usize = permscope_core::config::DEFAULT_CONCURRENCY;

/// Resource a user must be able to read to work with releases in a namespace
const RELEASE_STORAGE_RESOURCE: &str = "secrets";

/// Checks actions against an [`AccessReviewer`]
pub struct PermissionChecker<R: AccessReviewer> {
    reviewer: R,
    concurrency: usize,
}

impl<R: AccessReviewer> PermissionChecker<R> {
    /// Create a checker with the default concurrency
    pub fn new(reviewer: R) -> Self {
        Self {
            reviewer,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Set the maximum number of reviews in flight (at least 1)
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Get the reviewer
    pub fn reviewer(&self) -> &R {
        &self.reviewer
    }

    /// Return the forbidden subset of `actions`
    ///
    /// Each returned action carries only its denied verbs; fully allowed
    /// actions are omitted. Any review error fails the whole check.
    pub async fn check_forbidden(&self, actions: &[Action]) -> Result<Vec<Action>> {
        let checks: Vec<(&Action, &str)> = actions
            .iter()
            .flat_map(|action| action.verbs.iter().map(move |verb| (action, verb.as_str())))
            .collect();
        let total = checks.len();

        let answers: Vec<(&Action, &str, bool)> = futures::stream::iter(checks)
            .map(|(action, verb)| async move {
                let allowed = self
                    .reviewer
                    .can_i(verb, &action.api_group, &action.resource, &action.namespace)
                    .await?;
                Ok::<_, KubeError>((action, verb, allowed))
            })
            .buffer_unordered(self.concurrency)
            .try_collect()
            .await?;

        let mut forbidden: BTreeMap<ActionKey, BTreeSet<String>> = BTreeMap::new();
        for (action, verb, allowed) in answers {
            if !allowed {
                forbidden
                    .entry(action.key())
                    .or_default()
                    .insert(verb.to_string());
            }
        }

        tracing::debug!(
            "{} access review(s), {} forbidden action(s)",
            total,
            forbidden.len()
        );

        Ok(forbidden
            .into_iter()
            .map(|(key, verbs)| Action::from(key).with_verbs(verbs))
            .collect())
    }

    /// Check whether the user can read release storage in `namespace`
    pub async fn validate_for_namespace(&self, namespace: &str) -> Result<bool> {
        self.reviewer
            .can_i(verbs::GET, "", RELEASE_STORAGE_RESOURCE, namespace)
            .await
    }
}
