//! Collapse release history into one overview per release
//!
//! Revisions are grouped by release name and reduced to the highest revision
//! number. That revision alone decides what the overview shows, including a
//! failed or deleted latest attempt.

use permscope_core::config::DEFAULT_PAGE_SIZE;
use permscope_core::{AppOverview, ReleaseRevision, StatusFilter};
use std::collections::BTreeMap;

use crate::error::Result;
use crate::storage::RevisionStore;

/// Options for listing releases
#[derive(Debug, Clone)]
pub struct ListOptions {
    /// Namespace to list ("" = all namespaces)
    pub namespace: String,

    /// Maximum number of overviews (0 = unlimited)
    pub page_size: usize,

    /// Statuses to keep, matched against the latest revision
    pub status: StatusFilter,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            namespace: String::new(),
            page_size: DEFAULT_PAGE_SIZE,
            status: StatusFilter::All,
        }
    }
}

impl ListOptions {
    /// Options listing every release in `namespace`
    pub fn for_namespace(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            ..Self::default()
        }
    }

    /// Namespace to pass to a store, `None` for all namespaces
    pub fn namespace_filter(&self) -> Option<&str> {
        (!self.namespace.is_empty()).then_some(self.namespace.as_str())
    }
}

/// Reduce `revisions` to one overview per release name
///
/// Output is sorted by release name and truncated to `options.page_size`
/// when it is non-zero.
pub fn aggregate(revisions: &[ReleaseRevision], options: &ListOptions) -> Vec<AppOverview> {
    let mut latest: BTreeMap<&str, &ReleaseRevision> = BTreeMap::new();

    for revision in revisions {
        if options
            .namespace_filter()
            .is_some_and(|ns| revision.namespace != ns)
        {
            continue;
        }

        latest
            .entry(revision.release_name.as_str())
            .and_modify(|current| {
                if revision.revision_number > current.revision_number {
                    *current = revision;
                }
            })
            .or_insert(revision);
    }

    let limit = match options.page_size {
        0 => usize::MAX,
        n => n,
    };

    latest
        .into_values()
        .map(AppOverview::from)
        .filter(|overview| options.status.matches(overview.status))
        .take(limit)
        .collect()
}

/// Lists release overviews from a [`RevisionStore`]
pub struct ReleaseAggregator<S: RevisionStore> {
    store: S,
}

impl<S: RevisionStore> ReleaseAggregator<S> {
    /// Create with a revision store
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Get the revision store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Read the revision history and aggregate it
    pub async fn list(&self, options: &ListOptions) -> Result<Vec<AppOverview>> {
        let revisions = self.store.list_revisions(options.namespace_filter()).await?;
        let overviews = aggregate(&revisions, options);

        tracing::debug!(
            "{} revision(s) reduced to {} release(s)",
            revisions.len(),
            overviews.len()
        );
        Ok(overviews)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MockRevisionStore;
    use permscope_core::ReleaseStatus;

    fn revision(name: &str, ns: &str, number: u32, status: &str, version: &str) -> ReleaseRevision {
        ReleaseRevision {
            release_name: name.to_string(),
            namespace: ns.to_string(),
            revision_number: number,
            chart_name: "wordpress".to_string(),
            chart_version: version.to_string(),
            chart_icon: "https://example.com/wp.png".to_string(),
            status_code: status.to_string(),
            manifest_text: String::new(),
        }
    }

    fn two_namespaces() -> Vec<ReleaseRevision> {
        vec![
            revision("foo", "my_ns", 1, "DEPLOYED", "1.0.0"),
            revision("bar", "other_ns", 1, "DELETED", "1.0.0"),
        ]
    }

    fn unlimited() -> ListOptions {
        ListOptions {
            page_size: 0,
            ..ListOptions::default()
        }
    }

    #[test]
    fn test_lists_every_release() {
        let overviews = aggregate(&two_namespaces(), &unlimited());

        assert_eq!(overviews.len(), 2);
        assert_eq!(overviews[0].release_name, "bar");
        assert_eq!(overviews[0].status, ReleaseStatus::Deleted);
        assert_eq!(overviews[1].release_name, "foo");
        assert_eq!(overviews[1].status, ReleaseStatus::Deployed);
        assert_eq!(overviews[1].chart_metadata.name, "wordpress");
    }

    #[test]
    fn test_namespace_filter() {
        let options = ListOptions {
            namespace: "my_ns".to_string(),
            ..unlimited()
        };
        let overviews = aggregate(&two_namespaces(), &options);

        assert_eq!(overviews.len(), 1);
        assert_eq!(overviews[0].release_name, "foo");
        assert_eq!(overviews[0].namespace, "my_ns");
    }

    #[test]
    fn test_latest_revision_wins_even_when_failed() {
        let revisions = vec![
            revision("foo", "my_ns", 1, "DEPLOYED", "1.0.0"),
            revision("foo", "my_ns", 2, "FAILED", "1.0.1"),
        ];
        let overviews = aggregate(&revisions, &unlimited());

        assert_eq!(overviews.len(), 1);
        assert_eq!(overviews[0].version, "1.0.1");
        assert_eq!(overviews[0].status, ReleaseStatus::Failed);
    }

    #[test]
    fn test_revision_order_does_not_matter() {
        let revisions = vec![
            revision("foo", "my_ns", 3, "deployed", "1.0.2"),
            revision("foo", "my_ns", 1, "superseded", "1.0.0"),
            revision("foo", "my_ns", 2, "superseded", "1.0.1"),
        ];
        let overviews = aggregate(&revisions, &unlimited());
        assert_eq!(overviews[0].version, "1.0.2");
    }

    #[test]
    fn test_numeric_and_unknown_status_codes() {
        let revisions = vec![
            revision("a", "ns", 1, "4", "1.0.0"),
            revision("b", "ns", 1, "42", "1.0.0"),
            revision("c", "ns", 1, "pending-rollback", "1.0.0"),
        ];
        let overviews = aggregate(&revisions, &unlimited());

        assert_eq!(overviews[0].status, ReleaseStatus::Failed);
        assert_eq!(overviews[1].status, ReleaseStatus::Unknown);
        assert_eq!(overviews[2].status, ReleaseStatus::PendingRollback);
    }

    #[test]
    fn test_status_filter_applies_to_latest_revision() {
        let revisions = vec![
            revision("foo", "ns", 1, "DEPLOYED", "1.0.0"),
            revision("foo", "ns", 2, "FAILED", "1.0.1"),
            revision("bar", "ns", 1, "DEPLOYED", "2.0.0"),
        ];
        let options = ListOptions {
            status: StatusFilter::parse("deployed"),
            ..unlimited()
        };
        let overviews = aggregate(&revisions, &options);

        // foo was deployed once, but its current state is FAILED
        assert_eq!(overviews.len(), 1);
        assert_eq!(overviews[0].release_name, "bar");
    }

    #[test]
    fn test_page_size_truncates_sorted_output() {
        let revisions: Vec<_> = ["delta", "alpha", "charlie", "bravo"]
            .iter()
            .map(|name| revision(name, "ns", 1, "DEPLOYED", "1.0.0"))
            .collect();
        let options = ListOptions {
            page_size: 2,
            ..ListOptions::default()
        };
        let names: Vec<_> = aggregate(&revisions, &options)
            .into_iter()
            .map(|o| o.release_name)
            .collect();

        assert_eq!(names, vec!["alpha", "bravo"]);
    }

    #[test]
    fn test_same_name_in_two_namespaces_collapses() {
        let revisions = vec![
            revision("web", "staging", 4, "DEPLOYED", "1.4.0"),
            revision("web", "prod", 2, "DEPLOYED", "1.2.0"),
        ];

        let all = aggregate(&revisions, &unlimited());
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].namespace, "staging");

        let prod = aggregate(
            &revisions,
            &ListOptions {
                namespace: "prod".to_string(),
                ..unlimited()
            },
        );
        assert_eq!(prod[0].version, "1.2.0");
    }

    #[test]
    fn test_empty_history() {
        assert!(aggregate(&[], &ListOptions::default()).is_empty());
    }

    #[tokio::test]
    async fn test_aggregator_reads_store() {
        let aggregator = ReleaseAggregator::new(MockRevisionStore::with_revisions(two_namespaces()));

        let overviews = aggregator
            .list(&ListOptions::for_namespace("other_ns"))
            .await
            .unwrap();

        assert_eq!(overviews.len(), 1);
        assert_eq!(overviews[0].release_name, "bar");
        assert_eq!(aggregator.store().operation_counts().lists, 1);
    }

    #[tokio::test]
    async fn test_aggregator_propagates_store_errors() {
        let aggregator = ReleaseAggregator::new(MockRevisionStore::failing("forbidden"));
        assert!(aggregator.list(&ListOptions::default()).await.is_err());
    }
}
