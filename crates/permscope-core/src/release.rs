//! Release revisions and their aggregated overview

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;

/// One historical deployment attempt of a release, as supplied by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseRevision {
    /// Release name
    pub release_name: String,

    /// Kubernetes namespace
    pub namespace: String,

    /// Revision number (1-indexed, strictly increasing per release name)
    #[serde(alias = "revision")]
    pub revision_number: u32,

    /// Chart name at deploy time
    pub chart_name: String,

    /// Chart version at deploy time
    pub chart_version: String,

    /// Chart icon URL
    #[serde(default)]
    pub chart_icon: String,

    /// Raw status code from the backend (numeric or textual)
    #[serde(alias = "status", deserialize_with = "string_or_number")]
    pub status_code: String,

    /// Rendered manifest of this revision
    #[serde(default, alias = "manifest")]
    pub manifest_text: String,
}

impl ReleaseRevision {
    /// Normalized status of this revision
    pub fn status(&self) -> ReleaseStatus {
        ReleaseStatus::from_code(&self.status_code)
    }
}

/// Chart metadata carried by an overview
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ChartMetadata {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub icon: String,
}

/// The user-facing current state of one release
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppOverview {
    pub release_name: String,
    /// Chart version of the latest revision
    pub version: String,
    pub namespace: String,
    pub icon: String,
    pub status: ReleaseStatus,
    /// Chart name of the latest revision
    pub chart: String,
    pub chart_metadata: ChartMetadata,
}

impl From<&ReleaseRevision> for AppOverview {
    fn from(revision: &ReleaseRevision) -> Self {
        Self {
            release_name: revision.release_name.clone(),
            version: revision.chart_version.clone(),
            namespace: revision.namespace.clone(),
            icon: revision.chart_icon.clone(),
            status: revision.status(),
            chart: revision.chart_name.clone(),
            chart_metadata: ChartMetadata {
                name: revision.chart_name.clone(),
                version: revision.chart_version.clone(),
                icon: revision.chart_icon.clone(),
            },
        }
    }
}

/// Normalized release status
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReleaseStatus {
    Unknown,
    Deployed,
    Deleted,
    Superseded,
    Failed,
    Deleting,
    PendingInstall,
    PendingUpgrade,
    PendingRollback,
}

impl ReleaseStatus {
    /// All statuses, in legacy numeric code order
    pub const ALL: [ReleaseStatus; 9] = [
        Self::Unknown,
        Self::Deployed,
        Self::Deleted,
        Self::Superseded,
        Self::Failed,
        Self::Deleting,
        Self::PendingInstall,
        Self::PendingUpgrade,
        Self::PendingRollback,
    ];

    /// Map a backend status code to a status
    ///
    /// Accepts the legacy numeric codes (`0`-`8`) and textual codes in any
    /// case, with `-` or `_` separators (`deployed`, `pending-install`,
    /// `uninstalled`, ...). Anything else is `Unknown`.
    pub fn from_code(code: &str) -> Self {
        Self::try_from_code(code).unwrap_or(Self::Unknown)
    }

    /// Like [`Self::from_code`], but `None` for codes that are not recognized
    pub fn try_from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        if let Ok(n) = code.parse::<usize>() {
            return Self::ALL.get(n).copied();
        }

        let status = match code.to_ascii_uppercase().replace('-', "_").as_str() {
            "UNKNOWN" => Self::Unknown,
            "DEPLOYED" => Self::Deployed,
            "DELETED" | "UNINSTALLED" => Self::Deleted,
            "SUPERSEDED" => Self::Superseded,
            "FAILED" => Self::Failed,
            "DELETING" | "UNINSTALLING" => Self::Deleting,
            "PENDING_INSTALL" => Self::PendingInstall,
            "PENDING_UPGRADE" => Self::PendingUpgrade,
            "PENDING_ROLLBACK" => Self::PendingRollback,
            _ => return None,
        };
        Some(status)
    }

    /// Canonical status name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::Deployed => "DEPLOYED",
            Self::Deleted => "DELETED",
            Self::Superseded => "SUPERSEDED",
            Self::Failed => "FAILED",
            Self::Deleting => "DELETING",
            Self::PendingInstall => "PENDING_INSTALL",
            Self::PendingUpgrade => "PENDING_UPGRADE",
            Self::PendingRollback => "PENDING_ROLLBACK",
        }
    }

    /// Check if this is a pending (transitional) state
    pub fn is_pending(&self) -> bool {
        matches!(
            self,
            Self::PendingInstall | Self::PendingUpgrade | Self::PendingRollback | Self::Deleting
        )
    }
}

impl std::fmt::Display for ReleaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which release statuses a listing keeps
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatusFilter {
    /// Keep every release
    #[default]
    All,
    /// Keep releases whose current status is in the set
    Only(BTreeSet<ReleaseStatus>),
}

impl StatusFilter {
    /// Parse a filter: empty or `all` keeps everything, otherwise a
    /// comma-separated list of status codes
    pub fn parse(filter: &str) -> Self {
        let filter = filter.trim();
        if filter.is_empty() || filter.eq_ignore_ascii_case("all") {
            return Self::All;
        }
        Self::Only(
            filter
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ReleaseStatus::from_code)
                .collect(),
        )
    }

    /// Tokens of `filter` that name no known status
    ///
    /// [`Self::parse`] maps them to `Unknown`, which is rarely what was meant.
    pub fn unrecognized(filter: &str) -> Vec<String> {
        let filter = filter.trim();
        if filter.eq_ignore_ascii_case("all") {
            return Vec::new();
        }
        filter
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty() && ReleaseStatus::try_from_code(s).is_none())
            .map(str::to_string)
            .collect()
    }

    /// Check whether a status passes the filter
    pub fn matches(&self, status: ReleaseStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(allowed) => allowed.contains(&status),
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Code {
        Text(String),
        Number(i64),
    }

    Ok(match Code::deserialize(deserializer)? {
        Code::Text(text) => text,
        Code::Number(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_numeric_code() {
        for (code, status) in ReleaseStatus::ALL.iter().enumerate() {
            assert_eq!(ReleaseStatus::from_code(&code.to_string()), *status);
        }
        assert_eq!(ReleaseStatus::from_code("9"), ReleaseStatus::Unknown);
        assert_eq!(ReleaseStatus::from_code("-1"), ReleaseStatus::Unknown);
    }

    #[test]
    fn test_status_from_text_code() {
        assert_eq!(ReleaseStatus::from_code("DEPLOYED"), ReleaseStatus::Deployed);
        assert_eq!(ReleaseStatus::from_code("deployed"), ReleaseStatus::Deployed);
        assert_eq!(ReleaseStatus::from_code("uninstalled"), ReleaseStatus::Deleted);
        assert_eq!(ReleaseStatus::from_code("uninstalling"), ReleaseStatus::Deleting);
        assert_eq!(
            ReleaseStatus::from_code("pending-install"),
            ReleaseStatus::PendingInstall
        );
        assert_eq!(
            ReleaseStatus::from_code("PENDING_UPGRADE"),
            ReleaseStatus::PendingUpgrade
        );
        assert_eq!(ReleaseStatus::from_code(""), ReleaseStatus::Unknown);
        assert_eq!(ReleaseStatus::from_code("exploded"), ReleaseStatus::Unknown);
    }

    #[test]
    fn test_status_names_roundtrip() {
        for status in ReleaseStatus::ALL {
            assert_eq!(ReleaseStatus::from_code(status.as_str()), status);
        }
    }

    #[test]
    fn test_status_filter() {
        assert_eq!(StatusFilter::parse(""), StatusFilter::All);
        assert_eq!(StatusFilter::parse("ALL"), StatusFilter::All);

        let filter = StatusFilter::parse("deployed, failed");
        assert!(filter.matches(ReleaseStatus::Deployed));
        assert!(filter.matches(ReleaseStatus::Failed));
        assert!(!filter.matches(ReleaseStatus::Deleted));
    }

    #[test]
    fn test_status_filter_reports_misspelled_statuses() {
        assert_eq!(
            StatusFilter::unrecognized("deployd, failed,unknown,42"),
            vec!["deployd", "42"]
        );
        assert!(StatusFilter::unrecognized("all").is_empty());
        assert!(StatusFilter::unrecognized("").is_empty());
        assert!(StatusFilter::unrecognized("pending-install,0").is_empty());

        assert_eq!(ReleaseStatus::try_from_code("unknown"), Some(ReleaseStatus::Unknown));
        assert_eq!(ReleaseStatus::try_from_code("deployd"), None);
    }

    #[test]
    fn test_revision_deserializes_numeric_status() {
        let yaml = r#"
releaseName: foo
namespace: my_ns
revision: 2
chartName: wordpress
chartVersion: 1.0.1
statusCode: 4
"#;
        let revision: ReleaseRevision = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(revision.revision_number, 2);
        assert_eq!(revision.status_code, "4");
        assert_eq!(revision.status(), ReleaseStatus::Failed);
        assert_eq!(revision.chart_icon, "");
    }

    #[test]
    fn test_overview_from_revision() {
        let revision = ReleaseRevision {
            release_name: "foo".to_string(),
            namespace: "my_ns".to_string(),
            revision_number: 1,
            chart_name: "wordpress".to_string(),
            chart_version: "1.0.0".to_string(),
            chart_icon: "icon.png".to_string(),
            status_code: "DEPLOYED".to_string(),
            manifest_text: String::new(),
        };
        let overview = AppOverview::from(&revision);
        assert_eq!(overview.release_name, "foo");
        assert_eq!(overview.version, "1.0.0");
        assert_eq!(overview.status, ReleaseStatus::Deployed);
        assert_eq!(overview.chart_metadata.icon, "icon.png");

        let json = serde_json::to_value(&overview).unwrap();
        assert_eq!(json["status"], "DEPLOYED");
        assert_eq!(json["chartMetadata"]["name"], "wordpress");
    }
}
