//! Permscope Core - Core types for permission and release reporting
//!
//! This crate provides the foundational types used throughout permscope:
//! - `ResourceObject`: One decoded document of a multi-document manifest
//! - `Action`: A permission requirement (group, resource, namespace, verbs)
//! - `ReleaseRevision` / `AppOverview`: Raw release history and its aggregated view
//! - `Settings`: User configuration

pub mod action;
pub mod config;
pub mod error;
pub mod release;
pub mod resource;

pub use action::{Action, ActionKey, ReleaseAction, verbs};
pub use config::{Settings, StorageKind};
pub use error::{CoreError, Result};
pub use release::{AppOverview, ChartMetadata, ReleaseRevision, ReleaseStatus, StatusFilter};
pub use resource::{ResourceObject, decode_manifest, split_api_version};
