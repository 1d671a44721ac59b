//! Standard exit codes for CLI operations
//!
//! These exit codes follow Unix conventions and sysexits.h where applicable.

/// Success - operation completed, nothing forbidden
pub const SUCCESS: i32 = 0;

/// General error - unspecified failure
pub const ERROR: i32 = 1;

/// Input error - malformed manifest, revisions file or configuration
pub const INPUT_ERROR: i32 = 2;

/// Forbidden - at least one required permission is missing
pub const FORBIDDEN: i32 = 3;

/// Cluster error - could not reach or query the API server
pub const CLUSTER_ERROR: i32 = 4;

/// IO error - file not found, permission denied, etc.
pub const IO_ERROR: i32 = 5;

/// Usage error - invalid arguments or options (following sysexits.h convention)
pub const USAGE_ERROR: i32 = 64;
