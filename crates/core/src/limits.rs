//! Size and time limits for the log server.

/// Maximum bulk request body size in bytes (1MB).
pub const MAX_BULK_BODY_BYTES: usize = 1024 * 1024;

/// Logs older than this many seconds relative to the server clock are rejected.
///
/// Only the lower bound is enforced; timestamps ahead of the server clock pass.
pub const MAX_LOG_AGE_SECS: i64 = 3600;
