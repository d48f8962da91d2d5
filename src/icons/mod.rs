//! Status glyphs used in terminal output and notifications.

// Check state indicators
pub const CHECK_PENDING: &str = "●";
pub const CHECK_SUCCESS: &str = "✓";
pub const CHECK_FAILURE: &str = "✗";
pub const CHECK_UNKNOWN: &str = "?";
