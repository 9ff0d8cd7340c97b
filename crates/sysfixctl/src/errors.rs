//! Exit codes for sysfixctl

/// Exit code for success
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code for general errors
pub const EXIT_GENERAL_ERROR: i32 = 1;

/// Exit code when the requested issue number does not exist
pub const EXIT_INVALID_ISSUE: i32 = 3;

/// Exit code when the advisor backend is not reachable (`advisor` command)
pub const EXIT_ADVISOR_UNAVAILABLE: i32 = 70;
