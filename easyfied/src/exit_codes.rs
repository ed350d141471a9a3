//! Stable exit codes for the `easyfied` CLI.

/// Command succeeded.
pub const OK: i32 = 0;
/// Bad input, unreadable file, or another runtime error.
pub const INVALID: i32 = 1;
/// The path escaped the sandbox, delivery was refused, or validation failed.
pub const REJECTED: i32 = 2;
