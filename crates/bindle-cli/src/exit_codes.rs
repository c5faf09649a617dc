//! Exit codes for the `bindle` CLI.

pub const SUCCESS: i32 = 0;
pub const ERROR: i32 = 1; // Bad input, missing files, config
pub const INTERNAL_ERROR: i32 = 2; // Unexpected failure before dispatch
pub const UNTRUSTED: i32 = 4; // Signature, key or role check failed
pub const STORAGE: i32 = 6; // Keyring or key file could not be read or written
