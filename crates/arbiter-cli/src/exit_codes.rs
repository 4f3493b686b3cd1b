//! Exit codes are part of the CLI contract.

pub const SUCCESS: i32 = 0;
pub const COMMAND_FAILED: i32 = 1; // Lookup, upstream model or readiness failure
pub const CONFIG_ERROR: i32 = 2; // Config, fixtures or credentials unusable
