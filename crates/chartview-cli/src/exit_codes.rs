//! Process exit codes
//!
//! Follows sysexits.h where a matching code exists.

/// Success
pub const SUCCESS: i32 = 0;

/// General error
pub const ERROR: i32 = 1;

/// Seeding finished but some charts failed
pub const SEED_INCOMPLETE: i32 = 2;

/// Invalid repository or API version list
pub const INPUT_ERROR: i32 = 3;

/// Store unreachable or failing
pub const STORE_ERROR: i32 = 4;

/// IO error
pub const IO_ERROR: i32 = 5;

/// Invalid arguments or settings file
pub const USAGE_ERROR: i32 = 64;
