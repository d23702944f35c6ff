//! CLI Exit Code Registry
//!
//! Single source of truth for `studiorate` exit codes. Scripts rely on them.
//!
//! | Code | Meaning                                           |
//! |------|---------------------------------------------------|
//! | 0    | Success                                           |
//! | 2    | Usage error (bad tier, unknown addon, bad flags)  |
//! | 3    | Configuration file missing, unreadable or invalid |
//! | 4    | No sheet source could be loaded                   |
//! | 5    | Output could not be written                       |
//!
//! An empty pricing matrix is not an error for `matrix` and `quote`: they
//! report what they have and fall back to default prices.

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// Usage error - bad arguments or identifiers.
pub const EXIT_USAGE: u8 = 2;

/// Settings could not be loaded or failed validation.
pub const EXIT_CONFIG: u8 = 3;

/// Every configured source failed (commands that need raw rows).
pub const EXIT_SOURCE_UNAVAILABLE: u8 = 4;

/// Writing to stdout failed or a value could not be serialized.
pub const EXIT_OUTPUT: u8 = 5;
