//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success                                  |
//! | 1       | Universal        | General error (unspecified)              |
//! | 2       | Universal        | CLI usage error (bad args, no data file) |
//! | 3-9     | query            | Coverage table and query codes           |
//! | 50-59   | enrich           | Enrichment provider codes                |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, no data file configured.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Query (3-9)
// =============================================================================

/// Coverage table is empty or malformed, or a required column is missing.
pub const EXIT_DATA: u8 = 3;

/// Company not in the table, or not an active customer for `prospects`.
pub const EXIT_NOT_FOUND: u8 = 4;

/// File could not be read or written.
pub const EXIT_IO: u8 = 5;

// =============================================================================
// Enrich (50-59)
// =============================================================================

/// No API key in keychain or environment for the configured provider.
pub const EXIT_ENRICH_MISSING_KEY: u8 = 50;

/// Every enrichment request failed; nothing was written.
pub const EXIT_ENRICH_ALL_FAILED: u8 = 51;

/// Keychain could not store or delete the key.
pub const EXIT_ENRICH_KEYCHAIN: u8 = 52;
