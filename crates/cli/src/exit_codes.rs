//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract. Scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain     | Description                              |
//! |---------|------------|------------------------------------------|
//! | 0       | Universal  | Success                                  |
//! | 1       | Universal  | General error (unspecified)              |
//! | 2       | Universal  | CLI usage error (bad args)               |
//! | 3       | Universal  | Cannot write output                      |
//! | 50-59   | fetch      | Upstream sources and pipeline outcome    |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into [`sync_exit_code`] or the relevant command

use certsync_recon::SyncError;

// =============================================================================
// Universal (0-3)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
#[allow(dead_code)]
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, empty identifiers.
pub const EXIT_USAGE: u8 = 2;

/// Output file could not be created or written.
pub const EXIT_IO: u8 = 3;

// =============================================================================
// Fetch (50-59): Credly / Microsoft Learn
// =============================================================================

/// Network failure, timeout, or non-2xx status from a source.
pub const EXIT_FETCH_TRANSPORT: u8 = 50;

/// Response body was not valid JSON.
pub const EXIT_FETCH_DECODE: u8 = 51;

/// Valid JSON without the expected structure.
pub const EXIT_FETCH_MALFORMED: u8 = 52;

/// Nothing to write after all sources were processed.
pub const EXIT_NO_RECORDS: u8 = 53;

/// Badge map file could not be read or is invalid.
pub const EXIT_CONFIG: u8 = 54;

/// Map a SyncError to its exit code.
pub fn sync_exit_code(err: &SyncError) -> u8 {
    match err {
        SyncError::Transport { .. } => EXIT_FETCH_TRANSPORT,
        SyncError::Decode { .. } => EXIT_FETCH_DECODE,
        SyncError::MalformedResponse { .. } => EXIT_FETCH_MALFORMED,
        SyncError::NoRecordsFound => EXIT_NO_RECORDS,
        SyncError::Config(_) => EXIT_CONFIG,
        SyncError::Io(_) => EXIT_CONFIG,
    }
}
