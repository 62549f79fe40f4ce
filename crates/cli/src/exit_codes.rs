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
//! | 2       | Universal        | CLI usage error (bad args, missing file) |
//! | 60-69   | cluster          | Clustering run codes                     |
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

/// Usage error - bad arguments, missing required options.
/// Emitted by clap itself on parse failure.
#[allow(dead_code)]
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Cluster (60-69)
// =============================================================================

/// Config could not be parsed or failed validation.
pub const EXIT_CLUSTER_INVALID_CONFIG: u8 = 60;

/// Input could not be read or contained invalid pairs.
pub const EXIT_CLUSTER_RUNTIME: u8 = 61;

/// Config describes a single-collection (dirty) problem.
pub const EXIT_CLUSTER_UNSUPPORTED: u8 = 62;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cluster_codes_are_distinct_and_in_range() {
        let codes = [
            EXIT_CLUSTER_INVALID_CONFIG,
            EXIT_CLUSTER_RUNTIME,
            EXIT_CLUSTER_UNSUPPORTED,
        ];
        for (i, a) in codes.iter().enumerate() {
            assert!((60..70).contains(a));
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_ne!(EXIT_SUCCESS, EXIT_USAGE);
    }
}
