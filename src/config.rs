//! Global configuration for seqbuf runtime behavior.
//!
//! This module provides thread-safe global configuration that affects
//! how submission scripts treat rejected submissions.

use std::sync::atomic::{AtomicBool, Ordering};

/// Global flag for strict submission handling.
///
/// When enabled, a submission that matches no unprocessed subsequence
/// aborts a script run instead of being counted and skipped.
///
/// This is set once at startup and read by the script runner.
static STRICT_SUBMISSIONS: AtomicBool = AtomicBool::new(false);

/// Enable or disable strict submission handling.
///
/// # Example
///
/// ```
/// use seqbuf::config;
///
/// // Enable at startup before running any scripts
/// config::set_strict_submissions(true);
/// assert!(config::is_strict_submissions());
/// config::set_strict_submissions(false);
/// ```
#[inline]
pub fn set_strict_submissions(enabled: bool) {
    STRICT_SUBMISSIONS.store(enabled, Ordering::Release);
}

/// Check if strict submission handling is enabled.
#[inline]
pub fn is_strict_submissions() -> bool {
    STRICT_SUBMISSIONS.load(Ordering::Acquire)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_default_lenient_mode() {
        set_strict_submissions(false);
        assert!(!is_strict_submissions());
    }

    #[test]
    #[serial]
    fn test_strict_mode_toggle() {
        set_strict_submissions(true);
        assert!(is_strict_submissions());
        set_strict_submissions(false); // Reset
        assert!(!is_strict_submissions());
    }
}
