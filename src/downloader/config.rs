//! Download configuration constants

/// First year requested for every dataset.
pub const START_YEAR: i32 = 1995;

/// Last year requested for every dataset (inclusive).
pub const END_YEAR: i32 = 2026;

/// Total attempts per HTTP call (initial attempt plus retries).
/// Six attempts with exponential backoff recovers from transient network
/// issues and short rate-limit windows without looping forever on persistent
/// failures.
pub const MAX_ATTEMPTS: usize = 6;

/// Initial backoff delay in milliseconds.
/// 1 second is long enough for burst limits to reset but short enough to not
/// overly delay recovery from one-off transient errors.
pub const INITIAL_BACKOFF_MS: u64 = 1000;

/// Maximum backoff delay in milliseconds.
/// 30 seconds caps exponential growth so a full retry budget stays within
/// roughly a minute of waiting.
pub const MAX_BACKOFF_MS: u64 = 30_000;

/// Maximum random jitter added to each backoff delay, in milliseconds.
/// Jitter desynchronizes retry storms when several datasets hit the same
/// upstream limit at once.
pub const BACKOFF_JITTER_MS: u64 = 1000;

/// HTTP status codes that trigger a retry instead of being returned.
pub const RETRYABLE_STATUS_CODES: [u16; 5] = [429, 500, 502, 503, 504];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_status_codes() {
        for status in [429u16, 500, 502, 503, 504] {
            assert!(RETRYABLE_STATUS_CODES.contains(&status));
        }
        for status in [200u16, 400, 401, 403, 404, 501] {
            assert!(!RETRYABLE_STATUS_CODES.contains(&status));
        }
    }
}
