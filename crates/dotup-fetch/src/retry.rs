use std::time::Duration;

/// Total download attempts per artifact, including the first.
pub const MAX_ATTEMPTS: u32 = 3;

/// Base delay before the first retry; doubles on each further retry.
pub(crate) const RETRY_BASE: Duration = Duration::from_millis(250);

/// Calculate the delay before a retry attempt: `base * 2^retry_count`.
///
/// ```
/// use std::time::Duration;
/// use dotup_fetch::retry_delay;
///
/// assert_eq!(retry_delay(0, Duration::from_millis(100)), Duration::from_millis(100));
/// assert_eq!(retry_delay(2, Duration::from_millis(100)), Duration::from_millis(400));
/// ```
pub fn retry_delay(retry_count: u32, base: Duration) -> Duration {
    base.saturating_mul(2_u32.saturating_pow(retry_count))
}
