use std::time::Duration;

/// Configures HTTP timeout and retry behavior.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientOptions {
    /// Per-attempt timeout in milliseconds.
    pub timeout_ms: u64,
    /// Maximum number of retries after the initial attempt.
    pub max_retries: usize,
    /// Base retry backoff in milliseconds (exponential strategy).
    pub retry_backoff_ms: u64,
    /// Upper bound for delays taken from a `Retry-After` header.
    pub max_retry_after_ms: u64,
    /// Also retry 500, 502, 503 and 504 on the computed backoff schedule.
    pub retry_server_errors: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            max_retries: 3,
            retry_backoff_ms: 1_000,
            max_retry_after_ms: 60_000,
            retry_server_errors: false,
        }
    }
}

impl ClientOptions {
    /// Delay before retry number `retry_index` (zero-based) when the server
    /// did not say how long to wait.
    pub fn backoff_delay(&self, retry_index: usize) -> Duration {
        let exp = retry_index.min(16) as u32;
        let multiplier = 1u64 << exp;
        Duration::from_millis(self.retry_backoff_ms.saturating_mul(multiplier))
    }

    pub(crate) fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub(crate) fn retry_after_cap(&self) -> Duration {
        Duration::from_millis(self.max_retry_after_ms)
    }
}
