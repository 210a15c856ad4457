use super::event::{EventStatus, WebhookEvent};
use std::time::Duration;

/// Default cap on retry attempts before an entry requires manual intervention.
pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// Governs whether a ledger entry may be retried.
///
/// Eligibility is a pure function of `(status, retry_count)`; elapsed-time
/// scheduling is left to the sweep job, which combines `backoff_delay` with
/// the entry's `updated_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self { max_retries }
    }

    /// True iff the entry is in a retryable state and has retries left.
    /// `Processed` entries are never retryable.
    pub fn is_retryable(&self, event: &WebhookEvent) -> bool {
        self.status_retryable(event.status) && event.retry_count < self.max_retries
    }

    fn status_retryable(&self, status: EventStatus) -> bool {
        matches!(
            status,
            EventStatus::Received | EventStatus::Failed | EventStatus::Retrying
        )
    }

    /// Delay before the nth retry: 30s doubling per attempt, capped at 30min.
    pub fn backoff_delay(&self, retry_count: u32) -> Duration {
        const BASE_SECS: u64 = 30;
        const MAX_SECS: u64 = 30 * 60;
        let exp = retry_count.min(10);
        Duration::from_secs((BASE_SECS << exp).min(MAX_SECS))
    }
}
