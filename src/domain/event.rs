use crate::error::{LedgerError, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Processing status of a recorded webhook event.
///
/// Legal transitions: `Received -> Processing -> {Processed | Failed}`,
/// `Failed -> Retrying -> Processing`. `Processed` is terminal, and so is a
/// `Failed` entry whose retries are exhausted.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Received,
    Processing,
    Processed,
    Failed,
    Retrying,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Received => "received",
            EventStatus::Processing => "processing",
            EventStatus::Processed => "processed",
            EventStatus::Failed => "failed",
            EventStatus::Retrying => "retrying",
        }
    }
}

/// A ledger entry for one inbound payment-provider event.
///
/// The entry is created on first receipt and mutated only through the
/// transition methods below, which enforce the state machine. Timestamps are
/// passed in explicitly so transitions stay pure and testable.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct WebhookEvent {
    /// Upstream-assigned identifier, unique across all entries.
    pub external_event_id: String,
    /// Semantic type of the event, e.g. "payment_succeeded".
    pub event_kind: String,
    pub status: EventStatus,
    /// Number of retries attempted so far. Never decreases.
    pub retry_count: u32,
    /// Set when the entry fails; always non-empty in that case.
    pub error_message: Option<String>,
    /// Verbatim event body, retained for replay and audit.
    pub raw_payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
    /// Set when the entry first enters processing, overwritten on completion.
    pub processed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl WebhookEvent {
    pub fn new(
        external_event_id: impl Into<String>,
        event_kind: impl Into<String>,
        raw_payload: serde_json::Value,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            external_event_id: external_event_id.into(),
            event_kind: event_kind.into(),
            status: EventStatus::Received,
            retry_count: 0,
            error_message: None,
            raw_payload,
            created_at: now,
            processed_at: None,
            updated_at: now,
        }
    }

    /// `Received | Retrying -> Processing`. Records `processed_at` on the
    /// first entry only, so a duration exists even for entries that later fail.
    pub fn mark_processing(&mut self, now: DateTime<Utc>) -> Result<()> {
        match self.status {
            EventStatus::Received | EventStatus::Retrying => {
                self.status = EventStatus::Processing;
                if self.processed_at.is_none() {
                    self.processed_at = Some(now);
                }
                self.updated_at = now;
                Ok(())
            }
            from => Err(LedgerError::IllegalStateTransition {
                operation: "mark_processing",
                from: from.as_str(),
            }),
        }
    }

    /// `Processing -> Processed`. Terminal.
    pub fn mark_processed(&mut self, now: DateTime<Utc>) -> Result<()> {
        match self.status {
            EventStatus::Processing => {
                self.status = EventStatus::Processed;
                self.processed_at = Some(now);
                self.updated_at = now;
                Ok(())
            }
            from => Err(LedgerError::IllegalStateTransition {
                operation: "mark_processed",
                from: from.as_str(),
            }),
        }
    }

    /// `Processing -> Failed`. The error message must be non-empty.
    pub fn mark_failed(&mut self, error_message: impl Into<String>, now: DateTime<Utc>) -> Result<()> {
        let error_message = error_message.into();
        if error_message.is_empty() {
            return Err(LedgerError::Validation(
                "failed events require a non-empty error message".to_string(),
            ));
        }
        match self.status {
            EventStatus::Processing => {
                self.status = EventStatus::Failed;
                self.error_message = Some(error_message);
                self.processed_at = Some(now);
                self.updated_at = now;
                Ok(())
            }
            from => Err(LedgerError::IllegalStateTransition {
                operation: "mark_failed",
                from: from.as_str(),
            }),
        }
    }

    /// `Received | Failed | Retrying -> Retrying`, incrementing the retry
    /// counter. A sweep may re-arm an entry it already marked retrying, so
    /// repeated failed attempts keep counting. Raises `RetryLimitExceeded`
    /// once the counter has reached `max_retries`.
    pub fn increment_retry(&mut self, max_retries: u32, now: DateTime<Utc>) -> Result<()> {
        match self.status {
            EventStatus::Received | EventStatus::Failed | EventStatus::Retrying => {
                if self.retry_count >= max_retries {
                    return Err(LedgerError::RetryLimitExceeded {
                        event_id: self.external_event_id.clone(),
                        retry_count: self.retry_count,
                        max_retries,
                    });
                }
                self.status = EventStatus::Retrying;
                self.retry_count += 1;
                self.updated_at = now;
                Ok(())
            }
            from => Err(LedgerError::IllegalStateTransition {
                operation: "increment_retry",
                from: from.as_str(),
            }),
        }
    }

    /// Elapsed time between creation and the latest processing timestamp.
    pub fn processing_duration(&self) -> Option<Duration> {
        self.processed_at.map(|at| at - self.created_at)
    }
}
