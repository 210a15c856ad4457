use crate::domain::event::WebhookEvent;
use crate::domain::ports::EventStoreBox;
use crate::domain::retry::RetryPolicy;
use crate::error::{LedgerError, Result};
use chrono::{Duration, Utc};

/// The main entry point for webhook event bookkeeping.
///
/// `EventLedger` owns the storage backend and drives each lifecycle
/// transition as a load, a pure in-memory transition, and a conditional
/// update keyed on the prior status. The conditional update is what keeps a
/// racing writer from silently clobbering an entry.
pub struct EventLedger {
    store: EventStoreBox,
    policy: RetryPolicy,
}

impl EventLedger {
    /// Creates a ledger with the default retry policy (5 retries).
    pub fn new(store: EventStoreBox) -> Self {
        Self {
            store,
            policy: RetryPolicy::default(),
        }
    }

    pub fn with_policy(store: EventStoreBox, policy: RetryPolicy) -> Self {
        Self { store, policy }
    }

    /// Records a freshly delivered event in `received` state.
    ///
    /// A second delivery of the same `external_event_id` fails with
    /// `DuplicateEvent`; callers should treat that as "already handled" and
    /// still acknowledge the provider.
    pub async fn record(
        &self,
        external_event_id: &str,
        event_kind: &str,
        raw_payload: serde_json::Value,
    ) -> Result<WebhookEvent> {
        let event = WebhookEvent::new(external_event_id, event_kind, raw_payload, Utc::now());
        self.store.insert(event.clone()).await?;
        Ok(event)
    }

    pub async fn mark_processing(&self, external_event_id: &str) -> Result<WebhookEvent> {
        let mut event = self.load(external_event_id).await?;
        let prior = event.status;
        event.mark_processing(Utc::now())?;
        self.store.update_if(event.clone(), prior).await?;
        Ok(event)
    }

    pub async fn mark_processed(&self, external_event_id: &str) -> Result<WebhookEvent> {
        let mut event = self.load(external_event_id).await?;
        let prior = event.status;
        event.mark_processed(Utc::now())?;
        self.store.update_if(event.clone(), prior).await?;
        Ok(event)
    }

    pub async fn mark_failed(
        &self,
        external_event_id: &str,
        error_message: &str,
    ) -> Result<WebhookEvent> {
        let mut event = self.load(external_event_id).await?;
        let prior = event.status;
        event.mark_failed(error_message, Utc::now())?;
        self.store.update_if(event.clone(), prior).await?;
        Ok(event)
    }

    pub async fn increment_retry(&self, external_event_id: &str) -> Result<WebhookEvent> {
        let mut event = self.load(external_event_id).await?;
        let prior = event.status;
        event.increment_retry(self.policy.max_retries, Utc::now())?;
        self.store.update_if(event.clone(), prior).await?;
        Ok(event)
    }

    pub async fn is_retryable(&self, external_event_id: &str) -> Result<bool> {
        let event = self.load(external_event_id).await?;
        Ok(self.policy.is_retryable(&event))
    }

    pub async fn processing_duration(&self, external_event_id: &str) -> Result<Option<Duration>> {
        let event = self.load(external_event_id).await?;
        Ok(event.processing_duration())
    }

    pub async fn get(&self, external_event_id: &str) -> Result<Option<WebhookEvent>> {
        self.store.get(external_event_id).await
    }

    /// Consumes the ledger and returns every recorded entry.
    pub async fn into_results(self) -> Result<Vec<WebhookEvent>> {
        self.store.all_events().await
    }

    async fn load(&self, external_event_id: &str) -> Result<WebhookEvent> {
        self.store
            .get(external_event_id)
            .await?
            .ok_or_else(|| LedgerError::EventNotFound(external_event_id.to_string()))
    }
}
