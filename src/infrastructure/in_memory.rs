use crate::domain::event::{EventStatus, WebhookEvent};
use crate::domain::ports::EventStore;
use crate::error::{LedgerError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory store for ledger entries.
///
/// Uses `Arc<RwLock<HashMap<String, WebhookEvent>>>` for shared concurrent
/// access. Holding the write lock across the read-check and the write makes
/// both the uniqueness check and the conditional update atomic.
#[derive(Default, Clone)]
pub struct InMemoryEventStore {
    events: Arc<RwLock<HashMap<String, WebhookEvent>>>,
}

impl InMemoryEventStore {
    /// Creates a new, empty in-memory event store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn insert(&self, event: WebhookEvent) -> Result<()> {
        let mut events = self.events.write().await;
        if events.contains_key(&event.external_event_id) {
            return Err(LedgerError::DuplicateEvent(event.external_event_id));
        }
        events.insert(event.external_event_id.clone(), event);
        Ok(())
    }

    async fn get(&self, external_event_id: &str) -> Result<Option<WebhookEvent>> {
        let events = self.events.read().await;
        Ok(events.get(external_event_id).cloned())
    }

    async fn update_if(&self, event: WebhookEvent, expected: EventStatus) -> Result<()> {
        let mut events = self.events.write().await;
        let current = events
            .get(&event.external_event_id)
            .ok_or_else(|| LedgerError::EventNotFound(event.external_event_id.clone()))?;
        if current.status != expected {
            return Err(LedgerError::StaleUpdate(event.external_event_id));
        }
        events.insert(event.external_event_id.clone(), event);
        Ok(())
    }

    async fn all_events(&self) -> Result<Vec<WebhookEvent>> {
        let events = self.events.read().await;
        let mut all: Vec<WebhookEvent> = events.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn event(id: &str) -> WebhookEvent {
        WebhookEvent::new(id, "payment_succeeded", json!({}), Utc::now())
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = InMemoryEventStore::new();
        store.insert(event("evt_1")).await.unwrap();

        let stored = store.get("evt_1").await.unwrap();
        assert!(stored.is_some(), "event should be found");
        assert_eq!(stored.unwrap().external_event_id, "evt_1");

        assert!(store.get("evt_999").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicates() {
        let store = InMemoryEventStore::new();
        store.insert(event("evt_1")).await.unwrap();

        let result = store.insert(event("evt_1")).await;
        assert!(matches!(result, Err(LedgerError::DuplicateEvent(id)) if id == "evt_1"));

        let all = store.all_events().await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn test_update_if_checks_expected_status() {
        let store = InMemoryEventStore::new();
        store.insert(event("evt_1")).await.unwrap();

        let mut updated = event("evt_1");
        updated.mark_processing(Utc::now()).unwrap();

        // Wrong prior status loses.
        let stale = store
            .update_if(updated.clone(), EventStatus::Processing)
            .await;
        assert!(matches!(stale, Err(LedgerError::StaleUpdate(_))));

        // Correct prior status wins.
        store
            .update_if(updated, EventStatus::Received)
            .await
            .unwrap();
        let stored = store.get("evt_1").await.unwrap().unwrap();
        assert_eq!(stored.status, EventStatus::Processing);
    }

    #[tokio::test]
    async fn test_all_events_sorted_by_creation() {
        let store = InMemoryEventStore::new();
        for id in ["evt_a", "evt_b", "evt_c"] {
            store.insert(event(id)).await.unwrap();
        }
        let all = store.all_events().await.unwrap();
        assert_eq!(all.len(), 3);
        assert!(all.windows(2).all(|w| w[0].created_at <= w[1].created_at));
    }
}
