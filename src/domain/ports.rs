use super::event::{EventStatus, WebhookEvent};
use crate::error::Result;
use async_trait::async_trait;

pub type EventStoreBox = Box<dyn EventStore>;

/// Storage port for ledger entries.
///
/// Implementations are the arbiter of the idempotency invariant: `insert`
/// must reject a second entry with the same `external_event_id`, and
/// `update_if` must be an atomic compare-and-swap on the entry's status so
/// racing writers cannot clobber each other.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Stores a new entry. Fails with `DuplicateEvent` if the id exists.
    async fn insert(&self, event: WebhookEvent) -> Result<()>;

    async fn get(&self, external_event_id: &str) -> Result<Option<WebhookEvent>>;

    /// Replaces the stored entry only if its current status equals
    /// `expected`. Fails with `StaleUpdate` on a mismatch.
    async fn update_if(&self, event: WebhookEvent, expected: EventStatus) -> Result<()>;

    async fn all_events(&self) -> Result<Vec<WebhookEvent>>;
}
