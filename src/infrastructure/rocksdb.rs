use crate::domain::event::{EventStatus, WebhookEvent};
use crate::domain::ports::EventStore;
use crate::error::{LedgerError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options};
use std::path::Path;
use std::sync::Arc;

/// Column Family for storing ledger entries.
pub const CF_EVENTS: &str = "events";

/// A persistent event store backed by RocksDB.
///
/// Entries are keyed by `external_event_id` and stored as JSON in the
/// "events" column family. `Clone` shares the underlying `Arc<DB>`, so a
/// single process sees a consistent view across clones.
#[derive(Clone)]
pub struct RocksDbEventStore {
    db: Arc<DB>,
}

impl RocksDbEventStore {
    /// Opens or creates a RocksDB instance at the specified path, ensuring
    /// the "events" column family exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_events = ColumnFamilyDescriptor::new(CF_EVENTS, Options::default());
        let db = DB::open_cf_descriptors(&opts, path, vec![cf_events])
            .map_err(|e| LedgerError::Internal(Box::new(e)))?;

        Ok(Self { db: Arc::new(db) })
    }

    fn cf(&self) -> Result<&rocksdb::ColumnFamily> {
        self.db.cf_handle(CF_EVENTS).ok_or_else(|| {
            LedgerError::Internal(Box::new(std::io::Error::other(
                "events column family not found",
            )))
        })
    }

    fn encode(event: &WebhookEvent) -> Result<Vec<u8>> {
        serde_json::to_vec(event).map_err(|e| LedgerError::Internal(Box::new(e)))
    }

    fn decode(bytes: &[u8]) -> Result<WebhookEvent> {
        serde_json::from_slice(bytes).map_err(|e| LedgerError::Internal(Box::new(e)))
    }

    fn read(&self, external_event_id: &str) -> Result<Option<WebhookEvent>> {
        let cf = self.cf()?;
        let result = self
            .db
            .get_cf(cf, external_event_id.as_bytes())
            .map_err(|e| LedgerError::Internal(Box::new(e)))?;
        match result {
            Some(bytes) => Ok(Some(Self::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    fn write(&self, event: &WebhookEvent) -> Result<()> {
        let cf = self.cf()?;
        let value = Self::encode(event)?;
        self.db
            .put_cf(cf, event.external_event_id.as_bytes(), value)
            .map_err(|e| LedgerError::Internal(Box::new(e)))?;
        Ok(())
    }
}

#[async_trait]
impl EventStore for RocksDbEventStore {
    async fn insert(&self, event: WebhookEvent) -> Result<()> {
        if self.read(&event.external_event_id)?.is_some() {
            return Err(LedgerError::DuplicateEvent(event.external_event_id));
        }
        self.write(&event)
    }

    async fn get(&self, external_event_id: &str) -> Result<Option<WebhookEvent>> {
        self.read(external_event_id)
    }

    async fn update_if(&self, event: WebhookEvent, expected: EventStatus) -> Result<()> {
        let current = self
            .read(&event.external_event_id)?
            .ok_or_else(|| LedgerError::EventNotFound(event.external_event_id.clone()))?;
        if current.status != expected {
            return Err(LedgerError::StaleUpdate(event.external_event_id));
        }
        self.write(&event)
    }

    async fn all_events(&self) -> Result<Vec<WebhookEvent>> {
        let cf = self.cf()?;
        let mut events = Vec::new();
        for item in self.db.iterator_cf(cf, rocksdb::IteratorMode::Start) {
            let (_key, value) = item.map_err(|e| LedgerError::Internal(Box::new(e)))?;
            events.push(Self::decode(&value)?);
        }
        events.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(events)
    }
}
