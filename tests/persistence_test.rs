#![cfg(feature = "storage-rocksdb")]

use serde_json::json;
use tempfile::tempdir;
use webhook_ledger::application::ledger::EventLedger;
use webhook_ledger::domain::event::EventStatus;
use webhook_ledger::error::LedgerError;
use webhook_ledger::infrastructure::rocksdb::RocksDbEventStore;

#[tokio::test]
async fn test_ledger_state_survives_restart() {
    let dir = tempdir().unwrap();

    {
        let store = RocksDbEventStore::open(dir.path()).unwrap();
        let ledger = EventLedger::new(Box::new(store));
        ledger
            .record("evt_1", "payment_succeeded", json!({"amount": "10.00"}))
            .await
            .unwrap();
        ledger.mark_processing("evt_1").await.unwrap();
        ledger.mark_failed("evt_1", "timeout").await.unwrap();
    }

    let store = RocksDbEventStore::open(dir.path()).unwrap();
    let ledger = EventLedger::new(Box::new(store));

    let event = ledger.get("evt_1").await.unwrap().unwrap();
    assert_eq!(event.status, EventStatus::Failed);
    assert_eq!(event.error_message.as_deref(), Some("timeout"));
    assert!(ledger.is_retryable("evt_1").await.unwrap());

    // Idempotency holds across restarts too.
    let duplicate = ledger.record("evt_1", "payment_succeeded", json!({})).await;
    assert!(matches!(duplicate, Err(LedgerError::DuplicateEvent(_))));
}

#[tokio::test]
async fn test_retry_continues_after_restart() {
    let dir = tempdir().unwrap();

    {
        let store = RocksDbEventStore::open(dir.path()).unwrap();
        let ledger = EventLedger::new(Box::new(store));
        ledger
            .record("evt_1", "payment_failed", json!({}))
            .await
            .unwrap();
        ledger.increment_retry("evt_1").await.unwrap();
        ledger.increment_retry("evt_1").await.unwrap();
    }

    let store = RocksDbEventStore::open(dir.path()).unwrap();
    let ledger = EventLedger::new(Box::new(store));

    let event = ledger.increment_retry("evt_1").await.unwrap();
    assert_eq!(event.retry_count, 3);
}
