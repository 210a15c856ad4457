use thiserror::Error;

pub type Result<T> = std::result::Result<T, LedgerError>;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("duplicate event: {0} is already recorded")]
    DuplicateEvent(String),
    #[error("illegal state transition: cannot {operation} an event in state {from}")]
    IllegalStateTransition {
        operation: &'static str,
        from: &'static str,
    },
    #[error(
        "retry limit exceeded: event {event_id} already has {retry_count} retries (max {max_retries})"
    )]
    RetryLimitExceeded {
        event_id: String,
        retry_count: u32,
        max_retries: u32,
    },
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("stale update: event {0} was modified concurrently")]
    StaleUpdate(String),
    #[error("event not found: {0}")]
    EventNotFound(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("internal error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}
