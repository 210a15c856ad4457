use crate::error::{LedgerError, Result};
use serde::Deserialize;
use std::io::Read;

/// Outcome of the simulated handler for one delivery row.
#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Failure,
}

/// One simulated provider delivery, as read from the replay CSV.
///
/// Columns: `event_id, kind, outcome, error, payload`. The `error` column is
/// only meaningful for `failure` rows; `payload` holds the raw event body as
/// a JSON document.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct Delivery {
    pub event_id: String,
    pub kind: String,
    pub outcome: Outcome,
    pub error: Option<String>,
    pub payload: Option<String>,
}

impl Delivery {
    /// Parses the payload column; a missing or malformed body is kept
    /// verbatim as a JSON string so the audit trail never loses data.
    pub fn payload_value(&self) -> serde_json::Value {
        match &self.payload {
            None => serde_json::Value::Null,
            Some(raw) => serde_json::from_str(raw)
                .unwrap_or_else(|_| serde_json::Value::String(raw.clone())),
        }
    }
}

/// Reads deliveries from a CSV source.
///
/// Wraps `csv::Reader` and provides an iterator over `Result<Delivery>`,
/// handling whitespace trimming and flexible record lengths automatically.
pub struct DeliveryReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> DeliveryReader<R> {
    /// Creates a new `DeliveryReader` from any `Read` source (e.g. File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes deliveries,
    /// so large replay files stream without loading into memory.
    pub fn deliveries(self) -> impl Iterator<Item = Result<Delivery>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(LedgerError::from))
    }
}
