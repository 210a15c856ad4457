use crate::domain::event::WebhookEvent;
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

/// One row of the final ledger report.
#[derive(Debug, Serialize, PartialEq)]
pub struct ReportRow {
    pub event_id: String,
    pub kind: String,
    pub status: &'static str,
    pub retry_count: u32,
    pub error: String,
}

impl From<&WebhookEvent> for ReportRow {
    fn from(event: &WebhookEvent) -> Self {
        Self {
            event_id: event.external_event_id.clone(),
            kind: event.event_kind.clone(),
            status: event.status.as_str(),
            retry_count: event.retry_count,
            error: event.error_message.clone().unwrap_or_default(),
        }
    }
}

/// Writes the final state of the ledger as CSV.
pub struct ReportWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_events(&mut self, events: &[WebhookEvent]) -> Result<()> {
        for event in events {
            self.writer.serialize(ReportRow::from(event))?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
