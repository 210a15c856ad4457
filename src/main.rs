use clap::Parser;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use webhook_ledger::application::ledger::EventLedger;
use webhook_ledger::domain::ports::EventStoreBox;
use webhook_ledger::error::LedgerError;
use webhook_ledger::infrastructure::in_memory::InMemoryEventStore;
use webhook_ledger::interfaces::csv::delivery_reader::{Delivery, DeliveryReader, Outcome};
use webhook_ledger::interfaces::csv::report_writer::ReportWriter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input deliveries CSV file
    input: PathBuf,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,
}

fn open_store(db_path: Option<PathBuf>) -> Result<EventStoreBox> {
    match db_path {
        #[cfg(feature = "storage-rocksdb")]
        Some(path) => {
            let store =
                webhook_ledger::infrastructure::rocksdb::RocksDbEventStore::open(path)
                    .into_diagnostic()?;
            Ok(Box::new(store))
        }
        #[cfg(not(feature = "storage-rocksdb"))]
        Some(_) => miette::bail!(
            "--db-path requires the storage-rocksdb feature; rebuild with --features storage-rocksdb"
        ),
        None => Ok(Box::new(InMemoryEventStore::new())),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let ledger = EventLedger::new(open_store(cli.db_path)?);

    let file = File::open(cli.input).into_diagnostic()?;
    let reader = DeliveryReader::new(file);
    for row in reader.deliveries() {
        let delivery = match row {
            Ok(delivery) => delivery,
            Err(e) => {
                eprintln!("Error reading delivery: {}", e);
                continue;
            }
        };

        match ledger
            .record(&delivery.event_id, &delivery.kind, delivery.payload_value())
            .await
        {
            Ok(_) => {}
            // A redelivery is acknowledged, not re-processed.
            Err(LedgerError::DuplicateEvent(id)) => {
                eprintln!("Skipping duplicate delivery of {}", id);
                continue;
            }
            Err(e) => {
                eprintln!("Error recording {}: {}", delivery.event_id, e);
                continue;
            }
        }

        if let Err(e) = drive(&ledger, &delivery).await {
            eprintln!("Error processing {}: {}", delivery.event_id, e);
        }
    }

    let events = ledger.into_results().await.into_diagnostic()?;
    let stdout = io::stdout();
    let mut writer = ReportWriter::new(stdout.lock());
    writer.write_events(&events).into_diagnostic()?;

    Ok(())
}

/// Runs one recorded delivery through its lifecycle based on the simulated
/// handler outcome.
async fn drive(ledger: &EventLedger, delivery: &Delivery) -> webhook_ledger::error::Result<()> {
    ledger.mark_processing(&delivery.event_id).await?;
    match delivery.outcome {
        Outcome::Success => {
            ledger.mark_processed(&delivery.event_id).await?;
        }
        Outcome::Failure => {
            let message = delivery.error.as_deref().unwrap_or("handler reported failure");
            ledger.mark_failed(&delivery.event_id, message).await?;
        }
    }
    Ok(())
}
