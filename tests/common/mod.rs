use std::fs::File;
use std::io::Error;
use std::path::Path;

pub fn generate_deliveries_csv(path: &Path, rows: usize) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);

    wtr.write_record(["event_id", "kind", "outcome", "error", "payload"])?;

    for i in 1..=rows {
        wtr.write_record([
            &format!("evt_{i}"),
            "payment_succeeded",
            "success",
            "",
            "{\"amount\": \"10.00\"}",
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
