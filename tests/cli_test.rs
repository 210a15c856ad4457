use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

mod common;

#[test]
fn test_replay_reports_final_ledger_state() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("deliveries.csv");

    let mut wtr = csv::Writer::from_path(&input).unwrap();
    wtr.write_record(["event_id", "kind", "outcome", "error", "payload"])
        .unwrap();
    wtr.write_record([
        "evt_1",
        "payment_succeeded",
        "success",
        "",
        "{\"amount\": \"49.90\"}",
    ])
    .unwrap();
    wtr.write_record(["evt_2", "payment_failed", "failure", "card declined", ""])
        .unwrap();
    // Redelivery of evt_1: acknowledged, not reprocessed.
    wtr.write_record([
        "evt_1",
        "payment_succeeded",
        "success",
        "",
        "{\"amount\": \"49.90\"}",
    ])
    .unwrap();
    wtr.flush().unwrap();
    drop(wtr);

    let mut cmd = Command::new(cargo_bin!("webhook-ledger"));
    cmd.arg(&input);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "event_id,kind,status,retry_count,error",
        ))
        .stdout(predicate::str::contains(
            "evt_1,payment_succeeded,processed,0,",
        ))
        .stdout(predicate::str::contains(
            "evt_2,payment_failed,failed,0,card declined",
        ))
        .stderr(predicate::str::contains("Skipping duplicate delivery of evt_1"));
}

#[test]
fn test_replay_bulk_deliveries() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bulk.csv");
    common::generate_deliveries_csv(&input, 250).unwrap();

    let mut cmd = Command::new(cargo_bin!("webhook-ledger"));
    cmd.arg(&input);

    let assert = cmd.assert().success();
    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();

    // Header plus one row per delivery, all processed.
    assert_eq!(output.lines().count(), 251);
    assert_eq!(
        output
            .lines()
            .filter(|line| line.contains(",processed,"))
            .count(),
        250
    );
}

#[test]
fn test_missing_input_fails() {
    let mut cmd = Command::new(cargo_bin!("webhook-ledger"));
    cmd.arg("does_not_exist.csv");
    cmd.assert().failure();
}
