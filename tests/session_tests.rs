//! # Session Tests
//!
//! End-to-end runs of the printer session against a scripted printer.
//!
//! These tests cover the full command sequence a label print produces and the
//! cleanup guarantees around it. Nothing here needs a connected printer.

use std::time::Duration;

use labelbridge::LabelError;
use labelbridge::error::Stage;
use labelbridge::record::{self, RecordLayout};
use labelbridge::session::PrinterSession;
use labelbridge::transport::{ScriptedTransport, Transport};
use pretty_assertions::assert_eq;

/// Listing reply of a printer holding forms L0 and L5
const LISTING: &str = "002\r\nL0\r\nL5\r\n";

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn session() -> PrinterSession {
    PrinterSession::with_timeouts(Duration::from_millis(50), Duration::from_millis(20))
}

fn printer() -> ScriptedTransport {
    ScriptedTransport::new().reply("UF", LISTING)
}

fn values(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("V{:02}", i)).collect()
}

// ============================================================================
// COMMAND SEQUENCE
// ============================================================================

#[test]
fn test_end_to_end_print() {
    let mut t = printer();
    let report = session().run(&mut t, "L5", &["42", "Jane Doe"]).unwrap();

    assert!(report.form_found);
    assert_eq!(report.forms.count.as_deref(), Some("002"));
    assert_eq!(
        t.written(),
        &["UF", "FR\"L5\"", "?", "42", "Jane Doe", "P1,1"]
    );
    assert_eq!(t.flush_count(), 2);
    assert_eq!(t.close_count(), 1);
}

#[test]
fn test_one_write_per_substitution_in_order() {
    for n in [0, 1, 3, 12] {
        let mut t = printer();
        let vals = values(n);
        session().run(&mut t, "L0", &vals).unwrap();

        let written = t.written();
        let prompt = written.iter().position(|l| l == "?").unwrap();
        let print = written.iter().position(|l| l == "P1,1").unwrap();
        assert_eq!(&written[prompt + 1..print], vals.as_slice(), "n = {}", n);
    }
}

#[test]
fn test_only_one_read_per_session() {
    let mut t = printer();
    session().run(&mut t, "L5", &["1", "2", "3"]).unwrap();
    // The listing is the only response read; prompts are answered blind
    assert_eq!(t.discard_count(), 1);
}

#[test]
fn test_identical_sessions_send_identical_commands() {
    let mut first = printer();
    let mut second = printer();
    let vals = ["42", "Jane Doe"];

    session().run(&mut first, "L5", &vals).unwrap();
    session().run(&mut second, "L5", &vals).unwrap();

    assert_eq!(first.written(), second.written());
}

#[test]
fn test_lowercase_form_matches_listing() {
    let mut t = printer();
    let report = session().run(&mut t, "l5", &["42"]).unwrap();
    assert!(report.form_found);
    assert_eq!(t.written()[1], "FR\"l5\"");
}

#[test]
fn test_unknown_form_is_not_fatal() {
    let mut t = printer();
    let report = session().run(&mut t, "L7", &["42"]).unwrap();
    assert!(!report.form_found);
    assert_eq!(t.written(), &["UF", "FR\"L7\"", "?", "42", "P1,1"]);
}

#[test]
fn test_printer_silent_on_listing() {
    let mut t = ScriptedTransport::new();
    let report = session().run(&mut t, "L5", &["42"]).unwrap();
    assert!(report.forms.is_empty());
    assert!(!report.form_found);
    assert_eq!(t.close_count(), 1);
}

#[test]
fn test_stale_bytes_do_not_leak_into_listing() {
    let mut t = printer();
    t.feed(b"L5\r\n");
    let report = session().run(&mut t, "L9", &["x"]).unwrap();
    assert_eq!(report.forms.names, vec!["L0", "L5"]);
    assert!(!report.form_found);
}

// ============================================================================
// CLEANUP
// ============================================================================

#[test]
fn test_write_failure_mid_prompts_closes_once() {
    let mut t = printer().fail_on_write(4);
    let err = session().run(&mut t, "L5", &["42", "Jane Doe"]).unwrap_err();

    assert!(matches!(
        err,
        LabelError::Transport {
            stage: Stage::PromptExchange,
            ..
        }
    ));
    assert!(err.to_string().contains("printer disconnected"));
    assert!(t.is_closed());
    assert_eq!(t.close_count(), 1);
    assert_eq!(t.flush_count(), 1);
}

#[test]
fn test_every_failure_point_closes_once() {
    // UF, FR, ?, V00, V01, P1,1
    for fail_at in 0..6 {
        let mut t = printer().fail_on_write(fail_at);
        let result = session().run(&mut t, "L5", &values(2));
        assert!(result.is_err(), "write {} should fail", fail_at);
        assert_eq!(t.close_count(), 1, "write {}", fail_at);
        assert_eq!(t.written().len(), fail_at);
    }
}

#[test]
fn test_transport_unusable_after_session() {
    let mut t = printer();
    session().run(&mut t, "L5", &["42"]).unwrap();
    assert!(t.write_line("P1,1").is_err());
}

// ============================================================================
// RECORDS TO SESSION
// ============================================================================

#[test]
fn test_records_drive_sessions() {
    let csv = "L5,42,Jane Doe\nL0,7\n";
    let records = record::read_records(csv.as_bytes(), RecordLayout::Plain).unwrap();

    let mut sent = Vec::new();
    for rec in &records {
        let mut t = printer();
        session().run(&mut t, &rec.form, &rec.values).unwrap();
        sent.push(t.written().to_vec());
    }

    assert_eq!(sent[0], vec!["UF", "FR\"L5\"", "?", "42", "Jane Doe", "P1,1"]);
    assert_eq!(sent[1], vec!["UF", "FR\"L0\"", "?", "7", "P1,1"]);
}

#[test]
fn test_counted_records_drive_sessions() {
    let csv = "L5,2,42,Jane Doe\n";
    let records = record::read_records(csv.as_bytes(), RecordLayout::Counted).unwrap();

    let mut t = printer();
    session().run(&mut t, &records[0].form, &records[0].values).unwrap();
    assert_eq!(t.written(), &["UF", "FR\"L5\"", "?", "42", "Jane Doe", "P1,1"]);
}
