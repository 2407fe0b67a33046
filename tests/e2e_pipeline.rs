// AmfDigest - tests/e2e_pipeline.rs
//
// End-to-end tests for the acquisition → classification → emission path.
//
// These tests open real files from disk through `InputSource`, run the full
// pipeline, and compare the exact bytes written to the sink.

use amfdigest::app::pipeline;
use amfdigest::app::source::InputSource;
use amfdigest::core::emitter::FixedClock;
use amfdigest::core::model::Category;
use amfdigest::core::output::OutputFormat;
use amfdigest::util::error::{AmfDigestError, InputError};
use std::fs;
use std::path::PathBuf;

// =============================================================================
// Helpers
// =============================================================================

const NOW: &str = "2031-02-03 04:05:06";

/// Absolute path to an on-disk fixture file.
fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn run_file(path: PathBuf, format: OutputFormat) -> (amfdigest::core::model::RunSummary, String) {
    let reader = InputSource::File(path).open().expect("fixture should open");
    let (summary, out) = pipeline::run(
        reader,
        Vec::new(),
        format,
        &FixedClock(NOW.to_string()),
    )
    .expect("pipeline should succeed");
    (summary, String::from_utf8(out).unwrap())
}

// =============================================================================
// Fixture trace
// =============================================================================

/// The sample AMF trace condenses to one line per distinct consecutive event.
#[test]
fn e2e_sample_trace_text_output() {
    let (summary, out) = run_file(fixture("amf_trace_sample.log"), OutputFormat::Text);

    let expected = "\
[2024-03-05 10:11:12.000200] NGAP event | gNB/Association
[2024-03-05 10:11:12.000300] NGAP event | NG Setup
[2024-03-05 10:11:13.100100] NGAP event | Initial UE / Context Setup
[2024-03-05 10:11:13.100200] NAS event | Registration Request
[2024-03-05 10:11:13.200000] UE IMSI observed | 001010000000001
[2024-03-05 10:11:13.300000] NAS event | Authentication
[2024-03-05 10:11:13.400000] NAS event | Security Mode
[2024-03-05 10:11:13.500000] NGAP event | Initial UE / Context Setup
[2024-03-05 10:11:13.600000] NAS event | Registration Accept
[2024-03-05 10:11:13.700000] NAS event | Registration Complete
[2024-03-05 10:11:13.700100] UE state | 5GMM-REGISTERED
[2024-03-05 10:11:13.700200] UE connected
[2024-03-05 10:11:14.000000] SMF / PDU Session event
[2024-03-05 10:11:15.000000] Error/Warn | [2024-03-05 10:11:15.000000] [amf] [warning] Implicit deregistration timer started
[2024-03-05 10:11:15.000100] Error/Warn | [2024-03-05 10:11:15.000100] [amf] [error] Unexpected NAS message type 0x99
[2024-03-05 10:11:15.000200] Error/Warn | [2024-03-05 10:11:15.000200] [amf] [error] Unexpected NAS message type 0x99
";
    assert_eq!(out, expected);

    assert_eq!(summary.lines_read, 28);
    assert_eq!(summary.events_emitted, 16);
    assert_eq!(summary.events_suppressed, 6);
    assert_eq!(summary.lines_dropped(), 6);
    assert_eq!(
        summary.emitted_by_category.get(&Category::ErrorWarn),
        Some(&3)
    );
}

/// The same trace as CSV keeps the line numbers of the triggering lines.
#[test]
fn e2e_sample_trace_csv_output() {
    let (_, out) = run_file(fixture("amf_trace_sample.log"), OutputFormat::Csv);
    let mut rdr = csv::Reader::from_reader(out.as_bytes());
    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();

    assert_eq!(rows.len(), 16);
    assert_eq!(&rows[0][0], "2024-03-05 10:11:12.000200");
    assert_eq!(&rows[0][1], "ngap_event");
    assert_eq!(&rows[0][3], "2");
    assert_eq!(&rows[4][1], "identifier_observed");
    assert_eq!(&rows[4][3], "12");
    assert_eq!(
        rdr.headers().unwrap().iter().collect::<Vec<_>>(),
        vec!["timestamp", "category", "label", "line_number"]
    );
}

// =============================================================================
// Ad-hoc traces
// =============================================================================

/// Lines without a bracketed prefix get the wall-clock stamp; CRLF endings
/// do not leak into labels.
#[test]
fn e2e_crlf_file_without_timestamps() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("crlf.log");
    fs::write(
        &path,
        "IMSI 001010123456789\r\nIMSI 001010123456789\r\nRegistration Accept\r\nerror: link down \r\n",
    )
    .unwrap();

    let (summary, out) = run_file(path, OutputFormat::Text);
    assert_eq!(
        out,
        format!(
            "[{NOW}] UE IMSI observed | 001010123456789\n\
             [{NOW}] NAS event | Registration Accept\n\
             [{NOW}] Error/Warn | error: link down\n"
        )
    );
    assert_eq!(summary.events_suppressed, 1);
}

/// Old-style lone `\r` line endings still split into separate lines.
#[test]
fn e2e_lone_carriage_returns_split_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cr.log");
    fs::write(&path, "Registration Request\rUE connected\r").unwrap();

    let (summary, out) = run_file(path, OutputFormat::Text);
    assert_eq!(summary.lines_read, 2);
    assert_eq!(
        out,
        format!("[{NOW}] NAS event | Registration Request\n[{NOW}] UE connected\n")
    );
}

/// A file of pure payload noise produces no output at all.
#[test]
fn e2e_noise_only_file_is_silent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("noise.log");
    fs::write(
        &path,
        "0000: 7e 00 56 00 02 00 00 21\n0008: 01 02 03 04\n\nplain filler\n",
    )
    .unwrap();

    let (summary, out) = run_file(path, OutputFormat::Text);
    assert!(out.is_empty(), "unexpected output: {out:?}");
    assert_eq!(summary.lines_read, 4);
    assert_eq!(summary.events_classified, 0);
}

/// JSON output is one parseable object per emitted event.
#[test]
fn e2e_json_lines_output() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("json.log");
    fs::write(
        &path,
        "[2024-01-01 00:00:00.123] Registration Request sent\nSMF selected\n",
    )
    .unwrap();

    let (_, out) = run_file(path, OutputFormat::Json);
    let values: Vec<serde_json::Value> = out
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(values.len(), 2);
    assert_eq!(values[0]["timestamp"], "2024-01-01 00:00:00.123");
    assert_eq!(values[0]["category"], "nas_event");
    assert_eq!(values[1]["timestamp"], NOW);
    assert_eq!(values[1]["label"], "SMF / PDU Session event");
}

/// An unreadable input path fails fast with the path in the error.
#[test]
fn e2e_missing_input_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.log");
    let err: AmfDigestError = InputSource::File(missing.clone())
        .open()
        .err()
        .expect("opening a missing file must fail")
        .into();
    assert!(
        matches!(&err, AmfDigestError::Input(InputError::Open { path, .. }) if *path == missing),
        "unexpected error: {err:?}"
    );
    assert!(err.to_string().contains("absent.log"));
}
