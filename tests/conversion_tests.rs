//! End-to-end conversion tests
//!
//! Covers the whole path from a synthetic logger file to CSV on disk:
//! - Exact literal output for binary tables
//! - Column order fixed by the catalog
//! - Deleted records and the end-of-data marker
//! - Legacy text exports
//! - Failure isolation across a batch

mod common;

use common::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use transcriber::{
    convert_files, load_catalog, BatchSummary, ChannelCatalog, ConversionEvent, ConversionJob,
    PoolConfig, TranscribeError,
};

fn catalog(names: &[&str]) -> ChannelCatalog {
    names.iter().copied().collect()
}

#[test]
fn test_binary_table_literal_output() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input = write(
        temp_dir.path(),
        "2026 10 19 0000 (Float).DAT",
        &float_table(&[
            vec![1.0, 2.5, 3.0, 0.123456789],
            vec![1.1, -2.75, 3.1, 42.0],
        ]),
    );

    let job = ConversionJob::new(catalog(&["A", "B", "C", "D"]), &["D", "B"], Some(4)).unwrap();
    let outcome = job.convert_file(&input).expect("conversion should succeed");

    assert_eq!(outcome.rows_written, 2);
    assert_eq!(outcome.dropped_readings, 0);
    assert_eq!(
        outcome.output,
        temp_dir.path().join("2026 10 19 0000 (Float).csv")
    );

    let csv = fs::read_to_string(&outcome.output).unwrap();
    assert_eq!(
        csv,
        "Date,Time,B,D\n\
         10/19/2026,08:00:00,2.5,0.12345679\n\
         10/19/2026,08:00:01,-2.75,42.0\n"
    );
}

#[test]
fn test_cycle_with_unselected_middle_tag() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input = write(
        temp_dir.path(),
        "cycles.DAT",
        &float_table(&[vec![10.0, 20.0, 30.0], vec![11.0, 21.0, 31.0]]),
    );

    let job = ConversionJob::new(catalog(&["tag0", "tag1", "tag2"]), &["tag2", "tag0"], Some(3))
        .unwrap();
    let outcome = job.convert_file(&input).unwrap();

    let csv = fs::read_to_string(&outcome.output).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Date,Time,tag0,tag2",
            "10/19/2026,08:00:00,10.0,30.0",
            "10/19/2026,08:00:01,11.0,31.0",
        ]
    );
}

#[test]
fn test_deleted_record_and_end_marker() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let mut bytes = table_header(&FLOAT_FIELDS);
    bytes.extend(float_record(ACTIVE, "20261019", "08:00:00", 0, 1.0));
    bytes.extend(float_record(DELETED, "20261019", "08:00:00", 1, 999.0));
    bytes.extend(float_record(ACTIVE, "20261019", "08:00:00", 1, 2.0));
    bytes.extend(float_record(ACTIVE, "20261019", "08:00:01", 0, 3.0));
    bytes.extend(float_record(ACTIVE, "20261019", "08:00:01", 1, 4.0));
    bytes.push(END_OF_DATA);
    // Never reached: lies beyond the end-of-data marker
    bytes.extend(float_record(ACTIVE, "20261019", "08:00:02", 0, 5.0));

    let input = write(temp_dir.path(), "markers.DAT", &bytes);
    let job = ConversionJob::new(catalog(&["A", "B"]), &["A", "B"], None).unwrap();
    let outcome = job.convert_file(&input).unwrap();

    assert_eq!(outcome.rows_written, 2);
    assert_eq!(outcome.dropped_readings, 0);
    let csv = fs::read_to_string(&outcome.output).unwrap();
    assert!(!csv.contains("999"));
    assert!(!csv.contains("08:00:02"));
    assert_eq!(
        csv,
        "Date,Time,A,B\n10/19/2026,08:00:00,1.0,2.0\n10/19/2026,08:00:01,3.0,4.0\n"
    );
}

#[test]
fn test_truncated_final_cycle_is_not_written() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let mut bytes = table_header(&FLOAT_FIELDS);
    for (tag, value) in [1.0, 2.0, 3.0].iter().enumerate() {
        bytes.extend(float_record(ACTIVE, "20261019", "08:00:00", tag, *value));
    }
    bytes.extend(float_record(ACTIVE, "20261019", "08:00:01", 0, 4.0));
    bytes.extend(float_record(ACTIVE, "20261019", "08:00:01", 1, 5.0));
    // No end-of-data marker: plain end of file also terminates

    let input = write(temp_dir.path(), "short.DAT", &bytes);
    let job = ConversionJob::new(catalog(&["A", "B", "C"]), &["A", "B", "C"], None).unwrap();
    let outcome = job.convert_file(&input).unwrap();

    assert_eq!(outcome.rows_written, 1);
    assert_eq!(outcome.dropped_readings, 2);

    let csv = fs::read_to_string(&outcome.output).unwrap();
    let header_fields = csv.lines().next().unwrap().split(',').count();
    for line in csv.lines() {
        assert_eq!(line.split(',').count(), header_fields);
    }
}

#[test]
fn test_legacy_text_matches_binary_output() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let values = vec![vec![10.0, 20.5, 30.0], vec![11.0, 21.5, 31.0]];

    let binary = write(temp_dir.path(), "run_a.DAT", &float_table(&values));

    let mut text = String::from("Date,Time,TagIndex,Value,Status\n");
    for (cycle, readings) in values.iter().enumerate() {
        for (tag, value) in readings.iter().enumerate() {
            text.push_str(&format!("10/19/2026,08:00:{:02},{},{:?},U\n", cycle, tag, value));
        }
    }
    let legacy = write(temp_dir.path(), "run_b.csv", text.as_bytes());

    let output_dir = temp_dir.path().join("out");
    let job = ConversionJob::new(catalog(&["A", "B", "C"]), &["B", "C"], None)
        .unwrap()
        .with_export(transcriber::ExportOptions {
            output_dir: Some(output_dir.clone()),
        });

    let from_binary = job.convert_file(&binary).unwrap();
    let from_text = job.convert_file(&legacy).unwrap();

    assert_eq!(from_binary.output, output_dir.join("run_a.csv"));
    assert_eq!(from_text.output, output_dir.join("run_b.csv"));
    assert_eq!(
        fs::read_to_string(&from_binary.output).unwrap(),
        fs::read_to_string(&from_text.output).unwrap()
    );
}

#[test]
fn test_wrong_value_width_is_decode_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut bytes = table_header(&[("Date", b'D', 8), ("Time", b'C', 8), ("Value", b'N', 4)]);
    bytes.push(ACTIVE);
    bytes.extend_from_slice(b"2026101908:00:00");
    bytes.extend_from_slice(b"1234");
    bytes.push(END_OF_DATA);

    let input = write(temp_dir.path(), "narrow.DAT", &bytes);
    let job = ConversionJob::new(catalog(&["A"]), &["A"], None).unwrap();
    let err = job.convert_file(&input).unwrap_err();

    assert!(matches!(err, TranscribeError::RecordDecode(_)));
    assert!(!temp_dir.path().join("narrow.csv").exists());
}

#[test]
fn test_corrupted_header_does_not_stop_batch() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let table = float_table(&[vec![1.0, 2.0], vec![3.0, 4.0]]);

    let mut files: Vec<PathBuf> = (0..4)
        .map(|i| write(temp_dir.path(), &format!("good{}.DAT", i), &table))
        .collect();
    files.insert(2, write(temp_dir.path(), "corrupt.DAT", &table[..20]));

    let job = ConversionJob::new(catalog(&["A", "B"]), &["A"], None).unwrap();
    let mut completed = 0;
    let mut failed = Vec::new();
    let mut finished: Option<BatchSummary> = None;

    let summary = convert_files(&files, &job, &PoolConfig::new(2), |event| match event {
        ConversionEvent::BatchStarted { total_files } => assert_eq!(*total_files, 5),
        ConversionEvent::FileCompleted(_) => completed += 1,
        ConversionEvent::FileFailed { input, error } => {
            assert!(matches!(error, TranscribeError::MalformedHeader(_)));
            failed.push(input.clone());
        }
        ConversionEvent::BatchFinished(summary) => finished = Some(summary.clone()),
    })
    .unwrap();

    assert_eq!(completed, 4);
    assert_eq!(failed, vec![temp_dir.path().join("corrupt.DAT")]);
    assert_eq!(finished.as_ref(), Some(&summary));
    assert!(!summary.is_success());
    assert!(!temp_dir.path().join("corrupt.csv").exists());
    for i in 0..4 {
        let csv = fs::read_to_string(temp_dir.path().join(format!("good{}.csv", i))).unwrap();
        assert_eq!(
            csv,
            "Date,Time,A\n10/19/2026,08:00:00,1.0\n10/19/2026,08:00:01,3.0\n"
        );
    }
}

#[test]
fn test_catalog_from_tagname_table() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = write(
        temp_dir.path(),
        "2026 10 19 0000 (Tagname).DAT",
        &tagname_table(&["Line1\\Speed", "Line1\\Temp", "Line2\\Speed"]),
    );

    let catalog = load_catalog(&path).unwrap();
    assert_eq!(
        catalog.names(),
        &["Line1\\Speed", "Line1\\Temp", "Line2\\Speed"]
    );
}

#[test]
fn test_catalog_from_text_list() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = write(temp_dir.path(), "tags.txt", b"Flow\nPressure\n\nLevel\n");

    let catalog = load_catalog(&path).unwrap();
    assert_eq!(catalog.len(), 3);
    assert_eq!(catalog.index_of("Level"), Some(2));
}

#[test]
fn test_empty_catalog_is_configuration_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = write(temp_dir.path(), "tags.txt", b"\n\n");

    assert!(matches!(
        load_catalog(&path),
        Err(TranscribeError::Configuration(_))
    ));
}
