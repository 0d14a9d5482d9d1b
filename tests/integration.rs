//! Integration tests for the extract → record table → segment pipeline.

use std::fs;
use std::path::Path;

use convopack::config::ExtractorConfig;
use convopack::core::{read_records, records_from_csv, to_records_csv, write_records};
use convopack::prelude::*;
use tempfile::{TempDir, tempdir};

const ASSISTANT: &str = "gabe chantayan";

/// Writes an export directory with a mix of one-to-one and group threads.
fn setup_exports() -> TempDir {
    let dir = tempdir().expect("Failed to create temp dir");

    // One-to-one thread, messages stored newest-first, with event markers.
    let alice = r#"{
  "participants": [{"name": "Alice"}, {"name": "gabe chantayan"}],
  "messages": [
    {"sender_name": "gabe chantayan", "timestamp_ms": 1705315920000, "content": "sup"},
    {"sender_name": "gabe chantayan", "timestamp_ms": 1705315860000, "content": "yo"},
    {"sender_name": "Alice", "timestamp_ms": 1705315850000, "content": "Liked a message"},
    {"sender_name": "Alice", "timestamp_ms": 1705315840000, "content": "Reacted \u00e2\u009d\u00a4 to your message "},
    {"sender_name": "Alice", "timestamp_ms": 1705315830000, "content": "Alice sent an attachment."},
    {"sender_name": "Alice", "timestamp_ms": 1705315820000},
    {"sender_name": "Alice", "timestamp_ms": 1705315800000, "content": "hey"}
  ],
  "title": "Alice",
  "thread_path": "inbox/alice_1"
}"#;
    fs::write(dir.path().join("instagramuser_1001_alice.json"), alice).unwrap();

    // Group thread: must be skipped entirely.
    let group = r#"{
  "participants": [{"name": "Alice"}, {"name": "Bob"}, {"name": "gabe chantayan"}],
  "messages": [
    {"sender_name": "Bob", "timestamp_ms": 1705315800000, "content": "group hello"},
    {"sender_name": "gabe chantayan", "timestamp_ms": 1705315860000, "content": "group reply"}
  ]
}"#;
    fs::write(dir.path().join("instagramuser_1002_group.json"), group).unwrap();

    // One-to-one thread named by participant, with a story share and a day-long gap.
    let bob = r#"{
  "participants": [{"name": "Bob"}, {"name": "gabe chantayan"}],
  "messages": [
    {"sender_name": "Bob", "timestamp_ms": 1705000000000, "content": "you around?"},
    {"sender_name": "gabe chantayan", "timestamp_ms": 1705000060000, "content": "yep"},
    {"sender_name": "Bob", "timestamp_ms": 1705000120000, "content": "Bob shared a story."},
    {"sender_name": "Bob", "timestamp_ms": 1705200000000, "content": "hello again\nanyone?"}
  ]
}"#;
    fs::write(dir.path().join("message_1.json"), bob).unwrap();

    dir
}

fn extract(dir: &Path) -> Vec<RawRecord> {
    Extractor::new().extract_dir(dir).expect("extraction failed")
}

// =========================================================================
// Extraction
// =========================================================================

#[test]
fn test_extract_filters_and_orders() {
    let exports = setup_exports();
    let (records, stats) = Extractor::new()
        .extract_dir_with_stats(exports.path())
        .unwrap();

    assert_eq!(stats.files_seen, 3);
    assert_eq!(stats.files_skipped, 1);
    assert_eq!(stats.messages_seen, 11);
    assert_eq!(stats.messages_dropped, 5);
    assert_eq!(stats.records, 6);

    let alice: Vec<&RawRecord> = records
        .iter()
        .filter(|r| r.conversation_id == "1001")
        .collect();
    let texts: Vec<&str> = alice.iter().map(|r| r.message.as_str()).collect();
    assert_eq!(texts, vec!["hey", "yo", "sup"]);
    assert!(alice.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
}

#[test]
fn test_extract_skips_group_threads() {
    let exports = setup_exports();
    let records = extract(exports.path());
    assert!(!records.iter().any(|r| r.message.starts_with("group")));
    assert!(!records.iter().any(|r| r.conversation_id == "1002"));
}

#[test]
fn test_extract_falls_back_to_participant_name() {
    let exports = setup_exports();
    let records = extract(exports.path());
    let bob: Vec<&RawRecord> = records
        .iter()
        .filter(|r| r.conversation_id == "Bob")
        .collect();
    assert_eq!(bob.len(), 3);
    assert_eq!(bob[2].message, "hello again anyone?");
}

#[test]
fn test_extract_is_reproducible() {
    let exports = setup_exports();
    assert_eq!(extract(exports.path()), extract(exports.path()));
}

#[test]
fn test_extract_keeps_mojibake_when_disabled() {
    let dir = tempdir().unwrap();
    // "Привет" as Meta writes it: each UTF-8 byte escaped as a Latin-1 char.
    let json = r#"{
  "participants": [{"name": "Alice"}, {"name": "gabe"}],
  "messages": [{"sender_name": "Alice", "timestamp_ms": 1, "content": "\u00d0\u009f\u00d1\u0080\u00d0\u00b8\u00d0\u00b2\u00d0\u00b5\u00d1\u0082"}]
}"#;
    fs::write(dir.path().join("instagramuser_7_x.json"), json).unwrap();

    let fixed = Extractor::new().extract_dir(dir.path()).unwrap();
    assert_eq!(fixed[0].message, "Привет");

    let raw = Extractor::with_config(ExtractorConfig::new().with_fix_encoding(false))
        .extract_dir(dir.path())
        .unwrap();
    assert_ne!(raw[0].message, "Привет");
    assert_eq!(raw[0].message.chars().count(), 12);
}

// =========================================================================
// Record table
// =========================================================================

#[test]
fn test_record_table_roundtrip_file() {
    let exports = setup_exports();
    let records = extract(exports.path());

    let out = tempdir().unwrap();
    let table = out.path().join("convo.csv");
    write_records(&records, &table).unwrap();

    let content = fs::read_to_string(&table).unwrap();
    assert!(content.starts_with("convo,timestamp,sender,message\n"));
    assert!(content.contains("1001,1705315800000,\"Alice\",\"hey\""));

    assert_eq!(read_records(&table).unwrap(), records);
}

#[test]
fn test_record_table_string_roundtrip() {
    let records = vec![
        RawRecord::new("Bob", 1, "Bob", "a \"quoted\", comma"),
        RawRecord::new("Bob", 2, ASSISTANT, "ok"),
    ];
    let csv = to_records_csv(&records).unwrap();
    assert_eq!(records_from_csv(&csv).unwrap(), records);
}

// =========================================================================
// Full pipeline
// =========================================================================

#[test]
fn test_full_pipeline() {
    let exports = setup_exports();
    let records = extract(exports.path());
    let (conversations, stats) = convert(&records, &SegmenterConfig::new(ASSISTANT)).unwrap();

    // Bob's thread: first session answered, second (after >24h) unanswered.
    // Alice's thread: hey / yo+sup.
    assert_eq!(conversations.len(), 2);
    assert_eq!(stats.original_count, 6);
    assert_eq!(stats.discarded_count, 1);

    let alice = conversations
        .iter()
        .find(|c| c.turns()[0].content == "hey")
        .expect("alice conversation");
    assert_eq!(
        alice.turns(),
        &[
            Turn::new(Role::User, "hey"),
            Turn::new(Role::Assistant, "yo\nsup"),
        ]
    );
}

#[test]
fn test_file_handoff_matches_in_memory() {
    let exports = setup_exports();
    let records = extract(exports.path());
    let config = SegmenterConfig::new(ASSISTANT);

    let out = tempdir().unwrap();
    let table = out.path().join("convo.csv");
    write_records(&records, &table).unwrap();
    let from_file = segment(&read_records(&table).unwrap(), &config);

    assert_eq!(from_file, segment(&records, &config));
}

#[test]
fn test_write_json_output_shape() {
    let exports = setup_exports();
    let records = extract(exports.path());
    let (conversations, _) = convert(&records, &SegmenterConfig::new(ASSISTANT)).unwrap();

    let out = tempdir().unwrap();
    let path = out.path().join("convo.json");
    write_to_format(&conversations, &path, OutputFormat::Json).unwrap();

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let array = value.as_array().unwrap();
    assert_eq!(array.len(), 2);
    for convo in array {
        let turns = convo["conversations"].as_array().unwrap();
        assert!(turns.iter().all(|t| t["role"] == "user" || t["role"] == "assistant"));
        assert!(turns.iter().all(|t| t["content"].is_string()));
    }
}

#[test]
fn test_missing_directory_is_error() {
    let err = Extractor::new()
        .extract_dir(Path::new("/nonexistent/ig-msg-raw"))
        .unwrap_err();
    assert!(err.is_invalid_format());
}
