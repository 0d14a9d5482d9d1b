//! Extraction stage: export directory → flat record list.
//!
//! Reads every file of an Instagram message export directory, keeps the
//! one-to-one threads and turns their real messages into [`RawRecord`]s.
//!
//! Meta writes UTF-8 text as Latin-1 escapes, so files are decoded one byte
//! per char and, unless disabled, repaired with
//! [`fix_mojibake_encoding`](crate::parsing::fix_mojibake_encoding).

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::RawRecord;
use crate::config::ExtractorConfig;
use crate::error::{ConvopackError, Result};
use crate::parsing::instagram::{
    InstagramExport, conversation_id_from_filename, decode_latin1, export_to_records,
    fix_mojibake_encoding, sanitize_field,
};

/// Counters collected while extracting a directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionStats {
    /// Export files read.
    pub files_seen: usize,
    /// Files skipped because they are not one-to-one threads.
    pub files_skipped: usize,
    /// Messages found in the kept files.
    pub messages_seen: usize,
    /// Messages dropped as empty or as event markers.
    pub messages_dropped: usize,
    /// Records emitted.
    pub records: usize,
}

/// Extractor for Instagram export directories.
///
/// # Example
///
/// ```rust,no_run
/// use convopack::extractor::Extractor;
///
/// let records = Extractor::new().extract_dir("ig-msg-raw".as_ref())?;
/// println!("{} records", records.len());
/// # Ok::<(), convopack::ConvopackError>(())
/// ```
pub struct Extractor {
    config: ExtractorConfig,
}

impl Extractor {
    /// Creates an extractor with default configuration.
    pub fn new() -> Self {
        Self {
            config: ExtractorConfig::default(),
        }
    }

    /// Creates an extractor with custom configuration.
    pub fn with_config(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// Returns the current configuration.
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extracts all records of a directory.
    pub fn extract_dir(&self, dir: &Path) -> Result<Vec<RawRecord>> {
        self.extract_dir_with_stats(dir).map(|(records, _)| records)
    }

    /// Extracts all records of a directory and reports what was kept.
    ///
    /// Files are visited in sorted path order so the output is reproducible.
    /// The first unreadable or malformed file aborts the whole extraction.
    pub fn extract_dir_with_stats(&self, dir: &Path) -> Result<(Vec<RawRecord>, ExtractionStats)> {
        if !dir.is_dir() {
            return Err(ConvopackError::invalid_format(
                "export directory",
                format!("{} is not a directory", dir.display()),
            ));
        }

        let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<_>>()?;
        paths.retain(|p| p.is_file());
        paths.sort();

        let mut stats = ExtractionStats::default();
        let mut records = Vec::new();

        for path in &paths {
            stats.files_seen += 1;
            let export = self.read_export(path)?;
            let file_name = file_name_of(path);

            if !export.is_two_party() {
                debug!(
                    file = %path.display(),
                    participants = export.participants.len(),
                    "skipping group thread"
                );
                stats.files_skipped += 1;
                continue;
            }

            stats.messages_seen += export.messages.len();
            let file_records = self.records_from_export(export, &file_name);
            stats.messages_dropped += file_records.dropped;
            debug!(
                file = %path.display(),
                records = file_records.records.len(),
                dropped = file_records.dropped,
                "extracted thread"
            );
            records.extend(file_records.records);
        }

        stats.records = records.len();
        info!(
            files = stats.files_seen,
            skipped = stats.files_skipped,
            records = stats.records,
            "extraction finished"
        );
        Ok((records, stats))
    }

    /// Extracts the records of a single export file.
    pub fn extract_file(&self, path: &Path) -> Result<Vec<RawRecord>> {
        let export = self.read_export(path)?;
        Ok(self.records_from_export(export, &file_name_of(path)).records)
    }

    /// Extracts records from already-decoded export content.
    ///
    /// `file_name` is only used to derive the conversation id.
    pub fn extract_str(&self, file_name: &str, content: &str) -> Result<Vec<RawRecord>> {
        let export: InstagramExport =
            serde_json::from_str(content).map_err(|e| ConvopackError::export_parse(e, None))?;
        Ok(self.records_from_export(export, file_name).records)
    }

    fn read_export(&self, path: &Path) -> Result<InstagramExport> {
        let bytes = fs::read(path)?;
        let content = decode_latin1(&bytes);
        serde_json::from_str(&content)
            .map_err(|e| ConvopackError::export_parse(e, Some(path.to_path_buf())))
    }

    fn records_from_export(&self, export: InstagramExport, file_name: &str) -> FileRecords {
        let conversation_id = self.conversation_id(&export, file_name);
        let total = if export.is_two_party() {
            export.messages.len()
        } else {
            0
        };
        let records = export_to_records(export, &conversation_id, self.config.fix_encoding);
        FileRecords {
            dropped: total - records.len(),
            records,
        }
    }

    /// Id from the file name when it follows the `instagramuser_<id>` scheme,
    /// otherwise the first participant's name.
    fn conversation_id(&self, export: &InstagramExport, file_name: &str) -> String {
        if let Some(id) = conversation_id_from_filename(file_name, &self.config.filename_prefix) {
            return id.to_string();
        }

        let name = export
            .participants
            .first()
            .map(|p| p.name.as_str())
            .unwrap_or_default();
        if self.config.fix_encoding {
            sanitize_field(&fix_mojibake_encoding(name))
        } else {
            sanitize_field(name)
        }
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

struct FileRecords {
    records: Vec<RawRecord>,
    dropped: usize,
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const TWO_PARTY: &str = r#"{
        "participants": [{"name": "Alice"}, {"name": "gabe"}],
        "messages": [
            {"sender_name": "gabe", "timestamp_ms": 2000, "content": "yo"},
            {"sender_name": "Alice", "timestamp_ms": 1000, "content": "hey"}
        ]
    }"#;

    const GROUP: &str = r#"{
        "participants": [{"name": "Alice"}, {"name": "gabe"}, {"name": "Carol"}],
        "messages": [
            {"sender_name": "Carol", "timestamp_ms": 1000, "content": "hi all"}
        ]
    }"#;

    #[test]
    fn test_extractor_new() {
        let extractor = Extractor::new();
        assert!(extractor.config().fix_encoding);
    }

    #[test]
    fn test_extractor_with_config() {
        let extractor = Extractor::with_config(ExtractorConfig::new().with_fix_encoding(false));
        assert!(!extractor.config().fix_encoding);
    }

    #[test]
    fn test_extract_str_uses_filename_id() {
        let records = Extractor::new()
            .extract_str("instagramuser_1234_abc.json", TWO_PARTY)
            .unwrap();
        assert_eq!(
            records,
            vec![
                RawRecord::new("1234", 1000, "Alice", "hey"),
                RawRecord::new("1234", 2000, "gabe", "yo"),
            ]
        );
    }

    #[test]
    fn test_extract_str_falls_back_to_participant_name() {
        let records = Extractor::new()
            .extract_str("message_1.json", TWO_PARTY)
            .unwrap();
        assert!(records.iter().all(|r| r.conversation_id == "Alice"));
    }

    #[test]
    fn test_extract_str_group_thread_is_empty() {
        let records = Extractor::new().extract_str("message_1.json", GROUP).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_extract_str_invalid_json() {
        let err = Extractor::new()
            .extract_str("message_1.json", "not json")
            .unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn test_extract_str_missing_participants() {
        let result = Extractor::new().extract_str("message_1.json", r#"{"messages": []}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_extract_dir_with_stats() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("instagramuser_1_a.json"), TWO_PARTY).unwrap();
        fs::write(dir.path().join("instagramuser_2_b.json"), GROUP).unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();

        let (records, stats) = Extractor::new()
            .extract_dir_with_stats(dir.path())
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(
            stats,
            ExtractionStats {
                files_seen: 2,
                files_skipped: 1,
                messages_seen: 2,
                messages_dropped: 0,
                records: 2,
            }
        );
    }

    #[test]
    fn test_extract_dir_not_a_directory() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = Extractor::new().extract_dir(file.path()).unwrap_err();
        assert!(err.is_invalid_format());
    }

    #[test]
    fn test_extract_dir_malformed_file_names_path() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("broken.json"), "{").unwrap();
        let err = Extractor::new().extract_dir(dir.path()).unwrap_err();
        assert!(err.is_parse());
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn test_extract_file_repairs_mojibake() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("instagramuser_9_x.json");
        let json = r#"{
            "participants": [{"name": "Alice"}, {"name": "gabe"}],
            "messages": [{"sender_name": "Alice", "timestamp_ms": 1, "content": "caf\u00c3\u00a9"}]
        }"#;
        fs::write(&path, json).unwrap();

        let records = Extractor::new().extract_file(&path).unwrap();
        assert_eq!(records[0].message, "café");
    }
}
