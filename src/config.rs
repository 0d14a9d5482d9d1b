//! Configuration types for the extractor and the segmenter.
//!
//! This module provides plain configuration structs for library usage,
//! without any CLI framework dependencies.
//!
//! - [`ExtractorConfig`] - how Instagram export files are read
//! - [`SegmenterConfig`] - who the assistant is, and the split/merge gaps
//!
//! # Example
//!
//! ```rust
//! use chrono::Duration;
//! use convopack::config::SegmenterConfig;
//!
//! let config = SegmenterConfig::new("gabe")
//!     .with_conversation_gap(Duration::hours(12))
//!     .with_merge_gap(Duration::minutes(30));
//!
//! assert_eq!(config.conversation_gap_ms, 12 * 60 * 60 * 1000);
//! assert!(config.validate().is_ok());
//! ```

use std::fs;
use std::path::Path;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::{ConvopackError, Result};

/// File name prefix Instagram uses for one-to-one threads.
pub const INSTAGRAM_USER_PREFIX: &str = "instagramuser_";

/// Default gap after which a new conversation starts (24 hours).
pub fn default_conversation_gap_ms() -> i64 {
    Duration::hours(24).num_milliseconds()
}

/// Default gap within which same-role messages are merged (60 minutes).
pub fn default_merge_gap_ms() -> i64 {
    Duration::minutes(60).num_milliseconds()
}

/// Configuration for the extraction stage.
///
/// # Example
///
/// ```rust
/// use convopack::config::ExtractorConfig;
///
/// let config = ExtractorConfig::new().with_fix_encoding(false);
/// assert!(!config.fix_encoding);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Repair Meta's Latin-1 mojibake in names and texts (default: true)
    pub fix_encoding: bool,

    /// File name prefix that carries the conversation id
    /// (default: `instagramuser_`)
    pub filename_prefix: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            fix_encoding: true,
            filename_prefix: INSTAGRAM_USER_PREFIX.to_string(),
        }
    }
}

impl ExtractorConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables the mojibake repair.
    #[must_use]
    pub fn with_fix_encoding(mut self, enabled: bool) -> Self {
        self.fix_encoding = enabled;
        self
    }

    /// Sets the file name prefix that marks an id-bearing file name.
    #[must_use]
    pub fn with_filename_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.filename_prefix = prefix.into();
        self
    }
}

/// Configuration for the segmentation stage.
///
/// All thresholds are in milliseconds, the same unit as record timestamps.
/// A JSON config file uses the same keys; both gaps are optional there:
///
/// ```json
/// { "assistant_name": "gabe", "conversation_gap_ms": 86400000, "merge_gap_ms": 3600000 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmenterConfig {
    /// Display name whose messages get the `assistant` role (exact match).
    pub assistant_name: String,

    /// A gap strictly greater than this starts a new conversation.
    #[serde(default = "default_conversation_gap_ms")]
    pub conversation_gap_ms: i64,

    /// Same-role messages at most this far apart are merged into one turn.
    #[serde(default = "default_merge_gap_ms")]
    pub merge_gap_ms: i64,
}

impl SegmenterConfig {
    /// Creates a configuration with the default 24 h / 60 min gaps.
    pub fn new(assistant_name: impl Into<String>) -> Self {
        Self {
            assistant_name: assistant_name.into(),
            conversation_gap_ms: default_conversation_gap_ms(),
            merge_gap_ms: default_merge_gap_ms(),
        }
    }

    /// Loads a configuration from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| ConvopackError::config_parse(e, Some(path.to_path_buf())))
    }

    /// Parses a configuration from a JSON string.
    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| ConvopackError::config_parse(e, None))
    }

    /// Sets the assistant display name.
    #[must_use]
    pub fn with_assistant_name(mut self, name: impl Into<String>) -> Self {
        self.assistant_name = name.into();
        self
    }

    /// Sets the conversation split gap.
    #[must_use]
    pub fn with_conversation_gap(self, gap: Duration) -> Self {
        self.with_conversation_gap_ms(gap.num_milliseconds())
    }

    /// Sets the message merge gap.
    #[must_use]
    pub fn with_merge_gap(self, gap: Duration) -> Self {
        self.with_merge_gap_ms(gap.num_milliseconds())
    }

    /// Sets the conversation split gap in milliseconds.
    #[must_use]
    pub fn with_conversation_gap_ms(mut self, gap_ms: i64) -> Self {
        self.conversation_gap_ms = gap_ms;
        self
    }

    /// Sets the message merge gap in milliseconds.
    #[must_use]
    pub fn with_merge_gap_ms(mut self, gap_ms: i64) -> Self {
        self.merge_gap_ms = gap_ms;
        self
    }

    /// Checks that the configuration can produce meaningful output.
    pub fn validate(&self) -> Result<()> {
        if self.assistant_name.is_empty() {
            return Err(ConvopackError::invalid_config(
                "assistant name must not be empty",
            ));
        }
        if self.conversation_gap_ms < 0 || self.merge_gap_ms < 0 {
            return Err(ConvopackError::invalid_config(format!(
                "gaps must not be negative (conversation: {} ms, merge: {} ms)",
                self.conversation_gap_ms, self.merge_gap_ms
            )));
        }
        if self.merge_gap_ms > self.conversation_gap_ms {
            return Err(ConvopackError::invalid_config(format!(
                "merge gap ({} ms) exceeds conversation gap ({} ms)",
                self.merge_gap_ms, self.conversation_gap_ms
            )));
        }
        Ok(())
    }
}
