//! Output format selection for the conversation dataset.
//!
//! Library-side counterpart of the CLI `--format` flag, usable without clap.
//!
//! ```rust
//! # fn example() -> convopack::Result<()> {
//! use convopack::format::{OutputFormat, to_format_string};
//! use convopack::core::segmenter::{Conversation, Role, Turn};
//!
//! let conversations = vec![Conversation::new(vec![
//!     Turn::new(Role::User, "hey"),
//!     Turn::new(Role::Assistant, "yo"),
//! ])];
//!
//! let format = OutputFormat::from_path("convo.jsonl")?;
//! let lines = to_format_string(&conversations, format)?;
//! assert_eq!(lines.lines().count(), 1);
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::output::{to_json, to_jsonl, write_json, write_jsonl};
use crate::core::segmenter::Conversation;
use crate::error::{ConvopackError, Result};

const FORMAT_NAMES: &[&str] = &["json", "jsonl", "ndjson"];

/// How conversations are laid out on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum OutputFormat {
    /// One indented array holding every conversation.
    #[default]
    Json,
    /// One conversation object per line (NDJSON).
    Jsonl,
}

impl OutputFormat {
    /// File extension without the dot.
    ///
    /// ```rust
    /// use convopack::format::OutputFormat;
    ///
    /// assert_eq!(OutputFormat::Jsonl.extension(), "jsonl");
    /// ```
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Jsonl => "jsonl",
        }
    }

    /// Names accepted by [`FromStr`], aliases included.
    pub fn all_names() -> &'static [&'static str] {
        FORMAT_NAMES
    }

    pub fn all() -> &'static [OutputFormat] {
        &[Self::Json, Self::Jsonl]
    }

    /// Picks the format from a file extension (case-insensitive).
    pub fn from_path(path: &str) -> Result<Self> {
        let ext = Path::new(path)
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        ext.parse::<Self>().map_err(|_| {
            ConvopackError::invalid_format(
                "output",
                format!("cannot infer a format from extension '.{ext}' (use .json or .jsonl)"),
            )
        })
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Json => "JSON",
            Self::Jsonl => "JSONL",
        })
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "jsonl" | "ndjson" => Ok(Self::Jsonl),
            other => Err(format!(
                "unsupported format '{other}', expected one of: {}",
                FORMAT_NAMES.join(", ")
            )),
        }
    }
}

/// Writes conversations to `path` in the given format.
pub fn write_to_format(
    conversations: &[Conversation],
    path: &Path,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => write_json(conversations, path),
        OutputFormat::Jsonl => write_jsonl(conversations, path),
    }
}

/// Renders conversations in the given format.
pub fn to_format_string(conversations: &[Conversation], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => to_json(conversations),
        OutputFormat::Jsonl => to_jsonl(conversations),
    }
}
