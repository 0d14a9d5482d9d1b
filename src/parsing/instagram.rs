//! Instagram export parsing utilities.
//!
//! Types and helpers for Meta's per-thread `message_N.json` files. Each file
//! lists the participants of one thread and its messages:
//!
//! ```json
//! {
//!   "participants": [{"name": "Alice"}, {"name": "gabe"}],
//!   "messages": [
//!     {"sender_name": "Alice", "timestamp_ms": 1705315800000, "content": "hey"}
//!   ]
//! }
//! ```

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::RawRecord;

static LINE_BREAKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r\n|\r|\n").expect("line break pattern is valid"));

/// Exact text Instagram uses for a like on a message.
pub const LIKED_MARKER: &str = "Liked a message";

/// Raw Instagram message structure for deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct InstagramRawMessage {
    pub sender_name: String,
    pub timestamp_ms: i64,
    #[serde(default)]
    pub content: Option<String>,
}

/// Instagram thread participant.
#[derive(Debug, Clone, Deserialize)]
pub struct InstagramParticipant {
    pub name: String,
}

/// Instagram export wrapper.
#[derive(Debug, Clone, Deserialize)]
pub struct InstagramExport {
    pub participants: Vec<InstagramParticipant>,
    pub messages: Vec<InstagramRawMessage>,
}

impl InstagramExport {
    /// Returns `true` for one-to-one threads.
    pub fn is_two_party(&self) -> bool {
        self.participants.len() == 2
    }
}

/// Decodes bytes as ISO-8859-1: every byte becomes the char with that code point.
///
/// Never fails, and keeps the byte values of the export intact so that
/// [`fix_mojibake_encoding`] can later rebuild the original UTF-8.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Fix Meta's broken encoding (Mojibake).
///
/// Meta exports UTF-8 text encoded as if it were ISO-8859-1.
/// Each UTF-8 byte is stored as a separate Unicode codepoint.
/// Example: "Привет" becomes "ÐŸÑ€Ð¸Ð²ÐµÑ‚"
///
/// Strings with a char above U+00FF, or whose bytes are not valid UTF-8,
/// were not mojibake and are returned unchanged.
pub fn fix_mojibake_encoding(s: &str) -> String {
    let bytes: Option<Vec<u8>> = s.chars().map(|c| u8::try_from(c).ok()).collect();
    bytes
        .and_then(|b| String::from_utf8(b).ok())
        .unwrap_or_else(|| s.to_string())
}

/// Returns `true` if the text is a real message rather than an event marker.
///
/// Dropped: empty text, reactions, attachments, story shares and likes.
/// Matching is case-sensitive against the export's literal English phrasing.
pub fn is_content_message(content: Option<&str>) -> bool {
    let Some(text) = content else {
        return false;
    };

    if text.is_empty() {
        return false;
    }
    if text.contains("Reacted") && text.contains("to your message") {
        return false;
    }
    if text.contains("sent an attachment.") || text.contains(" shared a story.") {
        return false;
    }
    text != LIKED_MARKER
}

/// Extracts the conversation id from an export file name.
///
/// `instagramuser_1234_abcd.json` yields `1234`. Returns `None` when the name
/// doesn't start with `prefix` or the id segment is empty.
pub fn conversation_id_from_filename<'a>(file_name: &'a str, prefix: &str) -> Option<&'a str> {
    file_name
        .strip_prefix(prefix)
        .and_then(|rest| rest.split('_').next())
        .filter(|id| !id.is_empty())
}

/// Collapses every line break to a single space and trims the result.
pub fn sanitize_field(field: &str) -> String {
    LINE_BREAKS.replace_all(field, " ").trim().to_string()
}

/// Converts an export into records for one conversation.
///
/// Messages are sorted by timestamp (stable), filtered with
/// [`is_content_message`] and sanitized. Group threads produce nothing.
pub fn export_to_records(
    export: InstagramExport,
    conversation_id: &str,
    fix_encoding: bool,
) -> Vec<RawRecord> {
    if !export.is_two_party() {
        return Vec::new();
    }

    let mut messages = export.messages;
    messages.sort_by_key(|m| m.timestamp_ms);

    messages
        .into_iter()
        .filter(|m| is_content_message(m.content.as_deref()))
        .filter_map(|m| {
            let content = m.content?;
            let (sender, content) = if fix_encoding {
                (
                    fix_mojibake_encoding(&m.sender_name),
                    fix_mojibake_encoding(&content),
                )
            } else {
                (m.sender_name, content)
            };
            Some(RawRecord::new(
                conversation_id,
                m.timestamp_ms,
                sanitize_field(&sender),
                sanitize_field(&content),
            ))
        })
        .collect()
}
