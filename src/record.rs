//! Flat record type shared by both stages.
//!
//! A [`RawRecord`] is one surviving message from an export, already flattened
//! to the four columns of the record table: conversation id, millisecond
//! timestamp, sender display name and text.
//!
//! # Examples
//!
//! ```
//! use convopack::RawRecord;
//!
//! let rec = RawRecord::new("1234", 1_705_315_800_000, "Alice", "hey");
//! assert_eq!(rec.conversation_id(), "1234");
//! assert_eq!(rec.sender(), "Alice");
//! assert!(rec.datetime().is_some());
//! ```
//!
//! ## Serialization
//!
//! Field names on the wire follow the record table header
//! (`convo,timestamp,sender,message`):
//!
//! ```
//! use convopack::RawRecord;
//!
//! let rec = RawRecord::new("c1", 0, "Alice", "hi");
//! let json = serde_json::to_string(&rec)?;
//! assert!(json.contains(r#""convo":"c1""#));
//! # Ok::<(), serde_json::Error>(())
//! ```

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// One message row of the record table.
///
/// | Field | Column | Description |
/// |-------|--------|-------------|
/// | `conversation_id` | `convo` | Opaque id, stable across one conversation |
/// | `timestamp` | `timestamp` | Milliseconds since the Unix epoch |
/// | `sender` | `sender` | Participant display name |
/// | `message` | `message` | Text, line breaks already collapsed |
///
/// Within one `conversation_id`, records handed to the segmenter must be in
/// non-decreasing `timestamp` order. The segmenter does not re-sort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Conversation this record belongs to.
    #[serde(rename = "convo")]
    pub conversation_id: String,

    /// Send time in milliseconds since the Unix epoch.
    pub timestamp: i64,

    /// Display name of the author.
    pub sender: String,

    /// Text content.
    pub message: String,
}

impl RawRecord {
    /// Creates a new record.
    pub fn new(
        conversation_id: impl Into<String>,
        timestamp: i64,
        sender: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            timestamp,
            sender: sender.into(),
            message: message.into(),
        }
    }

    /// Returns the conversation id.
    pub fn conversation_id(&self) -> &str {
        &self.conversation_id
    }

    /// Returns the timestamp in milliseconds.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Returns the sender name.
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Returns the message text.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the timestamp as a UTC datetime, if it is in range.
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.timestamp).single()
    }
}
