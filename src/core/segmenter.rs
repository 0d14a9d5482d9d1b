//! Session segmentation of the record stream.
//!
//! [`Segmenter`] walks records in the exact order given and builds
//! role-tagged conversations:
//!
//! - a **split** closes the current conversation when the conversation id
//!   changes or the gap to the previous record exceeds
//!   [`conversation_gap_ms`](SegmenterConfig::conversation_gap_ms);
//! - a **merge** appends the text to the last turn when the role is unchanged
//!   and the gap is at most [`merge_gap_ms`](SegmenterConfig::merge_gap_ms);
//! - a closed conversation is emitted only if it has both a `user` and an
//!   `assistant` turn, and discarded otherwise.
//!
//! # Example
//!
//! ```
//! use convopack::RawRecord;
//! use convopack::config::SegmenterConfig;
//! use convopack::core::segmenter::{Role, segment};
//!
//! let records = vec![
//!     RawRecord::new("conv1", 0, "Alice", "hey"),
//!     RawRecord::new("conv1", 60_000, "gabe", "yo"),
//!     RawRecord::new("conv1", 120_000, "gabe", "sup"),
//! ];
//!
//! let conversations = segment(&records, &SegmenterConfig::new("gabe"));
//! assert_eq!(conversations.len(), 1);
//!
//! let turns = conversations[0].turns();
//! assert_eq!(turns[0].role, Role::User);
//! assert_eq!(turns[1].content, "yo\nsup");
//! ```
//!
//! # Preconditions
//!
//! Records of one conversation must arrive contiguously and with
//! non-decreasing timestamps. Nothing is re-sorted or re-grouped: a
//! conversation id that reappears later starts a separate conversation.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::RawRecord;
use crate::config::SegmenterConfig;

/// Speaker classification of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// One logical message, possibly merged from several records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    /// Creates a turn from a single message.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// An emitted conversation.
///
/// Serializes as `{"conversations": [{"role": ..., "content": ...}, ...]}`,
/// the shape expected by chat fine-tuning loaders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub conversations: Vec<Turn>,
}

impl Conversation {
    /// Wraps turns in emission order.
    pub fn new(turns: Vec<Turn>) -> Self {
        Self {
            conversations: turns,
        }
    }

    /// Returns the turns in order.
    pub fn turns(&self) -> &[Turn] {
        &self.conversations
    }

    /// Number of turns.
    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    /// Returns `true` if the conversation has no turns.
    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }

    /// Returns `true` if at least one turn of each role is present.
    pub fn has_both_roles(&self) -> bool {
        has_both_roles(&self.conversations)
    }
}

fn has_both_roles(turns: &[Turn]) -> bool {
    let has_user = turns.iter().any(|t| t.role == Role::User);
    let has_assistant = turns.iter().any(|t| t.role == Role::Assistant);
    has_user && has_assistant
}

/// What [`Segmenter::push`] did with one record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Decision {
    /// A conversation boundary was crossed before this record.
    pub split: bool,
    /// The record was appended to the previous turn.
    pub merged: bool,
}

/// Counters collected during segmentation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SegmentationStats {
    /// Records consumed.
    pub records: usize,
    /// Records merged into an existing turn.
    pub merges: usize,
    /// Boundaries crossed, not counting the one before the first record.
    pub splits: usize,
    /// Conversations emitted.
    pub emitted: usize,
    /// Non-empty conversations discarded for lacking a role.
    pub discarded: usize,
    /// Turns across emitted conversations.
    pub turns: usize,
}

/// Streaming state machine that turns records into conversations.
///
/// Feed records with [`push`](Self::push), then call
/// [`finish`](Self::finish) to flush the last conversation.
#[derive(Debug)]
pub struct Segmenter {
    config: SegmenterConfig,
    current: Vec<Turn>,
    last_timestamp: i64,
    last_conversation_id: Option<String>,
    last_role: Option<Role>,
    output: Vec<Conversation>,
    stats: SegmentationStats,
}

impl Segmenter {
    /// Creates a segmenter with no previous record.
    pub fn new(config: SegmenterConfig) -> Self {
        Self {
            config,
            current: Vec::new(),
            last_timestamp: 0,
            last_conversation_id: None,
            last_role: None,
            output: Vec::new(),
            stats: SegmentationStats::default(),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SegmenterConfig {
        &self.config
    }

    /// Classifies a sender by exact match against the assistant name.
    pub fn role_of(&self, sender: &str) -> Role {
        if sender == self.config.assistant_name {
            Role::Assistant
        } else {
            Role::User
        }
    }

    /// Turns accumulated for the conversation in progress.
    pub fn pending(&self) -> &[Turn] {
        &self.current
    }

    /// Conversations emitted so far.
    pub fn emitted(&self) -> &[Conversation] {
        &self.output
    }

    /// Consumes one record.
    pub fn push(&mut self, record: &RawRecord) -> Decision {
        let role = self.role_of(&record.sender);
        let time_gap = record.timestamp.saturating_sub(self.last_timestamp);
        let conversation_changed =
            self.last_conversation_id.as_deref() != Some(record.conversation_id.as_str());
        let role_changed = self.last_role != Some(role);

        let split = conversation_changed || time_gap > self.config.conversation_gap_ms;
        if split {
            if self.last_conversation_id.is_some() {
                self.stats.splits += 1;
            }
            self.flush();
        }

        let merged = !self.current.is_empty()
            && !conversation_changed
            && !role_changed
            && time_gap <= self.config.merge_gap_ms;

        match self.current.last_mut() {
            Some(last) if merged => {
                last.content.push('\n');
                last.content.push_str(&record.message);
                self.stats.merges += 1;
            }
            _ => self.current.push(Turn::new(role, record.message.clone())),
        }

        trace!(
            convo = %record.conversation_id,
            timestamp = record.timestamp,
            %role,
            time_gap,
            split,
            merged,
            "segmented record"
        );

        self.last_timestamp = record.timestamp;
        self.last_conversation_id = Some(record.conversation_id.clone());
        self.last_role = Some(role);
        self.stats.records += 1;

        Decision { split, merged }
    }

    /// Flushes the conversation in progress and returns all emitted ones.
    pub fn finish(mut self) -> (Vec<Conversation>, SegmentationStats) {
        self.flush();
        (self.output, self.stats)
    }

    /// Emits the accumulator if it holds both roles, then clears it.
    fn flush(&mut self) {
        if self.current.is_empty() {
            return;
        }

        let turns = std::mem::take(&mut self.current);
        if has_both_roles(&turns) {
            self.stats.emitted += 1;
            self.stats.turns += turns.len();
            self.output.push(Conversation::new(turns));
        } else {
            trace!(turns = turns.len(), "discarding single-role conversation");
            self.stats.discarded += 1;
        }
    }
}

/// Segments a record stream in one call.
pub fn segment<'a>(
    records: impl IntoIterator<Item = &'a RawRecord>,
    config: &SegmenterConfig,
) -> Vec<Conversation> {
    segment_with_stats(records, config).0
}

/// Segments a record stream and returns the counters as well.
pub fn segment_with_stats<'a>(
    records: impl IntoIterator<Item = &'a RawRecord>,
    config: &SegmenterConfig,
) -> (Vec<Conversation>, SegmentationStats) {
    let mut segmenter = Segmenter::new(config.clone());
    for record in records {
        segmenter.push(record);
    }
    segmenter.finish()
}
