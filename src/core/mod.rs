//! Core processing logic for convopack.
//!
//! This module contains:
//! - [`segmenter`] - The merge/split state machine that builds conversations
//! - [`processor`] - Pipeline glue and run statistics
//! - [`output`] - Record table and conversation writers
//!
//! # Quick Start
//!
//! ```rust
//! use convopack::RawRecord;
//! use convopack::config::SegmenterConfig;
//! use convopack::core::{convert, to_json};
//!
//! # fn main() -> convopack::Result<()> {
//! let records = vec![
//!     RawRecord::new("c1", 0, "Alice", "hey"),
//!     RawRecord::new("c1", 1_000, "gabe", "yo"),
//! ];
//! let (conversations, stats) = convert(&records, &SegmenterConfig::new("gabe"))?;
//! assert_eq!(stats.conversation_count, 1);
//! let json = to_json(&conversations)?;
//! # Ok(())
//! # }
//! ```

pub mod output;
pub mod processor;
pub mod segmenter;

// Re-export main types for convenience
pub use segmenter::{
    Conversation, Decision, Role, SegmentationStats, Segmenter, Turn, segment,
    segment_with_stats,
};

pub use crate::RawRecord;

#[cfg(feature = "csv-output")]
pub use output::{read_records, records_from_csv, to_records_csv, write_records};
pub use output::{to_json, to_jsonl, write_json, write_jsonl};

pub use processor::{ProcessingStats, convert};
