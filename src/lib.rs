//! # Convopack
//!
//! Turn Instagram direct-message exports into `user`/`assistant`
//! conversation datasets for LLM fine-tuning or analysis.
//!
//! ## Overview
//!
//! Conversion runs in two offline stages:
//!
//! 1. **Extraction**: a directory of per-thread export files becomes a flat
//!    record table (`convo,timestamp,sender,message`). Group threads and
//!    non-content messages (reactions, attachments, story shares, likes) are
//!    dropped.
//! 2. **Segmentation**: the record table becomes conversations. Consecutive
//!    messages from the same side are merged into one turn, sessions are
//!    split on a new thread or a long silence, and sessions without both a
//!    user and an assistant turn are discarded.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use convopack::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let records = Extractor::new().extract_dir("ig-msg-raw".as_ref())?;
//!
//!     let config = SegmenterConfig::new("gabe");
//!     let (conversations, stats) = convert(&records, &config)?;
//!
//!     write_json(&conversations, "convo.json".as_ref())?;
//!     println!("{}", stats.summary());
//!     Ok(())
//! }
//! ```
//!
//! ## Segmenting records directly
//!
//! ```rust
//! use convopack::RawRecord;
//! use convopack::config::SegmenterConfig;
//! use convopack::core::Segmenter;
//!
//! let mut segmenter = Segmenter::new(SegmenterConfig::new("gabe"));
//! segmenter.push(&RawRecord::new("c1", 0, "Alice", "hey"));
//! let decision = segmenter.push(&RawRecord::new("c1", 1_000, "Alice", "you there?"));
//! assert!(decision.merged);
//! ```
//!
//! ## Module Structure
//!
//! - [`extractor`] - [`Extractor`](extractor::Extractor), export directory → records
//! - [`parsing`] - Instagram export types, encoding repair, message filters
//! - [`config`] - [`ExtractorConfig`](config::ExtractorConfig), [`SegmenterConfig`](config::SegmenterConfig)
//! - [`core`] - Segmentation and output
//!   - [`core::segmenter`] - [`Segmenter`](core::Segmenter), [`Conversation`](core::Conversation)
//!   - [`core::processor`] - [`convert`](core::convert), [`ProcessingStats`](core::ProcessingStats)
//!   - [`core::output`] - record table, JSON and JSONL writers
//! - [`format`] - output format selection
//! - [`cli`] - CLI argument types (feature `cli`)
//! - [`error`] - Unified error types ([`ConvopackError`], [`Result`])
//! - [`prelude`] - Convenient re-exports
//!
//! ## Logging
//!
//! The library logs through [`tracing`]: `info` for stage summaries,
//! `debug` for skipped threads, `trace` for every split/merge decision.
//! Install any subscriber to see them; the `convopack` binary honours
//! `RUST_LOG`.

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod extractor;
pub mod format;
pub mod parsing;
pub mod record;

// Re-export the main types at the crate root for convenience
pub use error::{ConvopackError, Result};
pub use record::RawRecord;

/// Convenient re-exports for common usage.
///
/// ```rust
/// use convopack::prelude::*;
/// ```
pub mod prelude {
    // Record type
    pub use crate::RawRecord;

    // Error types
    pub use crate::error::{ConvopackError, Result};

    // Configs
    pub use crate::config::{ExtractorConfig, SegmenterConfig};

    // Extraction
    pub use crate::extractor::{ExtractionStats, Extractor};

    // Segmentation
    pub use crate::core::segmenter::{Conversation, Role, Segmenter, Turn, segment};

    // Processing
    pub use crate::core::processor::{ProcessingStats, convert};

    // Output
    #[cfg(feature = "csv-output")]
    pub use crate::core::output::{read_records, write_records};
    pub use crate::core::output::{to_json, to_jsonl, write_json, write_jsonl};
    pub use crate::format::{OutputFormat, write_to_format};
}
