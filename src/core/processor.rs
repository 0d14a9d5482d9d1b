//! Conversion pipeline glue and summary statistics.

use tracing::info;

use super::segmenter::{Conversation, SegmentationStats, segment_with_stats};
use crate::RawRecord;
use crate::config::SegmenterConfig;
use crate::error::Result;

/// Statistics about one conversion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessingStats {
    /// Records read from the record table.
    pub original_count: usize,
    /// Conversations written.
    pub conversation_count: usize,
    /// Turns across written conversations.
    pub turn_count: usize,
    /// Conversations dropped for lacking a user or assistant turn.
    pub discarded_count: usize,
}

impl ProcessingStats {
    pub fn new(original_count: usize, conversation_count: usize) -> Self {
        Self {
            original_count,
            conversation_count,
            ..Self::default()
        }
    }

    /// Builds the summary from the segmenter's counters.
    pub fn from_segmentation(stats: &SegmentationStats) -> Self {
        Self {
            original_count: stats.records,
            conversation_count: stats.emitted,
            turn_count: stats.turns,
            discarded_count: stats.discarded,
        }
    }

    /// Share of records that did not become a turn of their own
    /// (merged, or dropped with a discarded conversation), in percent.
    pub fn compression_ratio(&self) -> f64 {
        if self.original_count == 0 {
            return 0.0;
        }
        (1.0 - (self.turn_count as f64 / self.original_count as f64)) * 100.0
    }

    /// One-line summary for logs and CLI output.
    pub fn summary(&self) -> String {
        format!(
            "Converted {} messages into {} conversations.",
            self.original_count, self.conversation_count
        )
    }
}

/// Segments records after validating the configuration.
pub fn convert(
    records: &[RawRecord],
    config: &SegmenterConfig,
) -> Result<(Vec<Conversation>, ProcessingStats)> {
    config.validate()?;

    let (conversations, seg_stats) = segment_with_stats(records, config);
    let stats = ProcessingStats::from_segmentation(&seg_stats);
    info!(
        records = stats.original_count,
        conversations = stats.conversation_count,
        discarded = stats.discarded_count,
        merges = seg_stats.merges,
        "segmentation finished"
    );
    Ok((conversations, stats))
}
