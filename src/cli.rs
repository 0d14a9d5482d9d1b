//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Args`] - top-level CLI arguments
//! - [`Command`] - the `extract`, `segment` and `run` subcommands
//! - [`SegmentOptions`] - segmenter settings shared by `segment` and `run`
//! - [`OutputFormat`] - output format options

use std::path::PathBuf;

use chrono::Duration;
use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::{ExtractorConfig, INSTAGRAM_USER_PREFIX, SegmenterConfig};
use crate::error::{ConvopackError, Result};

/// Default path of the intermediate record table.
pub const DEFAULT_TABLE_PATH: &str = "convo.csv";

/// Default path of the conversation dataset.
pub const DEFAULT_OUTPUT_PATH: &str = "convo.json";

/// Turn Instagram DM exports into user/assistant conversation datasets.
#[derive(Parser, Debug, Clone)]
#[command(name = "convopack")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    convopack extract ig-msg-raw -o convo.csv
    convopack segment convo.csv --assistant \"gabe\" -o convo.json
    convopack segment convo.csv --config segmenter.json --format jsonl
    convopack run ig-msg-raw --assistant \"gabe\" --table convo.csv")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

/// Pipeline stages.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Flatten an export directory into a record table
    Extract(ExtractArgs),

    /// Segment a record table into conversations
    Segment(SegmentArgs),

    /// Extract and segment in one pass
    Run(RunArgs),
}

/// Arguments of `convopack extract`.
#[derive(clap::Args, Debug, Clone)]
pub struct ExtractArgs {
    /// Directory with one export file per conversation
    pub input: PathBuf,

    /// Path to the record table
    #[arg(short, long, default_value = DEFAULT_TABLE_PATH)]
    pub output: PathBuf,

    #[command(flatten)]
    pub extractor: ExtractorOptions,
}

/// Arguments of `convopack segment`.
#[derive(clap::Args, Debug, Clone)]
pub struct SegmentArgs {
    /// Record table produced by `extract`
    pub input: PathBuf,

    /// Path to output file
    #[arg(short, long, default_value = DEFAULT_OUTPUT_PATH)]
    pub output: PathBuf,

    #[command(flatten)]
    pub segmenter: SegmentOptions,
}

/// Arguments of `convopack run`.
#[derive(clap::Args, Debug, Clone)]
pub struct RunArgs {
    /// Directory with one export file per conversation
    pub input: PathBuf,

    /// Path to output file
    #[arg(short, long, default_value = DEFAULT_OUTPUT_PATH)]
    pub output: PathBuf,

    /// Also write the intermediate record table here
    #[arg(long, value_name = "FILE")]
    pub table: Option<PathBuf>,

    #[command(flatten)]
    pub extractor: ExtractorOptions,

    #[command(flatten)]
    pub segmenter: SegmentOptions,
}

/// Extraction settings.
#[derive(clap::Args, Debug, Clone)]
pub struct ExtractorOptions {
    /// Keep Meta's Latin-1 mojibake instead of repairing it
    #[arg(long)]
    pub no_fix_encoding: bool,

    /// File name prefix that carries the conversation id
    #[arg(long, value_name = "PREFIX", default_value = INSTAGRAM_USER_PREFIX)]
    pub filename_prefix: String,
}

impl ExtractorOptions {
    /// Builds the extractor configuration.
    pub fn to_config(&self) -> ExtractorConfig {
        ExtractorConfig::new()
            .with_fix_encoding(!self.no_fix_encoding)
            .with_filename_prefix(self.filename_prefix.clone())
    }
}

/// Segmentation settings. Flags override values from `--config`.
#[derive(clap::Args, Debug, Clone)]
pub struct SegmentOptions {
    /// Display name whose messages become assistant turns (exact match)
    #[arg(short, long, value_name = "NAME")]
    pub assistant: Option<String>,

    /// JSON file with assistant_name, conversation_gap_ms, merge_gap_ms
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Start a new conversation after this many hours of silence [default: 24]
    #[arg(long, value_name = "HOURS")]
    pub conversation_gap_hours: Option<i64>,

    /// Merge same-role messages sent within this many minutes [default: 60]
    #[arg(long, value_name = "MINUTES")]
    pub merge_gap_minutes: Option<i64>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: OutputFormat,
}

impl SegmentOptions {
    /// Resolves the segmenter configuration from the config file and flags.
    pub fn to_config(&self) -> Result<SegmenterConfig> {
        let mut config = match (&self.config, &self.assistant) {
            (Some(path), _) => SegmenterConfig::from_json_file(path)?,
            (None, Some(name)) => SegmenterConfig::new(name.clone()),
            (None, None) => {
                return Err(ConvopackError::invalid_config(
                    "either --assistant or --config is required",
                ));
            }
        };

        if let Some(name) = &self.assistant {
            config = config.with_assistant_name(name.clone());
        }
        if let Some(hours) = self.conversation_gap_hours {
            let gap = Duration::try_hours(hours).ok_or_else(|| {
                ConvopackError::invalid_config(format!("conversation gap of {hours} hours is out of range"))
            })?;
            config = config.with_conversation_gap(gap);
        }
        if let Some(minutes) = self.merge_gap_minutes {
            let gap = Duration::try_minutes(minutes).ok_or_else(|| {
                ConvopackError::invalid_config(format!("merge gap of {minutes} minutes is out of range"))
            })?;
            config = config.with_merge_gap(gap);
        }

        config.validate()?;
        Ok(config)
    }
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Indented JSON array (default)
    #[default]
    Json,

    /// JSON Lines - one conversation per line
    #[value(alias = "ndjson")]
    Jsonl,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "JSON"),
            OutputFormat::Jsonl => write!(f, "JSONL"),
        }
    }
}

// Conversion to library format type
impl From<OutputFormat> for crate::format::OutputFormat {
    fn from(format: OutputFormat) -> crate::format::OutputFormat {
        match format {
            OutputFormat::Json => crate::format::OutputFormat::Json,
            OutputFormat::Jsonl => crate::format::OutputFormat::Jsonl,
        }
    }
}
