//! JSON Lines (JSONL) output writer.
//!
//! One conversation object per line, the layout most fine-tuning
//! loaders stream from.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::core::segmenter::Conversation;
use crate::error::Result;

/// Writes conversations to JSONL (JSON Lines) format.
///
/// Each line is a valid JSON object:
/// ```jsonl
/// {"conversations":[{"role":"user","content":"hey"},{"role":"assistant","content":"yo"}]}
/// ```
pub fn write_jsonl(conversations: &[Conversation], output_path: &Path) -> Result<()> {
    let file = File::create(output_path)?;
    let mut writer = BufWriter::new(file);

    for conversation in conversations {
        let line = serde_json::to_string(conversation)?;
        writeln!(writer, "{line}")?;
    }

    writer.flush()?;
    Ok(())
}

/// Converts conversations to a JSONL string.
pub fn to_jsonl(conversations: &[Conversation]) -> Result<String> {
    let mut out = String::new();
    for conversation in conversations {
        out.push_str(&serde_json::to_string(conversation)?);
        out.push('\n');
    }
    Ok(out)
}
