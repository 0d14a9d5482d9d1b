//! JSON output writer.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::core::segmenter::Conversation;
use crate::error::Result;

/// Writes conversations to a JSON file as an indented array.
///
/// # Format
/// ```json
/// [
///   {
///     "conversations": [
///       {"role": "user", "content": "hey"},
///       {"role": "assistant", "content": "yo\nsup"}
///     ]
///   }
/// ]
/// ```
pub fn write_json(conversations: &[Conversation], output_path: &Path) -> Result<()> {
    let json = to_json(conversations)?;
    let mut file = File::create(output_path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}

/// Converts conversations to an indented JSON string.
///
/// Same format as `write_json`, but returns a String instead of writing to file.
pub fn to_json(conversations: &[Conversation]) -> Result<String> {
    Ok(serde_json::to_string_pretty(conversations)?)
}
