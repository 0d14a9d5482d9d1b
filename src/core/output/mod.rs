//! Readers and writers for the files on both sides of the segmenter.
//!
//! - [`write_records`] / [`read_records`] - the intermediate record table
//!   (`convo,timestamp,sender,message`) - requires `csv-output` feature
//! - [`write_json`] / [`to_json`] - indented JSON array of conversations
//! - [`write_jsonl`] / [`to_jsonl`] - one conversation per line
//!
//! # Example
//!
//! ```rust,no_run
//! # fn main() -> convopack::Result<()> {
//! use convopack::core::output::{to_json, write_jsonl};
//! use convopack::core::segmenter::{Conversation, Role, Turn};
//!
//! let conversations = vec![Conversation::new(vec![
//!     Turn::new(Role::User, "hey"),
//!     Turn::new(Role::Assistant, "yo"),
//! ])];
//!
//! let json = to_json(&conversations)?;
//! write_jsonl(&conversations, "convo.jsonl".as_ref())?;
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "csv-output")]
mod csv_writer;
mod json_writer;
mod jsonl_writer;

#[cfg(feature = "csv-output")]
pub use csv_writer::{
    RECORD_TABLE_HEADER, read_records, records_from_csv, to_records_csv, write_records,
};
pub use json_writer::{to_json, write_json};
pub use jsonl_writer::{to_jsonl, write_jsonl};
