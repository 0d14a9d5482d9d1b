//! Shared parsing utilities for export files.

pub mod instagram;

pub use instagram::{
    InstagramExport, InstagramRawMessage, decode_latin1, fix_mojibake_encoding,
    is_content_message, sanitize_field,
};
