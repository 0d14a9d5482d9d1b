//! Unified error types for convopack.
//!
//! Both stages report failures through a single [`ConvopackError`] enum.
//! Every error is fatal for the run: there is no per-file isolation and no
//! retry, so callers usually just print the error and exit non-zero.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for convopack operations.
///
/// # Example
///
/// ```rust
/// use convopack::error::Result;
/// use convopack::RawRecord;
///
/// fn load() -> Result<Vec<RawRecord>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, ConvopackError>;

/// The error type for all convopack operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConvopackError {
    /// Reading an export or table, or writing an output file, failed.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// An export file, record table row or config file could not be decoded.
    #[error("Failed to parse {format}{}: {source}", path.as_ref().map(|p| format!(" (file: {})", p.display())).unwrap_or_default())]
    Parse {
        /// What was being read ("Instagram JSON", "record table", ...)
        format: &'static str,
        #[source]
        source: ParseErrorKind,
        /// Offending file, when reading from disk
        path: Option<PathBuf>,
    },

    /// Input is readable but structurally wrong, e.g. a table with a
    /// foreign header or an input path that is not a directory.
    #[error("Invalid {format} format: {message}")]
    InvalidFormat { format: &'static str, message: String },

    /// The segmenter configuration is unusable.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Record table writer failure.
    #[cfg(feature = "csv-output")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Conversation serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Underlying decoder error of [`ConvopackError::Parse`].
#[derive(Debug, Error)]
pub enum ParseErrorKind {
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    #[cfg(feature = "csv-output")]
    #[error("{0}")]
    Csv(#[from] csv::Error),
    #[error("{0}")]
    Other(String),
}

impl ConvopackError {
    /// Creates a parse error for an Instagram export file.
    pub fn export_parse(source: serde_json::Error, path: Option<PathBuf>) -> Self {
        ConvopackError::Parse {
            format: "Instagram JSON",
            source: ParseErrorKind::Json(source),
            path,
        }
    }

    /// Creates a parse error for the intermediate record table.
    #[cfg(feature = "csv-output")]
    pub fn table_parse(source: csv::Error, path: Option<PathBuf>) -> Self {
        ConvopackError::Parse {
            format: "record table",
            source: ParseErrorKind::Csv(source),
            path,
        }
    }

    /// Creates a parse error for a configuration file.
    pub fn config_parse(source: serde_json::Error, path: Option<PathBuf>) -> Self {
        ConvopackError::Parse {
            format: "config JSON",
            source: ParseErrorKind::Json(source),
            path,
        }
    }

    /// Creates an [`InvalidFormat`](ConvopackError::InvalidFormat) error.
    pub fn invalid_format(format: &'static str, message: impl Into<String>) -> Self {
        ConvopackError::InvalidFormat {
            format,
            message: message.into(),
        }
    }

    /// Creates an [`InvalidConfig`](ConvopackError::InvalidConfig) error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        ConvopackError::InvalidConfig {
            message: message.into(),
        }
    }

    pub fn is_io(&self) -> bool {
        matches!(self, ConvopackError::Io(_))
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, ConvopackError::Parse { .. })
    }

    pub fn is_invalid_format(&self) -> bool {
        matches!(self, ConvopackError::InvalidFormat { .. })
    }

    pub fn is_invalid_config(&self) -> bool {
        matches!(self, ConvopackError::InvalidConfig { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_table_is_io() {
        let err = ConvopackError::from(io::Error::new(io::ErrorKind::NotFound, "convo.csv"));
        assert!(err.is_io());
        assert_eq!(err.to_string(), "IO error: convo.csv");
    }

    #[test]
    fn test_export_parse_error_with_path() {
        let source = serde_json::from_str::<serde_json::Value>("{\"participants\":").unwrap_err();
        let err = ConvopackError::export_parse(
            source,
            Some(PathBuf::from("/exports/instagramuser_42_x.json")),
        );
        assert!(err.is_parse());
        assert!(
            err.to_string()
                .starts_with("Failed to parse Instagram JSON (file: /exports/instagramuser_42_x.json): ")
        );
    }

    #[test]
    fn test_pathless_parse_error_omits_file() {
        let err = ConvopackError::Parse {
            format: "record table",
            source: ParseErrorKind::Other("bad row".into()),
            path: None,
        };
        assert_eq!(err.to_string(), "Failed to parse record table: bad row");
    }

    #[test]
    fn test_invalid_config_display() {
        let err = ConvopackError::invalid_config("assistant name must not be empty");
        assert!(err.is_invalid_config());
        assert!(!err.is_parse());
        assert_eq!(
            err.to_string(),
            "Invalid configuration: assistant name must not be empty"
        );
    }

    #[test]
    fn test_wrong_input_kind() {
        let err = ConvopackError::invalid_format("export directory", "convo.csv is a file");
        assert!(err.is_invalid_format());
        assert_eq!(
            err.to_string(),
            "Invalid export directory format: convo.csv is a file"
        );
    }

    #[test]
    fn test_json_error_from() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ConvopackError = json_err.into();
        assert!(err.to_string().starts_with("JSON error"));
    }
}
