//! All error types for the droidloc crate.
//!
//! Codec and lookup errors abort a run. Translation, timeout and segment
//! mismatch errors are produced per batch and recovered by the batch
//! translator, which falls back to the source text.

use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid data: {0}")]
    DataMismatch(String),

    #[error("invalid resource: {0}")]
    InvalidResource(String),

    #[error("lookup failed: {0}")]
    Lookup(String),

    #[error("translation error: {message}")]
    Translation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("segment mismatch: submitted {expected} units, backend returned {actual} segments")]
    SegmentMismatch { expected: usize, actual: usize },

    #[error("backend call timed out after {0:?}")]
    Timeout(Duration),

    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Creates a new translation error with optional source error
    pub fn translation_error(
        message: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Error::Translation {
            message: message.into(),
            source,
        }
    }

    /// Creates a new lookup error
    pub fn lookup_error(message: impl Into<String>) -> Self {
        Error::Lookup(message.into())
    }

    /// Whether the batch translator absorbs this error by falling back to source text.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::Translation { .. } | Error::SegmentMismatch { .. } | Error::Timeout(_)
        )
    }
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        let message = if value.is_timeout() {
            "request timed out".to_string()
        } else if value.is_decode() {
            "malformed response body".to_string()
        } else {
            "request failed".to_string()
        };
        Error::translation_error(message, Some(Box::new(value)))
    }
}
