//! Error types for the DS1 crate

use d2stamp_stream::StreamError;

/// DS1-specific error types
#[derive(Debug, thiserror::Error)]
pub enum StampError {
    /// File I/O error
    #[error("file error: {0}")]
    Io(#[from] std::io::Error),

    /// Truncated input while decoding a file section
    #[error("reading {section}: {source}")]
    Read {
        /// File section the decoder was reading
        section: &'static str,
        source: StreamError,
    },

    /// Stamp or referenced entry not found
    #[error("not found: {0}")]
    NotFound(String),
}

impl StampError {
    /// Error constructor naming the section a failed read belonged to,
    /// shaped for `map_err`
    pub(crate) fn read(section: &'static str) -> impl FnOnce(StreamError) -> Self {
        move |source| Self::Read { section, source }
    }
}

/// Result type for stamp operations
pub type Result<T> = std::result::Result<T, StampError>;
