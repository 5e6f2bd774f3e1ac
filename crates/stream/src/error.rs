//! Error types for the stream crate

/// Stream-level error types
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StreamError {
    /// A fixed-size read ran past the end of the buffer
    #[error("unexpected end of stream: {expected} byte(s) requested at offset {offset}")]
    UnexpectedEof {
        /// Byte offset the failed read started at
        offset: usize,

        /// Size of the read request in bytes
        expected: usize,
    },
}

/// Result type for stream operations
pub type Result<T> = std::result::Result<T, StreamError>;
