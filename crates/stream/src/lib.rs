//! # d2stamp Stream Primitives
//!
//! This crate provides the byte-stream reader and bit-stream writer that the
//! DS1 codec is built on.
//!
//! ## Features
//! - Positioned little-endian reads over an in-memory buffer
//! - Truncation errors carrying the byte offset of the failed read
//! - LSB-first bit packing into a byte-aligned output buffer
//!
//! The reader never panics on short input and the writer never rejects
//! out-of-range values; both behaviors are part of the codec's contract with
//! legacy content.

pub mod error;
pub mod reader;
pub mod writer;

pub use error::{Result, StreamError};
pub use reader::StreamReader;
pub use writer::StreamWriter;
