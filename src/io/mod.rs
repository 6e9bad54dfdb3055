//! Input Sources
//!
//! Abstracts over where shell source text comes from: a file, an in-memory
//! string, or standard input drained into a seekable buffer.

pub mod source;

pub use source::InputSource;
