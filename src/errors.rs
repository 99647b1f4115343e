//! Error management module.
//!
//! Malformed XML is never an error anywhere in this crate: the tokenizer
//! completes unterminated constructs to the end of the buffer and the
//! formatter emits whatever tokens it gets. The only failures that can
//! surface are resource errors from the output sink or the filesystem.

use thiserror::Error;

/// The error type used by this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error from an output sink or a file operation.
    #[error("I/O error: {0}")]
    Io(#[from] ::std::io::Error),
    /// Directory traversal failed while discovering files.
    #[error("directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
}

/// A specialized `Result` type where the error is hard-wired to
/// [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
