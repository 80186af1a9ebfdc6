//! Error types for buffer operations and submission scripts.

use std::io;
use thiserror::Error;

/// Errors that can occur while refining a buffer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid range: start ({start}) > end ({end})")]
    InvalidRange { start: usize, end: usize },

    #[error("Index {index} is out of bounds for {count} subsequences")]
    OutOfRange { index: usize, count: usize },

    /// The submission matched no unprocessed interval. The buffer is unchanged.
    #[error("Submission [{start}:{end}] matches no unprocessed subsequence")]
    ClassificationFailure { start: usize, end: usize },

    #[error("Cannot seed an empty buffer with processed interval [{start}:{end}]")]
    InvalidInitialState { start: usize, end: usize },

    #[error("Invariant violated: {0}")]
    InvariantViolation(String),
}

impl BufferError {
    /// True for errors that leave the buffer usable and only report that
    /// the submission had no effect.
    #[inline]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, BufferError::ClassificationFailure { .. })
    }
}

pub type Result<T> = std::result::Result<T, BufferError>;

/// Errors that can occur while reading or applying a submission script.
#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// A submission read from the script was rejected by the buffer.
    #[error("Submission at line {line} failed: {source}")]
    Buffer {
        line: usize,
        #[source]
        source: BufferError,
    },

    /// A buffer error raised before any script line was applied.
    #[error(transparent)]
    Setup(#[from] BufferError),
}
