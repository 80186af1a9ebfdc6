//! seqbuf: subsequence buffer
//!
//! This library partitions a fixed sequence into contiguous subsequences
//! and refines that partition as processing results arrive, out of order
//! and at any granularity.
//!
//! # Features
//!
//! - **Ordered partition**: subsequences always cover the sequence exactly
//!   once, sorted and ranked
//! - **Safe refinement**: results only ever split unprocessed subsequences
//! - **Generic elements**: characters, words, or any element type with a
//!   caller-supplied renderer
//! - **Batch processing**: independent scripts run in parallel with Rayon
//!
//! # Example
//!
//! ```rust
//! use seqbuf::{SequenceBuffer, Relation};
//! use seqbuf::render::ResultFormat;
//!
//! let mut buffer = SequenceBuffer::from_chars("ABCDEFGHIJ").unwrap();
//!
//! assert_eq!(buffer.submit(3, 5, "R").unwrap(), Relation::FullEncapsulation);
//! assert_eq!(buffer.count(), 3);
//! assert_eq!(buffer.result_to_string(&ResultFormat::chars()), "*-R-*");
//! ```

pub mod buffer;
pub mod classify;
pub mod config;
pub mod error;
pub mod generate;
pub mod interval;
pub mod parallel;
pub mod render;
pub mod script;
pub mod set;
pub mod split;

// Re-export commonly used types
pub use buffer::SequenceBuffer;
pub use classify::{classify, Relation};
pub use error::{BufferError, Result, ScriptError};
pub use interval::Interval;
pub use set::IntervalSet;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::buffer::SequenceBuffer;
    pub use crate::classify::Relation;
    pub use crate::error::{BufferError, ScriptError};
    pub use crate::interval::Interval;
    pub use crate::render::{Concat, ElementRender, Joined, ResultFormat};
    pub use crate::script::{parse_script, ScriptReader, ScriptRecord, ScriptRunner};
    pub use crate::set::IntervalSet;
}
