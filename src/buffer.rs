//! Sequence buffer: an original sequence plus its interval partition.

use crate::classify::Relation;
use crate::error::{BufferError, Result};
use crate::interval::Interval;
use crate::render::{ElementRender, ResultFormat};
use crate::set::IntervalSet;
use std::sync::Arc;

/// A fixed, read-only sequence partitioned into subsequences that are
/// refined as results arrive.
///
/// The element type is opaque to the partitioning logic. Rendering is
/// delegated to an [`ElementRender`] supplied by the caller.
///
/// # Example
///
/// ```
/// use seqbuf::SequenceBuffer;
/// use seqbuf::render::ResultFormat;
///
/// let mut buffer = SequenceBuffer::from_chars("ABCDEFGHIJ").unwrap();
/// buffer.submit(0, 3, "P").unwrap();
/// buffer.submit(4, 9, "Q").unwrap();
///
/// assert!(buffer.is_fully_processed());
/// assert_eq!(buffer.result_to_string(&ResultFormat::chars()), "P-Q");
/// ```
#[derive(Debug, Clone)]
pub struct SequenceBuffer<T> {
    original: Arc<[T]>,
    set: IntervalSet,
}

impl<T> SequenceBuffer<T> {
    /// Create a buffer seeded with one unprocessed interval over `elements`.
    pub fn new(elements: impl Into<Arc<[T]>>) -> Result<Self> {
        let original = elements.into();
        if original.is_empty() {
            return Err(BufferError::InvalidArgument(
                "original sequence must not be empty".to_string(),
            ));
        }
        let set = IntervalSet::seeded(original.len())?;
        Ok(Self { original, set })
    }

    /// Apply a result to `[start, end]`. See [`IntervalSet::submit`].
    #[inline]
    pub fn submit(&mut self, start: usize, end: usize, result: &str) -> Result<Relation> {
        self.set.submit(start, end, result)
    }

    /// Apply an interval's bounds and result.
    pub fn submit_interval(&mut self, interval: &Interval) -> Result<Relation> {
        self.set.submit(
            interval.start(),
            interval.end(),
            interval.result().unwrap_or(""),
        )
    }

    /// The original sequence.
    #[inline]
    pub fn original(&self) -> &[T] {
        &self.original
    }

    /// Shared handle to the original sequence for derived views.
    #[inline]
    pub fn shared_original(&self) -> Arc<[T]> {
        Arc::clone(&self.original)
    }

    /// Length of the original sequence.
    #[inline]
    pub fn len(&self) -> usize {
        self.original.len()
    }

    /// Always false: construction rejects empty sequences.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.original.is_empty()
    }

    /// The underlying interval set.
    #[inline]
    pub fn intervals(&self) -> &IntervalSet {
        &self.set
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.set.count()
    }

    #[inline]
    pub fn get_by_rank(&self, index: usize) -> Result<&Interval> {
        self.set.get_by_rank(index)
    }

    #[inline]
    pub fn index_of(&self, interval: &Interval) -> Option<usize> {
        self.set.index_of(interval)
    }

    #[inline]
    pub fn first_unprocessed(&self) -> Option<&Interval> {
        self.set.first_unprocessed()
    }

    #[inline]
    pub fn is_fully_processed(&self) -> bool {
        self.set.is_fully_processed()
    }

    /// Elements of the original sequence covered by `interval`.
    pub fn extract(&self, interval: &Interval) -> Result<&[T]> {
        if interval.end() >= self.original.len() {
            return Err(BufferError::OutOfRange {
                index: interval.end(),
                count: self.original.len(),
            });
        }
        Ok(&self.original[interval.start()..=interval.end()])
    }

    /// Render the elements covered by `interval`.
    pub fn render_interval<R>(&self, interval: &Interval, renderer: &R) -> Result<String>
    where
        R: ElementRender<T> + ?Sized,
    {
        Ok(renderer.render(self.extract(interval)?))
    }

    /// Join every interval's result, or the placeholder for unprocessed ones.
    pub fn result_to_string(&self, format: &ResultFormat) -> String {
        format.format(self.set.iter())
    }
}

impl SequenceBuffer<char> {
    /// Buffer over the characters of `text`.
    pub fn from_chars(text: &str) -> Result<Self> {
        Self::new(text.chars().collect::<Vec<_>>())
    }
}

impl SequenceBuffer<String> {
    /// Buffer over the whitespace-separated words of `text`.
    pub fn from_words(text: &str) -> Result<Self> {
        Self::new(
            text.split_whitespace()
                .map(str::to_string)
                .collect::<Vec<_>>(),
        )
    }
}
