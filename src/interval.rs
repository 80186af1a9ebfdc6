//! Core interval type for subsequence representation.

use crate::error::{BufferError, Result};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A subsequence of the original sequence.
/// Uses 0-based, inclusive coordinates: `[start, end]`.
///
/// Equality, ordering and hashing only look at the `(start, end)` pair.
/// The result and rank never take part in identity.
#[derive(Debug, Clone)]
pub struct Interval {
    start: usize,
    end: usize,
    result: Option<String>,
    rank: usize,
}

impl Interval {
    /// Create a new interval. An empty result marks it unprocessed.
    pub fn new(start: usize, end: usize, result: impl Into<String>) -> Result<Self> {
        if start > end {
            return Err(BufferError::InvalidRange { start, end });
        }
        let mut interval = Self {
            start,
            end,
            result: None,
            rank: 0,
        };
        interval.set_result(result);
        Ok(interval)
    }

    /// Create an unprocessed interval.
    #[inline]
    pub fn unprocessed(start: usize, end: usize) -> Result<Self> {
        Self::new(start, end, String::new())
    }

    /// Get the start position.
    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    /// Get the end position (inclusive).
    #[inline]
    pub fn end(&self) -> usize {
        self.end
    }

    /// Returns the number of positions covered by the interval.
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Always false: a valid interval covers at least one position.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Get the result, if the interval has been processed.
    #[inline]
    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    /// True if the interval carries a non-empty result.
    #[inline]
    pub fn is_processed(&self) -> bool {
        self.result.is_some()
    }

    /// Replace the result. An empty string clears it.
    pub fn set_result(&mut self, result: impl Into<String>) {
        let result = result.into();
        self.result = if result.is_empty() { None } else { Some(result) };
    }

    /// 1-based position within the owning set. Zero until the interval
    /// has been placed in a set.
    #[inline]
    pub fn rank(&self) -> usize {
        self.rank
    }

    #[inline]
    pub(crate) fn set_rank(&mut self, rank: usize) {
        self.rank = rank;
    }

    /// Build an interval from bounds already known to be ordered.
    #[inline]
    pub(crate) fn from_bounds(start: usize, end: usize, result: Option<&str>) -> Self {
        debug_assert!(start <= end, "from_bounds called with {} > {}", start, end);
        Self {
            start,
            end,
            result: result.filter(|r| !r.is_empty()).map(str::to_string),
            rank: 0,
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}:{}]", self.start, self.end)
    }
}

impl PartialEq for Interval {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.end == other.end
    }
}

impl Eq for Interval {}

impl Hash for Interval {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.start.hash(state);
        self.end.hash(state);
    }
}

impl Ord for Interval {
    fn cmp(&self, other: &Self) -> Ordering {
        self.start
            .cmp(&other.start)
            .then(self.end.cmp(&other.end))
    }
}

impl PartialOrd for Interval {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
