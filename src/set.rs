//! Ordered, ranked partition of a sequence into subsequences.
//!
//! The set maintains three invariants between operations:
//! 1. Intervals are pairwise disjoint and jointly cover `[0, len-1]`
//! 2. Intervals are sorted by start, ties broken by end
//! 3. Ranks are exactly `1..=count` in sorted order
//!
//! Every mutation builds a new backing vector and swaps it in only once
//! it is complete, so a failed submission never leaves a partial split.

use crate::classify::{find_match, Relation};
use crate::error::{BufferError, Result};
use crate::interval::Interval;
use crate::split::{splice, split};

/// An ordered interval partition over a sequence of fixed length.
#[derive(Debug, Clone)]
pub struct IntervalSet {
    intervals: Vec<Interval>,
    len: usize,
}

impl IntervalSet {
    /// Create an empty set over a sequence of `len` positions.
    ///
    /// The first submission must be an unprocessed interval spanning the
    /// whole sequence.
    pub fn new(len: usize) -> Result<Self> {
        if len == 0 {
            return Err(BufferError::InvalidArgument(
                "sequence length must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            intervals: Vec::new(),
            len,
        })
    }

    /// Create a set seeded with one unprocessed interval `[0, len-1]`.
    pub fn seeded(len: usize) -> Result<Self> {
        let mut set = Self::new(len)?;
        set.submit(0, len - 1, "")?;
        Ok(set)
    }

    /// Length of the underlying sequence.
    #[inline]
    pub fn sequence_len(&self) -> usize {
        self.len
    }

    /// Number of intervals.
    #[inline]
    pub fn count(&self) -> usize {
        self.intervals.len()
    }

    /// True before the set has been seeded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Iterate over intervals in rank order.
    pub fn iter(&self) -> impl Iterator<Item = &Interval> {
        self.intervals.iter()
    }

    /// Intervals in rank order.
    #[inline]
    pub fn as_slice(&self) -> &[Interval] {
        &self.intervals
    }

    /// Apply a result to the interval `[start, end]`.
    ///
    /// An empty `result` marks the interval unprocessed. Returns the
    /// relation that was applied. On error the set is unchanged.
    pub fn submit(&mut self, start: usize, end: usize, result: &str) -> Result<Relation> {
        if end < start {
            return Err(BufferError::InvalidArgument(format!(
                "start ({}) > end ({})",
                start, end
            )));
        }
        if end >= self.len {
            return Err(BufferError::InvalidArgument(format!(
                "end ({}) is beyond the last position ({})",
                end,
                self.len - 1
            )));
        }

        let new = Interval::new(start, end, result)?;

        if self.intervals.is_empty() {
            return self.seed(new);
        }

        let (idx, relation) = match find_match(&new, &self.intervals) {
            Some(found) => found,
            None => {
                #[cfg(feature = "tracing")]
                tracing::warn!(start, end, "submission matches no unprocessed subsequence");
                return Err(BufferError::ClassificationFailure { start, end });
            }
        };

        let pieces = split(relation, &self.intervals[idx], &new);
        let mut rebuilt = splice(&self.intervals, idx, pieces);
        rerank(&mut rebuilt);
        self.intervals = rebuilt;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            start,
            end,
            relation = relation.name(),
            count = self.intervals.len(),
            "applied submission"
        );

        debug_assert!(self.check_invariants().is_ok());
        Ok(relation)
    }

    fn seed(&mut self, new: Interval) -> Result<Relation> {
        if new.is_processed() {
            return Err(BufferError::InvalidInitialState {
                start: new.start(),
                end: new.end(),
            });
        }
        if new.start() != 0 || new.end() != self.len - 1 {
            return Err(BufferError::InvalidArgument(format!(
                "seed interval {} must span [0:{}]",
                new,
                self.len - 1
            )));
        }

        let mut rebuilt = vec![new];
        rerank(&mut rebuilt);
        self.intervals = rebuilt;
        Ok(Relation::ExactMatch)
    }

    /// Get the interval at a zero-based position in rank order.
    pub fn get_by_rank(&self, index: usize) -> Result<&Interval> {
        self.intervals.get(index).ok_or(BufferError::OutOfRange {
            index,
            count: self.intervals.len(),
        })
    }

    /// Zero-based position of the interval with the same bounds, if any.
    pub fn index_of(&self, interval: &Interval) -> Option<usize> {
        self.intervals.iter().position(|iv| iv == interval)
    }

    /// First interval in rank order without a result.
    pub fn first_unprocessed(&self) -> Option<&Interval> {
        self.intervals.iter().find(|iv| !iv.is_processed())
    }

    /// Number of intervals still waiting for a result.
    pub fn unprocessed_count(&self) -> usize {
        self.intervals.iter().filter(|iv| !iv.is_processed()).count()
    }

    /// True when every interval carries a result.
    ///
    /// An unseeded set is not considered processed.
    pub fn is_fully_processed(&self) -> bool {
        !self.intervals.is_empty() && self.intervals.iter().all(Interval::is_processed)
    }

    /// Verify coverage, ordering and ranking.
    pub fn check_invariants(&self) -> Result<()> {
        if self.intervals.is_empty() {
            return Ok(());
        }

        let mut expected_start = 0;
        for (idx, iv) in self.intervals.iter().enumerate() {
            if iv.start() != expected_start {
                return Err(BufferError::InvariantViolation(format!(
                    "interval {} at rank {} should start at {}",
                    iv,
                    idx + 1,
                    expected_start
                )));
            }
            if iv.rank() != idx + 1 {
                return Err(BufferError::InvariantViolation(format!(
                    "interval {} has rank {}, expected {}",
                    iv,
                    iv.rank(),
                    idx + 1
                )));
            }
            expected_start = iv.end() + 1;
        }

        if expected_start != self.len {
            return Err(BufferError::InvariantViolation(format!(
                "intervals cover [0:{}], sequence ends at {}",
                expected_start - 1,
                self.len - 1
            )));
        }

        Ok(())
    }
}

/// Sort by (start, end) and assign ranks `1..=count`.
fn rerank(intervals: &mut [Interval]) {
    intervals.sort_unstable();
    for (idx, iv) in intervals.iter_mut().enumerate() {
        iv.set_rank(idx + 1);
    }
}
