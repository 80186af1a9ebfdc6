//! Relationship between a submitted interval and an existing one.
//!
//! Only unprocessed intervals are split targets. A processed interval
//! always classifies as [`Relation::NoMatch`], which freezes its bounds.

use crate::interval::Interval;
use std::fmt;

/// How a submitted interval relates to one existing unprocessed interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    /// Same bounds.
    ExactMatch,
    /// Same start, ends inside the existing interval.
    StartMatch,
    /// Same end, starts inside the existing interval.
    EndMatch,
    /// Strictly inside, touching neither boundary.
    FullEncapsulation,
    /// Partial overlap, extends beyond, disjoint, or existing is processed.
    NoMatch,
}

impl Relation {
    /// All relations that lead to a structural change.
    pub const MATCHES: [Relation; 4] = [
        Relation::ExactMatch,
        Relation::StartMatch,
        Relation::EndMatch,
        Relation::FullEncapsulation,
    ];

    #[inline]
    pub fn is_match(&self) -> bool {
        !matches!(self, Relation::NoMatch)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::ExactMatch => "exact-match",
            Self::StartMatch => "start-match",
            Self::EndMatch => "end-match",
            Self::FullEncapsulation => "full-encapsulation",
            Self::NoMatch => "no-match",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Classify `new` against `existing`.
///
/// Checks run in priority order (exact, start, end, encapsulation) so an
/// interval equal to `existing` is never reported as an encapsulation.
#[inline]
pub fn classify(new: &Interval, existing: &Interval) -> Relation {
    if existing.is_processed() {
        return Relation::NoMatch;
    }

    let (ns, ne) = (new.start(), new.end());
    let (es, ee) = (existing.start(), existing.end());

    if ns == es && ne == ee {
        Relation::ExactMatch
    } else if ns == es && ne < ee {
        Relation::StartMatch
    } else if ne == ee && ns > es {
        Relation::EndMatch
    } else if ns > es && ne < ee {
        Relation::FullEncapsulation
    } else {
        Relation::NoMatch
    }
}

/// Scan `intervals` in order and return the first match.
///
/// Returns the index of the matched interval together with its relation,
/// or `None` when every interval yields [`Relation::NoMatch`].
pub fn find_match(new: &Interval, intervals: &[Interval]) -> Option<(usize, Relation)> {
    intervals
        .iter()
        .enumerate()
        .map(|(idx, existing)| (idx, classify(new, existing)))
        .find(|(_, relation)| relation.is_match())
}
