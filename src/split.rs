//! Splitting an unprocessed interval around a submitted result.
//!
//! The splitter is pure: it computes the pieces that replace the matched
//! interval and leaves splicing them into the set to the caller.

use crate::classify::Relation;
use crate::interval::Interval;

/// Compute the intervals that replace `existing` once `new` is applied.
///
/// The processed piece always takes the bounds of `new` and its result.
/// Remainders are unprocessed and only emitted when non-empty. Pieces are
/// returned in ascending order.
///
/// [`Relation::NoMatch`] produces no pieces; callers never apply it.
pub fn split(relation: Relation, existing: &Interval, new: &Interval) -> Vec<Interval> {
    let (es, ee) = (existing.start(), existing.end());
    let (ns, ne) = (new.start(), new.end());
    let result = new.result();

    match relation {
        Relation::ExactMatch => vec![Interval::from_bounds(es, ee, result)],
        Relation::StartMatch => {
            let mut pieces = Vec::with_capacity(2);
            pieces.push(Interval::from_bounds(es, ne, result));
            if ne < ee {
                pieces.push(Interval::from_bounds(ne + 1, ee, None));
            }
            pieces
        }
        Relation::EndMatch => {
            let mut pieces = Vec::with_capacity(2);
            if es < ns {
                pieces.push(Interval::from_bounds(es, ns - 1, None));
            }
            pieces.push(Interval::from_bounds(ns, ee, result));
            pieces
        }
        Relation::FullEncapsulation => {
            let mut pieces = Vec::with_capacity(3);
            if es < ns {
                pieces.push(Interval::from_bounds(es, ns - 1, None));
            }
            pieces.push(Interval::from_bounds(ns, ne, result));
            if ne < ee {
                pieces.push(Interval::from_bounds(ne + 1, ee, None));
            }
            pieces
        }
        Relation::NoMatch => Vec::new(),
    }
}

/// Replace the interval at `idx` with `pieces`, returning a new backing vector.
///
/// The source slice is never touched, so a failure before the returned
/// vector is swapped in leaves the owner unchanged.
pub fn splice(intervals: &[Interval], idx: usize, pieces: Vec<Interval>) -> Vec<Interval> {
    let mut rebuilt = Vec::with_capacity(intervals.len() + pieces.len());
    rebuilt.extend_from_slice(&intervals[..idx]);
    rebuilt.extend(pieces);
    rebuilt.extend_from_slice(&intervals[idx + 1..]);
    rebuilt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(pieces: &[Interval]) -> Vec<(usize, usize, Option<&str>)> {
        pieces
            .iter()
            .map(|p| (p.start(), p.end(), p.result()))
            .collect()
    }

    #[test]
    fn test_split_exact_match_overwrites() {
        let existing = Interval::unprocessed(0, 9).unwrap();
        let new = Interval::new(0, 9, "X").unwrap();

        let pieces = split(Relation::ExactMatch, &existing, &new);
        assert_eq!(bounds(&pieces), vec![(0, 9, Some("X"))]);
    }

    #[test]
    fn test_split_start_match() {
        let existing = Interval::unprocessed(0, 9).unwrap();
        let new = Interval::new(0, 3, "P").unwrap();

        let pieces = split(Relation::StartMatch, &existing, &new);
        assert_eq!(bounds(&pieces), vec![(0, 3, Some("P")), (4, 9, None)]);
    }

    #[test]
    fn test_split_end_match() {
        let existing = Interval::unprocessed(0, 9).unwrap();
        let new = Interval::new(7, 9, "E").unwrap();

        let pieces = split(Relation::EndMatch, &existing, &new);
        assert_eq!(bounds(&pieces), vec![(0, 6, None), (7, 9, Some("E"))]);
    }

    #[test]
    fn test_split_full_encapsulation() {
        let existing = Interval::unprocessed(0, 9).unwrap();
        let new = Interval::new(3, 5, "R").unwrap();

        let pieces = split(Relation::FullEncapsulation, &existing, &new);
        assert_eq!(
            bounds(&pieces),
            vec![(0, 2, None), (3, 5, Some("R")), (6, 9, None)]
        );
    }

    #[test]
    fn test_split_single_position_remainders() {
        let existing = Interval::unprocessed(4, 6).unwrap();
        let new = Interval::new(5, 5, "M").unwrap();

        let pieces = split(Relation::FullEncapsulation, &existing, &new);
        assert_eq!(
            bounds(&pieces),
            vec![(4, 4, None), (5, 5, Some("M")), (6, 6, None)]
        );
    }

    #[test]
    fn test_split_unprocessed_submission_stays_unprocessed() {
        let existing = Interval::unprocessed(0, 9).unwrap();
        let new = Interval::unprocessed(0, 4).unwrap();

        let pieces = split(Relation::StartMatch, &existing, &new);
        assert_eq!(bounds(&pieces), vec![(0, 4, None), (5, 9, None)]);
    }

    #[test]
    fn test_split_no_match_is_empty() {
        let existing = Interval::unprocessed(5, 9).unwrap();
        let new = Interval::new(2, 4, "Z").unwrap();
        assert!(split(Relation::NoMatch, &existing, &new).is_empty());
    }

    #[test]
    fn test_splice_replaces_in_place() {
        let intervals = vec![
            Interval::new(0, 2, "A").unwrap(),
            Interval::unprocessed(3, 9).unwrap(),
        ];
        let pieces = vec![
            Interval::new(3, 4, "B").unwrap(),
            Interval::unprocessed(5, 9).unwrap(),
        ];

        let rebuilt = splice(&intervals, 1, pieces);
        assert_eq!(rebuilt.len(), 3);
        assert_eq!(rebuilt[1].result(), Some("B"));
        assert_eq!(rebuilt[2].start(), 5);
        // Source untouched
        assert_eq!(intervals.len(), 2);
    }
}
