//! Greedy top-down induction of the quantile partition.
//!
//! A fit works on the *sorted-unique table*: distinct sample values in
//! ascending order with their frequencies. Induction repeatedly expands
//! index-range frames over that table; a frame either splits at the most
//! likelihood-improving boundary or terminates as one uniform quantile.

use crate::interval::Interval;
use crate::nyga::leaves::Uniform;

/// Sorted-unique view of a sample: strictly increasing distinct values,
/// their integer frequencies, and the cached log-frequencies used by the
/// likelihood arithmetic.
#[derive(Debug)]
pub(crate) struct SampleTable {
    values: Vec<f64>,
    counts: Vec<u64>,
    log_counts: Vec<f64>,
    total: u64,
}

impl SampleTable {
    /// Collapse runs of equal values in an ascending slice.
    pub(crate) fn from_sorted(sorted: &[f64]) -> Self {
        debug_assert!(
            sorted.windows(2).all(|w| w[0] <= w[1]),
            "sample table requires ascending input"
        );

        let mut values: Vec<f64> = Vec::with_capacity(sorted.len());
        let mut counts: Vec<u64> = Vec::with_capacity(sorted.len());
        for &v in sorted {
            match values.last() {
                Some(&prev) if prev == v => *counts.last_mut().unwrap() += 1,
                _ => {
                    values.push(v);
                    counts.push(1);
                }
            }
        }

        let log_counts = counts.iter().map(|&c| (c as f64).ln()).collect();
        SampleTable {
            values,
            counts,
            log_counts,
            total: sorted.len() as u64,
        }
    }

    /// Number of distinct values.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.values.len()
    }

    /// Number of raw samples before deduplication.
    #[inline]
    pub(crate) fn total(&self) -> u64 {
        self.total
    }

    #[inline]
    pub(crate) fn value(&self, index: usize) -> f64 {
        self.values[index]
    }

    /// Midpoint of the two values around `index`, or the first datum at the
    /// left extreme.
    pub(crate) fn left_connecting_point(&self, index: usize) -> f64 {
        if index > 0 {
            (self.values[index - 1] + self.values[index]) / 2.0
        } else {
            self.values[0]
        }
    }

    /// Midpoint of the two values around `index`, or the last datum at the
    /// right extreme. Needs a predecessor: never called with index 0.
    pub(crate) fn right_connecting_point(&self, index: usize) -> f64 {
        debug_assert!(index > 0, "right connecting point needs a predecessor");
        if index < self.values.len() {
            (self.values[index - 1] + self.values[index]) / 2.0
        } else {
            self.values[index - 1]
        }
    }

    /// `Σ ln(c[i])` over `[begin, end)`.
    pub(crate) fn sum_log_weights(&self, begin: usize, end: usize) -> f64 {
        self.log_counts[begin..end].iter().sum()
    }

    /// `Σ c[i]` over `[begin, end)` — the raw mixture weight of a leaf.
    pub(crate) fn sum_weights(&self, begin: usize, end: usize) -> u64 {
        self.counts[begin..end].iter().sum()
    }
}

/// One pending subproblem: a half-open index range into the table.
///
/// Invariant: `begin < end <= table.len()`, so every frame spans at least
/// one distinct value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Frame {
    pub(crate) begin: usize,
    pub(crate) end: usize,
}

/// Outcome of expanding one frame.
#[derive(Debug)]
pub(crate) enum Expansion {
    Split(Frame, Frame),
    Leaf { weight: u64, uniform: Uniform },
}

/// The expansion worker. Borrows the table for the duration of one fit;
/// frames are disposable index pairs.
pub(crate) struct Inducer<'a> {
    table: &'a SampleTable,
    min_samples_per_quantile: usize,
    /// `ln(1 + δ)`, the acceptance margin of a split.
    log_improvement: f64,
}

impl<'a> Inducer<'a> {
    pub(crate) fn new(
        table: &'a SampleTable,
        min_samples_per_quantile: usize,
        min_likelihood_improvement: f64,
    ) -> Self {
        Inducer {
            table,
            min_samples_per_quantile,
            log_improvement: (1.0 + min_likelihood_improvement).ln(),
        }
    }

    /// Log likelihood of the side of `split` that faces away from `anchor`,
    /// under a uniform density between `anchor` and the split midpoint.
    fn log_likelihood_of_split(&self, frame: Frame, split: usize, anchor: f64) -> f64 {
        let midpoint = (self.table.value(split - 1) + self.table.value(split)) / 2.0;
        let width = (midpoint - anchor).abs();

        let mass = if midpoint < anchor {
            self.table.sum_log_weights(frame.begin, split)
        } else {
            self.table.sum_log_weights(split, frame.end)
        };

        -width.ln() + mass
    }

    /// Scan every admissible split index and return `(score, index)` of the
    /// best one, or `None` when the frame is too small to split. The score
    /// is the sum of the log likelihoods anchored at both frame connectors;
    /// on ties the lowest index wins.
    pub(crate) fn best_split(&self, frame: Frame) -> Option<(f64, usize)> {
        let lo = frame.begin + self.min_samples_per_quantile;
        let hi = (frame.end + 1).saturating_sub(self.min_samples_per_quantile);

        if lo >= hi {
            return None;
        }

        let left_anchor = self.table.left_connecting_point(frame.begin);
        let right_anchor = self.table.right_connecting_point(frame.end);

        let mut best: Option<(f64, usize)> = None;
        for split in lo..hi {
            let score = self.log_likelihood_of_split(frame, split, left_anchor)
                + self.log_likelihood_of_split(frame, split, right_anchor);
            match best {
                Some((top, _)) if score <= top => {}
                _ => best = Some((score, split)),
            }
        }
        best
    }

    /// Expand one frame: split when the best split beats keeping the frame
    /// whole by at least the acceptance margin, otherwise emit the frame's
    /// uniform quantile.
    pub(crate) fn expand(&self, frame: Frame) -> Expansion {
        let left = self.table.left_connecting_point(frame.begin);
        let right = self.table.right_connecting_point(frame.end);

        let mass = self.table.sum_log_weights(frame.begin, frame.end);
        let no_split = -(right - left).ln() + mass;

        if let Some((best, split)) = self.best_split(frame) {
            if best > no_split + self.log_improvement {
                return Expansion::Split(
                    Frame {
                        begin: frame.begin,
                        end: split,
                    },
                    Frame {
                        begin: split,
                        end: frame.end,
                    },
                );
            }
        }

        // Only the rightmost quantile closes its upper edge.
        let interval = if frame.end == self.table.len() {
            Interval::closed(left, right)
        } else {
            Interval::closed_open(left, right)
        }
        .expect("connecting points are ordered");

        Expansion::Leaf {
            weight: self.table.sum_weights(frame.begin, frame.end),
            uniform: Uniform::new(interval),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nyga::test_helpers::{assert_close, assert_point};

    fn table() -> SampleTable {
        SampleTable::from_sorted(&[1.0, 2.0, 3.0, 4.0, 7.0, 9.0])
    }

    #[test]
    fn runs_collapse_into_counts() {
        let t = SampleTable::from_sorted(&[1.0, 1.0, 1.0, 2.0, 3.0, 3.0]);
        assert_eq!(t.len(), 3);
        assert_eq!(t.total(), 6);
        assert_eq!(t.sum_weights(0, 3), 6);
        assert_eq!(t.sum_weights(0, 1), 3);
        assert_close("lw of pile", 3.0f64.ln(), t.sum_log_weights(0, 1), 1e-12);
    }

    #[test]
    fn connecting_points_interior() {
        let t = table();
        assert_point("L(3)", 3.5, t.left_connecting_point(3));
        assert_point("R(5)", 8.0, t.right_connecting_point(5));
    }

    #[test]
    fn connecting_points_extremes() {
        let t = table();
        assert_point("L(0)", 1.0, t.left_connecting_point(0));
        assert_point("R(6)", 9.0, t.right_connecting_point(6));
    }

    #[test]
    fn log_weight_sums_for_unique_data() {
        // All counts are 1, so every log-weight sum is exactly zero.
        let t = table();
        assert_point("full frame", 0.0, t.sum_log_weights(0, 6));
        assert_point("sub frame", 0.0, t.sum_log_weights(3, 5));
        assert_eq!(t.sum_weights(0, 6), 6);
        assert_eq!(t.sum_weights(3, 5), 2);
    }

    #[test]
    fn best_split_prefers_the_sparse_gap() {
        let t = table();
        let inducer = Inducer::new(&t, 1, 0.01);
        let (_, split) = inducer.best_split(Frame { begin: 0, end: 6 }).unwrap();
        assert_eq!(split, 1);
    }

    #[test]
    fn best_split_with_three_samples_per_quantile() {
        let t = table();
        let inducer = Inducer::new(&t, 3, 0.01);
        // Exactly one admissible candidate remains.
        let (_, split) = inducer.best_split(Frame { begin: 0, end: 6 }).unwrap();
        assert_eq!(split, 3);
    }

    #[test]
    fn best_split_none_when_frame_is_too_small() {
        let t = table();
        let inducer = Inducer::new(&t, 4, 0.01);
        assert!(inducer.best_split(Frame { begin: 0, end: 6 }).is_none());
    }

    #[test]
    fn split_score_is_the_sum_of_both_anchored_sides() {
        let t = table();
        let inducer = Inducer::new(&t, 1, 0.01);
        // s=1 midpoint is 1.5; anchors are 1 and 9. Facing-away masses are
        // empty log-sums (all counts 1), so the score is the pure width term.
        let (score, split) = inducer.best_split(Frame { begin: 0, end: 6 }).unwrap();
        assert_eq!(split, 1);
        assert_close("score", -(0.5f64.ln()) - 7.5f64.ln(), score, 1e-12);
    }

    #[test]
    fn unsplittable_frame_becomes_the_whole_range_leaf() {
        let t = table();
        let inducer = Inducer::new(&t, 4, 0.01);
        match inducer.expand(Frame { begin: 0, end: 6 }) {
            Expansion::Leaf { weight, uniform } => {
                assert_eq!(weight, 6);
                let iv = uniform.interval();
                assert_point("lower", 1.0, iv.lower());
                assert_point("upper", 9.0, iv.upper());
                assert!(iv.is_right_closed());
            }
            other => panic!("expected a leaf, got {:?}", other),
        }
    }

    #[test]
    fn interior_leaf_is_right_open() {
        let t = table();
        let inducer = Inducer::new(&t, 1, 0.01);
        match inducer.expand(Frame { begin: 3, end: 5 }) {
            Expansion::Leaf { weight, uniform } => {
                assert_eq!(weight, 2);
                let iv = uniform.interval();
                assert_point("lower", 3.5, iv.lower());
                assert_point("upper", 8.0, iv.upper());
                assert!(!iv.is_right_closed());
            }
            other => panic!("expected a leaf, got {:?}", other),
        }
    }

    #[test]
    fn accepted_split_beats_no_split_by_the_margin() {
        let t = table();
        let delta = 0.01;
        let inducer = Inducer::new(&t, 1, delta);
        let frame = Frame { begin: 0, end: 6 };
        let (best, _) = inducer.best_split(frame).unwrap();
        let no_split = -(8.0f64.ln());
        match inducer.expand(frame) {
            Expansion::Split(left, right) => {
                assert!(best > no_split + (1.0 + delta).ln());
                assert_eq!(left, Frame { begin: 0, end: 1 });
                assert_eq!(right, Frame { begin: 1, end: 6 });
            }
            other => panic!("expected a split, got {:?}", other),
        }
    }
}
