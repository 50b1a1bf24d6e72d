//! Partnership history and lottery weights.
//!
//! History counts how many prior seating periods placed a pair at the
//! same table. It feeds two places:
//!
//! - the scorer, as a linear repeat-partnership penalty;
//! - randomized fills, as lottery weights that favour under-paired
//!   students ("lottery balls": fewer prior pairings, more balls).
//!
//! The optimizer only reads history. Counts are incremented by the
//! persistence layer after an assignment is committed.

use std::collections::HashMap;

use crate::model::{StudentId, StudentPair};

/// A history record as delivered by the persistence layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PartnershipHistory {
    pub a: StudentId,
    pub b: StudentId,
    pub count: u32,
}

impl PartnershipHistory {
    pub fn new(a: u32, b: u32, count: u32) -> Self {
        Self {
            a: StudentId(a),
            b: StudentId(b),
            count,
        }
    }
}

/// Step function mapping a prior-pairing count to lottery balls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LotteryWeights {
    pub never_paired: u32,
    pub paired_once: u32,
    pub paired_twice: u32,
    pub paired_thrice: u32,
    /// Four or more prior pairings.
    pub paired_many: u32,
}

impl Default for LotteryWeights {
    fn default() -> Self {
        Self {
            never_paired: 10,
            paired_once: 10,
            paired_twice: 5,
            paired_thrice: 2,
            paired_many: 1,
        }
    }
}

impl LotteryWeights {
    pub fn weight_for(&self, count: u32) -> u32 {
        let w = match count {
            0 => self.never_paired,
            1 => self.paired_once,
            2 => self.paired_twice,
            3 => self.paired_thrice,
            _ => self.paired_many,
        };
        w.max(1)
    }
}

/// Read-only lookup of per-pair co-seating counts.
#[derive(Debug, Clone, Default)]
pub struct HistoryTracker {
    counts: HashMap<StudentPair, u32>,
    weights: LotteryWeights,
}

impl HistoryTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the tracker from history records. Duplicate pairs are summed.
    pub fn from_records(records: impl IntoIterator<Item = PartnershipHistory>) -> Self {
        let mut tracker = Self::new();
        for r in records {
            if let Some(pair) = StudentPair::new(r.a, r.b) {
                tracker.add(pair, r.count);
            }
        }
        tracker
    }

    /// Replaces the lottery step function.
    pub fn with_lottery_weights(mut self, weights: LotteryWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn lottery_weights(&self) -> &LotteryWeights {
        &self.weights
    }

    pub fn count(&self, a: StudentId, b: StudentId) -> u32 {
        StudentPair::new(a, b)
            .and_then(|pair| self.counts.get(&pair).copied())
            .unwrap_or(0)
    }

    /// Lottery balls for pairing `a` with `b`. Always positive.
    pub fn lottery_weight(&self, a: StudentId, b: StudentId) -> u32 {
        self.weights.weight_for(self.count(a, b))
    }

    /// Adds one committed period's worth of co-seated pairs.
    ///
    /// For the persistence layer; the optimizer never calls this.
    pub fn record_period(&mut self, pairs: impl IntoIterator<Item = StudentPair>) {
        for pair in pairs {
            self.add(pair, 1);
        }
    }

    fn add(&mut self, pair: StudentPair, count: u32) {
        let entry = self.counts.entry(pair).or_insert(0);
        *entry = entry.saturating_add(count);
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Placement, SeatId, SeatingAssignment};

    #[test]
    fn test_lottery_step_function() {
        let w = LotteryWeights::default();
        assert_eq!(w.weight_for(0), 10);
        assert_eq!(w.weight_for(1), 10);
        assert_eq!(w.weight_for(2), 5);
        assert_eq!(w.weight_for(3), 2);
        assert_eq!(w.weight_for(4), 1);
        assert_eq!(w.weight_for(40), 1);
    }

    #[test]
    fn test_counts_are_symmetric() {
        let tracker = HistoryTracker::from_records([
            PartnershipHistory::new(1, 2, 3),
            PartnershipHistory::new(2, 1, 1),
        ]);
        assert_eq!(tracker.count(StudentId(2), StudentId(1)), 4);
        assert_eq!(tracker.count(StudentId(1), StudentId(5)), 0);
        assert_eq!(tracker.lottery_weight(StudentId(1), StudentId(2)), 1);
        assert_eq!(tracker.lottery_weight(StudentId(1), StudentId(5)), 10);
    }

    #[test]
    fn test_zero_weight_is_clamped() {
        let tracker = HistoryTracker::from_records([PartnershipHistory::new(1, 2, 9)])
            .with_lottery_weights(LotteryWeights {
                paired_many: 0,
                ..LotteryWeights::default()
            });
        assert_eq!(tracker.lottery_weight(StudentId(1), StudentId(2)), 1);
    }

    #[test]
    fn test_record_period_increments_once_per_pair() {
        let assignment = SeatingAssignment::from_placements([
            Placement { seat: SeatId::new(1, 1), student: StudentId(1) },
            Placement { seat: SeatId::new(1, 2), student: StudentId(2) },
            Placement { seat: SeatId::new(2, 1), student: StudentId(3) },
        ])
        .unwrap();

        let mut tracker = HistoryTracker::new();
        tracker.record_period(assignment.co_seated_pairs());
        tracker.record_period(assignment.co_seated_pairs());

        assert_eq!(tracker.count(StudentId(1), StudentId(2)), 2);
        assert_eq!(tracker.count(StudentId(1), StudentId(3)), 0);
    }
}
