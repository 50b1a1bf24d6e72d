//! Pairwise partnership ratings.
//!
//! An instructor rates pairs of students on a five-level scale. Only
//! [`RatingLevel::NeverTogether`] is a hard constraint; every other level
//! is a soft cost or reward applied by the scorer.

use std::collections::HashMap;

use tracing::warn;

use crate::model::{StudentId, StudentPair};

/// Rating of how well two students work together.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum RatingLevel {
    NeverTogether = -2,
    Avoid = -1,
    #[default]
    Neutral = 0,
    Good = 1,
    Best = 2,
}

impl RatingLevel {
    /// Numeric value on the -2..=2 scale.
    pub fn value(self) -> i8 {
        self as i8
    }

    pub fn from_value(value: i8) -> Option<Self> {
        match value {
            -2 => Some(RatingLevel::NeverTogether),
            -1 => Some(RatingLevel::Avoid),
            0 => Some(RatingLevel::Neutral),
            1 => Some(RatingLevel::Good),
            2 => Some(RatingLevel::Best),
            _ => None,
        }
    }

    pub fn is_hard(self) -> bool {
        self == RatingLevel::NeverTogether
    }

    pub fn label(self) -> &'static str {
        match self {
            RatingLevel::NeverTogether => "Never Together",
            RatingLevel::Avoid => "Avoid",
            RatingLevel::Neutral => "Neutral",
            RatingLevel::Good => "Good",
            RatingLevel::Best => "Best",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            RatingLevel::NeverTogether => "These students should never be seated together",
            RatingLevel::Avoid => "Try to avoid seating these students together",
            RatingLevel::Neutral => "No preference for these students",
            RatingLevel::Good => "These students work well together",
            RatingLevel::Best => "These students work best together",
        }
    }
}

impl TryFrom<i8> for RatingLevel {
    type Error = i8;

    fn try_from(value: i8) -> Result<Self, i8> {
        Self::from_value(value).ok_or(value)
    }
}

/// A rating record as delivered by the persistence layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PartnershipRating {
    pub a: StudentId,
    pub b: StudentId,
    pub level: RatingLevel,
}

impl PartnershipRating {
    pub fn new(a: u32, b: u32, level: RatingLevel) -> Self {
        Self {
            a: StudentId(a),
            b: StudentId(b),
            level,
        }
    }
}

/// Symmetric, total lookup of pair ratings.
///
/// Unknown pairs are [`RatingLevel::Neutral`]. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct ConstraintModel {
    ratings: HashMap<StudentPair, RatingLevel>,
}

impl ConstraintModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the lookup from raw rating records.
    ///
    /// Self-ratings are ignored. A pair rated more than once keeps the
    /// last record.
    pub fn from_ratings(ratings: impl IntoIterator<Item = PartnershipRating>) -> Self {
        let mut model = Self::new();
        for r in ratings {
            let Some(pair) = StudentPair::new(r.a, r.b) else {
                warn!(student = %r.a, "ignoring self-rating");
                continue;
            };
            if let Some(prev) = model.ratings.get(&pair) {
                if *prev != r.level {
                    warn!(%pair, previous = ?prev, new = ?r.level, "pair rated twice, keeping last");
                }
            }
            if r.level == RatingLevel::Neutral {
                model.ratings.remove(&pair);
            } else {
                model.ratings.insert(pair, r.level);
            }
        }
        model
    }

    pub fn rating(&self, a: StudentId, b: StudentId) -> RatingLevel {
        StudentPair::new(a, b)
            .and_then(|pair| self.ratings.get(&pair).copied())
            .unwrap_or_default()
    }

    pub fn is_hard_violation(&self, a: StudentId, b: StudentId) -> bool {
        self.rating(a, b).is_hard()
    }

    /// Number of non-neutral pairs.
    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    /// All never-together pairs, sorted.
    pub fn hard_pairs(&self) -> Vec<StudentPair> {
        let mut pairs: Vec<StudentPair> = self
            .ratings
            .iter()
            .filter(|(_, level)| level.is_hard())
            .map(|(&pair, _)| pair)
            .collect();
        pairs.sort();
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_is_symmetric_and_total() {
        let model = ConstraintModel::from_ratings([
            PartnershipRating::new(1, 2, RatingLevel::NeverTogether),
            PartnershipRating::new(3, 1, RatingLevel::Best),
        ]);

        assert_eq!(model.rating(StudentId(2), StudentId(1)), RatingLevel::NeverTogether);
        assert_eq!(model.rating(StudentId(1), StudentId(3)), RatingLevel::Best);
        assert_eq!(model.rating(StudentId(2), StudentId(3)), RatingLevel::Neutral);
        assert!(model.is_hard_violation(StudentId(1), StudentId(2)));
        assert!(!model.is_hard_violation(StudentId(1), StudentId(3)));
    }

    #[test]
    fn test_last_rating_wins_and_neutral_clears() {
        let model = ConstraintModel::from_ratings([
            PartnershipRating::new(1, 2, RatingLevel::Avoid),
            PartnershipRating::new(2, 1, RatingLevel::Good),
            PartnershipRating::new(4, 5, RatingLevel::Best),
            PartnershipRating::new(5, 4, RatingLevel::Neutral),
        ]);
        assert_eq!(model.rating(StudentId(1), StudentId(2)), RatingLevel::Good);
        assert_eq!(model.rating(StudentId(4), StudentId(5)), RatingLevel::Neutral);
        assert_eq!(model.len(), 1);
    }

    #[test]
    fn test_self_rating_ignored() {
        let model = ConstraintModel::from_ratings([PartnershipRating::new(
            1,
            1,
            RatingLevel::NeverTogether,
        )]);
        assert!(model.is_empty());
        assert!(!model.is_hard_violation(StudentId(1), StudentId(1)));
    }

    #[test]
    fn test_level_values_round_trip() {
        for v in -2..=2i8 {
            let level = RatingLevel::try_from(v).unwrap();
            assert_eq!(level.value(), v);
        }
        assert_eq!(RatingLevel::try_from(3), Err(3));
        assert_eq!(RatingLevel::NeverTogether.label(), "Never Together");
    }

    #[test]
    fn test_hard_pairs_sorted() {
        let model = ConstraintModel::from_ratings([
            PartnershipRating::new(9, 8, RatingLevel::NeverTogether),
            PartnershipRating::new(2, 1, RatingLevel::NeverTogether),
            PartnershipRating::new(3, 4, RatingLevel::Avoid),
        ]);
        let pairs = model.hard_pairs();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].low(), StudentId(1));
        assert_eq!(pairs[1].low(), StudentId(8));
    }
}
