//! Scoring of seat assignments.
//!
//! The score is a scalar cost, lower is better, summed over every pair
//! of students sharing a table plus per-table gender imbalance and a
//! vacancy term:
//!
//! | Term                       | Weight | Applied                       |
//! |----------------------------|-------:|-------------------------------|
//! | never-together violation   |   1000 | per pair rated NEVER_TOGETHER |
//! | avoid pairing              |     50 | per pair rated AVOID          |
//! | good pairing               |    -20 | per pair rated GOOD           |
//! | best pairing               |    -40 | per pair rated BEST           |
//! | repeat partnership         |     10 | × prior co-seating count      |
//! | gender imbalance           |      5 | × \|males − females\| per table |
//! | empty seat                 |      2 | per vacant seat a waiting student could take |
//!
//! Scoring is pure: the same assignment with the same ratings and history
//! always yields the same value.

mod scorer;
mod weights;

pub use scorer::{ScoreBreakdown, Scorer, Violation};
pub use weights::ScoringWeights;
