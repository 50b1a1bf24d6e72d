//! Assignment cost evaluation.

use crate::constraint::RatingLevel;
use crate::context::SeatingContext;
use crate::model::{Gender, SeatingAssignment, StudentId, StudentPair, TableId};

use super::weights::ScoringWeights;

/// A never-together pair still seated at the same table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Violation {
    pub pair: StudentPair,
    pub table: TableId,
}

/// Per-term totals of a score. [`total`](Self::total) equals
/// [`Scorer::score`] for the same assignment.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoreBreakdown {
    pub never_together: f64,
    pub avoid: f64,
    pub good: f64,
    pub best: f64,
    pub repeat: f64,
    pub gender: f64,
    pub empty_seats: f64,
    /// Number of never-together pairs seated together.
    pub violation_count: usize,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        self.never_together
            + self.avoid
            + self.good
            + self.best
            + self.repeat
            + self.gender
            + self.empty_seats
    }
}

/// Pure scoring function over a [`SeatingContext`].
#[derive(Debug, Clone, Copy)]
pub struct Scorer<'a> {
    ctx: &'a SeatingContext,
    weights: ScoringWeights,
}

impl<'a> Scorer<'a> {
    pub fn new(ctx: &'a SeatingContext) -> Self {
        Self {
            ctx,
            weights: ScoringWeights::default(),
        }
    }

    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn context(&self) -> &'a SeatingContext {
        self.ctx
    }

    /// Total cost of `assignment`. Lower is better.
    pub fn score(&self, assignment: &SeatingAssignment) -> f64 {
        self.breakdown(assignment).total()
    }

    pub fn breakdown(&self, assignment: &SeatingAssignment) -> ScoreBreakdown {
        let w = &self.weights;
        let constraints = self.ctx.constraints();
        let history = self.ctx.history();
        let mut b = ScoreBreakdown::default();

        for members in assignment.by_table().values() {
            for (i, &s1) in members.iter().enumerate() {
                for &s2 in &members[i + 1..] {
                    match constraints.rating(s1, s2) {
                        RatingLevel::NeverTogether => {
                            b.never_together += w.never_together_violation;
                            b.violation_count += 1;
                        }
                        RatingLevel::Avoid => b.avoid += w.avoid_pairing,
                        RatingLevel::Good => b.good += w.good_pairing,
                        RatingLevel::Best => b.best += w.best_pairing,
                        RatingLevel::Neutral => {}
                    }
                    b.repeat += w.repeat_partnership * f64::from(history.count(s1, s2));
                }
            }
            b.gender += w.gender_imbalance * f64::from(self.gender_imbalance(members));
        }

        b.empty_seats = w.empty_seat * self.fillable_vacancies(assignment) as f64;
        b
    }

    /// Vacant seats that waiting students could occupy at the same time.
    ///
    /// Size of a maximum matching between waiting students and vacant
    /// seats under [`SeatingContext::can_sit`], so a student with an
    /// accessibility need only counts against accessible seats and a
    /// reserved seat only against its locked student.
    pub fn fillable_vacancies(&self, assignment: &SeatingAssignment) -> usize {
        let seats = self.ctx.vacant_seats(assignment);
        let waiting = self.ctx.unassigned(assignment);
        let bound = seats.len().min(waiting.len());
        if bound == 0 {
            return 0;
        }

        let options: Vec<Vec<usize>> = waiting
            .iter()
            .map(|&student| {
                seats
                    .iter()
                    .enumerate()
                    .filter(|&(_, &seat)| self.ctx.can_sit(student, seat))
                    .map(|(j, _)| j)
                    .collect()
            })
            .collect();

        let mut holder: Vec<Option<usize>> = vec![None; seats.len()];
        let mut matched = 0;
        for student in 0..options.len() {
            let mut visited = vec![false; seats.len()];
            if augment(student, &options, &mut holder, &mut visited) {
                matched += 1;
                if matched == bound {
                    break;
                }
            }
        }
        matched
    }

    /// Rating plus repeat-partnership cost of seating `a` with `b`.
    pub fn pair_cost(&self, a: StudentId, b: StudentId) -> f64 {
        let w = &self.weights;
        let rating = match self.ctx.constraints().rating(a, b) {
            RatingLevel::NeverTogether => w.never_together_violation,
            RatingLevel::Avoid => w.avoid_pairing,
            RatingLevel::Neutral => 0.0,
            RatingLevel::Good => w.good_pairing,
            RatingLevel::Best => w.best_pairing,
        };
        rating + w.repeat_partnership * f64::from(self.ctx.history().count(a, b))
    }

    /// |males − females| among `members`.
    pub fn gender_imbalance(&self, members: &[StudentId]) -> u32 {
        let (mut males, mut females) = (0i64, 0i64);
        for &id in members {
            match self.ctx.gender(id) {
                Gender::Male => males += 1,
                Gender::Female => females += 1,
                Gender::Other | Gender::Unset => {}
            }
        }
        (males - females).unsigned_abs() as u32
    }

    /// Change in table cost from adding `candidate` to a table seating
    /// `members`: pair terms against every member plus the change in the
    /// gender imbalance term.
    pub fn marginal_cost(&self, members: &[StudentId], candidate: StudentId) -> f64 {
        let pairs: f64 = members
            .iter()
            .filter(|&&m| m != candidate)
            .map(|&m| self.pair_cost(candidate, m))
            .sum();
        let before = self.gender_imbalance(members);
        let mut after_members = members.to_vec();
        after_members.push(candidate);
        let after = self.gender_imbalance(&after_members);
        pairs + self.weights.gender_imbalance * (f64::from(after) - f64::from(before))
    }

    /// Never-together pairs seated together, table-major.
    pub fn violations(&self, assignment: &SeatingAssignment) -> Vec<Violation> {
        let constraints = self.ctx.constraints();
        let mut out = Vec::new();
        for (&table, members) in &assignment.by_table() {
            for (i, &s1) in members.iter().enumerate() {
                for &s2 in &members[i + 1..] {
                    if constraints.is_hard_violation(s1, s2) {
                        out.extend(StudentPair::new(s1, s2).map(|pair| Violation { pair, table }));
                    }
                }
            }
        }
        out
    }
}

/// Augmenting-path step of the vacancy matching.
fn augment(
    student: usize,
    options: &[Vec<usize>],
    holder: &mut [Option<usize>],
    visited: &mut [bool],
) -> bool {
    for &seat in &options[student] {
        if visited[seat] {
            continue;
        }
        visited[seat] = true;
        let free = match holder[seat] {
            None => true,
            Some(other) => augment(other, options, holder, visited),
        };
        if free {
            holder[seat] = Some(student);
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::{ConstraintModel, PartnershipRating};
    use crate::history::{HistoryTracker, PartnershipHistory};
    use crate::model::{Gender, Layout, Seat, SeatId, Student, Table, TableShape};

    fn roster() -> Vec<Student> {
        vec![
            Student::new(1, "Alice", Gender::Female),
            Student::new(2, "Bob", Gender::Male),
            Student::new(3, "Carol", Gender::Female),
            Student::new(4, "Dave", Gender::Male),
            Student::new(5, "Eve", Gender::Other),
        ]
    }

    fn context(ratings: Vec<PartnershipRating>, history: Vec<PartnershipHistory>) -> SeatingContext {
        let layout = Layout::new(vec![Table::with_capacity(1, 3), Table::with_capacity(2, 3)]).unwrap();
        SeatingContext::new(roster(), layout)
            .unwrap()
            .with_constraints(ConstraintModel::from_ratings(ratings))
            .with_history(HistoryTracker::from_records(history))
    }

    fn seat_all(pairs: &[(u32, u32, u32)]) -> SeatingAssignment {
        let mut a = SeatingAssignment::new();
        for &(t, n, s) in pairs {
            a.assign(SeatId::new(t, n), StudentId(s)).unwrap();
        }
        a
    }

    #[test]
    fn test_pair_terms() {
        let ctx = context(
            vec![
                PartnershipRating::new(1, 2, RatingLevel::Avoid),
                PartnershipRating::new(1, 3, RatingLevel::Best),
                PartnershipRating::new(4, 5, RatingLevel::Good),
            ],
            vec![PartnershipHistory::new(2, 3, 2)],
        );
        let scorer = Scorer::new(&ctx);
        // table 1: 1F 2M 3F, table 2: 4M 5O
        let a = seat_all(&[(1, 1, 1), (1, 2, 2), (1, 3, 3), (2, 1, 4), (2, 2, 5)]);
        let b = scorer.breakdown(&a);

        assert_eq!(b.avoid, 50.0);
        assert_eq!(b.best, -40.0);
        assert_eq!(b.good, -20.0);
        assert_eq!(b.repeat, 20.0);
        // |1-2| at table 1, |1-0| at table 2
        assert_eq!(b.gender, 10.0);
        assert_eq!(b.empty_seats, 0.0);
        assert_eq!(b.violation_count, 0);
        assert_eq!(scorer.score(&a), 50.0 - 40.0 - 20.0 + 20.0 + 10.0);
    }

    #[test]
    fn test_never_together_costs_exactly_its_weight() {
        let hard = context(vec![PartnershipRating::new(1, 2, RatingLevel::NeverTogether)], vec![]);
        let soft = context(vec![], vec![]);
        let a = seat_all(&[(1, 1, 1), (1, 2, 2), (2, 1, 3)]);

        let with = Scorer::new(&hard).score(&a);
        let without = Scorer::new(&soft).score(&a);
        assert_eq!(with - without, 1000.0);
        assert_eq!(Scorer::new(&hard).violations(&a).len(), 1);
    }

    #[test]
    fn test_empty_seat_only_counts_waiting_students() {
        let ctx = context(vec![], vec![]);
        let scorer = Scorer::new(&ctx);

        // 2 seated, 3 waiting, 4 vacant seats → min(4, 3) = 3
        let a = seat_all(&[(1, 1, 1), (2, 1, 3)]);
        assert_eq!(scorer.breakdown(&a).empty_seats, 6.0);

        // everyone seated → no vacancy penalty
        let full = seat_all(&[(1, 1, 1), (1, 2, 3), (2, 1, 2), (2, 2, 4), (2, 3, 5)]);
        assert_eq!(scorer.breakdown(&full).empty_seats, 0.0);
    }

    #[test]
    fn test_empty_seat_needs_a_student_who_fits() {
        let roster = vec![
            Student::new(1, "Alice", Gender::Female).with_accessibility_need(),
            Student::new(2, "Bob", Gender::Male),
        ];
        let layout = Layout::new(vec![Table::with_capacity(1, 2)]).unwrap();
        let ctx = SeatingContext::new(roster, layout).unwrap();
        let scorer = Scorer::new(&ctx);

        // Alice waits but no vacant seat is accessible
        let a = seat_all(&[(1, 1, 2)]);
        assert_eq!(scorer.fillable_vacancies(&a), 0);
        assert_eq!(scorer.breakdown(&a).empty_seats, 0.0);
    }

    #[test]
    fn test_empty_seat_ignores_seats_reserved_for_others() {
        let roster = vec![
            Student::new(1, "Alice", Gender::Female),
            Student::new(2, "Bob", Gender::Male),
        ];
        let layout = Layout::new(vec![Table::with_capacity(1, 2)]).unwrap();
        let mut ctx = SeatingContext::new(roster, layout).unwrap();
        ctx.lock(StudentId(1), SeatId::new(1, 1)).unwrap();
        let scorer = Scorer::new(&ctx);

        // Bob waits, the only vacancy is Alice's reserved seat
        let off_lock = seat_all(&[(1, 2, 1)]);
        assert_eq!(scorer.fillable_vacancies(&off_lock), 0);

        // Alice waits for her own seat
        let alice_waits = seat_all(&[(1, 2, 2)]);
        assert_eq!(scorer.fillable_vacancies(&alice_waits), 1);

        // both wait, both seats can be filled
        assert_eq!(scorer.fillable_vacancies(&SeatingAssignment::new()), 2);
        assert_eq!(scorer.breakdown(&SeatingAssignment::new()).empty_seats, 4.0);
    }

    #[test]
    fn test_empty_seat_counts_a_matching_not_a_minimum() {
        // two waiting students who both need the single accessible seat
        let roster = vec![
            Student::new(1, "Alice", Gender::Female).with_accessibility_need(),
            Student::new(2, "Bob", Gender::Male).with_accessibility_need(),
            Student::new(3, "Carol", Gender::Female),
        ];
        let seats = vec![Seat::new(1).accessible(), Seat::new(2), Seat::new(3)];
        let layout = Layout::new(vec![Table::new(1, TableShape::Round, seats)]).unwrap();
        let ctx = SeatingContext::new(roster, layout).unwrap();
        let a = seat_all(&[(1, 3, 3)]);
        assert_eq!(Scorer::new(&ctx).fillable_vacancies(&a), 1);
    }

    #[test]
    fn test_score_is_pure() {
        let ctx = context(
            vec![PartnershipRating::new(1, 4, RatingLevel::Good)],
            vec![PartnershipHistory::new(1, 4, 3)],
        );
        let scorer = Scorer::new(&ctx);
        let a = seat_all(&[(1, 1, 1), (1, 2, 4), (2, 1, 2)]);
        let first = scorer.score(&a);
        for _ in 0..10 {
            assert_eq!(scorer.score(&a), first);
        }
    }

    #[test]
    fn test_marginal_cost_matches_score_delta() {
        let ctx = context(
            vec![PartnershipRating::new(1, 2, RatingLevel::Best)],
            vec![PartnershipHistory::new(2, 3, 1)],
        );
        let scorer = Scorer::new(&ctx);
        let before = seat_all(&[(1, 1, 1), (1, 2, 3)]);
        let mut after = before.clone();
        after.assign(SeatId::new(1, 3), StudentId(2)).unwrap();

        let members = before.students_at(TableId(1));
        let marginal = scorer.marginal_cost(&members, StudentId(2));
        // seating a waiting student also removes one vacancy penalty unit
        let vacancy_shift = -scorer.weights().empty_seat;
        assert_eq!(scorer.score(&after) - scorer.score(&before), marginal + vacancy_shift);
    }

    #[test]
    fn test_custom_weights() {
        let ctx = context(vec![], vec![]);
        let scorer = Scorer::new(&ctx).with_weights(ScoringWeights::default().with_gender_imbalance(0.0));
        let a = seat_all(&[(1, 1, 2), (1, 2, 4)]);
        assert_eq!(scorer.breakdown(&a).gender, 0.0);
    }
}
