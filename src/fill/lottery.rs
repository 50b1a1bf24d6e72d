//! Weighted lottery fill.
//!
//! Each vacant seat draws one waiting student. A candidate holds as many
//! lottery balls as the product of its pairwise history weights with the
//! students already at that table, so frequent past partners are drawn
//! less often. Candidates with a never-together rating toward a tablemate
//! get no balls unless every candidate has one.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::trace;

use super::seed::{place, seat_accessibility_needs, warn_unplaced};
use crate::context::SeatingContext;
use crate::model::{SeatingAssignment, StudentId, TableId};
use crate::random::weighted_index;

/// Lottery balls for seating `candidate` with `members`.
///
/// With `avoid_conflicts`, a hard conflict with any member yields 0.
pub(crate) fn group_weight(
    ctx: &SeatingContext,
    members: &[StudentId],
    candidate: StudentId,
    avoid_conflicts: bool,
) -> u64 {
    let history = ctx.history();
    let constraints = ctx.constraints();
    let mut weight = 1u64;
    for &m in members {
        if avoid_conflicts && constraints.is_hard_violation(m, candidate) {
            return 0;
        }
        weight = weight.saturating_mul(u64::from(history.lottery_weight(m, candidate)));
    }
    weight
}

/// Draws one of `candidates` for a table seating `members`.
pub(crate) fn draw<R: Rng + ?Sized>(
    ctx: &SeatingContext,
    members: &[StudentId],
    candidates: &[StudentId],
    rng: &mut R,
) -> Option<StudentId> {
    let mut weights: Vec<u64> = candidates
        .iter()
        .map(|&c| group_weight(ctx, members, c, true))
        .collect();
    if weights.iter().all(|&w| w == 0) {
        weights = candidates
            .iter()
            .map(|&c| group_weight(ctx, members, c, false))
            .collect();
    }
    weighted_index(&weights, rng).map(|i| candidates[i])
}

/// Fills every vacant seat of `a` by lottery. Tables are visited in a
/// random order.
pub(crate) fn fill<R: Rng + ?Sized>(
    ctx: &SeatingContext,
    mut a: SeatingAssignment,
    rng: &mut R,
) -> SeatingAssignment {
    seat_accessibility_needs(ctx, &mut a, rng);

    let mut pool = ctx.unassigned(&a);
    let mut tables: Vec<TableId> = ctx.layout().tables().iter().map(|t| t.id).collect();
    tables.shuffle(rng);

    for table_id in tables {
        let Some(table) = ctx.layout().table(table_id) else {
            continue;
        };
        for seat in table.active_seats() {
            if pool.is_empty() {
                break;
            }
            if a.is_occupied(seat) {
                continue;
            }
            let candidates: Vec<StudentId> = pool
                .iter()
                .copied()
                .filter(|&s| ctx.can_sit(s, seat))
                .collect();
            let members = a.students_at(table_id);
            if let Some(student) = draw(ctx, &members, &candidates, rng) {
                trace!(%student, %seat, "lottery pick");
                if place(&mut a, seat, student) {
                    pool.retain(|&s| s != student);
                }
            }
        }
    }
    warn_unplaced(ctx, &a);
    a
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::{ConstraintModel, PartnershipRating, RatingLevel};
    use crate::history::{HistoryTracker, PartnershipHistory};
    use crate::model::{Gender, Layout, SeatId, Student, Table};
    use crate::random::create_rng;

    fn roster(n: u32) -> Vec<Student> {
        (1..=n)
            .map(|i| Student::new(i, format!("S{i}"), Gender::Unset))
            .collect()
    }

    #[test]
    fn test_group_weight_is_product() {
        let ctx = SeatingContext::new(roster(4), Layout::new(vec![Table::with_capacity(1, 4)]).unwrap())
            .unwrap()
            .with_history(HistoryTracker::from_records([
                PartnershipHistory::new(1, 3, 2),
                PartnershipHistory::new(2, 3, 3),
            ]));
        let w = group_weight(&ctx, &[StudentId(1), StudentId(2)], StudentId(3), true);
        assert_eq!(w, 5 * 2);
        assert_eq!(group_weight(&ctx, &[], StudentId(3), true), 1);
    }

    #[test]
    fn test_repeat_partner_drawn_less_often() {
        // one table, two seats; S1 is locked, so seat 2 draws S2 (w=2) or S3 (w=10)
        let mut ctx = SeatingContext::new(roster(3), Layout::new(vec![Table::with_capacity(1, 2)]).unwrap())
            .unwrap()
            .with_history(HistoryTracker::from_records([PartnershipHistory::new(1, 2, 3)]));
        ctx.lock(StudentId(1), SeatId::new(1, 1)).unwrap();

        let mut rng = create_rng(2024);
        let (mut with_s2, mut with_s3) = (0usize, 0usize);
        for _ in 0..2000 {
            let mut base = SeatingAssignment::new();
            base.assign(SeatId::new(1, 1), StudentId(1)).unwrap();
            let a = fill(&ctx, base, &mut rng);
            match a.occupant(SeatId::new(1, 2)) {
                Some(StudentId(2)) => with_s2 += 1,
                Some(StudentId(3)) => with_s3 += 1,
                other => panic!("unexpected occupant {other:?}"),
            }
        }
        let ratio = with_s2 as f64 / with_s3 as f64;
        assert!(with_s2 < with_s3);
        assert!((0.13..0.28).contains(&ratio), "ratio {ratio}, expected about 1:5");
    }

    #[test]
    fn test_conflicting_candidate_skipped_when_alternative_exists() {
        let ctx = SeatingContext::new(
            roster(4),
            Layout::new(vec![Table::with_capacity(1, 2), Table::with_capacity(2, 2)]).unwrap(),
        )
        .unwrap()
        .with_constraints(ConstraintModel::from_ratings([
            PartnershipRating::new(1, 2, RatingLevel::NeverTogether),
            PartnershipRating::new(3, 4, RatingLevel::NeverTogether),
        ]));
        for seed in 0..50 {
            let a = fill(&ctx, SeatingAssignment::new(), &mut create_rng(seed));
            assert_eq!(a.len(), 4);
            let violations = a
                .by_table()
                .values()
                .filter(|m| ctx.constraints().is_hard_violation(m[0], m[1]))
                .count();
            assert_eq!(violations, 0, "seed {seed}");
        }
    }

    #[test]
    fn test_all_conflicting_falls_back_to_plain_lottery() {
        let ctx = SeatingContext::new(roster(2), Layout::new(vec![Table::with_capacity(1, 2)]).unwrap())
            .unwrap()
            .with_constraints(ConstraintModel::from_ratings([PartnershipRating::new(
                1,
                2,
                RatingLevel::NeverTogether,
            )]));
        let a = fill(&ctx, SeatingAssignment::new(), &mut create_rng(0));
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn test_seeded_fill_reproducible() {
        let ctx = SeatingContext::new(
            roster(7),
            Layout::new(vec![Table::with_capacity(1, 4), Table::with_capacity(2, 4)]).unwrap(),
        )
        .unwrap();
        let a = fill(&ctx, SeatingAssignment::new(), &mut create_rng(77));
        let b = fill(&ctx, SeatingAssignment::new(), &mut create_rng(77));
        assert_eq!(a, b);
    }
}
