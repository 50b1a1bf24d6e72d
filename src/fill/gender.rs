//! Gender-driven fills.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use rand::seq::IndexedRandom;
use rand::Rng;

use super::lottery::group_weight;
use super::seed::{place, seat_accessibility_needs, warn_unplaced};
use crate::context::SeatingContext;
use crate::model::{Gender, SeatId, SeatingAssignment, StudentId};

/// Groups same-gender students at the same tables.
///
/// Each table adopts the majority gender of whoever already sits there,
/// or the largest waiting group when it is empty, and is filled from
/// that group until it runs out. Among same-gender candidates the one
/// with the most lottery balls (fewest past pairings) wins.
pub(crate) fn match_gender<R: Rng + ?Sized>(
    ctx: &SeatingContext,
    mut a: SeatingAssignment,
    rng: &mut R,
) -> SeatingAssignment {
    seat_accessibility_needs(ctx, &mut a, rng);
    let mut pool = ctx.unassigned(&a);

    for table in ctx.layout().tables() {
        let mut target: Option<Gender> = None;
        for seat in table.active_seats() {
            if pool.is_empty() {
                break;
            }
            if a.is_occupied(seat) {
                continue;
            }
            let members = a.students_at(table.id);
            let eligible = eligible(ctx, &pool, seat);
            if eligible.is_empty() {
                continue;
            }

            let mut gender = *target.get_or_insert_with(|| majority(ctx, &members, &pool));
            if !eligible.iter().any(|&s| ctx.gender(s) == gender) {
                // group used up: continue with the largest one left
                gender = largest_group(ctx, &eligible);
                target = Some(gender);
            }
            let candidates: Vec<StudentId> = eligible
                .into_iter()
                .filter(|&s| ctx.gender(s) == gender)
                .collect();
            if let Some(student) = best_partner(ctx, &members, &candidates, rng) {
                if place(&mut a, seat, student) {
                    pool.retain(|&s| s != student);
                }
            }
        }
    }
    warn_unplaced(ctx, &a);
    a
}

/// Round-robin fill that keeps every table's male/female counts close.
///
/// Each round gives every table at most one more student, choosing the
/// gender that leaves the table least imbalanced; ties go to the larger
/// waiting group so neither gender is exhausted early.
pub(crate) fn balance_gender<R: Rng + ?Sized>(
    ctx: &SeatingContext,
    mut a: SeatingAssignment,
    rng: &mut R,
) -> SeatingAssignment {
    seat_accessibility_needs(ctx, &mut a, rng);
    let mut pool = ctx.unassigned(&a);

    loop {
        let mut placed_any = false;
        for table in ctx.layout().tables() {
            if pool.is_empty() {
                break;
            }
            let Some((seat, eligible)) = table
                .active_seats()
                .filter(|&seat| !a.is_occupied(seat))
                .map(|seat| (seat, eligible(ctx, &pool, seat)))
                .find(|(_, eligible)| !eligible.is_empty())
            else {
                continue;
            };

            let members = a.students_at(table.id);
            let (males, females) = binary_counts(ctx, &members);
            let sizes = group_sizes(ctx, &pool);
            let Some(gender) = sizes
                .keys()
                .copied()
                .filter(|&g| eligible.iter().any(|&s| ctx.gender(s) == g))
                .min_by_key(|&g| {
                    let imbalance = match g {
                        Gender::Male => (males + 1 - females).abs(),
                        Gender::Female => (males - females - 1).abs(),
                        Gender::Other | Gender::Unset => (males - females).abs(),
                    };
                    (imbalance, Reverse(sizes[&g]), g)
                })
            else {
                continue;
            };

            let candidates: Vec<StudentId> = eligible
                .into_iter()
                .filter(|&s| ctx.gender(s) == gender)
                .collect();
            if let Some(student) = best_partner(ctx, &members, &candidates, rng) {
                if place(&mut a, seat, student) {
                    pool.retain(|&s| s != student);
                    placed_any = true;
                }
            }
        }
        if !placed_any {
            break;
        }
    }
    warn_unplaced(ctx, &a);
    a
}

fn eligible(ctx: &SeatingContext, pool: &[StudentId], seat: SeatId) -> Vec<StudentId> {
    pool.iter()
        .copied()
        .filter(|&s| ctx.can_sit(s, seat))
        .collect()
}

fn group_sizes(ctx: &SeatingContext, students: &[StudentId]) -> BTreeMap<Gender, usize> {
    let mut sizes = BTreeMap::new();
    for &s in students {
        *sizes.entry(ctx.gender(s)).or_insert(0) += 1;
    }
    sizes
}

/// Largest gender group among `students`; ties go to the lower variant.
fn largest_group(ctx: &SeatingContext, students: &[StudentId]) -> Gender {
    group_sizes(ctx, students)
        .into_iter()
        .min_by_key(|&(g, n)| (Reverse(n), g))
        .map(|(g, _)| g)
        .unwrap_or_default()
}

/// Majority gender at a table, falling back to the largest waiting group.
fn majority(ctx: &SeatingContext, members: &[StudentId], pool: &[StudentId]) -> Gender {
    if members.is_empty() {
        largest_group(ctx, pool)
    } else {
        largest_group(ctx, members)
    }
}

fn binary_counts(ctx: &SeatingContext, members: &[StudentId]) -> (i64, i64) {
    members
        .iter()
        .fold((0, 0), |(m, f), &s| match ctx.gender(s) {
            Gender::Male => (m + 1, f),
            Gender::Female => (m, f + 1),
            Gender::Other | Gender::Unset => (m, f),
        })
}

/// Candidate with the most lottery balls against `members`; ties are
/// broken at random.
fn best_partner<R: Rng + ?Sized>(
    ctx: &SeatingContext,
    members: &[StudentId],
    candidates: &[StudentId],
    rng: &mut R,
) -> Option<StudentId> {
    let weights: Vec<u64> = candidates
        .iter()
        .map(|&c| group_weight(ctx, members, c, true))
        .collect();
    let top = weights.iter().copied().max()?;
    let tied: Vec<StudentId> = candidates
        .iter()
        .zip(&weights)
        .filter(|&(_, &w)| w == top)
        .map(|(&c, _)| c)
        .collect();
    tied.choose(rng).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{HistoryTracker, PartnershipHistory};
    use crate::model::{Layout, Student, Table, TableId};
    use crate::random::create_rng;

    fn ctx(males: u32, females: u32, tables: &[u32]) -> SeatingContext {
        let roster = (1..=males + females)
            .map(|i| {
                let g = if i <= males { Gender::Male } else { Gender::Female };
                Student::new(i, format!("S{i}"), g)
            })
            .collect();
        let layout = Layout::new(
            tables
                .iter()
                .enumerate()
                .map(|(i, &cap)| Table::with_capacity(i as u32 + 1, cap))
                .collect(),
        )
        .unwrap();
        SeatingContext::new(roster, layout).unwrap()
    }

    fn counts_at(ctx: &SeatingContext, a: &SeatingAssignment, table: u32) -> (i64, i64) {
        binary_counts(ctx, &a.students_at(TableId(table)))
    }

    #[test]
    fn test_match_gender_groups_tables() {
        let ctx = ctx(4, 4, &[4, 4]);
        for seed in 0..10 {
            let a = match_gender(&ctx, SeatingAssignment::new(), &mut create_rng(seed));
            assert_eq!(a.len(), 8);
            assert_eq!(counts_at(&ctx, &a, 1), (4, 0));
            assert_eq!(counts_at(&ctx, &a, 2), (0, 4));
        }
    }

    #[test]
    fn test_match_gender_spills_over_when_group_runs_out() {
        let ctx = ctx(5, 3, &[4, 4]);
        let a = match_gender(&ctx, SeatingAssignment::new(), &mut create_rng(1));
        assert_eq!(a.len(), 8);
        assert_eq!(counts_at(&ctx, &a, 1), (4, 0));
        assert_eq!(counts_at(&ctx, &a, 2), (1, 3));
    }

    #[test]
    fn test_match_gender_prefers_fresh_partners() {
        // S1 sits at table 1; S2 has been paired with S1 often, S3 never
        let ctx = ctx(3, 0, &[2, 1]).with_history(HistoryTracker::from_records([PartnershipHistory::new(1, 2, 5)]));
        let mut base = SeatingAssignment::new();
        base.assign(SeatId::new(1, 1), StudentId(1)).unwrap();
        let a = match_gender(&ctx, base, &mut create_rng(0));
        assert_eq!(a.occupant(SeatId::new(1, 2)), Some(StudentId(3)));
    }

    #[test]
    fn test_balance_gender_even_split() {
        let ctx = ctx(4, 4, &[4, 4]);
        for seed in 0..10 {
            let a = balance_gender(&ctx, SeatingAssignment::new(), &mut create_rng(seed));
            assert_eq!(a.len(), 8);
            assert_eq!(counts_at(&ctx, &a, 1), (2, 2));
            assert_eq!(counts_at(&ctx, &a, 2), (2, 2));
        }
    }

    #[test]
    fn test_balance_gender_spreads_minority() {
        let ctx = ctx(6, 2, &[4, 4]);
        let a = balance_gender(&ctx, SeatingAssignment::new(), &mut create_rng(3));
        assert_eq!(counts_at(&ctx, &a, 1), (3, 1));
        assert_eq!(counts_at(&ctx, &a, 2), (3, 1));
    }

    #[test]
    fn test_balance_gender_more_seats_than_students() {
        let ctx = ctx(2, 1, &[4, 4, 4]);
        let a = balance_gender(&ctx, SeatingAssignment::new(), &mut create_rng(0));
        assert_eq!(a.len(), 3);
        assert!(ctx.unassigned(&a).is_empty());
    }
}
