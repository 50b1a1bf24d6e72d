//! Shared seeding steps: lock placement, accessibility placement and
//! the alphabetical fill.

use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::{debug, warn};

use crate::context::SeatingContext;
use crate::error::Result;
use crate::model::{SeatId, SeatingAssignment, StudentId};

/// Starting assignment for any fill: `current` (or nothing) with every
/// locked student on their seat.
///
/// Occupants that break a lock (a locked student elsewhere, anyone else
/// on a reserved seat) are unseated first.
pub(crate) fn prepare(
    ctx: &SeatingContext,
    current: Option<&SeatingAssignment>,
) -> Result<SeatingAssignment> {
    let mut a = match current {
        Some(c) => {
            ctx.validate_assignment(c)?;
            c.clone()
        }
        None => SeatingAssignment::new(),
    };

    let displaced: Vec<SeatId> = a
        .iter()
        .filter(|&(seat, student)| !ctx.can_sit(student, seat))
        .map(|(seat, _)| seat)
        .collect();
    for seat in displaced {
        if let Some(student) = a.vacate(seat) {
            debug!(%student, %seat, "unseated to honor a lock");
        }
    }
    for (student, seat) in ctx.locks() {
        if a.seat_of(student) != Some(seat) {
            a.assign(seat, student)?;
        }
    }
    Ok(a)
}

/// Places every waiting student with a mandatory accessibility need on
/// a random vacant accessible seat.
pub(crate) fn seat_accessibility_needs<R: Rng + ?Sized>(
    ctx: &SeatingContext,
    a: &mut SeatingAssignment,
    rng: &mut R,
) {
    let waiting: Vec<StudentId> = ctx
        .unassigned(a)
        .into_iter()
        .filter(|&s| ctx.needs_accessible_seat(s))
        .collect();
    for student in waiting {
        let options: Vec<SeatId> = ctx
            .vacant_seats(a)
            .into_iter()
            .filter(|&seat| ctx.can_sit(student, seat))
            .collect();
        match options.choose(rng) {
            Some(&seat) => {
                place(a, seat, student);
            }
            None => warn!(%student, "no accessible seat left"),
        }
    }
}

/// Fills vacant seats table by table with students in name order.
pub(crate) fn alphabetical<R: Rng + ?Sized>(
    ctx: &SeatingContext,
    mut a: SeatingAssignment,
    rng: &mut R,
) -> SeatingAssignment {
    seat_accessibility_needs(ctx, &mut a, rng);

    let mut waiting: Vec<_> = ctx.students().filter(|s| !a.is_seated(s.id)).collect();
    waiting.sort_by_cached_key(|s| (s.name.to_lowercase(), s.id));
    let mut pool: Vec<StudentId> = waiting.into_iter().map(|s| s.id).collect();

    let seats: Vec<SeatId> = ctx.vacant_seats(&a);
    for seat in seats {
        if let Some(pos) = pool.iter().position(|&s| ctx.can_sit(s, seat)) {
            let student = pool.remove(pos);
            place(&mut a, seat, student);
        }
    }
    warn_unplaced(ctx, &a);
    a
}

/// Seats `student` at a seat known to be vacant.
pub(crate) fn place(a: &mut SeatingAssignment, seat: SeatId, student: StudentId) -> bool {
    match a.assign(seat, student) {
        Ok(()) => true,
        Err(err) => {
            warn!(%err, "placement rejected");
            false
        }
    }
}

pub(crate) fn warn_unplaced(ctx: &SeatingContext, a: &SeatingAssignment) {
    let left = ctx.unassigned(a);
    if !left.is_empty() {
        warn!(count = left.len(), "students left without a seat");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SeatingError;
    use crate::model::{Gender, Layout, Seat, Student, Table, TableShape};
    use crate::random::create_rng;

    fn ctx() -> SeatingContext {
        let roster = vec![
            Student::new(1, "Charlie", Gender::Male),
            Student::new(2, "alice", Gender::Female),
            Student::new(3, "Bob", Gender::Male),
            Student::new(4, "Dana", Gender::Female).with_accessibility_need(),
        ];
        let layout = Layout::new(vec![
            Table::with_capacity(1, 2),
            Table::new(2, TableShape::Round, vec![Seat::new(1), Seat::new(2).accessible()]),
        ])
        .unwrap();
        SeatingContext::new(roster, layout).unwrap()
    }

    #[test]
    fn test_prepare_moves_lock_conflicts_aside() {
        let mut ctx = ctx();
        ctx.lock(StudentId(1), SeatId::new(1, 1)).unwrap();
        let mut current = SeatingAssignment::new();
        current.assign(SeatId::new(1, 1), StudentId(3)).unwrap();
        current.assign(SeatId::new(2, 1), StudentId(1)).unwrap();
        current.assign(SeatId::new(1, 2), StudentId(2)).unwrap();

        let a = prepare(&ctx, Some(&current)).unwrap();
        assert_eq!(a.seat_of(StudentId(1)), Some(SeatId::new(1, 1)));
        assert_eq!(a.seat_of(StudentId(2)), Some(SeatId::new(1, 2)));
        assert!(!a.is_seated(StudentId(3)));
    }

    #[test]
    fn test_prepare_keeps_a_lock_already_honored() {
        let mut ctx = ctx();
        ctx.lock(StudentId(1), SeatId::new(1, 1)).unwrap();
        let mut current = SeatingAssignment::new();
        current.assign(SeatId::new(1, 1), StudentId(1)).unwrap();
        current.assign(SeatId::new(1, 2), StudentId(3)).unwrap();

        let a = prepare(&ctx, Some(&current)).unwrap();
        assert_eq!(a, current);
    }

    #[test]
    fn test_prepare_rejects_unknown_student() {
        let mut current = SeatingAssignment::new();
        current.assign(SeatId::new(1, 1), StudentId(99)).unwrap();
        assert_eq!(
            prepare(&ctx(), Some(&current)).unwrap_err(),
            SeatingError::UnknownStudent(StudentId(99))
        );
    }

    #[test]
    fn test_alphabetical_order() {
        let ctx = ctx();
        let a = alphabetical(&ctx, SeatingAssignment::new(), &mut create_rng(0));
        assert_eq!(a.seat_of(StudentId(4)), Some(SeatId::new(2, 2)));
        // alice, Bob, Charlie in table-major seat order, case-insensitive
        assert_eq!(a.occupant(SeatId::new(1, 1)), Some(StudentId(2)));
        assert_eq!(a.occupant(SeatId::new(1, 2)), Some(StudentId(3)));
        assert_eq!(a.occupant(SeatId::new(2, 1)), Some(StudentId(1)));
    }

    #[test]
    fn test_accessibility_without_room_leaves_student_waiting() {
        let ctx = ctx();
        let mut a = SeatingAssignment::new();
        a.assign(SeatId::new(2, 2), StudentId(2)).unwrap();
        seat_accessibility_needs(&ctx, &mut a, &mut create_rng(0));
        assert!(!a.is_seated(StudentId(4)));
    }
}
