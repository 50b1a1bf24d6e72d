//! Single-student partner search.

use std::cmp::Reverse;

use tracing::debug;

use super::lottery::group_weight;
use crate::context::SeatingContext;
use crate::error::{Result, SeatingError};
use crate::model::{SeatId, SeatingAssignment, StudentId};
use crate::scoring::Scorer;

/// Seats `student` at `seat`, then fills one more seat at that table
/// with the waiting student whose marginal cost against the table is
/// lowest.
///
/// Ties on cost go to the candidate with more lottery balls, then to
/// the lower id. Returns the chosen partner, or `None` when nobody is
/// waiting who may sit there.
pub(crate) fn place(
    ctx: &SeatingContext,
    scorer: &Scorer<'_>,
    mut a: SeatingAssignment,
    student: StudentId,
    seat: SeatId,
) -> Result<(SeatingAssignment, Option<StudentId>)> {
    if ctx.student(student).is_none() {
        return Err(SeatingError::UnknownStudent(student));
    }
    if !ctx.layout().is_active_seat(seat) {
        return Err(SeatingError::UnknownSeat(seat));
    }
    if ctx.locked_seat(student).is_some_and(|locked| locked != seat) {
        return Err(SeatingError::StudentLocked(student));
    }
    if ctx.needs_accessible_seat(student) && !ctx.layout().is_accessible(seat) {
        return Err(SeatingError::InaccessibleSeat { student, seat });
    }
    let reserved_for_other = ctx.is_reserved(seat) && ctx.locked_seat(student) != Some(seat);
    if reserved_for_other || a.occupant(seat).is_some_and(|occupant| occupant != student) {
        return Err(SeatingError::SeatOccupied(seat));
    }

    a.unseat(student);
    a.assign(seat, student)?;

    let table = seat.table;
    let vacant: Vec<SeatId> = ctx
        .vacant_seats(&a)
        .into_iter()
        .filter(|s| s.table == table)
        .collect();
    if vacant.is_empty() {
        return Err(SeatingError::NoVacantSeat(table));
    }

    let members = a.students_at(table);
    let partner = ctx
        .unassigned(&a)
        .into_iter()
        .filter(|&c| vacant.iter().any(|&v| ctx.can_sit(c, v)))
        .map(|c| {
            let cost = scorer.marginal_cost(&members, c);
            let balls = group_weight(ctx, &members, c, false);
            (c, cost, balls)
        })
        .min_by(|x, y| {
            x.1.total_cmp(&y.1)
                .then_with(|| Reverse(x.2).cmp(&Reverse(y.2)))
                .then_with(|| x.0.cmp(&y.0))
        })
        .map(|(c, cost, _)| {
            debug!(partner = %c, cost, %table, "smart pair partner");
            c
        });

    let Some(partner) = partner else {
        debug!(%student, %table, "no partner available");
        return Ok((a, None));
    };

    // keep accessible seats for students who need them
    let needs = ctx.needs_accessible_seat(partner);
    let target = vacant
        .iter()
        .copied()
        .filter(|&v| ctx.can_sit(partner, v))
        .min_by_key(|&v| (!needs && ctx.layout().is_accessible(v), v));
    match target {
        Some(v) => a.assign(v, partner)?,
        None => return Ok((a, None)),
    }
    Ok((a, Some(partner)))
}
