//! Move generation over seat assignments.
//!
//! Two move types, chosen uniformly at random:
//!
//! - **swap**: exchange the occupants of two occupied seats;
//! - **relocate**: move one occupant to a vacant seat.
//!
//! Locked students never move, lock-reserved seats never receive anyone
//! else, and a student with a mandatory accessibility need is never
//! proposed onto a regular seat. Illegal picks are rejected at generation
//! time and retried a bounded number of times, so a proposal always
//! terminates.

use rand::Rng;
use tracing::trace;

use crate::context::SeatingContext;
use crate::model::{SeatId, SeatingAssignment};

/// Default number of picks tried before giving up on a proposal.
pub const DEFAULT_MAX_ATTEMPTS: usize = 5;

/// Kind of perturbation applied to produce a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MoveKind {
    Swap,
    Relocate,
}

/// Proposal/acceptance counters for one move kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveCounter {
    pub proposed: usize,
    pub accepted: usize,
}

impl MoveCounter {
    /// Fraction of proposals accepted, 0 when nothing was proposed.
    pub fn acceptance_rate(&self) -> f64 {
        if self.proposed == 0 {
            0.0
        } else {
            self.accepted as f64 / self.proposed as f64
        }
    }
}

/// Per-kind move statistics of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveStats {
    pub swap: MoveCounter,
    pub relocate: MoveCounter,
}

impl MoveStats {
    pub fn record_proposal(&mut self, kind: MoveKind) {
        self.counter_mut(kind).proposed += 1;
    }

    pub fn record_acceptance(&mut self, kind: MoveKind) {
        self.counter_mut(kind).accepted += 1;
    }

    pub fn counter(&self, kind: MoveKind) -> &MoveCounter {
        match kind {
            MoveKind::Swap => &self.swap,
            MoveKind::Relocate => &self.relocate,
        }
    }

    fn counter_mut(&mut self, kind: MoveKind) -> &mut MoveCounter {
        match kind {
            MoveKind::Swap => &mut self.swap,
            MoveKind::Relocate => &mut self.relocate,
        }
    }

    pub fn total_proposed(&self) -> usize {
        self.swap.proposed + self.relocate.proposed
    }
}

/// A candidate assignment together with the move that produced it.
#[derive(Debug, Clone)]
pub struct Proposal {
    pub assignment: SeatingAssignment,
    pub kind: MoveKind,
}

/// Produces random neighbors of an assignment.
#[derive(Debug, Clone, Copy)]
pub struct NeighborGenerator<'a> {
    ctx: &'a SeatingContext,
    max_attempts: usize,
}

impl<'a> NeighborGenerator<'a> {
    pub fn new(ctx: &'a SeatingContext) -> Self {
        Self {
            ctx,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Proposes one neighbor of `assignment`.
    ///
    /// Returns `None` when no legal move exists or every attempt picked
    /// an illegal one; the caller treats that as a no-op iteration.
    pub fn propose<R: Rng + ?Sized>(
        &self,
        assignment: &SeatingAssignment,
        rng: &mut R,
    ) -> Option<Proposal> {
        let movable: Vec<SeatId> = assignment
            .iter()
            .filter(|&(_, student)| !self.ctx.is_locked(student))
            .map(|(seat, _)| seat)
            .collect();
        let vacant: Vec<SeatId> = self
            .ctx
            .vacant_seats(assignment)
            .into_iter()
            .filter(|&seat| !self.ctx.is_reserved(seat))
            .collect();

        let can_swap = movable.len() >= 2;
        let can_relocate = !movable.is_empty() && !vacant.is_empty();

        for attempt in 0..self.max_attempts {
            let kind = match (can_swap, can_relocate) {
                (true, true) => {
                    if rng.random_bool(0.5) {
                        MoveKind::Swap
                    } else {
                        MoveKind::Relocate
                    }
                }
                (true, false) => MoveKind::Swap,
                (false, true) => MoveKind::Relocate,
                (false, false) => return None,
            };

            let candidate = match kind {
                MoveKind::Swap => self.try_swap(assignment, &movable, rng),
                MoveKind::Relocate => self.try_relocate(assignment, &movable, &vacant, rng),
            };
            if let Some(assignment) = candidate {
                return Some(Proposal { assignment, kind });
            }
            trace!(attempt, ?kind, "rejected illegal move");
        }
        None
    }

    fn try_swap<R: Rng + ?Sized>(
        &self,
        assignment: &SeatingAssignment,
        movable: &[SeatId],
        rng: &mut R,
    ) -> Option<SeatingAssignment> {
        let i = rng.random_range(0..movable.len());
        // second index drawn from the remaining n-1 seats
        let mut j = rng.random_range(0..movable.len() - 1);
        if j >= i {
            j += 1;
        }
        let (a, b) = (movable[i], movable[j]);
        let sa = assignment.occupant(a)?;
        let sb = assignment.occupant(b)?;
        if !self.ctx.can_sit(sa, b) || !self.ctx.can_sit(sb, a) {
            return None;
        }
        let mut next = assignment.clone();
        next.swap(a, b);
        Some(next)
    }

    fn try_relocate<R: Rng + ?Sized>(
        &self,
        assignment: &SeatingAssignment,
        movable: &[SeatId],
        vacant: &[SeatId],
        rng: &mut R,
    ) -> Option<SeatingAssignment> {
        let from = movable[rng.random_range(0..movable.len())];
        let to = vacant[rng.random_range(0..vacant.len())];
        let student = assignment.occupant(from)?;
        if !self.ctx.can_sit(student, to) {
            return None;
        }
        let mut next = assignment.clone();
        next.relocate(from, to).ok()?;
        Some(next)
    }
}
