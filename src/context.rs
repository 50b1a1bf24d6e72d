//! Problem instance: everything a run reads but never mutates.

use std::collections::BTreeMap;

use crate::constraint::ConstraintModel;
use crate::error::{Result, SeatingError};
use crate::history::HistoryTracker;
use crate::model::{Gender, Layout, SeatId, SeatingAssignment, Student, StudentId};

/// Roster, layout, ratings, history and locked seats for one class.
///
/// Preconditions (non-empty roster, a layout with active seats, unique
/// students) are checked once at construction so that fills and the
/// optimizer can fail fast before any search begins.
#[derive(Debug, Clone)]
pub struct SeatingContext {
    students: BTreeMap<StudentId, Student>,
    layout: Layout,
    constraints: ConstraintModel,
    history: HistoryTracker,
    locks: BTreeMap<StudentId, SeatId>,
}

impl SeatingContext {
    pub fn new(roster: Vec<Student>, layout: Layout) -> Result<Self> {
        if roster.is_empty() {
            return Err(SeatingError::NoStudents);
        }
        if layout.is_empty() {
            return Err(SeatingError::NoLayout);
        }
        let mut students = BTreeMap::new();
        for s in roster {
            let id = s.id;
            if students.insert(id, s).is_some() {
                return Err(SeatingError::DuplicateStudent(id));
            }
        }
        Ok(Self {
            students,
            layout,
            constraints: ConstraintModel::new(),
            history: HistoryTracker::new(),
            locks: BTreeMap::new(),
        })
    }

    pub fn with_constraints(mut self, constraints: ConstraintModel) -> Self {
        self.constraints = constraints;
        self
    }

    pub fn with_history(mut self, history: HistoryTracker) -> Self {
        self.history = history;
        self
    }

    /// Pins `student` to `seat` for every fill and optimization.
    pub fn lock(&mut self, student: StudentId, seat: SeatId) -> Result<()> {
        let s = self
            .students
            .get(&student)
            .ok_or(SeatingError::UnknownStudent(student))?;
        if !self.layout.is_active_seat(seat) {
            return Err(SeatingError::UnknownSeat(seat));
        }
        if s.needs_accessible_seat && !self.layout.is_accessible(seat) {
            return Err(SeatingError::InaccessibleSeat { student, seat });
        }
        if self
            .locks
            .iter()
            .any(|(&other, &locked)| locked == seat && other != student)
        {
            return Err(SeatingError::SeatOccupied(seat));
        }
        self.locks.insert(student, seat);
        Ok(())
    }

    pub fn unlock(&mut self, student: StudentId) -> Option<SeatId> {
        self.locks.remove(&student)
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn constraints(&self) -> &ConstraintModel {
        &self.constraints
    }

    pub fn history(&self) -> &HistoryTracker {
        &self.history
    }

    pub fn student(&self, id: StudentId) -> Option<&Student> {
        self.students.get(&id)
    }

    /// Roster in id order.
    pub fn students(&self) -> impl Iterator<Item = &Student> {
        self.students.values()
    }

    pub fn student_count(&self) -> usize {
        self.students.len()
    }

    pub fn gender(&self, id: StudentId) -> Gender {
        self.students.get(&id).map(|s| s.gender).unwrap_or_default()
    }

    pub fn needs_accessible_seat(&self, id: StudentId) -> bool {
        self.students
            .get(&id)
            .is_some_and(|s| s.needs_accessible_seat)
    }

    /// Whether `student` may legally occupy `seat` (ignoring occupancy).
    pub fn can_sit(&self, student: StudentId, seat: SeatId) -> bool {
        if !self.layout.is_active_seat(seat) {
            return false;
        }
        if self.needs_accessible_seat(student) && !self.layout.is_accessible(seat) {
            return false;
        }
        match self.locks.get(&student) {
            Some(&locked) => locked == seat,
            None => !self.is_reserved(seat),
        }
    }

    pub fn locked_seat(&self, student: StudentId) -> Option<SeatId> {
        self.locks.get(&student).copied()
    }

    pub fn is_locked(&self, student: StudentId) -> bool {
        self.locks.contains_key(&student)
    }

    /// Whether `seat` is the lock target of some student.
    pub fn is_reserved(&self, seat: SeatId) -> bool {
        self.locks.values().any(|&s| s == seat)
    }

    pub fn locks(&self) -> impl Iterator<Item = (StudentId, SeatId)> + '_ {
        self.locks.iter().map(|(&student, &seat)| (student, seat))
    }

    /// Checks a caller-supplied assignment against roster and layout.
    ///
    /// Every occupant must be on the roster, every seat active, and
    /// students with an accessibility need must sit on accessible seats.
    pub fn validate_assignment(&self, assignment: &SeatingAssignment) -> Result<()> {
        for (seat, student) in assignment.iter() {
            if !self.students.contains_key(&student) {
                return Err(SeatingError::UnknownStudent(student));
            }
            if !self.layout.is_active_seat(seat) {
                return Err(SeatingError::UnknownSeat(seat));
            }
            if self.needs_accessible_seat(student) && !self.layout.is_accessible(seat) {
                return Err(SeatingError::InaccessibleSeat { student, seat });
            }
        }
        Ok(())
    }

    /// Roster students without a seat in `assignment`, in id order.
    pub fn unassigned(&self, assignment: &SeatingAssignment) -> Vec<StudentId> {
        self.students
            .keys()
            .copied()
            .filter(|&id| !assignment.is_seated(id))
            .collect()
    }

    /// Active seats without an occupant, table-major.
    pub fn vacant_seats(&self, assignment: &SeatingAssignment) -> Vec<SeatId> {
        self.layout
            .active_seats()
            .filter(|&seat| !assignment.is_occupied(seat))
            .collect()
    }
}
