//! Seat → student mapping mutated by fills and the optimizer.

use std::collections::BTreeMap;

use super::layout::{SeatId, TableId};
use super::roster::{StudentId, StudentPair};
use crate::error::{Result, SeatingError};

/// One seat holding one student.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Placement {
    pub seat: SeatId,
    pub student: StudentId,
}

/// A total or partial injective mapping from seats to students.
///
/// Both directions are kept in ordered maps so that no seat holds two
/// students, no student holds two seats, and iteration order is stable
/// (table-major), which keeps seeded runs reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<Placement>", into = "Vec<Placement>")
)]
pub struct SeatingAssignment {
    by_seat: BTreeMap<SeatId, StudentId>,
    by_student: BTreeMap<StudentId, SeatId>,
}

impl SeatingAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an assignment from placements, rejecting double-booked
    /// seats and students seated twice.
    pub fn from_placements(placements: impl IntoIterator<Item = Placement>) -> Result<Self> {
        let mut assignment = Self::new();
        for p in placements {
            assignment.assign(p.seat, p.student)?;
        }
        Ok(assignment)
    }

    pub fn placements(&self) -> Vec<Placement> {
        self.iter()
            .map(|(seat, student)| Placement { seat, student })
            .collect()
    }

    /// Number of occupied seats.
    pub fn len(&self) -> usize {
        self.by_seat.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_seat.is_empty()
    }

    pub fn occupant(&self, seat: SeatId) -> Option<StudentId> {
        self.by_seat.get(&seat).copied()
    }

    pub fn seat_of(&self, student: StudentId) -> Option<SeatId> {
        self.by_student.get(&student).copied()
    }

    pub fn is_occupied(&self, seat: SeatId) -> bool {
        self.by_seat.contains_key(&seat)
    }

    pub fn is_seated(&self, student: StudentId) -> bool {
        self.by_student.contains_key(&student)
    }

    /// Seats `student` at the vacant `seat`.
    pub fn assign(&mut self, seat: SeatId, student: StudentId) -> Result<()> {
        if self.by_seat.contains_key(&seat) {
            return Err(SeatingError::SeatOccupied(seat));
        }
        if self.by_student.contains_key(&student) {
            return Err(SeatingError::DuplicateStudent(student));
        }
        self.by_seat.insert(seat, student);
        self.by_student.insert(student, seat);
        Ok(())
    }

    /// Empties `seat`, returning its former occupant.
    pub fn vacate(&mut self, seat: SeatId) -> Option<StudentId> {
        let student = self.by_seat.remove(&seat)?;
        self.by_student.remove(&student);
        Some(student)
    }

    /// Removes `student` from whatever seat they hold.
    pub fn unseat(&mut self, student: StudentId) -> Option<SeatId> {
        let seat = self.by_student.remove(&student)?;
        self.by_seat.remove(&seat);
        Some(seat)
    }

    /// Exchanges the occupants of two seats. Either seat may be vacant,
    /// in which case this is a relocation.
    pub fn swap(&mut self, a: SeatId, b: SeatId) {
        if a == b {
            return;
        }
        let sa = self.by_seat.remove(&a);
        let sb = self.by_seat.remove(&b);
        if let Some(s) = sa {
            self.by_seat.insert(b, s);
            self.by_student.insert(s, b);
        }
        if let Some(s) = sb {
            self.by_seat.insert(a, s);
            self.by_student.insert(s, a);
        }
    }

    /// Moves the occupant of `from` into the vacant seat `to`.
    pub fn relocate(&mut self, from: SeatId, to: SeatId) -> Result<()> {
        if self.by_seat.contains_key(&to) {
            return Err(SeatingError::SeatOccupied(to));
        }
        if let Some(student) = self.by_seat.remove(&from) {
            self.by_seat.insert(to, student);
            self.by_student.insert(student, to);
        }
        Ok(())
    }

    /// Occupied seats with their students, table-major.
    pub fn iter(&self) -> impl Iterator<Item = (SeatId, StudentId)> + '_ {
        self.by_seat.iter().map(|(&seat, &student)| (seat, student))
    }

    /// Occupied seat ids, table-major.
    pub fn occupied_seats(&self) -> impl Iterator<Item = SeatId> + '_ {
        self.by_seat.keys().copied()
    }

    /// Seated students in id order.
    pub fn students(&self) -> impl Iterator<Item = StudentId> + '_ {
        self.by_student.keys().copied()
    }

    /// Students sitting at `table`, in seat order.
    pub fn students_at(&self, table: TableId) -> Vec<StudentId> {
        let start = SeatId { table, number: 0 };
        self.by_seat
            .range(start..)
            .take_while(|(seat, _)| seat.table == table)
            .map(|(_, &student)| student)
            .collect()
    }

    /// Occupants grouped by table. Tables with nobody seated are absent.
    pub fn by_table(&self) -> BTreeMap<TableId, Vec<StudentId>> {
        let mut groups: BTreeMap<TableId, Vec<StudentId>> = BTreeMap::new();
        for (seat, student) in self.iter() {
            groups.entry(seat.table).or_default().push(student);
        }
        groups
    }

    /// Every unordered pair of students sharing a table.
    ///
    /// The persistence layer uses this to increment partnership history
    /// once an assignment is committed.
    pub fn co_seated_pairs(&self) -> Vec<StudentPair> {
        let mut pairs = Vec::new();
        for members in self.by_table().values() {
            for (i, &a) in members.iter().enumerate() {
                for &b in &members[i + 1..] {
                    pairs.extend(StudentPair::new(a, b));
                }
            }
        }
        pairs
    }
}

impl TryFrom<Vec<Placement>> for SeatingAssignment {
    type Error = SeatingError;

    fn try_from(placements: Vec<Placement>) -> Result<Self> {
        Self::from_placements(placements)
    }
}

impl From<SeatingAssignment> for Vec<Placement> {
    fn from(assignment: SeatingAssignment) -> Self {
        assignment.placements()
    }
}
