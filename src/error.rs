//! Error types for seating operations.

use thiserror::Error;

use crate::model::{SeatId, StudentId, TableId};

/// Errors raised before a fill or optimization run starts.
///
/// Runtime outcomes (time limit, cancellation, unsatisfiable
/// never-together pairs) are not errors; they are reported through
/// [`TerminationReason`](crate::sa::TerminationReason) and
/// [`Diagnostics`](crate::fill::Diagnostics).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeatingError {
    /// The roster is empty.
    #[error("No students available to seat")]
    NoStudents,

    /// No tables, or no active seats, were supplied.
    #[error("No classroom layout with active seats")]
    NoLayout,

    /// Optimizer configuration is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A student id that is not part of the roster.
    #[error("Unknown student {0}")]
    UnknownStudent(StudentId),

    /// A seat id that is not part of the layout (or is deactivated).
    #[error("Unknown or inactive seat {0}")]
    UnknownSeat(SeatId),

    /// The same student appears twice in a roster or assignment.
    #[error("Student {0} appears more than once")]
    DuplicateStudent(StudentId),

    /// The same seat appears twice in a layout.
    #[error("Seat {0} is defined more than once")]
    DuplicateSeat(SeatId),

    /// The target seat already holds a student.
    #[error("Seat {0} is already occupied")]
    SeatOccupied(SeatId),

    /// The student is locked to another seat.
    #[error("Student {0} is locked to a different seat")]
    StudentLocked(StudentId),

    /// A student with a mandatory accessibility need was given a regular seat.
    #[error("Student {student} requires an accessible seat, {seat} is not")]
    InaccessibleSeat {
        /// The student with the need.
        student: StudentId,
        /// The offending seat.
        seat: SeatId,
    },

    /// The table has no vacant active seat left.
    #[error("Table {0} has no vacant seat")]
    NoVacantSeat(TableId),
}

/// Result type alias for seating operations.
pub type Result<T> = std::result::Result<T, SeatingError>;
