//! Seating data model.
//!
//! Students and tables come from the persistence layer as plain typed
//! data; [`SeatingAssignment`] is the only value mutated by a run.

mod assignment;
mod layout;
mod roster;

pub use assignment::{Placement, SeatingAssignment};
pub use layout::{Layout, Position, Seat, SeatId, Table, TableId, TableShape};
pub use roster::{Gender, Student, StudentId, StudentPair};
