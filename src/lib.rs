//! Classroom seating optimization.
//!
//! Assigns students to table seats so that hard "never together" pairs
//! are separated, preferred partners sit together, repeat partnerships
//! are discouraged, and gender stays balanced per table.
//!
//! - **Model**: students, tables, seats and the seat → student
//!   [`SeatingAssignment`](model::SeatingAssignment).
//! - **Constraints**: five-level pairwise ratings, with
//!   `NEVER_TOGETHER` as the only hard constraint.
//! - **History**: prior co-seating counts and the lottery weights that
//!   keep randomized fills diverse.
//! - **Scoring**: a pure, weighted cost function (lower is better) with a
//!   per-term breakdown.
//! - **Neighbor generation**: swap and relocate moves that respect locks,
//!   deactivated seats and accessibility needs.
//! - **Simulated Annealing (SA)**: geometric cooling, best-so-far
//!   tracking, iteration, time, stagnation and cancellation limits, and a
//!   progress stream.
//! - **Fill modes**: random lottery, alphabetical, gender matching,
//!   gender balancing, smart pairing and full optimization.
//!
//! # Architecture
//!
//! Everything a run reads is gathered once in a
//! [`SeatingContext`](context::SeatingContext) and never mutated during
//! the run; each run owns the single assignment it changes. Reading the
//! roster from, and writing results back to, storage is the caller's job.

pub mod constraint;
pub mod context;
pub mod error;
pub mod fill;
pub mod history;
pub mod model;
pub mod neighbor;
pub mod random;
pub mod sa;
pub mod scoring;

pub use error::{Result, SeatingError};
