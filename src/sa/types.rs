//! Core trait for simulated annealing.

use rand::Rng;

use crate::neighbor::MoveKind;

/// Defines a simulated annealing problem.
///
/// The implementor supplies cost evaluation and neighbor generation.
/// The runner handles temperature, acceptance, limits and reporting.
///
/// # Minimization
///
/// SA minimizes the cost function. For maximization, negate the cost.
///
/// # References
///
/// Kirkpatrick et al. (1983), Cerny (1985)
pub trait SaProblem {
    /// The solution representation type.
    type Solution: Clone;

    /// Computes the cost of a solution. Lower is better. Must be pure.
    fn cost(&self, solution: &Self::Solution) -> f64;

    /// Generates a neighbor of the current solution and the kind of
    /// move that produced it.
    ///
    /// `None` means no legal move was found; the runner counts the
    /// iteration as a no-op.
    fn neighbor<R: Rng>(
        &self,
        solution: &Self::Solution,
        rng: &mut R,
    ) -> Option<(Self::Solution, MoveKind)>;
}
