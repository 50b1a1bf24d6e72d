//! Simulated Annealing (SA) controller.
//!
//! A single-solution trajectory search. Worsening moves are accepted with
//! probability `exp(-Δ/T)`, where the temperature `T` decays
//! geometrically every iteration down to a floor. The best solution is
//! tracked apart from the walked one and is what a run returns.
//!
//! A run stops on the first of: iteration budget, wall-clock budget,
//! stagnation, or cooperative cancellation through [`RunControl`].
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Cerny (1985), "Thermodynamical Approach to the Travelling Salesman Problem"

mod config;
mod progress;
mod runner;
mod types;

pub use config::{OptimizerConfig, Preset};
pub use progress::{ProgressEvent, ProgressSender, ProgressStream, RunControl};
pub use runner::{SaResult, SaRunner, TerminationReason};
pub use types::SaProblem;
