//! SA execution loop.

use std::fmt;
use std::time::{Duration, Instant};

use rand::Rng;
use tracing::{debug, info, trace};

use super::config::OptimizerConfig;
use super::progress::{ProgressEvent, RunControl};
use super::types::SaProblem;
use crate::error::Result;
use crate::neighbor::MoveStats;
use crate::random::rng_from_seed;

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum TerminationReason {
    /// No new best within `max_no_improve` iterations.
    Converged,
    /// Wall-clock limit reached, checked every `progress_interval` iterations.
    TimeLimitExceeded,
    /// `max_iterations` executed.
    IterationLimitExceeded,
    /// External cancellation observed. The best assignment is still returned.
    Cancelled,
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TerminationReason::Converged => "converged",
            TerminationReason::TimeLimitExceeded => "time limit exceeded",
            TerminationReason::IterationLimitExceeded => "iteration limit exceeded",
            TerminationReason::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// Result of a simulated annealing run.
#[derive(Debug, Clone)]
pub struct SaResult<S: Clone> {
    /// The best solution found.
    pub best: S,

    /// Cost of the best solution.
    pub best_cost: f64,

    /// Cost of the seed solution.
    pub initial_cost: f64,

    /// Iterations executed, including no-op proposals.
    pub iterations: usize,

    /// Temperature when the run stopped.
    pub final_temperature: f64,

    /// Number of accepted moves (including improvements).
    pub accepted_moves: usize,

    /// Number of strictly improving moves.
    pub improving_moves: usize,

    /// Per move-kind proposal and acceptance counts.
    pub move_stats: MoveStats,

    /// Why the run stopped.
    pub termination: TerminationReason,

    /// Wall-clock time of the run.
    pub elapsed: Duration,

    /// Best cost sampled every `progress_interval` iterations.
    pub cost_history: Vec<f64>,
}

/// Executes simulated annealing.
pub struct SaRunner;

impl SaRunner {
    /// Runs SA from `initial` with no cancellation or progress hooks.
    pub fn run<P: SaProblem>(
        problem: &P,
        initial: P::Solution,
        config: &OptimizerConfig,
    ) -> Result<SaResult<P::Solution>> {
        Self::run_with_control(problem, initial, config, &RunControl::default())
    }

    /// Runs SA observing `control` at every iteration boundary.
    ///
    /// Fails only when `config` is invalid, before any search begins.
    /// Every limit, including cancellation, ends the run normally with
    /// the best solution seen.
    pub fn run_with_control<P: SaProblem>(
        problem: &P,
        initial: P::Solution,
        config: &OptimizerConfig,
        control: &RunControl,
    ) -> Result<SaResult<P::Solution>> {
        config.validate()?;

        let mut rng = rng_from_seed(config.seed);
        let start = Instant::now();

        // current is the random walk, best is what gets reported
        let mut current = initial;
        let mut current_cost = problem.cost(&current);
        let mut best = current.clone();
        let mut best_cost = current_cost;
        let initial_cost = current_cost;

        let mut temperature = config.initial_temperature;
        let mut iterations = 0usize;
        let mut accepted_moves = 0usize;
        let mut improving_moves = 0usize;
        let mut since_improvement = 0usize;
        let mut move_stats = MoveStats::default();
        let mut cost_history = vec![best_cost];

        info!(
            initial_cost,
            max_iterations = config.max_iterations,
            initial_temperature = config.initial_temperature,
            "starting simulated annealing"
        );

        let termination = loop {
            if iterations >= config.max_iterations {
                break TerminationReason::IterationLimitExceeded;
            }
            if control.is_cancelled() {
                break TerminationReason::Cancelled;
            }
            if iterations > 0 && iterations % config.progress_interval == 0 {
                let elapsed = start.elapsed();
                cost_history.push(best_cost);
                control.report(progress_event(iterations, best_cost, elapsed));
                if config.time_limit.is_some_and(|limit| elapsed >= limit) {
                    break TerminationReason::TimeLimitExceeded;
                }
            }
            if config.max_no_improve > 0 && since_improvement >= config.max_no_improve {
                break TerminationReason::Converged;
            }

            since_improvement += 1;
            if let Some((candidate, kind)) = problem.neighbor(&current, &mut rng) {
                move_stats.record_proposal(kind);
                let candidate_cost = problem.cost(&candidate);
                let delta = candidate_cost - current_cost;

                // Metropolis acceptance criterion
                let accept = delta <= 0.0 || rng.random::<f64>() < (-delta / temperature).exp();

                if accept {
                    if delta < 0.0 {
                        improving_moves += 1;
                    }
                    accepted_moves += 1;
                    move_stats.record_acceptance(kind);
                    current = candidate;
                    current_cost = candidate_cost;

                    if current_cost < best_cost {
                        best = current.clone();
                        best_cost = current_cost;
                        since_improvement = 0;
                        debug!(iteration = iterations, best_cost, temperature, "new best");
                    }
                }
            } else {
                trace!(iteration = iterations, "no legal move");
            }

            iterations += 1;
            temperature = (temperature * config.cooling_rate).max(config.min_temperature);
        };

        let elapsed = start.elapsed();
        if cost_history.last() != Some(&best_cost) {
            cost_history.push(best_cost);
        }
        control.report(progress_event(iterations, best_cost, elapsed));

        info!(
            iterations,
            best_cost,
            accepted_moves,
            %termination,
            elapsed_ms = elapsed.as_millis() as u64,
            "simulated annealing finished"
        );

        Ok(SaResult {
            best,
            best_cost,
            initial_cost,
            iterations,
            final_temperature: temperature,
            accepted_moves,
            improving_moves,
            move_stats,
            termination,
            elapsed,
            cost_history,
        })
    }
}

fn progress_event(iteration: usize, best_score: f64, elapsed: Duration) -> ProgressEvent {
    ProgressEvent {
        iteration,
        best_score,
        elapsed_ms: elapsed.as_millis() as u64,
    }
}
