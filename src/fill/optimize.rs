//! "Optimize All": simulated annealing over the whole arrangement.

use std::time::Instant;

use rand::Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::debug;

use super::{lottery, FillOutcome, SeatingPlanner};
use crate::context::SeatingContext;
use crate::error::{Result, SeatingError};
use crate::model::SeatingAssignment;
use crate::neighbor::{MoveKind, NeighborGenerator};
use crate::random::create_rng;
use crate::sa::{OptimizerConfig, ProgressEvent, RunControl, SaProblem, SaRunner};
use crate::scoring::{Scorer, ScoringWeights};

/// The seating arrangement as an SA problem: cost is the score, moves
/// come from the [`NeighborGenerator`].
#[derive(Debug, Clone, Copy)]
pub struct SeatingProblem<'a> {
    scorer: Scorer<'a>,
    generator: NeighborGenerator<'a>,
}

impl<'a> SeatingProblem<'a> {
    pub fn new(ctx: &'a SeatingContext) -> Self {
        Self {
            scorer: Scorer::new(ctx),
            generator: NeighborGenerator::new(ctx),
        }
    }

    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.scorer = self.scorer.with_weights(weights);
        self
    }

    pub fn scorer(&self) -> &Scorer<'a> {
        &self.scorer
    }
}

impl SaProblem for SeatingProblem<'_> {
    type Solution = SeatingAssignment;

    fn cost(&self, solution: &SeatingAssignment) -> f64 {
        self.scorer.score(solution)
    }

    fn neighbor<R: Rng>(
        &self,
        solution: &SeatingAssignment,
        rng: &mut R,
    ) -> Option<(SeatingAssignment, MoveKind)> {
        self.generator
            .propose(solution, rng)
            .map(|p| (p.assignment, p.kind))
    }
}

/// Completes `base` by lottery and anneals it.
///
/// Without a configured seed the run's seed is drawn from `rng`, so a
/// seeded caller still gets a reproducible result.
pub(crate) fn run<R: Rng + ?Sized>(
    planner: &SeatingPlanner<'_>,
    base: SeatingAssignment,
    rng: &mut R,
) -> Result<FillOutcome> {
    planner.optimizer.validate()?;
    let initial = lottery::fill(planner.ctx, base, rng);
    let config = match planner.optimizer.seed {
        Some(_) => planner.optimizer.clone(),
        None => planner.optimizer.clone().with_seed(rng.random()),
    };
    solve(planner, initial, &config, &planner.control)
}

/// Independent runs from distinct seeds; lowest score wins, earlier
/// runs win ties.
pub(crate) fn multi_start<R: Rng + ?Sized>(
    planner: &SeatingPlanner<'_>,
    base: SeatingAssignment,
    starts: usize,
    rng: &mut R,
) -> Result<FillOutcome> {
    planner.optimizer.validate()?;
    let started = Instant::now();
    let seeds: Vec<u64> = (0..starts).map(|_| rng.random()).collect();

    // starts share the cancel flag but not the progress stream
    let run_one = |seed: u64| -> Result<FillOutcome> {
        let mut local = create_rng(seed);
        let initial = lottery::fill(planner.ctx, base.clone(), &mut local);
        let config = planner.optimizer.clone().with_seed(seed);
        solve(planner, initial, &config, &planner.control.silenced())
    };

    #[cfg(feature = "parallel")]
    let results: Vec<Result<FillOutcome>> = seeds.into_par_iter().map(run_one).collect();
    #[cfg(not(feature = "parallel"))]
    let results: Vec<Result<FillOutcome>> = seeds.into_iter().map(run_one).collect();

    let mut best: Option<FillOutcome> = None;
    for (start, result) in results.into_iter().enumerate() {
        let outcome = result?;
        debug!(start, score = outcome.diagnostics.score, "multi-start run finished");
        let better = match &best {
            Some(b) => outcome.diagnostics.score < b.diagnostics.score,
            None => true,
        };
        if better {
            best = Some(outcome);
        }
    }
    let best =
        best.ok_or_else(|| SeatingError::InvalidConfig("multi-start needs at least one run".into()))?;
    planner.control.report(ProgressEvent {
        iteration: best.diagnostics.iterations,
        best_score: best.diagnostics.score,
        elapsed_ms: started.elapsed().as_millis() as u64,
    });
    Ok(best)
}

fn solve(
    planner: &SeatingPlanner<'_>,
    initial: SeatingAssignment,
    config: &OptimizerConfig,
    control: &RunControl,
) -> Result<FillOutcome> {
    let problem = SeatingProblem::new(planner.ctx).with_weights(planner.weights);
    let result = SaRunner::run_with_control(&problem, initial, config, control)?;

    let mut diagnostics = planner.diagnose(&result.best);
    diagnostics.termination = Some(result.termination);
    diagnostics.iterations = result.iterations;
    diagnostics.elapsed = result.elapsed;
    diagnostics.move_stats = Some(result.move_stats);
    Ok(FillOutcome {
        assignment: result.best,
        diagnostics,
    })
}
