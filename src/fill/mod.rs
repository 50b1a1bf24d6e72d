//! Fill-mode strategies.
//!
//! A [`SeatingPlanner`] turns a [`SeatingContext`] (and optionally the
//! arrangement currently on the board) into a new [`SeatingAssignment`]
//! using one of the named [`FillMode`]s. Every mode honors locked
//! students, deactivated seats and mandatory accessibility, and every
//! outcome carries [`Diagnostics`] listing any never-together pair that
//! could not be separated.
//!
//! The bulk modes (`random`, `alphabetical`, `matchGender`,
//! `balanceGender`) keep the students already seated in `current` and
//! fill only the vacant seats; pass `None` for a fresh arrangement.
//!
//! # Examples
//!
//! ```
//! use u_seating::context::SeatingContext;
//! use u_seating::fill::{FillMode, SeatingPlanner};
//! use u_seating::model::{Gender, Layout, Student, Table};
//! use u_seating::random::create_rng;
//! use u_seating::sa::OptimizerConfig;
//!
//! let roster = (1..=6)
//!     .map(|i| Student::new(i, format!("Student {i}"), Gender::Unset))
//!     .collect();
//! let layout = Layout::new(vec![Table::with_capacity(1, 3), Table::with_capacity(2, 3)]).unwrap();
//! let ctx = SeatingContext::new(roster, layout).unwrap();
//!
//! let planner = SeatingPlanner::new(&ctx).with_optimizer(OptimizerConfig::quick());
//! let outcome = planner.fill(FillMode::Optimize, None, &mut create_rng(7)).unwrap();
//! assert_eq!(outcome.assignment.len(), 6);
//! assert!(outcome.diagnostics.is_feasible());
//! ```

mod gender;
mod lottery;
mod optimize;
mod seed;
mod smart_pair;

use std::fmt;
use std::time::Duration;

use rand::Rng;
use tracing::{info, warn};

use crate::context::SeatingContext;
use crate::error::Result;
use crate::model::{SeatId, SeatingAssignment, StudentId};
use crate::neighbor::MoveStats;
use crate::sa::{OptimizerConfig, RunControl, TerminationReason};
use crate::scoring::{ScoreBreakdown, Scorer, ScoringWeights, Violation};

pub use optimize::SeatingProblem;

/// Named strategy for producing or improving an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum FillMode {
    /// Weighted lottery over partnership history, no search.
    Random,
    /// By display name, table by table.
    Alphabetical,
    /// Same-gender students grouped at the same tables.
    MatchGender,
    /// Greedy round-robin minimizing per-table gender imbalance.
    BalanceGender,
    /// Seat `student` at `seat` and pick the best partner for its table.
    SmartPair { student: StudentId, seat: SeatId },
    /// Full simulated annealing from the current (or a random) seed.
    Optimize,
}

impl FillMode {
    pub fn id(&self) -> &'static str {
        match self {
            FillMode::Random => "random",
            FillMode::Alphabetical => "alphabetical",
            FillMode::MatchGender => "matchGender",
            FillMode::BalanceGender => "balanceGender",
            FillMode::SmartPair { .. } => "smartPair",
            FillMode::Optimize => "optimize",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FillMode::Random => "Random",
            FillMode::Alphabetical => "Alphabetical",
            FillMode::MatchGender => "Match Gender",
            FillMode::BalanceGender => "Balance Gender",
            FillMode::SmartPair { .. } => "Smart Pair",
            FillMode::Optimize => "Optimize All",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            FillMode::Random => "Randomly assign students to seats",
            FillMode::Alphabetical => "Assign students to seats in name order",
            FillMode::MatchGender => "Group students by gender",
            FillMode::BalanceGender => "Balance genders at each table",
            FillMode::SmartPair { .. } => "Find optimal partner for selected student",
            FillMode::Optimize => "Optimize entire seating arrangement",
        }
    }
}

impl fmt::Display for FillMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a fill leaves behind besides the assignment itself.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagnostics {
    /// Never-together pairs still seated at the same table.
    pub violations: Vec<Violation>,
    pub score: f64,
    pub breakdown: ScoreBreakdown,
    /// Roster students left without a seat.
    pub unassigned: Vec<StudentId>,
    /// Set only by [`FillMode::Optimize`].
    pub termination: Option<TerminationReason>,
    pub iterations: usize,
    pub elapsed: Duration,
    pub move_stats: Option<MoveStats>,
    /// Partner chosen by [`FillMode::SmartPair`], if any.
    pub partner: Option<StudentId>,
}

impl Diagnostics {
    /// True when no never-together pair shares a table.
    pub fn is_feasible(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Assignment plus its diagnostics.
#[derive(Debug, Clone)]
pub struct FillOutcome {
    pub assignment: SeatingAssignment,
    pub diagnostics: Diagnostics,
}

/// Runs fill modes against one [`SeatingContext`].
#[derive(Debug, Clone)]
pub struct SeatingPlanner<'a> {
    ctx: &'a SeatingContext,
    weights: ScoringWeights,
    optimizer: OptimizerConfig,
    control: RunControl,
}

impl<'a> SeatingPlanner<'a> {
    pub fn new(ctx: &'a SeatingContext) -> Self {
        Self {
            ctx,
            weights: ScoringWeights::default(),
            optimizer: OptimizerConfig::default(),
            control: RunControl::default(),
        }
    }

    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_optimizer(mut self, config: OptimizerConfig) -> Self {
        self.optimizer = config;
        self
    }

    /// Cancellation flag and progress sink for [`FillMode::Optimize`].
    pub fn with_control(mut self, control: RunControl) -> Self {
        self.control = control;
        self
    }

    pub fn context(&self) -> &'a SeatingContext {
        self.ctx
    }

    pub fn scorer(&self) -> Scorer<'a> {
        Scorer::new(self.ctx).with_weights(self.weights)
    }

    /// Produces a new assignment with `mode`.
    ///
    /// `current` must only reference roster students and active seats;
    /// occupants that conflict with a lock are moved aside first.
    /// Randomness comes from `rng` alone, so a seeded generator
    /// reproduces the same fill.
    pub fn fill<R: Rng + ?Sized>(
        &self,
        mode: FillMode,
        current: Option<&SeatingAssignment>,
        rng: &mut R,
    ) -> Result<FillOutcome> {
        let base = seed::prepare(self.ctx, current)?;
        match mode {
            FillMode::Random => {
                let assignment = lottery::fill(self.ctx, base, rng);
                Ok(self.outcome(mode, assignment))
            }
            FillMode::Alphabetical => {
                let assignment = seed::alphabetical(self.ctx, base, rng);
                Ok(self.outcome(mode, assignment))
            }
            FillMode::MatchGender => {
                let assignment = gender::match_gender(self.ctx, base, rng);
                Ok(self.outcome(mode, assignment))
            }
            FillMode::BalanceGender => {
                let assignment = gender::balance_gender(self.ctx, base, rng);
                Ok(self.outcome(mode, assignment))
            }
            FillMode::SmartPair { student, seat } => {
                let (assignment, partner) =
                    smart_pair::place(self.ctx, &self.scorer(), base, student, seat)?;
                let mut outcome = self.outcome(mode, assignment);
                outcome.diagnostics.partner = partner;
                Ok(outcome)
            }
            FillMode::Optimize => optimize::run(self, base, rng),
        }
    }

    /// Runs `starts` independent optimizations from distinct seeds and
    /// keeps the lowest-scoring result.
    ///
    /// Each run owns its assignment copy. With the `parallel` feature the
    /// runs execute on the rayon pool; otherwise one after another.
    /// Every run observes the cancel flag, but the progress stream only
    /// receives one final event for the winning run.
    pub fn optimize_multi_start<R: Rng + ?Sized>(
        &self,
        current: Option<&SeatingAssignment>,
        starts: usize,
        rng: &mut R,
    ) -> Result<FillOutcome> {
        let base = seed::prepare(self.ctx, current)?;
        optimize::multi_start(self, base, starts.max(1), rng)
    }

    fn outcome(&self, mode: FillMode, assignment: SeatingAssignment) -> FillOutcome {
        let diagnostics = self.diagnose(&assignment);
        info!(
            mode = mode.id(),
            seated = assignment.len(),
            score = diagnostics.score,
            "fill complete"
        );
        FillOutcome {
            assignment,
            diagnostics,
        }
    }

    pub(crate) fn diagnose(&self, assignment: &SeatingAssignment) -> Diagnostics {
        let scorer = self.scorer();
        let breakdown = scorer.breakdown(assignment);
        let violations = scorer.violations(assignment);
        if !violations.is_empty() {
            warn!(
                count = violations.len(),
                "never-together pairs remain seated together"
            );
        }
        Diagnostics {
            violations,
            score: breakdown.total(),
            breakdown,
            unassigned: self.ctx.unassigned(assignment),
            termination: None,
            iterations: 0,
            elapsed: Duration::ZERO,
            move_stats: None,
            partner: None,
        }
    }
}
