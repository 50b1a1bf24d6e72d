//! Optimizer configuration and presets.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Result, SeatingError};

/// Named optimizer presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum Preset {
    /// Fast optimization with good results.
    Quick,
    /// Balance between speed and quality.
    Balanced,
    /// Best results, takes more time.
    Thorough,
}

impl Preset {
    pub fn name(self) -> &'static str {
        match self {
            Preset::Quick => "Quick",
            Preset::Balanced => "Balanced",
            Preset::Thorough => "Thorough",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = SeatingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quick" => Ok(Preset::Quick),
            "balanced" => Ok(Preset::Balanced),
            "thorough" => Ok(Preset::Thorough),
            other => Err(SeatingError::InvalidConfig(format!(
                "unknown preset '{other}', expected quick, balanced or thorough"
            ))),
        }
    }
}

/// Configuration for the simulated annealing optimizer.
///
/// Temperature is multiplied by `cooling_rate` after every iteration and
/// clamped at `min_temperature`; the search keeps running in a
/// near-greedy regime until an iteration, time, stagnation or
/// cancellation limit is hit.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_seating::sa::{OptimizerConfig, Preset};
///
/// let config = OptimizerConfig::preset(Preset::Quick)
///     .with_max_iterations(1_000)
///     .with_time_limit(Duration::from_secs(2))
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptimizerConfig {
    /// Hard iteration budget. 0 returns the seed untouched.
    pub max_iterations: usize,

    /// Starting temperature. Higher values accept more worsening moves.
    pub initial_temperature: f64,

    /// Multiplicative cooling per iteration, in (0, 1).
    pub cooling_rate: f64,

    /// Temperature floor, > 0.
    pub min_temperature: f64,

    /// Wall-clock budget, sampled every `progress_interval` iterations.
    pub time_limit: Option<Duration>,

    /// Iterations without a new best before the run counts as converged.
    /// 0 disables the stagnation check.
    pub max_no_improve: usize,

    /// Iterations between progress events and wall-clock samples.
    pub progress_interval: usize,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self::preset(Preset::Balanced)
    }
}

impl OptimizerConfig {
    pub fn preset(preset: Preset) -> Self {
        let (max_iterations, initial_temperature, cooling_rate, min_temperature, secs) = match preset {
            Preset::Quick => (500, 50.0, 0.95, 0.1, 5),
            Preset::Balanced => (2000, 100.0, 0.98, 0.01, 15),
            Preset::Thorough => (5000, 150.0, 0.99, 0.001, 30),
        };
        Self {
            max_iterations,
            initial_temperature,
            cooling_rate,
            min_temperature,
            time_limit: Some(Duration::from_secs(secs)),
            max_no_improve: max_iterations / 2,
            progress_interval: 100,
            seed: None,
        }
    }

    pub fn quick() -> Self {
        Self::preset(Preset::Quick)
    }

    pub fn balanced() -> Self {
        Self::preset(Preset::Balanced)
    }

    pub fn thorough() -> Self {
        Self::preset(Preset::Thorough)
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_cooling_rate(mut self, rate: f64) -> Self {
        self.cooling_rate = rate;
        self
    }

    pub fn with_min_temperature(mut self, t: f64) -> Self {
        self.min_temperature = t;
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn without_time_limit(mut self) -> Self {
        self.time_limit = None;
        self
    }

    pub fn with_max_no_improve(mut self, n: usize) -> Self {
        self.max_no_improve = n;
        self
    }

    pub fn with_progress_interval(mut self, n: usize) -> Self {
        self.progress_interval = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(SeatingError::InvalidConfig(msg));
        if !(self.initial_temperature > 0.0) {
            return invalid(format!(
                "initial_temperature must be positive, got {}",
                self.initial_temperature
            ));
        }
        if !(self.min_temperature > 0.0) {
            return invalid(format!(
                "min_temperature must be positive, got {}",
                self.min_temperature
            ));
        }
        if self.min_temperature > self.initial_temperature {
            return invalid("min_temperature must not exceed initial_temperature".into());
        }
        if !(self.cooling_rate > 0.0 && self.cooling_rate < 1.0) {
            return invalid(format!(
                "cooling_rate must be in (0, 1), got {}",
                self.cooling_rate
            ));
        }
        if self.progress_interval == 0 {
            return invalid("progress_interval must be at least 1".into());
        }
        Ok(())
    }
}
