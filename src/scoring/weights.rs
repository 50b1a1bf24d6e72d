//! Scoring weight configuration.

/// Weights of every scoring term.
///
/// Substitutable without changing the algorithm. Defaults reproduce the
/// classroom presets; negative weights are rewards.
///
/// # Examples
///
/// ```
/// use u_seating::scoring::ScoringWeights;
///
/// let weights = ScoringWeights::default()
///     .with_gender_imbalance(0.0)
///     .with_repeat_partnership(25.0);
/// assert_eq!(weights.never_together_violation, 1000.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScoringWeights {
    pub never_together_violation: f64,
    pub avoid_pairing: f64,
    pub good_pairing: f64,
    pub best_pairing: f64,
    /// Multiplied by the pair's history count. Linear, no saturation.
    pub repeat_partnership: f64,
    /// Multiplied by |males − females| at each table.
    pub gender_imbalance: f64,
    pub empty_seat: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            never_together_violation: 1000.0,
            avoid_pairing: 50.0,
            good_pairing: -20.0,
            best_pairing: -40.0,
            repeat_partnership: 10.0,
            gender_imbalance: 5.0,
            empty_seat: 2.0,
        }
    }
}

impl ScoringWeights {
    pub fn with_never_together_violation(mut self, w: f64) -> Self {
        self.never_together_violation = w;
        self
    }

    pub fn with_avoid_pairing(mut self, w: f64) -> Self {
        self.avoid_pairing = w;
        self
    }

    pub fn with_good_pairing(mut self, w: f64) -> Self {
        self.good_pairing = w;
        self
    }

    pub fn with_best_pairing(mut self, w: f64) -> Self {
        self.best_pairing = w;
        self
    }

    pub fn with_repeat_partnership(mut self, w: f64) -> Self {
        self.repeat_partnership = w;
        self
    }

    pub fn with_gender_imbalance(mut self, w: f64) -> Self {
        self.gender_imbalance = w;
        self
    }

    pub fn with_empty_seat(mut self, w: f64) -> Self {
        self.empty_seat = w;
        self
    }
}
