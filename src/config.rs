//! Solver configuration.
//!
//! One immutable value carries the week geometry, the penalty weights and the
//! search budget into every entry point of the engine.

use crate::data::Period;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Upper bound on `days * periods_per_day`.
pub const MAX_PERIODS: usize = 10_000;

/// Weights applied to each soft-constraint count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PenaltyWeights {
    /// w1: a day on which a student has exactly one event.
    pub single_event_day: f64,
    /// w2: three back-to-back periods in a student's week.
    pub consecutive_run: f64,
    /// w3: an event in the last period of a day.
    pub last_slot: f64,
    /// w4: an unassigned event, only counted when `penalize_unassigned` is set.
    pub unassigned_event: f64,
}

impl Default for PenaltyWeights {
    fn default() -> Self {
        Self {
            single_event_day: 1.0,
            consecutive_run: 1.0,
            last_slot: 1.0,
            unassigned_event: 1.0,
        }
    }
}

/// Main solver configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SolverConfig {
    pub days: usize,
    pub periods_per_day: usize,
    pub weights: PenaltyWeights,
    /// Whether unassigned events add `weights.unassigned_event` each to the score.
    pub penalize_unassigned: bool,
    /// Cap on accepted improving moves in a single optimizer run.
    pub max_improvements: usize,
    /// Additional runs from shuffled event orders after the identity-order run.
    pub restarts: usize,
    /// Base seed for the shuffled orders; run `i` uses `seed + i`.
    pub seed: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            days: 5,
            periods_per_day: 9,
            weights: PenaltyWeights::default(),
            penalize_unassigned: false,
            max_improvements: 100_000,
            restarts: 0,
            seed: 0,
        }
    }
}

impl SolverConfig {
    pub fn num_periods(&self) -> usize {
        self.days * self.periods_per_day
    }

    pub fn day_of(&self, period: Period) -> usize {
        period / self.periods_per_day
    }

    /// True for the final period of any day.
    pub fn is_last_slot(&self, period: Period) -> bool {
        (period + 1) % self.periods_per_day == 0
    }

    /// Checks the week geometry and the weights.
    ///
    /// [`num_periods`](Self::num_periods) is only safe to call on a config
    /// that passed this check.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.days == 0 {
            return Err(ConfigError::Invalid("days must be at least 1".to_string()));
        }
        if self.periods_per_day == 0 {
            return Err(ConfigError::Invalid(
                "periods per day must be at least 1".to_string(),
            ));
        }
        let within_limit = self
            .days
            .checked_mul(self.periods_per_day)
            .is_some_and(|periods| periods <= MAX_PERIODS);
        if !within_limit {
            return Err(ConfigError::Invalid(format!(
                "{} days of {} periods exceed the maximum of {MAX_PERIODS} periods",
                self.days, self.periods_per_day
            )));
        }
        let weights = [
            ("single event day", self.weights.single_event_day),
            ("consecutive run", self.weights.consecutive_run),
            ("last slot", self.weights.last_slot),
            ("unassigned event", self.weights.unassigned_event),
        ];
        for (name, weight) in weights {
            if !weight.is_finite() || weight < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} weight must be a finite non-negative number, got {weight}"
                )));
            }
        }
        Ok(())
    }
}
