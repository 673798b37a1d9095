//! Score aggregation
//!
//! Combines instantaneous form and stability measurements into bounded
//! overall scores. Scores are carried as unrounded `f64` through the
//! pipeline; [`display_score`] is the single rounding point for
//! presentation and serialized summaries.

use serde::{Deserialize, Serialize};

/// Clamp a score to the 0-100 band
pub fn clamp_score(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

/// Overall score for rep-based exercises: mean of form and stability, clamped
pub fn overall_score(form: f64, stability: f64) -> f64 {
    clamp_score((form + stability) / 2.0)
}

/// Round a score to the nearest integer for display
pub fn display_score(value: f64) -> u32 {
    clamp_score(value).round() as u32
}

/// Mean of a score sequence; the mean of an empty sequence is 0
pub fn mean(values: impl IntoIterator<Item = f64>) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for value in values {
        sum += value;
        count += 1;
    }
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Scoring weights for assessment-style timed exercises.
///
/// Weights are configuration, not derived from measurements.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssessmentWeights {
    /// Technical execution
    pub form: f64,
    /// Balance and control
    pub stability: f64,
    /// Time held relative to target
    pub duration: f64,
    /// Endurance factor; reserved, no detector feeds it yet
    pub stamina: f64,
}

impl Default for AssessmentWeights {
    fn default() -> Self {
        Self {
            form: 0.4,
            stability: 0.3,
            duration: 0.2,
            stamina: 0.1,
        }
    }
}

impl AssessmentWeights {
    /// Weighted overall score for one assessment exercise, clamped to 0-100
    pub fn weighted_overall(&self, form: f64, stability: f64, duration: f64) -> f64 {
        clamp_score(form * self.form + stability * self.stability + duration * self.duration)
    }
}
