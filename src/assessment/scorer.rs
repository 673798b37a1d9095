//! Hold scoring from pose measurements
//!
//! Form and stability for timed holds come from the same landmark stream
//! the rep detectors consume: form from body-line straightness, stability
//! from frame-to-frame wobble. Only the current and previous frame are
//! ever retained.

use crate::geometry::{angle_at, distance};
use crate::scoring::clamp_score;
use crate::types::{LandmarkFrame, PoseLandmark};

/// Drift-to-score scaling: mean per-landmark movement in normalized
/// coordinates mapped onto the 0-100 band
const WOBBLE_SCORE_SCALE: f64 = 2000.0;

/// Measurement-driven scorer for one hold.
#[derive(Debug, Default)]
pub struct HoldScorer {
    previous: Option<LandmarkFrame>,
    form: f64,
    stability: f64,
}

impl HoldScorer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget carried state between drills
    pub fn reset(&mut self) {
        self.previous = None;
        self.form = 0.0;
        self.stability = 0.0;
    }

    /// Latest form score (0-100)
    pub fn form(&self) -> f64 {
        self.form
    }

    /// Latest stability score (0-100)
    pub fn stability(&self) -> f64 {
        self.stability
    }

    /// Update scores from one frame. Returns `None` (scores unchanged, frame
    /// not retained) when the landmarks the body-line measure needs are
    /// missing.
    pub fn measure(&mut self, frame: &LandmarkFrame) -> Option<(f64, f64)> {
        let left_shoulder = frame.point(PoseLandmark::LeftShoulder)?;
        let right_shoulder = frame.point(PoseLandmark::RightShoulder)?;
        let left_hip = frame.point(PoseLandmark::LeftHip)?;
        let right_hip = frame.point(PoseLandmark::RightHip)?;
        let left_ankle = frame.point(PoseLandmark::LeftAnkle)?;
        let right_ankle = frame.point(PoseLandmark::RightAnkle)?;

        // Form: a straight shoulder-hip-ankle line reads 180 degrees
        let left_line = angle_at(left_shoulder, left_hip, left_ankle)?;
        let right_line = angle_at(right_shoulder, right_hip, right_ankle)?;
        self.form = clamp_score((left_line + right_line) / 2.0 / 180.0 * 100.0);

        // Stability: mean drift of landmarks visible in both frames.
        // The first measured frame has no reference and scores clean.
        self.stability = match &self.previous {
            Some(previous) => {
                let mut total = 0.0;
                let mut count = 0usize;
                for (current, prior) in frame.landmarks().iter().zip(previous.landmarks()) {
                    if let (Some(current), Some(prior)) = (current, prior) {
                        total += distance(*current, *prior);
                        count += 1;
                    }
                }
                if count == 0 {
                    self.stability
                } else {
                    clamp_score(100.0 - (total / count as f64) * WOBBLE_SCORE_SCALE)
                }
            }
            None => 100.0,
        };

        self.previous = Some(frame.clone());
        Some((self.form, self.stability))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Landmark;

    fn hold_frame(shift_x: f64) -> LandmarkFrame {
        let mut frame = LandmarkFrame::empty();
        // straight body line, shifted horizontally by shift_x
        frame.set(
            PoseLandmark::LeftShoulder,
            Landmark::new(0.4 + shift_x, 0.2),
        );
        frame.set(
            PoseLandmark::RightShoulder,
            Landmark::new(0.6 + shift_x, 0.2),
        );
        frame.set(PoseLandmark::LeftHip, Landmark::new(0.4 + shift_x, 0.5));
        frame.set(PoseLandmark::RightHip, Landmark::new(0.6 + shift_x, 0.5));
        frame.set(PoseLandmark::LeftAnkle, Landmark::new(0.4 + shift_x, 0.9));
        frame.set(PoseLandmark::RightAnkle, Landmark::new(0.6 + shift_x, 0.9));
        frame
    }

    #[test]
    fn test_straight_line_scores_full_form() {
        let mut scorer = HoldScorer::new();
        let (form, stability) = scorer.measure(&hold_frame(0.0)).unwrap();
        assert!((form - 100.0).abs() < 1e-9);
        assert_eq!(stability, 100.0);
    }

    #[test]
    fn test_wobble_lowers_stability() {
        let mut scorer = HoldScorer::new();
        scorer.measure(&hold_frame(0.0)).unwrap();
        // every landmark shifted 0.02: stability = 100 - 0.02 * 2000 = 60
        let (_, stability) = scorer.measure(&hold_frame(0.02)).unwrap();
        assert!((stability - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_steady_hold_keeps_stability_high() {
        let mut scorer = HoldScorer::new();
        scorer.measure(&hold_frame(0.0)).unwrap();
        let (_, stability) = scorer.measure(&hold_frame(0.0)).unwrap();
        assert_eq!(stability, 100.0);
    }

    #[test]
    fn test_missing_landmarks_skip_update() {
        let mut scorer = HoldScorer::new();
        scorer.measure(&hold_frame(0.0)).unwrap();
        let form_before = scorer.form();

        assert!(scorer.measure(&LandmarkFrame::empty()).is_none());
        assert_eq!(scorer.form(), form_before);
    }

    #[test]
    fn test_bent_line_lowers_form() {
        let mut frame = hold_frame(0.0);
        // fold at the hips: ankles swing forward
        frame.set(PoseLandmark::LeftAnkle, Landmark::new(0.8, 0.5));
        frame.set(PoseLandmark::RightAnkle, Landmark::new(1.0, 0.5));

        let mut scorer = HoldScorer::new();
        let (form, _) = scorer.measure(&frame).unwrap();
        assert!(form < 60.0);
    }
}
