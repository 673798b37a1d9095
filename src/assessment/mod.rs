//! Timed-hold assessment
//!
//! Assessment sessions run an athlete through a sport's drill sequence.
//! Unlike rep tracking there is no hysteresis: the score accrues with hold
//! duration and the runner auto-advances when the target is reached. Form
//! and stability come from the same landmark measurements the rep
//! detectors use.

pub mod plan;
pub mod scorer;

pub use plan::{AssessmentPlan, HoldExercise, Sport};
pub use scorer::HoldScorer;

use crate::scoring::{clamp_score, display_score, mean, AssessmentWeights};
use crate::types::LandmarkFrame;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Scores for one completed drill
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrillResult {
    pub exercise: String,
    pub form_score: f64,
    pub stability_score: f64,
    pub duration_score: f64,
    pub overall_score: f64,
    pub completed_at: DateTime<Utc>,
}

/// Per-frame assessment output while a drill is running
#[derive(Debug, Clone)]
pub struct HoldUpdate {
    pub form_score: f64,
    pub stability_score: f64,
    pub duration_score: f64,
    pub overall_score: f64,
    pub elapsed_secs: f64,
    /// Set on the frame that reached the target duration and advanced the
    /// assessment
    pub drill_completed: bool,
}

/// Final assessment report across all drills
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentReport {
    pub sport: Sport,
    pub drills: Vec<DrillResult>,
    /// Per-axis means across drills, rounded for presentation
    pub form_score: u32,
    pub stability_score: u32,
    pub duration_score: u32,
    pub overall_score: u32,
    pub feedback: String,
    pub recommendations: Vec<String>,
}

/// Drives one assessment through its drill sequence.
#[derive(Debug)]
pub struct AssessmentRunner {
    plan: AssessmentPlan,
    weights: AssessmentWeights,
    current: usize,
    scorer: HoldScorer,
    drill_started_at: Option<DateTime<Utc>>,
    duration_score: f64,
    results: Vec<DrillResult>,
}

impl AssessmentRunner {
    pub fn new(sport: Sport) -> Self {
        Self::with_weights(sport, AssessmentWeights::default())
    }

    pub fn with_weights(sport: Sport, weights: AssessmentWeights) -> Self {
        Self {
            plan: AssessmentPlan::for_sport(sport),
            weights,
            current: 0,
            scorer: HoldScorer::new(),
            drill_started_at: None,
            duration_score: 0.0,
            results: Vec::new(),
        }
    }

    pub fn sport(&self) -> Sport {
        self.plan.sport
    }

    /// Drill the athlete is on, `None` once the plan is exhausted
    pub fn current_exercise(&self) -> Option<&HoldExercise> {
        self.plan.exercises.get(self.current)
    }

    pub fn is_complete(&self) -> bool {
        self.current >= self.plan.len()
    }

    /// Begin timing the current drill. No-op when already running or when
    /// the plan is exhausted.
    pub fn start(&mut self, now: DateTime<Utc>) -> bool {
        if self.is_complete() || self.drill_started_at.is_some() {
            return false;
        }
        self.drill_started_at = Some(now);
        self.scorer.reset();
        self.duration_score = 0.0;
        true
    }

    /// Process one landmark frame against the running drill.
    ///
    /// Duration accrues from the caller's wall clock whether or not the
    /// frame carries usable landmarks; form and stability only move when
    /// the body-line measure is available. Reaching the target duration
    /// finalizes the drill and advances the assessment.
    ///
    /// Returns `None` when no drill is running.
    pub fn process_frame(
        &mut self,
        frame: &LandmarkFrame,
        now: DateTime<Utc>,
    ) -> Option<HoldUpdate> {
        let started_at = self.drill_started_at?;
        let target_secs = f64::from(self.current_exercise()?.target_secs);

        self.scorer.measure(frame);

        let elapsed_secs = (now - started_at).num_milliseconds() as f64 / 1000.0;
        self.duration_score = clamp_score(elapsed_secs / target_secs * 100.0);

        let drill_completed = elapsed_secs >= target_secs;
        let update = HoldUpdate {
            form_score: self.scorer.form(),
            stability_score: self.scorer.stability(),
            duration_score: self.duration_score,
            overall_score: self.weights.weighted_overall(
                self.scorer.form(),
                self.scorer.stability(),
                self.duration_score,
            ),
            elapsed_secs,
            drill_completed,
        };

        if drill_completed {
            self.finalize_drill(now);
        }
        Some(update)
    }

    /// Manually close out the current drill with its scores as they stand
    /// and move to the next one (the athlete gave up or the operator
    /// skipped ahead). Returns `false` once the plan is exhausted.
    pub fn advance(&mut self, now: DateTime<Utc>) -> bool {
        if self.is_complete() {
            return false;
        }
        self.finalize_drill(now);
        true
    }

    fn finalize_drill(&mut self, now: DateTime<Utc>) {
        let exercise = self.plan.exercises[self.current].name.to_string();
        self.results.push(DrillResult {
            exercise,
            form_score: self.scorer.form(),
            stability_score: self.scorer.stability(),
            duration_score: self.duration_score,
            overall_score: self.weights.weighted_overall(
                self.scorer.form(),
                self.scorer.stability(),
                self.duration_score,
            ),
            completed_at: now,
        });

        self.current += 1;
        self.drill_started_at = None;
        self.scorer.reset();
        self.duration_score = 0.0;
    }

    /// Build the final report. Available once every drill has been
    /// finalized.
    pub fn report(&self) -> Option<AssessmentReport> {
        if !self.is_complete() {
            return None;
        }

        let form = display_score(mean(self.results.iter().map(|r| r.form_score)));
        let stability = display_score(mean(self.results.iter().map(|r| r.stability_score)));
        let duration = display_score(mean(self.results.iter().map(|r| r.duration_score)));
        let overall = display_score(mean(self.results.iter().map(|r| r.overall_score)));

        Some(AssessmentReport {
            sport: self.plan.sport,
            drills: self.results.clone(),
            form_score: form,
            stability_score: stability,
            duration_score: duration,
            overall_score: overall,
            feedback: performance_feedback(overall).to_string(),
            recommendations: recommendations(form, stability, duration, overall),
        })
    }
}

fn performance_feedback(overall: u32) -> &'static str {
    match overall {
        90.. => "Outstanding performance! You demonstrate excellent technique and control.",
        80..=89 => "Great job! You show strong fundamentals with room for minor improvements.",
        70..=79 => "Good performance! Focus on consistency and form refinement.",
        60..=69 => "Decent effort! Work on technique and stability for better results.",
        _ => "Keep practicing! Focus on basic form and building strength.",
    }
}

fn recommendations(form: u32, stability: u32, duration: u32, overall: u32) -> Vec<String> {
    let mut out = Vec::new();
    if form < 70 {
        out.push("Practice basic form exercises to improve technique".to_string());
    }
    if stability < 70 {
        out.push("Work on balance and core strength exercises".to_string());
    }
    if duration < 70 {
        out.push("Build endurance with longer holds and repetitions".to_string());
    }
    if overall >= 80 {
        out.push("Consider advancing to more challenging exercises".to_string());
    }
    if out.is_empty() {
        out.push("Continue your current training routine".to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Landmark, PoseLandmark};
    use chrono::TimeZone;

    fn at_secs(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn straight_hold_frame() -> LandmarkFrame {
        let mut frame = LandmarkFrame::empty();
        frame.set(PoseLandmark::LeftShoulder, Landmark::new(0.4, 0.2));
        frame.set(PoseLandmark::RightShoulder, Landmark::new(0.6, 0.2));
        frame.set(PoseLandmark::LeftHip, Landmark::new(0.4, 0.5));
        frame.set(PoseLandmark::RightHip, Landmark::new(0.6, 0.5));
        frame.set(PoseLandmark::LeftAnkle, Landmark::new(0.4, 0.9));
        frame.set(PoseLandmark::RightAnkle, Landmark::new(0.6, 0.9));
        frame
    }

    #[test]
    fn test_duration_accrues_toward_target() {
        let mut runner = AssessmentRunner::new(Sport::Gymnastics);
        assert!(runner.start(at_secs(0)));

        // Handstand Hold targets 30s; halfway in the score reads 50
        let update = runner
            .process_frame(&straight_hold_frame(), at_secs(15))
            .unwrap();
        assert!((update.duration_score - 50.0).abs() < 1e-9);
        assert!(!update.drill_completed);
        assert_eq!(runner.current_exercise().unwrap().name, "Handstand Hold");
    }

    #[test]
    fn test_reaching_target_auto_advances() {
        let mut runner = AssessmentRunner::new(Sport::Gymnastics);
        runner.start(at_secs(0));

        let update = runner
            .process_frame(&straight_hold_frame(), at_secs(30))
            .unwrap();
        assert!(update.drill_completed);
        assert!((update.duration_score - 100.0).abs() < 1e-9);
        assert_eq!(runner.current_exercise().unwrap().name, "Bridge Hold");

        // next drill has not started yet
        assert!(runner
            .process_frame(&straight_hold_frame(), at_secs(31))
            .is_none());
    }

    #[test]
    fn test_process_without_start_is_none() {
        let mut runner = AssessmentRunner::new(Sport::Yoga);
        assert!(runner
            .process_frame(&straight_hold_frame(), at_secs(0))
            .is_none());
    }

    #[test]
    fn test_weighted_overall_with_perfect_axes() {
        let mut runner = AssessmentRunner::new(Sport::Gymnastics);
        runner.start(at_secs(0));
        let update = runner
            .process_frame(&straight_hold_frame(), at_secs(30))
            .unwrap();
        // 100 * (0.4 + 0.3 + 0.2): the stamina weight has no input yet
        assert!((update.overall_score - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_full_yoga_assessment_report() {
        let mut runner = AssessmentRunner::new(Sport::Yoga);

        runner.start(at_secs(0));
        runner
            .process_frame(&straight_hold_frame(), at_secs(60))
            .unwrap();

        runner.start(at_secs(70));
        runner
            .process_frame(&straight_hold_frame(), at_secs(110))
            .unwrap();

        assert!(runner.is_complete());
        let report = runner.report().unwrap();
        assert_eq!(report.sport, Sport::Yoga);
        assert_eq!(report.drills.len(), 2);
        assert_eq!(report.form_score, 100);
        assert_eq!(report.duration_score, 100);
        assert_eq!(report.overall_score, 90);
        assert!(report.feedback.starts_with("Outstanding"));
        assert_eq!(
            report.recommendations,
            vec!["Consider advancing to more challenging exercises".to_string()]
        );
    }

    #[test]
    fn test_manual_advance_keeps_partial_scores() {
        let mut runner = AssessmentRunner::new(Sport::Yoga);
        runner.start(at_secs(0));
        runner
            .process_frame(&straight_hold_frame(), at_secs(15))
            .unwrap();

        // athlete gives up a quarter of the way in
        assert!(runner.advance(at_secs(15)));
        assert_eq!(runner.current_exercise().unwrap().name, "Warrior III");

        runner.start(at_secs(20));
        runner
            .process_frame(&straight_hold_frame(), at_secs(60))
            .unwrap();

        let report = runner.report().unwrap();
        // duration means 25 and 100
        assert_eq!(report.duration_score, 63);
        assert!(report
            .recommendations
            .contains(&"Build endurance with longer holds and repetitions".to_string()));
    }

    #[test]
    fn test_report_unavailable_until_complete() {
        let mut runner = AssessmentRunner::new(Sport::Gymnastics);
        runner.start(at_secs(0));
        assert!(runner.report().is_none());
    }

    #[test]
    fn test_low_scores_get_practice_feedback() {
        assert!(performance_feedback(40).starts_with("Keep practicing"));
        assert!(performance_feedback(75).starts_with("Good performance"));

        let recs = recommendations(50, 50, 50, 50);
        assert_eq!(recs.len(), 3);
    }
}
