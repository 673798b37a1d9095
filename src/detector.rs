//! Rep detection state machines
//!
//! One two-threshold hysteresis state machine drives every exercise kind;
//! the kinds differ only in which landmarks feed the primary measure, the
//! threshold band, and the stability measure. A rep is counted on the
//! Closed -> Open transition, gated by a wall-clock cooldown that filters
//! duplicate detections from landmark jitter across consecutive frames.

use crate::geometry::angle_at;
use crate::scoring::{clamp_score, overall_score};
use crate::types::{ExerciseKind, LandmarkFrame, PoseLandmark, RepEvent, RepPhase};
use chrono::{DateTime, Duration, Utc};

/// Default minimum wall-clock interval between two counted reps
pub const DEFAULT_REP_COOLDOWN_MS: i64 = 1000;

/// Hysteresis band for angle-driven exercises.
///
/// The primary angle must drop below `close_below` to enter the contracted
/// phase and rise above `open_above` to leave it; the gap between the two is
/// the dead zone that prevents oscillation at a single borderline value.
#[derive(Debug, Clone, Copy)]
pub struct AngleBand {
    pub close_below: f64,
    pub open_above: f64,
}

const PUSHUP_ELBOW_BAND: AngleBand = AngleBand {
    close_below: 90.0,
    open_above: 150.0,
};

const SQUAT_KNEE_BAND: AngleBand = AngleBand {
    close_below: 120.0,
    open_above: 150.0,
};

const CURL_ELBOW_BAND: AngleBand = AngleBand {
    close_below: 90.0,
    open_above: 150.0,
};

// Jumping jacks gate two measures at once, with a deliberately tighter band
// on the way back down. Image y grows downward, so "higher than" compares
// below a y threshold.
const JACK_JUMP_MIN_SPREAD: f64 = 0.3;
const JACK_JUMP_MAX_WRIST_Y: f64 = 0.3;
const JACK_LAND_MAX_SPREAD: f64 = 0.2;
const JACK_LAND_MIN_WRIST_Y: f64 = 0.4;

// Stability scaling: normalized-coordinate offsets mapped onto the 0-100 band
const PUSHUP_ALIGNED_TORSO_MAX: f64 = 0.1;
const OFFSET_SCORE_SCALE: f64 = 1000.0;
const SPREAD_SCORE_SCALE: f64 = 200.0;

/// Per-frame detector output: instantaneous scores, the phase after the
/// transition rule ran, and the completed rep when one was accepted.
#[derive(Debug, Clone)]
pub struct FrameUpdate {
    pub form_score: f64,
    pub stability_score: f64,
    pub overall_score: f64,
    pub phase: RepPhase,
    pub rep: Option<RepEvent>,
}

/// Instantaneous measurements extracted from one frame
struct Measurements {
    form: f64,
    stability: f64,
    close_signal: bool,
    open_signal: bool,
}

/// Hysteresis state machine for one exercise kind.
///
/// Pure over its inputs: the phase and last-accepted-rep timestamp are the
/// only state, and every call takes the caller's wall clock.
#[derive(Debug)]
pub struct RepDetector {
    kind: ExerciseKind,
    phase: RepPhase,
    last_rep_at: Option<DateTime<Utc>>,
    cooldown: Duration,
}

impl RepDetector {
    pub fn new(kind: ExerciseKind) -> Self {
        Self::with_cooldown_ms(kind, DEFAULT_REP_COOLDOWN_MS)
    }

    pub fn with_cooldown_ms(kind: ExerciseKind, cooldown_ms: i64) -> Self {
        Self {
            kind,
            phase: RepPhase::Open,
            last_rep_at: None,
            cooldown: Duration::milliseconds(cooldown_ms),
        }
    }

    pub fn kind(&self) -> ExerciseKind {
        self.kind
    }

    pub fn phase(&self) -> RepPhase {
        self.phase
    }

    /// Return the detector to its initial phase without touching the
    /// cooldown clock
    pub fn reset(&mut self) {
        self.phase = RepPhase::Open;
    }

    /// Process one landmark frame.
    ///
    /// Returns `None` when any landmark the exercise needs is missing from
    /// the frame: the call is a complete no-op (phase unchanged, no score
    /// update, no event), the expected outcome under partial occlusion.
    ///
    /// A rep completion inside the cooldown window still applies the phase
    /// transition but suppresses the event, and does not refresh the
    /// cooldown clock.
    pub fn process(&mut self, frame: &LandmarkFrame, now: DateTime<Utc>) -> Option<FrameUpdate> {
        let m = measure(self.kind, frame)?;

        let mut rep = None;
        match self.phase {
            RepPhase::Open if m.close_signal => {
                self.phase = RepPhase::Closed;
            }
            RepPhase::Closed if m.open_signal => {
                self.phase = RepPhase::Open;
                let accepted = self
                    .last_rep_at
                    .map_or(true, |last| now - last >= self.cooldown);
                if accepted {
                    self.last_rep_at = Some(now);
                    rep = Some(RepEvent {
                        form_score: m.form,
                        stability_score: m.stability,
                        overall_score: overall_score(m.form, m.stability),
                        recorded_at: now,
                    });
                }
            }
            _ => {}
        }

        Some(FrameUpdate {
            form_score: m.form,
            stability_score: m.stability,
            overall_score: overall_score(m.form, m.stability),
            phase: self.phase,
            rep,
        })
    }
}

fn measure(kind: ExerciseKind, frame: &LandmarkFrame) -> Option<Measurements> {
    match kind {
        ExerciseKind::Pushups => measure_pushups(frame),
        ExerciseKind::Squats => measure_squats(frame),
        ExerciseKind::BicepCurls => measure_bicep_curls(frame),
        ExerciseKind::JumpingJacks => measure_jumping_jacks(frame),
    }
}

/// Push-ups: primary = mean elbow angle (shoulder-elbow-wrist), stability
/// from the vertical shoulder-hip offset (a straight plank keeps it small).
fn measure_pushups(frame: &LandmarkFrame) -> Option<Measurements> {
    let left_shoulder = frame.point(PoseLandmark::LeftShoulder)?;
    let right_shoulder = frame.point(PoseLandmark::RightShoulder)?;
    let left_elbow = frame.point(PoseLandmark::LeftElbow)?;
    let right_elbow = frame.point(PoseLandmark::RightElbow)?;
    let left_wrist = frame.point(PoseLandmark::LeftWrist)?;
    let right_wrist = frame.point(PoseLandmark::RightWrist)?;
    let left_hip = frame.point(PoseLandmark::LeftHip)?;
    frame.point(PoseLandmark::RightHip)?;

    let left_angle = angle_at(left_shoulder, left_elbow, left_wrist)?;
    let right_angle = angle_at(right_shoulder, right_elbow, right_wrist)?;
    let primary = (left_angle + right_angle) / 2.0;

    let torso_offset = (left_shoulder.y - left_hip.y).abs();
    let alignment = if torso_offset < PUSHUP_ALIGNED_TORSO_MAX {
        100.0
    } else {
        (100.0 - torso_offset * OFFSET_SCORE_SCALE).max(0.0)
    };

    Some(Measurements {
        form: clamp_score(primary / 180.0 * 100.0),
        stability: clamp_score(alignment),
        close_signal: primary < PUSHUP_ELBOW_BAND.close_below,
        open_signal: primary > PUSHUP_ELBOW_BAND.open_above,
    })
}

/// Squats: primary = mean knee angle (hip-knee-ankle), stability from the
/// horizontal hip-width deviation.
fn measure_squats(frame: &LandmarkFrame) -> Option<Measurements> {
    let left_hip = frame.point(PoseLandmark::LeftHip)?;
    let right_hip = frame.point(PoseLandmark::RightHip)?;
    let left_knee = frame.point(PoseLandmark::LeftKnee)?;
    let right_knee = frame.point(PoseLandmark::RightKnee)?;
    let left_ankle = frame.point(PoseLandmark::LeftAnkle)?;
    let right_ankle = frame.point(PoseLandmark::RightAnkle)?;

    let left_angle = angle_at(left_hip, left_knee, left_ankle)?;
    let right_angle = angle_at(right_hip, right_knee, right_ankle)?;
    let primary = (left_angle + right_angle) / 2.0;

    let hip_drift = (left_hip.x - right_hip.x).abs();
    let stability = (100.0 - hip_drift * OFFSET_SCORE_SCALE).max(0.0);

    Some(Measurements {
        form: clamp_score(primary / 180.0 * 100.0),
        stability: clamp_score(stability),
        close_signal: primary < SQUAT_KNEE_BAND.close_below,
        open_signal: primary > SQUAT_KNEE_BAND.open_above,
    })
}

/// Bicep curls: primary = mean elbow angle, stability from left/right
/// elbow-angle symmetry. The contracted phase is "up" (arm curled), so the
/// direction convention runs opposite to push-ups while the machine itself
/// is unchanged.
fn measure_bicep_curls(frame: &LandmarkFrame) -> Option<Measurements> {
    let left_shoulder = frame.point(PoseLandmark::LeftShoulder)?;
    let right_shoulder = frame.point(PoseLandmark::RightShoulder)?;
    let left_elbow = frame.point(PoseLandmark::LeftElbow)?;
    let right_elbow = frame.point(PoseLandmark::RightElbow)?;
    let left_wrist = frame.point(PoseLandmark::LeftWrist)?;
    let right_wrist = frame.point(PoseLandmark::RightWrist)?;

    let left_angle = angle_at(left_shoulder, left_elbow, left_wrist)?;
    let right_angle = angle_at(right_shoulder, right_elbow, right_wrist)?;
    let primary = (left_angle + right_angle) / 2.0;

    let symmetry = (100.0 - (left_angle - right_angle).abs()).max(0.0);

    Some(Measurements {
        form: clamp_score(primary / 180.0 * 100.0),
        stability: clamp_score(symmetry),
        close_signal: primary < CURL_ELBOW_BAND.close_below,
        open_signal: primary > CURL_ELBOW_BAND.open_above,
    })
}

/// Jumping jacks: wrist spread and wrist height gate the transition
/// jointly, with asymmetric thresholds between the two directions. Form
/// tracks arm spread, stability tracks leg spread.
fn measure_jumping_jacks(frame: &LandmarkFrame) -> Option<Measurements> {
    let left_wrist = frame.point(PoseLandmark::LeftWrist)?;
    let right_wrist = frame.point(PoseLandmark::RightWrist)?;
    let left_ankle = frame.point(PoseLandmark::LeftAnkle)?;
    let right_ankle = frame.point(PoseLandmark::RightAnkle)?;

    let arm_spread = (left_wrist.x - right_wrist.x).abs();
    let leg_spread = (left_ankle.x - right_ankle.x).abs();
    let wrist_height = left_wrist.y.min(right_wrist.y);

    Some(Measurements {
        form: clamp_score(arm_spread * SPREAD_SCORE_SCALE),
        stability: clamp_score(leg_spread * SPREAD_SCORE_SCALE),
        close_signal: arm_spread > JACK_JUMP_MIN_SPREAD && wrist_height < JACK_JUMP_MAX_WRIST_Y,
        open_signal: arm_spread < JACK_LAND_MAX_SPREAD && wrist_height > JACK_LAND_MIN_WRIST_Y,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Landmark;
    use chrono::TimeZone;

    fn at_ms(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    /// Place a joint's distal point so the angle at the vertex between the
    /// proximal point (directly above) and the distal point is `angle_deg`.
    fn distal(vertex: Landmark, angle_deg: f64) -> Landmark {
        let rad = angle_deg.to_radians();
        Landmark::new(vertex.x + 0.2 * rad.sin(), vertex.y - 0.2 * rad.cos())
    }

    /// Symmetric push-up frame with the given mean elbow angle and a
    /// straight torso (stability 100)
    fn pushup_frame(elbow_angle: f64) -> LandmarkFrame {
        let mut frame = LandmarkFrame::empty();
        let left_shoulder = Landmark::new(0.35, 0.3);
        let right_shoulder = Landmark::new(0.65, 0.3);
        let left_elbow = Landmark::new(0.35, 0.5);
        let right_elbow = Landmark::new(0.65, 0.5);

        frame.set(PoseLandmark::LeftShoulder, left_shoulder);
        frame.set(PoseLandmark::RightShoulder, right_shoulder);
        frame.set(PoseLandmark::LeftElbow, left_elbow);
        frame.set(PoseLandmark::RightElbow, right_elbow);
        frame.set(PoseLandmark::LeftWrist, distal(left_elbow, elbow_angle));
        frame.set(PoseLandmark::RightWrist, distal(right_elbow, elbow_angle));
        frame.set(PoseLandmark::LeftHip, Landmark::new(0.35, 0.35));
        frame.set(PoseLandmark::RightHip, Landmark::new(0.65, 0.35));
        frame
    }

    fn squat_frame(knee_angle: f64) -> LandmarkFrame {
        let mut frame = LandmarkFrame::empty();
        let left_knee = Landmark::new(0.4, 0.7);
        let right_knee = Landmark::new(0.6, 0.7);

        frame.set(PoseLandmark::LeftHip, Landmark::new(0.4, 0.5));
        frame.set(PoseLandmark::RightHip, Landmark::new(0.45, 0.5));
        frame.set(PoseLandmark::LeftKnee, left_knee);
        frame.set(PoseLandmark::RightKnee, right_knee);
        frame.set(PoseLandmark::LeftAnkle, distal(left_knee, knee_angle));
        frame.set(PoseLandmark::RightAnkle, distal(right_knee, knee_angle));
        frame
    }

    fn jack_frame(arm_spread: f64, wrist_y: f64, leg_spread: f64) -> LandmarkFrame {
        let mut frame = LandmarkFrame::empty();
        frame.set(
            PoseLandmark::LeftWrist,
            Landmark::new(0.5 - arm_spread / 2.0, wrist_y),
        );
        frame.set(
            PoseLandmark::RightWrist,
            Landmark::new(0.5 + arm_spread / 2.0, wrist_y),
        );
        frame.set(
            PoseLandmark::LeftAnkle,
            Landmark::new(0.5 - leg_spread / 2.0, 0.95),
        );
        frame.set(
            PoseLandmark::RightAnkle,
            Landmark::new(0.5 + leg_spread / 2.0, 0.95),
        );
        frame
    }

    #[test]
    fn test_pushup_cycle_counts_one_rep() {
        let mut detector = RepDetector::new(ExerciseKind::Pushups);

        // open at t=0: no transition
        let update = detector.process(&pushup_frame(170.0), at_ms(0)).unwrap();
        assert_eq!(update.phase, RepPhase::Open);
        assert!(update.rep.is_none());

        // closed at t=500
        let update = detector.process(&pushup_frame(60.0), at_ms(500)).unwrap();
        assert_eq!(update.phase, RepPhase::Closed);
        assert!(update.rep.is_none());

        // back open at t=1100: first rep is unconstrained by cooldown
        let update = detector.process(&pushup_frame(170.0), at_ms(1100)).unwrap();
        assert_eq!(update.phase, RepPhase::Open);
        let rep = update.rep.expect("rep should complete");
        assert_eq!(rep.recorded_at, at_ms(1100));
        assert_eq!(crate::scoring::display_score(rep.form_score), 94);
    }

    #[test]
    fn test_cooldown_suppresses_second_rep_but_keeps_transition() {
        let mut detector = RepDetector::new(ExerciseKind::Pushups);

        detector.process(&pushup_frame(60.0), at_ms(0)).unwrap();
        let first = detector.process(&pushup_frame(170.0), at_ms(100)).unwrap();
        assert!(first.rep.is_some());

        // second full cycle only 400ms later
        detector.process(&pushup_frame(60.0), at_ms(300)).unwrap();
        let second = detector.process(&pushup_frame(170.0), at_ms(500)).unwrap();
        assert!(second.rep.is_none());
        assert_eq!(second.phase, RepPhase::Open);

        // a third cycle past the window counts again
        detector.process(&pushup_frame(60.0), at_ms(900)).unwrap();
        let third = detector.process(&pushup_frame(170.0), at_ms(1200)).unwrap();
        assert!(third.rep.is_some());
    }

    #[test]
    fn test_dead_zone_holds_phase() {
        let mut detector = RepDetector::new(ExerciseKind::Squats);

        detector.process(&squat_frame(100.0), at_ms(0)).unwrap();
        assert_eq!(detector.phase(), RepPhase::Closed);

        // 130 deg is between the 120/150 band: no transition either way
        let update = detector.process(&squat_frame(130.0), at_ms(100)).unwrap();
        assert_eq!(update.phase, RepPhase::Closed);
        assert!(update.rep.is_none());
    }

    #[test]
    fn test_missing_landmark_is_noop() {
        let mut detector = RepDetector::new(ExerciseKind::Pushups);
        detector.process(&pushup_frame(60.0), at_ms(0)).unwrap();
        assert_eq!(detector.phase(), RepPhase::Closed);

        // frame lost the wrists: nothing changes
        let mut frame = pushup_frame(170.0);
        let mut stripped = LandmarkFrame::empty();
        for index in [
            PoseLandmark::LeftShoulder,
            PoseLandmark::RightShoulder,
            PoseLandmark::LeftElbow,
            PoseLandmark::RightElbow,
            PoseLandmark::LeftHip,
            PoseLandmark::RightHip,
        ] {
            if let Some(point) = frame.point(index) {
                stripped.set(index, point);
            }
        }
        frame = stripped;

        assert!(detector.process(&frame, at_ms(500)).is_none());
        assert_eq!(detector.phase(), RepPhase::Closed);
    }

    #[test]
    fn test_jumping_jack_asymmetric_band() {
        let mut detector = RepDetector::new(ExerciseKind::JumpingJacks);

        // arms wide and high: jumping
        let update = detector
            .process(&jack_frame(0.5, 0.2, 0.4), at_ms(0))
            .unwrap();
        assert_eq!(update.phase, RepPhase::Closed);

        // between the two bands: still jumping
        let update = detector
            .process(&jack_frame(0.25, 0.35, 0.3), at_ms(200))
            .unwrap();
        assert_eq!(update.phase, RepPhase::Closed);
        assert!(update.rep.is_none());

        // narrow and low: landed, rep counted
        let update = detector
            .process(&jack_frame(0.1, 0.6, 0.1), at_ms(400))
            .unwrap();
        assert_eq!(update.phase, RepPhase::Open);
        assert!(update.rep.is_some());
    }

    #[test]
    fn test_curl_direction_convention() {
        let mut detector = RepDetector::new(ExerciseKind::BicepCurls);

        // curled (60 deg) enters the contracted phase, labelled "up"
        let update = detector.process(&pushup_frame(60.0), at_ms(0)).unwrap();
        assert_eq!(update.phase, RepPhase::Closed);
        assert_eq!(update.phase.label(ExerciseKind::BicepCurls), "up");

        // lowering the arm back past 150 completes the rep
        let update = detector.process(&pushup_frame(170.0), at_ms(200)).unwrap();
        assert!(update.rep.is_some());
    }

    #[test]
    fn test_scores_bounded_for_adversarial_coordinates() {
        let mut detector = RepDetector::new(ExerciseKind::JumpingJacks);
        // coordinates far outside the normalized range
        let update = detector
            .process(&jack_frame(12.0, -3.0, 40.0), at_ms(0))
            .unwrap();
        assert!((0.0..=100.0).contains(&update.form_score));
        assert!((0.0..=100.0).contains(&update.stability_score));
        assert!((0.0..=100.0).contains(&update.overall_score));
    }

    #[test]
    fn test_squat_stability_tracks_hip_drift() {
        let mut detector = RepDetector::new(ExerciseKind::Squats);
        let update = detector.process(&squat_frame(170.0), at_ms(0)).unwrap();
        // hips 0.05 apart horizontally -> 100 - 50 = 50
        assert!((update.stability_score - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_reset_restores_open_phase() {
        let mut detector = RepDetector::new(ExerciseKind::Pushups);
        detector.process(&pushup_frame(60.0), at_ms(0)).unwrap();
        assert_eq!(detector.phase(), RepPhase::Closed);

        detector.reset();
        assert_eq!(detector.phase(), RepPhase::Open);
    }
}
