//! Core types for the Synheart Motion pipeline
//!
//! This module defines the data structures that flow through each stage of the
//! pipeline: landmark frames, exercise kinds and phases, rep events, and
//! finalized sessions.

use crate::error::MotionError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of landmarks in a full-body pose frame
pub const LANDMARK_COUNT: usize = 33;

/// Named indices into a pose frame (BlazePose full-body topology).
///
/// Index positions are semantically fixed: the landmark source emits points
/// in this order once per camera frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoseLandmark {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl PoseLandmark {
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Nose => "nose",
            Self::LeftEyeInner => "left_eye_inner",
            Self::LeftEye => "left_eye",
            Self::LeftEyeOuter => "left_eye_outer",
            Self::RightEyeInner => "right_eye_inner",
            Self::RightEye => "right_eye",
            Self::RightEyeOuter => "right_eye_outer",
            Self::LeftEar => "left_ear",
            Self::RightEar => "right_ear",
            Self::MouthLeft => "mouth_left",
            Self::MouthRight => "mouth_right",
            Self::LeftShoulder => "left_shoulder",
            Self::RightShoulder => "right_shoulder",
            Self::LeftElbow => "left_elbow",
            Self::RightElbow => "right_elbow",
            Self::LeftWrist => "left_wrist",
            Self::RightWrist => "right_wrist",
            Self::LeftPinky => "left_pinky",
            Self::RightPinky => "right_pinky",
            Self::LeftIndex => "left_index",
            Self::RightIndex => "right_index",
            Self::LeftThumb => "left_thumb",
            Self::RightThumb => "right_thumb",
            Self::LeftHip => "left_hip",
            Self::RightHip => "right_hip",
            Self::LeftKnee => "left_knee",
            Self::RightKnee => "right_knee",
            Self::LeftAnkle => "left_ankle",
            Self::RightAnkle => "right_ankle",
            Self::LeftHeel => "left_heel",
            Self::RightHeel => "right_heel",
            Self::LeftFootIndex => "left_foot_index",
            Self::RightFootIndex => "right_foot_index",
        }
    }
}

/// A single tracked body-joint position estimate for one video frame.
///
/// Coordinates are normalized [0, 1] image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    /// Detection confidence (0-1), when the landmark source provides one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<f64>,
}

impl Landmark {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            visibility: None,
        }
    }
}

/// One pose frame: 33 optional landmarks, indexed by [`PoseLandmark`].
///
/// A landmark is `None` when the tracker lost it (occlusion, out of frame).
/// Frames are read-only to the core and never retained beyond the current
/// and previous frame. Serializes as a bare 33-entry array; the length
/// invariant survives deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Vec<Option<Landmark>>", into = "Vec<Option<Landmark>>")]
pub struct LandmarkFrame {
    landmarks: Vec<Option<Landmark>>,
}

impl TryFrom<Vec<Option<Landmark>>> for LandmarkFrame {
    type Error = MotionError;

    fn try_from(landmarks: Vec<Option<Landmark>>) -> Result<Self, Self::Error> {
        Self::new(landmarks)
    }
}

impl From<LandmarkFrame> for Vec<Option<Landmark>> {
    fn from(frame: LandmarkFrame) -> Self {
        frame.landmarks
    }
}

impl LandmarkFrame {
    /// Build a frame from exactly [`LANDMARK_COUNT`] optional points
    pub fn new(landmarks: Vec<Option<Landmark>>) -> Result<Self, MotionError> {
        if landmarks.len() != LANDMARK_COUNT {
            return Err(MotionError::InvalidFrame(format!(
                "expected {} landmarks, got {}",
                LANDMARK_COUNT,
                landmarks.len()
            )));
        }
        Ok(Self { landmarks })
    }

    /// A frame with every landmark missing
    pub fn empty() -> Self {
        Self {
            landmarks: vec![None; LANDMARK_COUNT],
        }
    }

    pub fn point(&self, index: PoseLandmark) -> Option<Landmark> {
        self.landmarks[index.index()]
    }

    pub fn set(&mut self, index: PoseLandmark, landmark: Landmark) {
        self.landmarks[index.index()] = Some(landmark);
    }

    pub fn landmarks(&self) -> &[Option<Landmark>] {
        &self.landmarks
    }
}

/// Exercise kind tracked by the rep detectors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExerciseKind {
    Pushups,
    Squats,
    BicepCurls,
    JumpingJacks,
}

impl ExerciseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExerciseKind::Pushups => "pushups",
            ExerciseKind::Squats => "squats",
            ExerciseKind::BicepCurls => "bicep-curls",
            ExerciseKind::JumpingJacks => "jumping-jacks",
        }
    }

    /// Human-readable name for presentation surfaces
    pub fn display_name(&self) -> &'static str {
        match self {
            ExerciseKind::Pushups => "Push-ups",
            ExerciseKind::Squats => "Squats",
            ExerciseKind::BicepCurls => "Bicep Curls",
            ExerciseKind::JumpingJacks => "Jumping Jacks",
        }
    }

    pub fn parse(s: &str) -> Result<Self, MotionError> {
        match s {
            "pushups" => Ok(ExerciseKind::Pushups),
            "squats" => Ok(ExerciseKind::Squats),
            "bicep-curls" => Ok(ExerciseKind::BicepCurls),
            "jumping-jacks" => Ok(ExerciseKind::JumpingJacks),
            other => Err(MotionError::UnknownExercise(other.to_string())),
        }
    }

    pub fn all() -> [ExerciseKind; 4] {
        [
            ExerciseKind::Pushups,
            ExerciseKind::Squats,
            ExerciseKind::BicepCurls,
            ExerciseKind::JumpingJacks,
        ]
    }
}

/// Phase of the rep cycle.
///
/// `Open` is the extended/resting posture (arms straight, standing), `Closed`
/// the contracted one (bottom of a push-up, top of a curl, mid-jump). A rep
/// is counted on the Closed -> Open transition. The cycle has no terminal
/// state; it repeats for the session's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepPhase {
    Open,
    Closed,
}

impl RepPhase {
    /// Exercise-specific phase label, matching coaching vocabulary
    pub fn label(self, kind: ExerciseKind) -> &'static str {
        match (kind, self) {
            (ExerciseKind::Pushups, RepPhase::Open) => "up",
            (ExerciseKind::Pushups, RepPhase::Closed) => "down",
            (ExerciseKind::Squats, RepPhase::Open) => "standing",
            (ExerciseKind::Squats, RepPhase::Closed) => "down",
            (ExerciseKind::BicepCurls, RepPhase::Open) => "down",
            (ExerciseKind::BicepCurls, RepPhase::Closed) => "up",
            (ExerciseKind::JumpingJacks, RepPhase::Open) => "standing",
            (ExerciseKind::JumpingJacks, RepPhase::Closed) => "jumping",
        }
    }
}

/// A completed repetition with the scores in effect at completion time.
///
/// Scores are unrounded 0-100 values; rounding happens at the display
/// boundary only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepEvent {
    pub form_score: f64,
    pub stability_score: f64,
    pub overall_score: f64,
    pub recorded_at: DateTime<Utc>,
}

/// One finalized exercise session.
///
/// Created by the recorder at end-of-session and immutable thereafter.
/// Timestamps serialize as ISO-8601 via chrono.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier (UUID v4)
    pub id: String,
    pub exercise: ExerciseKind,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    /// Wall-clock duration in milliseconds
    pub duration_ms: i64,
    /// Completed reps in arrival order
    pub reps: Vec<RepEvent>,
    /// Sets completed (one set per 10 reps)
    pub sets: u32,
    /// Mean form score over the rep list (0 when no reps)
    pub average_form_score: f64,
    /// Mean stability score over the rep list (0 when no reps)
    pub average_stability_score: f64,
    /// Mean overall score over the rep list (0 when no reps)
    pub average_overall_score: f64,
}

impl Session {
    pub fn rep_count(&self) -> usize {
        self.reps.len()
    }
}
