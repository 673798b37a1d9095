//! Pipeline orchestration
//!
//! This module provides the public API for Synheart Motion. One landmark
//! frame is processed to completion (detection -> score update -> optional
//! rep event -> session mutation) before the next is accepted; throttling a
//! faster frame source is the caller's job.

use crate::adapter::{parse_ndjson, TimedFrame};
use crate::detector::{FrameUpdate, RepDetector, DEFAULT_REP_COOLDOWN_MS};
use crate::error::MotionError;
use crate::recorder::SessionRecorder;
use crate::types::{ExerciseKind, LandmarkFrame, Session};
use chrono::{DateTime, Utc};

/// Stateful frame processor: drives one detector at a time and records
/// completed reps into the injected session recorder.
///
/// Storage is not reached from here; callers hand finalized sessions to a
/// [`crate::store::SessionStore`] themselves, so persistence failures can
/// never disturb tracking state.
pub struct MotionProcessor {
    detector: Option<RepDetector>,
    recorder: SessionRecorder,
    cooldown_ms: i64,
}

impl Default for MotionProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl MotionProcessor {
    /// Create a processor with the default rep cooldown
    pub fn new() -> Self {
        Self::with_recorder(SessionRecorder::new())
    }

    /// Create a processor around an existing recorder (e.g. one seeded with
    /// persisted history)
    pub fn with_recorder(recorder: SessionRecorder) -> Self {
        Self {
            detector: None,
            recorder,
            cooldown_ms: DEFAULT_REP_COOLDOWN_MS,
        }
    }

    /// Override the inter-rep cooldown
    pub fn with_cooldown_ms(mut self, cooldown_ms: i64) -> Self {
        self.cooldown_ms = cooldown_ms;
        self
    }

    /// Begin tracking an exercise. Returns `false` (no-op) when a session
    /// is already in progress.
    pub fn start_exercise(&mut self, kind: ExerciseKind, now: DateTime<Utc>) -> bool {
        if !self.recorder.start_session(kind, now) {
            return false;
        }
        self.detector = Some(RepDetector::with_cooldown_ms(kind, self.cooldown_ms));
        true
    }

    /// Process one landmark frame against the active exercise.
    ///
    /// Returns `None` when no exercise is active or the frame is missing
    /// landmarks the detector needs (both are silent skips).
    pub fn process_frame(
        &mut self,
        frame: &LandmarkFrame,
        now: DateTime<Utc>,
    ) -> Option<FrameUpdate> {
        let detector = self.detector.as_mut()?;
        let update = detector.process(frame, now)?;
        if let Some(rep) = &update.rep {
            self.recorder.add_rep(rep.clone());
        }
        Some(update)
    }

    /// Finish the active exercise and return the finalized session.
    /// Stopping early is normal cancellation; partial reps are averaged.
    pub fn finish_exercise(&mut self, now: DateTime<Utc>) -> Option<Session> {
        self.detector = None;
        self.recorder.end_session(now)
    }

    /// Kind of the exercise currently being tracked
    pub fn active_exercise(&self) -> Option<ExerciseKind> {
        self.detector.as_ref().map(|d| d.kind())
    }

    /// Finalized sessions, oldest first
    pub fn history(&self) -> &[Session] {
        self.recorder.history()
    }

    /// Consume the processor, releasing its history for persistence
    pub fn into_history(self) -> Vec<Session> {
        self.recorder.into_history()
    }
}

/// Run a batch of timed frames through a fresh processor and return the
/// finalized session. `None` when the batch is empty.
///
/// The first frame's timestamp opens the session and the last one closes
/// it, so batch replays produce the same durations as live tracking.
pub fn frames_to_session(kind: ExerciseKind, frames: &[TimedFrame]) -> Option<Session> {
    let first = frames.first()?;
    let last = frames.last()?;

    let mut processor = MotionProcessor::new();
    processor.start_exercise(kind, first.at);
    for timed in frames {
        processor.process_frame(&timed.frame, timed.at);
    }
    processor.finish_exercise(last.at)
}

/// Convert newline-delimited frame JSON into a finalized session.
///
/// # Arguments
/// * `kind` - Exercise to track
/// * `input` - NDJSON frame payloads (see [`crate::adapter`])
///
/// # Returns
/// The finalized session, or `None` for empty input
///
/// # Example
/// ```ignore
/// let session = track_ndjson(ExerciseKind::Pushups, &ndjson)?;
/// ```
pub fn track_ndjson(kind: ExerciseKind, input: &str) -> Result<Option<Session>, MotionError> {
    let frames = parse_ndjson(input)?;
    Ok(frames_to_session(kind, &frames))
}
