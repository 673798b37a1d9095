//! Session recording
//!
//! This module accumulates completed reps into sessions and maintains the
//! user's session history. One recorder owns at most one open session at a
//! time; everything derived (averages, duration, sets) is computed once at
//! end-of-session, after which the session is immutable.

use crate::scoring::mean;
use crate::types::{ExerciseKind, RepEvent, Session};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Reps per set
const REPS_PER_SET: u32 = 10;

/// An in-progress session, owned exclusively by the recorder
#[derive(Debug, Clone)]
struct OpenSession {
    id: String,
    exercise: ExerciseKind,
    started_at: DateTime<Utc>,
    reps: Vec<RepEvent>,
}

/// Recorder for exercise sessions.
///
/// The open-session slot is the single mutable shared resource; callers
/// serialize `start_session` / `add_rep` / `end_session`, which the
/// frame-at-a-time processing model already guarantees.
#[derive(Debug, Default)]
pub struct SessionRecorder {
    current: Option<OpenSession>,
    history: Vec<Session>,
}

impl SessionRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the recorder with previously persisted sessions
    pub fn with_history(history: Vec<Session>) -> Self {
        Self {
            current: None,
            history,
        }
    }

    /// Open a new session. Returns `false` (no-op) when one is already open.
    pub fn start_session(&mut self, exercise: ExerciseKind, now: DateTime<Utc>) -> bool {
        if self.current.is_some() {
            return false;
        }
        self.current = Some(OpenSession {
            id: Uuid::new_v4().to_string(),
            exercise,
            started_at: now,
            reps: Vec::new(),
        });
        true
    }

    /// Append a completed rep to the open session; no-op when none is open
    pub fn add_rep(&mut self, rep: RepEvent) {
        if let Some(session) = self.current.as_mut() {
            session.reps.push(rep);
        }
    }

    /// Finalize the open session: set the end time, compute duration and
    /// the three mean scores (mean of an empty rep list is 0), append it to
    /// the history and return it.
    ///
    /// Returns `None` when no session is open; that is the expected idle
    /// state, not a failure, and the history is left untouched.
    pub fn end_session(&mut self, now: DateTime<Utc>) -> Option<Session> {
        let open = self.current.take()?;

        let session = Session {
            id: open.id,
            exercise: open.exercise,
            started_at: open.started_at,
            ended_at: now,
            duration_ms: (now - open.started_at).num_milliseconds(),
            sets: open.reps.len() as u32 / REPS_PER_SET,
            average_form_score: mean(open.reps.iter().map(|r| r.form_score)),
            average_stability_score: mean(open.reps.iter().map(|r| r.stability_score)),
            average_overall_score: mean(open.reps.iter().map(|r| r.overall_score)),
            reps: open.reps,
        };

        self.history.push(session.clone());
        Some(session)
    }

    /// Whether a session is currently open
    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    /// Exercise kind of the open session, if any
    pub fn current_exercise(&self) -> Option<ExerciseKind> {
        self.current.as_ref().map(|s| s.exercise)
    }

    /// Reps recorded so far in the open session
    pub fn current_rep_count(&self) -> usize {
        self.current.as_ref().map_or(0, |s| s.reps.len())
    }

    /// Finalized sessions, oldest first
    pub fn history(&self) -> &[Session] {
        &self.history
    }

    /// Hand the full history to a caller (e.g. for persistence)
    pub fn into_history(self) -> Vec<Session> {
        self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn at_ms(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    fn rep(form: f64, stability: f64, overall: f64, at: DateTime<Utc>) -> RepEvent {
        RepEvent {
            form_score: form,
            stability_score: stability,
            overall_score: overall,
            recorded_at: at,
        }
    }

    #[test]
    fn test_start_is_noop_when_open() {
        let mut recorder = SessionRecorder::new();
        assert!(recorder.start_session(ExerciseKind::Squats, at_ms(0)));
        assert!(!recorder.start_session(ExerciseKind::Pushups, at_ms(100)));
        assert_eq!(recorder.current_exercise(), Some(ExerciseKind::Squats));
    }

    #[test]
    fn test_add_rep_without_session_is_noop() {
        let mut recorder = SessionRecorder::new();
        recorder.add_rep(rep(90.0, 80.0, 85.0, at_ms(0)));
        assert_eq!(recorder.current_rep_count(), 0);
        assert!(recorder.end_session(at_ms(100)).is_none());
        assert!(recorder.history().is_empty());
    }

    #[test]
    fn test_end_session_computes_averages_and_duration() {
        let mut recorder = SessionRecorder::new();
        recorder.start_session(ExerciseKind::Pushups, at_ms(1_000));
        recorder.add_rep(rep(90.0, 100.0, 95.0, at_ms(2_000)));
        recorder.add_rep(rep(80.0, 90.0, 85.0, at_ms(3_500)));

        let session = recorder.end_session(at_ms(61_000)).unwrap();
        assert_eq!(session.duration_ms, 60_000);
        assert_eq!(session.rep_count(), 2);
        assert!((session.average_form_score - 85.0).abs() < 1e-9);
        assert!((session.average_stability_score - 95.0).abs() < 1e-9);
        assert!((session.average_overall_score - 90.0).abs() < 1e-9);
        assert_eq!(recorder.history().len(), 1);
        assert!(!recorder.is_open());
    }

    #[test]
    fn test_end_empty_session_yields_zero_averages() {
        let mut recorder = SessionRecorder::new();
        recorder.start_session(ExerciseKind::JumpingJacks, at_ms(0));

        let session = recorder.end_session(at_ms(5_000)).unwrap();
        assert_eq!(session.rep_count(), 0);
        assert_eq!(session.average_form_score, 0.0);
        assert_eq!(session.average_stability_score, 0.0);
        assert_eq!(session.average_overall_score, 0.0);
    }

    #[test]
    fn test_double_end_is_idempotent_safe() {
        let mut recorder = SessionRecorder::new();
        recorder.start_session(ExerciseKind::Squats, at_ms(0));
        assert!(recorder.end_session(at_ms(1_000)).is_some());

        assert!(recorder.end_session(at_ms(2_000)).is_none());
        assert_eq!(recorder.history().len(), 1);
    }

    #[test]
    fn test_sets_derived_from_rep_count() {
        let mut recorder = SessionRecorder::new();
        recorder.start_session(ExerciseKind::BicepCurls, at_ms(0));
        for i in 0..23 {
            recorder.add_rep(rep(80.0, 80.0, 80.0, at_ms(i * 1_100)));
        }
        let session = recorder.end_session(at_ms(30_000)).unwrap();
        assert_eq!(session.sets, 2);
    }

    #[test]
    fn test_session_ids_are_unique() {
        let mut recorder = SessionRecorder::new();
        recorder.start_session(ExerciseKind::Squats, at_ms(0));
        let first = recorder.end_session(at_ms(1_000)).unwrap();
        recorder.start_session(ExerciseKind::Squats, at_ms(2_000));
        let second = recorder.end_session(at_ms(3_000)).unwrap();
        assert_ne!(first.id, second.id);
    }
}
