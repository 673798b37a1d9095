//! Dashboard rollups
//!
//! Pure derivations over a session collection, recomputed on demand. The
//! session list is the source of truth; every value here can be rebuilt
//! from it alone, so nothing in this module caches or mutates.

use crate::scoring::mean;
use crate::types::{ExerciseKind, Session};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Sessions shown in the recent-activity panel
const RECENT_SESSION_LIMIT: usize = 5;
/// Sessions shown in the top-performances panel
const TOP_PERFORMANCE_LIMIT: usize = 3;
/// A session counts toward the accuracy rate at this average overall score
const ACCURACY_THRESHOLD: f64 = 70.0;

/// One session projected into the trailing-week view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyEntry {
    /// Calendar date (YYYY-MM-DD, UTC) of the session start
    pub date: String,
    pub reps: usize,
    /// Session average overall score
    pub score: f64,
    pub exercise: ExerciseKind,
}

/// Weekly entries folded per calendar date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyEntry {
    pub date: String,
    pub sessions: usize,
    pub reps: usize,
    pub average_score: f64,
}

/// Per-exercise rollup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseStats {
    pub sessions: usize,
    pub total_reps: usize,
    /// Mean overall score across this kind's reps (not mean of session means)
    pub average_score: f64,
    /// Best per-session average overall score
    pub best_score: f64,
    /// Start time of the most recent session of this kind
    pub last_session: DateTime<Utc>,
}

/// Everything the dashboard surface needs, derived in one pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardData {
    pub total_sessions: usize,
    pub total_reps: usize,
    pub average_score: f64,
    pub accuracy_rate: f64,
    pub recent_sessions: Vec<Session>,
    pub top_performances: Vec<Session>,
    pub exercise_distribution: HashMap<ExerciseKind, usize>,
    pub weekly_progress: Vec<WeeklyEntry>,
    pub daily_progress: Vec<DailyEntry>,
    pub exercise_stats: HashMap<ExerciseKind, ExerciseStats>,
    pub best_scores: HashMap<ExerciseKind, f64>,
}

pub fn total_sessions(sessions: &[Session]) -> usize {
    sessions.len()
}

pub fn total_reps(sessions: &[Session]) -> usize {
    sessions.iter().map(Session::rep_count).sum()
}

/// Mean overall score over the flattened rep list across all sessions
pub fn average_score(sessions: &[Session]) -> f64 {
    mean(
        sessions
            .iter()
            .flat_map(|s| s.reps.iter().map(|r| r.overall_score)),
    )
}

/// Best per-session average overall score for each exercise kind
pub fn best_scores(sessions: &[Session]) -> HashMap<ExerciseKind, f64> {
    let mut best = HashMap::new();
    for session in sessions {
        let entry = best.entry(session.exercise).or_insert(f64::MIN);
        if session.average_overall_score > *entry {
            *entry = session.average_overall_score;
        }
    }
    best
}

/// Top `limit` sessions by start time, newest first
pub fn recent_sessions(sessions: &[Session], limit: usize) -> Vec<Session> {
    let mut sorted: Vec<Session> = sessions.to_vec();
    sorted.sort_by(|a, b| b.started_at.cmp(&a.started_at));
    sorted.truncate(limit);
    sorted
}

/// Top `limit` sessions by average overall score, best first
pub fn top_performances(sessions: &[Session], limit: usize) -> Vec<Session> {
    let mut sorted: Vec<Session> = sessions.to_vec();
    sorted.sort_by(|a, b| {
        b.average_overall_score
            .partial_cmp(&a.average_overall_score)
            .unwrap_or(Ordering::Equal)
    });
    sorted.truncate(limit);
    sorted
}

/// Session count per exercise kind
pub fn exercise_distribution(sessions: &[Session]) -> HashMap<ExerciseKind, usize> {
    let mut distribution = HashMap::new();
    for session in sessions {
        *distribution.entry(session.exercise).or_insert(0) += 1;
    }
    distribution
}

/// Sessions started within the trailing 7x24h window, projected for charting
pub fn weekly_progress(sessions: &[Session], now: DateTime<Utc>) -> Vec<WeeklyEntry> {
    let week_ago = now - Duration::days(7);
    sessions
        .iter()
        .filter(|s| s.started_at >= week_ago)
        .map(|s| WeeklyEntry {
            date: s.started_at.format("%Y-%m-%d").to_string(),
            reps: s.rep_count(),
            score: s.average_overall_score,
            exercise: s.exercise,
        })
        .collect()
}

/// Weekly entries grouped per calendar date, oldest first
pub fn daily_progress(sessions: &[Session], now: DateTime<Utc>) -> Vec<DailyEntry> {
    let mut by_date: HashMap<String, (usize, usize, f64)> = HashMap::new();
    for entry in weekly_progress(sessions, now) {
        let slot = by_date.entry(entry.date).or_insert((0, 0, 0.0));
        slot.0 += 1;
        slot.1 += entry.reps;
        slot.2 += entry.score;
    }

    let mut daily: Vec<DailyEntry> = by_date
        .into_iter()
        .map(|(date, (sessions, reps, score_sum))| DailyEntry {
            date,
            sessions,
            reps,
            average_score: score_sum / sessions as f64,
        })
        .collect();
    daily.sort_by(|a, b| a.date.cmp(&b.date));
    daily
}

/// Per-kind rollups over the full session collection
pub fn exercise_stats(sessions: &[Session]) -> HashMap<ExerciseKind, ExerciseStats> {
    let mut stats = HashMap::new();
    for kind in ExerciseKind::all() {
        let of_kind: Vec<&Session> = sessions.iter().filter(|s| s.exercise == kind).collect();
        let last = match of_kind.last() {
            Some(session) => session.started_at,
            None => continue,
        };

        stats.insert(
            kind,
            ExerciseStats {
                sessions: of_kind.len(),
                total_reps: of_kind.iter().map(|s| s.rep_count()).sum(),
                average_score: mean(
                    of_kind
                        .iter()
                        .flat_map(|s| s.reps.iter().map(|r| r.overall_score)),
                ),
                best_score: of_kind
                    .iter()
                    .map(|s| s.average_overall_score)
                    .fold(f64::MIN, f64::max),
                last_session: last,
            },
        );
    }
    stats
}

/// Share of recent sessions (0-100) whose average overall score reaches the
/// accuracy threshold
pub fn accuracy_rate(sessions: &[Session]) -> f64 {
    let recent = recent_sessions(sessions, RECENT_SESSION_LIMIT);
    if recent.is_empty() {
        return 0.0;
    }
    let good = recent
        .iter()
        .filter(|s| s.average_overall_score >= ACCURACY_THRESHOLD)
        .count();
    good as f64 / recent.len() as f64 * 100.0
}

/// Derive the complete dashboard payload
pub fn dashboard_data(sessions: &[Session], now: DateTime<Utc>) -> DashboardData {
    DashboardData {
        total_sessions: total_sessions(sessions),
        total_reps: total_reps(sessions),
        average_score: average_score(sessions),
        accuracy_rate: accuracy_rate(sessions),
        recent_sessions: recent_sessions(sessions, RECENT_SESSION_LIMIT),
        top_performances: top_performances(sessions, TOP_PERFORMANCE_LIMIT),
        exercise_distribution: exercise_distribution(sessions),
        weekly_progress: weekly_progress(sessions, now),
        daily_progress: daily_progress(sessions, now),
        exercise_stats: exercise_stats(sessions),
        best_scores: best_scores(sessions),
    }
}
