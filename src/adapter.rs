//! Landmark-source adaptation
//!
//! Parses the payload a pose-estimation frontend emits once per processed
//! camera frame into core landmark frames. The core never talks to a
//! camera or a model; this boundary is the only place raw frame JSON is
//! interpreted.
//!
//! Expected shape, one JSON object per frame:
//!
//! ```json
//! {"timestamp": "2024-01-15T10:00:00Z",
//!  "landmarks": [{"x": 0.5, "y": 0.3, "visibility": 0.98}, null, ...]}
//! ```
//!
//! with exactly 33 entries; `null` marks a landmark the tracker lost.

use crate::error::MotionError;
use crate::types::{Landmark, LandmarkFrame};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Raw frame payload as produced by the landmark source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawFramePayload {
    pub timestamp: DateTime<Utc>,
    pub landmarks: Vec<Option<RawLandmark>>,
}

/// One raw landmark entry
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RawLandmark {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<f64>,
}

/// A landmark frame paired with its capture timestamp
#[derive(Debug, Clone)]
pub struct TimedFrame {
    pub at: DateTime<Utc>,
    pub frame: LandmarkFrame,
}

/// Parse one frame payload
pub fn parse_frame(json: &str) -> Result<TimedFrame, MotionError> {
    let payload: RawFramePayload = serde_json::from_str(json)
        .map_err(|e| MotionError::ParseError(format!("frame payload: {e}")))?;
    payload_to_frame(payload)
}

/// Parse a batch of newline-delimited frame payloads, in order.
/// Blank lines are skipped.
pub fn parse_ndjson(input: &str) -> Result<Vec<TimedFrame>, MotionError> {
    let mut frames = Vec::new();
    for (line_no, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let frame = parse_frame(line)
            .map_err(|e| MotionError::ParseError(format!("line {}: {e}", line_no + 1)))?;
        frames.push(frame);
    }
    Ok(frames)
}

fn payload_to_frame(payload: RawFramePayload) -> Result<TimedFrame, MotionError> {
    let landmarks = payload
        .landmarks
        .into_iter()
        .map(|raw| {
            raw.map(|r| Landmark {
                x: r.x,
                y: r.y,
                visibility: r.visibility,
            })
        })
        .collect();

    Ok(TimedFrame {
        at: payload.timestamp,
        frame: LandmarkFrame::new(landmarks)?,
    })
}
