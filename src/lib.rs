//! Synheart Motion - On-device compute engine for camera-driven exercise tracking
//!
//! Motion turns a stream of body-landmark frames into counted repetitions,
//! quality scores and session statistics through a deterministic pipeline:
//! frame adaptation → rep detection → score aggregation → session recording
//! → dashboard rollups.
//!
//! ## Modules
//!
//! - **Tracking pipeline**: hysteresis rep detectors for push-ups, squats,
//!   bicep curls and jumping jacks
//! - **Assessment module**: timed-hold assessments for gymnastics and yoga
//!   drill sequences

pub mod adapter;
pub mod assessment;
pub mod dashboard;
pub mod detector;
pub mod error;
pub mod geometry;
pub mod pipeline;
pub mod recorder;
pub mod scoring;
pub mod store;
pub mod types;

pub use error::{MotionError, StoreError};
pub use pipeline::{frames_to_session, track_ndjson, MotionProcessor};
pub use recorder::SessionRecorder;
pub use store::{JsonFileStore, MemoryStore, SessionStore};
pub use types::{ExerciseKind, LandmarkFrame, RepEvent, Session};

// Assessment exports
pub use assessment::{AssessmentRunner, Sport};

/// Motion version embedded in all serialized payloads
pub const MOTION_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for serialized payloads
pub const PRODUCER_NAME: &str = "synheart-motion";
