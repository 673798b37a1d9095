//! Motion CLI - Command-line interface for Synheart Motion
//!
//! Commands:
//! - track: Count reps in a recorded frame stream and emit the session
//! - assess: Run a timed-hold assessment over a recorded frame stream
//! - dashboard: Derive dashboard statistics from a session store
//! - validate: Validate frame payloads

use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use synheart_motion::adapter::{self, TimedFrame};
use synheart_motion::assessment::{AssessmentRunner, Sport};
use synheart_motion::dashboard;
use synheart_motion::error::{MotionError, StoreError};
use synheart_motion::store::{JsonFileStore, SessionStore};
use synheart_motion::types::ExerciseKind;
use synheart_motion::{frames_to_session, MOTION_VERSION};

/// Motion - On-device compute engine for camera-driven exercise tracking
#[derive(Parser)]
#[command(name = "motion")]
#[command(author = "Synheart AI Inc")]
#[command(version = MOTION_VERSION)]
#[command(about = "Count reps and score exercise form from pose frames", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Count reps in a recorded frame stream and emit the finalized session
    Track {
        /// Input file of NDJSON frame payloads (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Exercise to track (pushups, squats, bicep-curls, jumping-jacks)
        #[arg(long)]
        exercise: String,

        /// Inter-rep cooldown in milliseconds
        #[arg(long, default_value = "1000")]
        cooldown_ms: i64,

        /// Append the finalized session to this store file
        #[arg(long)]
        store: Option<PathBuf>,

        /// User id the session is stored under
        #[arg(long, default_value = "default")]
        user: String,
    },

    /// Run a timed-hold assessment over a recorded frame stream
    Assess {
        /// Input file of NDJSON frame payloads (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Sport plan to run (gymnastics, yoga)
        #[arg(long)]
        sport: String,
    },

    /// Derive dashboard statistics from a session store
    Dashboard {
        /// Session store file
        #[arg(long)]
        store: PathBuf,

        /// User id to report on
        #[arg(long, default_value = "default")]
        user: String,

        /// Output file (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,
    },

    /// Validate frame payloads
    Validate {
        /// Input file of NDJSON frame payloads (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, thiserror::Error)]
enum MotionCliError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Motion(#[from] MotionError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("No frames in input")]
    NoFrames,

    #[error("Validation failed: {0} invalid frame(s)")]
    ValidationFailed(usize),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), MotionCliError> {
    match cli.command {
        Commands::Track {
            input,
            output,
            exercise,
            cooldown_ms,
            store,
            user,
        } => cmd_track(
            &input,
            &output,
            &exercise,
            cooldown_ms,
            store.as_deref(),
            &user,
        ),

        Commands::Assess {
            input,
            output,
            sport,
        } => cmd_assess(&input, &output, &sport),

        Commands::Dashboard {
            store,
            user,
            output,
        } => cmd_dashboard(&store, &user, &output),

        Commands::Validate { input, json } => cmd_validate(&input, json),
    }
}

fn read_input(input: &Path) -> Result<String, MotionCliError> {
    if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn write_output(output: &Path, data: &str) -> Result<(), MotionCliError> {
    if output.to_string_lossy() == "-" {
        println!("{data}");
        Ok(())
    } else {
        Ok(fs::write(output, data)?)
    }
}

/// Pretty-print when writing to an interactive terminal
fn encode<T: serde::Serialize>(value: &T, output: &Path) -> Result<String, MotionCliError> {
    let interactive = output.to_string_lossy() == "-" && atty::is(atty::Stream::Stdout);
    if interactive {
        Ok(serde_json::to_string_pretty(value)?)
    } else {
        Ok(serde_json::to_string(value)?)
    }
}

fn cmd_track(
    input: &Path,
    output: &Path,
    exercise: &str,
    cooldown_ms: i64,
    store: Option<&Path>,
    user: &str,
) -> Result<(), MotionCliError> {
    let kind = ExerciseKind::parse(exercise)?;
    let frames = adapter::parse_ndjson(&read_input(input)?)?;
    if frames.is_empty() {
        return Err(MotionCliError::NoFrames);
    }

    // frames_to_session applies the default cooldown; rebuild with the
    // requested one when it differs
    let session = if cooldown_ms == synheart_motion::detector::DEFAULT_REP_COOLDOWN_MS {
        frames_to_session(kind, &frames)
    } else {
        let mut processor =
            synheart_motion::MotionProcessor::new().with_cooldown_ms(cooldown_ms);
        processor.start_exercise(kind, frames[0].at);
        for timed in &frames {
            processor.process_frame(&timed.frame, timed.at);
        }
        processor.finish_exercise(frames[frames.len() - 1].at)
    }
    .ok_or(MotionCliError::NoFrames)?;

    if let Some(store_path) = store {
        let mut file_store = JsonFileStore::new(store_path);
        file_store.append(user, &session)?;
        eprintln!(
            "stored session {} for user {} ({} reps)",
            session.id,
            user,
            session.rep_count()
        );
    }

    write_output(output, &encode(&session, output)?)
}

fn cmd_assess(input: &Path, output: &Path, sport: &str) -> Result<(), MotionCliError> {
    let sport = Sport::parse(sport)?;
    let frames = adapter::parse_ndjson(&read_input(input)?)?;
    if frames.is_empty() {
        return Err(MotionCliError::NoFrames);
    }

    let mut runner = AssessmentRunner::new(sport);
    for TimedFrame { at, frame } in &frames {
        if runner.is_complete() {
            break;
        }
        if runner.current_exercise().is_some() {
            runner.start(*at);
        }
        runner.process_frame(frame, *at);
    }

    // frames ran out: close the in-progress drill and score the rest as
    // unattempted
    let last_at = frames[frames.len() - 1].at;
    while runner.advance(last_at) {}

    let report = runner
        .report()
        .ok_or_else(|| MotionError::EncodingError("assessment incomplete".to_string()))?;
    write_output(output, &encode(&report, output)?)
}

fn cmd_dashboard(store: &Path, user: &str, output: &Path) -> Result<(), MotionCliError> {
    let file_store = JsonFileStore::new(store);
    let sessions = file_store.history(user)?;
    let data = dashboard::dashboard_data(&sessions, chrono::Utc::now());
    write_output(output, &encode(&data, output)?)
}

#[derive(serde::Serialize)]
struct ValidationReport {
    total_frames: usize,
    valid_frames: usize,
    invalid_frames: usize,
    errors: Vec<ValidationErrorDetail>,
}

#[derive(serde::Serialize)]
struct ValidationErrorDetail {
    line: usize,
    error: String,
}

fn cmd_validate(input: &Path, json: bool) -> Result<(), MotionCliError> {
    let input_data = read_input(input)?;

    let mut total = 0usize;
    let mut errors = Vec::new();
    for (line_no, line) in input_data.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        total += 1;
        if let Err(e) = adapter::parse_frame(line) {
            errors.push(ValidationErrorDetail {
                line: line_no + 1,
                error: e.to_string(),
            });
        }
    }

    let report = ValidationReport {
        total_frames: total,
        valid_frames: total - errors.len(),
        invalid_frames: errors.len(),
        errors,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Total frames:   {}", report.total_frames);
        println!("Valid frames:   {}", report.valid_frames);
        println!("Invalid frames: {}", report.invalid_frames);

        if !report.errors.is_empty() {
            println!("\nErrors:");
            for err in &report.errors {
                println!("  - line {}: {}", err.line, err.error);
            }
        }
    }

    if report.invalid_frames > 0 {
        Err(MotionCliError::ValidationFailed(report.invalid_frames))
    } else {
        Ok(())
    }
}
