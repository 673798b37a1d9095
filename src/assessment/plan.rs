//! Assessment plans
//!
//! Sport-specific drill sequences for timed-hold assessments. Plans are
//! static configuration; drill order is the order athletes perform them.

use crate::error::MotionError;
use serde::{Deserialize, Serialize};

/// Sport an assessment plan belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sport {
    Gymnastics,
    Yoga,
}

impl Sport {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sport::Gymnastics => "gymnastics",
            Sport::Yoga => "yoga",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Sport::Gymnastics => "Gymnastics",
            Sport::Yoga => "Yoga",
        }
    }

    pub fn parse(s: &str) -> Result<Self, MotionError> {
        match s {
            "gymnastics" => Ok(Sport::Gymnastics),
            "yoga" => Ok(Sport::Yoga),
            other => Err(MotionError::UnknownSport(other.to_string())),
        }
    }
}

/// One timed-hold drill
#[derive(Debug, Clone)]
pub struct HoldExercise {
    pub name: &'static str,
    pub description: &'static str,
    /// Target hold duration; reaching it auto-advances the assessment
    pub target_secs: u32,
    pub instructions: &'static [&'static str],
}

/// Ordered drill sequence for one sport
#[derive(Debug, Clone)]
pub struct AssessmentPlan {
    pub sport: Sport,
    pub exercises: Vec<HoldExercise>,
}

impl AssessmentPlan {
    pub fn for_sport(sport: Sport) -> Self {
        let exercises = match sport {
            Sport::Gymnastics => vec![
                HoldExercise {
                    name: "Handstand Hold",
                    description: "Hold a handstand position for 30 seconds",
                    target_secs: 30,
                    instructions: &[
                        "Position yourself in front of the camera",
                        "Kick up into a handstand against a wall",
                        "Keep your body straight and aligned",
                        "Hold the position for the full duration",
                    ],
                },
                HoldExercise {
                    name: "Bridge Hold",
                    description: "Hold a bridge position for 20 seconds",
                    target_secs: 20,
                    instructions: &[
                        "Lie on your back with knees bent",
                        "Place hands by your ears",
                        "Push up into a bridge position",
                        "Keep your body in a straight line",
                    ],
                },
                HoldExercise {
                    name: "Plank Hold",
                    description: "Hold a plank position for 45 seconds",
                    target_secs: 45,
                    instructions: &[
                        "Start in push-up position",
                        "Lower to forearms",
                        "Keep body straight from head to heels",
                        "Engage your core throughout",
                    ],
                },
                HoldExercise {
                    name: "L-Sit Hold",
                    description: "Hold an L-sit position for 15 seconds",
                    target_secs: 15,
                    instructions: &[
                        "Sit on the floor with legs extended",
                        "Place hands beside your hips",
                        "Lift your body off the ground",
                        "Keep legs straight and parallel to ground",
                    ],
                },
                HoldExercise {
                    name: "Wall Walk",
                    description: "Perform 5 wall walks",
                    target_secs: 60,
                    instructions: &[
                        "Start in plank position facing wall",
                        "Walk feet up the wall while walking hands closer",
                        "Get as close to the wall as possible",
                        "Walk back down to starting position",
                    ],
                },
            ],
            Sport::Yoga => vec![
                HoldExercise {
                    name: "Tree Pose",
                    description: "Hold tree pose for 30 seconds on each side",
                    target_secs: 60,
                    instructions: &[
                        "Stand on one leg",
                        "Place other foot on inner thigh",
                        "Bring hands to prayer position",
                        "Focus on a fixed point for balance",
                    ],
                },
                HoldExercise {
                    name: "Warrior III",
                    description: "Hold warrior III pose for 20 seconds on each side",
                    target_secs: 40,
                    instructions: &[
                        "Stand on one leg",
                        "Hinge forward at hips",
                        "Extend other leg behind you",
                        "Keep body in straight line",
                    ],
                },
            ],
        };
        Self { sport, exercises }
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }
}
