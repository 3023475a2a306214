//! Progression heuristic - what to do next based on the last log
//!
//! Pure function of the last log's weight and reps: 8 or more reps means the
//! weight can go up, 6-7 means hold, fewer means back off.

use std::fmt;

use crate::model::{LogEntry, Workout};

/// Reps at or above this suggest adding weight.
const TARGET_REPS: u32 = 8;

/// Suggested weight step when the target is hit.
pub const WEIGHT_INCREMENT_KG: f64 = 2.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Suggestion {
    /// Target reps reached, add weight next time.
    Increase { from_kg: f64, increment_kg: f64 },
    /// One or two reps short, stay at the current weight.
    Hold { kg: f64 },
    /// Well short of target, back off or chase reps first.
    Reduce { kg: f64 },
}

/// Classify a log entry against the fixed rep thresholds.
pub fn suggest(last: &LogEntry) -> Suggestion {
    if last.reps >= TARGET_REPS {
        Suggestion::Increase {
            from_kg: last.kg,
            increment_kg: WEIGHT_INCREMENT_KG,
        }
    } else if last.reps >= TARGET_REPS - 2 {
        Suggestion::Hold { kg: last.kg }
    } else {
        Suggestion::Reduce { kg: last.kg }
    }
}

/// Suggestion for a workout's last log, `None` when nothing is logged yet.
pub fn for_workout(workout: &Workout) -> Option<Suggestion> {
    workout.last_log().map(suggest)
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Suggestion::Increase {
                from_kg,
                increment_kg,
            } => write!(
                f,
                "Good - consider increasing +{increment_kg}kg from {from_kg}kg"
            ),
            Suggestion::Hold { kg } => {
                write!(f, "Close - keep {kg}kg or try same weight next time")
            }
            Suggestion::Reduce { kg } => {
                write!(f, "Reduce weight or aim for more reps at {kg}kg")
            }
        }
    }
}
