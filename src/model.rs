//! Document model - the nested workout document and its pure mutations
//!
//! The whole persisted unit is one `Document`: an ordered list of days, each
//! holding an ordered list of workouts, each holding append-ordered logs.
//! Every mutation takes `&self` and returns a fresh `Document`; the input is
//! never touched, so the store always persists a consistent snapshot.

use chrono::NaiveDate;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// The whole persisted document. Day order is display order and survives
/// rewrites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub days: Vec<Day>,
}

/// A named training-day slot (e.g. "Day 1 - Push").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Day {
    pub id: String,
    pub name: String,
    pub workouts: Vec<Workout>,
}

/// A named exercise routine tracked over time within a day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    pub id: String,
    pub name: String,
    #[serde(rename = "imageUri", default, skip_serializing_if = "Option::is_none")]
    pub image_uri: Option<String>,
    pub logs: Vec<LogEntry>,
}

/// One dated record of weight/sets/reps performed for a workout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    pub kg: f64,
    pub sets: u32,
    pub reps: u32,
    /// ISO calendar date, serialized as "YYYY-MM-DD"
    pub date: NaiveDate,
}

/// Id generator, injectable so tests can be deterministic.
///
/// Ids only need to be unique within one parent's children list, so short
/// process-local randomness is enough.
pub trait IdGen {
    fn next(&mut self, prefix: &str) -> String;
}

/// Prefix plus 7 random base-36 characters, e.g. `w3k9x0pa`.
#[derive(Debug, Default)]
pub struct RandomIdGen;

impl IdGen for RandomIdGen {
    fn next(&mut self, prefix: &str) -> String {
        const CHARS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
        let mut rng = rand::thread_rng();
        let suffix: String = (0..7)
            .map(|_| CHARS[rng.gen_range(0..CHARS.len())] as char)
            .collect();
        format!("{prefix}{suffix}")
    }
}

/// Counting generator for tests: `w1`, `w2`, ...
#[derive(Debug, Default)]
pub struct SequentialIdGen {
    counter: u64,
}

impl SequentialIdGen {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGen for SequentialIdGen {
    fn next(&mut self, prefix: &str) -> String {
        self.counter += 1;
        format!("{prefix}{}", self.counter)
    }
}

impl Workout {
    /// Last log entry, the template for "repeat" and the progression input.
    pub fn last_log(&self) -> Option<&LogEntry> {
        self.logs.last()
    }
}

/// Draw ids until one unused by the siblings comes up, keeping ids unique
/// within their parent collection regardless of what the generator returns.
fn unused_id<'a>(
    ids: &mut dyn IdGen,
    prefix: &str,
    taken: impl Iterator<Item = &'a str> + Clone,
) -> String {
    loop {
        let id = ids.next(prefix);
        if !taken.clone().any(|t| t == id) {
            return id;
        }
    }
}

impl Document {
    pub fn find_day(&self, day_id: &str) -> Option<&Day> {
        self.days.iter().find(|d| d.id == day_id)
    }

    pub fn find_workout(&self, day_id: &str, workout_id: &str) -> Option<&Workout> {
        self.find_day(day_id)?
            .workouts
            .iter()
            .find(|w| w.id == workout_id)
    }

    /// Append a workout with empty logs to the matching day.
    ///
    /// Unknown `day_id` returns the document unchanged; an empty name after
    /// trimming is a validation error.
    pub fn add_workout(
        &self,
        day_id: &str,
        name: &str,
        image_uri: Option<String>,
        ids: &mut dyn IdGen,
    ) -> Result<Document, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::validation("workout name is empty"));
        }
        let mut doc = self.clone();
        if let Some(day) = doc.days.iter_mut().find(|d| d.id == day_id) {
            let id = unused_id(ids, "w", day.workouts.iter().map(|w| w.id.as_str()));
            day.workouts.push(Workout {
                id,
                name: name.to_string(),
                image_uri,
                logs: Vec::new(),
            });
        }
        Ok(doc)
    }

    /// Append a log entry to the matching workout.
    pub fn add_log(
        &self,
        day_id: &str,
        workout_id: &str,
        kg: f64,
        sets: u32,
        reps: u32,
        date: NaiveDate,
        ids: &mut dyn IdGen,
    ) -> Result<Document, StoreError> {
        if !kg.is_finite() || kg < 0.0 {
            return Err(StoreError::validation(format!(
                "weight must be a non-negative number, got {kg}"
            )));
        }
        let mut doc = self.clone();
        if let Some(workout) = doc.workout_mut(day_id, workout_id) {
            let id = unused_id(ids, "l", workout.logs.iter().map(|l| l.id.as_str()));
            workout.logs.push(LogEntry {
                id,
                kg,
                sets,
                reps,
                date,
            });
        }
        Ok(doc)
    }

    /// Duplicate the matching workout's last log with a fresh id and `today`
    /// as the date. Errors with "no previous data" when the workout exists
    /// but has no logs yet.
    pub fn repeat_last_log(
        &self,
        day_id: &str,
        workout_id: &str,
        today: NaiveDate,
        ids: &mut dyn IdGen,
    ) -> Result<Document, StoreError> {
        let mut doc = self.clone();
        if let Some(workout) = doc.workout_mut(day_id, workout_id) {
            let Some(last) = workout.logs.last() else {
                return Err(StoreError::validation("no previous data to repeat"));
            };
            let last = last.clone();
            let id = unused_id(ids, "l", workout.logs.iter().map(|l| l.id.as_str()));
            workout.logs.push(LogEntry {
                id,
                date: today,
                ..last
            });
        }
        Ok(doc)
    }

    /// Remove the matching workout's last log. No-op when already empty.
    pub fn delete_last_log(&self, day_id: &str, workout_id: &str) -> Document {
        let mut doc = self.clone();
        if let Some(workout) = doc.workout_mut(day_id, workout_id) {
            workout.logs.pop();
        }
        doc
    }

    /// Remove the matching workout from its day.
    pub fn delete_workout(&self, day_id: &str, workout_id: &str) -> Document {
        let mut doc = self.clone();
        if let Some(day) = doc.days.iter_mut().find(|d| d.id == day_id) {
            day.workouts.retain(|w| w.id != workout_id);
        }
        doc
    }

    /// Set or replace the matching workout's image URI. The URI is opaque and
    /// stored verbatim.
    pub fn set_workout_image(&self, day_id: &str, workout_id: &str, uri: &str) -> Document {
        let mut doc = self.clone();
        if let Some(workout) = doc.workout_mut(day_id, workout_id) {
            workout.image_uri = Some(uri.to_string());
        }
        doc
    }

    fn workout_mut(&mut self, day_id: &str, workout_id: &str) -> Option<&mut Workout> {
        self.days
            .iter_mut()
            .find(|d| d.id == day_id)?
            .workouts
            .iter_mut()
            .find(|w| w.id == workout_id)
    }
}
