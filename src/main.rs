//! gymbro - local workout tracker
//!
//! Training days, workouts and set/rep/weight logs in one JSON file.

use std::path::PathBuf;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};

use gymbro::error::StoreError;
use gymbro::model::{Day, Document, RandomIdGen, Workout};
use gymbro::progression;
use gymbro::store::{DATA_PATH, Store};
use gymbro::tui::App;

#[derive(Parser)]
#[command(name = "gymbro")]
#[command(version, about = "Local workout tracker: days, workouts, set/rep/weight logs")]
struct Cli {
    /// Path to the JSON data file
    #[arg(long, global = true, default_value = DATA_PATH)]
    data: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open TUI dashboard
    Tui,

    /// List training days
    Days,

    /// Show workouts and logs for a day (all days if omitted)
    Show {
        /// Day id or name
        day: Option<String>,
    },

    /// Add a workout to a day
    AddWorkout {
        /// Day id or name
        day: String,

        /// Workout name (e.g. "Bench Press")
        name: String,

        /// Optional image URI, stored verbatim
        #[arg(long)]
        image: Option<String>,
    },

    /// Log weight/sets/reps for a workout
    Log {
        /// Day id or name
        day: String,

        /// Workout id or name
        workout: String,

        /// Weight in kg
        #[arg(short, long)]
        kg: f64,

        /// Number of sets
        #[arg(short, long, default_value = "1")]
        sets: u32,

        /// Number of reps per set
        #[arg(short, long, default_value = "10")]
        reps: u32,

        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Repeat a workout's last log with today's date
    Repeat {
        day: String,
        workout: String,
    },

    /// Delete a workout's last log
    DeleteLast {
        day: String,
        workout: String,
    },

    /// Delete a workout from its day
    DeleteWorkout {
        day: String,
        workout: String,
    },

    /// Set a workout's image URI
    SetImage {
        day: String,
        workout: String,
        uri: String,
    },

    /// Print the whole document as pretty JSON
    Export,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let mut store = Store::open(cli.data)?;
    let mut ids = RandomIdGen;

    match cli.command {
        Some(Commands::Tui) | None => {
            let mut app = App::new(store);
            app.run()?;
        }

        Some(Commands::Days) => {
            for day in &store.current().days {
                println!("{:6} {} ({} workouts)", day.id, day.name, day.workouts.len());
            }
        }

        Some(Commands::Show { day }) => {
            let doc = store.current();
            match day {
                Some(key) => show_day(resolve_day(doc, &key)?),
                None => {
                    for day in &doc.days {
                        show_day(day);
                    }
                }
            }
        }

        Some(Commands::AddWorkout { day, name, image }) => {
            let day_id = resolve_day(store.current(), &day)?.id.clone();
            let doc = store
                .current()
                .add_workout(&day_id, &name, image, &mut ids)?;
            store.save(doc)?;
            println!("Added workout: {} ({})", name.trim(), day_id);
        }

        Some(Commands::Log { day, workout, kg, sets, reps, date }) => {
            let (day_id, workout_id) = resolve_target(store.current(), &day, &workout)?;
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            let doc = store
                .current()
                .add_log(&day_id, &workout_id, kg, sets, reps, date, &mut ids)?;
            store.save(doc)?;
            println!("Logged: {}kg {}x{} on {}", kg, sets, reps, date);
        }

        Some(Commands::Repeat { day, workout }) => {
            let (day_id, workout_id) = resolve_target(store.current(), &day, &workout)?;
            let today = Local::now().date_naive();
            let doc = store
                .current()
                .repeat_last_log(&day_id, &workout_id, today, &mut ids)?;
            store.save(doc)?;
            if let Some(last) = store
                .current()
                .find_workout(&day_id, &workout_id)
                .and_then(Workout::last_log)
            {
                println!("Repeated: {}kg {}x{} on {}", last.kg, last.sets, last.reps, today);
            }
        }

        Some(Commands::DeleteLast { day, workout }) => {
            let (day_id, workout_id) = resolve_target(store.current(), &day, &workout)?;
            let doc = store.current().delete_last_log(&day_id, &workout_id);
            store.save(doc)?;
            println!("Deleted last log of {}", workout_id);
        }

        Some(Commands::DeleteWorkout { day, workout }) => {
            let (day_id, workout_id) = resolve_target(store.current(), &day, &workout)?;
            let doc = store.current().delete_workout(&day_id, &workout_id);
            store.save(doc)?;
            println!("Deleted workout {}", workout_id);
        }

        Some(Commands::SetImage { day, workout, uri }) => {
            let (day_id, workout_id) = resolve_target(store.current(), &day, &workout)?;
            let doc = store.current().set_workout_image(&day_id, &workout_id, &uri);
            store.save(doc)?;
            println!("Set image for {}", workout_id);
        }

        Some(Commands::Export) => {
            println!("{}", serde_json::to_string_pretty(store.current())?);
        }
    }

    Ok(())
}

fn show_day(day: &Day) {
    println!("{} ({})", day.name, day.id);
    if day.workouts.is_empty() {
        println!("  No workouts yet");
    }
    for workout in &day.workouts {
        let suggestion = progression::for_workout(workout)
            .map(|s| s.to_string())
            .unwrap_or_else(|| "No data yet".to_string());
        println!("  {} ({}) - {}", workout.name, workout.id, suggestion);
        for log in &workout.logs {
            println!("    {}kg {}x{} {}", log.kg, log.sets, log.reps, log.date);
        }
    }
}

/// Resolve a day by id, falling back to case-insensitive name match.
fn resolve_day<'a>(doc: &'a Document, key: &str) -> Result<&'a Day, StoreError> {
    doc.days
        .iter()
        .find(|d| d.id == key)
        .or_else(|| doc.days.iter().find(|d| d.name.eq_ignore_ascii_case(key)))
        .ok_or_else(|| StoreError::NotFound {
            what: "day",
            id: key.to_string(),
        })
}

/// Resolve a (day, workout) pair to their ids before mutating, so the user
/// gets a not-found error instead of a silent no-op.
fn resolve_target(
    doc: &Document,
    day_key: &str,
    workout_key: &str,
) -> Result<(String, String), StoreError> {
    let day = resolve_day(doc, day_key)?;
    let workout = day
        .workouts
        .iter()
        .find(|w| w.id == workout_key)
        .or_else(|| {
            day.workouts
                .iter()
                .find(|w| w.name.eq_ignore_ascii_case(workout_key))
        })
        .ok_or_else(|| StoreError::NotFound {
            what: "workout",
            id: workout_key.to_string(),
        })?;
    Ok((day.id.clone(), workout.id.clone()))
}
