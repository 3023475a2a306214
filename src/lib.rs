//! gymbro - local workout tracker
//!
//! Training days hold workouts, workouts hold dated set/rep/weight logs.
//! The whole thing lives in one JSON document on disk, rewritten whole on
//! every change.

pub mod error;
pub mod model;
pub mod progression;
pub mod store;
pub mod tui;

pub use store::Store;
