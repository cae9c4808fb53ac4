//! Core types and logic for the gym tracker client.
//!
//! Everything here is I/O free: backend DTOs, the workout tracker state
//! machine and the rest timer arithmetic it relies on.

pub mod error;
pub mod models;
pub mod notify;
pub mod rest_timer;
pub mod tracker;

pub use error::{TrackerError, TrackerResult};
pub use notify::NotificationCommand;
pub use rest_timer::{RestTimerState, format_clock};
pub use tracker::{Cursor, Effect, ExerciseCache, FormField, LogPlan, Phase, SetForm, Tracker};
