//! Typed wrappers over the backend resources.
//!
//! Paths are relative to the configured base URL and keep the backend's
//! trailing slashes.

pub mod auth;
pub mod categories;
pub mod exercises;
pub mod logged_sets;
pub mod muscle_groups;
pub mod plans;
pub mod profiles;
pub mod sessions;
