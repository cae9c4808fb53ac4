use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Auth models ---------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct User {
    pub pk: i64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_verified: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RegisterData {
    pub username: String,
    pub email: String,
    pub password1: String,
    pub password2: String,
}

/// Returned by login and registration.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AuthResponse {
    pub access: String,
    pub refresh: String,
    pub user: User,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TokenRefreshRequest {
    pub refresh: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TokenRefreshResponse {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

// Exercise library ----------------------------------------------------------

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Exercise {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub force: Option<String>,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub mechanic: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub equipment: Option<String>,
    #[serde(default)]
    pub primary_muscles: Vec<String>,
    #[serde(default)]
    pub secondary_muscles: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Category {
    pub category: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct MuscleGroup {
    pub id: i64,
    pub name: String,
}

/// One page of a paginated listing.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Paginated<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// A listing endpoint may answer with a page or a bare array depending on
/// whether pagination is enabled for it.
#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum Listing<T> {
    Page(Paginated<T>),
    Plain(Vec<T>),
}

impl<T> Listing<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            Listing::Page(page) => page.results,
            Listing::Plain(items) => items,
        }
    }
}

// Profiles ------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Profile {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_public: bool,
    pub gender: Option<String>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub body_fat_percentage: Option<f64>,
    pub updated_at: DateTime<Utc>,
    pub date_joined: DateTime<Utc>,
    pub about_me: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_fat_percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub about_me: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PublicProfile {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: Option<String>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub body_fat_percentage: Option<f64>,
    pub date_joined: DateTime<Utc>,
    pub about_me: Option<String>,
}

// Plans ---------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PlannedSet {
    pub id: i64,
    pub exercise: i64,
    pub order: u32,
    #[serde(default)]
    pub target_reps: Option<String>,
    #[serde(default)]
    pub target_weight: Option<String>,
    #[serde(default)]
    pub rest_time_after: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ExerciseGroup {
    pub id: i64,
    pub order: u32,
    #[serde(default)]
    pub name: Option<String>,
    pub sets: Vec<PlannedSet>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WorkoutPlan {
    pub id: i64,
    #[serde(default)]
    pub owner_username: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub groups: Vec<ExerciseGroup>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlannedSetInput {
    pub exercise: i64,
    pub order: u32,
    pub target_reps: Option<String>,
    pub target_weight: Option<String>,
    pub rest_time_after: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ExerciseGroupInput {
    pub order: u32,
    pub name: Option<String>,
    pub sets: Vec<PlannedSetInput>,
}

/// Body for creating a plan; groups and sets are created with it.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WorkoutPlanInput {
    pub name: String,
    pub description: Option<String>,
    pub groups: Vec<ExerciseGroupInput>,
}

impl WorkoutPlanInput {
    /// Same groups and sets as `plan` under a new name.
    pub fn copy_of(plan: &WorkoutPlan, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: plan.description.clone(),
            groups: plan
                .groups
                .iter()
                .map(|g| ExerciseGroupInput {
                    order: g.order,
                    name: g.name.clone(),
                    sets: g
                        .sets
                        .iter()
                        .map(|s| PlannedSetInput {
                            exercise: s.exercise,
                            order: s.order,
                            target_reps: s.target_reps.clone(),
                            target_weight: s.target_weight.clone(),
                            rest_time_after: s.rest_time_after,
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

// Sessions & logged sets ----------------------------------------------------

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    InProgress,
    Completed,
    Cancelled,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LoggedSet {
    pub id: i64,
    pub session: i64,
    pub exercise: i64,
    #[serde(default)]
    pub planned_set: Option<i64>,
    pub order: u32,
    pub actual_reps: u32,
    pub actual_weight: String,
    #[serde(default)]
    pub actual_rest_time: Option<u32>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LoggedSetInput {
    pub session_id: i64,
    pub exercise: i64,
    pub planned_set: Option<i64>,
    pub order: u32,
    pub actual_reps: u32,
    pub actual_weight: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_rest_time: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WorkoutSession {
    pub id: i64,
    #[serde(default)]
    pub owner_username: String,
    #[serde(default)]
    pub plan: Option<i64>,
    #[serde(default)]
    pub plan_details: Option<WorkoutPlan>,
    pub status: SessionStatus,
    #[serde(default)]
    pub current_group_index: usize,
    #[serde(default)]
    pub current_set_index: usize,
    pub date_started: DateTime<Utc>,
    #[serde(default)]
    pub date_finished: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub logged_sets: Vec<LoggedSet>,
}

/// Lighter row used by history listings.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SessionSummary {
    pub id: i64,
    #[serde(default)]
    pub owner_username: String,
    #[serde(default)]
    pub plan: Option<i64>,
    #[serde(default)]
    pub plan_name: Option<String>,
    pub status: SessionStatus,
    pub date_started: DateTime<Utc>,
    #[serde(default)]
    pub date_finished: Option<DateTime<Utc>>,
    #[serde(default)]
    pub set_count: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StartSessionInput {
    pub plan: Option<i64>,
    pub date_started: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct ProgressUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_group_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_set_index: Option<usize>,
}
