//! Commands understood by the background rest notifier.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationCommand {
    #[serde(rename = "SCHEDULE_REST_NOTIFICATION", rename_all = "camelCase")]
    ScheduleRest {
        duration_ms: u64,
        exercise_name: String,
        start_time: i64,
    },
    #[serde(rename = "CANCEL_REST_NOTIFICATION")]
    CancelRest,
}

/// Text for the notice shown when a rest ran out while the app was closed.
pub fn overtime_message(exercise_name: &str, overtime_secs: u64) -> String {
    format!(
        "Your rest for {exercise_name} ended {}m {}s ago",
        overtime_secs / 60,
        overtime_secs % 60
    )
}
