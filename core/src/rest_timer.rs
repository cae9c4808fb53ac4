//! Rest period bookkeeping that survives restarts.
//!
//! The countdown shown on screen is cosmetic; whether a rest is over is
//! always re-derived from the wall-clock start time and the target duration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A rest period in progress, stored locally and never sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestTimerState {
    pub session_id: i64,
    /// Unix timestamp in milliseconds.
    pub start_time: i64,
    /// Total rest duration in seconds.
    pub target_duration: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercise_name: Option<String>,
}

impl RestTimerState {
    pub fn new(
        session_id: i64,
        started_at: DateTime<Utc>,
        target_duration: u32,
        exercise_name: Option<String>,
    ) -> Self {
        Self {
            session_id,
            start_time: started_at.timestamp_millis(),
            target_duration,
            exercise_name,
        }
    }

    /// Records missing any of the identifying fields are unusable.
    pub fn is_complete(&self) -> bool {
        self.session_id != 0 && self.start_time != 0 && self.target_duration != 0
    }

    pub fn is_for_session(&self, session_id: i64) -> bool {
        self.session_id == session_id
    }

    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> u64 {
        let elapsed_ms = now.timestamp_millis() - self.start_time;
        if elapsed_ms <= 0 {
            0
        } else {
            (elapsed_ms / 1000) as u64
        }
    }

    pub fn remaining_secs(&self, now: DateTime<Utc>) -> u32 {
        u64::from(self.target_duration).saturating_sub(self.elapsed_secs(now)) as u32
    }

    pub fn has_expired(&self, now: DateTime<Utc>) -> bool {
        self.remaining_secs(now) == 0
    }

    /// How long ago the rest ended, zero while it is still running.
    pub fn overtime_secs(&self, now: DateTime<Utc>) -> u64 {
        self.elapsed_secs(now)
            .saturating_sub(u64::from(self.target_duration))
    }

    pub fn display_name(&self) -> &str {
        self.exercise_name.as_deref().unwrap_or("your exercise")
    }
}

/// Formats seconds as `MM:SS`.
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn remaining_counts_down_and_never_goes_negative() {
        let timer = RestTimerState::new(5, at(0), 90, Some("Bench Press".into()));

        assert_eq!(timer.remaining_secs(at(0)), 90);
        assert_eq!(timer.remaining_secs(at(45)), 45);
        assert_eq!(timer.remaining_secs(at(200)), 0);
        assert!(timer.has_expired(at(200)));
        assert!(!timer.has_expired(at(89)));
    }

    #[test]
    fn elapsed_truncates_to_whole_seconds() {
        let timer = RestTimerState::new(5, at(0), 60, None);
        let now = at(10) + Duration::milliseconds(999);
        assert_eq!(timer.elapsed_secs(now), 10);
        assert_eq!(timer.remaining_secs(now), 50);
        // A clock that moved backwards does not extend the rest.
        assert_eq!(timer.remaining_secs(at(-30)), 60);
    }

    #[test]
    fn overtime_only_after_expiry() {
        let timer = RestTimerState::new(5, at(0), 60, None);
        assert_eq!(timer.overtime_secs(at(30)), 0);
        assert_eq!(timer.overtime_secs(at(125)), 65);
    }

    #[test]
    fn ownership_check_rejects_other_sessions() {
        let timer = RestTimerState::new(5, at(0), 60, None);
        assert!(timer.is_for_session(5));
        assert!(!timer.is_for_session(7));
    }

    #[test]
    fn incomplete_records_are_flagged() {
        let mut timer = RestTimerState::new(5, at(0), 60, None);
        assert!(timer.is_complete());
        timer.target_duration = 0;
        assert!(!timer.is_complete());
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let timer = RestTimerState {
            session_id: 5,
            start_time: 1_000,
            target_duration: 60,
            exercise_name: Some("Squat".into()),
        };
        assert_eq!(
            serde_json::to_string(&timer).unwrap(),
            r#"{"sessionId":5,"startTime":1000,"targetDuration":60,"exerciseName":"Squat"}"#
        );
    }

    #[test]
    fn formats_clock() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(95), "01:35");
        assert_eq!(format_clock(600), "10:00");
    }
}
