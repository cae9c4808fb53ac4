use thiserror::Error;

pub type TrackerResult<T> = Result<T, TrackerError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackerError {
    #[error("no workout plan was selected")]
    MissingPlan,
    #[error("workout plan has no exercise groups")]
    EmptyPlan,
    #[error("exercise group {0} has no sets")]
    EmptyGroup(usize),
    #[error("session position (group {group}, set {set}) is outside the plan")]
    CursorOutOfRange { group: usize, set: usize },
    #[error("a request is already in flight")]
    Busy,
    #[error("action not available while {0}")]
    InvalidPhase(&'static str),
    #[error("all sets are logged, finish the workout")]
    AwaitingFinish,
    #[error("progress was not saved, continue to retry")]
    PendingAdvance,
    #[error("invalid reps: {0:?}")]
    InvalidReps(String),
    #[error("invalid weight: {0:?}")]
    InvalidWeight(String),
    #[error("already at the last set of the plan")]
    EndOfPlan,
}
