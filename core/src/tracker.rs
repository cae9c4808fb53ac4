//! Workout tracking state machine.
//!
//! The tracker walks a plan group by group and set by set. It performs no
//! I/O: backend calls are split into a `begin_*` step that yields the request
//! payload and an `apply_*` step fed with the backend's answer, and every
//! side effect the caller must carry out is returned as an [`Effect`].

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::error::{TrackerError, TrackerResult};
use crate::models::{
    Exercise, ExerciseGroup, LoggedSet, LoggedSetInput, PlannedSet, ProgressUpdate,
    SessionStatus, WorkoutPlan, WorkoutSession,
};
use crate::notify::{NotificationCommand, overtime_message};
use crate::rest_timer::RestTimerState;

/// Position of the next expected set: `(group index, set index)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pub group: usize,
    pub set: usize,
}

impl Cursor {
    pub fn new(group: usize, set: usize) -> Self {
        Self { group, set }
    }

    pub fn of(session: &WorkoutSession) -> Self {
        Self::new(session.current_group_index, session.current_set_index)
    }

    pub fn to_update(self) -> ProgressUpdate {
        ProgressUpdate {
            current_group_index: Some(self.group),
            current_set_index: Some(self.set),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    ActiveSet,
    Resting { remaining: u32 },
    Finished,
    Canceled,
}

impl Phase {
    fn label(self) -> &'static str {
        match self {
            Phase::ActiveSet => "logging a set",
            Phase::Resting { .. } => "resting",
            Phase::Finished => "finished",
            Phase::Canceled => "canceled",
        }
    }
}

/// Work the caller has to carry out after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SaveRestTimer(RestTimerState),
    ClearRestTimer,
    Notify(NotificationCommand),
    RestOver { exercise_name: String },
    Overtime { message: String },
    SessionEnded { session_id: i64, status: SessionStatus },
}

/// Exercise lookup owned by one tracker run.
#[derive(Debug, Clone, Default)]
pub struct ExerciseCache {
    by_id: HashMap<i64, Exercise>,
}

impl ExerciseCache {
    pub fn new(exercises: Vec<Exercise>) -> Self {
        Self {
            by_id: exercises.into_iter().map(|e| (e.id, e)).collect(),
        }
    }

    pub fn get(&self, id: i64) -> Option<&Exercise> {
        self.by_id.get(&id)
    }

    pub fn name(&self, id: i64) -> String {
        self.get(id)
            .map(|e| e.name.clone())
            .unwrap_or_else(|| format!("Exercise #{id}"))
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Exercises sorted by name, for pickers.
    pub fn sorted(&self) -> Vec<&Exercise> {
        let mut all: Vec<_> = self.by_id.values().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Reps,
    Weight,
}

/// The set-logging form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetForm {
    pub reps: String,
    pub weight: String,
    pub field: FormField,
}

impl SetForm {
    pub fn empty() -> Self {
        Self {
            reps: String::new(),
            weight: String::new(),
            field: FormField::Reps,
        }
    }

    /// Pre-fills targets. Missing targets become "0" so the inputs stay numeric.
    pub fn for_set(set: &PlannedSet) -> Self {
        let reps = set
            .target_reps
            .as_deref()
            .and_then(leading_number)
            .unwrap_or_else(|| "0".into());
        let weight = set
            .target_weight
            .as_deref()
            .map(str::trim)
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| "0".into());

        Self {
            reps,
            weight,
            field: FormField::Reps,
        }
    }

    pub fn toggle_field(&mut self) {
        self.field = match self.field {
            FormField::Reps => FormField::Weight,
            FormField::Weight => FormField::Reps,
        };
    }

    pub fn push_char(&mut self, ch: char) {
        match self.field {
            FormField::Reps if ch.is_ascii_digit() => self.reps.push(ch),
            FormField::Weight if ch.is_ascii_digit() || (ch == '.' && !self.weight.contains('.')) => {
                self.weight.push(ch)
            }
            _ => {}
        }
    }

    pub fn backspace(&mut self) {
        match self.field {
            FormField::Reps => {
                self.reps.pop();
            }
            FormField::Weight => {
                self.weight.pop();
            }
        }
    }

    /// Parses the form into `(reps, weight)` as the backend expects them.
    pub fn parse(&self) -> TrackerResult<(u32, String)> {
        parse_performance(&self.reps, &self.weight)
    }
}

/// Payload for a planned-set log plus the cursor to store once it succeeds.
#[derive(Debug, Clone, PartialEq)]
pub struct LogPlan {
    pub input: LoggedSetInput,
    pub advance_to: Option<Cursor>,
}

#[derive(Debug, Clone, PartialEq)]
struct RestPlan {
    secs: u32,
    exercise_name: String,
}

#[derive(Debug, Clone, PartialEq)]
struct Advance {
    from: Cursor,
    to: Cursor,
    rest: Option<RestPlan>,
}

#[derive(Debug, Clone, PartialEq)]
enum InFlight {
    Log {
        advance_to: Option<Cursor>,
        rest_secs: Option<u32>,
    },
    CustomLog,
    Advance(Advance),
    Finish,
    Cancel,
}

pub struct Tracker {
    session: WorkoutSession,
    plan: WorkoutPlan,
    exercises: ExerciseCache,
    cursor: Cursor,
    phase: Phase,
    rest: Option<RestTimerState>,
    form: SetForm,
    in_flight: Option<InFlight>,
    pending_advance: Option<Advance>,
    awaiting_finish: bool,
    error: Option<String>,
}

/// Picks the plan for a session: the nested plan the backend sent, or the
/// one the user selected before starting.
pub fn resolve_plan(
    session: &WorkoutSession,
    selected: Option<WorkoutPlan>,
) -> TrackerResult<WorkoutPlan> {
    if let Some(plan) = &session.plan_details {
        return Ok(plan.clone());
    }
    match selected {
        Some(plan) if session.plan.is_none_or(|id| id == plan.id) => Ok(plan),
        _ => Err(TrackerError::MissingPlan),
    }
}

/// A plan without groups, or with an empty group, cannot be tracked.
pub fn validate_plan(plan: &WorkoutPlan) -> TrackerResult<()> {
    if plan.groups.is_empty() {
        return Err(TrackerError::EmptyPlan);
    }
    if let Some(idx) = plan.groups.iter().position(|g| g.sets.is_empty()) {
        return Err(TrackerError::EmptyGroup(idx));
    }
    Ok(())
}

fn validate_cursor(plan: &WorkoutPlan, cursor: Cursor) -> TrackerResult<()> {
    let in_range = plan
        .groups
        .get(cursor.group)
        .is_some_and(|g| cursor.set < g.sets.len());
    if in_range {
        Ok(())
    } else {
        Err(TrackerError::CursorOutOfRange {
            group: cursor.group,
            set: cursor.set,
        })
    }
}

/// Next position in the flattened (group, set) sequence.
fn next_cursor(plan: &WorkoutPlan, cursor: Cursor) -> Option<Cursor> {
    let group = plan.groups.get(cursor.group)?;
    if cursor.set + 1 < group.sets.len() {
        Some(Cursor::new(cursor.group, cursor.set + 1))
    } else if cursor.group + 1 < plan.groups.len() {
        Some(Cursor::new(cursor.group + 1, 0))
    } else {
        None
    }
}

fn locate_planned_set(plan: &WorkoutPlan, planned_set_id: i64) -> Option<(Cursor, &PlannedSet)> {
    plan.groups.iter().enumerate().find_map(|(g, group)| {
        group
            .sets
            .iter()
            .enumerate()
            .find(|(_, set)| set.id == planned_set_id)
            .map(|(s, set)| (Cursor::new(g, s), set))
    })
}

fn leading_number(text: &str) -> Option<String> {
    let digits: String = text
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    (!digits.is_empty()).then_some(digits)
}

fn parse_performance(reps: &str, weight: &str) -> TrackerResult<(u32, String)> {
    let reps = reps
        .trim()
        .parse::<u32>()
        .map_err(|_| TrackerError::InvalidReps(reps.to_string()))?;

    let weight_text = match weight.trim() {
        "" => "0",
        w => w,
    };
    let value = weight_text
        .parse::<f64>()
        .ok()
        .filter(|w| w.is_finite() && *w >= 0.0)
        .ok_or_else(|| TrackerError::InvalidWeight(weight.to_string()))?;

    Ok((reps, format!("{value:.2}")))
}

impl Tracker {
    /// Adopts an in-progress session and reconstructs any running rest.
    ///
    /// A persisted timer for this session wins over a rest derived from the
    /// last logged set; a timer naming another session is discarded.
    pub fn resume(
        session: WorkoutSession,
        plan: WorkoutPlan,
        exercises: ExerciseCache,
        persisted: Option<RestTimerState>,
        now: DateTime<Utc>,
    ) -> TrackerResult<(Self, Vec<Effect>)> {
        validate_plan(&plan)?;
        let cursor = Cursor::of(&session);
        validate_cursor(&plan, cursor)?;

        let mut tracker = Self {
            form: SetForm::empty(),
            session,
            plan,
            exercises,
            cursor,
            phase: Phase::ActiveSet,
            rest: None,
            in_flight: None,
            pending_advance: None,
            awaiting_finish: false,
            error: None,
        };
        tracker.awaiting_finish = tracker.final_set_already_logged();
        tracker.reset_form();

        let mut effects = Vec::new();
        match persisted {
            Some(timer) if timer.is_for_session(tracker.session.id) => {
                if timer.has_expired(now) {
                    effects.push(Effect::ClearRestTimer);
                    effects.push(Effect::Overtime {
                        message: overtime_message(timer.display_name(), timer.overtime_secs(now)),
                    });
                } else {
                    tracker.enter_rest(timer, now);
                }
                return Ok((tracker, effects));
            }
            Some(_) => effects.push(Effect::ClearRestTimer),
            None => {}
        }

        if let Some(timer) = tracker.rest_from_last_log()
            && !timer.has_expired(now)
        {
            effects.push(Effect::SaveRestTimer(timer.clone()));
            tracker.enter_rest(timer, now);
        }

        Ok((tracker, effects))
    }

    /// Starts tracking a session the backend just created.
    pub fn start(
        session: WorkoutSession,
        plan: WorkoutPlan,
        exercises: ExerciseCache,
        now: DateTime<Utc>,
    ) -> TrackerResult<(Self, Vec<Effect>)> {
        Self::resume(session, plan, exercises, None, now)
    }

    // Accessors

    pub fn session(&self) -> &WorkoutSession {
        &self.session
    }

    pub fn session_id(&self) -> i64 {
        self.session.id
    }

    pub fn plan(&self) -> &WorkoutPlan {
        &self.plan
    }

    pub fn exercises(&self) -> &ExerciseCache {
        &self.exercises
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn rest(&self) -> Option<&RestTimerState> {
        self.rest.as_ref()
    }

    pub fn form(&self) -> &SetForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut SetForm {
        &mut self.form
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn awaiting_finish(&self) -> bool {
        self.awaiting_finish
    }

    pub fn has_pending_advance(&self) -> bool {
        self.pending_advance.is_some()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn logged_sets(&self) -> &[LoggedSet] {
        &self.session.logged_sets
    }

    pub fn current_group(&self) -> &ExerciseGroup {
        &self.plan.groups[self.cursor.group]
    }

    pub fn current_set(&self) -> &PlannedSet {
        &self.current_group().sets[self.cursor.set]
    }

    pub fn current_exercise_name(&self) -> String {
        self.exercises.name(self.current_set().exercise)
    }

    pub fn is_last_set_in_group(&self) -> bool {
        self.cursor.set + 1 == self.current_group().sets.len()
    }

    pub fn is_last_group(&self) -> bool {
        self.cursor.group + 1 == self.plan.groups.len()
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, Phase::Finished | Phase::Canceled)
    }

    // Logging

    /// Prepares the log of the set under the cursor.
    pub fn begin_log(&mut self) -> TrackerResult<LogPlan> {
        self.ensure_idle(false)?;
        if self.awaiting_finish {
            return Err(TrackerError::AwaitingFinish);
        }
        if self.pending_advance.is_some() {
            return Err(TrackerError::PendingAdvance);
        }

        let (actual_reps, actual_weight) = self.form.parse()?;
        let planned = self.current_set();
        let rest_secs = planned.rest_time_after.filter(|secs| *secs > 0);
        let input = LoggedSetInput {
            session_id: self.session.id,
            exercise: planned.exercise,
            planned_set: Some(planned.id),
            order: self.next_order(),
            actual_reps,
            actual_weight,
            actual_rest_time: None,
        };
        let advance_to = next_cursor(&self.plan, self.cursor);

        self.error = None;
        self.in_flight = Some(InFlight::Log {
            advance_to,
            rest_secs,
        });
        Ok(LogPlan { input, advance_to })
    }

    /// Records a planned set the backend accepted.
    ///
    /// When the log finished the plan the tracker waits for an explicit
    /// finish; otherwise it stays busy until the progress update lands.
    pub fn apply_logged(&mut self, logged: LoggedSet) -> TrackerResult<()> {
        let Some(InFlight::Log {
            advance_to,
            rest_secs,
        }) = self.in_flight.take()
        else {
            return Err(TrackerError::InvalidPhase("no set log in flight"));
        };

        let exercise_name = self.exercises.name(logged.exercise);
        self.session.logged_sets.push(logged);

        match advance_to {
            None => {
                self.awaiting_finish = true;
                self.form = SetForm::empty();
            }
            Some(to) => {
                self.in_flight = Some(InFlight::Advance(Advance {
                    from: self.cursor,
                    to,
                    rest: rest_secs.map(|secs| RestPlan {
                        secs,
                        exercise_name,
                    }),
                }));
            }
        }
        Ok(())
    }

    /// Adopts the cursor the backend stored and starts a rest when the
    /// advance stayed within the group. A new rest is timed from `now` on
    /// the local clock.
    pub fn apply_progress(
        &mut self,
        session: WorkoutSession,
        now: DateTime<Utc>,
    ) -> TrackerResult<Vec<Effect>> {
        let Some(InFlight::Advance(advance)) = self.in_flight.take() else {
            return Err(TrackerError::InvalidPhase("no progress update in flight"));
        };

        let cursor = Cursor::of(&session);
        if let Err(err) = validate_cursor(&self.plan, cursor) {
            self.error = Some(format!("Set saved, progress not updated: {err}"));
            self.pending_advance = Some(advance);
            return Err(err);
        }

        let mut logged_sets = session.logged_sets.clone();
        if logged_sets.len() < self.session.logged_sets.len() {
            logged_sets = std::mem::take(&mut self.session.logged_sets);
        }
        self.session = WorkoutSession {
            logged_sets,
            ..session
        };
        self.cursor = cursor;
        self.pending_advance = None;
        self.error = None;
        self.reset_form();

        let mut effects = Vec::new();
        if let Some(rest) = advance.rest
            && cursor.group == advance.from.group
        {
            let timer = RestTimerState::new(
                self.session.id,
                now,
                rest.secs,
                Some(rest.exercise_name.clone()),
            );
            effects.push(Effect::SaveRestTimer(timer.clone()));
            effects.push(Effect::Notify(NotificationCommand::ScheduleRest {
                duration_ms: u64::from(timer.target_duration) * 1000,
                exercise_name: rest.exercise_name,
                start_time: timer.start_time,
            }));
            self.enter_rest(timer, now);
        }
        Ok(effects)
    }

    /// The set was stored but the cursor was not; keep the advance around so
    /// the next continue retries it.
    pub fn progress_failed(&mut self, err: impl Into<String>) {
        if let Some(InFlight::Advance(advance)) = self.in_flight.take() {
            self.pending_advance = Some(advance);
        }
        self.error = Some(format!("Set saved, progress not updated: {}", err.into()));
    }

    /// Prepares an ad hoc set that is not part of the plan.
    pub fn begin_custom_log(
        &mut self,
        exercise: i64,
        reps: &str,
        weight: &str,
    ) -> TrackerResult<LoggedSetInput> {
        self.ensure_idle(false)?;
        let (actual_reps, actual_weight) = parse_performance(reps, weight)?;
        let input = LoggedSetInput {
            session_id: self.session.id,
            exercise,
            planned_set: None,
            order: self.next_order(),
            actual_reps,
            actual_weight,
            actual_rest_time: None,
        };
        self.error = None;
        self.in_flight = Some(InFlight::CustomLog);
        Ok(input)
    }

    pub fn apply_custom_logged(&mut self, logged: LoggedSet) -> TrackerResult<()> {
        let Some(InFlight::CustomLog) = self.in_flight.take() else {
            return Err(TrackerError::InvalidPhase("no custom log in flight"));
        };
        self.session.logged_sets.push(logged);
        Ok(())
    }

    // Rest & navigation

    /// Ends the rest early. The cursor already moved when the set was logged.
    pub fn skip_rest(&mut self) -> TrackerResult<Vec<Effect>> {
        if !matches!(self.phase, Phase::Resting { .. }) {
            return Err(TrackerError::InvalidPhase(self.phase.label()));
        }
        self.rest = None;
        self.phase = Phase::ActiveSet;
        Ok(vec![
            Effect::ClearRestTimer,
            Effect::Notify(NotificationCommand::CancelRest),
        ])
    }

    /// Prepares an advance without logging, or retries a failed one.
    pub fn begin_skip_set(&mut self) -> TrackerResult<ProgressUpdate> {
        self.ensure_idle(false)?;

        let advance = match self.pending_advance.take() {
            Some(pending) => pending,
            None => {
                if self.awaiting_finish {
                    return Err(TrackerError::AwaitingFinish);
                }
                let to = next_cursor(&self.plan, self.cursor).ok_or(TrackerError::EndOfPlan)?;
                Advance {
                    from: self.cursor,
                    to,
                    rest: None,
                }
            }
        };

        let update = advance.to.to_update();
        self.error = None;
        self.in_flight = Some(InFlight::Advance(advance));
        Ok(update)
    }

    /// Recomputes the rest from the wall clock. Reaching zero leaves the
    /// rest exactly once.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Vec<Effect> {
        let Phase::Resting { .. } = self.phase else {
            return Vec::new();
        };
        let Some(timer) = &self.rest else {
            self.phase = Phase::ActiveSet;
            return Vec::new();
        };

        let remaining = timer.remaining_secs(now);
        if remaining > 0 {
            self.phase = Phase::Resting { remaining };
            return Vec::new();
        }

        let exercise_name = timer.display_name().to_string();
        self.rest = None;
        self.phase = Phase::ActiveSet;
        vec![
            Effect::ClearRestTimer,
            Effect::Notify(NotificationCommand::CancelRest),
            Effect::RestOver { exercise_name },
        ]
    }

    // Finish & cancel

    pub fn begin_finish(&mut self) -> TrackerResult<i64> {
        self.ensure_idle(true)?;
        self.error = None;
        self.in_flight = Some(InFlight::Finish);
        Ok(self.session.id)
    }

    pub fn apply_finished(&mut self, session: WorkoutSession) -> TrackerResult<Vec<Effect>> {
        let Some(InFlight::Finish) = self.in_flight.take() else {
            return Err(TrackerError::InvalidPhase("no finish in flight"));
        };
        Ok(self.end(session, Phase::Finished, SessionStatus::Completed))
    }

    pub fn begin_cancel(&mut self) -> TrackerResult<i64> {
        self.ensure_idle(true)?;
        self.error = None;
        self.in_flight = Some(InFlight::Cancel);
        Ok(self.session.id)
    }

    pub fn apply_canceled(&mut self, session: WorkoutSession) -> TrackerResult<Vec<Effect>> {
        let Some(InFlight::Cancel) = self.in_flight.take() else {
            return Err(TrackerError::InvalidPhase("no cancel in flight"));
        };
        Ok(self.end(session, Phase::Canceled, SessionStatus::Cancelled))
    }

    /// A request failed; state stays as it was before the request.
    pub fn fail(&mut self, err: impl Into<String>) {
        self.in_flight = None;
        self.error = Some(err.into());
    }

    // Internals

    fn ensure_idle(&self, allow_resting: bool) -> TrackerResult<()> {
        if self.in_flight.is_some() {
            return Err(TrackerError::Busy);
        }
        match self.phase {
            Phase::ActiveSet => Ok(()),
            Phase::Resting { .. } if allow_resting => Ok(()),
            phase => Err(TrackerError::InvalidPhase(phase.label())),
        }
    }

    fn next_order(&self) -> u32 {
        self.session.logged_sets.len() as u32 + 1
    }

    fn reset_form(&mut self) {
        self.form = if self.awaiting_finish {
            SetForm::empty()
        } else {
            SetForm::for_set(self.current_set())
        };
    }

    fn enter_rest(&mut self, timer: RestTimerState, now: DateTime<Utc>) {
        self.phase = Phase::Resting {
            remaining: timer.remaining_secs(now),
        };
        self.rest = Some(timer);
    }

    fn end(&mut self, session: WorkoutSession, phase: Phase, status: SessionStatus) -> Vec<Effect> {
        let session_id = self.session.id;
        let logged_sets = std::mem::take(&mut self.session.logged_sets);
        self.session = session;
        if self.session.logged_sets.is_empty() {
            self.session.logged_sets = logged_sets;
        }
        self.phase = phase;
        self.rest = None;
        self.error = None;
        vec![
            Effect::ClearRestTimer,
            Effect::Notify(NotificationCommand::CancelRest),
            Effect::SessionEnded { session_id, status },
        ]
    }

    fn last_logged(&self) -> Option<&LoggedSet> {
        self.session.logged_sets.iter().max_by_key(|s| s.order)
    }

    fn final_set_already_logged(&self) -> bool {
        if !(self.is_last_group() && self.is_last_set_in_group()) {
            return false;
        }
        let current = self.current_set().id;
        self.session
            .logged_sets
            .iter()
            .any(|s| s.planned_set == Some(current))
    }

    /// A rest implied by the last log, for when no timer was persisted.
    fn rest_from_last_log(&self) -> Option<RestTimerState> {
        let last = self.last_logged()?;
        let (position, planned) = locate_planned_set(&self.plan, last.planned_set?)?;
        let secs = planned.rest_time_after.filter(|secs| *secs > 0)?;
        let completed_at = last.completed_at?;

        let expected = Cursor::new(position.group, position.set + 1);
        if self.cursor != expected {
            return None;
        }

        Some(RestTimerState::new(
            self.session.id,
            completed_at,
            secs,
            Some(self.exercises.name(last.exercise)),
        ))
    }
}
