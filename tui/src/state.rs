//! Application state.

use chrono::Utc;
use gymtrack_core::models::{
    Category, Exercise, LoggedSet, LoginCredentials, MuscleGroup, Profile, PublicProfile,
    RegisterData, SessionStatus, SessionSummary, WorkoutPlan, WorkoutPlanInput, WorkoutSession,
};
use gymtrack_core::tracker::resolve_plan;
use gymtrack_core::{Effect, ExerciseCache, Phase, Tracker, TrackerError};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

use crate::auth::{AuthContext, Guard, Route, guard};
use crate::io::{IoHandle, IoRequest, IoResponse, SessionDetail, TrackerBootstrap};
use crate::notify::{Notifier, RestAlert};
use crate::storage::{RestTimerStorage, TokenStorage};

const BUSY_MESSAGE: &str = "Too many pending requests, try again";

/// Lifecycle events other screens react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Ended { session_id: i64, status: SessionStatus },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthField {
    Username,
    Email,
    Password,
    Confirm,
}

#[derive(Debug, Default)]
pub struct AuthForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm: String,
    pub field: usize,
    pub submitting: bool,
    pub status: String,
}

impl AuthForm {
    pub fn fields(register: bool) -> &'static [AuthField] {
        if register {
            &[
                AuthField::Username,
                AuthField::Email,
                AuthField::Password,
                AuthField::Confirm,
            ]
        } else {
            &[AuthField::Username, AuthField::Password]
        }
    }

    pub fn focused(&self, register: bool) -> AuthField {
        let fields = Self::fields(register);
        fields[self.field % fields.len()]
    }

    pub fn next_field(&mut self, register: bool) {
        self.field = (self.field + 1) % Self::fields(register).len();
    }

    pub fn prev_field(&mut self, register: bool) {
        let len = Self::fields(register).len();
        self.field = (self.field + len - 1) % len;
    }

    fn input(&mut self, register: bool) -> &mut String {
        match self.focused(register) {
            AuthField::Username => &mut self.username,
            AuthField::Email => &mut self.email,
            AuthField::Password => &mut self.password,
            AuthField::Confirm => &mut self.confirm,
        }
    }

    pub fn push_char(&mut self, register: bool, ch: char) {
        self.input(register).push(ch);
    }

    pub fn backspace(&mut self, register: bool) {
        self.input(register).pop();
    }
}

#[derive(Debug, Default)]
pub struct PlansPage {
    pub plans: Vec<WorkoutPlan>,
    pub selected: usize,
    pub loading: bool,
    pub error: Option<String>,
    /// Id of the in-progress session offered for resuming.
    pub active_session: Option<i64>,
    /// Plan armed for deletion by a first key press.
    pub pending_delete: Option<i64>,
}

#[derive(Debug, Default)]
pub struct HistoryPage {
    pub sessions: Vec<SessionSummary>,
    pub selected: usize,
    pub loading: bool,
    pub error: Option<String>,
}

/// A record fetched on demand and shown over the current page.
#[derive(Debug)]
pub enum Detail<T> {
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> Detail<T> {
    fn from_result(result: Result<T, String>) -> Self {
        match result {
            Ok(value) => Detail::Loaded(value),
            Err(e) => Detail::Failed(e),
        }
    }
}

#[derive(Debug)]
pub struct SessionView {
    pub id: i64,
    pub detail: Detail<SessionDetail>,
}

/// One page of the exercise library, filtered locally by category and
/// muscle group.
#[derive(Debug, Default)]
pub struct ExercisesPage {
    pub exercises: Vec<Exercise>,
    pub page: u32,
    pub count: u64,
    pub has_next: bool,
    pub selected: usize,
    pub loading: bool,
    pub error: Option<String>,
    pub categories: Vec<Category>,
    pub muscle_groups: Vec<MuscleGroup>,
    pub category: Option<usize>,
    pub muscle_group: Option<usize>,
    pub detail: Option<(i64, Detail<Exercise>)>,
}

impl ExercisesPage {
    pub fn category_name(&self) -> Option<&str> {
        self.category
            .and_then(|i| self.categories.get(i))
            .map(|c| c.category.as_str())
    }

    pub fn muscle_group_name(&self) -> Option<&str> {
        self.muscle_group
            .and_then(|i| self.muscle_groups.get(i))
            .map(|m| m.name.as_str())
    }

    pub fn visible(&self) -> Vec<&Exercise> {
        let category = self.category_name();
        let muscle = self.muscle_group_name();
        self.exercises
            .iter()
            .filter(|e| category.is_none_or(|c| e.category.eq_ignore_ascii_case(c)))
            .filter(|e| {
                muscle.is_none_or(|m| {
                    e.primary_muscles
                        .iter()
                        .chain(&e.secondary_muscles)
                        .any(|x| x.eq_ignore_ascii_case(m))
                })
            })
            .collect()
    }
}

#[derive(Debug)]
pub struct UserView {
    pub username: String,
    pub profile: Option<PublicProfile>,
    pub sessions: Vec<SessionSummary>,
    pub selected: usize,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Default)]
pub struct ProfilesPage {
    pub me: Option<Profile>,
    pub profiles: Vec<PublicProfile>,
    pub selected: usize,
    pub loading: bool,
    pub error: Option<String>,
    pub viewing: Option<UserView>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomField {
    Exercise,
    Reps,
    Weight,
}

/// Ad hoc set outside the plan.
#[derive(Debug)]
pub struct CustomForm {
    pub query: String,
    pub selected: usize,
    pub reps: String,
    pub weight: String,
    pub field: CustomField,
}

impl CustomForm {
    fn new() -> Self {
        Self {
            query: String::new(),
            selected: 0,
            reps: "0".into(),
            weight: "0".into(),
            field: CustomField::Exercise,
        }
    }
}

pub struct TrackerPage {
    pub tracker: Tracker,
    pub custom: Option<CustomForm>,
}

impl TrackerPage {
    /// Exercise ids matching the custom form's search query.
    pub fn custom_matches(&self) -> Vec<(i64, String)> {
        let query = self
            .custom
            .as_ref()
            .map(|c| c.query.to_lowercase())
            .unwrap_or_default();
        self.tracker
            .exercises()
            .sorted()
            .into_iter()
            .filter(|e| e.name.to_lowercase().contains(&query))
            .map(|e| (e.id, e.name.clone()))
            .collect()
    }
}

pub enum TrackerScreen {
    Idle,
    Loading,
    NoSession,
    /// Initialization failed; the tracker cannot run.
    Failed(String),
    Active(Box<TrackerPage>),
}

pub struct App {
    pub running: bool,
    pub route: Route,
    pub auth: AuthContext,
    pub auth_form: AuthForm,
    pub plans: PlansPage,
    pub history: HistoryPage,
    pub exercises: ExercisesPage,
    pub profiles: ProfilesPage,
    pub session_view: Option<SessionView>,
    pub tracker: TrackerScreen,
    pub status: String,
    /// Shown once, e.g. a rest that ran out while the app was closed.
    pub notice: Option<String>,
    pending_route: Option<Route>,
    io: IoHandle,
    notifier: Notifier,
    alerts: mpsc::UnboundedReceiver<RestAlert>,
    timers: RestTimerStorage,
    session_events: broadcast::Sender<SessionEvent>,
    plans_events: broadcast::Receiver<SessionEvent>,
}

impl App {
    pub fn new(
        io: IoHandle,
        notifier: Notifier,
        alerts: mpsc::UnboundedReceiver<RestAlert>,
        tokens: &TokenStorage,
        timers: RestTimerStorage,
    ) -> Self {
        let auth = AuthContext::restore(tokens);
        let (session_events, plans_events) = broadcast::channel(8);

        let mut app = Self {
            running: true,
            route: Route::Login,
            auth,
            auth_form: AuthForm::default(),
            plans: PlansPage::default(),
            history: HistoryPage::default(),
            exercises: ExercisesPage::default(),
            profiles: ProfilesPage::default(),
            session_view: None,
            tracker: TrackerScreen::Idle,
            status: String::new(),
            notice: None,
            pending_route: None,
            io,
            notifier,
            alerts,
            timers,
            session_events,
            plans_events,
        };

        if app.auth.is_loading() {
            app.io.send(IoRequest::CheckSession);
        }
        app.navigate(Route::Plans);
        app
    }

    /// Moves to `route` unless a guard redirects. While auth is loading the
    /// move is remembered and decided once it settles.
    pub fn navigate(&mut self, route: Route) {
        match guard(route, &self.auth) {
            Guard::Wait => self.pending_route = Some(route),
            Guard::Allow => self.enter(route),
            Guard::Redirect(to) => {
                debug!(?route, ?to, "route guard redirect");
                self.enter(to);
            }
        }
    }

    fn enter(&mut self, route: Route) {
        self.pending_route = None;
        self.route = route;
        self.session_view = None;
        match route {
            Route::Plans => self.load_plans(),
            Route::History => self.load_history(),
            Route::Exercises => {
                if self.exercises.categories.is_empty() {
                    self.io.send(IoRequest::LoadTaxonomy);
                }
                self.load_exercises(self.exercises.page.max(1));
            }
            Route::Profiles => self.load_profiles(),
            Route::Login | Route::Register => {
                self.auth_form.field = 0;
                self.auth_form.status.clear();
            }
            Route::Tracker => {}
        }
    }

    fn settle_route(&mut self) {
        let route = self.pending_route.take().unwrap_or(self.route);
        self.navigate(route);
    }

    pub fn poll_io(&mut self) {
        while let Ok(resp) = self.io.rx.try_recv() {
            self.handle_response(resp);
        }
        while let Ok(alert) = self.alerts.try_recv() {
            self.status = format!("Rest over: time for {}", alert.exercise_name);
        }
        while let Ok(event) = self.plans_events.try_recv() {
            let SessionEvent::Ended { session_id, .. } = event;
            if self.plans.active_session == Some(session_id) {
                self.plans.active_session = None;
            }
        }
    }

    /// Wall-clock tick; drives the rest countdown.
    pub fn tick(&mut self) {
        if let TrackerScreen::Active(page) = &mut self.tracker {
            let effects = page.tracker.tick(Utc::now());
            self.apply_effects(effects);
        }
    }

    pub(crate) fn handle_response(&mut self, resp: IoResponse) {
        match resp {
            IoResponse::LoggedIn(result) | IoResponse::Registered(result) => {
                self.auth_form.submitting = false;
                match result {
                    Ok(auth) => {
                        info!(user = %auth.user.username, "signed in");
                        self.auth.signed_in(auth.user);
                        self.auth_form = AuthForm::default();
                        self.navigate(Route::Plans);
                    }
                    Err(e) => self.auth_form.status = e,
                }
            }

            IoResponse::LoggedOut => {
                self.auth.signed_out();
                self.tracker = TrackerScreen::Idle;
                self.plans = PlansPage::default();
                self.history = HistoryPage::default();
                self.exercises = ExercisesPage::default();
                self.profiles = ProfilesPage::default();
                self.navigate(Route::Login);
            }

            IoResponse::SessionChecked(result) => {
                match result {
                    Ok(user) => self.auth.signed_in(user),
                    Err(e) => {
                        debug!(error = %e, "stored session not accepted");
                        self.auth.signed_out();
                    }
                }
                self.settle_route();
            }

            IoResponse::Plans {
                plans,
                active_session,
            } => {
                self.plans.loading = false;
                self.plans.active_session = active_session;
                match plans {
                    Ok(plans) => {
                        self.plans.selected = self.plans.selected.min(plans.len().saturating_sub(1));
                        self.plans.plans = plans;
                        self.plans.error = None;
                    }
                    Err(e) => self.plans.error = Some(e),
                }
            }

            IoResponse::PlanCreated(result) => match result {
                Ok(plan) => {
                    self.status = format!("Created plan '{}'", plan.name);
                    self.plans.plans.push(plan);
                    self.plans.selected = self.plans.plans.len() - 1;
                }
                Err(e) => self.status = format!("Could not copy plan: {e}"),
            },

            IoResponse::PlanDeleted { id, result } => match result {
                Ok(()) => {
                    self.plans.plans.retain(|p| p.id != id);
                    self.plans.selected = self
                        .plans
                        .selected
                        .min(self.plans.plans.len().saturating_sub(1));
                    self.status = "Plan deleted".into();
                }
                Err(e) => self.status = format!("Could not delete plan: {e}"),
            },

            IoResponse::SessionLoaded { id, result } => match &mut self.session_view {
                Some(view) if view.id == id => view.detail = Detail::from_result(result),
                _ => debug!(session = id, "session detail no longer shown"),
            },

            IoResponse::Exercises { page, result } => {
                self.exercises.loading = false;
                match result {
                    Ok(listing) => {
                        self.exercises.page = page;
                        self.exercises.count = listing.count;
                        self.exercises.has_next = listing.next.is_some();
                        self.exercises.exercises = listing.results;
                        self.exercises.selected = 0;
                        self.exercises.error = None;
                    }
                    Err(e) => self.exercises.error = Some(e),
                }
            }

            IoResponse::Taxonomy {
                categories,
                muscle_groups,
            } => {
                match categories {
                    Ok(c) => self.exercises.categories = c,
                    Err(e) => warn!(error = %e, "categories unavailable"),
                }
                match muscle_groups {
                    Ok(m) => self.exercises.muscle_groups = m,
                    Err(e) => warn!(error = %e, "muscle groups unavailable"),
                }
            }

            IoResponse::ExerciseLoaded { id, result } => match &mut self.exercises.detail {
                Some((shown, detail)) if *shown == id => *detail = Detail::from_result(result),
                _ => debug!(exercise = id, "exercise detail no longer shown"),
            },

            IoResponse::Profiles { me, public } => {
                self.profiles.loading = false;
                match me {
                    Ok(profile) => self.profiles.me = Some(profile),
                    Err(e) => warn!(error = %e, "own profile unavailable"),
                }
                match public {
                    Ok(profiles) => {
                        self.profiles.selected = self
                            .profiles
                            .selected
                            .min(profiles.len().saturating_sub(1));
                        self.profiles.profiles = profiles;
                        self.profiles.error = None;
                    }
                    Err(e) => self.profiles.error = Some(e),
                }
            }

            IoResponse::UserProfile {
                username,
                profile,
                sessions,
            } => {
                let Some(view) = self
                    .profiles
                    .viewing
                    .as_mut()
                    .filter(|v| v.username == username)
                else {
                    return;
                };
                view.loading = false;
                view.profile = profile.ok();
                match sessions {
                    Ok(sessions) => view.sessions = sessions,
                    Err(e) => view.error = Some(e),
                }
            }

            IoResponse::ProfileUpdated(result) => match result {
                Ok(profile) => {
                    self.status = if profile.is_public {
                        "Your profile is now public".into()
                    } else {
                        "Your profile is now private".into()
                    };
                    self.profiles.me = Some(profile);
                }
                Err(e) => self.status = format!("Could not update profile: {e}"),
            },

            IoResponse::History(result) => {
                self.history.loading = false;
                match result {
                    Ok(sessions) => {
                        self.history.sessions = sessions;
                        self.history.selected = 0;
                        self.history.error = None;
                    }
                    Err(e) => self.history.error = Some(e),
                }
            }

            IoResponse::TrackerLoaded(result) => {
                if !matches!(self.tracker, TrackerScreen::Loading) {
                    return;
                }
                self.tracker = match result {
                    Ok(Some(boot)) => self.start_tracker(boot),
                    Ok(None) => TrackerScreen::NoSession,
                    Err(e) => TrackerScreen::Failed(e),
                };
            }

            IoResponse::SetLogged {
                session_id,
                logged,
                progress,
            } => {
                let Some(page) = self.page_for(session_id) else {
                    return;
                };
                let effects = apply_set_logged(&mut page.tracker, logged, progress);
                self.apply_effects(effects);
            }

            IoResponse::CustomSetLogged { session_id, result } => {
                let Some(page) = self.page_for(session_id) else {
                    return;
                };
                match result {
                    Ok(set) => {
                        let name = page.tracker.exercises().name(set.exercise);
                        if let Err(e) = page.tracker.apply_custom_logged(set) {
                            warn!(error = %e, "custom set response out of order");
                        }
                        page.custom = None;
                        self.status = format!("Logged extra set of {name}");
                    }
                    Err(e) => page.tracker.fail(e),
                }
            }

            IoResponse::Advanced { session_id, result } => {
                let Some(page) = self.page_for(session_id) else {
                    return;
                };
                let effects = match result {
                    Ok(session) => adopt_progress(&mut page.tracker, session),
                    Err(e) => {
                        page.tracker.progress_failed(e);
                        Vec::new()
                    }
                };
                self.apply_effects(effects);
            }

            IoResponse::Finished { session_id, result } => {
                let Some(page) = self.page_for(session_id) else {
                    return;
                };
                let effects = match result {
                    Ok(session) => page.tracker.apply_finished(session),
                    Err(e) => {
                        page.tracker.fail(e);
                        Ok(Vec::new())
                    }
                };
                self.apply_tracker_result(effects);
            }

            IoResponse::Canceled { session_id, result } => {
                let Some(page) = self.page_for(session_id) else {
                    return;
                };
                let effects = match result {
                    Ok(session) => page.tracker.apply_canceled(session),
                    Err(e) => {
                        page.tracker.fail(e);
                        Ok(Vec::new())
                    }
                };
                self.apply_tracker_result(effects);
            }
        }
    }

    fn page_for(&mut self, session_id: i64) -> Option<&mut TrackerPage> {
        match &mut self.tracker {
            TrackerScreen::Active(page) if page.tracker.session_id() == session_id => {
                Some(&mut **page)
            }
            _ => {
                debug!(session_id, "response for a tracker that is gone");
                None
            }
        }
    }

    fn start_tracker(&mut self, boot: TrackerBootstrap) -> TrackerScreen {
        let TrackerBootstrap {
            session,
            plan,
            exercises,
        } = boot;

        let plan = match resolve_plan(&session, plan) {
            Ok(plan) => plan,
            Err(e) => return TrackerScreen::Failed(e.to_string()),
        };
        let cache = ExerciseCache::new(exercises);
        let persisted = self.timers.load();

        match Tracker::resume(session, plan, cache, persisted, Utc::now()) {
            Ok((tracker, effects)) => {
                info!(session = tracker.session_id(), "tracker ready");
                self.plans.active_session = Some(tracker.session_id());
                self.apply_effects(effects);
                TrackerScreen::Active(Box::new(TrackerPage {
                    tracker,
                    custom: None,
                }))
            }
            Err(e) => {
                warn!(error = %e, "session cannot be tracked");
                TrackerScreen::Failed(e.to_string())
            }
        }
    }

    fn apply_tracker_result(&mut self, result: Result<Vec<Effect>, TrackerError>) {
        match result {
            Ok(effects) => self.apply_effects(effects),
            Err(e) => warn!(error = %e, "tracker rejected response"),
        }
    }

    fn apply_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SaveRestTimer(timer) => self.timers.save(&timer),
                Effect::ClearRestTimer => self.timers.clear(),
                Effect::Notify(command) => self.notifier.send(command),
                Effect::RestOver { exercise_name } => {
                    self.status = format!("Rest over after {exercise_name}");
                }
                Effect::Overtime { message } => self.notice = Some(message),
                Effect::SessionEnded { session_id, status } => {
                    info!(session_id, ?status, "session ended");
                    if self
                        .session_events
                        .send(SessionEvent::Ended { session_id, status })
                        .is_err()
                    {
                        debug!("no listeners for session events");
                    }
                }
            }
        }
    }

    // Auth actions

    pub fn is_register(&self) -> bool {
        self.route == Route::Register
    }

    pub fn submit_auth(&mut self) {
        if self.auth_form.submitting {
            return;
        }
        let form = &mut self.auth_form;
        if form.username.trim().is_empty() {
            form.status = "Username required".into();
            return;
        }
        if form.password.is_empty() {
            form.status = "Password required".into();
            return;
        }

        let register = self.route == Route::Register;
        let request = if register {
            if form.email.trim().is_empty() {
                form.status = "Email required".into();
                return;
            }
            if form.password != form.confirm {
                form.status = "Passwords do not match".into();
                return;
            }
            IoRequest::Register(RegisterData {
                username: form.username.trim().to_string(),
                email: form.email.trim().to_string(),
                password1: form.password.clone(),
                password2: form.confirm.clone(),
            })
        } else {
            IoRequest::Login(LoginCredentials {
                username: form.username.trim().to_string(),
                password: form.password.clone(),
            })
        };

        if self.io.send(request) {
            self.auth_form.submitting = true;
            self.auth_form.status = if register {
                "Creating account...".into()
            } else {
                "Signing in...".into()
            };
        } else {
            self.auth_form.status = BUSY_MESSAGE.into();
        }
    }

    pub fn logout(&mut self) {
        self.io.send(IoRequest::Logout);
    }

    // Plans & history

    fn load_plans(&mut self) {
        self.plans.loading = self.io.send(IoRequest::LoadPlans);
    }

    fn load_history(&mut self) {
        self.history.loading = self.io.send(IoRequest::LoadHistory);
    }

    fn load_exercises(&mut self, page: u32) {
        self.exercises.loading = self.io.send(IoRequest::LoadExercises { page });
    }

    fn load_profiles(&mut self) {
        self.profiles.viewing = None;
        self.profiles.loading = self.io.send(IoRequest::LoadProfiles);
    }

    pub fn reload(&mut self) {
        match self.route {
            Route::Plans => self.load_plans(),
            Route::History => self.load_history(),
            Route::Exercises => self.load_exercises(self.exercises.page.max(1)),
            Route::Profiles => self.load_profiles(),
            _ => {}
        }
    }

    fn selected_plan(&self) -> Option<&WorkoutPlan> {
        self.plans.plans.get(self.plans.selected)
    }

    /// Creates a copy of the highlighted plan.
    pub fn duplicate_plan(&mut self) {
        let Some(plan) = self.selected_plan() else {
            return;
        };
        let input = WorkoutPlanInput::copy_of(plan, format!("{} (copy)", plan.name));
        if !self.io.send(IoRequest::DuplicatePlan(input)) {
            self.status = BUSY_MESSAGE.into();
        }
    }

    /// First press arms deletion of the highlighted plan, a second one
    /// deletes it.
    pub fn delete_plan(&mut self) {
        let Some(plan) = self.selected_plan() else {
            return;
        };
        let (id, name) = (plan.id, plan.name.clone());
        if self.plans.pending_delete != Some(id) {
            self.plans.pending_delete = Some(id);
            self.status = format!("Press d again to delete '{name}'");
            return;
        }
        self.plans.pending_delete = None;
        if !self.io.send(IoRequest::DeletePlan { id }) {
            self.status = BUSY_MESSAGE.into();
        }
    }

    pub fn disarm_delete(&mut self) {
        self.plans.pending_delete = None;
    }

    // Session detail

    /// Opens the highlighted session of the history page, or of the user
    /// whose profile is being viewed.
    pub fn open_session(&mut self) {
        let target = match self.route {
            Route::History => self
                .history
                .sessions
                .get(self.history.selected)
                .map(|s| (s.id, false)),
            Route::Profiles => self
                .profiles
                .viewing
                .as_ref()
                .and_then(|v| v.sessions.get(v.selected))
                .map(|s| (s.id, true)),
            _ => None,
        };
        let Some((id, public)) = target else {
            return;
        };
        if !self.io.send(IoRequest::LoadSession { id, public }) {
            self.status = BUSY_MESSAGE.into();
            return;
        }
        self.session_view = Some(SessionView {
            id,
            detail: Detail::Loading,
        });
    }

    pub fn close_session(&mut self) {
        self.session_view = None;
    }

    // Exercise library

    pub fn select_exercise(&mut self, delta: isize) {
        let len = self.exercises.visible().len();
        self.exercises.selected = step(self.exercises.selected, delta, len);
    }

    pub fn exercise_page(&mut self, delta: i32) {
        let page = &self.exercises;
        if page.loading || (delta > 0 && !page.has_next) || (delta < 0 && page.page <= 1) {
            return;
        }
        let target = page.page.saturating_add_signed(delta).max(1);
        self.load_exercises(target);
    }

    pub fn cycle_category(&mut self) {
        let page = &mut self.exercises;
        page.category = cycle(page.category, page.categories.len());
        page.selected = 0;
    }

    pub fn cycle_muscle_group(&mut self) {
        let page = &mut self.exercises;
        page.muscle_group = cycle(page.muscle_group, page.muscle_groups.len());
        page.selected = 0;
    }

    pub fn open_exercise(&mut self) {
        let Some(id) = self
            .exercises
            .visible()
            .get(self.exercises.selected)
            .map(|e| e.id)
        else {
            return;
        };
        if !self.io.send(IoRequest::LoadExercise { id }) {
            self.status = BUSY_MESSAGE.into();
            return;
        }
        self.exercises.detail = Some((id, Detail::Loading));
    }

    pub fn close_exercise(&mut self) {
        self.exercises.detail = None;
    }

    // Profiles

    pub fn select_profile(&mut self, delta: isize) {
        match &mut self.profiles.viewing {
            Some(view) => view.selected = step(view.selected, delta, view.sessions.len()),
            None => {
                self.profiles.selected =
                    step(self.profiles.selected, delta, self.profiles.profiles.len());
            }
        }
    }

    pub fn open_profile(&mut self) {
        let Some(username) = self
            .profiles
            .profiles
            .get(self.profiles.selected)
            .map(|p| p.username.clone())
        else {
            return;
        };
        let request = IoRequest::LoadUserProfile {
            username: username.clone(),
        };
        if !self.io.send(request) {
            self.status = BUSY_MESSAGE.into();
            return;
        }
        self.profiles.viewing = Some(UserView {
            username,
            profile: None,
            sessions: Vec::new(),
            selected: 0,
            loading: true,
            error: None,
        });
    }

    pub fn close_profile(&mut self) {
        self.profiles.viewing = None;
    }

    pub fn toggle_profile_visibility(&mut self) {
        let Some(me) = &self.profiles.me else {
            self.status = "Profile not loaded yet".into();
            return;
        };
        if !self.io.send(IoRequest::SetProfilePublic(!me.is_public)) {
            self.status = BUSY_MESSAGE.into();
        }
    }

    pub fn select_plan(&mut self, delta: isize) {
        self.plans.selected = step(self.plans.selected, delta, self.plans.plans.len());
    }

    pub fn select_history(&mut self, delta: isize) {
        self.history.selected = step(self.history.selected, delta, self.history.sessions.len());
    }

    /// Opens the tracker with the highlighted plan, or resumes whatever runs.
    pub fn open_tracker(&mut self, with_plan: bool) {
        let plan = with_plan
            .then(|| self.plans.plans.get(self.plans.selected).cloned())
            .flatten();
        if with_plan && plan.is_none() {
            self.status = "No plan selected".into();
            return;
        }
        if !self.io.send(IoRequest::LoadTracker { plan }) {
            self.status = BUSY_MESSAGE.into();
            return;
        }
        self.tracker = TrackerScreen::Loading;
        self.navigate(Route::Tracker);
    }

    pub fn leave_tracker(&mut self) {
        if let TrackerScreen::Active(page) = &self.tracker
            && !page.tracker.is_over()
        {
            self.status = "Workout still in progress, resume it from the plans screen".into();
        }
        self.tracker = TrackerScreen::Idle;
        self.navigate(Route::Plans);
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    // Tracker actions

    /// Sends a request the tracker already marked as in flight. A dropped
    /// request is failed right away so the tracker does not stay busy.
    fn dispatch(&mut self, request: IoRequest) {
        if !self.io.send(request)
            && let Some(page) = self.active_page()
        {
            page.tracker.fail(BUSY_MESSAGE);
        }
    }

    fn active_page(&mut self) -> Option<&mut TrackerPage> {
        match &mut self.tracker {
            TrackerScreen::Active(page) => Some(&mut **page),
            _ => None,
        }
    }

    pub fn log_set(&mut self) {
        let Some(page) = self.active_page() else {
            return;
        };
        let session_id = page.tracker.session_id();
        match page.tracker.begin_log() {
            Ok(plan) => self.dispatch(IoRequest::LogSet { session_id, plan }),
            Err(e) => self.status = e.to_string(),
        }
    }

    pub fn skip_set(&mut self) {
        let Some(page) = self.active_page() else {
            return;
        };
        let session_id = page.tracker.session_id();
        match page.tracker.begin_skip_set() {
            Ok(update) => self.dispatch(IoRequest::Advance { session_id, update }),
            Err(e) => self.status = e.to_string(),
        }
    }

    pub fn skip_rest(&mut self) {
        let Some(page) = self.active_page() else {
            return;
        };
        match page.tracker.skip_rest() {
            Ok(effects) => self.apply_effects(effects),
            Err(e) => self.status = e.to_string(),
        }
    }

    pub fn finish_workout(&mut self) {
        let Some(page) = self.active_page() else {
            return;
        };
        match page.tracker.begin_finish() {
            Ok(session_id) => self.dispatch(IoRequest::Finish { session_id }),
            Err(e) => self.status = e.to_string(),
        }
    }

    pub fn cancel_workout(&mut self) {
        let Some(page) = self.active_page() else {
            return;
        };
        match page.tracker.begin_cancel() {
            Ok(session_id) => self.dispatch(IoRequest::Cancel { session_id }),
            Err(e) => self.status = e.to_string(),
        }
    }

    pub fn form_char(&mut self, ch: char) {
        if let Some(page) = self.active_page() {
            page.tracker.form_mut().push_char(ch);
        }
    }

    pub fn form_backspace(&mut self) {
        if let Some(page) = self.active_page() {
            page.tracker.form_mut().backspace();
        }
    }

    pub fn form_toggle_field(&mut self) {
        if let Some(page) = self.active_page() {
            page.tracker.form_mut().toggle_field();
        }
    }

    pub fn custom_open(&mut self) {
        let Some(page) = self.active_page() else {
            return;
        };
        if page.tracker.phase() != Phase::ActiveSet {
            self.status = "Extra sets can be logged between rests".into();
            return;
        }
        page.custom = Some(CustomForm::new());
    }

    pub fn custom_close(&mut self) {
        if let Some(page) = self.active_page() {
            page.custom = None;
        }
    }

    pub fn custom_is_open(&self) -> bool {
        matches!(&self.tracker, TrackerScreen::Active(page) if page.custom.is_some())
    }

    pub fn custom_next_field(&mut self) {
        if let Some(form) = self.active_page().and_then(|p| p.custom.as_mut()) {
            form.field = match form.field {
                CustomField::Exercise => CustomField::Reps,
                CustomField::Reps => CustomField::Weight,
                CustomField::Weight => CustomField::Exercise,
            };
        }
    }

    pub fn custom_move(&mut self, delta: isize) {
        let Some(page) = self.active_page() else {
            return;
        };
        let len = page.custom_matches().len();
        if let Some(form) = page.custom.as_mut() {
            form.selected = step(form.selected, delta, len);
        }
    }

    pub fn custom_char(&mut self, ch: char) {
        if let Some(form) = self.active_page().and_then(|p| p.custom.as_mut()) {
            match form.field {
                CustomField::Exercise => {
                    form.query.push(ch);
                    form.selected = 0;
                }
                CustomField::Reps if ch.is_ascii_digit() => form.reps.push(ch),
                CustomField::Weight if ch.is_ascii_digit() || ch == '.' => form.weight.push(ch),
                _ => {}
            }
        }
    }

    pub fn custom_backspace(&mut self) {
        if let Some(form) = self.active_page().and_then(|p| p.custom.as_mut()) {
            match form.field {
                CustomField::Exercise => {
                    form.query.pop();
                    form.selected = 0;
                }
                CustomField::Reps => {
                    form.reps.pop();
                }
                CustomField::Weight => {
                    form.weight.pop();
                }
            }
        }
    }

    pub fn custom_submit(&mut self) {
        let Some(page) = self.active_page() else {
            return;
        };
        let matches = page.custom_matches();
        let Some(form) = page.custom.as_ref() else {
            return;
        };
        let Some(&(exercise, _)) = matches.get(form.selected) else {
            self.status = "Pick an exercise".into();
            return;
        };
        let (reps, weight) = (form.reps.clone(), form.weight.clone());
        let session_id = page.tracker.session_id();
        match page.tracker.begin_custom_log(exercise, &reps, &weight) {
            Ok(input) => self.dispatch(IoRequest::LogCustomSet { session_id, input }),
            Err(e) => self.status = e.to_string(),
        }
    }
}

/// None, then each index in turn, then back to None.
fn cycle(current: Option<usize>, len: usize) -> Option<usize> {
    match current {
        None if len > 0 => Some(0),
        Some(i) if i + 1 < len => Some(i + 1),
        _ => None,
    }
}

fn step(current: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    current.saturating_add_signed(delta).min(len - 1)
}

/// Feeds a log-then-advance round trip into the tracker.
fn apply_set_logged(
    tracker: &mut Tracker,
    logged: Result<LoggedSet, String>,
    progress: Option<Result<WorkoutSession, String>>,
) -> Vec<Effect> {
    let set = match logged {
        Ok(set) => set,
        Err(e) => {
            tracker.fail(e);
            return Vec::new();
        }
    };
    if let Err(e) = tracker.apply_logged(set) {
        warn!(error = %e, "logged set response out of order");
        return Vec::new();
    }
    match progress {
        Some(Ok(session)) => adopt_progress(tracker, session),
        Some(Err(e)) => {
            tracker.progress_failed(e);
            Vec::new()
        }
        None => Vec::new(),
    }
}

fn adopt_progress(tracker: &mut Tracker, session: WorkoutSession) -> Vec<Effect> {
    tracker.apply_progress(session, Utc::now()).unwrap_or_else(|e| {
        warn!(error = %e, "progress response rejected");
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::LocalStorage;
    use chrono::Duration;
    use gymtrack_core::models::{ExerciseGroup, Paginated, PlannedSet, User};
    use gymtrack_core::{Cursor, RestTimerState};

    struct Harness {
        app: App,
        requests: mpsc::Receiver<IoRequest>,
        timers: RestTimerStorage,
        _dir: tempfile::TempDir,
    }

    fn harness(signed_in: bool) -> Harness {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStorage::open(dir.path().join("storage.json"));
        let tokens = TokenStorage::new(store.clone());
        let timers = RestTimerStorage::new(store);

        let (req_tx, requests) = mpsc::channel(16);
        let (_resp_tx, resp_rx) = mpsc::channel(16);
        let (_alert_tx, alerts) = mpsc::unbounded_channel();
        let io = IoHandle {
            tx: req_tx,
            rx: resp_rx,
        };

        let mut app = App::new(io, Notifier::disabled(), alerts, &tokens, timers.clone());
        if signed_in {
            app.auth.signed_in(user());
        }
        Harness {
            app,
            requests,
            timers,
            _dir: dir,
        }
    }

    impl Harness {
        fn drain(&mut self) -> Vec<IoRequest> {
            let mut out = Vec::new();
            while let Ok(r) = self.requests.try_recv() {
                out.push(r);
            }
            out
        }
    }

    fn user() -> User {
        User {
            pk: 1,
            username: "ana".into(),
            email: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            email_verified: None,
        }
    }

    fn plan() -> WorkoutPlan {
        let set = |id, rest| PlannedSet {
            id,
            exercise: 100,
            order: id as u32,
            target_reps: Some("10".into()),
            target_weight: Some("50.00".into()),
            rest_time_after: Some(rest),
        };
        WorkoutPlan {
            id: 2,
            owner_username: "ana".into(),
            name: "Bench day".into(),
            description: None,
            groups: vec![ExerciseGroup {
                id: 1,
                order: 1,
                name: None,
                sets: vec![set(10, 60), set(11, 0)],
            }],
        }
    }

    fn session(set: usize) -> WorkoutSession {
        WorkoutSession {
            id: 7,
            owner_username: "ana".into(),
            plan: Some(2),
            plan_details: Some(plan()),
            status: SessionStatus::InProgress,
            current_group_index: 0,
            current_set_index: set,
            date_started: Utc::now(),
            date_finished: None,
            notes: None,
            logged_sets: vec![],
        }
    }

    fn boot(h: &mut Harness, session: WorkoutSession) {
        h.app.tracker = TrackerScreen::Loading;
        h.app
            .handle_response(IoResponse::TrackerLoaded(Ok(Some(TrackerBootstrap {
                session,
                plan: None,
                exercises: vec![],
            }))));
    }

    fn tracker(app: &App) -> &Tracker {
        match &app.tracker {
            TrackerScreen::Active(page) => &page.tracker,
            _ => panic!("tracker not active"),
        }
    }

    #[test]
    fn guests_land_on_login() {
        let h = harness(false);
        assert_eq!(h.app.route, Route::Login);
    }

    #[test]
    fn logging_a_set_rests_and_persists_timer() {
        let mut h = harness(true);
        boot(&mut h, session(0));
        h.drain();

        h.app.log_set();
        let requests = h.drain();
        let [IoRequest::LogSet { session_id: 7, plan }] = requests.as_slice() else {
            panic!("expected a log request, got {requests:?}");
        };
        assert_eq!(plan.advance_to, Some(Cursor::new(0, 1)));

        // A second submit while in flight is rejected.
        h.app.log_set();
        assert!(h.drain().is_empty());

        let logged = LoggedSet {
            id: 1,
            session: 7,
            exercise: 100,
            planned_set: Some(10),
            order: 1,
            actual_reps: 10,
            actual_weight: "50.00".into(),
            actual_rest_time: None,
            completed_at: Some(Utc::now()),
        };
        h.app.handle_response(IoResponse::SetLogged {
            session_id: 7,
            logged: Ok(logged),
            progress: Some(Ok(session(1))),
        });

        assert!(matches!(tracker(&h.app).phase(), Phase::Resting { .. }));
        assert_eq!(h.timers.load().map(|t| t.target_duration), Some(60));

        h.app.skip_rest();
        assert_eq!(tracker(&h.app).phase(), Phase::ActiveSet);
        assert_eq!(h.timers.load(), None);
    }

    #[test]
    fn stale_timer_of_other_session_is_cleared_on_resume() {
        let mut h = harness(true);
        h.timers
            .save(&RestTimerState::new(5, Utc::now(), 60, None));

        boot(&mut h, session(0));

        assert_eq!(tracker(&h.app).phase(), Phase::ActiveSet);
        assert_eq!(h.timers.load(), None);
    }

    #[test]
    fn expired_timer_leaves_overtime_notice() {
        let mut h = harness(true);
        let started = Utc::now() - Duration::seconds(200);
        h.timers
            .save(&RestTimerState::new(7, started, 60, Some("Bench Press".into())));

        boot(&mut h, session(1));

        assert!(h.app.notice.as_deref().is_some_and(|n| n.contains("Bench Press")));
        assert_eq!(h.timers.load(), None);
    }

    #[test]
    fn missing_plan_is_an_init_error() {
        let mut h = harness(true);
        let mut s = session(0);
        s.plan_details = None;

        boot(&mut h, s);

        assert!(matches!(h.app.tracker, TrackerScreen::Failed(_)));
    }

    #[test]
    fn finishing_clears_resume_offer() {
        let mut h = harness(true);
        boot(&mut h, session(0));
        assert_eq!(h.app.plans.active_session, Some(7));

        h.app.finish_workout();
        let mut done = session(0);
        done.status = SessionStatus::Completed;
        h.app.handle_response(IoResponse::Finished {
            session_id: 7,
            result: Ok(done),
        });
        h.app.poll_io();

        assert_eq!(tracker(&h.app).phase(), Phase::Finished);
        assert_eq!(h.app.plans.active_session, None);
    }

    #[test]
    fn responses_for_other_sessions_are_ignored() {
        let mut h = harness(true);
        boot(&mut h, session(0));
        h.app.log_set();

        h.app.handle_response(IoResponse::SetLogged {
            session_id: 99,
            logged: Err("boom".into()),
            progress: None,
        });

        assert!(tracker(&h.app).is_busy());
        assert_eq!(tracker(&h.app).error(), None);
    }

    #[test]
    fn failed_log_surfaces_inline_error() {
        let mut h = harness(true);
        boot(&mut h, session(0));
        h.app.log_set();

        h.app.handle_response(IoResponse::SetLogged {
            session_id: 7,
            logged: Err("server unavailable".into()),
            progress: None,
        });

        let t = tracker(&h.app);
        assert!(!t.is_busy());
        assert_eq!(t.error(), Some("server unavailable"));
        assert_eq!(t.cursor(), Cursor::new(0, 0));
    }

    #[test]
    fn dropped_request_releases_the_tracker() {
        let mut h = harness(true);
        boot(&mut h, session(0));
        h.drain();
        while h.app.io.tx.try_send(IoRequest::LoadPlans).is_ok() {}

        h.app.log_set();

        let t = tracker(&h.app);
        assert!(!t.is_busy());
        assert_eq!(t.error(), Some(BUSY_MESSAGE));
        assert_eq!(t.cursor(), Cursor::new(0, 0));
    }

    #[test]
    fn extra_set_form_starts_at_zero_reps() {
        let mut h = harness(true);
        boot(&mut h, session(0));
        h.app.custom_open();

        match &h.app.tracker {
            TrackerScreen::Active(page) => {
                let form = page.custom.as_ref().unwrap();
                assert_eq!(form.reps, "0");
            }
            _ => panic!("tracker not active"),
        }
    }

    #[test]
    fn registering_reports_account_creation() {
        let mut h = harness(false);
        h.app.navigate(Route::Register);
        h.app.auth_form.username = "bo".into();
        h.app.auth_form.email = "bo@example.com".into();
        h.app.auth_form.password = "secret".into();
        h.app.auth_form.confirm = "secret".into();

        h.app.submit_auth();

        assert_eq!(h.app.auth_form.status, "Creating account...");
        assert!(matches!(h.drain().as_slice(), [IoRequest::Register(_)]));
    }

    fn summary(id: i64) -> SessionSummary {
        SessionSummary {
            id,
            owner_username: "ana".into(),
            plan: Some(2),
            plan_name: Some("Bench day".into()),
            status: SessionStatus::Completed,
            date_started: Utc::now(),
            date_finished: None,
            set_count: 1,
        }
    }

    #[test]
    fn history_enter_opens_session_detail() {
        let mut h = harness(true);
        h.app.navigate(Route::History);
        h.app.handle_response(IoResponse::History(Ok(vec![summary(7), summary(8)])));
        h.drain();

        h.app.select_history(1);
        h.app.open_session();
        assert!(matches!(
            h.drain().as_slice(),
            [IoRequest::LoadSession { id: 8, public: false }]
        ));

        h.app.handle_response(IoResponse::SessionLoaded {
            id: 7,
            result: Err("late".into()),
        });
        assert!(matches!(
            h.app.session_view,
            Some(SessionView { id: 8, detail: Detail::Loading })
        ));

        h.app.handle_response(IoResponse::SessionLoaded {
            id: 8,
            result: Ok(SessionDetail {
                session: session(0),
                exercises: ExerciseCache::default(),
            }),
        });
        assert!(matches!(
            h.app.session_view,
            Some(SessionView { detail: Detail::Loaded(_), .. })
        ));

        h.app.close_session();
        assert!(h.app.session_view.is_none());
    }

    #[test]
    fn deleting_a_plan_needs_a_second_press() {
        let mut h = harness(true);
        h.app.navigate(Route::Plans);
        h.app.handle_response(IoResponse::Plans {
            plans: Ok(vec![plan()]),
            active_session: None,
        });
        h.drain();

        h.app.delete_plan();
        assert!(h.drain().is_empty());
        assert_eq!(h.app.plans.pending_delete, Some(2));

        h.app.disarm_delete();
        h.app.delete_plan();
        assert!(h.drain().is_empty());

        h.app.delete_plan();
        assert!(matches!(h.drain().as_slice(), [IoRequest::DeletePlan { id: 2 }]));

        h.app.handle_response(IoResponse::PlanDeleted {
            id: 2,
            result: Ok(()),
        });
        assert!(h.app.plans.plans.is_empty());
        assert_eq!(h.app.plans.selected, 0);
    }

    #[test]
    fn duplicating_a_plan_selects_the_copy() {
        let mut h = harness(true);
        h.app.navigate(Route::Plans);
        h.app.handle_response(IoResponse::Plans {
            plans: Ok(vec![plan()]),
            active_session: None,
        });
        h.drain();

        h.app.duplicate_plan();
        match h.drain().as_slice() {
            [IoRequest::DuplicatePlan(input)] => {
                assert_eq!(input.name, "Bench day (copy)");
                assert_eq!(input.groups[0].sets.len(), 2);
            }
            other => panic!("unexpected requests: {other:?}"),
        }

        let mut copy = plan();
        copy.id = 3;
        copy.name = "Bench day (copy)".into();
        h.app.handle_response(IoResponse::PlanCreated(Ok(copy)));
        assert_eq!(h.app.plans.selected, 1);
    }

    fn exercise(id: i64, category: &str, primary: &str) -> Exercise {
        Exercise {
            id,
            name: format!("exercise {id}"),
            force: None,
            level: "beginner".into(),
            mechanic: None,
            category: category.into(),
            equipment: None,
            primary_muscles: vec![primary.into()],
            secondary_muscles: vec![],
            instructions: vec![],
        }
    }

    #[test]
    fn exercise_library_filters_and_pages() {
        let mut h = harness(true);
        h.app.navigate(Route::Exercises);
        let sent = h.drain();
        assert!(matches!(
            sent.as_slice(),
            [IoRequest::LoadTaxonomy, IoRequest::LoadExercises { page: 1 }]
        ));

        h.app.handle_response(IoResponse::Taxonomy {
            categories: Ok(vec![
                Category { category: "strength".into() },
                Category { category: "cardio".into() },
            ]),
            muscle_groups: Ok(vec![MuscleGroup { id: 1, name: "Chest".into() }]),
        });
        h.app.handle_response(IoResponse::Exercises {
            page: 1,
            result: Ok(Paginated {
                count: 3,
                next: Some("next".into()),
                previous: None,
                results: vec![
                    exercise(1, "strength", "chest"),
                    exercise(2, "cardio", "quadriceps"),
                    exercise(3, "Strength", "lats"),
                ],
            }),
        });
        assert_eq!(h.app.exercises.visible().len(), 3);

        h.app.cycle_category();
        let ids: Vec<i64> = h.app.exercises.visible().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 3]);

        h.app.cycle_muscle_group();
        let ids: Vec<i64> = h.app.exercises.visible().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1]);

        h.app.open_exercise();
        assert!(matches!(h.drain().as_slice(), [IoRequest::LoadExercise { id: 1 }]));
        h.app.handle_response(IoResponse::ExerciseLoaded {
            id: 1,
            result: Ok(exercise(1, "strength", "chest")),
        });
        assert!(matches!(h.app.exercises.detail, Some((1, Detail::Loaded(_)))));

        h.app.exercise_page(-1);
        assert!(h.drain().is_empty());
        h.app.exercise_page(1);
        assert!(matches!(h.drain().as_slice(), [IoRequest::LoadExercises { page: 2 }]));

        h.app.cycle_category();
        h.app.cycle_category();
        assert_eq!(h.app.exercises.category, None);
    }

    fn public_profile(username: &str) -> PublicProfile {
        PublicProfile {
            username: username.into(),
            first_name: String::new(),
            last_name: String::new(),
            gender: None,
            weight: None,
            height: None,
            body_fat_percentage: None,
            date_joined: Utc::now(),
            about_me: None,
        }
    }

    #[test]
    fn public_profile_sessions_open_public_detail() {
        let mut h = harness(true);
        h.app.navigate(Route::Profiles);
        assert!(matches!(h.drain().as_slice(), [IoRequest::LoadProfiles]));
        h.app.handle_response(IoResponse::Profiles {
            me: Err("offline".into()),
            public: Ok(vec![public_profile("bo"), public_profile("cy")]),
        });

        h.app.toggle_profile_visibility();
        assert!(h.drain().is_empty());

        h.app.select_profile(1);
        h.app.open_profile();
        assert!(matches!(
            h.drain().as_slice(),
            [IoRequest::LoadUserProfile { username }] if username == "cy"
        ));

        h.app.handle_response(IoResponse::UserProfile {
            username: "bo".into(),
            profile: Ok(public_profile("bo")),
            sessions: Ok(vec![summary(1)]),
        });
        assert!(h.app.profiles.viewing.as_ref().unwrap().sessions.is_empty());

        h.app.handle_response(IoResponse::UserProfile {
            username: "cy".into(),
            profile: Ok(public_profile("cy")),
            sessions: Ok(vec![summary(4)]),
        });
        h.app.open_session();
        assert!(matches!(
            h.drain().as_slice(),
            [IoRequest::LoadSession { id: 4, public: true }]
        ));

        h.app.close_profile();
        assert!(h.app.profiles.viewing.is_none());
    }
}
