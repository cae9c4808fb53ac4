//! Background I/O task for network operations.

use std::collections::BTreeSet;

use chrono::Utc;
use gymtrack_core::models::{
    AuthResponse, Category, Exercise, LoggedSet, LoggedSetInput, LoginCredentials, MuscleGroup,
    Paginated, Profile, ProfileUpdate, ProgressUpdate, PublicProfile, RegisterData,
    SessionSummary, StartSessionInput, User, WorkoutPlan, WorkoutPlanInput, WorkoutSession,
};
use gymtrack_core::{ExerciseCache, LogPlan};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::api;
use crate::http::{ApiClient, ApiError, ApiResult};

/// Requests to the background task.
#[derive(Debug)]
pub enum IoRequest {
    Login(LoginCredentials),
    Register(RegisterData),
    Logout,
    CheckSession,
    LoadPlans,
    DuplicatePlan(WorkoutPlanInput),
    DeletePlan { id: i64 },
    LoadHistory,
    /// A finished or running session with names for its exercises.
    /// `public` reads another user's session through the public endpoint.
    LoadSession { id: i64, public: bool },
    LoadExercises { page: u32 },
    LoadTaxonomy,
    LoadExercise { id: i64 },
    LoadProfiles,
    LoadUserProfile { username: String },
    SetProfilePublic(bool),
    /// Resume the active session, or start one for `plan` when none runs.
    LoadTracker { plan: Option<WorkoutPlan> },
    /// Log a planned set, then advance the session cursor if there is a next set.
    LogSet { session_id: i64, plan: LogPlan },
    LogCustomSet { session_id: i64, input: LoggedSetInput },
    Advance { session_id: i64, update: ProgressUpdate },
    Finish { session_id: i64 },
    Cancel { session_id: i64 },
}

/// Everything the tracker needs to start.
#[derive(Debug)]
pub struct TrackerBootstrap {
    pub session: WorkoutSession,
    pub plan: Option<WorkoutPlan>,
    pub exercises: Vec<Exercise>,
}

#[derive(Debug)]
pub struct SessionDetail {
    pub session: WorkoutSession,
    pub exercises: ExerciseCache,
}

/// Responses from the background task.
#[derive(Debug)]
pub enum IoResponse {
    LoggedIn(Result<AuthResponse, String>),
    Registered(Result<AuthResponse, String>),
    LoggedOut,
    SessionChecked(Result<User, String>),
    Plans {
        plans: Result<Vec<WorkoutPlan>, String>,
        active_session: Option<i64>,
    },
    PlanCreated(Result<WorkoutPlan, String>),
    PlanDeleted {
        id: i64,
        result: Result<(), String>,
    },
    History(Result<Vec<SessionSummary>, String>),
    SessionLoaded {
        id: i64,
        result: Result<SessionDetail, String>,
    },
    Exercises {
        page: u32,
        result: Result<Paginated<Exercise>, String>,
    },
    Taxonomy {
        categories: Result<Vec<Category>, String>,
        muscle_groups: Result<Vec<MuscleGroup>, String>,
    },
    ExerciseLoaded {
        id: i64,
        result: Result<Exercise, String>,
    },
    Profiles {
        me: Result<Profile, String>,
        public: Result<Vec<PublicProfile>, String>,
    },
    UserProfile {
        username: String,
        profile: Result<PublicProfile, String>,
        sessions: Result<Vec<SessionSummary>, String>,
    },
    ProfileUpdated(Result<Profile, String>),
    /// `Ok(None)`: no session is running and no plan was given.
    TrackerLoaded(Result<Option<TrackerBootstrap>, String>),
    SetLogged {
        session_id: i64,
        logged: Result<LoggedSet, String>,
        progress: Option<Result<WorkoutSession, String>>,
    },
    CustomSetLogged {
        session_id: i64,
        result: Result<LoggedSet, String>,
    },
    Advanced {
        session_id: i64,
        result: Result<WorkoutSession, String>,
    },
    Finished {
        session_id: i64,
        result: Result<WorkoutSession, String>,
    },
    Canceled {
        session_id: i64,
        result: Result<WorkoutSession, String>,
    },
}

pub struct IoHandle {
    pub tx: mpsc::Sender<IoRequest>,
    pub rx: mpsc::Receiver<IoResponse>,
}

impl IoHandle {
    /// Queues a request. Returns `false` when it was dropped because the
    /// queue is full or the worker is gone.
    pub fn send(&self, request: IoRequest) -> bool {
        match self.tx.try_send(request) {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "dropping io request");
                false
            }
        }
    }
}

/// Spawn the background I/O task.
pub fn spawn(client: ApiClient) -> IoHandle {
    let (req_tx, req_rx) = mpsc::channel(16);
    let (resp_tx, resp_rx) = mpsc::channel(16);

    tokio::spawn(run(client, req_rx, resp_tx));

    IoHandle {
        tx: req_tx,
        rx: resp_rx,
    }
}

async fn run(client: ApiClient, mut rx: mpsc::Receiver<IoRequest>, tx: mpsc::Sender<IoResponse>) {
    while let Some(request) = rx.recv().await {
        let response = handle_request(&client, request).await;
        if tx.send(response).await.is_err() {
            break;
        }
    }
}

fn text<T>(result: ApiResult<T>) -> Result<T, String> {
    result.map_err(|e| e.message())
}

async fn handle_request(client: &ApiClient, request: IoRequest) -> IoResponse {
    match request {
        IoRequest::Login(credentials) => {
            IoResponse::LoggedIn(text(api::auth::login(client, &credentials).await))
        }
        IoRequest::Register(data) => {
            IoResponse::Registered(text(api::auth::register(client, &data).await))
        }
        IoRequest::Logout => {
            api::auth::logout(client).await;
            IoResponse::LoggedOut
        }
        IoRequest::CheckSession => {
            let result = api::auth::current_user(client).await;
            if let Err(err) = &result {
                warn!(error = %err, "stored session rejected");
                client.tokens().clear();
            }
            IoResponse::SessionChecked(text(result))
        }
        IoRequest::LoadPlans => {
            let plans = text(api::plans::list(client).await);
            let active_session = match api::sessions::active(client).await {
                Ok(session) => session.map(|s| s.id),
                Err(err) => {
                    warn!(error = %err, "active session lookup failed");
                    None
                }
            };
            IoResponse::Plans {
                plans,
                active_session,
            }
        }
        IoRequest::DuplicatePlan(input) => {
            IoResponse::PlanCreated(text(api::plans::create(client, &input).await))
        }
        IoRequest::DeletePlan { id } => IoResponse::PlanDeleted {
            id,
            result: text(api::plans::delete(client, id).await),
        },
        IoRequest::LoadHistory => IoResponse::History(text(api::sessions::list(client).await)),
        IoRequest::LoadSession { id, public } => IoResponse::SessionLoaded {
            id,
            result: text(session_detail(client, id, public).await),
        },
        IoRequest::LoadExercises { page } => IoResponse::Exercises {
            page,
            result: text(api::exercises::list(client, page).await),
        },
        IoRequest::LoadTaxonomy => IoResponse::Taxonomy {
            categories: text(api::categories::list(client).await),
            muscle_groups: text(api::muscle_groups::list(client).await),
        },
        IoRequest::LoadExercise { id } => IoResponse::ExerciseLoaded {
            id,
            result: text(api::exercises::get(client, id).await),
        },
        IoRequest::LoadProfiles => IoResponse::Profiles {
            me: text(api::profiles::me(client).await),
            public: text(api::profiles::list_public(client).await),
        },
        IoRequest::LoadUserProfile { username } => {
            let profile = text(api::profiles::get(client, &username).await);
            let sessions = text(api::sessions::for_user(client, &username).await);
            IoResponse::UserProfile {
                username,
                profile,
                sessions,
            }
        }
        IoRequest::SetProfilePublic(is_public) => {
            let update = ProfileUpdate {
                is_public: Some(is_public),
                ..Default::default()
            };
            IoResponse::ProfileUpdated(text(api::profiles::update_me(client, &update).await))
        }
        IoRequest::LoadTracker { plan } => {
            IoResponse::TrackerLoaded(text(bootstrap_tracker(client, plan).await))
        }
        IoRequest::LogSet { session_id, plan } => {
            let logged = api::logged_sets::create(client, &plan.input).await;
            let progress = match (&logged, plan.advance_to) {
                (Ok(_), Some(cursor)) => Some(text(
                    api::sessions::update_progress(client, session_id, &cursor.to_update()).await,
                )),
                _ => None,
            };
            IoResponse::SetLogged {
                session_id,
                logged: text(logged),
                progress,
            }
        }
        IoRequest::LogCustomSet { session_id, input } => IoResponse::CustomSetLogged {
            session_id,
            result: text(api::logged_sets::create(client, &input).await),
        },
        IoRequest::Advance { session_id, update } => IoResponse::Advanced {
            session_id,
            result: text(api::sessions::update_progress(client, session_id, &update).await),
        },
        IoRequest::Finish { session_id } => IoResponse::Finished {
            session_id,
            result: text(api::sessions::finish(client, session_id).await),
        },
        IoRequest::Cancel { session_id } => IoResponse::Canceled {
            session_id,
            result: text(api::sessions::cancel(client, session_id).await),
        },
    }
}

/// Active session (or a new one for `selected`), its plan, and the whole
/// exercise library for name lookups.
async fn bootstrap_tracker(
    client: &ApiClient,
    selected: Option<WorkoutPlan>,
) -> ApiResult<Option<TrackerBootstrap>> {
    let session = match api::sessions::active(client).await? {
        Some(session) => {
            info!(session = session.id, "resuming active session");
            session
        }
        None => {
            let Some(plan) = &selected else {
                debug!("no active session and no plan selected");
                return Ok(None);
            };
            let input = StartSessionInput {
                plan: Some(plan.id),
                date_started: Utc::now(),
            };
            let session = api::sessions::start(client, &input).await?;
            info!(session = session.id, plan = plan.id, "started session");
            session
        }
    };

    let plan = match (&session.plan_details, session.plan, selected) {
        (Some(_), _, _) => None,
        (None, Some(id), Some(plan)) if plan.id == id => Some(plan),
        (None, Some(id), _) => match api::plans::get(client, id).await {
            Ok(plan) => Some(plan),
            Err(ApiError::NotFound) => None,
            Err(err) => return Err(err),
        },
        (None, None, _) => None,
    };

    let exercises = match api::exercises::all(client).await {
        Ok(exercises) => exercises,
        Err(err) => {
            warn!(error = %err, "exercise library unavailable, showing ids");
            Vec::new()
        }
    };

    Ok(Some(TrackerBootstrap {
        session,
        plan,
        exercises,
    }))
}

/// Loads a session and looks up each exercise it references. Lookups that
/// fail leave the id unnamed.
async fn session_detail(client: &ApiClient, id: i64, public: bool) -> ApiResult<SessionDetail> {
    let session = if public {
        api::sessions::public_detail(client, id).await?
    } else {
        api::sessions::get(client, id).await?
    };

    let ids: BTreeSet<i64> = session.logged_sets.iter().map(|s| s.exercise).collect();
    let mut exercises = Vec::with_capacity(ids.len());
    for exercise in ids {
        match api::exercises::get(client, exercise).await {
            Ok(found) => exercises.push(found),
            Err(err) => warn!(exercise, error = %err, "exercise lookup failed"),
        }
    }

    Ok(SessionDetail {
        session,
        exercises: ExerciseCache::new(exercises),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockBackend, client_for};
    use axum::{
        Json, Router,
        extract::Path,
        http::StatusCode,
        routing::{get, patch, post},
    };
    use gymtrack_core::Cursor;
    use serde_json::{Value, json};

    fn plan_json() -> Value {
        json!({
            "id": 2, "owner_username": "ana", "name": "Bench day", "description": null,
            "groups": [{"id": 1, "order": 1, "name": null, "sets": [
                {"id": 10, "exercise": 100, "order": 1, "target_reps": "10", "target_weight": "50.00", "rest_time_after": 60},
                {"id": 11, "exercise": 100, "order": 2, "target_reps": "8", "target_weight": "50.00", "rest_time_after": 0}
            ]}]
        })
    }

    fn session_json(set: u64) -> Value {
        json!({
            "id": 7, "owner_username": "ana", "plan": 2, "plan_details": plan_json(),
            "status": "in_progress", "current_group_index": 0, "current_set_index": set,
            "date_started": "2024-05-01T10:00:00Z", "logged_sets": []
        })
    }

    fn backend() -> Router {
        Router::new()
            .route(
                "/api/v1/workouts/sessions/active/",
                get(|| async { StatusCode::NOT_FOUND }),
            )
            .route(
                "/api/v1/workouts/sessions/",
                post(|Json(body): Json<Value>| async move {
                    assert_eq!(body["plan"], 2);
                    (StatusCode::CREATED, Json(session_json(0)))
                }),
            )
            .route(
                "/api/v1/exercises/",
                get(|| async {
                    Json(json!({"count": 1, "next": null, "previous": null,
                        "results": [{"id": 100, "name": "Bench Press"}]}))
                }),
            )
            .route(
                "/api/v1/workouts/logged-sets/",
                post(|Json(body): Json<Value>| async move {
                    (
                        StatusCode::CREATED,
                        Json(json!({
                            "id": 1, "session": body["session_id"], "exercise": body["exercise"],
                            "planned_set": body["planned_set"], "order": body["order"],
                            "actual_reps": body["actual_reps"], "actual_weight": body["actual_weight"],
                            "completed_at": "2024-05-01T10:05:00Z"
                        })),
                    )
                }),
            )
            .route(
                "/api/v1/workouts/sessions/{id}/update_progress/",
                patch(|Path(_id): Path<i64>, Json(body): Json<Value>| async move {
                    Json(session_json(body["current_set_index"].as_u64().unwrap_or(0)))
                }),
            )
    }

    fn plan() -> WorkoutPlan {
        serde_json::from_value(plan_json()).unwrap()
    }

    #[tokio::test]
    async fn bootstrap_starts_session_for_selected_plan() {
        let mock = MockBackend::spawn(backend()).await;
        let (_dir, client) = client_for(&mock);

        let boot = bootstrap_tracker(&client, Some(plan())).await.unwrap().unwrap();

        assert_eq!(boot.session.id, 7);
        assert!(boot.session.plan_details.is_some());
        assert_eq!(boot.exercises.len(), 1);
    }

    #[tokio::test]
    async fn bootstrap_without_session_or_plan_is_empty() {
        let mock = MockBackend::spawn(backend()).await;
        let (_dir, client) = client_for(&mock);

        assert!(bootstrap_tracker(&client, None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn log_set_posts_then_advances() {
        let mock = MockBackend::spawn(backend()).await;
        let (_dir, client) = client_for(&mock);
        let plan = LogPlan {
            input: LoggedSetInput {
                session_id: 7,
                exercise: 100,
                planned_set: Some(10),
                order: 1,
                actual_reps: 10,
                actual_weight: "50.00".into(),
                actual_rest_time: None,
            },
            advance_to: Some(Cursor::new(0, 1)),
        };

        let response = handle_request(&client, IoRequest::LogSet { session_id: 7, plan }).await;

        let IoResponse::SetLogged {
            session_id,
            logged,
            progress,
        } = response
        else {
            panic!("unexpected response");
        };
        assert_eq!(session_id, 7);
        assert_eq!(logged.unwrap().planned_set, Some(10));
        assert_eq!(progress.unwrap().unwrap().current_set_index, 1);
    }

    #[tokio::test]
    async fn session_detail_names_logged_exercises() {
        let router = Router::new()
            .route(
                "/api/v1/workouts/sessions/{id}/public/",
                get(|Path(id): Path<i64>| async move {
                    let mut session = session_json(0);
                    session["id"] = json!(id);
                    session["logged_sets"] = json!([
                        {"id": 1, "session": id, "exercise": 100, "planned_set": 10, "order": 1,
                         "actual_reps": 10, "actual_weight": "50.00"},
                        {"id": 2, "session": id, "exercise": 300, "planned_set": null, "order": 2,
                         "actual_reps": 12, "actual_weight": "0.00"}
                    ]);
                    Json(session)
                }),
            )
            .route(
                "/api/v1/exercises/{id}/",
                get(|Path(id): Path<i64>| async move {
                    if id == 100 {
                        Ok(Json(json!({"id": 100, "name": "Bench Press"})))
                    } else {
                        Err(StatusCode::NOT_FOUND)
                    }
                }),
            );
        let mock = MockBackend::spawn(router).await;
        let (_dir, client) = client_for(&mock);

        let response = handle_request(&client, IoRequest::LoadSession { id: 9, public: true }).await;

        let IoResponse::SessionLoaded { id, result } = response else {
            panic!("unexpected response");
        };
        let detail = result.unwrap();
        assert_eq!(id, 9);
        assert_eq!(detail.session.logged_sets.len(), 2);
        assert_eq!(detail.exercises.name(100), "Bench Press");
        assert_eq!(detail.exercises.name(300), "Exercise #300");
    }

    #[tokio::test]
    async fn private_history_still_returns_profile() {
        let router = Router::new()
            .route(
                "/api/v1/profiles/{username}/",
                get(|Path(name): Path<String>| async move {
                    Json(json!({"username": name, "first_name": "Bo", "last_name": "",
                        "gender": null, "weight": null, "height": null,
                        "body_fat_percentage": null, "date_joined": "2024-01-01T00:00:00Z",
                        "about_me": null}))
                }),
            )
            .route(
                "/api/v1/workouts/sessions/user/{username}/",
                get(|| async {
                    (
                        StatusCode::FORBIDDEN,
                        r#"{"detail":"This profile is private."}"#,
                    )
                }),
            );
        let mock = MockBackend::spawn(router).await;
        let (_dir, client) = client_for(&mock);

        let response = handle_request(
            &client,
            IoRequest::LoadUserProfile {
                username: "bo".into(),
            },
        )
        .await;

        let IoResponse::UserProfile {
            username,
            profile,
            sessions,
        } = response
        else {
            panic!("unexpected response");
        };
        assert_eq!(username, "bo");
        assert_eq!(profile.unwrap().first_name, "Bo");
        assert!(sessions.unwrap_err().contains("private"));
    }
}
