use gymtrack_core::models::{
    Listing, ProgressUpdate, SessionSummary, StartSessionInput, WorkoutSession,
};
use serde_json::json;

use crate::http::{ApiClient, ApiError, ApiResult};

pub async fn list(client: &ApiClient) -> ApiResult<Vec<SessionSummary>> {
    let listing: Listing<SessionSummary> = client.get("workouts/sessions/").await?;
    Ok(listing.into_items())
}

pub async fn get(client: &ApiClient, id: i64) -> ApiResult<WorkoutSession> {
    client.get(&format!("workouts/sessions/{id}/")).await
}

/// The caller's in-progress session. The backend answers 404 when there is
/// none.
pub async fn active(client: &ApiClient) -> ApiResult<Option<WorkoutSession>> {
    match client.get("workouts/sessions/active/").await {
        Ok(session) => Ok(Some(session)),
        Err(ApiError::NotFound) => Ok(None),
        Err(err) => Err(err),
    }
}

/// Starts a session. An existing in-progress session for the same plan is
/// returned instead of a new one.
pub async fn start(client: &ApiClient, input: &StartSessionInput) -> ApiResult<WorkoutSession> {
    client.post("workouts/sessions/", input).await
}

pub async fn update_progress(
    client: &ApiClient,
    id: i64,
    update: &ProgressUpdate,
) -> ApiResult<WorkoutSession> {
    client
        .patch(&format!("workouts/sessions/{id}/update_progress/"), update)
        .await
}

pub async fn finish(client: &ApiClient, id: i64) -> ApiResult<WorkoutSession> {
    client
        .post(&format!("workouts/sessions/{id}/finish/"), &json!({}))
        .await
}

pub async fn cancel(client: &ApiClient, id: i64) -> ApiResult<WorkoutSession> {
    client
        .post(&format!("workouts/sessions/{id}/cancel/"), &json!({}))
        .await
}

/// History of another user, available only when their profile is public.
pub async fn for_user(client: &ApiClient, username: &str) -> ApiResult<Vec<SessionSummary>> {
    let listing: Listing<SessionSummary> = client
        .get(&format!("workouts/sessions/user/{username}/"))
        .await?;
    Ok(listing.into_items())
}

pub async fn public_detail(client: &ApiClient, id: i64) -> ApiResult<WorkoutSession> {
    client.get(&format!("workouts/sessions/{id}/public/")).await
}
