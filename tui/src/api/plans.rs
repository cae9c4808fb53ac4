use gymtrack_core::models::{Listing, WorkoutPlan, WorkoutPlanInput};

use crate::http::{ApiClient, ApiResult};

pub async fn list(client: &ApiClient) -> ApiResult<Vec<WorkoutPlan>> {
    let listing: Listing<WorkoutPlan> = client.get("workouts/plans/").await?;
    Ok(listing.into_items())
}

pub async fn get(client: &ApiClient, id: i64) -> ApiResult<WorkoutPlan> {
    client.get(&format!("workouts/plans/{id}/")).await
}

pub async fn create(client: &ApiClient, input: &WorkoutPlanInput) -> ApiResult<WorkoutPlan> {
    client.post("workouts/plans/", input).await
}

pub async fn delete(client: &ApiClient, id: i64) -> ApiResult<()> {
    client.delete(&format!("workouts/plans/{id}/")).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockBackend, client_for};
    use axum::{
        Json, Router,
        http::StatusCode,
        routing::{get as get_route, post},
    };
    use gymtrack_core::models::{ExerciseGroupInput, PlannedSetInput};
    use serde_json::{Value, json};

    fn echo(id: i64, body: &Value) -> Value {
        json!({
            "id": id,
            "owner_username": "ana",
            "name": body["name"],
            "description": body["description"],
            "groups": [{"id": 1, "order": 1, "name": null, "sets": [
                {"id": 1, "exercise": body["groups"][0]["sets"][0]["exercise"], "order": 1,
                 "target_reps": "5", "target_weight": null, "rest_time_after": 120}
            ]}]
        })
    }

    fn input(name: &str) -> WorkoutPlanInput {
        WorkoutPlanInput {
            name: name.into(),
            description: None,
            groups: vec![ExerciseGroupInput {
                order: 1,
                name: None,
                sets: vec![PlannedSetInput {
                    exercise: 4,
                    order: 1,
                    target_reps: Some("5".into()),
                    target_weight: None,
                    rest_time_after: Some(120),
                }],
            }],
        }
    }

    #[tokio::test]
    async fn create_and_delete() {
        let router = Router::new()
            .route(
                "/api/v1/workouts/plans/",
                post(|Json(body): Json<Value>| async move {
                    (StatusCode::CREATED, Json(echo(3, &body)))
                }),
            )
            .route(
                "/api/v1/workouts/plans/{id}/",
                get_route(|| async { StatusCode::NOT_FOUND })
                    .delete(|| async { StatusCode::NO_CONTENT }),
            );
        let mock = MockBackend::spawn(router).await;
        let (_dir, client) = client_for(&mock);

        let created = create(&client, &input("Legs")).await.unwrap();
        assert_eq!(created.id, 3);
        assert_eq!(created.groups[0].sets[0].exercise, 4);

        delete(&client, 3).await.unwrap();
        assert!(matches!(
            get(&client, 3).await,
            Err(crate::http::ApiError::NotFound)
        ));
    }
}
