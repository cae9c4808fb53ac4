use gymtrack_core::models::{Listing, Profile, ProfileUpdate, PublicProfile};

use crate::http::{ApiClient, ApiResult};

pub async fn me(client: &ApiClient) -> ApiResult<Profile> {
    client.get("profiles/me/").await
}

pub async fn update_me(client: &ApiClient, update: &ProfileUpdate) -> ApiResult<Profile> {
    client.patch("profiles/me/", update).await
}

pub async fn list_public(client: &ApiClient) -> ApiResult<Vec<PublicProfile>> {
    let listing: Listing<PublicProfile> = client.get("profiles/").await?;
    Ok(listing.into_items())
}

pub async fn get(client: &ApiClient, username: &str) -> ApiResult<PublicProfile> {
    client.get(&format!("profiles/{username}/")).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockBackend, client_for};
    use axum::{Json, Router, routing::get as get_route};
    use serde_json::{Value, json};

    fn profile(body: Option<&Value>) -> Value {
        let about = body.map(|b| b["about_me"].clone()).unwrap_or(Value::Null);
        json!({
            "username": "ana", "email": "ana@example.com", "first_name": "Ana",
            "last_name": "", "is_public": true, "gender": null, "weight": 61.5,
            "height": null, "body_fat_percentage": null,
            "updated_at": "2024-05-01T10:00:00Z", "date_joined": "2024-01-01T00:00:00Z",
            "about_me": about
        })
    }

    #[tokio::test]
    async fn update_sends_only_changed_fields() {
        let router = Router::new().route(
            "/api/v1/profiles/me/",
            get_route(|| async { Json(profile(None)) }).patch(|Json(body): Json<Value>| async move {
                assert_eq!(body.as_object().map(|o| o.len()), Some(1));
                Json(profile(Some(&body)))
            }),
        );
        let mock = MockBackend::spawn(router).await;
        let (_dir, client) = client_for(&mock);

        assert_eq!(me(&client).await.unwrap().weight, Some(61.5));

        let update = ProfileUpdate {
            about_me: Some("Deadlifts on Fridays".into()),
            ..Default::default()
        };
        let saved = update_me(&client, &update).await.unwrap();
        assert_eq!(saved.about_me.as_deref(), Some("Deadlifts on Fridays"));
    }

    #[tokio::test]
    async fn public_profiles_by_username() {
        let router = Router::new()
            .route(
                "/api/v1/profiles/",
                get_route(|| async {
                    Json(json!([{"username": "bo", "first_name": "", "last_name": "",
                        "gender": null, "weight": null, "height": null,
                        "body_fat_percentage": null, "date_joined": "2024-01-01T00:00:00Z",
                        "about_me": null}]))
                }),
            )
            .route(
                "/api/v1/profiles/{username}/",
                get_route(|axum::extract::Path(name): axum::extract::Path<String>| async move {
                    Json(json!({"username": name, "first_name": "", "last_name": "",
                        "gender": null, "weight": null, "height": null,
                        "body_fat_percentage": null, "date_joined": "2024-01-01T00:00:00Z",
                        "about_me": null}))
                }),
            );
        let mock = MockBackend::spawn(router).await;
        let (_dir, client) = client_for(&mock);

        assert_eq!(list_public(&client).await.unwrap().len(), 1);
        assert_eq!(get(&client, "bo").await.unwrap().username, "bo");
    }
}
