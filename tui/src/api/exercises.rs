use gymtrack_core::models::{Exercise, Listing, Paginated};
use serde::Serialize;
use tracing::debug;

use crate::http::{ApiClient, ApiResult};

#[derive(Serialize)]
struct PageQuery {
    page: u32,
}

pub async fn list(client: &ApiClient, page: u32) -> ApiResult<Paginated<Exercise>> {
    client.get_query("exercises/", &PageQuery { page }).await
}

pub async fn get(client: &ApiClient, id: i64) -> ApiResult<Exercise> {
    client.get(&format!("exercises/{id}/")).await
}

/// Walks every page of the library.
pub async fn all(client: &ApiClient) -> ApiResult<Vec<Exercise>> {
    let mut exercises = Vec::new();
    let mut page = 1;
    loop {
        let listing: Listing<Exercise> = client.get_query("exercises/", &PageQuery { page }).await?;
        match listing {
            Listing::Plain(items) => {
                exercises.extend(items);
                break;
            }
            Listing::Page(p) => {
                let done = p.next.is_none() || p.results.is_empty();
                exercises.extend(p.results);
                if done {
                    break;
                }
                page += 1;
            }
        }
    }
    debug!(count = exercises.len(), pages = page, "exercise library loaded");
    Ok(exercises)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockBackend, client_for};
    use axum::{Json, Router, extract::Query, routing::get as get_route};
    use serde::Deserialize;
    use serde_json::{Value, json};

    #[derive(Deserialize)]
    struct Page {
        page: u32,
    }

    async fn paged(Query(q): Query<Page>) -> Json<Value> {
        let next = (q.page < 2).then(|| format!("http://x/exercises/?page={}", q.page + 1));
        Json(json!({
            "count": 2,
            "next": next,
            "previous": null,
            "results": [{"id": q.page, "name": format!("Exercise {}", q.page)}]
        }))
    }

    #[tokio::test]
    async fn all_follows_pages_until_next_is_null() {
        let mock = MockBackend::spawn(Router::new().route("/api/v1/exercises/", get_route(paged))).await;
        let (_dir, client) = client_for(&mock);

        let exercises = all(&client).await.unwrap();

        let ids: Vec<_> = exercises.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(exercises[1].name, "Exercise 2");
    }
}
