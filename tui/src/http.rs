//! Authenticated HTTP client for the backend REST API.
//!
//! Every request carries the stored access token. A 401 triggers one token
//! refresh and one retry of the original request; a failed refresh clears
//! stored auth.

use std::time::Duration;

use gymtrack_core::models::{TokenRefreshRequest, TokenRefreshResponse};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::storage::TokenStorage;

const REFRESH_PATH: &str = "auth/token/refresh/";

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("not found")]
    NotFound,
    #[error("not signed in")]
    Unauthorized,
    #[error("backend returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Short text for inline display. Field errors from the backend come
    /// back as JSON objects and are shown as-is.
    pub fn message(&self) -> String {
        match self {
            ApiError::Status { body, .. } if !body.is_empty() => body.clone(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base: Url,
    tokens: TokenStorage,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration, tokens: TokenStorage) -> ApiResult<Self> {
        let base = Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base, tokens })
    }

    pub fn tokens(&self) -> &TokenStorage {
        &self.tokens
    }

    fn url(&self, path: &str) -> ApiResult<Url> {
        self.base
            .join(path)
            .map_err(|e| ApiError::InvalidUrl(format!("{path}: {e}")))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let response = self.execute(Method::GET, path, |req| req).await?;
        decode(response).await
    }

    pub async fn get_query<T, Q>(&self, path: &str, query: &Q) -> ApiResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let response = self
            .execute(Method::GET, path, |req| req.query(query))
            .await?;
        decode(response).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .execute(Method::POST, path, |req| req.json(body))
            .await?;
        decode(response).await
    }

    /// POST whose response body is irrelevant.
    pub async fn post_unit<B>(&self, path: &str, body: &B) -> ApiResult<()>
    where
        B: Serialize + ?Sized,
    {
        self.execute(Method::POST, path, |req| req.json(body))
            .await
            .map(drop)
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .execute(Method::PATCH, path, |req| req.json(body))
            .await?;
        decode(response).await
    }

    pub async fn delete(&self, path: &str) -> ApiResult<()> {
        self.execute(Method::DELETE, path, |req| req).await.map(drop)
    }

    async fn execute<F>(&self, method: Method, path: &str, attach: F) -> ApiResult<Response>
    where
        F: Fn(RequestBuilder) -> RequestBuilder,
    {
        let url = self.url(path)?;
        debug!(%method, %url, "request");

        let response = self.send_once(&method, &url, &attach).await?;
        if response.status() != StatusCode::UNAUTHORIZED || path == REFRESH_PATH {
            return check(response).await;
        }

        if !self.refresh().await? {
            return Err(ApiError::Unauthorized);
        }
        debug!(%method, %url, "retrying after token refresh");
        let retried = self.send_once(&method, &url, &attach).await?;
        check(retried).await
    }

    async fn send_once<F>(&self, method: &Method, url: &Url, attach: &F) -> ApiResult<Response>
    where
        F: Fn(RequestBuilder) -> RequestBuilder,
    {
        let mut request = self.http.request(method.clone(), url.clone());
        if let Some(token) = self.tokens.access_token() {
            request = request.bearer_auth(token);
        }
        Ok(attach(request).send().await?)
    }

    /// Exchanges the refresh token for a new access token. Returns whether
    /// the original request is worth retrying.
    async fn refresh(&self) -> ApiResult<bool> {
        let Some(refresh) = self.tokens.refresh_token() else {
            debug!("401 without a refresh token");
            self.tokens.clear();
            return Ok(false);
        };

        let response = self
            .http
            .post(self.url(REFRESH_PATH)?)
            .json(&TokenRefreshRequest { refresh })
            .send()
            .await;

        let refreshed = match response {
            Ok(r) if r.status().is_success() => r.json::<TokenRefreshResponse>().await.ok(),
            Ok(r) => {
                warn!(status = %r.status(), "token refresh rejected");
                None
            }
            Err(err) => {
                warn!(error = %err, "token refresh failed");
                None
            }
        };

        match refreshed {
            Some(tokens) => {
                match tokens.refresh {
                    Some(rotated) => self.tokens.set_tokens(&tokens.access, &rotated),
                    None => self.tokens.set_access_token(&tokens.access),
                }
                info!("access token refreshed");
                Ok(true)
            }
            None => {
                self.tokens.clear();
                Ok(false)
            }
        }
    }
}

async fn check(response: Response) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    match status {
        StatusCode::NOT_FOUND => Err(ApiError::NotFound),
        StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized),
        _ => {
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::Status { status, body })
        }
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockBackend, client_for};
    use axum::{
        Json, Router,
        extract::State,
        http::{HeaderMap, StatusCode as AxumStatus},
        routing::{get, post},
    };
    use serde_json::{Value, json};
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    #[derive(Clone, Default)]
    struct Counters {
        refreshes: Arc<AtomicUsize>,
        user_calls: Arc<AtomicUsize>,
    }

    fn bearer(headers: &HeaderMap) -> Option<String> {
        headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::to_string)
    }

    async fn user(
        State(counters): State<Counters>,
        headers: HeaderMap,
    ) -> Result<Json<Value>, AxumStatus> {
        counters.user_calls.fetch_add(1, Ordering::SeqCst);
        match bearer(&headers).as_deref() {
            Some("fresh") => Ok(Json(json!({"pk": 1, "username": "ana"}))),
            _ => Err(AxumStatus::UNAUTHORIZED),
        }
    }

    async fn refresh_ok(
        State(counters): State<Counters>,
        Json(body): Json<Value>,
    ) -> Result<Json<Value>, AxumStatus> {
        counters.refreshes.fetch_add(1, Ordering::SeqCst);
        if body["refresh"] == "r1" {
            Ok(Json(json!({"access": "fresh", "refresh": "r2"})))
        } else {
            Err(AxumStatus::UNAUTHORIZED)
        }
    }

    async fn refresh_stale(State(counters): State<Counters>) -> Json<Value> {
        counters.refreshes.fetch_add(1, Ordering::SeqCst);
        Json(json!({"access": "still-stale"}))
    }

    fn backend(counters: &Counters, refresh_handler: axum::routing::MethodRouter<Counters>) -> Router {
        Router::new()
            .route("/api/v1/auth/user/", get(user))
            .route("/api/v1/auth/token/refresh/", refresh_handler)
            .with_state(counters.clone())
    }

    #[tokio::test]
    async fn refreshes_once_and_retries() {
        let counters = Counters::default();
        let mock = MockBackend::spawn(backend(&counters, post(refresh_ok))).await;
        let (_dir, client) = client_for(&mock);
        client.tokens().set_tokens("expired", "r1");

        let body: Value = client.get("auth/user/").await.unwrap();

        assert_eq!(body["username"], "ana");
        assert_eq!(counters.refreshes.load(Ordering::SeqCst), 1);
        assert_eq!(counters.user_calls.load(Ordering::SeqCst), 2);
        assert_eq!(client.tokens().access_token().as_deref(), Some("fresh"));
        assert_eq!(client.tokens().refresh_token().as_deref(), Some("r2"));
    }

    #[tokio::test]
    async fn second_unauthorized_surfaces() {
        let counters = Counters::default();
        let mock = MockBackend::spawn(backend(&counters, post(refresh_stale))).await;
        let (_dir, client) = client_for(&mock);
        client.tokens().set_tokens("expired", "r1");

        let result: ApiResult<Value> = client.get("auth/user/").await;

        assert!(matches!(result, Err(ApiError::Unauthorized)));
        assert_eq!(counters.refreshes.load(Ordering::SeqCst), 1);
        assert_eq!(counters.user_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failed_refresh_clears_tokens() {
        let counters = Counters::default();
        let mock = MockBackend::spawn(backend(&counters, post(refresh_ok))).await;
        let (_dir, client) = client_for(&mock);
        client.tokens().set_tokens("expired", "revoked");

        let result: ApiResult<Value> = client.get("auth/user/").await;

        assert!(matches!(result, Err(ApiError::Unauthorized)));
        assert_eq!(counters.user_calls.load(Ordering::SeqCst), 1);
        assert_eq!(client.tokens().access_token(), None);
        assert_eq!(client.tokens().refresh_token(), None);
    }

    #[tokio::test]
    async fn maps_error_statuses() {
        let router = Router::new()
            .route(
                "/api/v1/missing/",
                get(|| async { AxumStatus::NOT_FOUND }),
            )
            .route(
                "/api/v1/invalid/",
                post(|| async { (AxumStatus::BAD_REQUEST, r#"{"name":["required"]}"#) }),
            );
        let mock = MockBackend::spawn(router).await;
        let (_dir, client) = client_for(&mock);

        let missing: ApiResult<Value> = client.get("missing/").await;
        assert!(matches!(missing, Err(ApiError::NotFound)));

        let invalid: ApiResult<Value> = client.post("invalid/", &json!({})).await;
        let err = invalid.unwrap_err();
        assert!(matches!(err, ApiError::Status { status, .. } if status == StatusCode::BAD_REQUEST));
        assert_eq!(err.message(), r#"{"name":["required"]}"#);
    }
}
