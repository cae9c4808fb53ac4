//! dj-rest-auth endpoints. Successful sign-in stores tokens and the user.

use gymtrack_core::models::{AuthResponse, LoginCredentials, RegisterData, User};
use serde_json::json;
use tracing::{info, warn};

use crate::http::{ApiClient, ApiResult};

pub async fn login(client: &ApiClient, credentials: &LoginCredentials) -> ApiResult<AuthResponse> {
    let response: AuthResponse = client.post("auth/login/", credentials).await?;
    remember(client, &response);
    info!(user = %response.user.username, "signed in");
    Ok(response)
}

pub async fn register(client: &ApiClient, data: &RegisterData) -> ApiResult<AuthResponse> {
    let response: AuthResponse = client.post("auth/registration/", data).await?;
    remember(client, &response);
    info!(user = %response.user.username, "registered");
    Ok(response)
}

fn remember(client: &ApiClient, response: &AuthResponse) {
    let tokens = client.tokens();
    tokens.set_tokens(&response.access, &response.refresh);
    tokens.set_user(&response.user);
}

/// Blacklists the refresh token if possible. Local auth is cleared either way.
pub async fn logout(client: &ApiClient) {
    if let Some(refresh) = client.tokens().refresh_token()
        && let Err(err) = client
            .post_unit("auth/logout/", &json!({ "refresh": refresh }))
            .await
    {
        warn!(error = %err, "logout request failed");
    }
    client.tokens().clear();
    info!("signed out");
}

pub async fn current_user(client: &ApiClient) -> ApiResult<User> {
    let user: User = client.get("auth/user/").await?;
    client.tokens().set_user(&user);
    Ok(user)
}
