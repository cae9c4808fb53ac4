use gymtrack_core::models::{LoggedSet, LoggedSetInput};

use crate::http::{ApiClient, ApiResult};

pub async fn create(client: &ApiClient, input: &LoggedSetInput) -> ApiResult<LoggedSet> {
    client.post("workouts/logged-sets/", input).await
}
