use gymtrack_core::models::{Category, Listing};

use crate::http::{ApiClient, ApiResult};

pub async fn list(client: &ApiClient) -> ApiResult<Vec<Category>> {
    let listing: Listing<Category> = client.get("exercises/categories/").await?;
    Ok(listing.into_items())
}
