use gymtrack_core::models::{Listing, MuscleGroup};

use crate::http::{ApiClient, ApiResult};

pub async fn list(client: &ApiClient) -> ApiResult<Vec<MuscleGroup>> {
    let listing: Listing<MuscleGroup> = client.get("exercises/muscle-groups/").await?;
    Ok(listing.into_items())
}
