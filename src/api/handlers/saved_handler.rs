//! Saved listing handlers.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use uuid::Uuid;

use crate::api::middleware::{require_alumnus, CurrentUser};
use crate::api::AppState;
use crate::domain::SavedJobListing;
use crate::errors::AppResult;
use crate::types::NoContent;

pub fn saved_routes() -> Router<AppState> {
    Router::new().route("/", get(list_saved_ids))
}

/// IDs of the listings the current alumnus saved, newest first
#[utoipa::path(
    get,
    path = "/saved",
    tag = "Saved listings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Saved listing IDs", body = Vec<Uuid>),
        (status = 403, description = "Forbidden - Alumni only")
    )
)]
pub async fn list_saved_ids(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Uuid>>> {
    require_alumnus(&current_user)?;
    let ids = state
        .services
        .saved_listings()
        .saved_listing_ids(current_user.id)
        .await?;
    Ok(Json(ids))
}

/// Save a listing
#[utoipa::path(
    post,
    path = "/listings/{id}/save",
    tag = "Saved listings",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Listing ID")),
    responses(
        (status = 201, description = "Listing saved", body = SavedJobListing),
        (status = 404, description = "Listing not found"),
        (status = 409, description = "Already saved")
    )
)]
pub async fn save_listing(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(listing_id): Path<Uuid>,
) -> AppResult<(StatusCode, Json<SavedJobListing>)> {
    require_alumnus(&current_user)?;
    let saved = state
        .services
        .saved_listings()
        .save(current_user.id, listing_id)
        .await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

/// Remove a saved listing
#[utoipa::path(
    delete,
    path = "/listings/{id}/save",
    tag = "Saved listings",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Listing ID")),
    responses(
        (status = 204, description = "Listing unsaved"),
        (status = 404, description = "Listing was not saved")
    )
)]
pub async fn unsave_listing(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(listing_id): Path<Uuid>,
) -> AppResult<NoContent> {
    state
        .services
        .saved_listings()
        .remove(current_user.id, current_user.id, listing_id)
        .await?;
    Ok(NoContent)
}
