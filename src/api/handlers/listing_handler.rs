//! Job listing handlers: search, company posting and admin moderation.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::{application_handler, saved_handler};
use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{require_admin, require_company, CurrentUser};
use crate::api::AppState;
use crate::domain::{ApprovalStatus, JobListing, ListingSearch, NewJobListing, PositionType};
use crate::errors::{AppError, AppResult};
use crate::types::{ListingPage, NoContent, Paginated, PaginationParams};

/// New listing request (company only)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateListingRequest {
    #[validate(length(min = 1, max = 120, message = "Title must be 1-120 characters"))]
    #[schema(example = "Junior Developer")]
    pub title: String,
    pub position_type: PositionType,
    #[validate(length(min = 1, max = 1000, message = "Description must be 1-1000 characters"))]
    pub description: String,
    #[validate(range(min = 0, message = "Monthly salary cannot be negative"))]
    #[schema(example = 8000)]
    pub monthly_salary_ttd: i32,
    #[serde(default)]
    pub is_remote: bool,
    /// Ignored for remote listings
    #[schema(example = "Port of Spain")]
    pub job_site: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetStatusRequest {
    pub status: ApprovalStatus,
}

pub fn listing_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(search_listings).post(create_listing))
        .route("/all", get(list_all_listings))
        .route("/mine", get(list_my_listings))
        .route("/:id", get(get_listing).delete(delete_listing))
        .route("/:id/status", put(set_status))
        .route("/:id/publish", post(publish))
        .route("/:id/unpublish", post(unpublish))
        .route("/:id/reject", post(reject))
        .route("/:id/request-deletion", post(request_deletion))
        .route("/:id/request-update", post(request_update))
        .route(
            "/:id/applications",
            get(application_handler::list_listing_applications),
        )
        .route("/:id/apply", post(application_handler::apply))
        .route(
            "/:id/save",
            post(saved_handler::save_listing).delete(saved_handler::unsave_listing),
        )
}

/// Search published listings
#[utoipa::path(
    get,
    path = "/listings",
    tag = "Listings",
    security(("bearer_auth" = [])),
    params(ListingSearch, PaginationParams),
    responses(
        (status = 200, description = "Page of approved listings", body = ListingPage),
        (status = 400, description = "Invalid filters")
    )
)]
pub async fn search_listings(
    State(state): State<AppState>,
    Query(filters): Query<ListingSearch>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<ListingPage>> {
    let (listings, total) = state
        .services
        .listings()
        .search(filters, page.clone())
        .await?;

    Ok(Json(Paginated::new(
        listings,
        page.page(),
        page.limit(),
        total,
    )))
}

/// Post a new listing; it waits for admin approval
#[utoipa::path(
    post,
    path = "/listings",
    tag = "Listings",
    security(("bearer_auth" = [])),
    request_body = CreateListingRequest,
    responses(
        (status = 201, description = "Listing created", body = JobListing),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden - Company only")
    )
)]
pub async fn create_listing(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateListingRequest>,
) -> AppResult<(StatusCode, Json<JobListing>)> {
    require_company(&current_user)?;

    let draft = NewJobListing::new(
        current_user.id,
        &payload.title,
        payload.position_type,
        &payload.description,
        payload.monthly_salary_ttd,
        payload.is_remote,
        payload.job_site.as_deref(),
    )?;
    let listing = state.services.listings().create_listing(draft).await?;

    Ok((StatusCode::CREATED, Json(listing)))
}

/// Every listing in any state (admin only)
#[utoipa::path(
    get,
    path = "/listings/all",
    tag = "Listings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All listings", body = Vec<JobListing>),
        (status = 403, description = "Forbidden - Admin only")
    )
)]
pub async fn list_all_listings(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<JobListing>>> {
    require_admin(&current_user)?;
    Ok(Json(state.services.listings().list_all(current_user.id).await?))
}

/// The current company's listings in any state
#[utoipa::path(
    get,
    path = "/listings/mine",
    tag = "Listings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own listings", body = Vec<JobListing>),
        (status = 403, description = "Forbidden - Company only")
    )
)]
pub async fn list_my_listings(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<JobListing>>> {
    require_company(&current_user)?;
    let listings = state
        .services
        .listings()
        .list_for_company(current_user.id)
        .await?;
    Ok(Json(listings))
}

/// Get a listing. Unpublished listings are only visible to their owner and admins.
#[utoipa::path(
    get,
    path = "/listings/{id}",
    tag = "Listings",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Listing ID")),
    responses(
        (status = 200, description = "Listing", body = JobListing),
        (status = 404, description = "Listing not found")
    )
)]
pub async fn get_listing(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<JobListing>> {
    let listing = state.services.listings().get_listing(id).await?;

    let visible = listing.is_approved()
        || current_user.is_admin()
        || listing.is_owned_by(current_user.id);
    if !visible {
        return Err(AppError::NotFound);
    }

    Ok(Json(listing))
}

/// Delete a listing (admin only)
#[utoipa::path(
    delete,
    path = "/listings/{id}",
    tag = "Listings",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Listing ID")),
    responses(
        (status = 204, description = "Listing deleted"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Listing not found")
    )
)]
pub async fn delete_listing(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    state
        .services
        .listings()
        .delete_listing(current_user.id, id)
        .await?;
    Ok(NoContent)
}

/// Overwrite the approval status (admin only)
#[utoipa::path(
    put,
    path = "/listings/{id}/status",
    tag = "Listings",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Listing ID")),
    request_body = SetStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = JobListing),
        (status = 403, description = "Forbidden - Admin only")
    )
)]
pub async fn set_status(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetStatusRequest>,
) -> AppResult<Json<JobListing>> {
    let listing = state
        .services
        .listings()
        .set_approval_status(current_user.id, id, payload.status)
        .await?;
    Ok(Json(listing))
}

/// Approve a listing and notify the company and its subscribers (admin only)
#[utoipa::path(
    post,
    path = "/listings/{id}/publish",
    tag = "Listings",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Listing ID")),
    responses(
        (status = 200, description = "Listing published", body = JobListing),
        (status = 403, description = "Forbidden - Admin only")
    )
)]
pub async fn publish(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<JobListing>> {
    Ok(Json(
        state.services.listings().publish(current_user.id, id).await?,
    ))
}

/// Move a listing back to pending (admin only)
#[utoipa::path(
    post,
    path = "/listings/{id}/unpublish",
    tag = "Listings",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Listing ID")),
    responses(
        (status = 200, description = "Listing unpublished", body = JobListing),
        (status = 403, description = "Forbidden - Admin only")
    )
)]
pub async fn unpublish(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<JobListing>> {
    Ok(Json(
        state.services.listings().unpublish(current_user.id, id).await?,
    ))
}

/// Reject a listing (admin only)
#[utoipa::path(
    post,
    path = "/listings/{id}/reject",
    tag = "Listings",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Listing ID")),
    responses(
        (status = 200, description = "Listing rejected", body = JobListing),
        (status = 403, description = "Forbidden - Admin only")
    )
)]
pub async fn reject(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<JobListing>> {
    Ok(Json(
        state.services.listings().reject(current_user.id, id).await?,
    ))
}

/// Ask the admins to delete one of the company's listings
#[utoipa::path(
    post,
    path = "/listings/{id}/request-deletion",
    tag = "Listings",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Listing ID")),
    responses(
        (status = 200, description = "Deletion requested", body = JobListing),
        (status = 403, description = "Forbidden - Owner only")
    )
)]
pub async fn request_deletion(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<JobListing>> {
    let listing = state
        .services
        .listings()
        .request_deletion(current_user.id, id)
        .await?;
    Ok(Json(listing))
}

/// Ask the admins to allow an update to one of the company's listings
#[utoipa::path(
    post,
    path = "/listings/{id}/request-update",
    tag = "Listings",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Listing ID")),
    responses(
        (status = 200, description = "Update requested", body = JobListing),
        (status = 403, description = "Forbidden - Owner only")
    )
)]
pub async fn request_update(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<JobListing>> {
    let listing = state
        .services
        .listings()
        .request_update(current_user.id, id)
        .await?;
    Ok(Json(listing))
}
