//! Company directory handlers.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::get,
    Router,
};
use uuid::Uuid;

use crate::api::AppState;
use crate::domain::{CompanySummary, JobListing};
use crate::errors::AppResult;

pub fn company_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_companies))
        .route("/:id/listings", get(list_company_listings))
}

/// List every company
#[utoipa::path(
    get,
    path = "/companies",
    tag = "Companies",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Companies", body = Vec<CompanySummary>))
)]
pub async fn list_companies(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<CompanySummary>>> {
    Ok(Json(state.services.accounts().list_companies().await?))
}

/// A company's published listings
#[utoipa::path(
    get,
    path = "/companies/{id}/listings",
    tag = "Companies",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Company account ID")),
    responses((status = 200, description = "Approved listings", body = Vec<JobListing>))
)]
pub async fn list_company_listings(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<JobListing>>> {
    let listings = state
        .services
        .listings()
        .list_approved_for_company(id)
        .await?;
    Ok(Json(listings))
}
