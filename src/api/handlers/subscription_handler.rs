//! Company subscription handlers.

use axum::{
    extract::{Extension, Path, State},
    response::Json,
    routing::{delete, get},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{require_alumnus, CurrentUser};
use crate::api::AppState;
use crate::domain::{CompanySubscription, SubscribeOutcome};
use crate::errors::AppResult;
use crate::types::NoContent;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SubscribeRequest {
    #[validate(length(min = 1, message = "Select at least one company"))]
    pub company_ids: Vec<Uuid>,
}

pub fn subscription_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_subscriptions).post(subscribe))
        .route("/:company_id", delete(unsubscribe))
}

/// The current alumnus' subscriptions
#[utoipa::path(
    get,
    path = "/subscriptions",
    tag = "Subscriptions",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Subscriptions", body = Vec<CompanySubscription>),
        (status = 403, description = "Forbidden - Alumni only")
    )
)]
pub async fn list_subscriptions(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<CompanySubscription>>> {
    require_alumnus(&current_user)?;
    let subscriptions = state
        .services
        .subscriptions()
        .list_for_alumnus(current_user.id)
        .await?;
    Ok(Json(subscriptions))
}

/// Subscribe to one or more companies
#[utoipa::path(
    post,
    path = "/subscriptions",
    tag = "Subscriptions",
    security(("bearer_auth" = [])),
    request_body = SubscribeRequest,
    responses(
        (status = 200, description = "Newly added and already present subscriptions", body = SubscribeOutcome),
        (status = 404, description = "Unknown company")
    )
)]
pub async fn subscribe(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SubscribeRequest>,
) -> AppResult<Json<SubscribeOutcome>> {
    require_alumnus(&current_user)?;
    let outcome = state
        .services
        .subscriptions()
        .subscribe(current_user.id, payload.company_ids)
        .await?;
    Ok(Json(outcome))
}

/// Unsubscribe from a company
#[utoipa::path(
    delete,
    path = "/subscriptions/{company_id}",
    tag = "Subscriptions",
    security(("bearer_auth" = [])),
    params(("company_id" = Uuid, Path, description = "Company account ID")),
    responses(
        (status = 204, description = "Unsubscribed"),
        (status = 404, description = "Not subscribed")
    )
)]
pub async fn unsubscribe(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
) -> AppResult<NoContent> {
    state
        .services
        .subscriptions()
        .unsubscribe(current_user.id, current_user.id, company_id)
        .await?;
    Ok(NoContent)
}
