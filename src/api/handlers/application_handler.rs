//! Job application handlers.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, put},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::extractors::UploadForm;
use crate::api::middleware::{require_admin, require_alumnus, require_company, CurrentUser};
use crate::api::AppState;
use crate::domain::{ApplicationStatus, JobApplication};
use crate::errors::AppResult;
use crate::infra::{FileStore, UploadKind};
use crate::services::ApplicationService;
use crate::types::NoContent;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReviewRequest {
    pub status: ApplicationStatus,
}

/// Multipart body of an application; documentation only, read via [`UploadForm`]
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct ApplyForm {
    /// PDF resume
    #[schema(value_type = String, format = Binary)]
    pub resume: Vec<u8>,
    #[schema(example = "Two years of backend work")]
    pub work_experience: Option<String>,
}

/// Multipart body replacing a resume; documentation only
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct ResumeForm {
    #[schema(value_type = String, format = Binary)]
    pub resume: Vec<u8>,
}

pub fn application_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_all_applications))
        .route("/mine", get(list_my_applications))
        .route("/:listing_id/resume", put(update_resume))
        .route("/:listing_id/:alumnus_id/review", put(review))
        .route("/:listing_id/:alumnus_id", delete(delete_application))
}

/// Apply to a listing (multipart: file `resume`, optional text `work_experience`)
#[utoipa::path(
    post,
    path = "/listings/{id}/apply",
    tag = "Applications",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Listing ID")),
    request_body(
        content = ApplyForm,
        content_type = "multipart/form-data",
        description = "Resume and work experience"
    ),
    responses(
        (status = 201, description = "Application submitted", body = JobApplication),
        (status = 400, description = "Listing not open or invalid resume"),
        (status = 403, description = "Forbidden - Alumni only"),
        (status = 409, description = "Already applied")
    )
)]
pub async fn apply(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(listing_id): Path<Uuid>,
    mut form: UploadForm,
) -> AppResult<(StatusCode, Json<JobApplication>)> {
    require_alumnus(&current_user)?;

    let resume = form.file("resume")?;
    let work_experience = form.text("work_experience");
    let path = state
        .files
        .save(UploadKind::Resume, &resume.file_name, &resume.data)
        .await?;

    match state
        .services
        .applications()
        .apply(current_user.id, listing_id, path.clone(), work_experience)
        .await
    {
        Ok(application) => Ok((StatusCode::CREATED, Json(application))),
        Err(e) => {
            state.files.remove(&path).await;
            Err(e)
        }
    }
}

/// Applications to a listing (owning company or admin)
#[utoipa::path(
    get,
    path = "/listings/{id}/applications",
    tag = "Applications",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Listing ID")),
    responses(
        (status = 200, description = "Applications", body = Vec<JobApplication>),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn list_listing_applications(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(listing_id): Path<Uuid>,
) -> AppResult<Json<Vec<JobApplication>>> {
    let applications = state
        .services
        .applications()
        .list_for_listing(current_user.id, listing_id)
        .await?;
    Ok(Json(applications))
}

/// Every application (admin only)
#[utoipa::path(
    get,
    path = "/applications",
    tag = "Applications",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Applications", body = Vec<JobApplication>),
        (status = 403, description = "Forbidden - Admin only")
    )
)]
pub async fn list_all_applications(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<JobApplication>>> {
    require_admin(&current_user)?;
    Ok(Json(
        state.services.applications().list_all(current_user.id).await?,
    ))
}

/// The current alumnus' applications
#[utoipa::path(
    get,
    path = "/applications/mine",
    tag = "Applications",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own applications", body = Vec<JobApplication>),
        (status = 403, description = "Forbidden - Alumni only")
    )
)]
pub async fn list_my_applications(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<JobApplication>>> {
    require_alumnus(&current_user)?;
    let applications = state
        .services
        .applications()
        .list_for_alumnus(current_user.id)
        .await?;
    Ok(Json(applications))
}

/// Replace the resume of an existing application (multipart file `resume`)
#[utoipa::path(
    put,
    path = "/applications/{listing_id}/resume",
    tag = "Applications",
    security(("bearer_auth" = [])),
    params(("listing_id" = Uuid, Path, description = "Listing ID")),
    request_body(
        content = ResumeForm,
        content_type = "multipart/form-data",
        description = "New resume in field `resume`"
    ),
    responses(
        (status = 200, description = "Resume replaced", body = JobApplication),
        (status = 404, description = "Application not found")
    )
)]
pub async fn update_resume(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(listing_id): Path<Uuid>,
    mut form: UploadForm,
) -> AppResult<Json<JobApplication>> {
    require_alumnus(&current_user)?;

    let applications = state.services.applications();
    let previous = applications
        .get_application(current_user.id, listing_id)
        .await?
        .resume_file_path;

    let resume = form.file("resume")?;
    let path = state
        .files
        .save(UploadKind::Resume, &resume.file_name, &resume.data)
        .await?;

    match applications
        .update_resume(current_user.id, listing_id, path.clone())
        .await
    {
        Ok(application) => {
            state.files.remove(&previous).await;
            Ok(Json(application))
        }
        Err(e) => {
            state.files.remove(&path).await;
            Err(e)
        }
    }
}

/// Accept or reject an application (owning company only)
#[utoipa::path(
    put,
    path = "/applications/{listing_id}/{alumnus_id}/review",
    tag = "Applications",
    security(("bearer_auth" = [])),
    params(
        ("listing_id" = Uuid, Path, description = "Listing ID"),
        ("alumnus_id" = Uuid, Path, description = "Applicant ID")
    ),
    request_body = ReviewRequest,
    responses(
        (status = 200, description = "Application reviewed", body = JobApplication),
        (status = 403, description = "Forbidden - Owner only"),
        (status = 404, description = "Application not found")
    )
)]
pub async fn review(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path((listing_id, alumnus_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<ReviewRequest>,
) -> AppResult<Json<JobApplication>> {
    require_company(&current_user)?;
    let application = state
        .services
        .applications()
        .review(current_user.id, alumnus_id, listing_id, payload.status)
        .await?;
    Ok(Json(application))
}

/// Delete an application (admin only)
#[utoipa::path(
    delete,
    path = "/applications/{listing_id}/{alumnus_id}",
    tag = "Applications",
    security(("bearer_auth" = [])),
    params(
        ("listing_id" = Uuid, Path, description = "Listing ID"),
        ("alumnus_id" = Uuid, Path, description = "Applicant ID")
    ),
    responses(
        (status = 204, description = "Application deleted"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Application not found")
    )
)]
pub async fn delete_application(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path((listing_id, alumnus_id)): Path<(Uuid, Uuid)>,
) -> AppResult<NoContent> {
    remove_application(
        &current_user,
        state.services.applications().as_ref(),
        &state.files,
        listing_id,
        alumnus_id,
    )
    .await?;
    Ok(NoContent)
}

/// Admin gate first, then the row, then its resume file.
async fn remove_application(
    current_user: &CurrentUser,
    applications: &dyn ApplicationService,
    files: &FileStore,
    listing_id: Uuid,
    alumnus_id: Uuid,
) -> AppResult<()> {
    require_admin(current_user)?;

    let resume = applications
        .get_application(alumnus_id, listing_id)
        .await?
        .resume_file_path;
    applications
        .delete_application(current_user.id, alumnus_id, listing_id)
        .await?;
    files.remove(&resume).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AccountKind;
    use crate::errors::AppError;
    use crate::services::MockApplicationService;

    fn user(kind: AccountKind) -> CurrentUser {
        CurrentUser {
            id: Uuid::new_v4(),
            email: "someone@mail.com".to_string(),
            kind,
        }
    }

    fn files() -> FileStore {
        FileStore::new(
            std::env::temp_dir().join(format!("ajb-handler-{}", Uuid::new_v4())),
            1024,
        )
    }

    #[tokio::test]
    async fn test_remove_application_checks_admin_before_lookup() {
        let mut applications = MockApplicationService::new();
        applications.expect_get_application().never();
        applications.expect_delete_application().never();

        let result = remove_application(
            &user(AccountKind::Company),
            &applications,
            &files(),
            Uuid::new_v4(),
            Uuid::new_v4(),
        )
        .await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_remove_application_deletes_row_and_resume() {
        let store = files();
        let resume = store
            .save(UploadKind::Resume, "cv.pdf", b"%PDF-1.4")
            .await
            .unwrap();
        let (listing_id, alumnus_id) = (Uuid::new_v4(), Uuid::new_v4());

        let mut applications = MockApplicationService::new();
        let stored = resume.clone();
        applications
            .expect_get_application()
            .times(1)
            .returning(move |alumnus_id, listing_id| {
                JobApplication::new(alumnus_id, listing_id, stored.clone(), None)
            });
        applications
            .expect_delete_application()
            .times(1)
            .returning(|_, _, _| Ok(()));

        remove_application(
            &user(AccountKind::Admin),
            &applications,
            &store,
            listing_id,
            alumnus_id,
        )
        .await
        .unwrap();
        assert!(!store.root().join(&resume).exists());
    }
}
