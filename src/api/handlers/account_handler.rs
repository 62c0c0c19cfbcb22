//! Account handlers: own profile maintenance and admin account management.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::{UploadForm, UploadedFile, ValidatedJson};
use crate::api::middleware::{require_admin, require_alumnus, require_company, CurrentUser};
use crate::api::AppState;
use crate::domain::{Account, AccountKind, AccountResponse, AlumnusChanges, CompanyChanges};
use crate::errors::AppResult;
use crate::infra::{FileStore, UploadKind};
use crate::services::AccountService;
use crate::types::NoContent;

/// Alumnus profile update; `current_password` must match
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateAlumnusRequest {
    pub current_password: String,
    #[serde(flatten)]
    pub changes: AlumnusChanges,
}

/// Company profile update; `current_password` must match
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCompanyRequest {
    pub current_password: String,
    #[serde(flatten)]
    pub changes: CompanyChanges,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateEmailRequest {
    pub password: String,
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "rob.singh@mail.com")]
    pub new_email: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdatePasswordRequest {
    pub current_password: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAdminRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "admin@mail.com")]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Result of a profile update
/// Multipart body of a photo upload; documentation only, read via [`UploadForm`]
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct PhotoForm {
    #[schema(value_type = String, format = Binary)]
    pub photo: Vec<u8>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileUpdateResponse {
    /// False when the submitted values matched the stored ones
    pub updated: bool,
    pub account: AccountResponse,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AccountFilter {
    /// Restrict to one account kind
    pub kind: Option<AccountKind>,
}

pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_accounts))
        .route("/admins", post(create_admin))
        .route("/me", get(get_current_account))
        .route("/me/alumnus", put(update_alumnus))
        .route("/me/company", put(update_company))
        .route("/me/email", put(update_email))
        .route("/me/password", put(update_password))
        .route("/me/photo", post(upload_photo))
        .route("/:id", get(get_account).delete(delete_account))
}

/// Get the current account
#[utoipa::path(
    get,
    path = "/accounts/me",
    tag = "Accounts",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current account", body = AccountResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_current_account(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<AccountResponse>> {
    let account = state.services.accounts().get_account(current_user.id).await?;
    Ok(Json(AccountResponse::from(account)))
}

/// Update the current alumnus' profile
#[utoipa::path(
    put,
    path = "/accounts/me/alumnus",
    tag = "Accounts",
    security(("bearer_auth" = [])),
    request_body = UpdateAlumnusRequest,
    responses(
        (status = 200, description = "Profile processed", body = ProfileUpdateResponse),
        (status = 401, description = "Wrong password"),
        (status = 403, description = "Not an alumnus"),
        (status = 409, description = "Email already in use")
    )
)]
pub async fn update_alumnus(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<UpdateAlumnusRequest>,
) -> AppResult<Json<ProfileUpdateResponse>> {
    require_alumnus(&current_user)?;

    let accounts = state.services.accounts();
    let updated = accounts
        .update_alumnus_profile(current_user.id, payload.current_password, payload.changes)
        .await?;
    let account = accounts.get_account(current_user.id).await?;

    Ok(Json(ProfileUpdateResponse {
        updated,
        account: account.into(),
    }))
}

/// Update the current company's profile
#[utoipa::path(
    put,
    path = "/accounts/me/company",
    tag = "Accounts",
    security(("bearer_auth" = [])),
    request_body = UpdateCompanyRequest,
    responses(
        (status = 200, description = "Profile processed", body = ProfileUpdateResponse),
        (status = 401, description = "Wrong password"),
        (status = 403, description = "Not a company"),
        (status = 409, description = "Email or company name already in use")
    )
)]
pub async fn update_company(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<UpdateCompanyRequest>,
) -> AppResult<Json<ProfileUpdateResponse>> {
    require_company(&current_user)?;

    let accounts = state.services.accounts();
    let updated = accounts
        .update_company_profile(current_user.id, payload.current_password, payload.changes)
        .await?;
    let account = accounts.get_account(current_user.id).await?;

    Ok(Json(ProfileUpdateResponse {
        updated,
        account: account.into(),
    }))
}

/// Change the login email
#[utoipa::path(
    put,
    path = "/accounts/me/email",
    tag = "Accounts",
    security(("bearer_auth" = [])),
    request_body = UpdateEmailRequest,
    responses(
        (status = 200, description = "Email changed", body = AccountResponse),
        (status = 401, description = "Wrong password"),
        (status = 409, description = "Email already in use")
    )
)]
pub async fn update_email(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<UpdateEmailRequest>,
) -> AppResult<Json<AccountResponse>> {
    let account = state
        .services
        .accounts()
        .update_login_email(current_user.id, payload.password, payload.new_email)
        .await?;
    Ok(Json(AccountResponse::from(account)))
}

/// Change the password
#[utoipa::path(
    put,
    path = "/accounts/me/password",
    tag = "Accounts",
    security(("bearer_auth" = [])),
    request_body = UpdatePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = AccountResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Wrong password")
    )
)]
pub async fn update_password(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<UpdatePasswordRequest>,
) -> AppResult<Json<AccountResponse>> {
    let account = state
        .services
        .accounts()
        .update_password(current_user.id, payload.current_password, payload.new_password)
        .await?;
    Ok(Json(AccountResponse::from(account)))
}

/// Upload a profile photo (multipart field `photo`)
#[utoipa::path(
    post,
    path = "/accounts/me/photo",
    tag = "Accounts",
    security(("bearer_auth" = [])),
    request_body(
        content = PhotoForm,
        content_type = "multipart/form-data",
        description = "Image in field `photo`"
    ),
    responses(
        (status = 200, description = "Photo stored", body = AccountResponse),
        (status = 400, description = "Missing or invalid file")
    )
)]
pub async fn upload_photo(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    mut form: UploadForm,
) -> AppResult<Json<AccountResponse>> {
    let photo = form.file("photo")?;
    let account = replace_photo(
        current_user.id,
        state.services.accounts().as_ref(),
        &state.files,
        photo,
    )
    .await?;
    Ok(Json(AccountResponse::from(account)))
}

/// Store the new photo for an existing account and drop the old file.
async fn replace_photo(
    account_id: Uuid,
    accounts: &dyn AccountService,
    files: &FileStore,
    photo: UploadedFile,
) -> AppResult<Account> {
    let previous = accounts
        .get_account(account_id)
        .await?
        .profile_photo_file_path;

    let path = files
        .save(UploadKind::ProfilePhoto, &photo.file_name, &photo.data)
        .await?;
    let account = match accounts.set_profile_photo(account_id, path.clone()).await {
        Ok(account) => account,
        Err(e) => {
            files.remove(&path).await;
            return Err(e);
        }
    };

    if let Some(previous) = previous {
        files.remove(&previous).await;
    }
    Ok(account)
}

/// List accounts (admin only)
#[utoipa::path(
    get,
    path = "/accounts",
    tag = "Accounts",
    security(("bearer_auth" = [])),
    params(AccountFilter),
    responses(
        (status = 200, description = "Accounts", body = Vec<AccountResponse>),
        (status = 403, description = "Forbidden - Admin only")
    )
)]
pub async fn list_accounts(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Query(filter): Query<AccountFilter>,
) -> AppResult<Json<Vec<AccountResponse>>> {
    require_admin(&current_user)?;
    let accounts = state.services.accounts().list_accounts(filter.kind).await?;
    Ok(Json(accounts.into_iter().map(AccountResponse::from).collect()))
}

/// Get any account (admin only)
#[utoipa::path(
    get,
    path = "/accounts/{id}",
    tag = "Accounts",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Account ID")),
    responses(
        (status = 200, description = "Account", body = AccountResponse),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Account not found")
    )
)]
pub async fn get_account(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<AccountResponse>> {
    require_admin(&current_user)?;
    let account = state.services.accounts().get_account(id).await?;
    Ok(Json(AccountResponse::from(account)))
}

/// Delete an account and everything it owns (admin only, not self)
#[utoipa::path(
    delete,
    path = "/accounts/{id}",
    tag = "Accounts",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Account ID")),
    responses(
        (status = 204, description = "Account deleted"),
        (status = 400, description = "Cannot delete your own account"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Account not found")
    )
)]
pub async fn delete_account(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    require_admin(&current_user)?;
    state
        .services
        .accounts()
        .delete_account(current_user.id, id)
        .await?;
    Ok(NoContent)
}

/// Create another admin (admin only)
#[utoipa::path(
    post,
    path = "/accounts/admins",
    tag = "Accounts",
    security(("bearer_auth" = [])),
    request_body = CreateAdminRequest,
    responses(
        (status = 201, description = "Admin created", body = AccountResponse),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 409, description = "Email already in use")
    )
)]
pub async fn create_admin(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateAdminRequest>,
) -> AppResult<(StatusCode, Json<AccountResponse>)> {
    require_admin(&current_user)?;
    let account = state
        .services
        .auth()
        .register_admin(payload.email, payload.password)
        .await?;
    Ok((StatusCode::CREATED, Json(AccountResponse::from(account))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UPLOAD_SUBDIR_PROFILE_IMAGES;
    use crate::domain::AccountProfile;
    use crate::errors::AppError;
    use crate::services::MockAccountService;
    use axum::body::Bytes;
    use chrono::Utc;

    fn files() -> FileStore {
        FileStore::new(
            std::env::temp_dir().join(format!("ajb-photo-{}", Uuid::new_v4())),
            1024,
        )
    }

    fn photo() -> UploadedFile {
        UploadedFile {
            file_name: "me.png".to_string(),
            data: Bytes::from_static(b"\x89PNG"),
        }
    }

    #[tokio::test]
    async fn test_replace_photo_for_missing_account_writes_nothing() {
        let store = files();
        let mut accounts = MockAccountService::new();
        accounts
            .expect_get_account()
            .returning(|_| Err(AppError::NotFound));
        accounts.expect_set_profile_photo().never();

        let result = replace_photo(Uuid::new_v4(), &accounts, &store, photo()).await;
        assert!(matches!(result, Err(AppError::NotFound)));
        assert!(!store.root().exists());
    }

    #[tokio::test]
    async fn test_replace_photo_stores_new_file() {
        let store = files();
        let admin = |id: Uuid, photo: Option<String>| Account {
            id,
            login_email: "bob@mail.com".to_string(),
            password_hash: "hash".to_string(),
            profile_photo_file_path: photo,
            profile: AccountProfile::Admin,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let mut accounts = MockAccountService::new();
        accounts
            .expect_get_account()
            .returning(move |id| Ok(admin(id, None)));
        accounts
            .expect_set_profile_photo()
            .times(1)
            .returning(move |id, path| Ok(admin(id, Some(path))));

        let account = replace_photo(Uuid::new_v4(), &accounts, &store, photo())
            .await
            .unwrap();
        let path = account.profile_photo_file_path.unwrap();
        assert!(path.starts_with(UPLOAD_SUBDIR_PROFILE_IMAGES));
        assert!(store.root().join(path).exists());
    }
}
