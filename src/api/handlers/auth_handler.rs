//! Authentication handlers: registration, login and cookie session.

use axum::{
    extract::{Extension, State},
    http::StatusCode,
    middleware,
    response::Json,
    routing::{get, post},
    Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{auth_middleware, CurrentUser};
use crate::api::AppState;
use crate::config::ACCESS_TOKEN_COOKIE;
use crate::domain::{AccountResponse, AlumnusProfile, CompanyProfile};
use crate::errors::AppResult;
use crate::services::TokenResponse;
use crate::types::MessageResponse;

/// Alumnus registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterAlumnusRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "rob@mail.com")]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "robpass123", min_length = 8)]
    pub password: String,
    #[validate(length(min = 1, max = 50, message = "First name must be 1-50 characters"))]
    #[schema(example = "Rob")]
    pub first_name: String,
    #[validate(length(min = 1, max = 50, message = "Last name must be 1-50 characters"))]
    #[schema(example = "Singh")]
    pub last_name: String,
    pub phone_number: Option<String>,
}

/// Company registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterCompanyRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "hr@sample.com")]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "samplepass", min_length = 8)]
    pub password: String,
    #[validate(length(min = 1, message = "Company name is required"))]
    #[schema(example = "Sample Company")]
    pub company_name: String,
    #[validate(length(min = 1, message = "Mailing address is required"))]
    #[schema(example = "1 Frederick Street, Port of Spain")]
    pub mailing_address: String,
    pub website_url: Option<String>,
    pub phone_number: Option<String>,
    #[validate(email(message = "Invalid public email format"))]
    pub public_email: Option<String>,
}

/// Login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "rob@mail.com")]
    pub email: String,
    #[schema(example = "robpass123")]
    pub password: String,
}

/// Create authentication routes.
///
/// `/identify` needs a valid token; the other routes are public.
pub fn auth_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/identify", get(identify))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
        .route("/register/alumnus", post(register_alumnus))
        .route("/register/company", post(register_company))
        .route("/login", post(login))
        .route("/logout", post(logout))
}

/// Register a new alumnus
#[utoipa::path(
    post,
    path = "/auth/register/alumnus",
    tag = "Authentication",
    request_body = RegisterAlumnusRequest,
    responses(
        (status = 201, description = "Alumnus registered", body = AccountResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already in use")
    )
)]
pub async fn register_alumnus(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterAlumnusRequest>,
) -> AppResult<(StatusCode, Json<AccountResponse>)> {
    let profile = AlumnusProfile {
        first_name: payload.first_name,
        last_name: payload.last_name,
        phone_number: payload.phone_number,
    };
    let account = state
        .services
        .auth()
        .register_alumnus(payload.email, payload.password, profile)
        .await?;

    Ok((StatusCode::CREATED, Json(AccountResponse::from(account))))
}

/// Register a new company
#[utoipa::path(
    post,
    path = "/auth/register/company",
    tag = "Authentication",
    request_body = RegisterCompanyRequest,
    responses(
        (status = 201, description = "Company registered", body = AccountResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email or company already in use")
    )
)]
pub async fn register_company(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterCompanyRequest>,
) -> AppResult<(StatusCode, Json<AccountResponse>)> {
    let profile = CompanyProfile {
        company_name: payload.company_name,
        mailing_address: payload.mailing_address,
        website_url: payload.website_url,
        phone_number: payload.phone_number,
        public_email: payload.public_email,
    };
    let account = state
        .services
        .auth()
        .register_company(payload.email, payload.password, profile)
        .await?;

    Ok((StatusCode::CREATED, Json(AccountResponse::from(account))))
}

/// Login; the token is returned and also set as an HTTP-only cookie
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<(CookieJar, Json<TokenResponse>)> {
    let token = state
        .services
        .auth()
        .login(payload.email, payload.password)
        .await?;

    let jar = jar.add(access_cookie(token.access_token.clone()));
    Ok((jar, Json(token)))
}

/// Clear the session cookie
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "Authentication",
    responses((status = 200, description = "Logged out", body = MessageResponse))
)]
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<MessageResponse>) {
    let jar = jar.remove(Cookie::build(ACCESS_TOKEN_COOKIE).path("/"));
    (jar, Json(MessageResponse::new("Logged out")))
}

/// The account behind the presented token
#[utoipa::path(
    get,
    path = "/auth/identify",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current account", body = AccountResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn identify(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<AccountResponse>> {
    let account = state.services.accounts().get_account(current_user.id).await?;
    Ok(Json(AccountResponse::from(account)))
}

fn access_cookie(token: String) -> Cookie<'static> {
    Cookie::build((ACCESS_TOKEN_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}
