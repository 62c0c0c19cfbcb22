//! JWT authentication middleware.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use uuid::Uuid;

use crate::api::AppState;
use crate::config::{ACCESS_TOKEN_COOKIE, BEARER_TOKEN_PREFIX};
use crate::domain::AccountKind;
use crate::errors::AppError;
use crate::services::Claims;

/// Authenticated account extracted from the JWT
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub kind: AccountKind,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.kind == AccountKind::Admin
    }
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
            kind: claims.kind,
        }
    }
}

/// Token from `Authorization: Bearer ...`, falling back to the access cookie.
fn extract_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
        .map(str::to_string);

    bearer.or_else(|| {
        CookieJar::from_headers(headers)
            .get(ACCESS_TOKEN_COOKIE)
            .map(|cookie| cookie.value().to_string())
    })
}

/// JWT authentication middleware.
///
/// Validates the token and injects the `CurrentUser` into the request
/// extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_token(request.headers()).ok_or(AppError::Unauthorized)?;
    let claims = state.services.auth().verify_token(&token)?;

    request.extensions_mut().insert(CurrentUser::from(claims));

    Ok(next.run(request).await)
}

pub fn require_kind(user: &CurrentUser, kind: AccountKind) -> Result<(), AppError> {
    if user.kind == kind {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// Require admin kind, returns Forbidden error otherwise.
pub fn require_admin(user: &CurrentUser) -> Result<(), AppError> {
    require_kind(user, AccountKind::Admin)
}

pub fn require_alumnus(user: &CurrentUser) -> Result<(), AppError> {
    require_kind(user, AccountKind::Alumnus)
}

pub fn require_company(user: &CurrentUser) -> Result<(), AppError> {
    require_kind(user, AccountKind::Company)
}
