//! Basic-auth extractor and role guards for Axum handlers.
//!
//! Authentication is stateless: the credential header is verified against
//! the users table on every request.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::error::AppError;
use crate::model::Role;
use crate::state::AppState;

/// Authenticated user extracted from an `Authorization: Basic` header.
///
/// Use this as an extractor parameter in any handler that requires
/// authentication regardless of role:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id.
    pub user_id: i64,
    /// The user's role.
    pub role: Role,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Unauthorized("Missing required 'Authorization' header".to_string())
            })?;

        let encoded = header.strip_prefix("Basic ").ok_or_else(|| {
            AppError::Unauthorized(
                "Invalid Authorization format. Expected: Basic <credentials>".to_string(),
            )
        })?;

        let decoded = BASE64
            .decode(encoded.trim())
            .ok()
            .and_then(|bytes| String::from_utf8(bytes).ok())
            .ok_or_else(|| AppError::Unauthorized("Invalid basic auth credentials".to_string()))?;

        let (email, password) = decoded
            .split_once(':')
            .ok_or_else(|| AppError::Unauthorized("Invalid basic auth credentials".to_string()))?;

        let user = state.auth.authenticate(email, password).await?;

        Ok(AuthUser { user_id: user.id, role: user.role })
    }
}

/// Requires any authenticated user (any valid role).
///
/// Functionally equivalent to [`AuthUser`] but named explicitly so route
/// signatures document "this endpoint requires authentication".
pub struct RequireAuth(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        Ok(RequireAuth(user))
    }
}

/// Requires the `admin` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<()>> {
///     // user is guaranteed to be an admin here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != Role::Admin {
            tracing::warn!(user_id = user.user_id, role = user.role.as_str(), "admin role required");
            return Err(AppError::Forbidden(
                "access to the requested resource is denied".to_string(),
            ));
        }
        Ok(RequireAdmin(user))
    }
}
