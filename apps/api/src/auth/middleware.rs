use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::auth::token::{validate_token, Claims};
use crate::errors::AppError;
use crate::state::AppState;

/// Header the web client sends its token in.
pub const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// Extractor that validates the bearer token and provides the claims.
/// Accepts `x-auth-token: <jwt>` or `Authorization: Bearer <jwt>`.
#[derive(Debug)]
pub struct AuthUser(pub Claims);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = token_from_parts(parts)?;
        validate_token(token, &state.config.jwt_secret)
            .map(AuthUser)
            .map_err(|_| AppError::Unauthorized("Token is not valid"))
    }
}

fn token_from_parts(parts: &Parts) -> Result<&str, AppError> {
    if let Some(value) = parts.headers.get(AUTH_TOKEN_HEADER) {
        return value
            .to_str()
            .map_err(|_| AppError::Unauthorized("Token is not valid"));
    }

    match parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    {
        Some(val) => val
            .strip_prefix("Bearer ")
            .ok_or(AppError::Unauthorized("Invalid authorization header format")),
        None => Err(AppError::Unauthorized("No token, authorization denied")),
    }
}
