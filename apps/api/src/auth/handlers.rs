use axum::{extract::State, Json};

use crate::auth::middleware::AuthUser;
use crate::auth::service::{self, AuthResponse, LoginRequest, RegisterRequest};
use crate::errors::AppError;
use crate::models::user::{RegisteredUser, UserProfile};
use crate::state::AppState;

/// POST /api/auth/register
pub async fn handle_register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<AuthResponse<RegisteredUser>>, AppError> {
    let response = service::register(state.store.as_ref(), &state.config, req).await?;
    Ok(Json(response))
}

/// POST /api/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse<UserProfile>>, AppError> {
    let response = service::login(state.store.as_ref(), &state.config, req).await?;
    Ok(Json(response))
}

/// GET /api/auth/me
pub async fn handle_me(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<Json<UserProfile>, AppError> {
    let user = state
        .store
        .find_by_id(claims.user.id)
        .await?
        .ok_or(AppError::UserNotFound)?;
    Ok(Json(UserProfile::from(&user)))
}
