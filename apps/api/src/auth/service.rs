use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::token::create_token;
use crate::config::Config;
use crate::errors::AppError;
use crate::models::user::{NewUser, RegisteredUser, UserProfile};
use crate::store::UserStore;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// `{ token, user }` body shared by register and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse<U> {
    pub token: String,
    pub user: U,
}

/// Creates an account and signs a token for it.
pub async fn register(
    store: &dyn UserStore,
    config: &Config,
    req: RegisterRequest,
) -> Result<AuthResponse<RegisteredUser>, AppError> {
    if store.find_by_email(&req.email).await?.is_some() {
        return Err(AppError::DuplicateEmail);
    }

    let password = req.password;
    let password_hash = run_blocking(move || hash_password(&password)).await?;

    let user = store
        .insert(NewUser {
            username: req.username,
            email: req.email,
            password_hash,
        })
        .await?;
    info!("Registered user {}", user.id);

    let token = create_token(user.id, &config.jwt_secret)?;
    Ok(AuthResponse {
        token,
        user: RegisteredUser::from(&user),
    })
}

/// Checks credentials and signs a token. Unknown email and wrong password
/// both yield `AppError::InvalidCredentials`.
pub async fn login(
    store: &dyn UserStore,
    config: &Config,
    req: LoginRequest,
) -> Result<AuthResponse<UserProfile>, AppError> {
    let user = store
        .find_by_email(&req.email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let password = req.password;
    let stored_hash = user.password_hash.clone();
    let is_match = run_blocking(move || verify_password(&password, &stored_hash)).await?;
    if !is_match {
        return Err(AppError::InvalidCredentials);
    }

    let token = create_token(user.id, &config.jwt_secret)?;
    Ok(AuthResponse {
        token,
        user: UserProfile::from(&user),
    })
}

/// Runs CPU-bound hashing off the async workers.
async fn run_blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let result = tokio::task::spawn_blocking(f)
        .await
        .map_err(anyhow::Error::from)?;
    Ok(result?)
}
