use tracing::{info, warn};

use crate::api::AuthBackend;
use crate::error::ClientError;
use crate::models::{username_from_email, UserProfile};
use crate::session::{SessionStorage, SessionStore};

/// How a sign-in ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignInOutcome {
    /// The backend accepted the credentials and issued a token.
    Authenticated,
    /// The backend call failed and demo mode opened a local session instead.
    Demo { reason: String },
}

/// Signs in against `backend` and caches the result in `store`.
///
/// With `demo_mode` off, any failure is returned and the session is left
/// untouched. With it on, a failure opens a token-less session for `email`.
pub async fn sign_in<B, S>(
    backend: &B,
    store: &mut SessionStore<S>,
    email: &str,
    password: &str,
    demo_mode: bool,
) -> Result<SignInOutcome, ClientError>
where
    B: AuthBackend + ?Sized,
    S: SessionStorage,
{
    if email.trim().is_empty() || password.is_empty() {
        return Err(ClientError::MissingCredentials);
    }

    match backend.login(email, password).await {
        Ok(response) => {
            let mut user = response.user;
            if user.email.is_empty() {
                user.email = email.to_string();
            }
            if user.username.is_empty() {
                user.username = username_from_email(&user.email);
            }
            store.login(user, Some(response.token))?;
            info!("Signed in as {email}");
            Ok(SignInOutcome::Authenticated)
        }
        Err(e) if demo_mode => {
            warn!("Login failed ({e}); demo mode is on, opening a local session");
            store.login(UserProfile::demo(email), None)?;
            Ok(SignInOutcome::Demo {
                reason: e.to_string(),
            })
        }
        Err(e) => Err(e),
    }
}
