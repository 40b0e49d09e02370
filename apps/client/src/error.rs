use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response; `msg` is the server's `{ "msg": ... }` body when present.
    #[error("{msg} (status {status})")]
    Api { status: u16, msg: String },

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Not logged in")]
    NotAuthenticated,

    #[error("Please enter both email and password.")]
    MissingCredentials,
}
