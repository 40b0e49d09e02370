use std::sync::Arc;

use crate::config::Config;
use crate::store::UserStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Credential store. Postgres in production, in-memory without `DATABASE_URL`.
    pub store: Arc<dyn UserStore>,
    pub config: Config,
}

#[cfg(test)]
impl AppState {
    pub fn for_tests() -> Self {
        Self {
            store: Arc::new(crate::store::MemoryUserStore::new()),
            config: Config {
                database_url: None,
                jwt_secret: "test-secret".to_string(),
                port: 0,
                rust_log: "info".to_string(),
            },
        }
    }
}
