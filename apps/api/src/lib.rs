pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod roadmap;
pub mod routes;
pub mod state;
pub mod store;

// Re-export commonly used items
pub use db::{create_pool, run_migrations};
pub use store::{MemoryUserStore, PgUserStore, UserStore};
