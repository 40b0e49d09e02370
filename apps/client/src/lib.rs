//! SkillPath client: session cache, login flow and HTTP bindings for the
//! auth/roadmap backend and the roadmap-generation service.

pub mod api;
pub mod config;
pub mod error;
pub mod login;
pub mod models;
pub mod session;

pub use api::ApiClient;
pub use config::ClientConfig;
pub use error::ClientError;
pub use session::{FileStorage, SessionStore};
