//! Credential Store — persistence seam for user accounts and their roadmap state.
//!
//! `AppState` holds an `Arc<dyn UserStore>`: `PgUserStore` when `DATABASE_URL`
//! is configured, `MemoryUserStore` otherwise (and in tests).

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::{NewUser, RoadmapUpdate, User};
use crate::roadmap::task_id::TaskId;

pub mod memory;
pub mod postgres;

pub use memory::MemoryUserStore;
pub use postgres::PgUserStore;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;

    /// Persists a new user with an empty roadmap, analysis and task set.
    /// Fails with `AppError::DuplicateEmail` when the email is taken.
    async fn insert(&self, new_user: NewUser) -> Result<User, AppError>;

    /// Atomically adds `task_id` to the user's completed set unless present.
    /// Returns the resulting set, or `None` when the user does not exist.
    async fn add_completed_task(
        &self,
        id: Uuid,
        task_id: &TaskId,
    ) -> Result<Option<Vec<String>>, AppError>;

    /// Atomically removes `task_id` from the user's completed set if present.
    /// Returns the resulting set, or `None` when the user does not exist.
    async fn remove_completed_task(
        &self,
        id: Uuid,
        task_id: &TaskId,
    ) -> Result<Option<Vec<String>>, AppError>;

    /// Replaces roadmap and analysis wholesale and clears completed tasks.
    /// `target_role` / `resume_text` are only overwritten when supplied.
    async fn replace_roadmap(
        &self,
        id: Uuid,
        update: RoadmapUpdate,
    ) -> Result<Option<User>, AppError>;
}
