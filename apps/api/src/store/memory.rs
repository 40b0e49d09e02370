use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::{Analysis, NewUser, RoadmapUpdate, User};
use crate::roadmap::task_id::TaskId;
use crate::store::UserStore;

/// Process-local store. Every mutation happens under the write lock, so
/// concurrent toggles on one user cannot drop each other's updates.
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<Uuid, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn insert(&self, new_user: NewUser) -> Result<User, AppError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == new_user.email) {
            return Err(AppError::DuplicateEmail);
        }

        let user = User {
            id: Uuid::new_v4(),
            username: new_user.username,
            email: new_user.email,
            password_hash: new_user.password_hash,
            resume_text: None,
            target_role: None,
            analysis: Analysis::new(),
            roadmap: Vec::new(),
            completed_tasks: Vec::new(),
            created_at: Utc::now(),
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn add_completed_task(
        &self,
        id: Uuid,
        task_id: &TaskId,
    ) -> Result<Option<Vec<String>>, AppError> {
        let mut users = self.users.write().await;
        let Some(user) = users.get_mut(&id) else {
            return Ok(None);
        };
        if !user.completed_tasks.iter().any(|t| t == task_id.as_str()) {
            user.completed_tasks.push(task_id.to_string());
        }
        Ok(Some(user.completed_tasks.clone()))
    }

    async fn remove_completed_task(
        &self,
        id: Uuid,
        task_id: &TaskId,
    ) -> Result<Option<Vec<String>>, AppError> {
        let mut users = self.users.write().await;
        let Some(user) = users.get_mut(&id) else {
            return Ok(None);
        };
        user.completed_tasks.retain(|t| t != task_id.as_str());
        Ok(Some(user.completed_tasks.clone()))
    }

    async fn replace_roadmap(
        &self,
        id: Uuid,
        update: RoadmapUpdate,
    ) -> Result<Option<User>, AppError> {
        let mut users = self.users.write().await;
        let Some(user) = users.get_mut(&id) else {
            return Ok(None);
        };
        user.roadmap = update.roadmap;
        user.analysis = update.analysis;
        if update.target_role.is_some() {
            user.target_role = update.target_role;
        }
        if update.resume_text.is_some() {
            user.resume_text = update.resume_text;
        }
        user.completed_tasks.clear();
        Ok(Some(user.clone()))
    }
}
