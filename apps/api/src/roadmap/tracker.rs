use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::{RoadmapUpdate, User};
use crate::roadmap::task_id::TaskId;
use crate::store::UserStore;

/// Marks one checklist item done or pending and returns the full completed set.
///
/// `user_id` is taken raw from the request body; anything that is not a
/// known user id (including malformed ids) is `UserNotFound`. Both directions
/// are idempotent. Indices are not checked against the roadmap.
pub async fn toggle_task(
    store: &dyn UserStore,
    user_id: &str,
    week_index: i64,
    task_index: i64,
    completed: bool,
) -> Result<Vec<String>, AppError> {
    let id = Uuid::parse_str(user_id).map_err(|_| AppError::UserNotFound)?;
    let task_id = TaskId::new(week_index, task_index);

    let updated = if completed {
        store.add_completed_task(id, &task_id).await?
    } else {
        store.remove_completed_task(id, &task_id).await?
    };

    let tasks = updated.ok_or(AppError::UserNotFound)?;
    debug!("Task {task_id} set to completed={completed} for user {id}");
    Ok(tasks)
}

/// Stores a freshly generated roadmap and analysis, replacing the old ones.
/// Completed tasks are cleared because task ids are positional.
pub async fn replace_roadmap(
    store: &dyn UserStore,
    user_id: Uuid,
    update: RoadmapUpdate,
) -> Result<User, AppError> {
    let weeks = update.roadmap.len();
    let user = store
        .replace_roadmap(user_id, update)
        .await?
        .ok_or(AppError::UserNotFound)?;
    info!("Stored {weeks}-week roadmap for user {user_id}");
    Ok(user)
}
