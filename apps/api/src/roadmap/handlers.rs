use axum::{extract::State, Json};
use serde::Deserialize;

use crate::auth::middleware::AuthUser;
use crate::errors::AppError;
use crate::models::user::{RoadmapUpdate, UserProfile};
use crate::roadmap::tracker::{replace_roadmap, toggle_task};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub user_id: String,
    pub week_index: i64,
    pub task_index: i64,
    pub completed: bool,
}

/// PUT /api/auth/update-task
pub async fn handle_update_task(
    State(state): State<AppState>,
    Json(req): Json<UpdateTaskRequest>,
) -> Result<Json<Vec<String>>, AppError> {
    let tasks = toggle_task(
        state.store.as_ref(),
        &req.user_id,
        req.week_index,
        req.task_index,
        req.completed,
    )
    .await?;
    Ok(Json(tasks))
}

/// PUT /api/auth/roadmap
pub async fn handle_replace_roadmap(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(update): Json<RoadmapUpdate>,
) -> Result<Json<UserProfile>, AppError> {
    let user = replace_roadmap(state.store.as_ref(), claims.user.id, update).await?;
    Ok(Json(UserProfile::from(&user)))
}
