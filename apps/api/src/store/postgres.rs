use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::{Analysis, NewUser, RoadmapItem, RoadmapUpdate, User};
use crate::roadmap::task_id::TaskId;
use crate::store::UserStore;

/// Column list shared by every query that materializes a `User`.
/// `analysis` is a JSON column read back as text to keep its key order.
const USER_COLUMNS: &str = "id, username, email, password_hash, resume_text, target_role, \
     analysis::text AS analysis, roadmap, completed_tasks, created_at";

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    resume_text: Option<String>,
    target_role: Option<String>,
    analysis: String,
    roadmap: Json<Vec<RoadmapItem>>,
    completed_tasks: Vec<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let analysis: Analysis = serde_json::from_str(&row.analysis)
            .with_context(|| format!("Stored analysis for user {} is not an object", row.id))?;
        Ok(User {
            id: row.id,
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            resume_text: row.resume_text,
            target_role: row.target_role,
            analysis,
            roadmap: row.roadmap.0,
            completed_tasks: row.completed_tasks,
            created_at: row.created_at,
        })
    }
}

/// PostgreSQL-backed store. Task-set changes are single `UPDATE ... RETURNING`
/// statements, so they are atomic per row.
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;
        row.map(User::try_from).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        row.map(User::try_from).transpose()
    }

    async fn insert(&self, new_user: NewUser) -> Result<User, AppError> {
        let id = Uuid::new_v4();
        let result: Result<UserRow, sqlx::Error> = sqlx::query_as(&format!(
            "INSERT INTO users (id, username, email, password_hash) \
             VALUES ($1, $2, $3, $4) RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => {
                info!("Inserted user {id}");
                User::try_from(row)
            }
            // Lost the race against a concurrent registration for the same email
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(AppError::DuplicateEmail)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn add_completed_task(
        &self,
        id: Uuid,
        task_id: &TaskId,
    ) -> Result<Option<Vec<String>>, AppError> {
        Ok(sqlx::query_scalar(
            r#"
            UPDATE users
            SET completed_tasks = CASE
                WHEN $2 = ANY(completed_tasks) THEN completed_tasks
                ELSE array_append(completed_tasks, $2)
            END
            WHERE id = $1
            RETURNING completed_tasks
            "#,
        )
        .bind(id)
        .bind(task_id.as_str())
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn remove_completed_task(
        &self,
        id: Uuid,
        task_id: &TaskId,
    ) -> Result<Option<Vec<String>>, AppError> {
        Ok(sqlx::query_scalar(
            r#"
            UPDATE users
            SET completed_tasks = array_remove(completed_tasks, $2)
            WHERE id = $1
            RETURNING completed_tasks
            "#,
        )
        .bind(id)
        .bind(task_id.as_str())
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn replace_roadmap(
        &self,
        id: Uuid,
        update: RoadmapUpdate,
    ) -> Result<Option<User>, AppError> {
        let analysis = serde_json::to_string(&update.analysis)
            .context("Failed to serialize analysis document")?;

        let row: Option<UserRow> = sqlx::query_as(&format!(
            r#"
            UPDATE users
            SET roadmap = $2,
                analysis = $3::text::json,
                target_role = COALESCE($4, target_role),
                resume_text = COALESCE($5, resume_text),
                completed_tasks = '{{}}'
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(Json(&update.roadmap))
        .bind(analysis)
        .bind(update.target_role.as_deref())
        .bind(update.resume_text.as_deref())
        .fetch_optional(&self.pool)
        .await?;

        if row.is_some() {
            info!("Replaced roadmap for user {id}");
        }
        row.map(User::try_from).transpose()
    }
}
