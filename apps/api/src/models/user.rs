use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Gap-analysis document produced by the AI service. Schema-free; keys keep
/// their insertion order.
pub type Analysis = Map<String, Value>;

/// Reads an explicit `null` as the type's default. The generation service
/// emits `null` for fields it could not fill.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One week of a learning roadmap.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoadmapItem {
    #[serde(deserialize_with = "null_as_default")]
    pub week: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tasks: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub resources: Vec<String>,
    /// Legacy per-week flag. Task progress lives in `User::completed_tasks`.
    #[serde(deserialize_with = "null_as_default")]
    pub completed: bool,
}

/// A stored account. Deliberately not `Serialize`: responses go through
/// `RegisteredUser` / `UserProfile` so the password hash never leaves the server.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub resume_text: Option<String>,
    pub target_role: Option<String>,
    pub analysis: Analysis,
    pub roadmap: Vec<RoadmapItem>,
    pub completed_tasks: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields required to create a user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Output of the AI generation step, persisted wholesale.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapUpdate {
    #[serde(default)]
    pub target_role: Option<String>,
    #[serde(default)]
    pub resume_text: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub analysis: Analysis,
    #[serde(default, deserialize_with = "null_as_default")]
    pub roadmap: Vec<RoadmapItem>,
}

/// Snapshot returned from registration.
#[derive(Debug, Clone, Serialize)]
pub struct RegisteredUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub roadmap: Vec<RoadmapItem>,
}

impl From<&User> for RegisteredUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            roadmap: user.roadmap.clone(),
        }
    }
}

/// Snapshot returned from login and the profile endpoints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_role: Option<String>,
    pub roadmap: Vec<RoadmapItem>,
    pub analysis: Analysis,
    pub completed_tasks: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            target_role: user.target_role.clone(),
            roadmap: user.roadmap.clone(),
            analysis: user.analysis.clone(),
            completed_tasks: user.completed_tasks.clone(),
            created_at: user.created_at,
        }
    }
}
