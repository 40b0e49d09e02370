use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::ClientError;

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
    #[serde(deserialize_with = "null_as_default")]
    pub completed: bool,
}

/// Cached copy of the signed-in user's profile.
///
/// Every field defaults so the same type holds a registration snapshot, a
/// login snapshot or a demo session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_role: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub roadmap: Vec<RoadmapItem>,
    #[serde(deserialize_with = "null_as_default")]
    pub analysis: Map<String, Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub completed_tasks: Vec<String>,
}

impl UserProfile {
    /// Profile of a session opened without the backend.
    pub fn demo(email: &str) -> Self {
        Self {
            email: email.to_string(),
            username: username_from_email(email),
            ..Default::default()
        }
    }

    /// Shallow merge: every top-level key in `payload` replaces the cached value.
    pub fn merge(&self, payload: &Map<String, Value>) -> Result<Self, ClientError> {
        let mut merged = match serde_json::to_value(self)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        for (key, value) in payload {
            merged.insert(key.clone(), value.clone());
        }
        Ok(serde_json::from_value(Value::Object(merged))?)
    }

    /// Total number of checklist items across the roadmap.
    pub fn task_count(&self) -> usize {
        self.roadmap.iter().map(|item| item.tasks.len()).sum()
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Positional key the backend uses for one checklist item.
pub fn task_id(week_index: i64, task_index: i64) -> String {
    format!("w{week_index}-t{task_index}")
}

/// The part of an email before `@`, used when no username is known.
pub fn username_from_email(email: &str) -> String {
    email.split('@').next().unwrap_or_default().to_string()
}
