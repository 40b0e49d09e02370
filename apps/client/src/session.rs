//! Client Session Store — at most one signed-in session, persisted in a
//! key-value storage under a fixed key and rehydrated on start.

use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::ClientError;
use crate::models::UserProfile;

/// Storage key the session is kept under.
pub const SESSION_KEY: &str = "auth-storage";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user: UserProfile,
    /// `None` for demo sessions opened without the backend.
    pub token: Option<String>,
}

/// Durable string key-value storage.
pub trait SessionStorage: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<String>, ClientError>;
    fn save(&self, key: &str, value: &str) -> Result<(), ClientError>;
    fn remove(&self, key: &str) -> Result<(), ClientError>;
}

/// Stores all keys in one JSON object on disk.
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<platform data dir>/skillpath/session.json`, or `./session.json` as fallback.
    pub fn default_location() -> Self {
        let path = directories::ProjectDirs::from("", "", "skillpath")
            .map(|dirs| dirs.data_dir().join("session.json"))
            .unwrap_or_else(|| PathBuf::from("session.json"));
        Self::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every stored key. A file that does not parse (e.g. cut short by
    /// a crash) is logged and treated as empty so it gets overwritten.
    fn read_all(&self) -> Result<Map<String, Value>, ClientError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };
        if raw.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str(&raw) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                warn!(
                    "Discarding unreadable session file {}: {e}",
                    self.path.display()
                );
                Ok(Map::new())
            }
        }
    }

    /// Writes to a temporary file next to the target and renames it over the
    /// target, so readers never see a half-written file.
    fn write_all(&self, entries: &Map<String, Value>) -> Result<(), ClientError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(serde_json::to_string_pretty(entries)?.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl SessionStorage for FileStorage {
    fn load(&self, key: &str) -> Result<Option<String>, ClientError> {
        Ok(self
            .read_all()?
            .get(key)
            .and_then(|v| v.as_str())
            .map(String::from))
    }

    fn save(&self, key: &str, value: &str) -> Result<(), ClientError> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), Value::String(value.to_string()));
        self.write_all(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), ClientError> {
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

/// Process-local storage; nothing survives a restart.
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl SessionStorage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>, ClientError> {
        Ok(self.lock().get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), ClientError> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), ClientError> {
        self.lock().remove(key);
        Ok(())
    }
}

impl MemoryStorage {
    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned map is still a valid map
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

pub struct SessionStore<S: SessionStorage> {
    storage: S,
    session: Option<Session>,
}

impl<S: SessionStorage> SessionStore<S> {
    /// Opens the store and rehydrates any persisted session. An unreadable
    /// entry is logged and treated as signed out.
    pub fn open(storage: S) -> Self {
        let session = match storage.load(SESSION_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Session>(&raw) {
                Ok(session) => Some(session),
                Err(e) => {
                    warn!("Ignoring unreadable stored session: {e}");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!("Failed to read stored session: {e}");
                None
            }
        };
        debug!("Session store opened (authenticated: {})", session.is_some());
        Self { storage, session }
    }

    /// Replaces the current session wholesale.
    pub fn login(&mut self, user: UserProfile, token: Option<String>) -> Result<(), ClientError> {
        let session = Session { user, token };
        self.storage
            .save(SESSION_KEY, &serde_json::to_string(&session)?)?;
        self.session = Some(session);
        Ok(())
    }

    pub fn logout(&mut self) -> Result<(), ClientError> {
        self.storage.remove(SESSION_KEY)?;
        self.session = None;
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// Gate for protected actions.
    pub fn require_session(&self) -> Result<&Session, ClientError> {
        self.session.as_ref().ok_or(ClientError::NotAuthenticated)
    }

    /// Merges a user-shaped payload (e.g. a generated roadmap) into the cached profile.
    pub fn merge_profile(&mut self, payload: &Map<String, Value>) -> Result<(), ClientError> {
        let current = self.require_session()?;
        let user = current.user.merge(payload)?;
        let token = current.token.clone();
        self.login(user, token)
    }

    pub fn set_completed_tasks(&mut self, tasks: Vec<String>) -> Result<(), ClientError> {
        let current = self.require_session()?;
        let mut user = current.user.clone();
        user.completed_tasks = tasks;
        let token = current.token.clone();
        self.login(user, token)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}
