//! Session persistence
//!
//! Durable storage for finalized sessions, keyed by an opaque user
//! identity. The store is a collaborator, not part of the tracking core:
//! a failed append or read surfaces as a [`StoreError`] value and leaves
//! in-memory tracking state untouched, confining the damage to durability.

use crate::error::StoreError;
use crate::types::Session;
use crate::{MOTION_VERSION, PRODUCER_NAME};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Persistence interface for finalized sessions
pub trait SessionStore {
    /// Append one finalized session to a user's history
    fn append(&mut self, user_id: &str, session: &Session) -> Result<(), StoreError>;

    /// Full ordered session history for a user (empty for unknown users)
    fn history(&self, user_id: &str) -> Result<Vec<Session>, StoreError>;
}

/// On-disk store document, with producer provenance like every serialized
/// payload this crate emits
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreDocument {
    producer: String,
    version: String,
    users: HashMap<String, Vec<Session>>,
}

impl StoreDocument {
    fn new(users: HashMap<String, Vec<Session>>) -> Self {
        Self {
            producer: PRODUCER_NAME.to_string(),
            version: MOTION_VERSION.to_string(),
            users,
        }
    }
}

/// In-memory store, useful for tests and as a write-through cache
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: HashMap<String, Vec<Session>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize all user data to a JSON document
    pub fn export_json(&self) -> Result<String, StoreError> {
        serde_json::to_string_pretty(&StoreDocument::new(self.users.clone()))
            .map_err(|e| StoreError::InvalidDocument(e.to_string()))
    }

    /// Replace the store contents from a JSON document produced by
    /// [`MemoryStore::export_json`]
    pub fn import_json(&mut self, json: &str) -> Result<(), StoreError> {
        let document: StoreDocument =
            serde_json::from_str(json).map_err(|e| StoreError::InvalidDocument(e.to_string()))?;
        self.users = document.users;
        Ok(())
    }

    /// Drop all stored data
    pub fn clear(&mut self) {
        self.users.clear();
    }
}

impl SessionStore for MemoryStore {
    fn append(&mut self, user_id: &str, session: &Session) -> Result<(), StoreError> {
        self.users
            .entry(user_id.to_string())
            .or_default()
            .push(session.clone());
        Ok(())
    }

    fn history(&self, user_id: &str) -> Result<Vec<Session>, StoreError> {
        Ok(self.users.get(user_id).cloned().unwrap_or_default())
    }
}

/// File-backed store holding one JSON document per store path.
///
/// Reads the whole document on every call; session volumes here are tiny
/// and a single document keeps export/import trivial.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<HashMap<String, Vec<Session>>, StoreError> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let contents = fs::read_to_string(&self.path)?;
        let document: StoreDocument = serde_json::from_str(&contents)
            .map_err(|e| StoreError::InvalidDocument(e.to_string()))?;
        Ok(document.users)
    }

    fn save(&self, users: HashMap<String, Vec<Session>>) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&StoreDocument::new(users))
            .map_err(|e| StoreError::InvalidDocument(e.to_string()))?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl SessionStore for JsonFileStore {
    fn append(&mut self, user_id: &str, session: &Session) -> Result<(), StoreError> {
        let mut users = self.load()?;
        users
            .entry(user_id.to_string())
            .or_default()
            .push(session.clone());
        self.save(users)
    }

    fn history(&self, user_id: &str) -> Result<Vec<Session>, StoreError> {
        Ok(self.load()?.get(user_id).cloned().unwrap_or_default())
    }
}
