//! Staff login gate persisted in a key-value string store.

use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use thiserror::Error;
use tracing::{info, warn};

pub const LOGIN_KEY: &str = "isLoggedIn";

pub trait KeyValueStore: Send {
    fn get_string(&self, key: &str) -> Option<String>;
    fn set_string(&mut self, key: &str, value: String) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: HashMap<String, String>,
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get_string(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set_string(&mut self, key: &str, value: String) -> Result<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// JSON object on disk, rewritten on every change so it survives restarts.
#[derive(Debug)]
pub struct FileKeyValueStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileKeyValueStore {
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                warn!(path = %path.display(), error = %err, "ignoring unreadable session file");
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };
        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create session directory '{}'", parent.display())
            })?;
        }
        let raw = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, raw)
            .with_context(|| format!("failed to write session file '{}'", self.path.display()))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get_string(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set_string(&mut self, key: &str, value: String) -> Result<()> {
        self.entries.insert(key.to_string(), value);
        self.persist()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.entries.remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffCredential {
    pub username: String,
    pub password: String,
}

impl Default for StaffCredential {
    fn default() -> Self {
        Self {
            username: "employee@RB".to_string(),
            password: "rb@2025".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("failed to persist session: {0}")]
    Persist(#[from] anyhow::Error),
}

pub struct SessionGate<S: KeyValueStore> {
    store: S,
    credential: StaffCredential,
}

impl<S: KeyValueStore> SessionGate<S> {
    pub fn new(store: S, credential: StaffCredential) -> Self {
        Self { store, credential }
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.get_string(LOGIN_KEY).as_deref() == Some("true")
    }

    pub fn login(&mut self, username: &str, password: &str) -> Result<(), SessionError> {
        if username != self.credential.username || password != self.credential.password {
            warn!(username, "rejected staff login");
            return Err(SessionError::InvalidCredentials);
        }
        self.store.set_string(LOGIN_KEY, "true".to_string())?;
        info!(username, "staff session opened");
        Ok(())
    }

    pub fn logout(&mut self) -> Result<(), SessionError> {
        self.store.remove(LOGIN_KEY)?;
        info!("staff session closed");
        Ok(())
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
