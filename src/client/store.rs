//! Durable key/value storage for the session token and profile.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// The two values the store holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    Profile,
    Token,
}

impl StoreKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKey::Profile => "profile",
            StoreKey::Token => "id_token",
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("token store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("token store contents are corrupt: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Storage backend for the session. Only [`Session`](super::Session) writes to it.
pub trait TokenStore: Send {
    fn get(&self, key: StoreKey) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: StoreKey, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: StoreKey) -> Result<(), StoreError>;
}

/// Process-local store, gone when the process exits.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    values: HashMap<StoreKey, String>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: StoreKey) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(&key).cloned())
    }

    fn set(&mut self, key: StoreKey, value: &str) -> Result<(), StoreError> {
        self.values.insert(key, value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: StoreKey) -> Result<(), StoreError> {
        self.values.remove(&key);
        Ok(())
    }
}

/// Store persisted as a small JSON object on disk, so a session survives restarts.
///
/// Every write rewrites the whole file through a temporary sibling and a rename.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    values: HashMap<String, String>,
}

impl FileTokenStore {
    /// Opens the store at `path`, starting empty if the file does not exist yet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let values = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };
        debug!("Opened token store at {}", path.display());
        Ok(FileTokenStore { path, values })
    }

    /// Writes `values` to disk. Callers only adopt them once this succeeds, so
    /// memory never runs ahead of the file.
    fn persist(&self, values: &HashMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(values)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self, key: StoreKey) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key.as_str()).cloned())
    }

    fn set(&mut self, key: StoreKey, value: &str) -> Result<(), StoreError> {
        let mut values = self.values.clone();
        values.insert(key.as_str().to_string(), value.to_string());
        self.persist(&values)?;
        self.values = values;
        Ok(())
    }

    fn remove(&mut self, key: StoreKey) -> Result<(), StoreError> {
        if !self.values.contains_key(key.as_str()) {
            return Ok(());
        }
        let mut values = self.values.clone();
        values.remove(key.as_str());
        self.persist(&values)?;
        self.values = values;
        Ok(())
    }
}
