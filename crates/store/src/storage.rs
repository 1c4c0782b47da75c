//! Durable key-value storage for the session subset of the store.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use propconnect_client::PropertyId;
use propconnect_config::StorageConfig;

use crate::state::{NotificationPreferences, Principal, StoreState, UserType};

const PERSISTED_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] io::Error),
    #[error("stored state is not valid json: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Backend for the persisted session blob.
pub trait StateStorage: Send + Sync + fmt::Debug {
    fn load(&self) -> Result<Option<String>, StorageError>;
    fn save(&self, blob: &str) -> Result<(), StorageError>;
    fn clear(&self) -> Result<(), StorageError>;
}

/// One JSON file per storage key.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(directory: impl AsRef<Path>, key: &str) -> Self {
        Self {
            path: directory.as_ref().join(format!("{key}.json")),
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(&config.directory, &config.key)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStorage for FileStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(blob) => Ok(Some(blob)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn save(&self, blob: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, blob)?;
        fs::rename(&staging, &self.path)?;
        debug!(path = %self.path.display(), "session state written");
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    blob: Mutex<Option<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            blob: Mutex::new(Some(blob.into())),
        }
    }

    pub fn snapshot(&self) -> Option<String> {
        self.slot().clone()
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.blob.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl StateStorage for MemoryStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.slot().clone())
    }

    fn save(&self, blob: &str) -> Result<(), StorageError> {
        *self.slot() = Some(blob.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        *self.slot() = None;
        Ok(())
    }
}

/// The subset of store state that survives a restart. Loading flags, error
/// text, dashboard counters and UI state are never written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub principal: Principal,
    #[serde(default)]
    pub user_type: UserType,
    #[serde(default)]
    pub favorites: Vec<PropertyId>,
    #[serde(default)]
    pub preferences: Option<NotificationPreferences>,
}

impl PersistedState {
    pub fn capture(state: &StoreState) -> Self {
        Self {
            version: PERSISTED_VERSION,
            principal: state.auth.principal.clone(),
            user_type: state.auth.user_type(),
            favorites: state.favorites.clone(),
            preferences: state.preferences.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, StorageError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(blob: &str) -> Result<Self, StorageError> {
        Ok(serde_json::from_str(blob)?)
    }

    /// Rebuild a store state. A `user_type` that disagrees with the stored
    /// principal means the blob was tampered with or half-written, so the
    /// whole session is dropped.
    pub fn into_state(self) -> StoreState {
        let mut state = StoreState::default();
        if self.principal.user_type() != self.user_type {
            warn!(
                stored = ?self.user_type,
                principal = ?self.principal.user_type(),
                "persisted session is inconsistent, starting as guest"
            );
            return state;
        }
        if self.principal.is_guest() {
            return state;
        }

        state.auth.principal = self.principal;
        state.favorites = self.favorites;
        state.preferences = self.preferences;
        state
    }
}

/// Read and decode whatever the backend holds. Corrupt blobs are discarded.
pub fn rehydrate(storage: &dyn StateStorage) -> StoreState {
    let blob = match storage.load() {
        Ok(Some(blob)) => blob,
        Ok(None) => return StoreState::default(),
        Err(error) => {
            warn!(error = %error, "unable to read persisted session");
            return StoreState::default();
        }
    };

    match PersistedState::from_json(&blob) {
        Ok(persisted) => persisted.into_state(),
        Err(error) => {
            warn!(error = %error, "discarding unreadable persisted session");
            if let Err(error) = storage.clear() {
                warn!(error = %error, "unable to clear persisted session");
            }
            StoreState::default()
        }
    }
}
