use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;
use thiserror::Error;

/// Token store failure. The resolver degrades every store failure to the
/// absent-token path; nothing above it ever sees this error during
/// resolution.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("token store io failure: {0}")]
    Io(#[from] io::Error),
}

/// Persisted client store holding the one bearer token.
///
/// Lifecycle: absent at first load; written on successful login; read on
/// every resolution pass; cleared on logout and on invalid-token detection.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<String>, StoreError>;
    fn save(&self, token: &str) -> Result<(), StoreError>;
    fn clear(&self) -> Result<(), StoreError>;
}

/// File-backed token store under the user's data directory.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the platform-default data location.
    pub fn at_default_location() -> anyhow::Result<Self> {
        let dir = dirs::data_dir()
            .context("failed to determine data directory - ensure a home directory is accessible")?;
        Ok(Self::new(dir.join("skillgrid").join("session-token")))
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, token: &str) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, token)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// In-memory token store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct InMemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl InMemoryTokenStore {
    fn guard(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.token.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TokenStore for InMemoryTokenStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        Ok(self.guard().clone())
    }

    fn save(&self, token: &str) -> Result<(), StoreError> {
        *self.guard() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.guard() = None;
        Ok(())
    }
}
