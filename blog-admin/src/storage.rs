use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Key under which the bearer token is persisted.
pub const TOKEN_KEY: &str = "token";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Token storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Token storage is corrupted: {0}")]
    Format(#[from] serde_json::Error),
    #[error("No configuration directory available on this platform")]
    NoConfigDir,
}

/// Holds the single auth token: written at login, read at every protected
/// navigation, cleared at logout.
pub trait TokenStore: Send + Sync {
    /// Stored token, if any. Empty strings count as absent.
    fn token(&self) -> Option<String>;
    fn set_token(&self, token: &str) -> Result<(), StorageError>;
    fn clear(&self) -> Result<(), StorageError>;
}

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn token(&self) -> Option<String> {
        self.token
            .lock()
            .ok()
            .and_then(|slot| slot.clone())
            .filter(|token| !token.is_empty())
    }

    fn set_token(&self, token: &str) -> Result<(), StorageError> {
        if let Ok(mut slot) = self.token.lock() {
            *slot = Some(token.to_string());
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        if let Ok(mut slot) = self.token.lock() {
            *slot = None;
        }
        Ok(())
    }
}

/// JSON key/value file, `{"token": "..."}`, in the user's config directory.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/blog-admin/session.json`
    pub fn default_location() -> Result<Self, StorageError> {
        let dir = dirs::config_dir().ok_or(StorageError::NoConfigDir)?;
        Ok(Self::new(dir.join("blog-admin").join("session.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<HashMap<String, String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, entries: &HashMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(entries)?)?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn token(&self) -> Option<String> {
        match self.load() {
            Ok(mut entries) => entries.remove(TOKEN_KEY).filter(|token| !token.is_empty()),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "Ignoring unreadable token store: {e}");
                None
            }
        }
    }

    fn set_token(&self, token: &str) -> Result<(), StorageError> {
        // Unreadable content is replaced rather than blocking login
        let mut entries = self.load().unwrap_or_default();
        entries.insert(TOKEN_KEY.to_string(), token.to_string());
        self.save(&entries)
    }

    fn clear(&self) -> Result<(), StorageError> {
        let mut entries = self.load().unwrap_or_default();
        if entries.remove(TOKEN_KEY).is_none() && !self.path.exists() {
            return Ok(());
        }
        self.save(&entries)
    }
}
