//! Durable client-side key-value storage
//!
//! The session layer persists its snapshot (token, user, role, permissions)
//! across restarts. Each key is presence-checked independently and removed
//! when its value becomes empty. `FileStorage` keeps one file per key under a
//! data directory; `MemoryStorage` backs tests and embedders without disk.

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::debug;

/// Storage key holding the bearer token. The HTTP client presence-checks this
/// key on every request.
pub const TOKEN_KEY: &str = "auth_token";

/// Durable key-value storage for small string values
pub trait Storage: Send + Sync {
    /// Read a value; `None` when the key is absent
    fn get(&self, key: &str) -> io::Result<Option<String>>;

    /// Write a value, replacing any previous one
    fn set(&self, key: &str, value: &str) -> io::Result<()>;

    /// Remove a key; removing an absent key is not an error
    fn remove(&self, key: &str) -> io::Result<()>;
}

/// File-backed storage with one file per key
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Create a storage rooted at `dir`, creating the directory if needed
    pub fn new(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        debug!("File storage initialized at {}", dir.display());
        Ok(FileStorage { dir })
    }

    /// Create a storage under the platform data directory (`<data>/hourbank`)
    pub fn default_location() -> io::Result<Self> {
        let base = dirs::data_dir().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "no platform data directory")
        })?;

        FileStorage::new(base.join("hourbank"))
    }

    fn path_for(&self, key: &str) -> io::Result<PathBuf> {
        // Keys become file names; reject anything that could escape the dir.
        if key.is_empty()
            || key
                .chars()
                .any(|c| c == '/' || c == '\\' || c == '.' || c.is_control())
        {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid storage key: {key:?}"),
            ));
        }

        Ok(self.dir.join(key))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        let path = self.path_for(key)?;

        match std::fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        let path = self.path_for(key)?;
        std::fs::write(path, value)
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        let path = self.path_for(key)?;

        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

/// In-memory storage
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty in-memory storage
    pub fn new() -> Self {
        MemoryStorage::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        self.entries().remove(key);
        Ok(())
    }
}
