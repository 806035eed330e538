//! Directory-backed key/value store.
//!
//! Each key is one file under the storage root holding the raw string value.
//! Writes go through a temporary file and an atomic rename; read-modify-write
//! cycles hold an exclusive lock per key. Every successful write publishes a
//! [`StorageEvent`] to subscribers.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use academy_core::error::AcademyError;
use academy_core::store::StorageEvent;
use thiserror::Error;
use tokio::sync::broadcast;

const EVENT_CHANNEL_CAPACITY: usize = 64;
const LOCK_DIR: &str = ".locks";

/// Errors raised by [`LocalStorage`].
#[derive(Debug, Error)]
pub enum LocalStorageError {
    /// File I/O error.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Key contains characters that are not allowed in a file name.
    #[error("Invalid storage key: '{0}'")]
    InvalidKey(String),
    /// File locking error.
    #[error("Lock error: {0}")]
    Lock(String),
}

impl From<LocalStorageError> for AcademyError {
    fn from(err: LocalStorageError) -> Self {
        match err {
            LocalStorageError::Io { .. } => AcademyError::io(err.to_string()),
            LocalStorageError::InvalidKey(_) | LocalStorageError::Lock(_) => {
                AcademyError::data_access(err.to_string())
            }
        }
    }
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> LocalStorageError + '_ {
    move |source| LocalStorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// A handle to the key/value store rooted at a directory.
///
/// Cloning is cheap; clones share the same change channels.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
    events: broadcast::Sender<StorageEvent>,
    key_events: Arc<Mutex<HashMap<String, broadcast::Sender<StorageEvent>>>>,
}

impl LocalStorage {
    /// Creates a store rooted at `root`. The directory is created lazily on
    /// first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            root: root.into(),
            events,
            key_events: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Subscribes to every change made through this store or its clones.
    pub fn subscribe(&self) -> broadcast::Receiver<StorageEvent> {
        self.events.subscribe()
    }

    /// Subscribes to changes of `key` only.
    pub fn subscribe_key(&self, key: &str) -> broadcast::Receiver<StorageEvent> {
        let mut channels = self.key_events.lock().unwrap_or_else(PoisonError::into_inner);
        channels
            .entry(key.to_string())
            .or_insert_with(|| broadcast::channel(EVENT_CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// Reads the value stored under `key`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(String))`: The stored value
    /// - `Ok(None)`: Nothing is stored under `key`
    /// - `Err`: The key is invalid or the file could not be read
    pub fn get_item(&self, key: &str) -> Result<Option<String>, LocalStorageError> {
        let path = self.value_path(key)?;
        read_optional(&path)
    }

    /// Stores `value` under `key`, replacing any previous value.
    pub fn set_item(&self, key: &str, value: &str) -> Result<(), LocalStorageError> {
        let path = self.value_path(key)?;
        {
            let _lock = self.acquire_lock(key)?;
            write_atomic(&path, value)?;
        }
        self.publish(StorageEvent::set(key));
        Ok(())
    }

    /// Removes `key`.
    ///
    /// Returns `false` when nothing was stored.
    pub fn remove_item(&self, key: &str) -> Result<bool, LocalStorageError> {
        let path = self.value_path(key)?;
        let removed = {
            let _lock = self.acquire_lock(key)?;
            match fs::remove_file(&path) {
                Ok(()) => true,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
                Err(e) => return Err(io_err(&path)(e)),
            }
        };
        if removed {
            self.publish(StorageEvent::removed(key));
        }
        Ok(removed)
    }

    /// Performs a locked read-modify-write of `key`.
    ///
    /// `f` receives the current value and returns the value to write (or
    /// `None` to leave the key untouched) together with a result passed back
    /// to the caller. Nothing is written when `f` fails.
    pub fn update_item<R, E, F>(&self, key: &str, f: F) -> Result<R, E>
    where
        F: FnOnce(Option<String>) -> Result<(Option<String>, R), E>,
        E: From<LocalStorageError>,
    {
        let path = self.value_path(key)?;
        let (write, result) = {
            let _lock = self.acquire_lock(key)?;
            let current = read_optional(&path)?;
            let (next, result) = f(current)?;
            let write = next.is_some();
            if let Some(next) = next {
                write_atomic(&path, &next)?;
            }
            (write, result)
        };
        if write {
            self.publish(StorageEvent::set(key));
        }
        Ok(result)
    }

    /// Lists the keys currently stored, sorted.
    pub fn keys(&self) -> Result<Vec<String>, LocalStorageError> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_err(&self.root)(e)),
        };

        let mut keys = Vec::new();
        for entry in entries {
            let entry = entry.map_err(io_err(&self.root))?;
            let is_file = entry
                .file_type()
                .map(|t| t.is_file())
                .map_err(io_err(&self.root))?;
            let name = entry.file_name().to_string_lossy().to_string();
            if is_file && is_valid_key(&name) {
                keys.push(name);
            }
        }
        keys.sort();
        Ok(keys)
    }

    fn value_path(&self, key: &str) -> Result<PathBuf, LocalStorageError> {
        if !is_valid_key(key) {
            return Err(LocalStorageError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(key))
    }

    fn acquire_lock(&self, key: &str) -> Result<FileLock, LocalStorageError> {
        FileLock::acquire(&self.root.join(LOCK_DIR).join(format!("{}.lock", key)))
    }

    fn publish(&self, event: StorageEvent) {
        // No receivers is not an error.
        {
            let channels = self.key_events.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(sender) = channels.get(&event.key) {
                let _ = sender.send(event.clone());
            }
        }
        let _ = self.events.send(event);
    }
}

fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn read_optional(path: &Path) -> Result<Option<String>, LocalStorageError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(io_err(path)(e)),
    }
}

fn write_atomic(path: &Path, value: &str) -> Result<(), LocalStorageError> {
    let parent = path.parent().ok_or_else(|| LocalStorageError::Io {
        path: path.to_path_buf(),
        source: std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "Path has no parent directory",
        ),
    })?;
    fs::create_dir_all(parent).map_err(io_err(parent))?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let tmp_path = parent.join(format!(".{}.tmp", file_name));

    let mut tmp_file = File::create(&tmp_path).map_err(io_err(&tmp_path))?;
    tmp_file
        .write_all(value.as_bytes())
        .map_err(io_err(&tmp_path))?;
    tmp_file.sync_all().map_err(io_err(&tmp_path))?;
    drop(tmp_file);

    fs::rename(&tmp_path, path).map_err(io_err(path))?;
    Ok(())
}

/// Exclusive lock guard; released when dropped.
struct FileLock {
    file: File,
}

impl FileLock {
    fn acquire(lock_path: &Path) -> Result<Self, LocalStorageError> {
        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent).map_err(io_err(parent))?;
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(lock_path)
            .map_err(io_err(lock_path))?;

        fs2::FileExt::lock_exclusive(&file)
            .map_err(|e| LocalStorageError::Lock(format!("Failed to acquire lock: {}", e)))?;

        Ok(FileLock { file })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = fs2::FileExt::unlock(&self.file);
    }
}
