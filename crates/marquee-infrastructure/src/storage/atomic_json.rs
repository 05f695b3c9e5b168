//! Atomic JSON file operations.
//!
//! Writes go to a sibling temp file, are fsynced and then renamed over the
//! target, so readers only ever observe a complete document. Read-modify-write
//! cycles additionally hold an exclusive `fs2` lock on a sibling `.lock` file,
//! which serializes writers across processes.

use serde::{Serialize, de::DeserializeOwned};
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use marquee_core::MarqueeError;

/// Errors that can occur during atomic JSON operations.
#[derive(Debug)]
pub enum AtomicJsonError {
    /// File I/O error.
    IoError(std::io::Error),
    /// The file exists but is not valid JSON for the expected type.
    JsonError(serde_json::Error),
    /// File locking error.
    LockError(String),
}

impl std::fmt::Display for AtomicJsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AtomicJsonError::IoError(e) => write!(f, "I/O error: {}", e),
            AtomicJsonError::JsonError(e) => write!(f, "JSON error: {}", e),
            AtomicJsonError::LockError(e) => write!(f, "Lock error: {}", e),
        }
    }
}

impl std::error::Error for AtomicJsonError {}

impl From<std::io::Error> for AtomicJsonError {
    fn from(e: std::io::Error) -> Self {
        AtomicJsonError::IoError(e)
    }
}

impl From<serde_json::Error> for AtomicJsonError {
    fn from(e: serde_json::Error) -> Self {
        AtomicJsonError::JsonError(e)
    }
}

impl AtomicJsonError {
    /// Converts into the workspace error, attributing parse failures to `key`.
    pub fn into_marquee(self, key: &str) -> MarqueeError {
        match self {
            AtomicJsonError::IoError(e) => e.into(),
            AtomicJsonError::JsonError(e) => MarqueeError::storage_corrupt(key, e.to_string()),
            AtomicJsonError::LockError(e) => MarqueeError::io(e),
        }
    }
}

/// What a locked update does when the existing file cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnCorrupt {
    /// Return `AtomicJsonError::JsonError`.
    #[default]
    Fail,
    /// Move the unreadable file aside as `<name>.corrupt` and start from the
    /// default value.
    Quarantine,
}

/// A handle to a JSON file that is only ever replaced atomically.
pub struct AtomicJsonFile<T> {
    path: PathBuf,
    on_corrupt: OnCorrupt,
    _phantom: PhantomData<T>,
}

impl<T> AtomicJsonFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            on_corrupt: OnCorrupt::default(),
            _phantom: PhantomData,
        }
    }

    pub fn with_on_corrupt(mut self, on_corrupt: OnCorrupt) -> Self {
        self.on_corrupt = on_corrupt;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and deserializes the file.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(T))`: Successfully loaded and deserialized
    /// - `Ok(None)`: File doesn't exist or is empty
    /// - `Err`: Failed to read or parse the file
    pub fn load(&self) -> Result<Option<T>, AtomicJsonError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;

        if content.trim().is_empty() {
            return Ok(None);
        }

        let data: T = serde_json::from_str(&content)?;
        Ok(Some(data))
    }

    /// Saves data atomically (temp file, fsync, rename).
    pub fn save(&self, data: &T) -> Result<(), AtomicJsonError> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let json_string = serde_json::to_string_pretty(data)?;

        let tmp_path = self.get_temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(json_string.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;

        Ok(())
    }

    /// Performs a read-modify-write cycle under an exclusive file lock.
    ///
    /// `f` receives the current data (or `default_value` if the file is
    /// missing) and returns a value that is passed back to the caller. The
    /// modified data is written only if `f` succeeds.
    pub fn update<F, R>(&self, default_value: T, f: F) -> Result<R, AtomicJsonError>
    where
        F: FnOnce(&mut T) -> Result<R, AtomicJsonError>,
    {
        let _lock = FileLock::acquire(&self.path)?;

        let mut data = match self.load() {
            Ok(loaded) => loaded.unwrap_or(default_value),
            Err(AtomicJsonError::JsonError(e)) if self.on_corrupt == OnCorrupt::Quarantine => {
                let moved_to = self.quarantine()?;
                tracing::warn!(
                    "Unreadable store file {} moved to {}: {}",
                    self.path.display(),
                    moved_to.display(),
                    e
                );
                default_value
            }
            Err(e) => return Err(e),
        };

        let result = f(&mut data)?;
        self.save(&data)?;

        Ok(result)
    }

    /// Renames the current file to `<name>.corrupt`, replacing any earlier
    /// quarantined copy.
    fn quarantine(&self) -> Result<PathBuf, AtomicJsonError> {
        let target = self.sibling(|name| format!("{}.corrupt", name))?;
        fs::rename(&self.path, &target)?;
        Ok(target)
    }

    fn get_temp_path(&self) -> Result<PathBuf, AtomicJsonError> {
        self.sibling(|name| format!(".{}.tmp", name))
    }

    fn sibling(&self, name_for: impl FnOnce(&str) -> String) -> Result<PathBuf, AtomicJsonError> {
        let parent = self.path.parent().ok_or_else(|| {
            AtomicJsonError::IoError(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Path has no parent directory",
            ))
        })?;

        let file_name = self.path.file_name().ok_or_else(|| {
            AtomicJsonError::IoError(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Path has no file name",
            ))
        })?;

        Ok(parent.join(name_for(&file_name.to_string_lossy())))
    }
}

/// An exclusive lock on `<path>.lock`, released when dropped.
struct FileLock {
    file: File,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self, AtomicJsonError> {
        let lock_path = path.with_extension("lock");

        if let Some(parent) = lock_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        fs2::FileExt::lock_exclusive(&file)
            .map_err(|e| AtomicJsonError::LockError(format!("Failed to acquire lock: {}", e)))?;

        Ok(FileLock { file })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // The lock file itself stays; removing it would race with a waiter.
        let _ = fs2::FileExt::unlock(&self.file);
    }
}
