use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use fs2::FileExt;
use tracing::debug;

use super::domain::JobApplication;

/// Backing store seam so the store can be exercised without touching disk.
///
/// `load` returns `Ok(None)` when nothing has been saved yet. `save` always receives the full
/// collection and replaces whatever was stored before.
pub trait ApplicationStorage {
    fn load(&self) -> Result<Option<Vec<JobApplication>>, StorageError>;
    fn save(&self, applications: &[JobApplication]) -> Result<(), StorageError>;
    fn describe(&self) -> String;
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("failed to lock {}: {source}", .path.display())]
    Lock { path: PathBuf, source: io::Error },
    #[error("failed to parse {source_name}: {source}")]
    Parse {
        source_name: String,
        source: serde_json::Error,
    },
    #[error("failed to serialize applications: {0}")]
    Serialize(serde_json::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Pretty-printed JSON array on local disk.
///
/// Loads and saves each hold an exclusive lock on a hidden `.{name}.lock` sibling. Saves go to a temp
/// file in the same directory which is then renamed over the target.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `.{file name}.lock` beside the data file, distinct for every data file name.
    pub(crate) fn lock_path(&self) -> PathBuf {
        self.hidden_sibling("lock")
    }

    fn temp_path(&self) -> PathBuf {
        self.hidden_sibling("tmp")
    }

    fn hidden_sibling(&self, suffix: &str) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "applications".to_string());
        self.path.with_file_name(format!(".{file_name}.{suffix}"))
    }

    fn ensure_parent(&self) -> Result<(), StorageError> {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
                fs::create_dir_all(parent).map_err(|source| StorageError::Write {
                    path: parent.to_path_buf(),
                    source,
                })
            }
            _ => Ok(()),
        }
    }

    fn write_temp(&self, temp_path: &Path, contents: &str) -> Result<(), StorageError> {
        let write_error = |source| StorageError::Write {
            path: temp_path.to_path_buf(),
            source,
        };
        let mut file = File::create(temp_path).map_err(write_error)?;
        file.write_all(contents.as_bytes()).map_err(write_error)?;
        file.sync_all().map_err(write_error)
    }
}

impl ApplicationStorage for JsonFileStorage {
    fn load(&self) -> Result<Option<Vec<JobApplication>>, StorageError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let _lock = FileLock::acquire(&self.lock_path())?;
        let contents = fs::read_to_string(&self.path).map_err(|source| StorageError::Read {
            path: self.path.clone(),
            source,
        })?;

        if contents.trim().is_empty() {
            return Ok(None);
        }

        let applications =
            serde_json::from_str(&contents).map_err(|source| StorageError::Parse {
                source_name: self.path.display().to_string(),
                source,
            })?;
        Ok(Some(applications))
    }

    fn save(&self, applications: &[JobApplication]) -> Result<(), StorageError> {
        self.ensure_parent()?;
        let contents =
            serde_json::to_string_pretty(applications).map_err(StorageError::Serialize)?;

        let _lock = FileLock::acquire(&self.lock_path())?;
        let temp_path = self.temp_path();
        if let Err(err) = self.write_temp(&temp_path, &contents) {
            let _ = fs::remove_file(&temp_path);
            return Err(err);
        }

        fs::rename(&temp_path, &self.path).map_err(|source| StorageError::Write {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), count = applications.len(), "applications written");
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Exclusive advisory lock, released when dropped.
struct FileLock {
    file: File,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self, StorageError> {
        let lock_error = |source| StorageError::Lock {
            path: path.to_path_buf(),
            source,
        };
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(lock_error)?;
        file.lock_exclusive().map_err(lock_error)?;
        Ok(Self { file })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

/// Keeps the serialized collection in memory. Used by tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    contents: Mutex<Option<String>>,
    fail_saves: AtomicBool,
    saves: AtomicUsize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with raw text as if it had been read from a file.
    pub fn with_contents(raw: impl Into<String>) -> Self {
        Self {
            contents: Mutex::new(Some(raw.into())),
            ..Self::default()
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.contents
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// Make subsequent saves fail with [`StorageError::Unavailable`].
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::Relaxed);
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::Relaxed)
    }
}

impl ApplicationStorage for MemoryStorage {
    fn load(&self) -> Result<Option<Vec<JobApplication>>, StorageError> {
        let contents = self
            .contents
            .lock()
            .map_err(|_| StorageError::Unavailable("memory storage poisoned".to_string()))?;

        match contents.as_deref() {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => serde_json::from_str(raw)
                .map(Some)
                .map_err(|source| StorageError::Parse {
                    source_name: self.describe(),
                    source,
                }),
        }
    }

    fn save(&self, applications: &[JobApplication]) -> Result<(), StorageError> {
        if self.fail_saves.load(Ordering::Relaxed) {
            return Err(StorageError::Unavailable(
                "memory storage rejecting writes".to_string(),
            ));
        }

        let serialized =
            serde_json::to_string_pretty(applications).map_err(StorageError::Serialize)?;
        let mut contents = self
            .contents
            .lock()
            .map_err(|_| StorageError::Unavailable("memory storage poisoned".to_string()))?;
        *contents = Some(serialized);
        self.saves.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn describe(&self) -> String {
        "in-memory storage".to_string()
    }
}

impl<T: ApplicationStorage + ?Sized> ApplicationStorage for &T {
    fn load(&self) -> Result<Option<Vec<JobApplication>>, StorageError> {
        (**self).load()
    }

    fn save(&self, applications: &[JobApplication]) -> Result<(), StorageError> {
        (**self).save(applications)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
