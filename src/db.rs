//! Persistence for the day store.
//!
//! The store never touches the filesystem itself. Callers hold a `Storage`
//! and load/save the whole date-keyed record around each mutation.

use std::cell::RefCell;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use log::debug;

use crate::error::StorageError;
use crate::store::Days;

/// Load/save capability for the complete planner record.
pub trait Storage {
    fn load(&self) -> Result<Days, StorageError>;
    fn save(&self, days: &Days) -> Result<(), StorageError>;
}

/// Pretty-printed JSON file keyed by `YYYY-MM-DD`.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStorage { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl Storage for JsonFileStorage {
    /// A missing file is an empty planner.
    fn load(&self) -> Result<Days, StorageError> {
        if !self.path.exists() {
            debug!("No planner file at {}, starting empty", self.path.display());
            return Ok(Days::new());
        }
        let buf = fs::read_to_string(&self.path).map_err(|e| self.io_err(e))?;
        if buf.trim().is_empty() {
            return Ok(Days::new());
        }
        serde_json::from_str(&buf).map_err(|source| StorageError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Atomic-ish write via temp + rename.
    fn save(&self, days: &Days) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
        }
        let data = serde_json::to_string_pretty(days)?;
        let tmp = self.path.with_extension("json.tmp");
        let mut f = File::create(&tmp).map_err(|e| self.io_err(e))?;
        f.write_all(data.as_bytes()).map_err(|e| self.io_err(e))?;
        f.flush().map_err(|e| self.io_err(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_err(e))?;
        debug!("Saved {} day(s) to {}", days.len(), self.path.display());
        Ok(())
    }
}

/// Keeps the record in memory; for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    days: RefCell<Days>,
}

impl Storage for MemoryStorage {
    fn load(&self) -> Result<Days, StorageError> {
        Ok(self.days.borrow().clone())
    }

    fn save(&self, days: &Days) -> Result<(), StorageError> {
        *self.days.borrow_mut() = days.clone();
        Ok(())
    }
}

/// Copy the planner file into a timestamped file under `backup/` next to it.
pub fn create_backup(db_path: &Path) -> Result<PathBuf, std::io::Error> {
    if !db_path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Planner file does not exist",
        ));
    }

    let parent_dir = db_path.parent().unwrap_or_else(|| Path::new("."));
    let backup_dir = parent_dir.join("backup");
    fs::create_dir_all(&backup_dir)?;

    let timestamp = Local::now().format("%Y-%m-%d_%H-%M-%S");
    let file_name = db_path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("days.json");
    let backup_path = backup_dir.join(format!("{}_{}", timestamp, file_name));
    fs::copy(db_path, &backup_path)?;
    Ok(backup_path)
}
