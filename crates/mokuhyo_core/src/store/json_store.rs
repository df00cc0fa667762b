//! Storage backends: one JSON file on disk, and an in-memory cell.
//!
//! # Responsibility
//! - Implement [`DocumentStore`] for the production file path and for tests
//!   and ephemeral sessions.
//!
//! # Invariants
//! - Saves rewrite the whole payload; there are no partial writes.
//! - A missing file is "no payload", not an error.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use super::{DocumentStore, StoreResult};

/// File-backed store holding the whole document in one UTF-8 JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store for the given file path. The file itself is created
    /// on the first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentStore for JsonFileStore {
    fn load_raw(&self) -> StoreResult<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&self.path)?))
    }

    fn save_raw(&self, payload: &str) -> StoreResult<()> {
        fs::write(&self.path, payload)?;
        Ok(())
    }
}

/// In-memory store used by tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    payload: RefCell<Option<String>>,
}

impl MemoryStore {
    /// Creates an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with a payload, as if previously saved.
    pub fn with_payload(payload: impl Into<String>) -> Self {
        Self {
            payload: RefCell::new(Some(payload.into())),
        }
    }

    /// Returns a copy of the stored payload, if any.
    pub fn payload(&self) -> Option<String> {
        self.payload.borrow().clone()
    }
}

impl DocumentStore for MemoryStore {
    fn load_raw(&self) -> StoreResult<Option<String>> {
        Ok(self.payload.borrow().clone())
    }

    fn save_raw(&self, payload: &str) -> StoreResult<()> {
        *self.payload.borrow_mut() = Some(payload.to_string());
        Ok(())
    }
}
