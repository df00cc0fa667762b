//! Document storage seam and load/save entry points.
//!
//! # Responsibility
//! - Define the raw-text storage contract implemented by file and in-memory
//!   backends.
//! - Load the document with migration and silent recovery before any
//!   repository access.
//!
//! # Invariants
//! - `load_document` never fails: missing, unreadable, or corrupt content
//!   yields a default empty document.
//! - A document upgraded from the legacy format is persisted immediately so
//!   the migration never re-runs.

use std::error::Error;
use std::fmt::{Display, Formatter};

use log::{info, warn};
use serde_json::Value;

use crate::model::Document;

pub mod json_store;
pub mod migrations;

pub use json_store::{JsonFileStore, MemoryStore};

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage-layer error for raw document I/O.
#[derive(Debug)]
pub enum StoreError {
    /// Underlying read or write failed.
    Io(std::io::Error),
    /// The in-memory document could not be serialized.
    Serialize(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "store i/o failed: {err}"),
            Self::Serialize(err) => write!(f, "document serialization failed: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Serialize(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Raw-text storage contract for the single-document store.
///
/// Implementations persist one UTF-8 payload as a whole; there is no partial
/// update surface.
pub trait DocumentStore {
    /// Returns the stored payload, or `None` when nothing has been saved yet.
    fn load_raw(&self) -> StoreResult<Option<String>>;

    /// Replaces the stored payload.
    fn save_raw(&self, payload: &str) -> StoreResult<()>;
}

impl<T: DocumentStore + ?Sized> DocumentStore for &T {
    fn load_raw(&self) -> StoreResult<Option<String>> {
        (**self).load_raw()
    }

    fn save_raw(&self, payload: &str) -> StoreResult<()> {
        (**self).save_raw(payload)
    }
}

/// Loads the document, upgrading legacy content and recovering silently.
///
/// Recovery policy: content that is missing, unreadable, not valid JSON, or
/// not decodable as a current-format document all fall back to a fresh empty
/// document. Only the legacy format is treated specially: it is migrated and
/// the upgraded document is saved back right away.
pub fn load_document<S: DocumentStore>(store: &S) -> Document {
    let raw = match store.load_raw() {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            info!("event=store_load module=store status=ok source=empty");
            return Document::default();
        }
        Err(err) => {
            warn!("event=store_load module=store status=recovered reason=read_failed error={err}");
            return Document::default();
        }
    };

    let value: Value = match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(err) => {
            warn!("event=store_load module=store status=recovered reason=invalid_json error={err}");
            return Document::default();
        }
    };

    if migrations::needs_migration(&value) {
        let document = migrations::migrate_legacy(&value);
        info!(
            "event=store_migrate module=store status=ok periods={}",
            document.periods.len()
        );
        // Persist right away so the upgrade is one-time across restarts. A
        // failed save leaves the migrated document in memory; the next
        // successful save catches up.
        if let Err(err) = save_document(store, &document) {
            warn!("event=store_migrate module=store status=save_failed error={err}");
        }
        return document;
    }

    match serde_json::from_value::<Document>(value) {
        Ok(document) => {
            info!(
                "event=store_load module=store status=ok periods={}",
                document.periods.len()
            );
            document
        }
        Err(err) => {
            warn!("event=store_load module=store status=recovered reason=invalid_shape error={err}");
            Document::default()
        }
    }
}

/// Serializes the document (pretty-printed) and writes it to the store.
pub fn save_document<S: DocumentStore>(store: &S, document: &Document) -> StoreResult<()> {
    let payload = serde_json::to_string_pretty(document).map_err(StoreError::Serialize)?;
    store.save_raw(&payload)
}
