//! Storage - persistence adapter boundary for the full collection.
//!
//! The catalog persists as one JSON document per named slot, an ordered
//! array of `{id, title, author, genre, publishedYear, rating}` objects.
//! [`InMemoryStorage`] is the HashMap-backed slot store used for testing and
//! development; a browser-storage or file-backed adapter implements the same
//! trait.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use crate::book::Book;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    Storage(String),
    Serde(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Storage(msg) => write!(f, "storage error: {}", msg),
            StorageError::Serde(msg) => write!(f, "serialization error: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

/// Full-collection save/load/clear against a named slot.
///
/// `load` distinguishes "never saved" (`None`) from "saved an empty
/// collection" (`Some(vec![])`).
pub trait CatalogStorage: Send + Sync {
    fn save(&self, books: &[Book]) -> Result<(), StorageError>;
    fn load(&self) -> Result<Option<Vec<Book>>, StorageError>;
    fn clear(&self) -> Result<(), StorageError>;
}

const DEFAULT_SLOT: &str = "books";

/// In-memory slot store backed by a HashMap. Clone-friendly via Arc; two
/// handles with the same slot name see the same bytes.
#[derive(Clone)]
pub struct InMemoryStorage {
    slot: String,
    slots: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::with_slot(DEFAULT_SLOT)
    }

    pub fn with_slot(slot: impl Into<String>) -> Self {
        InMemoryStorage {
            slot: slot.into(),
            slots: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// A handle to a different slot in the same underlying store.
    pub fn slot(&self, slot: impl Into<String>) -> Self {
        InMemoryStorage {
            slot: slot.into(),
            slots: Arc::clone(&self.slots),
        }
    }
}

impl CatalogStorage for InMemoryStorage {
    fn save(&self, books: &[Book]) -> Result<(), StorageError> {
        let bytes =
            serde_json::to_vec(books).map_err(|e| StorageError::Serde(e.to_string()))?;
        let mut slots = self
            .slots
            .write()
            .map_err(|_| StorageError::Storage("lock poisoned".into()))?;
        slots.insert(self.slot.clone(), bytes);
        Ok(())
    }

    fn load(&self) -> Result<Option<Vec<Book>>, StorageError> {
        let slots = self
            .slots
            .read()
            .map_err(|_| StorageError::Storage("lock poisoned".into()))?;
        match slots.get(&self.slot) {
            Some(bytes) => {
                let books: Vec<Book> = serde_json::from_slice(bytes)
                    .map_err(|e| StorageError::Serde(e.to_string()))?;
                Ok(Some(books))
            }
            None => Ok(None),
        }
    }

    fn clear(&self) -> Result<(), StorageError> {
        let mut slots = self
            .slots
            .write()
            .map_err(|_| StorageError::Storage("lock poisoned".into()))?;
        slots.remove(&self.slot);
        Ok(())
    }
}

/// Pretty-printed JSON export of the collection, identical in shape to the
/// persisted format. The caller hands the string to whatever produces the
/// file.
pub fn export_json(books: &[Book]) -> Result<String, StorageError> {
    serde_json::to_string_pretty(books).map_err(|e| StorageError::Serde(e.to_string()))
}
