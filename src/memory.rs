//! In-memory book store.
//!
//! Nothing is persisted: the whole inventory is lost on process exit.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

use crate::book::Book;
use crate::config::StoreConfig;
use crate::error::{BookError, Result};
use crate::store::{BookPatch, BookStore, UpdateFields};
use crate::watch::{BookChange, WatchFilter, WatchSender, WatchStream};

/// In-memory implementation of [`BookStore`].
///
/// Cloning yields another handle onto the same inventory. Readers share the
/// lock; every mutation holds it exclusively from its existence check through
/// its write.
#[derive(Clone)]
pub struct MemoryStore {
    books: Arc<RwLock<HashMap<u64, Book>>>,
    watcher: WatchSender,
}

impl MemoryStore {
    /// Create a new empty store with default configuration.
    pub fn new() -> Self {
        Self::with_config(&StoreConfig::default())
    }

    pub fn with_config(config: &StoreConfig) -> Self {
        info!(watch_capacity = config.watch_capacity, "creating in-memory book store");
        Self {
            books: Arc::new(RwLock::new(HashMap::new())),
            watcher: WatchSender::new(config.watch_capacity),
        }
    }

    /// Get the number of books in the store.
    pub fn len(&self) -> usize {
        self.books.read().len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.books.read().is_empty()
    }

    /// Remove every book.
    pub fn clear(&self) {
        self.books.write().clear();
    }

    /// Sorted snapshot of the occupied identifiers.
    pub fn ids(&self) -> Vec<u64> {
        let mut ids: Vec<u64> = self.books.read().keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookStore for MemoryStore {
    async fn create(&self, id: u64) -> Result<Book> {
        let mut books = self.books.write();
        if let Some(existing) = books.get(&id) {
            debug!(id, "create rejected, id already occupied");
            return Err(BookError::Conflict {
                id,
                current: existing.clone(),
            });
        }

        let book = Book::new();
        books.insert(id, book.clone());
        self.watcher.send(BookChange::created(id, book.clone()));
        debug!(id, "book created");

        Ok(book)
    }

    async fn get(&self, id: u64) -> Result<Book> {
        self.books
            .read()
            .get(&id)
            .cloned()
            .ok_or(BookError::NotFound(id))
    }

    async fn delete(&self, id: u64) -> Result<Book> {
        let mut books = self.books.write();
        let book = books.remove(&id).ok_or(BookError::NotFound(id))?;
        self.watcher.send(BookChange::deleted(id, book.clone()));
        debug!(id, "book deleted");

        Ok(book)
    }

    async fn update(&self, id: u64, fields: &UpdateFields) -> Result<Book> {
        let patch = BookPatch::from_fields(fields).inspect_err(|e| {
            debug!(id, error = %e, "update rejected by validation");
        })?;

        let mut books = self.books.write();
        let book = books.get_mut(&id).ok_or(BookError::NotFound(id))?;

        if patch.status == Some(book.status) {
            debug!(id, status = %book.status, "update rejected, status unchanged");
            return Err(BookError::Conflict {
                id,
                current: book.clone(),
            });
        }

        let old = book.clone();
        patch.apply(book);
        let updated = book.clone();
        if old == updated {
            debug!(id, "update left book unchanged");
        } else {
            self.watcher
                .send(BookChange::updated(id, old, updated.clone()));
            debug!(id, "book updated");
        }

        Ok(updated)
    }

    fn watch(&self, filter: WatchFilter) -> Result<WatchStream> {
        Ok(self.watcher.subscribe(filter))
    }
}
