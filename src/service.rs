//! CatalogService - the confirmed write pipeline over a shared catalog.
//!
//! Add and update go through the [`ConfirmationGateway`] first and commit to
//! the catalog only on a confirmed outcome; delete is unconditional and
//! immediate. Status notifications fan out through the embedded
//! `EventEmitter` so a presentation layer can subscribe without polling:
//!
//! - `book_added`: summary of the committed book
//! - `book_updated` / `book_deleted`: the book id
//! - `mutation_rejected`: the rejection reason

use std::sync::Mutex;

use event_emitter_rs::EventEmitter;

use crate::book::{Book, BookId, BookPatch};
use crate::catalog::Catalog;
use crate::error::{CatalogError, MutationError};
use crate::gateway::{ConfirmationGateway, MutationPayload};

pub struct CatalogService<G> {
    catalog: Catalog,
    gateway: G,
    emitter: Mutex<EventEmitter>,
}

impl<G: ConfirmationGateway> CatalogService<G> {
    pub fn new(gateway: G) -> Self {
        Self::with_catalog(Catalog::new(), gateway)
    }

    /// Build over an existing catalog, e.g. one rehydrated from storage.
    pub fn with_catalog(catalog: Catalog, gateway: G) -> Self {
        CatalogService {
            catalog,
            gateway,
            emitter: Mutex::new(EventEmitter::new()),
        }
    }

    /// The query surface. Clone the handle to read while mutations are
    /// pending confirmation.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Subscribe to status notifications.
    pub fn on<F>(&self, event: &str, listener: F)
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        if let Ok(mut emitter) = self.emitter.lock() {
            emitter.on(event, listener);
        }
    }

    /// Gate an add through the confirmation step, committing only on
    /// confirmation. A rejected add leaves the catalog untouched.
    pub async fn add_book(&self, book: Book) -> Result<(), MutationError> {
        let payload = MutationPayload::Add(book.clone());
        if let Err(rejection) = self.gateway.confirm(&payload).await {
            tracing::warn!(reason = %rejection.reason, "add rejected");
            self.notify("mutation_rejected", &rejection.reason);
            return Err(rejection.into());
        }

        let summary = book.summary();
        self.catalog.add(book)?;
        tracing::debug!(%summary, "book added");
        self.notify("book_added", &summary);
        Ok(())
    }

    /// Gate a partial update through the confirmation step. A rejected
    /// update leaves the target book's fields exactly as they were; a
    /// confirmed update against an id that has since vanished is a no-op.
    pub async fn update_book(&self, id: BookId, patch: BookPatch) -> Result<(), MutationError> {
        let payload = MutationPayload::Update {
            id,
            patch: patch.clone(),
        };
        if let Err(rejection) = self.gateway.confirm(&payload).await {
            tracing::warn!(%id, reason = %rejection.reason, "update rejected");
            self.notify("mutation_rejected", &rejection.reason);
            return Err(rejection.into());
        }

        self.catalog.update(id, &patch)?;
        tracing::debug!(%id, "book updated");
        self.notify("book_updated", &id.to_string());
        Ok(())
    }

    /// Delete bypasses the gateway entirely: unconditional and immediate.
    /// Deleting an absent id is a no-op.
    pub fn delete_book(&self, id: BookId) -> Result<(), CatalogError> {
        self.catalog.remove(id)?;
        tracing::debug!(%id, "book deleted");
        self.notify("book_deleted", &id.to_string());
        Ok(())
    }

    fn notify(&self, event: &str, data: &str) {
        if let Ok(mut emitter) = self.emitter.lock() {
            emitter.emit(event, data.to_string());
        }
    }
}
