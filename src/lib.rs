mod book;
mod catalog;
mod error;
mod gateway;
mod service;
mod storage;

pub use book::{Book, BookId, BookPatch};
pub use catalog::{page_count, paginate, Catalog, SortKey};
pub use error::{CatalogError, MutationError};
pub use gateway::{ConfirmationGateway, MutationPayload, Rejection, SimulatedGateway};
pub use service::CatalogService;
pub use storage::{export_json, CatalogStorage, InMemoryStorage, StorageError};

// Re-export the EventEmitter from the event_emitter_rs crate
pub use event_emitter_rs::EventEmitter;
