use std::fmt;

use crate::book::BookId;
use crate::gateway::Rejection;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    LockPoisoned(&'static str),
    DuplicateId(BookId),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::LockPoisoned(operation) => {
                write!(f, "catalog lock poisoned during {}", operation)
            }
            CatalogError::DuplicateId(id) => {
                write!(f, "a book with id {} already exists", id)
            }
        }
    }
}

impl std::error::Error for CatalogError {}

/// Outcome of a gated add/update request. A rejection is an expected result,
/// not a programming error; the catalog is untouched either way.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationError {
    Rejected(Rejection),
    Catalog(CatalogError),
}

impl fmt::Display for MutationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MutationError::Rejected(rejection) => write!(f, "{}", rejection),
            MutationError::Catalog(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for MutationError {}

impl From<Rejection> for MutationError {
    fn from(rejection: Rejection) -> Self {
        MutationError::Rejected(rejection)
    }
}

impl From<CatalogError> for MutationError {
    fn from(err: CatalogError) -> Self {
        MutationError::Catalog(err)
    }
}
