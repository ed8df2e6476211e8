//! Catalog - the authoritative in-memory book collection.
//!
//! Holds books in insertion order behind an `Arc<RwLock>`; clone the handle
//! to share it across pending confirmations. Queries return fresh snapshots
//! and never mutate the store; derived views (genre counts, unique values,
//! average rating) are computed on demand, never cached.

use std::sync::{Arc, RwLock};

use crate::book::{Book, BookId, BookPatch};
use crate::error::CatalogError;

/// Sort key for [`Catalog::sorted_by`]. Numeric keys compare numerically,
/// text keys compare case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Title,
    Author,
    Genre,
    PublishedYear,
    Rating,
}

#[derive(Clone, Default)]
pub struct Catalog {
    books: Arc<RwLock<Vec<Book>>>,
}

impl Catalog {
    pub fn new() -> Self {
        Catalog {
            books: Arc::new(RwLock::new(Vec::new())),
        }
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Vec<Book>>, CatalogError> {
        self.books
            .read()
            .map_err(|_| CatalogError::LockPoisoned("read"))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Vec<Book>>, CatalogError> {
        self.books
            .write()
            .map_err(|_| CatalogError::LockPoisoned("write"))
    }

    /// Append a book. Fails with `DuplicateId` if the id is already present.
    pub fn add(&self, book: Book) -> Result<(), CatalogError> {
        let mut books = self.write()?;
        if books.iter().any(|b| b.id == book.id) {
            return Err(CatalogError::DuplicateId(book.id));
        }
        books.push(book);
        Ok(())
    }

    /// Remove the book with the given id. Removing an absent id is a no-op.
    pub fn remove(&self, id: BookId) -> Result<(), CatalogError> {
        let mut books = self.write()?;
        books.retain(|b| b.id != id);
        Ok(())
    }

    /// Apply a patch to the book with the given id. An absent id is a no-op.
    pub fn update(&self, id: BookId, patch: &BookPatch) -> Result<(), CatalogError> {
        let mut books = self.write()?;
        if let Some(book) = books.iter_mut().find(|b| b.id == id) {
            book.apply_patch(patch);
        }
        Ok(())
    }

    pub fn get(&self, id: BookId) -> Result<Option<Book>, CatalogError> {
        let books = self.read()?;
        Ok(books.iter().find(|b| b.id == id).cloned())
    }

    /// Snapshot of the full collection in insertion order.
    pub fn books(&self) -> Result<Vec<Book>, CatalogError> {
        Ok(self.read()?.clone())
    }

    pub fn len(&self) -> Result<usize, CatalogError> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, CatalogError> {
        Ok(self.read()?.is_empty())
    }

    /// Replace the entire collection. Used by the persistence load path.
    pub fn replace_all(&self, new_books: Vec<Book>) -> Result<(), CatalogError> {
        let mut books = self.write()?;
        *books = new_books;
        Ok(())
    }

    /// Case-insensitive exact match on genre, insertion order preserved.
    pub fn find_by_genre(&self, genre: &str) -> Result<Vec<Book>, CatalogError> {
        let genre = genre.to_lowercase();
        let books = self.read()?;
        Ok(books
            .iter()
            .filter(|b| b.genre.to_lowercase() == genre)
            .cloned()
            .collect())
    }

    /// Case-insensitive substring match over title or author.
    pub fn search(&self, query: &str) -> Result<Vec<Book>, CatalogError> {
        let query = query.to_lowercase();
        let books = self.read()?;
        Ok(books
            .iter()
            .filter(|b| {
                b.title.to_lowercase().contains(&query)
                    || b.author.to_lowercase().contains(&query)
            })
            .cloned()
            .collect())
    }

    /// A sorted snapshot; the store itself is left untouched.
    ///
    /// The sort is stable: books comparing equal keep their insertion order,
    /// and `descending` flips the comparator only, never the tie-break.
    pub fn sorted_by(&self, key: SortKey, descending: bool) -> Result<Vec<Book>, CatalogError> {
        let mut books = self.books()?;
        books.sort_by(|a, b| {
            let ordering = match key {
                SortKey::Title => cmp_text(&a.title, &b.title),
                SortKey::Author => cmp_text(&a.author, &b.author),
                SortKey::Genre => cmp_text(&a.genre, &b.genre),
                SortKey::PublishedYear => a.published_year.cmp(&b.published_year),
                SortKey::Rating => a.rating.total_cmp(&b.rating),
            };
            if descending {
                ordering.reverse()
            } else {
                ordering
            }
        });
        Ok(books)
    }

    /// Mean rating rounded to two decimals; `0.0` for an empty catalog.
    pub fn average_rating(&self) -> Result<f64, CatalogError> {
        let books = self.read()?;
        if books.is_empty() {
            return Ok(0.0);
        }
        let total: f64 = books.iter().map(|b| b.rating).sum();
        Ok((total / books.len() as f64 * 100.0).round() / 100.0)
    }

    /// Distinct authors in first-seen order.
    pub fn unique_authors(&self) -> Result<Vec<String>, CatalogError> {
        let books = self.read()?;
        Ok(unique(books.iter().map(|b| b.author.as_str())))
    }

    /// Distinct genres in first-seen order.
    pub fn unique_genres(&self) -> Result<Vec<String>, CatalogError> {
        let books = self.read()?;
        Ok(unique(books.iter().map(|b| b.genre.as_str())))
    }

    /// Books per genre, computed fresh, genres in first-seen order.
    pub fn genre_counts(&self) -> Result<Vec<(String, usize)>, CatalogError> {
        let books = self.read()?;
        let mut counts: Vec<(String, usize)> = Vec::new();
        for book in books.iter() {
            match counts.iter_mut().find(|(genre, _)| *genre == book.genre) {
                Some((_, count)) => *count += 1,
                None => counts.push((book.genre.clone(), 1)),
            }
        }
        Ok(counts)
    }
}

fn cmp_text(a: &str, b: &str) -> std::cmp::Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

fn unique<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for value in values {
        if !out.iter().any(|v| v == value) {
            out.push(value.to_string());
        }
    }
    out
}

/// One page of an already-filtered or sorted listing. Pages are 1-based;
/// a page past the end yields an empty slice.
pub fn paginate(books: &[Book], page: usize, per_page: usize) -> Vec<Book> {
    if page == 0 || per_page == 0 {
        return Vec::new();
    }
    let start = (page - 1) * per_page;
    books
        .iter()
        .skip(start)
        .take(per_page)
        .cloned()
        .collect()
}

/// Number of pages needed to show `len` items at `per_page` per page.
pub fn page_count(len: usize, per_page: usize) -> usize {
    if per_page == 0 {
        return 0;
    }
    len.div_ceil(per_page)
}
