use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a [`Book`], assigned at creation and never changed.
///
/// Serializes as a string token, so persisted collections round-trip
/// identity intact. Legacy catalogs carried numeric ids; those deserialize
/// to a freshly minted id with the record's fields unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct BookId(Uuid);

impl<'de> Deserialize<'de> for BookId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Token(Uuid),
            Legacy(f64),
        }
        match Raw::deserialize(deserializer)? {
            Raw::Token(uuid) => Ok(BookId(uuid)),
            Raw::Legacy(_) => Ok(BookId::new()),
        }
    }
}

impl BookId {
    pub fn new() -> Self {
        BookId(Uuid::new_v4())
    }
}

impl Default for BookId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single book record: identity plus descriptive fields.
///
/// Field names serialize in camelCase, matching the persisted and exported
/// JSON shape: `{id, title, author, genre, publishedYear, rating}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub published_year: i32,
    pub rating: f64,
}

impl Book {
    /// Create a book with a fresh unique id.
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        genre: impl Into<String>,
        published_year: i32,
        rating: f64,
    ) -> Self {
        Book {
            id: BookId::new(),
            title: title.into(),
            author: author.into(),
            genre: genre.into(),
            published_year,
            rating,
        }
    }

    /// One-line human-readable summary.
    pub fn summary(&self) -> String {
        format!(
            "{} by {}, Genre: {}, Published: {}",
            self.title, self.author, self.genre, self.published_year
        )
    }

    /// Overwrite exactly the fields present in the patch. The id is not
    /// patchable.
    pub fn apply_patch(&mut self, patch: &BookPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(author) = &patch.author {
            self.author = author.clone();
        }
        if let Some(genre) = &patch.genre {
            self.genre = genre.clone();
        }
        if let Some(published_year) = patch.published_year {
            self.published_year = published_year;
        }
        if let Some(rating) = patch.rating {
            self.rating = rating;
        }
    }
}

/// Partial update for a [`Book`]: every field optional.
///
/// When deserialized from caller-supplied JSON, keys that are not declared
/// book fields have nowhere to land and are dropped, so a patch can never
/// introduce new fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
    pub published_year: Option<i32>,
    pub rating: Option<f64>,
}

impl BookPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    pub fn published_year(mut self, published_year: i32) -> Self {
        self.published_year = Some(published_year);
        self
    }

    pub fn rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    /// True when the patch carries no fields at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.genre.is_none()
            && self.published_year.is_none()
            && self.rating.is_none()
    }
}
