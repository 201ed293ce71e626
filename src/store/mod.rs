//! Durable storage for translation records.
//!
//! `RecordStore` is the seam between the service and whatever keeps the
//! records. Two implementations ship with the crate:
//!
//! - `PgRecordStore`: PostgreSQL via `sqlx`, used in production
//! - `MemoryRecordStore`: a process-local map, used for local runs without a
//!   database and in tests
//!
//! Listing is keyset-paginated over ascending ids with a fixed page size.

mod memory;
mod postgres;

pub use memory::MemoryRecordStore;
pub use postgres::PgRecordStore;

use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Number of records returned per listing page.
pub const PAGE_SIZE: usize = 5;

/// A persisted translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslationRecord {
    pub id: i64,
    pub text: String,
    pub source: String,
    pub target: String,
    pub translated: String,
}

/// A translation that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTranslation {
    pub text: String,
    pub source: String,
    pub target: String,
    pub translated: String,
}

impl NewTranslation {
    fn into_record(self, id: i64) -> TranslationRecord {
        TranslationRecord {
            id,
            text: self.text,
            source: self.source,
            target: self.target,
            translated: self.translated,
        }
    }
}

/// Opaque continuation token for a listing.
///
/// Callers only ever hand back a token they received in `Page::next_cursor`.
/// The encoding is URL-safe and private to the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cursor(String);

impl Cursor {
    /// Wrap a token received from a client.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Cursor that resumes after the record with id `id`.
    fn after(id: i64) -> Self {
        Self(URL_SAFE_NO_PAD.encode(id.to_string()))
    }

    /// Id of the last record the previous page returned.
    fn last_id(&self) -> Result<i64, StoreError> {
        let invalid = || StoreError::InvalidCursor(self.0.clone());

        let bytes = URL_SAFE_NO_PAD.decode(&self.0).map_err(|_| invalid())?;
        let digits = String::from_utf8(bytes).map_err(|_| invalid())?;
        digits.parse().map_err(|_| invalid())
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub items: Vec<TranslationRecord>,
    /// Present iff more records follow this page.
    pub next_cursor: Option<Cursor>,
}

impl Page {
    /// Build a page from up to `PAGE_SIZE + 1` rows in ascending id order.
    ///
    /// The extra row only signals that another page exists; it is dropped.
    fn from_rows(mut rows: Vec<TranslationRecord>) -> Self {
        let has_more = rows.len() > PAGE_SIZE;
        rows.truncate(PAGE_SIZE);

        let next_cursor = match rows.last() {
            Some(last) if has_more => Some(Cursor::after(last.id)),
            _ => None,
        };

        Self {
            items: rows,
            next_cursor,
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid pagination cursor: {0}")]
    InvalidCursor(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// A durable, keyed collection of translation records.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Persist a new record and return its generated id.
    ///
    /// Returns only once the record is durably stored.
    async fn create(&self, new: NewTranslation) -> Result<i64, StoreError>;

    /// Look up a record by id.
    async fn get_by_id(&self, id: i64) -> Result<Option<TranslationRecord>, StoreError>;

    /// List up to `PAGE_SIZE` records, starting after `cursor` when given.
    async fn list(&self, cursor: Option<&Cursor>) -> Result<Page, StoreError>;
}
