//! All things related to the storage of links
//!
//! Storage owns the two guarantees the rest of the system builds on: hard
//! uniqueness of `code` and the atomic resolve-and-increment primitive used
//! by the redirect path.

use async_trait::async_trait;
use thiserror::Error;

use crate::links::Link;

pub use memory::Memory;
#[cfg(feature = "postgres")]
pub use postgres::Postgres;

mod memory;
#[cfg(feature = "postgres")]
mod postgres;

/// Setup the storage
#[cfg(not(feature = "postgres"))]
#[allow(clippy::unused_async)]
pub async fn setup() -> Memory {
    Memory::new()
}

/// Setup the storage
#[cfg(feature = "postgres")]
pub async fn setup() -> Postgres {
    Postgres::new().await
}

/// Storage errors
#[derive(Debug, Error)]
pub enum Error {
    /// The code is already taken, surfaced by the uniqueness constraint
    #[error("Code already exists")]
    Duplicate,

    /// A connection or statement error with the storage
    #[error("Connection error: {0}")]
    Connection(String),
}

/// Result type for all storage interactions
pub type Result<T> = core::result::Result<T, Error>;

/// Values to create a Link
pub struct CreateLinkValues<'a> {
    /// The code of the link
    pub code: &'a str,

    /// The URL the link redirects to, stored exactly as supplied
    pub url: &'a str,
}

/// Storage with all supported operations
#[async_trait]
pub trait Storage: Clone + Send + Sync + 'static {
    /// Create a link
    ///
    /// Fails with [`Error::Duplicate`] when the code is already taken, the
    /// fresh row starts with a zero click count and no last-clicked moment
    async fn insert(&self, values: &CreateLinkValues) -> Result<Link>;

    /// Find a single link by its code
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>>;

    /// Find all links
    ///
    /// Ordered by creation date, newest first; a fresh snapshot per call
    async fn find_all(&self) -> Result<Vec<Link>>;

    /// Delete a link
    ///
    /// Returns whether a row was actually removed
    async fn delete(&self, code: &str) -> Result<bool>;

    /// Resolve a code to its URL and count the visit, in one unit of work
    ///
    /// The row is read under an exclusive lock and the click count and
    /// last-clicked moment are updated before the lock is released, so two
    /// concurrent visitors to the same code serialize instead of losing an
    /// increment. Returns `None` when the code does not exist.
    async fn resolve_and_increment(&self, code: &str) -> Result<Option<String>>;
}
