//! Link management service
//!
//! Orchestrates validation, code generation, and storage calls for the
//! create/read/list/delete operations. The redirect path does not go
//! through here, it talks to storage directly with its own locking
//! requirements.

use thiserror::Error;

use crate::codes;
use crate::links::Link;
use crate::storage;
use crate::storage::CreateLinkValues;
use crate::storage::Storage;

/// Service errors, one variant per caller-visible failure kind
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed URL or code, the caller's fault
    #[error("{0}")]
    Validation(String),

    /// The code is already taken
    #[error("Code already exists")]
    Conflict,

    /// No link with that code
    #[error("Not found")]
    NotFound,

    /// Storage failure, details stay on the server
    #[error("{0}")]
    Internal(String),
}

impl From<storage::Error> for Error {
    fn from(err: storage::Error) -> Self {
        match err {
            storage::Error::Duplicate => Self::Conflict,
            storage::Error::Connection(message) => Self::Internal(message),
        }
    }
}

/// Service for managing links
#[derive(Clone)]
pub struct LinkService<S: Storage> {
    /// Storage backing the link table
    storage: S,
}

impl<S: Storage> LinkService<S> {
    /// Create a new link service
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Create a link
    ///
    /// The URL must be an absolute `http` or `https` URL. When no code is
    /// supplied a random one is generated; a collision on either a supplied
    /// or a generated code surfaces as [`Error::Conflict`], there is no
    /// automatic retry with a fresh code.
    pub async fn create(&self, url: &str, code: Option<&str>) -> Result<Link, Error> {
        if !codes::is_valid_url(url) {
            return Err(Error::Validation(String::from("Invalid or missing URL")));
        }

        let code = match code {
            Some(code) => {
                if !codes::is_valid_code(code) {
                    return Err(Error::Validation(String::from(
                        "Code must be 6 to 8 alphanumeric characters",
                    )));
                }

                code.to_string()
            }
            None => codes::generate(codes::DEFAULT_LENGTH),
        };

        let values = CreateLinkValues { code: &code, url };

        Ok(self.storage.insert(&values).await?)
    }

    /// Read a single link by its code
    ///
    /// Malformed codes are rejected before storage is consulted
    pub async fn read_one(&self, code: &str) -> Result<Link, Error> {
        if !codes::is_valid_code(code) {
            return Err(Error::Validation(String::from("Invalid code format")));
        }

        self.storage
            .find_by_code(code)
            .await?
            .ok_or(Error::NotFound)
    }

    /// List all links, newest first
    pub async fn list_all(&self) -> Result<Vec<Link>, Error> {
        Ok(self.storage.find_all().await?)
    }

    /// Remove a link
    ///
    /// Returns whether a link was actually removed; a malformed code can
    /// not name a link and is reported as not removed, without touching
    /// storage
    pub async fn remove(&self, code: &str) -> Result<bool, Error> {
        if !codes::is_valid_code(code) {
            return Ok(false);
        }

        Ok(self.storage.delete(code).await?)
    }
}
