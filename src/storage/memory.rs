//! Memory storage
//!
//! Will be destroyed on system shutdown
//!
//! The table is a map guarded by a read-write lock, with every row behind
//! its own mutex. That mirrors the row-lock semantics of the Postgres
//! backend: visitors to the same code serialize on the row mutex, visitors
//! to different codes do not contend.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use tokio::sync::RwLock;

use crate::links::Link;

use super::CreateLinkValues;
use super::Error;
use super::Result;
use super::Storage;

/// A row in the memory table
#[derive(Debug)]
struct Row {
    /// The link itself
    link: Link,

    /// Insertion sequence number, tie breaker for the listing order
    sequence: u64,
}

/// An in-memory storage
///
/// Will be destroyed on system shutdown
#[derive(Clone, Debug)]
pub struct Memory {
    /// All links in storage, keyed by code
    links: Arc<RwLock<HashMap<String, Arc<Mutex<Row>>>>>,

    /// Insertion counter
    sequence: Arc<AtomicU64>,
}

impl Memory {
    /// Create a new empty Memory storage
    pub fn new() -> Self {
        Self {
            links: Arc::new(RwLock::new(HashMap::new())),
            sequence: Arc::new(AtomicU64::new(0)),
        }
    }
}

#[async_trait]
impl Storage for Memory {
    async fn insert(&self, values: &CreateLinkValues) -> Result<Link> {
        let mut links = self.links.write().await;

        if links.contains_key(values.code) {
            return Err(Error::Duplicate);
        }

        let link = Link {
            code: values.code.to_string(),
            url: values.url.to_owned(),
            click_count: 0,
            last_clicked: None,
            created_at: Utc::now(),
        };

        let row = Row {
            link: link.clone(),
            sequence: self.sequence.fetch_add(1, Ordering::Relaxed),
        };

        links.insert(link.code.clone(), Arc::new(Mutex::new(row)));

        Ok(link)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>> {
        let row = self.links.read().await.get(code).cloned();

        match row {
            Some(row) => Ok(Some(row.lock().await.link.clone())),
            None => Ok(None),
        }
    }

    async fn find_all(&self) -> Result<Vec<Link>> {
        let rows = self
            .links
            .read()
            .await
            .values()
            .cloned()
            .collect::<Vec<Arc<Mutex<Row>>>>();

        let mut snapshot = Vec::with_capacity(rows.len());

        for row in rows {
            let row = row.lock().await;

            snapshot.push((row.sequence, row.link.clone()));
        }

        // newest first, equal timestamps keep their insertion order
        snapshot.sort_by(|(left_sequence, left), (right_sequence, right)| {
            right
                .created_at
                .cmp(&left.created_at)
                .then(left_sequence.cmp(right_sequence))
        });

        Ok(snapshot.into_iter().map(|(_, link)| link).collect())
    }

    async fn delete(&self, code: &str) -> Result<bool> {
        Ok(self.links.write().await.remove(code).is_some())
    }

    async fn resolve_and_increment(&self, code: &str) -> Result<Option<String>> {
        // clone the row handle out so the table lock is not held while the
        // row is being updated
        let row = self.links.read().await.get(code).cloned();

        let Some(row) = row else {
            return Ok(None);
        };

        let mut row = row.lock().await;

        row.link.click_count += 1;
        row.link.last_clicked = Some(Utc::now());

        Ok(Some(row.link.url.clone()))
    }
}
