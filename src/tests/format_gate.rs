//! Malformed codes must be rejected before storage is ever consulted
//!
//! Verified with a counting wrapper around the memory storage

use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use axum::http::StatusCode;

use crate::links::Link;
use crate::storage::CreateLinkValues;
use crate::storage::Memory;
use crate::storage::Result;
use crate::storage::Storage;
use crate::tests::helper;

/// Storage wrapper counting every call that reaches it
#[derive(Clone)]
struct Recording {
    inner: Memory,
    calls: Arc<AtomicUsize>,
}

impl Recording {
    fn new() -> Self {
        Self {
            inner: Memory::new(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Storage for Recording {
    async fn insert(&self, values: &CreateLinkValues) -> Result<Link> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.insert(values).await
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.find_by_code(code).await
    }

    async fn find_all(&self) -> Result<Vec<Link>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.find_all().await
    }

    async fn delete(&self, code: &str) -> Result<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.delete(code).await
    }

    async fn resolve_and_increment(&self, code: &str) -> Result<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.resolve_and_increment(code).await
    }
}

#[tokio::test]
async fn test_single_link_gate() {
    let storage = Recording::new();
    let mut app = helper::setup_test_app_with_storage(storage.clone());

    let (status_code, _, _) = helper::single_link(&mut app, "abc").await;

    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!(0, storage.call_count());
}

#[tokio::test]
async fn test_delete_link_gate() {
    let storage = Recording::new();
    let mut app = helper::setup_test_app_with_storage(storage.clone());

    let (status_code, _) = helper::delete_link(&mut app, "abc").await;

    assert_eq!(StatusCode::NOT_FOUND, status_code);
    assert_eq!(0, storage.call_count());
}

#[tokio::test]
async fn test_visit_gate() {
    let storage = Recording::new();
    let mut app = helper::setup_test_app_with_storage(storage.clone());

    for code in ["abc", "abc123456", "abc!23"] {
        let (status_code, _) = helper::visit(&mut app, code).await;

        assert_eq!(StatusCode::NOT_FOUND, status_code, "code: {code}");
    }

    assert_eq!(0, storage.call_count());
}

#[tokio::test]
async fn test_create_link_gate() {
    let storage = Recording::new();
    let mut app = helper::setup_test_app_with_storage(storage.clone());

    let (status_code, _, _) =
        helper::maybe_create_link(&mut app, Some("not a url"), Some("abc123")).await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);

    let (status_code, _, _) =
        helper::maybe_create_link(&mut app, Some("https://www.example.com/"), Some("abc")).await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);

    assert_eq!(0, storage.call_count());
}
