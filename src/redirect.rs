//! The visitor path
//!
//! The most important part of Curtail, the actual redirect logic: resolve a
//! code to its target URL and count the visit in the same unit of work.
//!
//! This path sits directly on top of [`Storage`], bypassing the link
//! service, because it is the one place where concurrent requests contend
//! on shared state.

use axum::Extension;
use axum::extract::Path;
use axum::http::HeaderMap;
use axum::http::HeaderValue;
use axum::http::StatusCode;
use axum::http::header::LOCATION;
use url::Url;

use crate::codes;
use crate::storage;
use crate::storage::Storage;

/// Resolve a code to its target URL, counting the visit
///
/// Codes that fail the format check can not exist and are reported absent
/// without ever reaching storage; well-formed codes go through the storage
/// primitive that locks the row, increments the counter, and commits
pub async fn resolve<S: Storage>(storage: &S, code: &str) -> storage::Result<Option<String>> {
    if !codes::is_valid_code(code) {
        return Ok(None);
    }

    storage.resolve_and_increment(code).await
}

/// Redirect a visitor
///
/// Wildcard handler for `GET /{code}`: a 302 with a `Location` header on a
/// known code, a plain 404 otherwise
pub async fn visit<S: Storage>(
    Extension(storage): Extension<S>,
    Path(code): Path<String>,
) -> Result<(StatusCode, HeaderMap), (StatusCode, &'static str)> {
    tracing::debug!("Looking for code: /{code}");

    let url = resolve(&storage, &code).await.map_err(|err| {
        tracing::error!("Redirect for /{code} failed: {err}");

        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    })?;

    let mut headers = HeaderMap::new();

    let status_code = if let Some(url) = url {
        tracing::debug!(r#"Code "{code}" redirecting to: {url}"#);

        // stored URLs keep their original bytes, but `Location` must be an
        // ASCII URI-reference; re-parsing yields the punycode host and
        // percent-encoded path form
        let target = Url::parse(&url)
            .map_err(|err| {
                tracing::error!(r#"Stored URL for "{code}" no longer parses: {err}"#);

                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            })?
            .to_string();

        headers.insert(
            LOCATION,
            HeaderValue::from_str(&target)
                .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"))?,
        );

        StatusCode::FOUND
    } else {
        tracing::debug!(r#"Code "{code}" not found"#);

        StatusCode::NOT_FOUND
    };

    Ok((status_code, headers))
}
