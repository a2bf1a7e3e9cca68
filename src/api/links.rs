//! Links API endpoints
//!
//! Everything related to the management of links

use axum::Extension;
use axum::Json;
use axum::extract::Path;
use axum::http::StatusCode;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::config::Config;
use crate::links::Link;
use crate::service::LinkService;
use crate::storage::Storage;

use super::Error;
use super::Form;

/// Link response going to the user
///
/// The stored fields plus the derived short URL, which is computed from the
/// configured base URL at response time and never persisted
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    /// Short code
    pub code: String,

    /// Target URL
    pub url: String,

    /// Number of completed redirects
    pub click_count: i64,

    /// Moment of the last completed redirect
    pub last_clicked: Option<DateTime<Utc>>,

    /// Creation date
    pub created_at: DateTime<Utc>,

    /// Full short URL for this code
    pub short_url: String,
}

impl LinkResponse {
    /// Create a response from a [`Link`](Link)
    fn from_link(link: Link, config: &Config) -> Self {
        let short_url = config.short_url(&link.code);

        Self {
            code: link.code,
            url: link.url,
            click_count: link.click_count,
            last_clicked: link.last_clicked,
            created_at: link.created_at,
            short_url,
        }
    }

    /// Create a response from multiple [`Link`](Link)s
    fn from_link_multiple(links: Vec<Link>, config: &Config) -> Vec<Self> {
        links
            .into_iter()
            .map(|link| Self::from_link(link, config))
            .collect()
    }
}

/// Create link form
#[derive(Debug, Deserialize)]
pub struct CreateLinkForm {
    /// Url to create a link for
    url: Option<String>,

    /// Code to create the link under, generated when not given
    code: Option<String>,
}

/// Create a link based on the [`CreateLinkForm`](CreateLinkForm) form
///
/// Request:
/// ```sh
/// curl -v -H 'Content-Type: application/json' \
///     -d '{ "url": "https://www.example.com/", "code": "abc123" }' \
///     http://localhost:3000/links
/// ```
///
/// Response:
/// ```json
/// { "code": "abc123", "url": "https://www.example.com/", "click_count": 0, ... }
/// ```
pub async fn create<S: Storage>(
    Extension(service): Extension<LinkService<S>>,
    Extension(config): Extension<Config>,
    Form(form): Form<CreateLinkForm>,
) -> Result<(StatusCode, Json<LinkResponse>), Error> {
    let url = form.url.as_deref().unwrap_or_default();

    let link = service.create(url, form.code.as_deref()).await?;

    Ok((
        StatusCode::CREATED,
        Json(LinkResponse::from_link(link, &config)),
    ))
}

/// List all links, newest first
///
/// Request:
/// ```sh
/// curl -v http://localhost:3000/links
/// ```
pub async fn list<S: Storage>(
    Extension(service): Extension<LinkService<S>>,
    Extension(config): Extension<Config>,
) -> Result<Json<Vec<LinkResponse>>, Error> {
    let links = service.list_all().await?;

    Ok(Json(LinkResponse::from_link_multiple(links, &config)))
}

/// Get a single link with its visit counters
///
/// Request:
/// ```sh
/// curl -v http://localhost:3000/links/abc123
/// ```
pub async fn single<S: Storage>(
    Extension(service): Extension<LinkService<S>>,
    Extension(config): Extension<Config>,
    Path(code): Path<String>,
) -> Result<Json<LinkResponse>, Error> {
    let link = service.read_one(&code).await?;

    Ok(Json(LinkResponse::from_link(link, &config)))
}

/// Deletion confirmation going to the user
#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    /// Always true, a miss is a 404 instead
    pub ok: bool,
}

/// Delete a link
///
/// Request:
/// ```sh
/// curl -v -XDELETE http://localhost:3000/links/abc123
/// ```
pub async fn delete<S: Storage>(
    Extension(service): Extension<LinkService<S>>,
    Path(code): Path<String>,
) -> Result<Json<DeletedResponse>, Error> {
    if service.remove(&code).await? {
        Ok(Json(DeletedResponse { ok: true }))
    } else {
        Err(Error::not_found("Not found"))
    }
}
