//! All API endpoint setup

use axum::Json;
use axum::Router;
use axum::routing::get;
use axum::routing::post;
use serde::Serialize;

pub use request::Form;
pub use response::Error;

mod links;
mod request;
mod response;

use crate::storage::Storage;

/// Get the Axum router for all management routes
pub fn router<S: Storage>() -> Router {
    Router::new()
        .route("/links", post(links::create::<S>).get(links::list::<S>))
        .route(
            "/links/{code}",
            get(links::single::<S>).delete(links::delete::<S>),
        )
        .route("/healthz", get(health))
}

/// Health response going to the user
#[derive(Serialize)]
struct HealthResponse {
    /// Always true when the process answers at all
    ok: bool,

    /// Crate version
    version: &'static str,
}

/// Health check
#[allow(clippy::unused_async)]
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        version: env!("CARGO_PKG_VERSION"),
    })
}
