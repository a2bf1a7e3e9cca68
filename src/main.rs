#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
// easier to use when using the functions as callback of foreign functions
#![allow(clippy::needless_pass_by_value)]

use anyhow::Result;
use axum::Extension;
use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::prelude::*;

use crate::config::Config;
use crate::service::LinkService;
use crate::storage::Storage;
use crate::storage::setup;

mod api;
mod codes;
mod config;
mod graceful_shutdown;
mod links;
mod redirect;
mod service;
mod storage;
#[cfg(test)]
mod tests;
mod utils;

const DEFAULT_RUST_LOG: &str = "curtail=debug,tower_http=debug";

#[tokio::main]
async fn main() -> Result<()> {
    setup_environment();
    setup_tracing();

    let config = Config::from_env()?;
    let address = config.address;

    let app = setup_app(config).await;

    let listener = TcpListener::bind(address).await?;
    tracing::info!("Listening on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(graceful_shutdown::handler())
        .await?;

    Ok(())
}

/// Create and setup the app with its dependencies
pub async fn setup_app(config: Config) -> Router {
    let storage = setup().await;

    create_router(storage, config)
}

/// Create the router for Curtail
///
/// Management routes and the visitor redirect share one router, `/links`
/// takes priority over the wildcard code route
fn create_router<S: Storage>(storage: S, config: Config) -> Router {
    let service = LinkService::new(storage.clone());

    Router::new()
        .merge(api::router::<S>())
        .route("/{code}", get(redirect::visit::<S>))
        .layer(TraceLayer::new_for_http())
        .layer(Extension(storage))
        .layer(Extension(service))
        .layer(Extension(config))
}

fn setup_environment() {
    dotenvy::dotenv().ok();
}

fn setup_tracing() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::registry;

    registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_RUST_LOG.into()),
        ))
        .with(fmt::layer())
        .init();
}
