#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
// easier to use when using the functions as callback of foreign functions
#![allow(clippy::needless_pass_by_value)]

//! Daybook, a personal notes journal with a REST API
//!
//! Dated notes with rich-text content, tags, pin/archive flags and a
//! soft-delete trash, plus a client-side optimistic cache

use std::net::SocketAddr;

use anyhow::Result;
use axum::Extension;
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing_subscriber::prelude::*;

use crate::storage::Storage;
use crate::storage::setup;
use crate::utils::env_var_or_else;

pub mod api;
pub mod client;
pub mod graceful_shutdown;
pub mod notes;
pub mod storage;
#[cfg(test)]
mod tests;
mod utils;

const DEFAULT_RUST_LOG: &str = "daybook=debug,tower_http=debug";
const DEFAULT_ADDRESS: &str = "0.0.0.0:6000";

/// Create and setup the app with its dependencies
///
/// With the `postgres` feature this connects to the database and runs
/// the migrations; the default build uses the in-memory storage
pub async fn setup_app() -> Router {
    let storage = setup().await;

    create_router(storage)
}

/// Create the router for Daybook
pub fn create_router<S: Storage>(storage: S) -> Router {
    Router::new()
        .nest("/api", api::router::<S>())
        .layer(TraceLayer::new_for_http())
        .layer(Extension(storage))
}

/// Load the `.env` file, when there is one
pub fn setup_environment() {
    dotenvy::dotenv().ok();
}

/// Setup `tracing` with the `RUST_LOG` environment variable
pub fn setup_tracing() {
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

/// Resolve the address to listen on
///
/// `ADDRESS` with an optional `PORT` override
///
/// # Errors
///
/// Will return `Err` when the address or port does not parse
pub fn setup_address() -> Result<SocketAddr> {
    let mut address =
        env_var_or_else("ADDRESS", || String::from(DEFAULT_ADDRESS)).parse::<SocketAddr>()?;

    // optional override of just the port
    if let Ok(port) = std::env::var("PORT") {
        // only check non-empty strings
        if !port.is_empty() {
            let port = port.parse::<u16>()?;

            address.set_port(port);
        }
    }

    Ok(address)
}
