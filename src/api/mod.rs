//! All API endpoint setup

use axum::Router;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;

pub use request::Form;
pub use request::PathParameters;
pub use request::Query;
pub use response::Error;
pub use response::Success;

use crate::storage::Storage;

mod notes;
mod request;
mod response;

/// Get the Axum router for all API routes
pub fn router<S: Storage>() -> Router {
    let notes = Router::new()
        .route("/", get(notes::list::<S>))
        .route("/", post(notes::create::<S>))
        .route("/{note}", get(notes::single::<S>))
        .route("/{note}", put(notes::update::<S>))
        .route("/{note}", delete(notes::delete::<S>))
        .route("/{note}/restore", post(notes::restore::<S>));

    Router::new().nest("/notes", notes)
}
