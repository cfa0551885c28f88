//! HTTP route handlers for the catalog API.
//!
//! - `actors`: actor CRUD and listing
//! - `films`: film CRUD, sorted listing and substring search
//! - `health`: health check and version endpoints
//!
//! [`router`] assembles the full route table so the binary and the tests run
//! the exact same application.

pub mod actors;
pub mod films;
pub mod health;

use axum::routing::{get, patch, post};
use axum::Router;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/actors", post(actors::create_actor).get(actors::list_actors))
        .route("/actors/{id}", patch(actors::update_actor).delete(actors::delete_actor))
        .route("/films", post(films::create_film).get(films::list_films))
        .route("/films/{id}", patch(films::update_film).delete(films::delete_film))
        .route("/films/searches", get(films::search_films));

    Router::new()
        .route("/healthz", get(health::healthz))
        .route("/readyz", get(health::readyz))
        .route("/version", get(health::version))
        .nest("/api/v1", api)
        .with_state(state)
}
