//! Minimal image hosting service.
//!
//! Clients holding one of the configured API keys upload raw image bytes to
//! `POST /new` and receive a URL below `/images/`, which anyone can fetch.

pub mod config;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod util;

use std::{path::PathBuf, sync::Arc};

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::any,
    Router,
};

use crate::{
    config::Settings,
    error::ApiError,
    handlers::{image::image_handler, ping::ping_handler, upload::upload_handler},
    util::{auth::require_api_key, cors::cors_layer},
};

#[derive(Clone)]
pub struct ServerState {
    pub settings: Arc<Settings>,
    // Directory holding `<uuid>.<ext>` files
    pub image_dir: PathBuf,
}

impl ServerState {
    pub fn new(settings: Settings, image_dir: impl Into<PathBuf>) -> Self {
        ServerState {
            settings: Arc::new(settings),
            image_dir: image_dir.into(),
        }
    }
}

/// Creates the router with upload, image and ping endpoints.
/// Only the upload endpoint sits behind the API key check.
pub fn app(server_state: ServerState) -> Router {
    let upload = Router::new()
        .route("/new", any(upload_handler))
        .route_layer(middleware::from_fn_with_state(
            server_state.clone(),
            require_api_key,
        ));

    let mut app = Router::new()
        .merge(upload)
        .route("/images", any(image_handler))
        .route("/images/", any(image_handler))
        .route("/images/*filename", any(image_handler))
        .route("/ping", any(ping_handler))
        .fallback(not_found_handler)
        // The upload handler enforces its own cap while streaming
        .layer(DefaultBodyLimit::disable());

    if let Some(cors) = cors_layer(&server_state.settings) {
        app = app.layer(cors);
    }

    app.with_state(server_state)
}

/// Unknown paths answer with the JSON error body like every other failure
async fn not_found_handler() -> ApiError {
    ApiError::RouteNotFound
}
