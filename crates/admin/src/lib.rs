//! Agency content service library.
//!
//! This crate provides the content API and admin surface as a library,
//! allowing it to be tested and reused.
//!
//! # Security
//!
//! Every mutating route requires an admin session obtained with the shared
//! admin password. Public routes are read-only.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod content_file;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod storage;

use axum::Router;
use axum::http::{HeaderValue, header};
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;

use db::RecordStore;
use state::AppState;

/// Build the application router with its state applied.
///
/// Session, tracing and Sentry layers are added by the caller so tests can
/// choose their own session store.
pub fn app<S: RecordStore>(state: AppState<S>) -> Router {
    let mut router = routes::routes::<S>();
    if let Some(dir) = state.media().local_dir() {
        let media = ServiceBuilder::new()
            .layer(SetResponseHeaderLayer::overriding(
                header::X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static("nosniff"),
            ))
            .service(ServeDir::new(dir));
        router = router.nest_service("/media", media);
    }
    router.with_state(state)
}
