//! HTTP application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store, template and static file wiring
//! - `routes/`: HTTP routes + handlers
//! - `views.rs`: server-side templates
//! - `errors.rs`: consistent error responses

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

pub mod errors;
pub mod routes;
pub mod services;
pub mod static_files;
pub mod views;

use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(services: AppServices) -> Router {
    Router::new()
        .route("/", get(routes::system::home))
        .route("/health", get(routes::system::health))
        .merge(routes::router(&services))
        .fallback(routes::system::static_file)
        .layer(ServiceBuilder::new().layer(Extension(services)))
}
