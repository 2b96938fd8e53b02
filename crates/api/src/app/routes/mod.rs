use axum::Router;

use crate::app::services::AppServices;

pub mod accounts;
pub mod resource;
pub mod system;

/// Router for every resource and account page.
pub fn router(services: &AppServices) -> Router {
    Router::new()
        .merge(resource::router(services.cars.clone(), services.views.clone()))
        .merge(resource::router(services.posts.clone(), services.views.clone()))
        .merge(accounts::router())
}
