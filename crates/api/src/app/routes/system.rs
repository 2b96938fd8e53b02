use axum::{
    Extension,
    http::{Method, StatusCode, Uri, header},
    response::{IntoResponse, Redirect, Response},
};

use crate::app::services::AppServices;

const HOME_PAGE: &str = "/index.html";
const HOME_FALLBACK: &str = "/carros";

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// `GET /`: the public index page when present, otherwise the inventory list.
pub async fn home(Extension(services): Extension<AppServices>) -> Response {
    if services.public.has(HOME_PAGE) {
        serve_file(&services, HOME_PAGE).await
    } else {
        Redirect::to(HOME_FALLBACK).into_response()
    }
}

/// Any path no route matched. Only GET and HEAD read files.
pub async fn static_file(
    Extension(services): Extension<AppServices>,
    method: Method,
    uri: Uri,
) -> Response {
    if method != Method::GET && method != Method::HEAD {
        return not_found();
    }
    serve_file(&services, uri.path()).await
}

async fn serve_file(services: &AppServices, path: &str) -> Response {
    match services.public.load(path).await {
        Ok((bytes, content_type)) => ([(header::CONTENT_TYPE, content_type)], bytes).into_response(),
        Err(err) => {
            tracing::debug!(%path, error = %err, "static file not served");
            not_found()
        }
    }
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "not found").into_response()
}
