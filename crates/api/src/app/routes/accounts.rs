//! Login and registration pages.

use axum::{
    Extension, Form, Router,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};

use garage_auth::{Credentials, Registration};
use garage_core::FormInput;

use crate::app::errors::ApiError;
use crate::app::services::AppServices;

const AFTER_LOGIN: &str = "/carros";
const AFTER_REGISTER: &str = "/login";

pub fn router() -> Router {
    Router::new()
        .route("/login", get(login_form).post(login))
        .route("/cadastro", get(register_form).post(register))
}

async fn login_form(Extension(services): Extension<AppServices>) -> Result<Html<String>, ApiError> {
    Ok(Html(services.views.login(None)?))
}

async fn login(
    Extension(services): Extension<AppServices>,
    Form(form): Form<FormInput>,
) -> Result<Response, ApiError> {
    let credentials = match Credentials::from_form(&form) {
        Ok(credentials) => credentials,
        Err(err) => {
            let page = services.views.login(Some(&ApiError::from(err).to_string()))?;
            return Ok((StatusCode::BAD_REQUEST, Html(page)).into_response());
        }
    };

    match services.users.authenticate(&credentials).await? {
        Some(user) => {
            tracing::info!(login = %user.login, "user logged in");
            Ok(Redirect::to(AFTER_LOGIN).into_response())
        }
        None => {
            tracing::debug!(login = %credentials.login, "login rejected");
            let page = services.views.login(Some("invalid login or password"))?;
            Ok((StatusCode::UNAUTHORIZED, Html(page)).into_response())
        }
    }
}

async fn register_form(Extension(services): Extension<AppServices>) -> Result<Html<String>, ApiError> {
    Ok(Html(services.views.register()?))
}

async fn register(
    Extension(services): Extension<AppServices>,
    Form(form): Form<FormInput>,
) -> Result<Redirect, ApiError> {
    let registration = Registration::from_form(&form)?;
    let user = services.users.register(registration).await?;
    tracing::info!(id = %user.id, login = %user.login, "user registered");
    Ok(Redirect::to(AFTER_REGISTER))
}
