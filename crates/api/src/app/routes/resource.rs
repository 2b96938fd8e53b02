//! Generic CRUD routes for any descriptor-driven resource.
//!
//! One registration routine serves every resource:
//!
//! | method | path                    | effect                                  |
//! |--------|-------------------------|-----------------------------------------|
//! | GET    | `/{slug}`               | list, newest first                      |
//! | GET    | `/{slug}/novo`          | create form                             |
//! | POST   | `/{slug}/novo`          | create, 400 on invalid form             |
//! | GET    | `/{slug}/editar/:id`    | edit form, 404 on unknown id            |
//! | POST   | `/{slug}/editar/:id`    | update, redirect even if nothing matched|
//! | GET    | `/{slug}/remover/:id`   | delete, redirect                        |
//! | GET    | `/{slug}/vender/:id`    | guarded decrement (counter resources)   |

use std::sync::Arc;

use axum::{
    Form, Router,
    extract::{Path, State},
    response::{Html, Redirect},
    routing::get,
};

use garage_core::{FormInput, RecordId, ResourceDescriptor, validate};
use garage_infra::RecordStore;

use crate::app::errors::ApiError;
use crate::app::views::Views;

#[derive(Clone)]
struct ResourceState {
    descriptor: &'static ResourceDescriptor,
    store: Arc<dyn RecordStore>,
    views: Arc<Views>,
}

impl ResourceState {
    fn back_to_list(&self) -> Redirect {
        Redirect::to(&list_path(self.descriptor))
    }
}

pub fn list_path(descriptor: &ResourceDescriptor) -> String {
    format!("/{}", descriptor.slug)
}

/// Register the CRUD routes of the resource held by `store`.
pub fn router(store: Arc<dyn RecordStore>, views: Arc<Views>) -> Router {
    let descriptor = store.descriptor();
    let base = list_path(descriptor);

    let mut router = Router::new()
        .route(&base, get(list))
        .route(&format!("{base}/novo"), get(new_form).post(create))
        .route(&format!("{base}/editar/:id"), get(edit_form).post(update))
        .route(&format!("{base}/remover/:id"), get(remove));

    if descriptor.counter_field().is_some() {
        router = router.route(&format!("{base}/vender/:id"), get(sell));
    }

    router.with_state(ResourceState {
        descriptor,
        store,
        views,
    })
}

async fn list(State(state): State<ResourceState>) -> Result<Html<String>, ApiError> {
    let records = state.store.list_all().await?;
    Ok(Html(state.views.list(state.descriptor, &records)?))
}

async fn new_form(State(state): State<ResourceState>) -> Result<Html<String>, ApiError> {
    Ok(Html(state.views.form(state.descriptor, None)?))
}

async fn create(
    State(state): State<ResourceState>,
    Form(form): Form<FormInput>,
) -> Result<Redirect, ApiError> {
    let fields = validate(state.descriptor, &form)?;
    let id = state.store.create(fields).await?;
    tracing::debug!(resource = state.descriptor.slug, %id, "record created");
    Ok(state.back_to_list())
}

async fn edit_form(
    State(state): State<ResourceState>,
    Path(id): Path<String>,
) -> Result<Html<String>, ApiError> {
    let not_found = || ApiError::not_found(state.descriptor.title);
    let id: RecordId = id.parse().map_err(|_| not_found())?;
    let record = state.store.get(id).await?.ok_or_else(not_found)?;
    Ok(Html(state.views.form(state.descriptor, Some(&record))?))
}

async fn update(
    State(state): State<ResourceState>,
    Path(id): Path<String>,
    Form(form): Form<FormInput>,
) -> Result<Redirect, ApiError> {
    let fields = validate(state.descriptor, &form)?;
    if let Ok(id) = id.parse::<RecordId>() {
        let applied = state.store.update(id, fields).await?;
        tracing::debug!(resource = state.descriptor.slug, %id, applied, "record updated");
    }
    Ok(state.back_to_list())
}

async fn remove(
    State(state): State<ResourceState>,
    Path(id): Path<String>,
) -> Result<Redirect, ApiError> {
    if let Ok(id) = id.parse::<RecordId>() {
        let applied = state.store.delete(id).await?;
        tracing::debug!(resource = state.descriptor.slug, %id, applied, "record removed");
    }
    Ok(state.back_to_list())
}

async fn sell(
    State(state): State<ResourceState>,
    Path(id): Path<String>,
) -> Result<Redirect, ApiError> {
    if let Ok(id) = id.parse::<RecordId>() {
        let applied = state.store.decrement(id).await?;
        tracing::debug!(resource = state.descriptor.slug, %id, applied, "unit sold");
    }
    Ok(state.back_to_list())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use garage_blog::POSTS;
    use garage_core::Fields;
    use garage_infra::InMemoryRecordStore;
    use garage_inventory::CARS;
    use tower::ServiceExt;

    fn cars_router() -> (Router, Arc<InMemoryRecordStore>) {
        let store = Arc::new(InMemoryRecordStore::new(&CARS));
        let views = Arc::new(Views::new().unwrap());
        (router(store.clone(), views), store)
    }

    fn post_form(uri: &str, body: &str) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    async fn body_text(res: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn create_redirects_to_list() {
        let (app, store) = cars_router();
        let res = app
            .oneshot(post_form(
                "/carros/novo",
                "brand=Toyota&model=Corolla&year=2022&available_count=3",
            ))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(res.headers()[header::LOCATION], "/carros");
        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn create_with_missing_field_is_bad_request() {
        let (app, store) = cars_router();
        let res = app
            .oneshot(post_form("/carros/novo", "brand=Toyota&model=&year=2022"))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(res).await.contains("fill in all fields"));
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn edit_form_of_unknown_or_malformed_id_is_not_found() {
        let (app, _store) = cars_router();
        let res = app.clone().oneshot(get("/carros/editar/99")).await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let res = app.oneshot(get("/carros/editar/abc")).await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn sell_on_malformed_id_still_redirects() {
        let (app, _store) = cars_router();
        let res = app.oneshot(get("/carros/vender/abc")).await.unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn list_renders_records() {
        let (app, store) = cars_router();
        store
            .create(
                Fields::new()
                    .text("brand", "Honda")
                    .text("model", "Civic")
                    .integer("year", 2021)
                    .integer("available_count", 2),
            )
            .await
            .unwrap();

        let res = app.oneshot(get("/carros")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let html = body_text(res).await;
        assert!(html.contains("Civic"));
        assert!(html.contains("/carros/vender/1"));
    }

    #[tokio::test]
    async fn resources_without_counter_have_no_sell_route() {
        let store = Arc::new(InMemoryRecordStore::new(&POSTS));
        let app = router(store, Arc::new(Views::new().unwrap()));

        let res = app.oneshot(get("/posts/vender/1")).await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
