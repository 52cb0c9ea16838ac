use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use bookstore_catalog::{Author, AuthorDraft};
use bookstore_core::AuthorId;
use bookstore_infra::CatalogStore;

use crate::app::errors;
use crate::app::services::AppServices;
use crate::authz;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_authors).post(create_author))
        .route("/:id", get(get_author).put(update_author).delete(delete_author))
}

pub async fn list_authors(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(e) = authz::require_permission(&principal, "authors.read") {
        return errors::forbidden(e);
    }

    let items = services.store().list_authors();
    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}

pub async fn get_author(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(e) = authz::require_permission(&principal, "authors.read") {
        return errors::forbidden(e);
    }

    let id: AuthorId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid author id")
        }
    };

    match services.store().get_author(id) {
        Some(author) => (StatusCode::OK, Json(author)).into_response(),
        None => errors::json_error(StatusCode::NOT_FOUND, "not_found", "author not found"),
    }
}

pub async fn create_author(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(draft): Json<AuthorDraft>,
) -> axum::response::Response {
    if let Err(e) = authz::require_permission(&principal, "authors.write") {
        return errors::forbidden(e);
    }

    let id = AuthorId::new();
    let author = match Author::new(id, draft) {
        Ok(a) => a,
        Err(e) => return errors::domain_error_to_response(e),
    };

    if let Err(e) = services.store().insert_author(author) {
        return errors::store_error_to_response(e);
    }

    (
        StatusCode::CREATED,
        Json(serde_json::json!({"id": id.to_string()})),
    )
        .into_response()
}

pub async fn update_author(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(draft): Json<AuthorDraft>,
) -> axum::response::Response {
    if let Err(e) = authz::require_permission(&principal, "authors.write") {
        return errors::forbidden(e);
    }

    let id: AuthorId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid author id")
        }
    };

    let author = match Author::new(id, draft) {
        Ok(a) => a,
        Err(e) => return errors::domain_error_to_response(e),
    };

    if let Err(e) = services.store().update_author(author) {
        return errors::store_error_to_response(e);
    }

    StatusCode::NO_CONTENT.into_response()
}

pub async fn delete_author(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(e) = authz::require_permission(&principal, "authors.write") {
        return errors::forbidden(e);
    }

    let id: AuthorId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid author id")
        }
    };

    if let Err(e) = services.store().delete_author(id) {
        return errors::store_error_to_response(e);
    }

    StatusCode::NO_CONTENT.into_response()
}
