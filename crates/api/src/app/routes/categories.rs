use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use bookstore_catalog::{Category, CategoryDraft};
use bookstore_core::CategoryId;
use bookstore_infra::CatalogStore;

use crate::app::errors;
use crate::app::services::AppServices;
use crate::authz;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route(
            "/:id",
            get(get_category).put(update_category).delete(delete_category),
        )
}

pub async fn list_categories(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(e) = authz::require_permission(&principal, "categories.read") {
        return errors::forbidden(e);
    }

    let items = services.store().list_categories();
    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}

pub async fn get_category(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(e) = authz::require_permission(&principal, "categories.read") {
        return errors::forbidden(e);
    }

    let id: CategoryId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid category id")
        }
    };

    match services.store().get_category(id) {
        Some(category) => (StatusCode::OK, Json(category)).into_response(),
        None => errors::json_error(StatusCode::NOT_FOUND, "not_found", "category not found"),
    }
}

pub async fn create_category(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(draft): Json<CategoryDraft>,
) -> axum::response::Response {
    if let Err(e) = authz::require_permission(&principal, "categories.write") {
        return errors::forbidden(e);
    }

    let id = CategoryId::new();
    let category = match Category::new(id, draft) {
        Ok(c) => c,
        Err(e) => return errors::domain_error_to_response(e),
    };

    if let Err(e) = services.store().insert_category(category) {
        return errors::store_error_to_response(e);
    }

    (
        StatusCode::CREATED,
        Json(serde_json::json!({"id": id.to_string()})),
    )
        .into_response()
}

pub async fn update_category(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(draft): Json<CategoryDraft>,
) -> axum::response::Response {
    if let Err(e) = authz::require_permission(&principal, "categories.write") {
        return errors::forbidden(e);
    }

    let id: CategoryId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid category id")
        }
    };

    let category = match Category::new(id, draft) {
        Ok(c) => c,
        Err(e) => return errors::domain_error_to_response(e),
    };

    if let Err(e) = services.store().update_category(category) {
        return errors::store_error_to_response(e);
    }

    StatusCode::NO_CONTENT.into_response()
}

pub async fn delete_category(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(e) = authz::require_permission(&principal, "categories.write") {
        return errors::forbidden(e);
    }

    let id: CategoryId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid category id")
        }
    };

    if let Err(e) = services.store().delete_category(id) {
        return errors::store_error_to_response(e);
    }

    StatusCode::NO_CONTENT.into_response()
}
