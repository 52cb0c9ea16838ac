use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use bookstore_accounts::{Admin, AdminDraft};
use bookstore_core::AdminId;
use bookstore_infra::AdminDirectory;

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::authz;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_admins).post(create_admin))
        .route("/:id", get(get_admin).put(update_admin).delete(delete_admin))
}

pub async fn list_admins(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(e) = authz::require_permission(&principal, "admins.read") {
        return errors::forbidden(e);
    }

    let items: Vec<serde_json::Value> = services
        .store()
        .list_admins()
        .iter()
        .map(dto::admin_to_json)
        .collect();
    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}

pub async fn get_admin(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(e) = authz::require_permission(&principal, "admins.read") {
        return errors::forbidden(e);
    }

    let id: AdminId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid admin id")
        }
    };

    match services.store().get_admin(id) {
        Some(admin) => (StatusCode::OK, Json(dto::admin_to_json(&admin))).into_response(),
        None => errors::json_error(StatusCode::NOT_FOUND, "not_found", "admin not found"),
    }
}

pub async fn create_admin(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(draft): Json<AdminDraft>,
) -> axum::response::Response {
    if let Err(e) = authz::require_permission(&principal, "admins.create") {
        return errors::forbidden(e);
    }

    let id = AdminId::new();
    let admin = match Admin::new(id, draft) {
        Ok(a) => a,
        Err(e) => return errors::domain_error_to_response(e),
    };

    if let Err(e) = services.store().insert_admin(admin) {
        return errors::store_error_to_response(e);
    }

    (
        StatusCode::CREATED,
        Json(serde_json::json!({"id": id.to_string()})),
    )
        .into_response()
}

/// Mutating existing administrators stays SuperAdmin-only.
pub async fn update_admin(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(draft): Json<AdminDraft>,
) -> axum::response::Response {
    if let Err(e) = authz::require_permission(&principal, "admins.write") {
        return errors::forbidden(e);
    }

    let id: AdminId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid admin id")
        }
    };

    let admin = match Admin::new(id, draft) {
        Ok(a) => a,
        Err(e) => return errors::domain_error_to_response(e),
    };

    if let Err(e) = services.store().update_admin(admin) {
        return errors::store_error_to_response(e);
    }

    StatusCode::NO_CONTENT.into_response()
}

pub async fn delete_admin(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(e) = authz::require_permission(&principal, "admins.write") {
        return errors::forbidden(e);
    }

    let id: AdminId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid admin id")
        }
    };

    if let Err(e) = services.store().delete_admin(id) {
        return errors::store_error_to_response(e);
    }

    StatusCode::NO_CONTENT.into_response()
}
