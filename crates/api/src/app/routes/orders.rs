use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use bookstore_core::{CustomerId, OrderId};
use bookstore_infra::OrderLedger;

use crate::app::errors;
use crate::app::services::AppServices;
use crate::authz;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_orders))
        .route("/customer/:id", get(orders_for_customer))
        .route("/:id", get(get_order).delete(delete_order))
}

/// Admin listing, joined with customer and book summaries.
pub async fn list_orders(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    // The joined listing exposes every customer, so it is gated separately
    // from the shared read permission.
    if let Err(e) = authz::require_permission(&principal, "orders.list") {
        return errors::forbidden(e);
    }

    let items = services.store().list_orders();
    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}

pub async fn get_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(e) = authz::require_permission(&principal, "orders.read") {
        return errors::forbidden(e);
    }

    let id: OrderId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid order id")
        }
    };

    match services.store().get_order(id) {
        Some(order) => (StatusCode::OK, Json(order)).into_response(),
        None => errors::json_error(StatusCode::NOT_FOUND, "not_found", "order not found"),
    }
}

pub async fn orders_for_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(e) = authz::require_permission(&principal, "orders.read") {
        return errors::forbidden(e);
    }

    let id: CustomerId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid customer id")
        }
    };

    let items = services.store().list_orders_for_customer(id);
    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}

/// Admin housekeeping only — the purchase path never deletes ledger rows.
pub async fn delete_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(e) = authz::require_permission(&principal, "orders.delete") {
        return errors::forbidden(e);
    }

    let id: OrderId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid order id")
        }
    };

    if let Err(e) = services.store().delete_order(id) {
        return errors::store_error_to_response(e);
    }

    StatusCode::NO_CONTENT.into_response()
}
