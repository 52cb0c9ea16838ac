use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;

use bookstore_accounts::{Customer, CustomerDraft};
use bookstore_core::CustomerId;
use bookstore_infra::{AccountStore, PurchaseRequest};
use bookstore_orders::OrderInstructions;

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::authz;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_customers).post(create_customer))
        .route(
            "/:id",
            get(get_customer).put(update_customer).delete(delete_customer),
        )
        .route("/:id/buy-books", post(buy_books))
}

pub async fn list_customers(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(e) = authz::require_permission(&principal, "customers.read") {
        return errors::forbidden(e);
    }

    let items: Vec<serde_json::Value> = services
        .store()
        .list_customers()
        .iter()
        .map(dto::customer_to_json)
        .collect();
    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}

pub async fn get_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(e) = authz::require_permission(&principal, "customers.read") {
        return errors::forbidden(e);
    }

    let id: CustomerId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid customer id")
        }
    };

    match services.store().get_customer(id) {
        Some(customer) => (StatusCode::OK, Json(dto::customer_to_json(&customer))).into_response(),
        None => errors::json_error(StatusCode::NOT_FOUND, "not_found", "customer not found"),
    }
}

pub async fn create_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(draft): Json<CustomerDraft>,
) -> axum::response::Response {
    if let Err(e) = authz::require_permission(&principal, "customers.manage") {
        return errors::forbidden(e);
    }

    let id = CustomerId::new();
    let customer = match Customer::new(id, draft) {
        Ok(c) => c,
        Err(e) => return errors::domain_error_to_response(e),
    };

    if let Err(e) = services.store().insert_customer(customer) {
        return errors::store_error_to_response(e);
    }

    (
        StatusCode::CREATED,
        Json(serde_json::json!({"id": id.to_string()})),
    )
        .into_response()
}

pub async fn update_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(draft): Json<CustomerDraft>,
) -> axum::response::Response {
    if let Err(e) = authz::require_permission(&principal, "customers.write") {
        return errors::forbidden(e);
    }

    let id: CustomerId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid customer id")
        }
    };

    let customer = match Customer::new(id, draft) {
        Ok(c) => c,
        Err(e) => return errors::domain_error_to_response(e),
    };

    if let Err(e) = services.store().update_customer(customer) {
        return errors::store_error_to_response(e);
    }

    StatusCode::NO_CONTENT.into_response()
}

pub async fn delete_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(e) = authz::require_permission(&principal, "customers.manage") {
        return errors::forbidden(e);
    }

    let id: CustomerId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid customer id")
        }
    };

    if let Err(e) = services.store().delete_customer(id) {
        return errors::store_error_to_response(e);
    }

    StatusCode::NO_CONTENT.into_response()
}

/// The checkout endpoint: validates and commits a multi-line purchase
/// atomically through the orchestrator.
pub async fn buy_books(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::BuyBooksRequest>,
) -> axum::response::Response {
    if let Err(e) = authz::require_permission(&principal, "checkout.execute") {
        return errors::forbidden(e);
    }

    let customer_id: CustomerId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid customer id")
        }
    };

    let request = PurchaseRequest {
        customer_id,
        lines: body.lines,
        instructions: OrderInstructions {
            payment_method: body.payment_method,
            shipping_address: body.shipping_address,
            billing_address: body.billing_address,
            delivery_date: body.delivery_date,
        },
    };

    match services.checkout().execute_purchase(request, Utc::now()) {
        Ok(confirmation) => {
            services.invalidate_book_cache();
            (
                StatusCode::OK,
                Json(serde_json::json!({
                    "message": "Books purchased successfully.",
                    "order_ids": confirmation.order_ids,
                    "total_charged": confirmation.total_charged,
                })),
            )
                .into_response()
        }
        Err(e) => errors::checkout_error_to_response(e),
    }
}
