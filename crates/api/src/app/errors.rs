use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use bookstore_auth::AuthzError;
use bookstore_core::DomainError;
use bookstore_infra::{CheckoutError, StoreError};

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn forbidden(err: AuthzError) -> axum::response::Response {
    json_error(StatusCode::FORBIDDEN, "forbidden", err.to_string())
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::InvariantViolation(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invariant_violation", msg)
        }
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        DomainError::Unauthorized => {
            json_error(StatusCode::FORBIDDEN, "unauthorized", "unauthorized")
        }
    }
}

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        StoreError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        StoreError::ReferentialIntegrity(msg) => {
            json_error(StatusCode::BAD_REQUEST, "referential_integrity", msg)
        }
        StoreError::Unavailable(msg) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", msg)
        }
    }
}

/// Checkout status contract: 404 for missing customer/book, 400 for the
/// recoverable business failures, 500 for transactional failures.
pub fn checkout_error_to_response(err: CheckoutError) -> axum::response::Response {
    match err {
        CheckoutError::InvalidRequest(msg) => {
            json_error(StatusCode::BAD_REQUEST, "invalid_request", msg)
        }
        CheckoutError::CustomerNotFound => {
            json_error(StatusCode::NOT_FOUND, "customer_not_found", "Customer not found.")
        }
        CheckoutError::BookNotFound(title) => json_error(
            StatusCode::NOT_FOUND,
            "book_not_found",
            format!("Book '{title}' not found."),
        ),
        CheckoutError::InsufficientStock(title) => json_error(
            StatusCode::BAD_REQUEST,
            "insufficient_stock",
            format!("Not enough stock available for book '{title}'."),
        ),
        CheckoutError::InsufficientBalance => json_error(
            StatusCode::BAD_REQUEST,
            "insufficient_balance",
            "Insufficient balance for the total order.",
        ),
        CheckoutError::TransactionFailure(detail) => json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "transaction_failure",
            format!("Internal server error: {detail}"),
        ),
    }
}
