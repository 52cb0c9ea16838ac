//! Token issuance: username/password login for admins and customers.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use chrono::{Duration, Utc};

use bookstore_auth::{JwtClaims, PrincipalId, Role};
use bookstore_infra::{AccountStore, AdminDirectory};

use crate::app::{dto, errors};
use crate::app::services::AppServices;

/// Token lifetime handed out at login.
const TOKEN_TTL_MINUTES: i64 = 60;

pub fn router() -> Router {
    Router::new()
        .route("/admin", post(auth_admin))
        .route("/customer", post(auth_customer))
}

pub async fn auth_admin(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::AuthRequest>,
) -> axum::response::Response {
    tracing::info!(username = %body.username, "admin authentication attempt");

    let Some(admin) = services
        .store()
        .find_admin_by_credentials(&body.username, &body.password)
    else {
        tracing::warn!(username = %body.username, "admin authentication failed");
        return StatusCode::UNAUTHORIZED.into_response();
    };

    // The seeded root administrator is the only SuperAdmin subject.
    let role = if admin.id_typed() == services.root_admin_id() {
        Role::SUPER_ADMIN
    } else {
        Role::ADMIN
    };

    issue_token(
        &services,
        PrincipalId::from_uuid(*admin.id_typed().as_uuid()),
        role,
        admin.profile().name.clone(),
        admin.profile().email.clone(),
    )
}

pub async fn auth_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::AuthRequest>,
) -> axum::response::Response {
    tracing::info!(username = %body.username, "customer authentication attempt");

    let Some(customer) = services
        .store()
        .find_customer_by_credentials(&body.username, &body.password)
    else {
        tracing::warn!(username = %body.username, "customer authentication failed");
        return StatusCode::UNAUTHORIZED.into_response();
    };

    issue_token(
        &services,
        PrincipalId::from_uuid(*customer.id_typed().as_uuid()),
        Role::CUSTOMER,
        customer.profile().name.clone(),
        customer.profile().email.clone(),
    )
}

fn issue_token(
    services: &AppServices,
    sub: PrincipalId,
    role: Role,
    name: String,
    email: Option<String>,
) -> axum::response::Response {
    let now = Utc::now();
    let claims = JwtClaims {
        sub,
        role: role.clone(),
        name,
        email,
        issued_at: now,
        expires_at: now + Duration::minutes(TOKEN_TTL_MINUTES),
    };

    match services.jwt().issue(&claims) {
        Ok(token) => {
            tracing::info!(sub = %sub, role = %role, "authentication successful");
            (
                StatusCode::OK,
                Json(serde_json::json!({"access_token": token})),
            )
                .into_response()
        }
        Err(e) => errors::json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "token_error",
            e.to_string(),
        ),
    }
}
