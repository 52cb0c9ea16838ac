use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;

use bookstore_core::ReviewId;
use bookstore_infra::ReviewStore;
use bookstore_reviews::{Review, ReviewDraft};

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::authz;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_reviews).post(create_review))
        .route("/rating/:rating", get(reviews_by_rating))
        .route("/top-likes", get(reviews_by_likes))
        .route("/top-rated", get(reviews_by_rating_order))
        .route("/:id", get(get_review).put(update_review).delete(delete_review))
        .route("/:id/respond", post(respond_to_review))
}

pub async fn list_reviews(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(e) = authz::require_permission(&principal, "reviews.read") {
        return errors::forbidden(e);
    }

    let items = services.store().list_reviews();
    if items.is_empty() {
        return errors::json_error(StatusCode::NOT_FOUND, "not_found", "no reviews found");
    }
    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}

pub async fn get_review(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(e) = authz::require_permission(&principal, "reviews.read") {
        return errors::forbidden(e);
    }

    let id: ReviewId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid review id")
        }
    };

    match services.store().get_review(id) {
        Some(review) => (StatusCode::OK, Json(review)).into_response(),
        None => errors::json_error(StatusCode::NOT_FOUND, "not_found", "review not found"),
    }
}

pub async fn reviews_by_rating(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(rating): Path<u8>,
) -> axum::response::Response {
    if let Err(e) = authz::require_permission(&principal, "reviews.read") {
        return errors::forbidden(e);
    }

    let items = services.store().list_reviews_with_rating(rating);
    if items.is_empty() {
        return errors::json_error(
            StatusCode::NOT_FOUND,
            "not_found",
            format!("no reviews found with rating {rating}"),
        );
    }
    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}

/// Reviews ordered by most likes, then fewest dislikes, then rating.
pub async fn reviews_by_likes(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(e) = authz::require_permission(&principal, "reviews.read") {
        return errors::forbidden(e);
    }

    let mut items: Vec<Review> = services
        .store()
        .list_reviews()
        .into_iter()
        .map(|v| v.review)
        .collect();
    if items.is_empty() {
        return errors::json_error(StatusCode::NOT_FOUND, "not_found", "no reviews found");
    }
    items.sort_by(|a, b| {
        b.likes()
            .cmp(&a.likes())
            .then(a.dislikes().cmp(&b.dislikes()))
            .then(b.rating().cmp(&a.rating()))
    });
    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}

/// Reviews ordered by rating, then likes, then fewest dislikes.
pub async fn reviews_by_rating_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(e) = authz::require_permission(&principal, "reviews.read") {
        return errors::forbidden(e);
    }

    let mut items: Vec<Review> = services
        .store()
        .list_reviews()
        .into_iter()
        .map(|v| v.review)
        .collect();
    if items.is_empty() {
        return errors::json_error(StatusCode::NOT_FOUND, "not_found", "no reviews found");
    }
    items.sort_by(|a, b| {
        b.rating()
            .cmp(&a.rating())
            .then(b.likes().cmp(&a.likes()))
            .then(a.dislikes().cmp(&b.dislikes()))
    });
    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}

pub async fn create_review(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(draft): Json<ReviewDraft>,
) -> axum::response::Response {
    if let Err(e) = authz::require_permission(&principal, "reviews.write") {
        return errors::forbidden(e);
    }

    let id = ReviewId::new();
    let review = match Review::new(id, draft, Utc::now()) {
        Ok(r) => r,
        Err(e) => return errors::domain_error_to_response(e),
    };

    if let Err(e) = services.store().insert_review(review) {
        return errors::store_error_to_response(e);
    }

    (
        StatusCode::CREATED,
        Json(serde_json::json!({"id": id.to_string()})),
    )
        .into_response()
}

pub async fn update_review(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(draft): Json<ReviewDraft>,
) -> axum::response::Response {
    if let Err(e) = authz::require_permission(&principal, "reviews.write") {
        return errors::forbidden(e);
    }

    let id: ReviewId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid review id")
        }
    };

    let Some(mut review) = services.store().get_review(id) else {
        return errors::json_error(StatusCode::NOT_FOUND, "not_found", "review not found");
    };
    if let Err(e) = review.apply_draft(draft) {
        return errors::domain_error_to_response(e);
    }

    if let Err(e) = services.store().update_review(review) {
        return errors::store_error_to_response(e);
    }

    StatusCode::NO_CONTENT.into_response()
}

/// Attach a staff response to a review.
pub async fn respond_to_review(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::RespondReviewRequest>,
) -> axum::response::Response {
    if let Err(e) = authz::require_permission(&principal, "reviews.respond") {
        return errors::forbidden(e);
    }

    let id: ReviewId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid review id")
        }
    };

    let Some(mut review) = services.store().get_review(id) else {
        return errors::json_error(StatusCode::NOT_FOUND, "not_found", "review not found");
    };
    if let Err(e) = review.respond(body.response, Utc::now()) {
        return errors::domain_error_to_response(e);
    }

    if let Err(e) = services.store().update_review(review) {
        return errors::store_error_to_response(e);
    }

    StatusCode::NO_CONTENT.into_response()
}

pub async fn delete_review(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(e) = authz::require_permission(&principal, "reviews.delete") {
        return errors::forbidden(e);
    }

    let id: ReviewId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid review id")
        }
    };

    if let Err(e) = services.store().delete_review(id) {
        return errors::store_error_to_response(e);
    }

    StatusCode::NO_CONTENT.into_response()
}
