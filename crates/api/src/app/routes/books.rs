use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use bookstore_catalog::{Book, BookDraft};
use bookstore_core::BookId;
use bookstore_infra::{CatalogStore, InventoryStore, OrderLedger};

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::authz;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route("/available", get(available_books))
        .route("/published", get(books_by_published_year))
        .route("/search", get(search_books))
        .route("/popular", get(popular_books))
        .route("/:key", get(get_book_by_title).put(update_book).delete(delete_book))
}

pub async fn list_books(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(e) = authz::require_permission(&principal, "books.read") {
        return errors::forbidden(e);
    }

    let items = services.list_books_cached();
    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}

pub async fn create_book(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(draft): Json<BookDraft>,
) -> axum::response::Response {
    if let Err(e) = authz::require_permission(&principal, "books.write") {
        return errors::forbidden(e);
    }

    let id = BookId::new();
    let book = match Book::new(id, draft) {
        Ok(b) => b,
        Err(e) => return errors::domain_error_to_response(e),
    };

    if let Err(e) = services.store().insert_book(book) {
        return errors::store_error_to_response(e);
    }
    services.invalidate_book_cache();

    (
        StatusCode::CREATED,
        Json(serde_json::json!({"id": id.to_string()})),
    )
        .into_response()
}

/// Lookup is by title (the unique, case-insensitive key), matching the
/// read side of the purchase flow.
pub async fn get_book_by_title(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(title): Path<String>,
) -> axum::response::Response {
    if let Err(e) = authz::require_permission(&principal, "books.read") {
        return errors::forbidden(e);
    }

    match services.store().find_book_by_title(&title) {
        Some(book) => (StatusCode::OK, Json(book)).into_response(),
        None => errors::json_error(StatusCode::NOT_FOUND, "not_found", "book not found"),
    }
}

pub async fn update_book(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(draft): Json<BookDraft>,
) -> axum::response::Response {
    if let Err(e) = authz::require_permission(&principal, "books.write") {
        return errors::forbidden(e);
    }

    let id: BookId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid book id"),
    };

    let book = match Book::new(id, draft) {
        Ok(b) => b,
        Err(e) => return errors::domain_error_to_response(e),
    };

    if let Err(e) = services.store().update_book(book) {
        return errors::store_error_to_response(e);
    }
    services.invalidate_book_cache();

    StatusCode::NO_CONTENT.into_response()
}

pub async fn delete_book(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(e) = authz::require_permission(&principal, "books.write") {
        return errors::forbidden(e);
    }

    let id: BookId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid book id"),
    };

    if let Err(e) = services.store().delete_book(id) {
        return errors::store_error_to_response(e);
    }
    services.invalidate_book_cache();

    StatusCode::NO_CONTENT.into_response()
}

pub async fn available_books(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Query(query): Query<dto::AvailableQuery>,
) -> axum::response::Response {
    if let Err(e) = authz::require_permission(&principal, "books.read") {
        return errors::forbidden(e);
    }

    let mut items = services.store().list_books();
    if query.in_stock {
        items.retain(|b| b.in_stock());
    }
    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}

pub async fn books_by_published_year(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Query(query): Query<dto::YearRangeQuery>,
) -> axum::response::Response {
    if let Err(e) = authz::require_permission(&principal, "books.read") {
        return errors::forbidden(e);
    }

    if query.start > query.end {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "invalid_range",
            "The start year cannot be greater than the end year.",
        );
    }

    use chrono::Datelike;
    let items: Vec<Book> = services
        .store()
        .list_books()
        .into_iter()
        .filter(|b| {
            let year = b.published_date().year();
            year >= query.start && year <= query.end
        })
        .collect();

    if items.is_empty() {
        return errors::json_error(
            StatusCode::NOT_FOUND,
            "not_found",
            "No books found within the specified date range.",
        );
    }

    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}

/// Combined search: filtering, sorting, and pagination in one endpoint.
pub async fn search_books(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Query(query): Query<dto::BookSearchQuery>,
) -> axum::response::Response {
    if let Err(e) = authz::require_permission(&principal, "books.read") {
        return errors::forbidden(e);
    }

    let store = services.store();
    let mut matches: Vec<Book> = Vec::new();

    for book in store.list_books() {
        let author_name = store
            .get_author(book.author_id())
            .map(|a| a.name().to_string())
            .unwrap_or_default();
        let category_name = store
            .get_category(book.category_id())
            .map(|c| c.name().to_string())
            .unwrap_or_default();

        if let Some(author) = &query.author {
            if !contains_ci(&author_name, author) {
                continue;
            }
        }
        if let Some(category) = &query.category {
            if !contains_ci(&category_name, category) {
                continue;
            }
        }
        if let Some(min_price) = query.min_price {
            if book.unit_price() < min_price {
                continue;
            }
        }
        if let Some(max_price) = query.max_price {
            if book.unit_price() > max_price {
                continue;
            }
        }
        if let Some(min_rating) = query.min_rating {
            if book.rating() < min_rating {
                continue;
            }
        }
        if let Some(max_rating) = query.max_rating {
            if book.rating() > max_rating {
                continue;
            }
        }
        if let Some(true) = query.in_stock {
            if !book.in_stock() {
                continue;
            }
        }
        if let Some(text) = &query.text {
            let in_title = contains_ci(book.title(), text);
            let in_description = book
                .description()
                .map(|d| contains_ci(d, text))
                .unwrap_or(false);
            let in_author = contains_ci(&author_name, text);
            if !(in_title || in_description || in_author) {
                continue;
            }
        }

        matches.push(book);
    }

    match query.sort_by.as_deref().unwrap_or("title") {
        "title" => matches.sort_by(|a, b| a.title().to_lowercase().cmp(&b.title().to_lowercase())),
        "price" => matches.sort_by_key(|b| b.unit_price()),
        "rating" => matches.sort_by_key(|b| b.rating()),
        _ => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_sort",
                "Invalid sort criteria.",
            )
        }
    }
    if query.descending {
        matches.reverse();
    }

    let total_items = matches.len();
    let page = query.page.unwrap_or(1).max(1);
    let page_size = query.page_size.unwrap_or(10).max(1);
    let items: Vec<Book> = matches
        .into_iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .collect();

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "total_items": total_items,
            "page": page,
            "page_size": page_size,
            "items": items,
        })),
    )
        .into_response()
}

pub async fn popular_books(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(e) = authz::require_permission(&principal, "books.read") {
        return errors::forbidden(e);
    }

    let items = services.store().book_popularity();
    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
