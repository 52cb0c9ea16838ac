use axum::{routing::get, Router};

pub mod admins;
pub mod auth;
pub mod authors;
pub mod books;
pub mod categories;
pub mod customers;
pub mod orders;
pub mod reviews;
pub mod system;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/books", books::router())
        .nest("/authors", authors::router())
        .nest("/categories", categories::router())
        .nest("/customers", customers::router())
        .nest("/admins", admins::router())
        .nest("/reviews", reviews::router())
        .nest("/orders", orders::router())
}
