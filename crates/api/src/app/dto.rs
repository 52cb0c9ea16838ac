//! Request/response DTOs and JSON mapping helpers.
//!
//! Domain drafts double as request bodies where they already have the right
//! shape; the types here exist where the wire shape differs (auth, checkout,
//! search) or where fields must be withheld (accounts: passwords).

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};

use bookstore_accounts::{Admin, Customer};
use bookstore_orders::PurchaseLine;

/// Login body for both `/auth/admin` and `/auth/customer`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthRequest {
    pub username: String,
    pub password: String,
}

/// Checkout body: the purchase lines plus caller-supplied order metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct BuyBooksRequest {
    pub lines: Vec<PurchaseLine>,
    pub payment_method: String,
    pub shipping_address: String,
    pub billing_address: String,
    pub delivery_date: DateTime<Utc>,
}

/// Staff response body for a review.
#[derive(Debug, Clone, Deserialize)]
pub struct RespondReviewRequest {
    pub response: String,
}

/// Query parameters of the combined book search endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct BookSearchQuery {
    pub text: Option<String>,
    pub author: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
    pub min_rating: Option<u8>,
    pub max_rating: Option<u8>,
    pub in_stock: Option<bool>,
    pub sort_by: Option<String>,
    #[serde(default)]
    pub descending: bool,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

/// Query parameters of the published-year range listing.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct YearRangeQuery {
    pub start: i32,
    pub end: i32,
}

/// Query parameter of the available-books listing.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct AvailableQuery {
    #[serde(default = "default_true")]
    pub in_stock: bool,
}

fn default_true() -> bool {
    true
}

pub fn customer_to_json(customer: &Customer) -> JsonValue {
    json!({
        "id": customer.id_typed(),
        "username": customer.profile().username,
        "name": customer.profile().name,
        "email": customer.profile().email,
        "phone": customer.profile().phone,
        "balance": customer.balance(),
        "gender": customer.gender(),
        "age": customer.age(),
        "country": customer.country(),
        "description": customer.description(),
        "city": customer.city(),
        "street": customer.street(),
    })
}

pub fn admin_to_json(admin: &Admin) -> JsonValue {
    json!({
        "id": admin.id_typed(),
        "username": admin.profile().username,
        "name": admin.profile().name,
        "email": admin.profile().email,
        "phone": admin.profile().phone,
    })
}
