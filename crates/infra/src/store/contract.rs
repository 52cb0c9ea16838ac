//! Store traits and shared store types.
//!
//! Reads return `Option`/`Vec` directly; mutations return `Result` so the
//! caller can distinguish missing rows, conflicts, and store failures.

use serde::Serialize;
use thiserror::Error;

use bookstore_accounts::{Admin, Customer};
use bookstore_catalog::{Author, Book, Category};
use bookstore_core::{AdminId, AuthorId, BookId, CategoryId, CustomerId, OrderId, ReviewId};
use bookstore_orders::OrderRecord;
use bookstore_reviews::Review;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The targeted row does not exist.
    #[error("not found")]
    NotFound,

    /// The mutation conflicts with current state (duplicate key, a guard
    /// that refuses to go negative, a stale re-check).
    #[error("conflict: {0}")]
    Conflict(String),

    /// The mutation references a row that does not exist.
    #[error("referential integrity: {0}")]
    ReferentialIntegrity(String),

    /// The store itself failed (e.g. poisoned lock).
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Book inventory: catalog CRUD plus the stock decrement used by purchases.
pub trait InventoryStore: Send + Sync {
    fn insert_book(&self, book: Book) -> Result<(), StoreError>;
    fn update_book(&self, book: Book) -> Result<(), StoreError>;
    fn delete_book(&self, id: BookId) -> Result<(), StoreError>;
    fn get_book(&self, id: BookId) -> Option<Book>;
    /// Exact title match, case-insensitive (the unique lookup key).
    fn find_book_by_title(&self, title: &str) -> Option<Book>;
    fn list_books(&self) -> Vec<Book>;
    /// Decrement stock; fails rather than letting quantity go negative,
    /// even though callers are expected to validate first.
    fn decrement_stock(&self, id: BookId, amount: u32) -> Result<(), StoreError>;
}

/// Customer accounts: CRUD, credential lookup, and the balance debit used
/// by purchases.
pub trait AccountStore: Send + Sync {
    fn insert_customer(&self, customer: Customer) -> Result<(), StoreError>;
    fn update_customer(&self, customer: Customer) -> Result<(), StoreError>;
    fn delete_customer(&self, id: CustomerId) -> Result<(), StoreError>;
    fn get_customer(&self, id: CustomerId) -> Option<Customer>;
    fn find_customer_by_credentials(&self, username: &str, password: &str) -> Option<Customer>;
    fn list_customers(&self) -> Vec<Customer>;
    /// Debit the balance; fails rather than letting it go negative.
    fn debit_customer(&self, id: CustomerId, amount: u64) -> Result<(), StoreError>;
}

/// Administrator directory.
pub trait AdminDirectory: Send + Sync {
    fn insert_admin(&self, admin: Admin) -> Result<(), StoreError>;
    fn update_admin(&self, admin: Admin) -> Result<(), StoreError>;
    fn delete_admin(&self, id: AdminId) -> Result<(), StoreError>;
    fn get_admin(&self, id: AdminId) -> Option<Admin>;
    fn find_admin_by_credentials(&self, username: &str, password: &str) -> Option<Admin>;
    fn list_admins(&self) -> Vec<Admin>;
}

/// Authors and categories.
pub trait CatalogStore: Send + Sync {
    fn insert_author(&self, author: Author) -> Result<(), StoreError>;
    fn update_author(&self, author: Author) -> Result<(), StoreError>;
    fn delete_author(&self, id: AuthorId) -> Result<(), StoreError>;
    fn get_author(&self, id: AuthorId) -> Option<Author>;
    fn list_authors(&self) -> Vec<Author>;

    fn insert_category(&self, category: Category) -> Result<(), StoreError>;
    fn update_category(&self, category: Category) -> Result<(), StoreError>;
    fn delete_category(&self, id: CategoryId) -> Result<(), StoreError>;
    fn get_category(&self, id: CategoryId) -> Option<Category>;
    fn list_categories(&self) -> Vec<Category>;
}

/// A review joined with the title of the reviewed book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewView {
    pub review: Review,
    pub book_title: String,
}

/// Customer reviews. Inserting requires the referenced book and customer to
/// exist.
pub trait ReviewStore: Send + Sync {
    fn insert_review(&self, review: Review) -> Result<(), StoreError>;
    fn update_review(&self, review: Review) -> Result<(), StoreError>;
    fn delete_review(&self, id: ReviewId) -> Result<(), StoreError>;
    fn get_review(&self, id: ReviewId) -> Option<Review>;
    fn list_reviews(&self) -> Vec<ReviewView>;
    fn list_reviews_with_rating(&self, rating: u8) -> Vec<Review>;
}

/// Slim customer projection for joined order listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerSummary {
    pub id: CustomerId,
    pub name: String,
    pub username: String,
    pub email: Option<String>,
}

/// Slim book projection for joined order listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookSummary {
    pub id: BookId,
    pub title: String,
    pub isbn: String,
    pub unit_price: u64,
}

/// An order joined with customer and book summaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderView {
    pub order: OrderRecord,
    pub customer: Option<CustomerSummary>,
    pub book: Option<BookSummary>,
}

/// Order count per book, for the popular-books listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookPopularity {
    pub book_id: BookId,
    pub title: String,
    pub order_count: u64,
}

/// Append-only ledger of completed purchase lines.
///
/// The purchase path only appends; get/list/delete serve the admin surface.
pub trait OrderLedger: Send + Sync {
    fn append_order(&self, record: OrderRecord) -> Result<OrderId, StoreError>;
    fn get_order(&self, id: OrderId) -> Option<OrderRecord>;
    fn list_orders(&self) -> Vec<OrderView>;
    fn list_orders_for_customer(&self, id: CustomerId) -> Vec<OrderRecord>;
    fn delete_order(&self, id: OrderId) -> Result<(), StoreError>;
    fn book_popularity(&self) -> Vec<BookPopularity>;
}

/// One staged stock decrement. Quantities for the same book are accumulated
/// by the orchestrator before staging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedDecrement {
    pub book_id: BookId,
    pub quantity: u32,
}

/// The full mutation set of one validated purchase: stock decrements, the
/// balance debit, and the ledger rows. Applied atomically or not at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedPurchase {
    pub customer_id: CustomerId,
    pub total_price: u64,
    pub decrements: Vec<StagedDecrement>,
    pub records: Vec<OrderRecord>,
}

/// The single serialization point of the purchase flow.
pub trait PurchaseTransaction: Send + Sync {
    /// Commit a staged purchase atomically.
    ///
    /// The implementation must re-check stock and balance inside its own
    /// transactional scope (the orchestrator's validation may be stale by
    /// commit time) and leave state untouched on any failure.
    fn commit_purchase(&self, staged: StagedPurchase) -> Result<Vec<OrderId>, StoreError>;
}

// Forwarding impls so services can be generic over `Arc<S>` (shared store
// handles), mirroring how read-model stores are shared elsewhere.
impl<S> InventoryStore for std::sync::Arc<S>
where
    S: InventoryStore + ?Sized,
{
    fn insert_book(&self, book: Book) -> Result<(), StoreError> {
        (**self).insert_book(book)
    }

    fn update_book(&self, book: Book) -> Result<(), StoreError> {
        (**self).update_book(book)
    }

    fn delete_book(&self, id: BookId) -> Result<(), StoreError> {
        (**self).delete_book(id)
    }

    fn get_book(&self, id: BookId) -> Option<Book> {
        (**self).get_book(id)
    }

    fn find_book_by_title(&self, title: &str) -> Option<Book> {
        (**self).find_book_by_title(title)
    }

    fn list_books(&self) -> Vec<Book> {
        (**self).list_books()
    }

    fn decrement_stock(&self, id: BookId, amount: u32) -> Result<(), StoreError> {
        (**self).decrement_stock(id, amount)
    }
}

impl<S> AccountStore for std::sync::Arc<S>
where
    S: AccountStore + ?Sized,
{
    fn insert_customer(&self, customer: Customer) -> Result<(), StoreError> {
        (**self).insert_customer(customer)
    }

    fn update_customer(&self, customer: Customer) -> Result<(), StoreError> {
        (**self).update_customer(customer)
    }

    fn delete_customer(&self, id: CustomerId) -> Result<(), StoreError> {
        (**self).delete_customer(id)
    }

    fn get_customer(&self, id: CustomerId) -> Option<Customer> {
        (**self).get_customer(id)
    }

    fn find_customer_by_credentials(&self, username: &str, password: &str) -> Option<Customer> {
        (**self).find_customer_by_credentials(username, password)
    }

    fn list_customers(&self) -> Vec<Customer> {
        (**self).list_customers()
    }

    fn debit_customer(&self, id: CustomerId, amount: u64) -> Result<(), StoreError> {
        (**self).debit_customer(id, amount)
    }
}

impl<S> PurchaseTransaction for std::sync::Arc<S>
where
    S: PurchaseTransaction + ?Sized,
{
    fn commit_purchase(&self, staged: StagedPurchase) -> Result<Vec<OrderId>, StoreError> {
        (**self).commit_purchase(staged)
    }
}
