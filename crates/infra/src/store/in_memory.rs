use std::collections::HashMap;
use std::sync::RwLock;

use bookstore_accounts::{Admin, Customer};
use bookstore_catalog::{Author, Book, Category};
use bookstore_core::{AdminId, AuthorId, BookId, CategoryId, CustomerId, OrderId, ReviewId};
use bookstore_orders::OrderRecord;
use bookstore_reviews::Review;

use super::contract::{
    AccountStore, AdminDirectory, BookPopularity, BookSummary, CatalogStore, CustomerSummary,
    InventoryStore, OrderLedger, OrderView, PurchaseTransaction, ReviewStore, ReviewView,
    StagedPurchase, StoreError,
};

#[derive(Debug, Default)]
struct State {
    books: HashMap<BookId, Book>,
    authors: HashMap<AuthorId, Author>,
    categories: HashMap<CategoryId, Category>,
    customers: HashMap<CustomerId, Customer>,
    admins: HashMap<AdminId, Admin>,
    reviews: HashMap<ReviewId, Review>,
    /// Append-only: purchase commits push, only the admin surface deletes.
    orders: Vec<OrderRecord>,
}

/// In-memory bookstore database.
///
/// All tables live under one `RwLock`, which makes the write guard the
/// transactional scope: `commit_purchase` re-validates and applies the whole
/// staged mutation set while holding it. Intended for tests/dev. Not
/// optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryBookstore {
    state: RwLock<State>,
}

fn poisoned() -> StoreError {
    StoreError::Unavailable("lock poisoned".to_string())
}

impl InMemoryBookstore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_read<T>(&self, f: impl FnOnce(&State) -> T) -> Option<T> {
        self.state.read().ok().map(|state| f(&state))
    }

    fn with_write<T>(
        &self,
        f: impl FnOnce(&mut State) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut state = self.state.write().map_err(|_| poisoned())?;
        f(&mut state)
    }
}

fn find_book_ci<'a>(state: &'a State, title: &str) -> Option<&'a Book> {
    state.books.values().find(|b| b.title_matches(title))
}

fn title_taken(state: &State, title: &str, except: Option<BookId>) -> bool {
    state
        .books
        .values()
        .any(|b| Some(b.id_typed()) != except && b.title_matches(title))
}

fn check_book_refs(state: &State, book: &Book) -> Result<(), StoreError> {
    if !state.authors.contains_key(&book.author_id()) {
        return Err(StoreError::ReferentialIntegrity("unknown author".to_string()));
    }
    if !state.categories.contains_key(&book.category_id()) {
        return Err(StoreError::ReferentialIntegrity("unknown category".to_string()));
    }
    Ok(())
}

impl InventoryStore for InMemoryBookstore {
    fn insert_book(&self, book: Book) -> Result<(), StoreError> {
        self.with_write(|state| {
            check_book_refs(state, &book)?;
            if title_taken(state, book.title(), None) {
                return Err(StoreError::Conflict(format!(
                    "book titled '{}' already exists",
                    book.title()
                )));
            }
            state.books.insert(book.id_typed(), book);
            Ok(())
        })
    }

    fn update_book(&self, book: Book) -> Result<(), StoreError> {
        self.with_write(|state| {
            if !state.books.contains_key(&book.id_typed()) {
                return Err(StoreError::NotFound);
            }
            check_book_refs(state, &book)?;
            if title_taken(state, book.title(), Some(book.id_typed())) {
                return Err(StoreError::Conflict(format!(
                    "book titled '{}' already exists",
                    book.title()
                )));
            }
            state.books.insert(book.id_typed(), book);
            Ok(())
        })
    }

    fn delete_book(&self, id: BookId) -> Result<(), StoreError> {
        self.with_write(|state| state.books.remove(&id).map(|_| ()).ok_or(StoreError::NotFound))
    }

    fn get_book(&self, id: BookId) -> Option<Book> {
        self.with_read(|state| state.books.get(&id).cloned()).flatten()
    }

    fn find_book_by_title(&self, title: &str) -> Option<Book> {
        self.with_read(|state| find_book_ci(state, title).cloned())
            .flatten()
    }

    fn list_books(&self) -> Vec<Book> {
        self.with_read(|state| {
            let mut books: Vec<Book> = state.books.values().cloned().collect();
            books.sort_by(|a, b| a.title().to_lowercase().cmp(&b.title().to_lowercase()));
            books
        })
        .unwrap_or_default()
    }

    fn decrement_stock(&self, id: BookId, amount: u32) -> Result<(), StoreError> {
        self.with_write(|state| {
            let book = state.books.get_mut(&id).ok_or(StoreError::NotFound)?;
            book.remove_stock(amount)
                .map_err(|e| StoreError::Conflict(e.to_string()))
        })
    }
}

impl AccountStore for InMemoryBookstore {
    fn insert_customer(&self, customer: Customer) -> Result<(), StoreError> {
        self.with_write(|state| {
            if state.customers.values().any(|c| c.same_credentials(&customer)) {
                return Err(StoreError::Conflict(
                    "customer with these credentials already exists".to_string(),
                ));
            }
            state.customers.insert(customer.id_typed(), customer);
            Ok(())
        })
    }

    fn update_customer(&self, customer: Customer) -> Result<(), StoreError> {
        self.with_write(|state| {
            if !state.customers.contains_key(&customer.id_typed()) {
                return Err(StoreError::NotFound);
            }
            state.customers.insert(customer.id_typed(), customer);
            Ok(())
        })
    }

    fn delete_customer(&self, id: CustomerId) -> Result<(), StoreError> {
        self.with_write(|state| {
            state
                .customers
                .remove(&id)
                .map(|_| ())
                .ok_or(StoreError::NotFound)
        })
    }

    fn get_customer(&self, id: CustomerId) -> Option<Customer> {
        self.with_read(|state| state.customers.get(&id).cloned())
            .flatten()
    }

    fn find_customer_by_credentials(&self, username: &str, password: &str) -> Option<Customer> {
        self.with_read(|state| {
            state
                .customers
                .values()
                .find(|c| c.matches_credentials(username, password))
                .cloned()
        })
        .flatten()
    }

    fn list_customers(&self) -> Vec<Customer> {
        self.with_read(|state| state.customers.values().cloned().collect())
            .unwrap_or_default()
    }

    fn debit_customer(&self, id: CustomerId, amount: u64) -> Result<(), StoreError> {
        self.with_write(|state| {
            let customer = state.customers.get_mut(&id).ok_or(StoreError::NotFound)?;
            customer
                .debit(amount)
                .map_err(|e| StoreError::Conflict(e.to_string()))
        })
    }
}

impl AdminDirectory for InMemoryBookstore {
    fn insert_admin(&self, admin: Admin) -> Result<(), StoreError> {
        self.with_write(|state| {
            if state.admins.values().any(|a| a.same_credentials(&admin)) {
                return Err(StoreError::Conflict(
                    "admin with these credentials already exists".to_string(),
                ));
            }
            state.admins.insert(admin.id_typed(), admin);
            Ok(())
        })
    }

    fn update_admin(&self, admin: Admin) -> Result<(), StoreError> {
        self.with_write(|state| {
            if !state.admins.contains_key(&admin.id_typed()) {
                return Err(StoreError::NotFound);
            }
            state.admins.insert(admin.id_typed(), admin);
            Ok(())
        })
    }

    fn delete_admin(&self, id: AdminId) -> Result<(), StoreError> {
        self.with_write(|state| state.admins.remove(&id).map(|_| ()).ok_or(StoreError::NotFound))
    }

    fn get_admin(&self, id: AdminId) -> Option<Admin> {
        self.with_read(|state| state.admins.get(&id).cloned()).flatten()
    }

    fn find_admin_by_credentials(&self, username: &str, password: &str) -> Option<Admin> {
        self.with_read(|state| {
            state
                .admins
                .values()
                .find(|a| a.matches_credentials(username, password))
                .cloned()
        })
        .flatten()
    }

    fn list_admins(&self) -> Vec<Admin> {
        self.with_read(|state| state.admins.values().cloned().collect())
            .unwrap_or_default()
    }
}

impl CatalogStore for InMemoryBookstore {
    fn insert_author(&self, author: Author) -> Result<(), StoreError> {
        self.with_write(|state| {
            state.authors.insert(author.id_typed(), author);
            Ok(())
        })
    }

    fn update_author(&self, author: Author) -> Result<(), StoreError> {
        self.with_write(|state| {
            if !state.authors.contains_key(&author.id_typed()) {
                return Err(StoreError::NotFound);
            }
            state.authors.insert(author.id_typed(), author);
            Ok(())
        })
    }

    fn delete_author(&self, id: AuthorId) -> Result<(), StoreError> {
        self.with_write(|state| {
            if state.books.values().any(|b| b.author_id() == id) {
                return Err(StoreError::Conflict(
                    "author still referenced by books".to_string(),
                ));
            }
            state.authors.remove(&id).map(|_| ()).ok_or(StoreError::NotFound)
        })
    }

    fn get_author(&self, id: AuthorId) -> Option<Author> {
        self.with_read(|state| state.authors.get(&id).cloned()).flatten()
    }

    fn list_authors(&self) -> Vec<Author> {
        self.with_read(|state| state.authors.values().cloned().collect())
            .unwrap_or_default()
    }

    fn insert_category(&self, category: Category) -> Result<(), StoreError> {
        self.with_write(|state| {
            state.categories.insert(category.id_typed(), category);
            Ok(())
        })
    }

    fn update_category(&self, category: Category) -> Result<(), StoreError> {
        self.with_write(|state| {
            if !state.categories.contains_key(&category.id_typed()) {
                return Err(StoreError::NotFound);
            }
            state.categories.insert(category.id_typed(), category);
            Ok(())
        })
    }

    fn delete_category(&self, id: CategoryId) -> Result<(), StoreError> {
        self.with_write(|state| {
            if state.books.values().any(|b| b.category_id() == id) {
                return Err(StoreError::Conflict(
                    "category still referenced by books".to_string(),
                ));
            }
            state
                .categories
                .remove(&id)
                .map(|_| ())
                .ok_or(StoreError::NotFound)
        })
    }

    fn get_category(&self, id: CategoryId) -> Option<Category> {
        self.with_read(|state| state.categories.get(&id).cloned())
            .flatten()
    }

    fn list_categories(&self) -> Vec<Category> {
        self.with_read(|state| state.categories.values().cloned().collect())
            .unwrap_or_default()
    }
}

impl ReviewStore for InMemoryBookstore {
    fn insert_review(&self, review: Review) -> Result<(), StoreError> {
        self.with_write(|state| {
            if !state.books.contains_key(&review.book_id()) {
                return Err(StoreError::ReferentialIntegrity("unknown book".to_string()));
            }
            if !state.customers.contains_key(&review.customer_id()) {
                return Err(StoreError::ReferentialIntegrity("unknown customer".to_string()));
            }
            state.reviews.insert(review.id_typed(), review);
            Ok(())
        })
    }

    fn update_review(&self, review: Review) -> Result<(), StoreError> {
        self.with_write(|state| {
            if !state.reviews.contains_key(&review.id_typed()) {
                return Err(StoreError::NotFound);
            }
            if !state.books.contains_key(&review.book_id()) {
                return Err(StoreError::ReferentialIntegrity("unknown book".to_string()));
            }
            if !state.customers.contains_key(&review.customer_id()) {
                return Err(StoreError::ReferentialIntegrity("unknown customer".to_string()));
            }
            state.reviews.insert(review.id_typed(), review);
            Ok(())
        })
    }

    fn delete_review(&self, id: ReviewId) -> Result<(), StoreError> {
        self.with_write(|state| state.reviews.remove(&id).map(|_| ()).ok_or(StoreError::NotFound))
    }

    fn get_review(&self, id: ReviewId) -> Option<Review> {
        self.with_read(|state| state.reviews.get(&id).cloned()).flatten()
    }

    fn list_reviews(&self) -> Vec<ReviewView> {
        self.with_read(|state| {
            state
                .reviews
                .values()
                .map(|review| ReviewView {
                    book_title: state
                        .books
                        .get(&review.book_id())
                        .map(|b| b.title().to_string())
                        .unwrap_or_default(),
                    review: review.clone(),
                })
                .collect()
        })
        .unwrap_or_default()
    }

    fn list_reviews_with_rating(&self, rating: u8) -> Vec<Review> {
        self.with_read(|state| {
            state
                .reviews
                .values()
                .filter(|r| r.rating() == rating)
                .cloned()
                .collect()
        })
        .unwrap_or_default()
    }
}

fn customer_summary(state: &State, id: CustomerId) -> Option<CustomerSummary> {
    state.customers.get(&id).map(|c| CustomerSummary {
        id: c.id_typed(),
        name: c.profile().name.clone(),
        username: c.profile().username.clone(),
        email: c.profile().email.clone(),
    })
}

fn book_summary(state: &State, id: BookId) -> Option<BookSummary> {
    state.books.get(&id).map(|b| BookSummary {
        id: b.id_typed(),
        title: b.title().to_string(),
        isbn: b.isbn().to_string(),
        unit_price: b.unit_price(),
    })
}

impl OrderLedger for InMemoryBookstore {
    fn append_order(&self, record: OrderRecord) -> Result<OrderId, StoreError> {
        self.with_write(|state| {
            let id = record.id_typed();
            state.orders.push(record);
            Ok(id)
        })
    }

    fn get_order(&self, id: OrderId) -> Option<OrderRecord> {
        self.with_read(|state| state.orders.iter().find(|o| o.id_typed() == id).cloned())
            .flatten()
    }

    fn list_orders(&self) -> Vec<OrderView> {
        self.with_read(|state| {
            state
                .orders
                .iter()
                .map(|order| OrderView {
                    customer: customer_summary(state, order.customer_id()),
                    book: book_summary(state, order.book_id()),
                    order: order.clone(),
                })
                .collect()
        })
        .unwrap_or_default()
    }

    fn list_orders_for_customer(&self, id: CustomerId) -> Vec<OrderRecord> {
        self.with_read(|state| {
            state
                .orders
                .iter()
                .filter(|o| o.customer_id() == id)
                .cloned()
                .collect()
        })
        .unwrap_or_default()
    }

    fn delete_order(&self, id: OrderId) -> Result<(), StoreError> {
        self.with_write(|state| {
            let before = state.orders.len();
            state.orders.retain(|o| o.id_typed() != id);
            if state.orders.len() == before {
                return Err(StoreError::NotFound);
            }
            Ok(())
        })
    }

    fn book_popularity(&self) -> Vec<BookPopularity> {
        self.with_read(|state| {
            let mut counts: HashMap<BookId, u64> = HashMap::new();
            for order in &state.orders {
                *counts.entry(order.book_id()).or_insert(0) += 1;
            }
            let mut popularity: Vec<BookPopularity> = counts
                .into_iter()
                .filter_map(|(book_id, order_count)| {
                    state.books.get(&book_id).map(|b| BookPopularity {
                        book_id,
                        title: b.title().to_string(),
                        order_count,
                    })
                })
                .collect();
            popularity.sort_by(|a, b| b.order_count.cmp(&a.order_count));
            popularity
        })
        .unwrap_or_default()
    }
}

impl PurchaseTransaction for InMemoryBookstore {
    /// Commit a staged purchase atomically.
    ///
    /// Everything is re-validated under the exclusive write guard: the
    /// orchestrator's reads may be stale by the time we get here, and the
    /// non-negative invariants must hold regardless. Mutated copies are
    /// staged first so the apply step is a set of plain inserts and cannot
    /// fail halfway.
    fn commit_purchase(&self, staged: StagedPurchase) -> Result<Vec<OrderId>, StoreError> {
        self.with_write(|state| {
            // Fold duplicate book entries defensively; the orchestrator
            // already accumulates, but the store must not trust it.
            let mut wanted: HashMap<BookId, u32> = HashMap::new();
            for d in &staged.decrements {
                let entry = wanted.entry(d.book_id).or_insert(0);
                *entry = entry.checked_add(d.quantity).ok_or_else(|| {
                    StoreError::Conflict("staged quantity overflows".to_string())
                })?;
            }

            let mut updated_books = Vec::with_capacity(wanted.len());
            for (book_id, quantity) in &wanted {
                let mut book = state
                    .books
                    .get(book_id)
                    .cloned()
                    .ok_or(StoreError::NotFound)?;
                book.remove_stock(*quantity)
                    .map_err(|e| StoreError::Conflict(e.to_string()))?;
                updated_books.push(book);
            }

            let mut customer = state
                .customers
                .get(&staged.customer_id)
                .cloned()
                .ok_or(StoreError::NotFound)?;
            customer
                .debit(staged.total_price)
                .map_err(|e| StoreError::Conflict(e.to_string()))?;

            // All checks passed; apply the staged copies.
            for book in updated_books {
                state.books.insert(book.id_typed(), book);
            }
            state.customers.insert(customer.id_typed(), customer);

            let mut order_ids = Vec::with_capacity(staged.records.len());
            for record in staged.records {
                order_ids.push(record.id_typed());
                state.orders.push(record);
            }
            Ok(order_ids)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookstore_accounts::{CustomerDraft, PersonProfile};
    use bookstore_catalog::{AuthorDraft, BookDraft, CategoryDraft};
    use bookstore_orders::OrderInstructions;
    use bookstore_reviews::ReviewDraft;
    use chrono::{NaiveDate, Utc};

    use crate::store::contract::StagedDecrement;

    fn seed_author(store: &InMemoryBookstore) -> AuthorId {
        let id = AuthorId::new();
        let author = Author::new(
            id,
            AuthorDraft {
                name: "Frank Herbert".to_string(),
                gender: "male".to_string(),
                age: 65,
                country: None,
                description: None,
                phone: None,
                city: None,
                email: None,
                website: None,
            },
        )
        .unwrap();
        store.insert_author(author).unwrap();
        id
    }

    fn seed_category(store: &InMemoryBookstore) -> CategoryId {
        let id = CategoryId::new();
        let category = Category::new(id, CategoryDraft { name: "Sci-Fi".to_string() }).unwrap();
        store.insert_category(category).unwrap();
        id
    }

    fn seed_book(store: &InMemoryBookstore, title: &str, unit_price: u64, quantity: u32) -> BookId {
        let author_id = seed_author(store);
        let category_id = seed_category(store);
        let id = BookId::new();
        let book = Book::new(
            id,
            BookDraft {
                title: title.to_string(),
                author_id,
                category_id,
                isbn: "9780441013593".to_string(),
                description: None,
                unit_price,
                quantity,
                published_date: NaiveDate::from_ymd_opt(1965, 8, 1).unwrap(),
                publisher: None,
                language: None,
                page_count: 412,
                rating: 5,
            },
        )
        .unwrap();
        store.insert_book(book).unwrap();
        id
    }

    fn seed_customer(store: &InMemoryBookstore, username: &str, balance: u64) -> CustomerId {
        let id = CustomerId::new();
        let customer = Customer::new(
            id,
            CustomerDraft {
                profile: PersonProfile {
                    username: username.to_string(),
                    name: "Paul Atreides".to_string(),
                    email: None,
                    phone: None,
                },
                password: "melange".to_string(),
                balance,
                gender: None,
                age: 19,
                country: "Arrakis".to_string(),
                description: None,
                city: None,
                street: None,
            },
        )
        .unwrap();
        store.insert_customer(customer).unwrap();
        id
    }

    fn instructions() -> OrderInstructions {
        OrderInstructions {
            payment_method: "card".to_string(),
            shipping_address: "1 Sietch Way".to_string(),
            billing_address: "1 Sietch Way".to_string(),
            delivery_date: Utc::now(),
        }
    }

    #[test]
    fn find_book_by_title_is_case_insensitive() {
        let store = InMemoryBookstore::new();
        seed_book(&store, "Dune", 2_000, 5);

        assert!(store.find_book_by_title("dune").is_some());
        assert!(store.find_book_by_title("DUNE").is_some());
        assert!(store.find_book_by_title("Dune Messiah").is_none());
    }

    #[test]
    fn duplicate_title_is_rejected() {
        let store = InMemoryBookstore::new();
        seed_book(&store, "Dune", 2_000, 5);

        let author_id = seed_author(&store);
        let category_id = seed_category(&store);
        let dup = Book::new(
            BookId::new(),
            BookDraft {
                title: "DUNE".to_string(),
                author_id,
                category_id,
                isbn: "9780441013593".to_string(),
                description: None,
                unit_price: 1_500,
                quantity: 1,
                published_date: NaiveDate::from_ymd_opt(1965, 8, 1).unwrap(),
                publisher: None,
                language: None,
                page_count: 412,
                rating: 4,
            },
        )
        .unwrap();

        let err = store.insert_book(dup).unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[test]
    fn decrement_stock_refuses_to_go_negative() {
        let store = InMemoryBookstore::new();
        let book_id = seed_book(&store, "Dune", 2_000, 5);

        let err = store.decrement_stock(book_id, 6).unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        assert_eq!(store.get_book(book_id).unwrap().quantity(), 5);

        store.decrement_stock(book_id, 5).unwrap();
        assert_eq!(store.get_book(book_id).unwrap().quantity(), 0);
    }

    #[test]
    fn debit_refuses_to_go_negative() {
        let store = InMemoryBookstore::new();
        let customer_id = seed_customer(&store, "paul", 10_000);

        let err = store.debit_customer(customer_id, 10_001).unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        assert_eq!(store.get_customer(customer_id).unwrap().balance(), 10_000);
    }

    #[test]
    fn duplicate_customer_credentials_are_rejected() {
        let store = InMemoryBookstore::new();
        seed_customer(&store, "paul", 10_000);

        let dup = Customer::new(
            CustomerId::new(),
            CustomerDraft {
                profile: PersonProfile {
                    username: "paul".to_string(),
                    name: "Impostor".to_string(),
                    email: None,
                    phone: None,
                },
                password: "melange".to_string(),
                balance: 0,
                gender: None,
                age: 30,
                country: "Giedi Prime".to_string(),
                description: None,
                city: None,
                street: None,
            },
        )
        .unwrap();

        let err = store.insert_customer(dup).unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[test]
    fn review_insert_requires_existing_references() {
        let store = InMemoryBookstore::new();
        let review = Review::new(
            ReviewId::new(),
            ReviewDraft {
                book_id: BookId::new(),
                customer_id: CustomerId::new(),
                rating: 4,
                comment: "Great".to_string(),
            },
            Utc::now(),
        )
        .unwrap();

        let err = store.insert_review(review).unwrap_err();
        assert!(matches!(err, StoreError::ReferentialIntegrity(_)));
    }

    #[test]
    fn commit_purchase_applies_all_mutations() {
        let store = InMemoryBookstore::new();
        let book_id = seed_book(&store, "Dune", 2_000, 5);
        let customer_id = seed_customer(&store, "paul", 10_000);

        let record = OrderRecord::completed(
            OrderId::new(),
            customer_id,
            book_id,
            Utc::now(),
            3,
            6_000,
            &instructions(),
        )
        .unwrap();

        let order_ids = store
            .commit_purchase(StagedPurchase {
                customer_id,
                total_price: 6_000,
                decrements: vec![StagedDecrement { book_id, quantity: 3 }],
                records: vec![record],
            })
            .unwrap();

        assert_eq!(order_ids.len(), 1);
        assert_eq!(store.get_book(book_id).unwrap().quantity(), 2);
        assert_eq!(store.get_customer(customer_id).unwrap().balance(), 4_000);
        assert_eq!(store.list_orders_for_customer(customer_id).len(), 1);
    }

    #[test]
    fn commit_purchase_rechecks_stock_and_leaves_state_untouched() {
        let store = InMemoryBookstore::new();
        let book_id = seed_book(&store, "Dune", 2_000, 5);
        let customer_id = seed_customer(&store, "paul", 100_000);

        // Simulates concurrent depletion: validation upstream saw more stock
        // than is left by commit time.
        let record = OrderRecord::completed(
            OrderId::new(),
            customer_id,
            book_id,
            Utc::now(),
            8,
            16_000,
            &instructions(),
        )
        .unwrap();

        let err = store
            .commit_purchase(StagedPurchase {
                customer_id,
                total_price: 16_000,
                decrements: vec![StagedDecrement { book_id, quantity: 8 }],
                records: vec![record],
            })
            .unwrap_err();

        assert!(matches!(err, StoreError::Conflict(_)));
        assert_eq!(store.get_book(book_id).unwrap().quantity(), 5);
        assert_eq!(store.get_customer(customer_id).unwrap().balance(), 100_000);
        assert!(store.list_orders_for_customer(customer_id).is_empty());
    }

    #[test]
    fn commit_purchase_rechecks_balance_and_leaves_state_untouched() {
        let store = InMemoryBookstore::new();
        let book_id = seed_book(&store, "Dune", 2_000, 5);
        let customer_id = seed_customer(&store, "paul", 1_000);

        let record = OrderRecord::completed(
            OrderId::new(),
            customer_id,
            book_id,
            Utc::now(),
            2,
            4_000,
            &instructions(),
        )
        .unwrap();

        let err = store
            .commit_purchase(StagedPurchase {
                customer_id,
                total_price: 4_000,
                decrements: vec![StagedDecrement { book_id, quantity: 2 }],
                records: vec![record],
            })
            .unwrap_err();

        assert!(matches!(err, StoreError::Conflict(_)));
        assert_eq!(store.get_book(book_id).unwrap().quantity(), 5);
        assert_eq!(store.get_customer(customer_id).unwrap().balance(), 1_000);
    }

    #[test]
    fn book_popularity_counts_orders() {
        let store = InMemoryBookstore::new();
        let book_id = seed_book(&store, "Dune", 2_000, 10);
        let customer_id = seed_customer(&store, "paul", 100_000);

        for _ in 0..3 {
            let record = OrderRecord::completed(
                OrderId::new(),
                customer_id,
                book_id,
                Utc::now(),
                1,
                2_000,
                &instructions(),
            )
            .unwrap();
            store.append_order(record).unwrap();
        }

        let popularity = store.book_popularity();
        assert_eq!(popularity.len(), 1);
        assert_eq!(popularity[0].title, "Dune");
        assert_eq!(popularity[0].order_count, 3);
    }
}
