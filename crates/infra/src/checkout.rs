//! Checkout orchestration (application-level purchase flow).
//!
//! The orchestrator validates a multi-line purchase against inventory and
//! the customer's balance, stages every mutation, and hands the whole set to
//! the store for an atomic commit. It performs no authorization and holds no
//! locks of its own; the store's transactional scope is the single
//! serialization point.
//!
//! ```text
//! PurchaseRequest
//!   ↓
//! 1. Validate request shape (lines, quantities, order metadata)
//!   ↓
//! 2. Resolve customer
//!   ↓
//! 3. Per line, in input order: resolve book by title (case-insensitive),
//!    check stock against quantity already staged for the same book,
//!    accumulate the total, stage the decrement + ledger record
//!   ↓
//! 4. Balance gate (after the loop — stock is staged per line, the balance
//!    check alone gates the commit)
//!   ↓
//! 5. commit_purchase(staged) — all-or-nothing at the store
//! ```
//!
//! Lines are processed sequentially in input order so the *first* offending
//! line is reported, deterministically.

use chrono::{DateTime, Utc};
use thiserror::Error;

use bookstore_core::{CustomerId, OrderId};
use bookstore_orders::{OrderInstructions, OrderRecord, PurchaseLine};

use crate::store::{
    AccountStore, InventoryStore, PurchaseTransaction, StagedDecrement, StagedPurchase, StoreError,
};

/// A multi-line purchase request. All fields are caller-supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseRequest {
    pub customer_id: CustomerId,
    pub lines: Vec<PurchaseLine>,
    pub instructions: OrderInstructions,
}

/// Success signal: the ledger rows written and the amount debited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseConfirmation {
    pub order_ids: Vec<OrderId>,
    /// Total debited from the customer, in minor units.
    pub total_charged: u64,
}

/// Purchase failure taxonomy.
///
/// Everything except `TransactionFailure` is recoverable by fixing the
/// request and resubmitting; there are no automatic retries.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    /// The request is malformed (empty lines, zero quantity, bad metadata,
    /// a total that overflows).
    #[error("invalid purchase request: {0}")]
    InvalidRequest(String),

    #[error("customer not found")]
    CustomerNotFound,

    #[error("book '{0}' not found")]
    BookNotFound(String),

    #[error("not enough stock available for book '{0}'")]
    InsufficientStock(String),

    #[error("insufficient balance for the total order")]
    InsufficientBalance,

    /// The store failed while committing. State is unchanged; the detail is
    /// diagnostic only.
    #[error("transaction failed: {0}")]
    TransactionFailure(String),
}

/// Purchase orchestrator, generic over its store collaborators.
///
/// `S` is typically a shared handle to the one store implementation (the
/// trait forwarding impls make `Arc<InMemoryBookstore>` usable directly).
#[derive(Debug, Clone)]
pub struct CheckoutService<S> {
    stores: S,
}

impl<S> CheckoutService<S> {
    pub fn new(stores: S) -> Self {
        Self { stores }
    }
}

impl<S> CheckoutService<S>
where
    S: InventoryStore + AccountStore + PurchaseTransaction,
{
    /// Execute a purchase: validate, stage, commit atomically.
    ///
    /// `now` stamps the ledger rows; pass `Utc::now()` outside of tests.
    pub fn execute_purchase(
        &self,
        request: PurchaseRequest,
        now: DateTime<Utc>,
    ) -> Result<PurchaseConfirmation, CheckoutError> {
        if request.lines.is_empty() {
            return Err(CheckoutError::InvalidRequest(
                "at least one purchase line is required".to_string(),
            ));
        }
        for line in &request.lines {
            line.validate()
                .map_err(|e| CheckoutError::InvalidRequest(e.to_string()))?;
        }
        request
            .instructions
            .validate()
            .map_err(|e| CheckoutError::InvalidRequest(e.to_string()))?;

        let customer = self
            .stores
            .get_customer(request.customer_id)
            .ok_or(CheckoutError::CustomerNotFound)?;

        let mut total_price: u64 = 0;
        let mut decrements: Vec<StagedDecrement> = Vec::new();
        let mut records: Vec<OrderRecord> = Vec::with_capacity(request.lines.len());

        for line in &request.lines {
            let book = self
                .stores
                .find_book_by_title(&line.book_title)
                .ok_or_else(|| CheckoutError::BookNotFound(line.book_title.clone()))?;

            // Stock already staged for this book by earlier lines counts
            // against what this line may take.
            let already_staged = decrements
                .iter()
                .find(|d| d.book_id == book.id_typed())
                .map(|d| d.quantity)
                .unwrap_or(0);
            let available = book.quantity().saturating_sub(already_staged);
            if line.quantity > available {
                return Err(CheckoutError::InsufficientStock(line.book_title.clone()));
            }

            let line_total = book
                .unit_price()
                .checked_mul(u64::from(line.quantity))
                .ok_or_else(|| {
                    CheckoutError::InvalidRequest("line total overflows".to_string())
                })?;
            total_price = total_price.checked_add(line_total).ok_or_else(|| {
                CheckoutError::InvalidRequest("order total overflows".to_string())
            })?;

            match decrements.iter_mut().find(|d| d.book_id == book.id_typed()) {
                Some(staged) => staged.quantity += line.quantity,
                None => decrements.push(StagedDecrement {
                    book_id: book.id_typed(),
                    quantity: line.quantity,
                }),
            }

            let record = OrderRecord::completed(
                OrderId::new(),
                request.customer_id,
                book.id_typed(),
                now,
                line.quantity,
                line_total,
                &request.instructions,
            )
            .map_err(|e| CheckoutError::InvalidRequest(e.to_string()))?;
            records.push(record);
        }

        // Balance is checked once, after the loop; staged stock never
        // reaches the store if it fails here.
        if !customer.can_afford(total_price) {
            return Err(CheckoutError::InsufficientBalance);
        }

        let line_count = records.len();
        let order_ids = self
            .stores
            .commit_purchase(StagedPurchase {
                customer_id: request.customer_id,
                total_price,
                decrements,
                records,
            })
            .map_err(|e| match e {
                StoreError::NotFound => {
                    CheckoutError::TransactionFailure("row vanished during commit".to_string())
                }
                other => CheckoutError::TransactionFailure(other.to_string()),
            })?;

        tracing::info!(
            customer_id = %request.customer_id,
            lines = line_count,
            total_price,
            "purchase committed"
        );

        Ok(PurchaseConfirmation {
            order_ids,
            total_charged: total_price,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use bookstore_accounts::{Customer, CustomerDraft, PersonProfile};
    use bookstore_catalog::{Author, AuthorDraft, Book, BookDraft, Category, CategoryDraft};
    use bookstore_core::{AuthorId, BookId, CategoryId};
    use chrono::NaiveDate;
    use proptest::prelude::*;

    use crate::store::{CatalogStore, InMemoryBookstore, OrderLedger};

    fn service(store: &Arc<InMemoryBookstore>) -> CheckoutService<Arc<InMemoryBookstore>> {
        CheckoutService::new(Arc::clone(store))
    }

    fn seed_refs(store: &InMemoryBookstore) -> (AuthorId, CategoryId) {
        let author_id = AuthorId::new();
        store
            .insert_author(
                Author::new(
                    author_id,
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
                .unwrap(),
            )
            .unwrap();

        let category_id = CategoryId::new();
        store
            .insert_category(
                Category::new(category_id, CategoryDraft { name: "Sci-Fi".to_string() }).unwrap(),
            )
            .unwrap();

        (author_id, category_id)
    }

    fn seed_book(
        store: &InMemoryBookstore,
        refs: (AuthorId, CategoryId),
        title: &str,
        unit_price: u64,
        quantity: u32,
    ) -> BookId {
        let id = BookId::new();
        store
            .insert_book(
                Book::new(
                    id,
                    BookDraft {
                        title: title.to_string(),
                        author_id: refs.0,
                        category_id: refs.1,
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
                .unwrap(),
            )
            .unwrap();
        id
    }

    fn seed_customer(store: &InMemoryBookstore, balance: u64) -> CustomerId {
        let id = CustomerId::new();
        store
            .insert_customer(
                Customer::new(
                    id,
                    CustomerDraft {
                        profile: PersonProfile {
                            username: "paul".to_string(),
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
                .unwrap(),
            )
            .unwrap();
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

    fn line(title: &str, quantity: u32) -> PurchaseLine {
        PurchaseLine {
            book_title: title.to_string(),
            quantity,
        }
    }

    fn request(customer_id: CustomerId, lines: Vec<PurchaseLine>) -> PurchaseRequest {
        PurchaseRequest {
            customer_id,
            lines,
            instructions: instructions(),
        }
    }

    #[test]
    fn purchase_succeeds_and_mutates_all_three_stores() {
        // spec scenario: balance 100.00, "Dune" price 20.00 stock 5, buy 3
        let store = Arc::new(InMemoryBookstore::new());
        let refs = seed_refs(&store);
        let book_id = seed_book(&store, refs, "Dune", 2_000, 5);
        let customer_id = seed_customer(&store, 10_000);

        let confirmation = service(&store)
            .execute_purchase(request(customer_id, vec![line("Dune", 3)]), Utc::now())
            .unwrap();

        assert_eq!(confirmation.order_ids.len(), 1);
        assert_eq!(confirmation.total_charged, 6_000);
        assert_eq!(store.get_book(book_id).unwrap().quantity(), 2);
        assert_eq!(store.get_customer(customer_id).unwrap().balance(), 4_000);

        let orders = store.list_orders_for_customer(customer_id);
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].quantity(), 3);
        assert_eq!(orders[0].line_total(), 6_000);
    }

    #[test]
    fn title_resolution_is_case_insensitive() {
        let store = Arc::new(InMemoryBookstore::new());
        let refs = seed_refs(&store);
        seed_book(&store, refs, "Dune", 2_000, 5);
        let customer_id = seed_customer(&store, 10_000);

        let confirmation = service(&store)
            .execute_purchase(request(customer_id, vec![line("dUnE", 1)]), Utc::now())
            .unwrap();
        assert_eq!(confirmation.total_charged, 2_000);
    }

    #[test]
    fn insufficient_stock_fails_without_any_mutation() {
        // spec scenario: buy 10 of stock 5
        let store = Arc::new(InMemoryBookstore::new());
        let refs = seed_refs(&store);
        let book_id = seed_book(&store, refs, "Dune", 2_000, 5);
        let customer_id = seed_customer(&store, 10_000);

        let err = service(&store)
            .execute_purchase(request(customer_id, vec![line("Dune", 10)]), Utc::now())
            .unwrap_err();

        assert_eq!(err, CheckoutError::InsufficientStock("Dune".to_string()));
        assert_eq!(store.get_book(book_id).unwrap().quantity(), 5);
        assert_eq!(store.get_customer(customer_id).unwrap().balance(), 10_000);
        assert!(store.list_orders_for_customer(customer_id).is_empty());
    }

    #[test]
    fn unknown_title_reports_the_offending_line() {
        let store = Arc::new(InMemoryBookstore::new());
        let refs = seed_refs(&store);
        let book_id = seed_book(&store, refs, "Dune", 2_000, 5);
        let customer_id = seed_customer(&store, 10_000);

        let err = service(&store)
            .execute_purchase(
                request(
                    customer_id,
                    vec![line("Dune", 1), line("Dune Messiah", 1)],
                ),
                Utc::now(),
            )
            .unwrap_err();

        assert_eq!(err, CheckoutError::BookNotFound("Dune Messiah".to_string()));
        assert_eq!(store.get_book(book_id).unwrap().quantity(), 5);
        assert!(store.list_orders_for_customer(customer_id).is_empty());
    }

    #[test]
    fn first_offending_line_wins() {
        let store = Arc::new(InMemoryBookstore::new());
        let refs = seed_refs(&store);
        seed_book(&store, refs, "Dune", 2_000, 1);
        let customer_id = seed_customer(&store, 10_000);

        // Line 1 oversells, line 2 names a missing book; line 1 is reported.
        let err = service(&store)
            .execute_purchase(
                request(customer_id, vec![line("Dune", 5), line("Missing", 1)]),
                Utc::now(),
            )
            .unwrap_err();
        assert_eq!(err, CheckoutError::InsufficientStock("Dune".to_string()));
    }

    #[test]
    fn missing_customer_fails_before_any_lookup() {
        let store = Arc::new(InMemoryBookstore::new());
        let refs = seed_refs(&store);
        seed_book(&store, refs, "Dune", 2_000, 5);

        let err = service(&store)
            .execute_purchase(request(CustomerId::new(), vec![line("Dune", 1)]), Utc::now())
            .unwrap_err();
        assert_eq!(err, CheckoutError::CustomerNotFound);
    }

    #[test]
    fn insufficient_balance_leaves_no_partial_stock_decrement() {
        let store = Arc::new(InMemoryBookstore::new());
        let refs = seed_refs(&store);
        let dune = seed_book(&store, refs, "Dune", 2_000, 5);
        let heretics = seed_book(&store, refs, "Heretics of Dune", 3_000, 5);
        let customer_id = seed_customer(&store, 5_000);

        // 2 * 2000 + 1 * 3000 = 7000 > 5000, but all stock checks pass.
        let err = service(&store)
            .execute_purchase(
                request(
                    customer_id,
                    vec![line("Dune", 2), line("Heretics of Dune", 1)],
                ),
                Utc::now(),
            )
            .unwrap_err();

        assert_eq!(err, CheckoutError::InsufficientBalance);
        assert_eq!(store.get_book(dune).unwrap().quantity(), 5);
        assert_eq!(store.get_book(heretics).unwrap().quantity(), 5);
        assert_eq!(store.get_customer(customer_id).unwrap().balance(), 5_000);
        assert!(store.list_orders_for_customer(customer_id).is_empty());
    }

    #[test]
    fn duplicate_titles_accumulate_against_stock() {
        let store = Arc::new(InMemoryBookstore::new());
        let refs = seed_refs(&store);
        let book_id = seed_book(&store, refs, "Dune", 2_000, 3);
        let customer_id = seed_customer(&store, 100_000);

        // 2 + 2 exceeds stock 3 even though each line alone fits.
        let err = service(&store)
            .execute_purchase(
                request(customer_id, vec![line("Dune", 2), line("dune", 2)]),
                Utc::now(),
            )
            .unwrap_err();
        assert_eq!(err, CheckoutError::InsufficientStock("dune".to_string()));
        assert_eq!(store.get_book(book_id).unwrap().quantity(), 3);

        // 2 + 1 fits: one ledger record per line, one combined decrement.
        let confirmation = service(&store)
            .execute_purchase(
                request(customer_id, vec![line("Dune", 2), line("dune", 1)]),
                Utc::now(),
            )
            .unwrap();
        assert_eq!(confirmation.order_ids.len(), 2);
        assert_eq!(store.get_book(book_id).unwrap().quantity(), 0);
        assert_eq!(store.list_orders_for_customer(customer_id).len(), 2);
    }

    #[test]
    fn repeating_a_failing_request_is_idempotent() {
        let store = Arc::new(InMemoryBookstore::new());
        let refs = seed_refs(&store);
        let book_id = seed_book(&store, refs, "Dune", 2_000, 5);
        let customer_id = seed_customer(&store, 1_000);

        let req = request(customer_id, vec![line("Dune", 1)]);
        let first = service(&store)
            .execute_purchase(req.clone(), Utc::now())
            .unwrap_err();
        let second = service(&store)
            .execute_purchase(req, Utc::now())
            .unwrap_err();

        assert_eq!(first, CheckoutError::InsufficientBalance);
        assert_eq!(first, second);
        assert_eq!(store.get_book(book_id).unwrap().quantity(), 5);
        assert_eq!(store.get_customer(customer_id).unwrap().balance(), 1_000);
    }

    #[test]
    fn rejects_empty_and_malformed_requests() {
        let store = Arc::new(InMemoryBookstore::new());
        let refs = seed_refs(&store);
        seed_book(&store, refs, "Dune", 2_000, 5);
        let customer_id = seed_customer(&store, 10_000);
        let svc = service(&store);

        let err = svc
            .execute_purchase(request(customer_id, vec![]), Utc::now())
            .unwrap_err();
        assert!(matches!(err, CheckoutError::InvalidRequest(_)));

        let err = svc
            .execute_purchase(request(customer_id, vec![line("Dune", 0)]), Utc::now())
            .unwrap_err();
        assert!(matches!(err, CheckoutError::InvalidRequest(_)));

        let mut bad_instructions = request(customer_id, vec![line("Dune", 1)]);
        bad_instructions.instructions.payment_method = String::new();
        let err = svc
            .execute_purchase(bad_instructions, Utc::now())
            .unwrap_err();
        assert!(matches!(err, CheckoutError::InvalidRequest(_)));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: every successful purchase conserves value — the balance
        /// drops by exactly the summed line totals, each book's stock drops
        /// by exactly its summed quantities, and one ledger row exists per
        /// line.
        #[test]
        fn successful_purchase_conserves_stock_and_balance(
            picks in prop::collection::vec((0usize..3, 1u32..5), 1..6)
        ) {
            let store = Arc::new(InMemoryBookstore::new());
            let refs = seed_refs(&store);
            let titles = ["Dune", "Dune Messiah", "Children of Dune"];
            let prices = [2_000u64, 1_500, 1_200];
            let mut book_ids = Vec::new();
            for (title, price) in titles.iter().zip(prices) {
                // Stock 40 can absorb any generated pick set (max 5 lines * 4).
                book_ids.push(seed_book(&store, refs, title, price, 40));
            }
            let customer_id = seed_customer(&store, 1_000_000);

            let lines: Vec<PurchaseLine> = picks
                .iter()
                .map(|(idx, qty)| line(titles[*idx], *qty))
                .collect();

            let mut expected_total = 0u64;
            let mut expected_qty = [0u32; 3];
            for (idx, qty) in &picks {
                expected_total += prices[*idx] * u64::from(*qty);
                expected_qty[*idx] += qty;
            }

            let confirmation = service(&store)
                .execute_purchase(request(customer_id, lines), Utc::now())
                .unwrap();

            prop_assert_eq!(confirmation.total_charged, expected_total);
            prop_assert_eq!(confirmation.order_ids.len(), picks.len());
            prop_assert_eq!(
                store.get_customer(customer_id).unwrap().balance(),
                1_000_000 - expected_total
            );
            for (idx, book_id) in book_ids.iter().enumerate() {
                prop_assert_eq!(
                    store.get_book(*book_id).unwrap().quantity(),
                    40 - expected_qty[idx]
                );
            }
            prop_assert_eq!(
                store.list_orders_for_customer(customer_id).len(),
                picks.len()
            );
        }
    }
}
