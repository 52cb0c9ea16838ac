use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use bookstore_accounts::{Admin, AdminDraft, PersonProfile};
use bookstore_auth::{Hs256Jwt, JwtValidator};
use bookstore_catalog::Book;
use bookstore_core::AdminId;
use bookstore_infra::{AdminDirectory, CheckoutService, InMemoryBookstore, InventoryStore};

/// How long the book listing is served from cache before re-reading the
/// store.
const BOOK_CACHE_TTL: Duration = Duration::from_secs(600);

#[derive(Debug)]
struct CacheEntry {
    fetched_at: Instant,
    books: Vec<Book>,
}

/// TTL read cache for the full book listing. Mutations invalidate it.
#[derive(Debug, Default)]
struct BookListCache {
    inner: Mutex<Option<CacheEntry>>,
}

/// Shared application services: the store, the checkout orchestrator, the
/// token codec, and the book-list cache.
pub struct AppServices {
    store: Arc<InMemoryBookstore>,
    checkout: CheckoutService<Arc<InMemoryBookstore>>,
    jwt: Arc<Hs256Jwt>,
    root_admin_id: AdminId,
    book_cache: BookListCache,
}

impl AppServices {
    /// Wire up the in-memory services and seed the root administrator.
    pub fn build(jwt_secret: String) -> Self {
        let store = Arc::new(InMemoryBookstore::new());
        let checkout = CheckoutService::new(Arc::clone(&store));
        let root_admin_id = seed_root_admin(&store);

        Self {
            store,
            checkout,
            jwt: Arc::new(Hs256Jwt::new(jwt_secret)),
            root_admin_id,
            book_cache: BookListCache::default(),
        }
    }

    pub fn store(&self) -> &Arc<InMemoryBookstore> {
        &self.store
    }

    pub fn checkout(&self) -> &CheckoutService<Arc<InMemoryBookstore>> {
        &self.checkout
    }

    pub fn jwt(&self) -> &Hs256Jwt {
        &self.jwt
    }

    /// The validator handle used by the auth middleware.
    pub fn jwt_dyn(&self) -> Arc<dyn JwtValidator> {
        Arc::clone(&self.jwt) as Arc<dyn JwtValidator>
    }

    /// The seeded root administrator (the only `SuperAdmin` subject).
    pub fn root_admin_id(&self) -> AdminId {
        self.root_admin_id
    }

    /// Book listing, served through the TTL cache.
    pub fn list_books_cached(&self) -> Vec<Book> {
        let Ok(mut slot) = self.book_cache.inner.lock() else {
            return self.store.list_books();
        };

        if let Some(entry) = slot.as_ref() {
            if entry.fetched_at.elapsed() < BOOK_CACHE_TTL {
                return entry.books.clone();
            }
        }

        let books = self.store.list_books();
        *slot = Some(CacheEntry {
            fetched_at: Instant::now(),
            books: books.clone(),
        });
        books
    }

    /// Drop the cached book listing (called by every book mutation).
    pub fn invalidate_book_cache(&self) {
        if let Ok(mut slot) = self.book_cache.inner.lock() {
            *slot = None;
        }
    }
}

/// Seed the root administrator so the admin login works on a fresh store.
///
/// Credentials come from the environment, with an insecure dev default
/// mirroring the `JWT_SECRET` handling in `main.rs`.
fn seed_root_admin(store: &InMemoryBookstore) -> AdminId {
    let username = std::env::var("BOOKSTORE_ROOT_USER").unwrap_or_else(|_| {
        tracing::warn!("BOOKSTORE_ROOT_USER not set; using insecure dev default");
        "root".to_string()
    });
    let password = std::env::var("BOOKSTORE_ROOT_PASSWORD").unwrap_or_else(|_| {
        tracing::warn!("BOOKSTORE_ROOT_PASSWORD not set; using insecure dev default");
        "root".to_string()
    });

    let id = AdminId::new();
    let admin = Admin::new(
        id,
        AdminDraft {
            profile: PersonProfile {
                username,
                name: "Root Administrator".to_string(),
                email: None,
                phone: None,
            },
            password,
        },
    )
    .unwrap_or_else(|e| {
        tracing::warn!(error = %e, "invalid root admin credentials; falling back to dev default");
        Admin::new(
            id,
            AdminDraft {
                profile: PersonProfile {
                    username: "root".to_string(),
                    name: "Root Administrator".to_string(),
                    email: None,
                    phone: None,
                },
                password: "root".to_string(),
            },
        )
        .expect("default root admin draft is valid")
    });

    if let Err(e) = store.insert_admin(admin) {
        tracing::error!(error = %e, "failed to seed root admin");
    }
    id
}
