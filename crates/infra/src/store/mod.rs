//! Storage abstractions and the in-memory implementation.

pub mod contract;
pub mod in_memory;

pub use contract::{
    AccountStore, AdminDirectory, BookPopularity, BookSummary, CatalogStore, CustomerSummary,
    InventoryStore, OrderLedger, OrderView, PurchaseTransaction, ReviewStore, ReviewView,
    StagedDecrement, StagedPurchase, StoreError,
};
pub use in_memory::InMemoryBookstore;
