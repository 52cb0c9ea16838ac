//! `bookstore-orders` — the order ledger domain.
//!
//! [`OrderRecord`] is the append-only ledger entry written by the checkout
//! flow (one per purchased line); [`PurchaseLine`] and [`OrderInstructions`]
//! are the ephemeral request inputs.

pub mod record;

pub use record::{OrderInstructions, OrderRecord, OrderStatus, PurchaseLine};
