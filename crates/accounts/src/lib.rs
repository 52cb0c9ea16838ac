//! `bookstore-accounts` — account holders: customers and administrators.
//!
//! Shared person-like fields live in an embedded [`PersonProfile`] value
//! rather than an inheritance chain; `Customer` and `Admin` extend it with
//! role-specific fields.

pub mod admin;
pub mod customer;
pub mod person;

pub use admin::{Admin, AdminDraft};
pub use customer::{Customer, CustomerDraft};
pub use person::PersonProfile;
