//! `bookstore-reviews` — customer reviews of catalog books.

pub mod review;

pub use review::{Review, ReviewDraft};
