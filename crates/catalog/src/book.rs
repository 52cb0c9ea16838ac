use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use bookstore_core::{AuthorId, BookId, CategoryId, DomainError, DomainResult, Entity};

/// Maximum unit price in minor units (source bound: 10_000.00).
const MAX_UNIT_PRICE: u64 = 1_000_000;

/// Validated input for creating or replacing a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookDraft {
    pub title: String,
    pub author_id: AuthorId,
    pub category_id: CategoryId,
    pub isbn: String,
    pub description: Option<String>,
    /// Unit price in minor units (cents).
    pub unit_price: u64,
    /// Quantity on hand.
    pub quantity: u32,
    pub published_date: NaiveDate,
    pub publisher: Option<String>,
    pub language: Option<String>,
    pub page_count: u32,
    /// Average rating, whole stars 0–5.
    pub rating: u8,
}

/// Entity: a book in the catalog, the unit of inventory.
///
/// The title is the unique lookup key (case-insensitive); uniqueness is
/// enforced by the store, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    id: BookId,
    title: String,
    author_id: AuthorId,
    category_id: CategoryId,
    isbn: String,
    description: Option<String>,
    unit_price: u64,
    quantity: u32,
    published_date: NaiveDate,
    publisher: Option<String>,
    language: Option<String>,
    page_count: u32,
    rating: u8,
}

impl Book {
    pub fn new(id: BookId, draft: BookDraft) -> DomainResult<Self> {
        validate_draft(&draft)?;
        Ok(Self {
            id,
            title: draft.title,
            author_id: draft.author_id,
            category_id: draft.category_id,
            isbn: draft.isbn,
            description: draft.description,
            unit_price: draft.unit_price,
            quantity: draft.quantity,
            published_date: draft.published_date,
            publisher: draft.publisher,
            language: draft.language,
            page_count: draft.page_count,
            rating: draft.rating,
        })
    }

    pub fn id_typed(&self) -> BookId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author_id(&self) -> AuthorId {
        self.author_id
    }

    pub fn category_id(&self) -> CategoryId {
        self.category_id
    }

    pub fn isbn(&self) -> &str {
        &self.isbn
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Unit price in minor units.
    pub fn unit_price(&self) -> u64 {
        self.unit_price
    }

    /// Quantity on hand.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn published_date(&self) -> NaiveDate {
        self.published_date
    }

    pub fn publisher(&self) -> Option<&str> {
        self.publisher.as_deref()
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    pub fn rating(&self) -> u8 {
        self.rating
    }

    pub fn in_stock(&self) -> bool {
        self.quantity > 0
    }

    /// Whether the given title matches this book's lookup key.
    pub fn title_matches(&self, title: &str) -> bool {
        self.title.eq_ignore_ascii_case(title)
    }

    /// Replace the mutable fields from a validated draft, keeping identity.
    pub fn apply_draft(&mut self, draft: BookDraft) -> DomainResult<()> {
        *self = Self::new(self.id, draft)?;
        Ok(())
    }

    /// Add received stock.
    pub fn receive_stock(&mut self, amount: u32) -> DomainResult<()> {
        self.quantity = self
            .quantity
            .checked_add(amount)
            .ok_or_else(|| DomainError::validation("stock amount overflows"))?;
        Ok(())
    }

    /// Remove stock (purchase path).
    pub fn remove_stock(&mut self, amount: u32) -> DomainResult<()> {
        if amount == 0 {
            return Err(DomainError::validation("amount cannot be zero"));
        }
        if amount > self.quantity {
            return Err(DomainError::invariant("stock cannot go negative"));
        }
        self.quantity -= amount;
        Ok(())
    }
}

impl Entity for Book {
    type Id = BookId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

fn validate_draft(draft: &BookDraft) -> DomainResult<()> {
    let title = draft.title.trim();
    if title.len() < 2 || title.len() > 100 {
        return Err(DomainError::validation("title must be 2-100 characters"));
    }
    let isbn = draft.isbn.trim();
    if isbn.len() < 10 || isbn.len() > 13 {
        return Err(DomainError::validation("isbn must be 10-13 characters"));
    }
    if let Some(desc) = &draft.description {
        if desc.len() > 500 {
            return Err(DomainError::validation("description cannot exceed 500 characters"));
        }
    }
    if draft.unit_price == 0 || draft.unit_price > MAX_UNIT_PRICE {
        return Err(DomainError::validation("unit_price must be positive and within bounds"));
    }
    if let Some(publisher) = &draft.publisher {
        if publisher.len() > 100 {
            return Err(DomainError::validation("publisher cannot exceed 100 characters"));
        }
    }
    if let Some(language) = &draft.language {
        if language.len() > 50 {
            return Err(DomainError::validation("language cannot exceed 50 characters"));
        }
    }
    if draft.page_count == 0 {
        return Err(DomainError::validation("page_count must be at least 1"));
    }
    if draft.rating > 5 {
        return Err(DomainError::validation("rating must be between 0 and 5"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_draft() -> BookDraft {
        BookDraft {
            title: "Dune".to_string(),
            author_id: AuthorId::new(),
            category_id: CategoryId::new(),
            isbn: "9780441013593".to_string(),
            description: Some("Desert planet epic".to_string()),
            unit_price: 2_000,
            quantity: 5,
            published_date: NaiveDate::from_ymd_opt(1965, 8, 1).unwrap(),
            publisher: Some("Chilton Books".to_string()),
            language: Some("English".to_string()),
            page_count: 412,
            rating: 5,
        }
    }

    #[test]
    fn new_book_accepts_valid_draft() {
        let book = Book::new(BookId::new(), test_draft()).unwrap();
        assert_eq!(book.title(), "Dune");
        assert_eq!(book.unit_price(), 2_000);
        assert_eq!(book.quantity(), 5);
    }

    #[test]
    fn title_lookup_is_case_insensitive() {
        let book = Book::new(BookId::new(), test_draft()).unwrap();
        assert!(book.title_matches("dune"));
        assert!(book.title_matches("DUNE"));
        assert!(!book.title_matches("dune 2"));
    }

    #[test]
    fn rejects_short_title() {
        let mut draft = test_draft();
        draft.title = "D".to_string();
        let err = Book::new(BookId::new(), draft).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn rejects_zero_price() {
        let mut draft = test_draft();
        draft.unit_price = 0;
        let err = Book::new(BookId::new(), draft).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn remove_stock_refuses_to_go_negative() {
        let mut book = Book::new(BookId::new(), test_draft()).unwrap();
        let err = book.remove_stock(6).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
        assert_eq!(book.quantity(), 5);

        book.remove_stock(5).unwrap();
        assert_eq!(book.quantity(), 0);
        assert!(!book.in_stock());
    }
}
