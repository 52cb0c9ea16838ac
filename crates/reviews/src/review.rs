use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bookstore_core::{BookId, CustomerId, DomainError, DomainResult, Entity, ReviewId};

/// Validated input for creating or replacing a review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewDraft {
    pub book_id: BookId,
    pub customer_id: CustomerId,
    /// Star rating, 1–5.
    pub rating: u8,
    pub comment: String,
}

/// Entity: a customer's review of a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    id: ReviewId,
    book_id: BookId,
    customer_id: CustomerId,
    rating: u8,
    comment: String,
    review_date: DateTime<Utc>,
    likes: u32,
    dislikes: u32,
    response: Option<String>,
    response_date: Option<DateTime<Utc>>,
}

impl Review {
    pub fn new(id: ReviewId, draft: ReviewDraft, review_date: DateTime<Utc>) -> DomainResult<Self> {
        validate_draft(&draft)?;
        Ok(Self {
            id,
            book_id: draft.book_id,
            customer_id: draft.customer_id,
            rating: draft.rating,
            comment: draft.comment,
            review_date,
            likes: 0,
            dislikes: 0,
            response: None,
            response_date: None,
        })
    }

    pub fn id_typed(&self) -> ReviewId {
        self.id
    }

    pub fn book_id(&self) -> BookId {
        self.book_id
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn rating(&self) -> u8 {
        self.rating
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn review_date(&self) -> DateTime<Utc> {
        self.review_date
    }

    pub fn likes(&self) -> u32 {
        self.likes
    }

    pub fn dislikes(&self) -> u32 {
        self.dislikes
    }

    pub fn response(&self) -> Option<&str> {
        self.response.as_deref()
    }

    pub fn response_date(&self) -> Option<DateTime<Utc>> {
        self.response_date
    }

    pub fn like(&mut self) {
        self.likes = self.likes.saturating_add(1);
    }

    pub fn dislike(&mut self) {
        self.dislikes = self.dislikes.saturating_add(1);
    }

    /// Attach a staff response.
    pub fn respond(&mut self, text: String, at: DateTime<Utc>) -> DomainResult<()> {
        if text.trim().is_empty() || text.len() > 255 {
            return Err(DomainError::validation("response must be 1-255 characters"));
        }
        self.response = Some(text);
        self.response_date = Some(at);
        Ok(())
    }

    /// Replace rating and comment from a validated draft, keeping identity,
    /// references, and reaction counts.
    pub fn apply_draft(&mut self, draft: ReviewDraft) -> DomainResult<()> {
        validate_draft(&draft)?;
        self.book_id = draft.book_id;
        self.customer_id = draft.customer_id;
        self.rating = draft.rating;
        self.comment = draft.comment;
        Ok(())
    }
}

impl Entity for Review {
    type Id = ReviewId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

fn validate_draft(draft: &ReviewDraft) -> DomainResult<()> {
    if draft.rating < 1 || draft.rating > 5 {
        return Err(DomainError::validation("rating must be between 1 and 5"));
    }
    if draft.comment.trim().is_empty() || draft.comment.len() > 255 {
        return Err(DomainError::validation("comment must be 1-255 characters"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_draft() -> ReviewDraft {
        ReviewDraft {
            book_id: BookId::new(),
            customer_id: CustomerId::new(),
            rating: 5,
            comment: "A masterpiece".to_string(),
        }
    }

    #[test]
    fn new_review_starts_without_reactions() {
        let review = Review::new(ReviewId::new(), test_draft(), Utc::now()).unwrap();
        assert_eq!(review.likes(), 0);
        assert_eq!(review.dislikes(), 0);
        assert!(review.response().is_none());
    }

    #[test]
    fn rejects_zero_rating() {
        let mut draft = test_draft();
        draft.rating = 0;
        let err = Review::new(ReviewId::new(), draft, Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn respond_sets_text_and_timestamp() {
        let mut review = Review::new(ReviewId::new(), test_draft(), Utc::now()).unwrap();
        let at = Utc::now();
        review.respond("Thank you".to_string(), at).unwrap();
        assert_eq!(review.response(), Some("Thank you"));
        assert_eq!(review.response_date(), Some(at));
    }
}
