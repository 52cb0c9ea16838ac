use serde::{Deserialize, Serialize};

use bookstore_core::{CategoryId, DomainError, DomainResult, Entity};

/// Validated input for creating or replacing a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDraft {
    pub name: String,
}

/// Entity: a catalog category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    id: CategoryId,
    name: String,
}

impl Category {
    pub fn new(id: CategoryId, draft: CategoryDraft) -> DomainResult<Self> {
        if draft.name.trim().is_empty() || draft.name.len() > 100 {
            return Err(DomainError::validation("name must be 1-100 characters"));
        }
        Ok(Self { id, name: draft.name })
    }

    pub fn id_typed(&self) -> CategoryId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn apply_draft(&mut self, draft: CategoryDraft) -> DomainResult<()> {
        *self = Self::new(self.id, draft)?;
        Ok(())
    }
}

impl Entity for Category {
    type Id = CategoryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_category_accepts_valid_name() {
        let category = Category::new(
            CategoryId::new(),
            CategoryDraft { name: "Science Fiction".to_string() },
        )
        .unwrap();
        assert_eq!(category.name(), "Science Fiction");
    }

    #[test]
    fn rejects_blank_name() {
        let err = Category::new(CategoryId::new(), CategoryDraft { name: "".to_string() })
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
