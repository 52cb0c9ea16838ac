use serde::{Deserialize, Serialize};

use bookstore_core::{AuthorId, DomainError, DomainResult, Entity};

/// Validated input for creating or replacing an author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorDraft {
    pub name: String,
    pub gender: String,
    pub age: u8,
    pub country: Option<String>,
    pub description: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
}

/// Entity: a book author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    id: AuthorId,
    name: String,
    gender: String,
    age: u8,
    country: Option<String>,
    description: Option<String>,
    phone: Option<String>,
    city: Option<String>,
    email: Option<String>,
    website: Option<String>,
}

impl Author {
    pub fn new(id: AuthorId, draft: AuthorDraft) -> DomainResult<Self> {
        if draft.name.trim().is_empty() || draft.name.len() > 100 {
            return Err(DomainError::validation("name must be 1-100 characters"));
        }
        if draft.gender.len() > 10 {
            return Err(DomainError::validation("gender cannot exceed 10 characters"));
        }
        if draft.age > 150 {
            return Err(DomainError::validation("age must be between 0 and 150"));
        }
        if let Some(description) = &draft.description {
            if description.len() > 500 {
                return Err(DomainError::validation("description cannot exceed 500 characters"));
            }
        }
        Ok(Self {
            id,
            name: draft.name,
            gender: draft.gender,
            age: draft.age,
            country: draft.country,
            description: draft.description,
            phone: draft.phone,
            city: draft.city,
            email: draft.email,
            website: draft.website,
        })
    }

    pub fn id_typed(&self) -> AuthorId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn gender(&self) -> &str {
        &self.gender
    }

    pub fn age(&self) -> u8 {
        self.age
    }

    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn website(&self) -> Option<&str> {
        self.website.as_deref()
    }

    pub fn apply_draft(&mut self, draft: AuthorDraft) -> DomainResult<()> {
        *self = Self::new(self.id, draft)?;
        Ok(())
    }
}

impl Entity for Author {
    type Id = AuthorId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
