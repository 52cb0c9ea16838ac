use serde::{Deserialize, Serialize};

use bookstore_core::{DomainError, DomainResult, ValueObject};

/// Person-like fields shared by customers and administrators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonProfile {
    pub username: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl PersonProfile {
    pub fn validate(&self) -> DomainResult<()> {
        if self.username.trim().is_empty() || self.username.len() > 50 {
            return Err(DomainError::validation("username must be 1-50 characters"));
        }
        if self.name.trim().is_empty() || self.name.len() > 100 {
            return Err(DomainError::validation("name must be 1-100 characters"));
        }
        if let Some(email) = &self.email {
            if email.len() > 255 || !email.contains('@') {
                return Err(DomainError::validation("invalid email address"));
            }
        }
        if let Some(phone) = &self.phone {
            if phone.len() > 20 {
                return Err(DomainError::validation("phone cannot exceed 20 characters"));
            }
        }
        Ok(())
    }
}

impl ValueObject for PersonProfile {}
