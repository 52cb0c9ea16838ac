use serde::{Deserialize, Serialize};

use bookstore_core::{CustomerId, DomainError, DomainResult, Entity};

use crate::person::PersonProfile;

/// Validated input for creating or replacing a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDraft {
    pub profile: PersonProfile,
    /// Stored as provided; credential hardening is out of scope here.
    pub password: String,
    /// Opening balance in minor units.
    pub balance: u64,
    pub gender: Option<String>,
    pub age: u8,
    pub country: String,
    pub description: Option<String>,
    pub city: Option<String>,
    pub street: Option<String>,
}

/// Entity: a customer account with purchasing balance.
///
/// Not serializable; the wire representation is mapped at the API layer so
/// the password never leaves the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    id: CustomerId,
    profile: PersonProfile,
    password: String,
    balance: u64,
    gender: Option<String>,
    age: u8,
    country: String,
    description: Option<String>,
    city: Option<String>,
    street: Option<String>,
}

impl Customer {
    pub fn new(id: CustomerId, draft: CustomerDraft) -> DomainResult<Self> {
        draft.profile.validate()?;
        if draft.password.is_empty() || draft.password.len() > 100 {
            return Err(DomainError::validation("password must be 1-100 characters"));
        }
        if let Some(gender) = &draft.gender {
            if gender.len() > 10 {
                return Err(DomainError::validation("gender cannot exceed 10 characters"));
            }
        }
        if draft.age > 150 {
            return Err(DomainError::validation("age must be between 0 and 150"));
        }
        if draft.country.trim().is_empty() || draft.country.len() > 100 {
            return Err(DomainError::validation("country must be 1-100 characters"));
        }
        if let Some(description) = &draft.description {
            if description.len() > 500 {
                return Err(DomainError::validation("description cannot exceed 500 characters"));
            }
        }
        Ok(Self {
            id,
            profile: draft.profile,
            password: draft.password,
            balance: draft.balance,
            gender: draft.gender,
            age: draft.age,
            country: draft.country,
            description: draft.description,
            city: draft.city,
            street: draft.street,
        })
    }

    pub fn id_typed(&self) -> CustomerId {
        self.id
    }

    pub fn profile(&self) -> &PersonProfile {
        &self.profile
    }

    pub fn username(&self) -> &str {
        &self.profile.username
    }

    /// Balance in minor units.
    pub fn balance(&self) -> u64 {
        self.balance
    }

    pub fn gender(&self) -> Option<&str> {
        self.gender.as_deref()
    }

    pub fn age(&self) -> u8 {
        self.age
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    pub fn street(&self) -> Option<&str> {
        self.street.as_deref()
    }

    /// Plaintext credential match (hardening is out of scope).
    pub fn matches_credentials(&self, username: &str, password: &str) -> bool {
        self.profile.username == username && self.password == password
    }

    /// Whether another account carries the same username + password pair.
    /// Used by the store's duplicate-signup guard.
    pub fn same_credentials(&self, other: &Customer) -> bool {
        self.profile.username == other.profile.username && self.password == other.password
    }

    pub fn can_afford(&self, total: u64) -> bool {
        self.balance >= total
    }

    /// Debit the balance (purchase path).
    pub fn debit(&mut self, amount: u64) -> DomainResult<()> {
        if amount > self.balance {
            return Err(DomainError::invariant("balance cannot go negative"));
        }
        self.balance -= amount;
        Ok(())
    }

    /// Credit the balance (top-up path).
    pub fn credit(&mut self, amount: u64) -> DomainResult<()> {
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or_else(|| DomainError::validation("credit amount overflows"))?;
        Ok(())
    }

    pub fn apply_draft(&mut self, draft: CustomerDraft) -> DomainResult<()> {
        *self = Self::new(self.id, draft)?;
        Ok(())
    }
}

impl Entity for Customer {
    type Id = CustomerId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
