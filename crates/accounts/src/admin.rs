use serde::{Deserialize, Serialize};

use bookstore_core::{AdminId, DomainError, DomainResult, Entity};

use crate::person::PersonProfile;

/// Validated input for creating or replacing an administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminDraft {
    pub profile: PersonProfile,
    pub password: String,
}

/// Entity: a store administrator.
///
/// Not serializable; the wire representation is mapped at the API layer so
/// the password never leaves the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admin {
    id: AdminId,
    profile: PersonProfile,
    password: String,
}

impl Admin {
    pub fn new(id: AdminId, draft: AdminDraft) -> DomainResult<Self> {
        draft.profile.validate()?;
        if draft.password.is_empty() || draft.password.len() > 100 {
            return Err(DomainError::validation("password must be 1-100 characters"));
        }
        Ok(Self {
            id,
            profile: draft.profile,
            password: draft.password,
        })
    }

    pub fn id_typed(&self) -> AdminId {
        self.id
    }

    pub fn profile(&self) -> &PersonProfile {
        &self.profile
    }

    pub fn username(&self) -> &str {
        &self.profile.username
    }

    /// Plaintext credential match (hardening is out of scope).
    pub fn matches_credentials(&self, username: &str, password: &str) -> bool {
        self.profile.username == username && self.password == password
    }

    /// Whether another account carries the same username + password pair.
    /// Used by the store's duplicate guard.
    pub fn same_credentials(&self, other: &Admin) -> bool {
        self.profile.username == other.profile.username && self.password == other.password
    }

    pub fn apply_draft(&mut self, draft: AdminDraft) -> DomainResult<()> {
        *self = Self::new(self.id, draft)?;
        Ok(())
    }
}

impl Entity for Admin {
    type Id = AdminId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
