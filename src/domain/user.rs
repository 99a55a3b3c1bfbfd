use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{domain::validation::ValidCreateInput, shared::errors::DomainError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    /// Subject of the verified caller that created the record.
    pub created_by: String,
}

impl User {
    pub fn new(input: ValidCreateInput<'_>, created_by: &str, created_at: DateTime<Utc>) -> Self {
        Self {
            id: input.id.to_string(),
            email: input.email.to_string(),
            name: input.name.to_string(),
            created_at,
            created_by: created_by.to_string(),
        }
    }
}

/// Body of `POST /users`. Fields are kept exactly as sent; trimming happens during validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUserInput {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
}

impl CreateUserInput {
    pub fn new(id: impl Into<String>, email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            name: name.into(),
        }
    }
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Stores `user` only if no record with the same id exists. The check and the
    /// write are a single atomic step; a conflict yields [`DomainError::UserAlreadyExists`].
    async fn put(&self, user: &User) -> Result<(), DomainError>;

    /// `Ok(None)` when the id is unknown.
    async fn get_by_id(&self, id: &str) -> Result<Option<User>, DomainError>;
}
