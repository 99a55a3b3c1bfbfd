//! In-process adapters: the reference user store and event publishers used by
//! tests and by the `memory` storage backend.

use std::collections::{HashMap, hash_map::Entry};

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use tracing::info;

use crate::{
    application::user_service::EventPublisher,
    domain::{
        events::{Envelope, USER_CREATED_EVENT_TYPE, UserCreatedV1},
        user::{User, UserRepository},
    },
    shared::errors::{DomainError, PublishError},
};

/// User store backed by a map behind a read/write lock.
///
/// Records are cloned on the way in and on the way out, so callers never hold
/// a reference into the map. The lock only guards the map operation itself.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<String, User>>,
    put_failure: Mutex<Option<String>>,
    get_failure: Mutex<Option<String>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `put` fail with a persistence error.
    pub fn fail_puts_with(&self, message: impl Into<String>) {
        *self.put_failure.lock() = Some(message.into());
    }

    /// Makes every subsequent `get_by_id` fail with a persistence error.
    pub fn fail_gets_with(&self, message: impl Into<String>) {
        *self.get_failure.lock() = Some(message.into());
    }

    pub fn len(&self) -> usize {
        self.users.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.read().is_empty()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn put(&self, user: &User) -> Result<(), DomainError> {
        if let Some(message) = self.put_failure.lock().clone() {
            return Err(DomainError::Persistence(message));
        }

        match self.users.write().entry(user.id.clone()) {
            Entry::Occupied(_) => Err(DomainError::UserAlreadyExists),
            Entry::Vacant(slot) => {
                slot.insert(user.clone());
                Ok(())
            }
        }
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<User>, DomainError> {
        if let Some(message) = self.get_failure.lock().clone() {
            return Err(DomainError::Persistence(message));
        }

        Ok(self.users.read().get(id).cloned())
    }
}

/// Publisher that keeps every payload it is handed, in call order.
#[derive(Default)]
pub struct RecordingEventPublisher {
    published: Mutex<Vec<UserCreatedV1>>,
    failure: Mutex<Option<String>>,
}

impl RecordingEventPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Payloads are still recorded, but every publish reports a delivery error.
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.failure.lock() = Some(message.into());
    }

    pub fn published(&self) -> Vec<UserCreatedV1> {
        self.published.lock().clone()
    }
}

#[async_trait]
impl EventPublisher for RecordingEventPublisher {
    async fn publish_user_created(&self, payload: UserCreatedV1) -> Result<(), PublishError> {
        self.published.lock().push(payload);
        match self.failure.lock().clone() {
            Some(message) => Err(PublishError::Delivery(message)),
            None => Ok(()),
        }
    }
}

/// Publisher for local runs: writes the serialized envelope to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogEventPublisher;

#[async_trait]
impl EventPublisher for LogEventPublisher {
    async fn publish_user_created(&self, payload: UserCreatedV1) -> Result<(), PublishError> {
        let envelope = Envelope::user_created(Utc::now(), payload);
        let body = envelope
            .to_json()
            .map_err(|e| PublishError::Serialization(e.to_string()))?;
        info!(
            event_type = USER_CREATED_EVENT_TYPE,
            user_id = %envelope.payload.user_id,
            envelope = %String::from_utf8_lossy(&body),
            "event published to log"
        );
        Ok(())
    }
}
