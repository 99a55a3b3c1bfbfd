use std::sync::Arc;

use async_trait::async_trait;
use chrono::{SubsecRound, Utc};
use tracing::{debug, warn};

use crate::{
    application::RequestContext,
    domain::{
        events::UserCreatedV1,
        user::{CreateUserInput, User, UserRepository},
        validation::validate_create_input,
    },
    shared::errors::{DomainError, PublishError},
};

pub struct UserService {
    repo: Arc<dyn UserRepository>,
    publisher: Arc<dyn EventPublisher>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>, publisher: Arc<dyn EventPublisher>) -> Self {
        Self { repo, publisher }
    }

    /// Validates, stamps and stores a new user, then announces it.
    ///
    /// The stored record is the outcome: a failed announcement is logged and
    /// does not change the result.
    pub async fn create_user(
        &self,
        ctx: &RequestContext,
        input: Option<CreateUserInput>,
        created_by: &str,
    ) -> Result<User, DomainError> {
        let valid = validate_create_input(input.as_ref())?;
        // Stored and published timestamps carry whole seconds only.
        let user = User::new(valid, created_by, Utc::now().trunc_subsecs(0));

        self.repo.put(&user).await?;
        debug!(user_id = %user.id, request_id = ?ctx.request_id(), "user stored");

        let event = UserCreatedV1::from_user(&user, ctx.request_id());
        if let Err(err) = self.publisher.publish_user_created(event).await {
            warn!(
                user_id = %user.id,
                request_id = ?ctx.request_id(),
                error = %err,
                "user.created publish failed; user was stored"
            );
        }

        Ok(user)
    }

    pub async fn get_user(
        &self,
        ctx: &RequestContext,
        id: &str,
    ) -> Result<Option<User>, DomainError> {
        debug!(user_id = %id, request_id = ?ctx.request_id(), "looking up user");
        self.repo.get_by_id(id).await
    }
}

/// Outbound channel for user lifecycle notifications.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish_user_created(&self, payload: UserCreatedV1) -> Result<(), PublishError>;
}
