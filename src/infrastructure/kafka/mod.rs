use async_trait::async_trait;
use chrono::Utc;
use rdkafka::{
    ClientConfig,
    producer::{FutureProducer, FutureRecord},
    util::Timeout,
};
use tracing::{error, info};

use crate::{
    application::user_service::EventPublisher,
    config::KafkaConfig,
    domain::events::{Envelope, USER_CREATED_EVENT_TYPE, UserCreatedV1},
    shared::errors::PublishError,
};

/// Sends `user.created` envelopes to a Kafka topic, keyed by user id so every
/// event for one user lands on the same partition.
#[derive(Clone)]
pub struct UserEventProducer {
    inner: FutureProducer,
    topic: String,
    timeout: Timeout,
}

impl UserEventProducer {
    pub fn new(cfg: &KafkaConfig) -> anyhow::Result<Self> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &cfg.brokers)
            .set("message.timeout.ms", cfg.message_timeout_ms.to_string())
            .set("enable.idempotence", "true")
            .create()?;

        Ok(Self {
            inner: producer,
            topic: cfg.topic.clone(),
            timeout: Timeout::After(cfg.message_timeout()),
        })
    }

    async fn send(&self, key: &str, payload: &[u8]) -> Result<(), PublishError> {
        self.inner
            .send(
                FutureRecord::to(&self.topic).payload(payload).key(key),
                self.timeout,
            )
            .await
            .map(|_| ())
            .map_err(|(err, _)| PublishError::Delivery(err.to_string()))
    }
}

#[async_trait]
impl EventPublisher for UserEventProducer {
    async fn publish_user_created(&self, payload: UserCreatedV1) -> Result<(), PublishError> {
        let envelope = Envelope::user_created(Utc::now(), payload);
        let body = envelope
            .to_json()
            .map_err(|e| PublishError::Serialization(e.to_string()))?;
        let user_id = envelope.payload.user_id.as_str();

        match self.send(user_id, &body).await {
            Ok(()) => {
                info!(
                    event_type = USER_CREATED_EVENT_TYPE,
                    user_id,
                    topic = %self.topic,
                    "event publish succeeded"
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    event_type = USER_CREATED_EVENT_TYPE,
                    user_id,
                    topic = %self.topic,
                    error = %err,
                    "event publish failed"
                );
                Err(err)
            }
        }
    }
}
