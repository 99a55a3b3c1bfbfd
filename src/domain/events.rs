use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::user::User;

pub const USER_CREATED_EVENT_TYPE: &str = "user.created";
pub const USER_CREATED_V1_VERSION: &str = "1";

/// Versioned wrapper for every outbound event.
///
/// The schema is append-only: a payload change ships under a new `version`,
/// and the meaning of an existing version never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub event_type: String,
    pub version: String,
    pub occurred_at: DateTime<Utc>,
    pub payload: T,
}

impl Envelope<UserCreatedV1> {
    pub fn user_created(occurred_at: DateTime<Utc>, payload: UserCreatedV1) -> Self {
        Self {
            event_type: USER_CREATED_EVENT_TYPE.to_string(),
            version: USER_CREATED_V1_VERSION.to_string(),
            occurred_at,
            payload,
        }
    }
}

impl<T: Serialize> Envelope<T> {
    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCreatedV1 {
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    /// Correlation id of the request that created the user, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl UserCreatedV1 {
    pub fn from_user(user: &User, request_id: Option<&str>) -> Self {
        Self {
            user_id: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            created_at: user.created_at,
            created_by: user.created_by.clone(),
            request_id: request_id.map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::{Value, json};

    use super::*;

    fn payload(request_id: Option<&str>) -> UserCreatedV1 {
        let user = User {
            id: "u1".into(),
            email: "a@b.com".into(),
            name: "Alice".into(),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            created_by: "sub-123".into(),
        };
        UserCreatedV1::from_user(&user, request_id)
    }

    #[test]
    fn user_created_wire_shape() {
        let occurred_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 1).unwrap();
        let envelope = Envelope::user_created(occurred_at, payload(Some("req-1")));

        let value: Value = serde_json::from_slice(&envelope.to_json().unwrap()).unwrap();
        assert_eq!(
            value,
            json!({
                "eventType": "user.created",
                "version": "1",
                "occurredAt": "2024-05-01T12:00:01Z",
                "payload": {
                    "userId": "u1",
                    "email": "a@b.com",
                    "name": "Alice",
                    "createdAt": "2024-05-01T12:00:00Z",
                    "createdBy": "sub-123",
                    "requestId": "req-1"
                }
            })
        );
    }

    #[test]
    fn request_id_is_omitted_when_unknown() {
        let envelope = Envelope::user_created(Utc::now(), payload(None));
        let value: Value = serde_json::from_slice(&envelope.to_json().unwrap()).unwrap();
        assert!(value["payload"].get("requestId").is_none());
    }
}
