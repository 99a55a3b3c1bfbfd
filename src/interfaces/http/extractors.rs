use axum::{
    body::{Body, to_bytes},
    http::{Method, request::Parts},
};
use serde::de::DeserializeOwned;
use tower_http::request_id::RequestId;
use tracing::{debug, warn};

use crate::{application::RequestContext, shared::errors::ApiError};

/// Identity attributes verified upstream and attached by [`attach_claims`].
///
/// [`attach_claims`]: crate::interfaces::http::middleware::auth::attach_claims
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    pub sub: String,
}

/// Everything a route handler gets from the transport.
///
/// The body stays unread until a handler asks for it with [`ApiRequest::json_body`].
#[derive(Debug)]
pub struct ApiRequest {
    pub method: Method,
    pub raw_path: String,
    pub request_id: Option<String>,
    pub claims: Option<Claims>,
    body: Body,
    body_limit: usize,
}

impl ApiRequest {
    pub fn from_parts(parts: &Parts, body: Body, body_limit: usize) -> Self {
        let request_id = parts
            .extensions
            .get::<RequestId>()
            .and_then(|id| id.header_value().to_str().ok())
            .map(str::to_string);

        Self {
            method: parts.method.clone(),
            raw_path: parts.uri.path().to_string(),
            request_id,
            claims: parts.extensions.get::<Claims>().cloned(),
            body,
            body_limit,
        }
    }

    /// Subject of the verified caller, or `401` when the gateway attached none.
    pub fn require_subject(&self) -> Result<&str, ApiError> {
        match &self.claims {
            Some(claims) => Ok(claims.sub.as_str()),
            None => {
                warn!(
                    request_id = self.request_id.as_deref().unwrap_or_default(),
                    path = %self.raw_path,
                    "missing identity claims"
                );
                Err(ApiError::Unauthorized)
            }
        }
    }

    /// Reads and decodes the body. A body over the limit or a broken stream is
    /// `invalid request body`; bytes that are not the expected JSON are
    /// `invalid JSON body`.
    pub async fn json_body<T: DeserializeOwned>(&mut self) -> Result<T, ApiError> {
        let body = std::mem::take(&mut self.body);
        let bytes = to_bytes(body, self.body_limit).await.map_err(|err| {
            debug!(error = %err, "failed to read request body");
            ApiError::bad_request("invalid request body")
        })?;
        serde_json::from_slice(&bytes).map_err(|_| ApiError::bad_request("invalid JSON body"))
    }

    pub fn context(&self) -> RequestContext {
        RequestContext::new(self.request_id.clone())
    }
}
