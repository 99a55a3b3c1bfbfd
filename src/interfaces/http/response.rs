use axum::{
    body::Body,
    http::{HeaderValue, StatusCode, header},
    response::Response,
};
use serde::Serialize;
use tracing::error;

const INTERNAL_ERROR_BODY: &[u8] = br#"{"error":"internal server error"}"#;

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

/// Serializes `body` as the JSON response. A body that fails to serialize
/// becomes a generic `500` JSON error instead.
pub fn json_response<T: Serialize + ?Sized>(status: StatusCode, body: &T) -> Response {
    match serde_json::to_vec(body) {
        Ok(bytes) => build(status, bytes),
        Err(err) => {
            error!(error = %err, "failed to serialize response body");
            build(
                StatusCode::INTERNAL_SERVER_ERROR,
                INTERNAL_ERROR_BODY.to_vec(),
            )
        }
    }
}

pub fn error_response(status: StatusCode, message: &str) -> Response {
    json_response(status, &ErrorBody { error: message })
}

fn build(status: StatusCode, bytes: Vec<u8>) -> Response {
    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    response
}
