use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};

use crate::{interfaces::http::extractors::Claims, state::SharedState};

/// Copies the subject verified by the upstream gateway into request extensions.
///
/// Never rejects: handlers decide whether a missing identity is fatal, which
/// keeps unknown routes answering `404` for anonymous callers.
pub async fn attach_claims(
    State(state): State<SharedState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let subject = request
        .headers()
        .get(state.config.auth.subject_header.as_str())
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|sub| !sub.is_empty())
        .map(str::to_string);

    if let Some(sub) = subject {
        request.extensions_mut().insert(Claims { sub });
    }

    next.run(request).await
}
