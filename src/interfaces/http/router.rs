use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    body::Body,
    extract::{Request, State},
    http::{Method, StatusCode},
    middleware,
    response::{IntoResponse, Response},
};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{debug, info_span, warn};

use crate::state::SharedState;

use super::{
    extractors::ApiRequest,
    handlers::users::{self, USER_BY_ID_PATTERN, USERS_PATH},
    middleware::auth::attach_claims,
    response::error_response,
    routes::{RouteTable, handler_fn},
};

#[derive(Clone)]
struct Dispatcher {
    routes: Arc<RouteTable>,
    body_limit: usize,
    timeout: Option<Duration>,
}

pub fn user_routes(state: SharedState) -> RouteTable {
    let mut routes = RouteTable::new();

    let create_state = state.clone();
    routes.register(
        Method::POST,
        USERS_PATH,
        handler_fn(move |request| users::create_user(create_state.clone(), request)),
    );
    routes.register(
        Method::GET,
        USER_BY_ID_PATTERN,
        handler_fn(move |request| users::get_user(state.clone(), request)),
    );

    routes
}

pub fn build_router(state: SharedState) -> Router {
    let dispatcher = Dispatcher {
        routes: Arc::new(user_routes(state.clone())),
        body_limit: state.config.server.max_body_bytes,
        timeout: state.config.server.request_timeout(),
    };

    Router::new()
        .fallback(dispatch)
        .with_state(dispatcher)
        .layer(middleware::from_fn_with_state(state, attach_claims))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let request_id = request
                    .extensions()
                    .get::<RequestId>()
                    .and_then(|id| id.header_value().to_str().ok())
                    .unwrap_or_default();
                info_span!(
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path(),
                    request_id
                )
            }),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

async fn dispatch(State(dispatcher): State<Dispatcher>, request: Request) -> Response {
    let (parts, body) = request.into_parts();

    let Some(handler) = dispatcher
        .routes
        .route(&parts.method, parts.uri.path())
        .cloned()
    else {
        debug!(method = %parts.method, path = %parts.uri.path(), "no route");
        return error_response(StatusCode::NOT_FOUND, "not found");
    };

    let handled = handler(ApiRequest::from_parts(&parts, body, dispatcher.body_limit));
    let result = match dispatcher.timeout {
        Some(limit) => match tokio::time::timeout(limit, handled).await {
            Ok(result) => result,
            Err(_) => {
                warn!(method = %parts.method, path = %parts.uri.path(), "request timed out");
                return error_response(StatusCode::REQUEST_TIMEOUT, "request timeout");
            }
        },
        None => handled.await,
    };

    result.unwrap_or_else(IntoResponse::into_response)
}
