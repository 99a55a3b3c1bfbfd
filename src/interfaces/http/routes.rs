//! Method + path dispatch for the user API.
//!
//! Lookups are exact on the normalized path, with one extension: a `GET`
//! pattern whose last segment is a placeholder (`/users/{id}`) matches any
//! path under its prefix. Handlers re-read the placeholder value from the raw
//! path themselves. Nested placeholders and query strings are not supported.

use std::{collections::HashMap, future::Future, sync::Arc};

use axum::{http::Method, response::Response};
use futures::{FutureExt, future::BoxFuture};

use crate::{interfaces::http::extractors::ApiRequest, shared::errors::ApiError};

pub type Handler =
    Arc<dyn Fn(ApiRequest) -> BoxFuture<'static, Result<Response, ApiError>> + Send + Sync>;

/// Boxes an async function into a [`Handler`].
pub fn handler_fn<F, Fut>(f: F) -> Handler
where
    F: Fn(ApiRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, ApiError>> + Send + 'static,
{
    Arc::new(move |request| f(request).boxed())
}

#[derive(Default)]
pub struct RouteTable {
    exact: HashMap<(Method, String), Handler>,
    /// `(prefix, handler)` for `GET` patterns ending in a placeholder segment.
    prefixed: Vec<(String, Handler)>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, method: Method, pattern: &str, handler: Handler) {
        if method == Method::GET {
            if let Some(prefix) = placeholder_prefix(pattern) {
                self.prefixed.push((prefix.to_string(), handler.clone()));
            }
        }
        self.exact
            .insert((method, normalize(pattern).to_string()), handler);
    }

    pub fn route(&self, method: &Method, raw_path: &str) -> Option<&Handler> {
        let path = normalize(raw_path);

        if let Some(handler) = self.exact.get(&(method.clone(), path.to_string())) {
            return Some(handler);
        }

        if *method != Method::GET {
            return None;
        }
        self.prefixed
            .iter()
            .find(|(prefix, _)| path.starts_with(prefix.as_str()))
            .map(|(_, handler)| handler)
    }
}

/// Strips one trailing slash; the root path stays `/`.
pub fn normalize(raw_path: &str) -> &str {
    match raw_path.strip_suffix('/') {
        Some("") => "/",
        Some(trimmed) => trimmed,
        None if raw_path.is_empty() => "/",
        None => raw_path,
    }
}

/// `/users/{id}` -> `/users/`.
fn placeholder_prefix(pattern: &str) -> Option<&str> {
    let (prefix, last) = pattern.rsplit_once('/')?;
    let is_placeholder = last.len() > 2 && last.starts_with('{') && last.ends_with('}');
    is_placeholder.then(|| &pattern[..=prefix.len()])
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;
    use crate::interfaces::http::response::json_response;

    fn tagged(tag: &'static str) -> Handler {
        handler_fn(move |_request| async move { Ok(json_response(StatusCode::OK, tag)) })
    }

    fn table() -> RouteTable {
        let mut routes = RouteTable::new();
        routes.register(Method::POST, "/users", tagged("create"));
        routes.register(Method::GET, "/users/{id}", tagged("get"));
        routes.register(Method::GET, "/", tagged("root"));
        routes
    }

    fn same(a: &Handler, b: &Handler) -> bool {
        Arc::ptr_eq(a, b)
    }

    #[test]
    fn normalize_strips_one_trailing_slash() {
        assert_eq!(normalize("/users/"), "/users");
        assert_eq!(normalize("/users"), "/users");
        assert_eq!(normalize("/users//"), "/users/");
        assert_eq!(normalize("/"), "/");
        assert_eq!(normalize(""), "/");
    }

    #[test]
    fn placeholder_prefix_only_for_trailing_placeholder() {
        assert_eq!(placeholder_prefix("/users/{id}"), Some("/users/"));
        assert_eq!(placeholder_prefix("/users"), None);
        assert_eq!(placeholder_prefix("/users/{}"), None);
        assert_eq!(placeholder_prefix("/users/{id}/posts"), None);
    }

    #[test]
    fn exact_match_with_trailing_slash() {
        let routes = table();
        let create = routes.route(&Method::POST, "/users").unwrap();
        let create_slash = routes.route(&Method::POST, "/users/").unwrap();
        assert!(same(create, create_slash));
        assert!(routes.route(&Method::GET, "/").is_some());
    }

    #[test]
    fn get_under_prefix_hits_placeholder_route() {
        let routes = table();
        let by_pattern = routes.route(&Method::GET, "/users/{id}").unwrap();
        let by_id = routes.route(&Method::GET, "/users/u1").unwrap();
        let by_id_slash = routes.route(&Method::GET, "/users/u1/").unwrap();
        assert!(same(by_pattern, by_id));
        assert!(same(by_id, by_id_slash));
    }

    #[test]
    fn unmatched_requests_have_no_handler() {
        let routes = table();
        assert!(routes.route(&Method::GET, "/users").is_none());
        assert!(routes.route(&Method::POST, "/users/u1").is_none());
        assert!(routes.route(&Method::DELETE, "/users/u1").is_none());
        assert!(routes.route(&Method::GET, "/accounts/u1").is_none());
    }
}
