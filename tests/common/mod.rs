//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use http_body_util::BodyExt;
use serde_json::Value;
use user_api::{
    application::user_service::UserService,
    config::AppConfig,
    infrastructure::memory::{InMemoryUserRepository, RecordingEventPublisher},
    interfaces::http::router::build_router,
    state::AppState,
};

pub const SUBJECT_HEADER: &str = "x-auth-request-user";

pub struct TestApp {
    pub router: Router,
    pub repo: Arc<InMemoryUserRepository>,
    pub publisher: Arc<RecordingEventPublisher>,
    pub service: Arc<UserService>,
}

pub fn service_with_doubles() -> (
    Arc<UserService>,
    Arc<InMemoryUserRepository>,
    Arc<RecordingEventPublisher>,
) {
    let repo = Arc::new(InMemoryUserRepository::new());
    let publisher = Arc::new(RecordingEventPublisher::new());
    let service = Arc::new(UserService::new(repo.clone(), publisher.clone()));
    (service, repo, publisher)
}

pub fn test_app() -> TestApp {
    test_app_with_config("[storage]\nbackend = \"memory\"")
}

pub fn test_app_with_config(overrides: &str) -> TestApp {
    let config = Arc::new(AppConfig::from_toml(overrides).expect("test config is valid"));
    let (service, repo, publisher) = service_with_doubles();
    let state = Arc::new(AppState::new(config, service.clone()));

    TestApp {
        router: build_router(state),
        repo,
        publisher,
        service,
    }
}

pub fn post_user(subject: Option<&str>, body: impl Into<Body>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/users")
        .header("content-type", "application/json");
    if let Some(sub) = subject {
        builder = builder.header(SUBJECT_HEADER, sub);
    }
    builder.body(body.into()).unwrap()
}

pub fn get_path(path: &str, subject: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(path);
    if let Some(sub) = subject {
        builder = builder.header(SUBJECT_HEADER, sub);
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
