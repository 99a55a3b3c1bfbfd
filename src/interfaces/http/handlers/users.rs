use axum::{http::StatusCode, response::Response};
use tracing::{error, info};

use crate::{
    domain::user::CreateUserInput,
    interfaces::http::{extractors::ApiRequest, response::json_response},
    shared::errors::ApiError,
    state::SharedState,
};

pub const USERS_PATH: &str = "/users";
pub const USER_BY_ID_PATTERN: &str = "/users/{id}";
const USER_PATH_PREFIX: &str = "/users/";

/// `POST /users`
pub async fn create_user(
    state: SharedState,
    mut request: ApiRequest,
) -> Result<Response, ApiError> {
    let requester = request.require_subject()?.to_string();
    let ctx = request.context();
    let request_id = ctx.request_id().unwrap_or_default();
    info!(
        method = "POST",
        path = %request.raw_path,
        request_id,
        requester_sub = %requester,
        "incoming request"
    );

    // `null` decodes to `None` and is reported by the validator.
    let input: Option<CreateUserInput> = request.json_body().await?;

    let user = state
        .user_service
        .create_user(&ctx, input, &requester)
        .await
        .map_err(|err| {
            if err.is_internal() {
                error!(request_id, error = %err, "create user failed");
            }
            ApiError::from(err)
        })?;

    info!(request_id, user_id = %user.id, action = "put", "user write succeeded");
    Ok(json_response(StatusCode::CREATED, &user))
}

/// `GET /users/{id}`
pub async fn get_user(state: SharedState, request: ApiRequest) -> Result<Response, ApiError> {
    let requester = request.require_subject()?;
    let ctx = request.context();
    let request_id = ctx.request_id().unwrap_or_default();
    info!(
        method = "GET",
        path = %request.raw_path,
        request_id,
        requester_sub = requester,
        "incoming request"
    );

    let id = extract_id_from_path(&request.raw_path).ok_or(ApiError::NotFound)?;

    let user = state
        .user_service
        .get_user(&ctx, id)
        .await
        .map_err(|err| {
            error!(request_id, error = %err, "get user failed");
            ApiError::Internal
        })?
        .ok_or(ApiError::NotFound)?;

    info!(request_id, user_id = %user.id, action = "get", "user read succeeded");
    Ok(json_response(StatusCode::OK, &user))
}

/// Everything after `/users/`, ignoring one trailing slash.
fn extract_id_from_path(raw_path: &str) -> Option<&str> {
    let path = raw_path.strip_suffix('/').unwrap_or(raw_path);
    path.strip_prefix(USER_PATH_PREFIX)
        .filter(|id| !id.is_empty())
}
