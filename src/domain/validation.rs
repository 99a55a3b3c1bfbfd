use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::domain::user::CreateUserInput;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@]+@[^@]+\.[^@]+$").expect("email pattern compiles"));

/// First rule a create request broke. The display text is returned to callers verbatim.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("request body is required")]
    BodyRequired,
    #[error("id is required")]
    IdRequired,
    #[error("email is required")]
    EmailRequired,
    #[error("email must be a valid email address")]
    EmailInvalid,
    #[error("name is required")]
    NameRequired,
}

/// Trimmed view of a create request that passed every rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidCreateInput<'a> {
    pub id: &'a str,
    pub email: &'a str,
    pub name: &'a str,
}

/// Checks the rules in order and stops at the first failure.
pub fn validate_create_input(
    input: Option<&CreateUserInput>,
) -> Result<ValidCreateInput<'_>, ValidationError> {
    let input = input.ok_or(ValidationError::BodyRequired)?;

    let id = input.id.trim();
    if id.is_empty() {
        return Err(ValidationError::IdRequired);
    }

    let email = input.email.trim();
    if email.is_empty() {
        return Err(ValidationError::EmailRequired);
    }
    if !EMAIL_PATTERN.is_match(email) {
        return Err(ValidationError::EmailInvalid);
    }

    let name = input.name.trim();
    if name.is_empty() {
        return Err(ValidationError::NameRequired);
    }

    Ok(ValidCreateInput { id, email, name })
}
