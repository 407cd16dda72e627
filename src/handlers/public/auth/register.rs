// handlers/public/auth/register.rs - POST /register/ handler

use axum::extract::State;
use serde_json::{Map, Value};

use crate::middleware::{ApiResponse, ApiResult, Message, Payload};
use crate::state::AppState;
use crate::validation::{required_secret, required_text, Validate, ValidationErrors, BLANK};

pub const MAX_USERNAME_CHARS: usize = 150;

#[derive(Debug)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

impl Validate for RegisterRequest {
    fn validate(payload: &Map<String, Value>) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let username = required_text(payload, "username", MAX_USERNAME_CHARS, &mut errors);
        if let Some(name) = &username {
            if let Err(reason) = validate_username_format(name) {
                errors.add("username", reason);
            }
        }
        let password = required_secret(payload, "password", &mut errors);

        errors.into_result(|| Self {
            username: username.unwrap_or_default(),
            password: password.unwrap_or_default(),
        })
    }
}

/// Letters, digits and `@.+-_` only
pub fn validate_username_format(username: &str) -> Result<(), &'static str> {
    if username.trim().is_empty() {
        return Err(BLANK);
    }
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        return Err("Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.");
    }
    Ok(())
}

/// POST /register/ - Create a new account
///
/// Expected Input:
/// ```json
/// { "username": "alice", "password": "p@ss1" }
/// ```
///
/// 201 `{"message": "User registered successfully"}`; a taken username is a 400 on the
/// `username` field.
pub async fn register(
    State(state): State<AppState>,
    Payload(request): Payload<RegisterRequest>,
) -> ApiResult<Message> {
    state.credentials.register(&request.username, &request.password).await?;
    Ok(ApiResponse::created_message("User registered successfully"))
}
