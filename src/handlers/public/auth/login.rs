// handlers/public/auth/login.rs - POST /login/ handler

use axum::extract::State;
use serde_json::{Map, Value};

use crate::auth::TokenPair;
use crate::middleware::{ApiResponse, ApiResult, Payload};
use crate::state::AppState;
use crate::validation::{Validate, ValidationErrors};

/// Login body. Never rejected: missing, null or container-valued credentials are carried as
/// empty strings and fail authentication like any unknown user.
#[derive(Debug, Default)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

fn credential(payload: &Map<String, Value>, field: &str) -> String {
    match payload.get(field) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

impl Validate for LoginRequest {
    fn validate(payload: &Map<String, Value>) -> Result<Self, ValidationErrors> {
        Ok(Self {
            username: credential(payload, "username"),
            password: credential(payload, "password"),
        })
    }
}

/// POST /login/ - Exchange credentials for a token pair
///
/// Expected Output (Success):
/// ```json
/// { "refresh": "eyJhbGciOiJIUzI1NiI...", "access": "eyJhbGciOiJIUzI1NiI..." }
/// ```
///
/// Unknown usernames, wrong passwords and missing fields all answer 401
/// `{"message": "Invalid credentials"}`. Only a body that is not a JSON object is a 400.
pub async fn login(
    State(state): State<AppState>,
    Payload(request): Payload<LoginRequest>,
) -> ApiResult<TokenPair> {
    let pair = state.credentials.login(&request.username, &request.password).await?;
    Ok(ApiResponse::success(pair))
}
