use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use sqlx::FromRow;
use uuid::Uuid;

use super::MAX_TEXT_CHARS;
use crate::validation::{required_text, Validate, ValidationErrors};

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Task {
    pub id: Uuid,
    #[sqlx(rename = "user_id")]
    pub user: Uuid,
    pub data: String,
    pub created_at: DateTime<Utc>,
}

/// `POST /task/` body: `{data}`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub data: String,
}

impl Validate for NewTask {
    fn validate(payload: &Map<String, Value>) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let data = required_text(payload, "data", MAX_TEXT_CHARS, &mut errors);
        errors.into_result(|| Self { data: data.unwrap_or_default() })
    }
}

impl Task {
    pub fn new(user: Uuid, input: NewTask) -> Self {
        Self {
            id: Uuid::new_v4(),
            user,
            data: input.data,
            created_at: Utc::now(),
        }
    }
}
