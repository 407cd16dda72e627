use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use sqlx::FromRow;
use uuid::Uuid;

use super::MAX_TEXT_CHARS;
use crate::validation::{optional_int_at_least, required_text, Validate, ValidationErrors};

/// Orders are created pending; nothing moves them on yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "order_status", rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Order {
    pub id: Uuid,
    #[sqlx(rename = "user_id")]
    pub user: Uuid,
    pub item: String,
    pub quantity: i32,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// `POST /orders/` body: `{item, quantity?}`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub item: String,
    pub quantity: i32,
}

impl Validate for NewOrder {
    fn validate(payload: &Map<String, Value>) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let item = required_text(payload, "item", MAX_TEXT_CHARS, &mut errors);
        let quantity = optional_int_at_least(payload, "quantity", 1, 1, &mut errors);
        errors.into_result(|| Self {
            item: item.unwrap_or_default(),
            quantity: quantity.unwrap_or(1),
        })
    }
}

impl Order {
    pub fn new(user: Uuid, input: NewOrder) -> Self {
        Self {
            id: Uuid::new_v4(),
            user,
            item: input.item,
            quantity: input.quantity,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        }
    }
}
