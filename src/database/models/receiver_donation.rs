use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Value};
use sqlx::FromRow;
use uuid::Uuid;

use super::MAX_TEXT_CHARS;
use crate::validation::{optional_text, required_amount, Validate, ValidationErrors};

/// Goods released from admin custody to a receiver.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct ReceiverDonation {
    pub id: Uuid,
    #[sqlx(rename = "receiver_id")]
    pub receiver: Uuid,
    pub amount: Decimal,
    pub item: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// `POST /admin/receiver/` body: `{amount, item?}`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReceiverDonation {
    pub amount: Decimal,
    pub item: Option<String>,
}

impl Validate for NewReceiverDonation {
    fn validate(payload: &Map<String, Value>) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let amount = required_amount(payload, "amount", &mut errors);
        let item = optional_text(payload, "item", MAX_TEXT_CHARS, &mut errors);
        errors.into_result(|| Self {
            amount: amount.unwrap_or_default(),
            item,
        })
    }
}

impl ReceiverDonation {
    pub fn new(receiver: Uuid, input: NewReceiverDonation) -> Self {
        Self {
            id: Uuid::new_v4(),
            receiver,
            amount: input.amount,
            item: input.item,
            created_at: Utc::now(),
        }
    }
}
