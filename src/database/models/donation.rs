use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Value};
use sqlx::FromRow;
use uuid::Uuid;

use crate::validation::{required_amount, Validate, ValidationErrors};

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Donation {
    pub id: Uuid,
    #[sqlx(rename = "donor_id")]
    pub donor: Uuid,
    pub amount: Decimal,
    pub donated_at: DateTime<Utc>,
}

/// `POST /donate/` body: `{amount}`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDonation {
    pub amount: Decimal,
}

impl Validate for NewDonation {
    fn validate(payload: &Map<String, Value>) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let amount = required_amount(payload, "amount", &mut errors);
        errors.into_result(|| Self { amount: amount.unwrap_or_default() })
    }
}

impl Donation {
    pub fn new(donor: Uuid, input: NewDonation) -> Self {
        Self {
            id: Uuid::new_v4(),
            donor,
            amount: input.amount,
            donated_at: Utc::now(),
        }
    }
}
