use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Value};
use sqlx::FromRow;
use uuid::Uuid;

use super::MAX_TEXT_CHARS;
use crate::validation::{optional_text, required_amount, Validate, ValidationErrors};

/// Goods or funds a shop hands over to the platform.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct ShopDonation {
    pub id: Uuid,
    #[sqlx(rename = "shop_id")]
    pub shop: Uuid,
    pub amount: Decimal,
    pub item: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// `POST /shop/donate/` body: `{amount, item?}`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewShopDonation {
    pub amount: Decimal,
    pub item: Option<String>,
}

impl Validate for NewShopDonation {
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

impl ShopDonation {
    pub fn new(shop: Uuid, input: NewShopDonation) -> Self {
        Self {
            id: Uuid::new_v4(),
            shop,
            amount: input.amount,
            item: input.item,
            created_at: Utc::now(),
        }
    }
}
