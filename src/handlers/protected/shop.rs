// handlers/protected/shop.rs - POST /shop/donate/, GET /shop/donations/

use axum::{extract::State, Extension};

use crate::database::models::{NewShopDonation, ShopDonation};
use crate::middleware::{ApiResponse, ApiResult, AuthUser, Message, Payload};
use crate::state::AppState;

/// POST /shop/donate/ - Record goods handed over by the calling shop
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Payload(input): Payload<NewShopDonation>,
) -> ApiResult<Message> {
    let donation = state
        .store
        .insert_shop_donation(ShopDonation::new(user.user_id, input))
        .await?;
    tracing::info!("Shop donation {} recorded by {}", donation.id, user.username);
    Ok(ApiResponse::created_message("Shop donation recorded successfully"))
}

/// GET /shop/donations/ - Every shop donation.
///
/// Not filtered by caller: any authenticated user sees all shops' donations.
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<ShopDonation>> {
    let donations = state.store.list_shop_donations().await?;
    Ok(ApiResponse::success(donations))
}
