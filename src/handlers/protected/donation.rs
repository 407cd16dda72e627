// handlers/protected/donation.rs - POST /donate/, GET /donations/

use axum::{extract::State, Extension};

use crate::database::models::{Donation, NewDonation};
use crate::middleware::{ApiResponse, ApiResult, AuthUser, Message, Payload};
use crate::state::AppState;

/// POST /donate/ - Record a donation from the caller
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Payload(input): Payload<NewDonation>,
) -> ApiResult<Message> {
    let donation = state.store.insert_donation(Donation::new(user.user_id, input)).await?;
    tracing::info!("Donation {} of {} from {}", donation.id, donation.amount, user.username);
    Ok(ApiResponse::created_message("Donation successful"))
}

/// GET /donations/ - Donations made by the caller
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<Donation>> {
    let donations = state.store.list_donations(user.user_id).await?;
    Ok(ApiResponse::success(donations))
}
