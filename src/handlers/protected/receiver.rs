// handlers/protected/receiver.rs - POST /admin/receiver/, GET /admin/receivers/

use axum::{extract::State, Extension};

use crate::database::models::{NewReceiverDonation, ReceiverDonation};
use crate::middleware::{ApiResponse, ApiResult, AuthUser, Message, Payload};
use crate::state::AppState;

/// POST /admin/receiver/ - Record goods released from admin custody
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Payload(input): Payload<NewReceiverDonation>,
) -> ApiResult<Message> {
    let donation = state
        .store
        .insert_receiver_donation(ReceiverDonation::new(user.user_id, input))
        .await?;
    tracing::info!("Receiver donation {} recorded by {}", donation.id, user.username);
    Ok(ApiResponse::created_message("Receiver donation recorded successfully"))
}

/// GET /admin/receivers/ - Every receiver donation, regardless of caller
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<ReceiverDonation>> {
    let donations = state.store.list_receiver_donations().await?;
    Ok(ApiResponse::success(donations))
}
