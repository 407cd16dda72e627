use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde_json::Value;

use crate::error::ApiError;
use crate::validation::{Validate, ValidationErrors, NON_FIELD_ERRORS};

/// JSON body checked against the schema `T` before the handler runs.
///
/// Malformed JSON is a 400 `INVALID_JSON`; a body that parses but fails the schema is a
/// 400 with the per-field error map.
#[derive(Debug)]
pub struct Payload<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for Payload<T>
where
    T: Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::invalid_json(rejection.body_text()))?;

        let Value::Object(map) = value else {
            return Err(ValidationErrors::single(
                NON_FIELD_ERRORS,
                "Invalid data. Expected a dictionary.",
            )
            .into());
        };

        T::validate(&map).map(Payload).map_err(ApiError::from)
    }
}
