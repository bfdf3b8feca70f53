//! Request extractors that reject with the API error body.

use async_trait::async_trait;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::HeaderMap;
use axum::Json;
use serde::de::DeserializeOwned;

use crate::domain::foundation::CardId;

use super::error::ApiError;

/// `Json<T>` whose rejection is a `VALIDATION_FAILED` response.
#[derive(Debug, Clone)]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(json_rejection(rejection)),
        }
    }
}

fn json_rejection(rejection: JsonRejection) -> ApiError {
    ApiError::validation("body", rejection.body_text())
}

/// Parses a card id path segment.
pub fn parse_card_id(raw: &str) -> Result<CardId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::validation("card_id", format!("'{}' is not a valid card id", raw)))
}

/// The `User-Agent` header, when present and printable.
pub fn user_agent(headers: &HeaderMap) -> Option<String> {
    headers
        .get(axum::http::header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
