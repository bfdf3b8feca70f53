//! HTTP handlers for wallet pass endpoints.

use axum::extract::State;
use axum::http::{header, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::application::handlers::wallet::{GenerateApplePassCommand, GenerateGooglePassCommand};
use crate::domain::wallet::PKPASS_CONTENT_TYPE;

use super::super::cards::handlers::attachment;
use super::super::error::ApiError;
use super::super::extract::ApiJson;
use super::super::middleware::RequireAuth;
use super::super::state::AppState;
use super::dto::{GooglePassResponse, PassRequest};

/// POST /api/passes/apple - Signed `.pkpass` bundle
pub async fn apple_pass(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(req): ApiJson<PassRequest>,
) -> Result<Response, ApiError> {
    let pass = state
        .apple_pass_handler()
        .handle(GenerateApplePassCommand {
            card_id: req.card_id,
            user_id: user.id,
            public_base_url: state.urls.public_base_url.clone(),
        })
        .await?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(PKPASS_CONTENT_TYPE)),
            (header::CONTENT_DISPOSITION, attachment(&pass.file_name)),
        ],
        pass.bytes,
    )
        .into_response())
}

/// POST /api/passes/google - Google Wallet save link
pub async fn google_pass(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(req): ApiJson<PassRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let link = state
        .google_pass_handler()
        .handle(GenerateGooglePassCommand {
            card_id: req.card_id,
            user_id: user.id,
            public_base_url: state.urls.public_base_url.clone(),
        })
        .await?;

    Ok(Json(GooglePassResponse {
        success: true,
        save_url: link.save_url,
        object: link.object,
    }))
}
