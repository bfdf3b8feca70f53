//! HTTP handlers for subscription endpoints.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Json;

use crate::application::handlers::subscription::{
    CreateCheckoutSessionCommand, CreatePortalSessionCommand, GetSubscriptionQuery,
    HandlePaymentWebhookCommand, HandlePaymentWebhookResult,
};
use crate::domain::foundation::{DomainError, ErrorCode};

use super::super::error::ApiError;
use super::super::extract::ApiJson;
use super::super::middleware::RequireAuth;
use super::super::state::AppState;
use super::dto::{
    CheckoutRequest, CheckoutResponse, PortalRequest, PortalResponse, SubscriptionResponse,
    WebhookResponse,
};

/// Header carrying the webhook signature.
pub const SIGNATURE_HEADER: &str = "Stripe-Signature";

/// GET /api/subscription - Current plan, limits and usage
pub async fn get_subscription(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let overview = state
        .get_subscription_handler()
        .handle(GetSubscriptionQuery { user_id: user.id })
        .await?;

    Ok(Json(SubscriptionResponse {
        success: true,
        overview,
    }))
}

/// POST /api/create-checkout-session - Start a hosted checkout
pub async fn create_checkout_session(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(req): ApiJson<CheckoutRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state
        .checkout_handler()
        .handle(CreateCheckoutSessionCommand {
            user_id: user.id,
            email: user.email,
            plan: req.plan,
            quantity: req.quantity,
            success_url: req
                .success_url
                .unwrap_or_else(|| state.urls.checkout_success_url.clone()),
            cancel_url: req
                .cancel_url
                .unwrap_or_else(|| state.urls.checkout_cancel_url.clone()),
        })
        .await?;

    Ok(Json(CheckoutResponse {
        success: true,
        session_id: session.id,
        url: session.url,
    }))
}

/// POST /api/create-portal-session - Open the billing portal
pub async fn create_portal_session(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    req: Option<ApiJson<PortalRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let req = req.map(|ApiJson(req)| req).unwrap_or_default();
    let session = state
        .portal_handler()
        .handle(CreatePortalSessionCommand {
            user_id: user.id,
            return_url: req
                .return_url
                .unwrap_or_else(|| state.urls.portal_return_url.clone()),
        })
        .await?;

    Ok(Json(PortalResponse {
        success: true,
        url: session.url,
    }))
}

/// POST /api/stripe/webhook - Payment provider events
///
/// Authenticated by signature, not by user token.
pub async fn handle_stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| DomainError::new(ErrorCode::InvalidWebhook, "Missing Stripe-Signature header"))?;

    let result = state
        .webhook_handler()
        .handle(HandlePaymentWebhookCommand {
            payload: body.to_vec(),
            signature: signature.to_string(),
        })
        .await?;

    if let HandlePaymentWebhookResult::SubscriptionUpdated { user_id, plan, status } = result {
        tracing::info!(%user_id, plan = plan.as_str(), status = status.as_str(), "subscription updated from webhook");
    }

    Ok(Json(WebhookResponse { received: true }))
}
