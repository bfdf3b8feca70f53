//! Stripe payment provider adapter.
//!
//! Implements the `PaymentProvider` trait against the Stripe REST API:
//! hosted checkout, the billing portal, and webhook verification.
//!
//! # Security
//!
//! - HMAC-SHA256 signature verification with constant-time comparison
//! - Timestamp validation (5-minute window) for replay attack prevention
//! - Secrets handled via `secrecy::SecretString`
//!
//! # Configuration
//!
//! ```ignore
//! let config = StripeConfig::from_payment_config(&app_config.payment);
//! let adapter = StripePaymentAdapter::new(config);
//! ```

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::config::PaymentConfig;
use crate::domain::subscription::{PlanId, SubscriptionStatus};
use crate::ports::{
    CheckoutSession, CreateCheckoutRequest, PaymentError, PaymentErrorCode, PaymentProvider,
    PortalSession, WebhookEvent, WebhookEventKind,
};

use super::webhook_types::{
    SignatureHeader, StripeCheckoutSession, StripeErrorResponse, StripeInvoice, StripeSubscription,
    StripeWebhookEvent,
};

type HmacSha256 = Hmac<Sha256>;

/// Maximum age for webhook events (5 minutes).
const MAX_TIMESTAMP_AGE_SECS: i64 = 300;

/// Clock skew tolerance for future timestamps (60 seconds).
const MAX_FUTURE_TOLERANCE_SECS: i64 = 60;

/// Stripe API configuration.
#[derive(Clone)]
pub struct StripeConfig {
    /// Stripe secret API key (sk_live_... or sk_test_...).
    api_key: SecretString,

    /// Webhook signing secret (whsec_...).
    webhook_secret: SecretString,

    /// Base URL for Stripe API (default: https://api.stripe.com).
    api_base_url: String,

    /// Whether to reject test mode events.
    require_livemode: bool,

    pro_price_id: String,

    business_price_id: String,
}

impl StripeConfig {
    /// Create a new Stripe configuration.
    pub fn new(
        api_key: impl Into<String>,
        webhook_secret: impl Into<String>,
        pro_price_id: impl Into<String>,
        business_price_id: impl Into<String>,
    ) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            webhook_secret: SecretString::new(webhook_secret.into()),
            api_base_url: "https://api.stripe.com".to_string(),
            require_livemode: false,
            pro_price_id: pro_price_id.into(),
            business_price_id: business_price_id.into(),
        }
    }

    /// Build from the application's payment settings.
    ///
    /// Live keys require live events.
    pub fn from_payment_config(config: &PaymentConfig) -> Self {
        Self::new(
            config.stripe_api_key.clone(),
            config.stripe_webhook_secret.clone(),
            config.stripe_pro_price_id.clone(),
            config.stripe_business_price_id.clone(),
        )
        .with_require_livemode(!config.is_test_mode())
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_require_livemode(mut self, require: bool) -> Self {
        self.require_livemode = require;
        self
    }

    /// Stripe price for a paid plan.
    pub fn price_for(&self, plan: PlanId) -> Result<&str, PaymentError> {
        match plan {
            PlanId::Pro => Ok(&self.pro_price_id),
            PlanId::Business => Ok(&self.business_price_id),
            PlanId::Free => Err(PaymentError::invalid_request(
                "The free plan has no price",
            )),
        }
    }

    /// Plan for a Stripe price, if it is one of ours.
    pub fn plan_for_price(&self, price_id: &str) -> Option<PlanId> {
        if price_id == self.pro_price_id {
            Some(PlanId::Pro)
        } else if price_id == self.business_price_id {
            Some(PlanId::Business)
        } else {
            None
        }
    }
}

/// Stripe payment adapter implementing the PaymentProvider port.
pub struct StripePaymentAdapter {
    config: StripeConfig,
    http_client: reqwest::Client,
}

impl StripePaymentAdapter {
    pub fn new(config: StripeConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    /// Verify webhook signature using HMAC-SHA256.
    ///
    /// # Security
    ///
    /// - Uses constant-time comparison to prevent timing attacks
    /// - Validates timestamp to prevent replay attacks
    fn verify_signature(&self, payload: &[u8], header: &SignatureHeader) -> Result<(), PaymentError> {
        let now = chrono::Utc::now().timestamp();
        let age = now.checked_sub(header.timestamp).ok_or_else(|| {
            tracing::warn!(event_timestamp = header.timestamp, "Webhook timestamp out of range");
            PaymentError::invalid_webhook("Invalid timestamp")
        })?;

        if age > MAX_TIMESTAMP_AGE_SECS {
            tracing::warn!(
                event_timestamp = header.timestamp,
                current_time = now,
                age_secs = age,
                "Webhook event too old - possible replay attack"
            );
            return Err(PaymentError::invalid_webhook(format!(
                "Event too old ({} seconds)",
                age
            )));
        }

        if age < -MAX_FUTURE_TOLERANCE_SECS {
            tracing::warn!(
                event_timestamp = header.timestamp,
                current_time = now,
                "Webhook event from future - clock skew or manipulation"
            );
            return Err(PaymentError::invalid_webhook("Event timestamp in future"));
        }

        let mut mac = HmacSha256::new_from_slice(self.config.webhook_secret.expose_secret().as_bytes())
            .map_err(|e| PaymentError::invalid_webhook(format!("Unusable webhook secret: {}", e)))?;
        mac.update(header.timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        let expected = mac.finalize().into_bytes();
        let expected_bytes: &[u8] = expected.as_slice();

        let matched = header
            .v1_signatures
            .iter()
            .any(|provided| expected_bytes.ct_eq(provided.as_slice()).unwrap_u8() == 1);
        if !matched {
            tracing::warn!("Invalid webhook signature");
            return Err(PaymentError::invalid_webhook("Invalid signature"));
        }

        Ok(())
    }

    /// Parse a Stripe event and convert to provider-neutral form.
    fn parse_event(&self, payload: &[u8]) -> Result<WebhookEvent, PaymentError> {
        let stripe_event: StripeWebhookEvent = serde_json::from_slice(payload).map_err(|e| {
            tracing::warn!(error = %e, "Failed to parse webhook payload");
            PaymentError::invalid_webhook(format!("Invalid JSON: {}", e))
        })?;

        if self.config.require_livemode && !stripe_event.livemode {
            tracing::warn!(
                event_id = %stripe_event.id,
                "Rejected test mode event in production"
            );
            return Err(PaymentError::invalid_webhook(
                "Test mode events not allowed in production",
            ));
        }

        let kind = self.extract_event_kind(&stripe_event)?;

        Ok(WebhookEvent {
            id: stripe_event.id,
            event_type: stripe_event.event_type,
            kind,
        })
    }

    fn extract_event_kind(&self, event: &StripeWebhookEvent) -> Result<WebhookEventKind, PaymentError> {
        let kind = match event.event_type.as_str() {
            "checkout.session.completed" => {
                let session: StripeCheckoutSession = decode_object(event)?;
                WebhookEventKind::CheckoutCompleted {
                    user_id: session.user_id(),
                    plan: session.metadata.get("plan_id").and_then(|p| p.parse().ok()),
                    customer_id: session.customer,
                    subscription_id: session.subscription,
                }
            }
            "customer.subscription.created" | "customer.subscription.updated" => {
                let sub: StripeSubscription = decode_object(event)?;
                let item = sub.primary_item();
                WebhookEventKind::SubscriptionChanged {
                    status: SubscriptionStatus::parse(&sub.status),
                    plan: item
                        .and_then(|i| self.config.plan_for_price(&i.price.id))
                        .or_else(|| sub.metadata.get("plan_id").and_then(|p| p.parse().ok())),
                    quantity: item.map(|i| i.quantity),
                    current_period_end: sub.current_period_end,
                    user_id: sub.metadata.get("user_id").cloned(),
                    subscription_id: sub.id,
                    customer_id: sub.customer,
                }
            }
            "customer.subscription.deleted" => {
                let sub: StripeSubscription = decode_object(event)?;
                WebhookEventKind::SubscriptionDeleted {
                    subscription_id: sub.id,
                    customer_id: sub.customer,
                }
            }
            "invoice.paid" => {
                let invoice: StripeInvoice = decode_object(event)?;
                WebhookEventKind::InvoicePaid {
                    customer_id: invoice.customer,
                    subscription_id: invoice.subscription,
                }
            }
            "invoice.payment_failed" => {
                let invoice: StripeInvoice = decode_object(event)?;
                WebhookEventKind::InvoicePaymentFailed {
                    customer_id: invoice.customer,
                    subscription_id: invoice.subscription,
                }
            }
            _ => WebhookEventKind::Other,
        };
        Ok(kind)
    }

    async fn post_form<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, PaymentError> {
        let url = format!("{}{}", self.config.api_base_url, path);

        let response = self
            .http_client
            .post(&url)
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .form(params)
            .send()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status, &body));
        }

        response.json().await.map_err(|e| {
            PaymentError::new(
                PaymentErrorCode::ProviderError,
                format!("Failed to parse Stripe response: {}", e),
            )
        })
    }
}

fn decode_object<T: for<'de> Deserialize<'de>>(event: &StripeWebhookEvent) -> Result<T, PaymentError> {
    serde_json::from_value(event.data.object.clone()).map_err(|e| {
        tracing::warn!(event_id = %event.id, event_type = %event.event_type, error = %e, "Malformed webhook object");
        PaymentError::invalid_webhook(format!("Invalid {} object: {}", event.event_type, e))
    })
}

/// Map a failed Stripe response to a payment error.
fn api_error(status: reqwest::StatusCode, body: &str) -> PaymentError {
    let parsed = serde_json::from_str::<StripeErrorResponse>(body).ok();
    let message = parsed
        .as_ref()
        .and_then(|r| r.error.message.clone())
        .unwrap_or_else(|| format!("Stripe API error ({})", status));

    let code = match status {
        reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
            PaymentErrorCode::AuthenticationError
        }
        reqwest::StatusCode::NOT_FOUND => PaymentErrorCode::NotFound,
        reqwest::StatusCode::BAD_REQUEST => PaymentErrorCode::InvalidRequest,
        _ => PaymentErrorCode::ProviderError,
    };

    let error = PaymentError::new(code, message);
    match parsed.and_then(|r| r.error.code) {
        Some(provider_code) => error.with_provider_code(provider_code),
        None => error,
    }
}

#[async_trait]
impl PaymentProvider for StripePaymentAdapter {
    async fn create_checkout_session(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        let price_id = self.config.price_for(request.plan)?;
        let user_id = request.user_id.to_string();
        let plan = request.plan.as_str().to_string();

        let mut params = vec![
            ("mode", "subscription".to_string()),
            ("line_items[0][price]", price_id.to_string()),
            ("line_items[0][quantity]", request.quantity.to_string()),
            ("success_url", request.success_url),
            ("cancel_url", request.cancel_url),
            ("client_reference_id", user_id.clone()),
            ("metadata[user_id]", user_id.clone()),
            ("metadata[plan_id]", plan.clone()),
            ("subscription_data[metadata][user_id]", user_id),
            ("subscription_data[metadata][plan_id]", plan),
        ];
        match (request.customer_id, request.email) {
            (Some(customer), _) => params.push(("customer", customer)),
            (None, Some(email)) => params.push(("customer_email", email)),
            (None, None) => {}
        }

        let session: StripeCheckoutSession = self.post_form("/v1/checkout/sessions", &params).await?;
        let url = session
            .url
            .ok_or_else(|| PaymentError::provider("Stripe returned a checkout session without a URL"))?;

        Ok(CheckoutSession { id: session.id, url })
    }

    async fn create_portal_session(
        &self,
        customer_id: &str,
        return_url: &str,
    ) -> Result<PortalSession, PaymentError> {
        #[derive(Deserialize)]
        struct PortalSessionResponse {
            id: String,
            url: String,
        }

        let params = [
            ("customer", customer_id.to_string()),
            ("return_url", return_url.to_string()),
        ];
        let portal: PortalSessionResponse = self.post_form("/v1/billing_portal/sessions", &params).await?;

        Ok(PortalSession {
            id: portal.id,
            url: portal.url,
        })
    }

    async fn verify_webhook(&self, payload: &[u8], signature: &str) -> Result<WebhookEvent, PaymentError> {
        let header = SignatureHeader::parse(signature).map_err(|e| {
            tracing::warn!(error = %e, "Failed to parse Stripe-Signature header");
            PaymentError::invalid_webhook(e.to_string())
        })?;

        self.verify_signature(payload, &header)?;
        let event = self.parse_event(payload)?;

        tracing::info!(
            event_id = %event.id,
            event_type = %event.event_type,
            "Webhook signature verified"
        );

        Ok(event)
    }
}
