//! Payment provider port for external payment processing.
//!
//! Defines the contract for payment gateway integrations (e.g., Stripe):
//! hosted checkout, the billing portal, and verified webhook events
//! translated into provider-neutral form.

use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::domain::subscription::{PlanId, SubscriptionStatus};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Port for payment provider integrations.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create a hosted checkout session for a paid plan.
    ///
    /// Returns a URL for the customer to complete payment.
    async fn create_checkout_session(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError>;

    /// Create a billing portal session for subscription management.
    async fn create_portal_session(
        &self,
        customer_id: &str,
        return_url: &str,
    ) -> Result<PortalSession, PaymentError>;

    /// Verify a webhook signature and parse the event.
    ///
    /// Returns `InvalidWebhook` if the signature, timestamp or payload is bad.
    async fn verify_webhook(&self, payload: &[u8], signature: &str) -> Result<WebhookEvent, PaymentError>;
}

/// Request to create a checkout session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCheckoutRequest {
    /// Internal user ID (sent as client reference and metadata).
    pub user_id: UserId,

    /// Plan to subscribe to. Never `Free`.
    pub plan: PlanId,

    /// Number of seats.
    pub quantity: u32,

    /// Existing provider customer to reuse.
    pub customer_id: Option<String>,

    /// Email to pre-fill when there is no customer yet.
    pub email: Option<String>,

    /// URL to redirect after successful checkout.
    pub success_url: String,

    /// URL to redirect after canceled checkout.
    pub cancel_url: String,
}

/// Checkout session for payment completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Provider's session ID.
    pub id: String,

    /// URL for customer to complete checkout.
    pub url: String,
}

/// Portal session for subscription management.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalSession {
    pub id: String,
    pub url: String,
}

/// Verified webhook event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookEvent {
    /// Event ID from provider.
    pub id: String,

    /// Provider event type, e.g. `invoice.paid`.
    pub event_type: String,

    pub kind: WebhookEventKind,
}

/// Provider-neutral content of the webhook events we act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookEventKind {
    /// A hosted checkout finished.
    CheckoutCompleted {
        /// Internal user id from the session metadata or client reference.
        user_id: Option<String>,
        plan: Option<PlanId>,
        customer_id: Option<String>,
        subscription_id: Option<String>,
    },

    /// A subscription was created or updated.
    SubscriptionChanged {
        subscription_id: String,
        customer_id: String,
        /// `None` when the provider reports a status we do not know.
        status: Option<SubscriptionStatus>,
        /// Plan resolved from the subscription's price.
        plan: Option<PlanId>,
        quantity: Option<u32>,
        /// Unix seconds.
        current_period_end: Option<i64>,
        user_id: Option<String>,
    },

    /// A subscription ended.
    SubscriptionDeleted {
        subscription_id: String,
        customer_id: String,
    },

    /// An invoice was paid.
    InvoicePaid {
        customer_id: String,
        subscription_id: Option<String>,
    },

    /// An invoice payment failed.
    InvoicePaymentFailed {
        customer_id: String,
        subscription_id: Option<String>,
    },

    /// Anything else; acknowledged and ignored.
    Other,
}

/// Errors from payment provider operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct PaymentError {
    /// Error code for categorization.
    pub code: PaymentErrorCode,

    /// Human-readable message.
    pub message: String,

    /// Provider's error code (if available).
    pub provider_code: Option<String>,
}

impl PaymentError {
    pub fn new(code: PaymentErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider_code: None,
        }
    }

    pub fn with_provider_code(mut self, code: impl Into<String>) -> Self {
        self.provider_code = Some(code.into());
        self
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::NetworkError, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::InvalidRequest, message)
    }

    pub fn not_found(resource: &str) -> Self {
        Self::new(PaymentErrorCode::NotFound, format!("{} not found", resource))
    }

    pub fn invalid_webhook(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::InvalidWebhook, message)
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::ProviderError, message)
    }
}

impl From<PaymentError> for DomainError {
    fn from(err: PaymentError) -> Self {
        let code = match err.code {
            PaymentErrorCode::InvalidWebhook => ErrorCode::InvalidWebhook,
            PaymentErrorCode::InvalidRequest => ErrorCode::ValidationFailed,
            PaymentErrorCode::NotFound => ErrorCode::CustomerNotFound,
            PaymentErrorCode::NetworkError
            | PaymentErrorCode::AuthenticationError
            | PaymentErrorCode::ProviderError => ErrorCode::PaymentProviderError,
        };
        let domain = DomainError::new(code, err.message);
        match err.provider_code {
            Some(provider_code) => domain.with_detail("provider_code", provider_code),
            None => domain,
        }
    }
}

/// Payment error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentErrorCode {
    /// Network connectivity issue.
    NetworkError,

    /// API authentication failed.
    AuthenticationError,

    /// The provider rejected the request parameters.
    InvalidRequest,

    /// Resource not found.
    NotFound,

    /// Invalid webhook signature or payload.
    InvalidWebhook,

    /// Any other provider API error.
    ProviderError,
}

impl std::fmt::Display for PaymentErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentErrorCode::NetworkError => "network_error",
            PaymentErrorCode::AuthenticationError => "authentication_error",
            PaymentErrorCode::InvalidRequest => "invalid_request",
            PaymentErrorCode::NotFound => "not_found",
            PaymentErrorCode::InvalidWebhook => "invalid_webhook",
            PaymentErrorCode::ProviderError => "provider_error",
        };
        write!(f, "{}", s)
    }
}
