//! HTTP DTOs for subscription endpoints.

use serde::{Deserialize, Serialize};

use crate::application::handlers::subscription::SubscriptionOverview;
use crate::domain::subscription::PlanId;

/// Request to start a checkout for a paid plan.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutRequest {
    #[serde(alias = "plan_id", alias = "planId")]
    pub plan: PlanId,
    /// Seats, business plan only.
    #[serde(default)]
    pub quantity: Option<u32>,
    /// Overrides the configured redirect after payment.
    #[serde(default)]
    pub success_url: Option<String>,
    #[serde(default)]
    pub cancel_url: Option<String>,
}

/// Request to open the billing portal.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PortalRequest {
    #[serde(default)]
    pub return_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionResponse {
    pub success: bool,
    #[serde(flatten)]
    pub overview: SubscriptionOverview,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckoutResponse {
    pub success: bool,
    pub session_id: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PortalResponse {
    pub success: bool,
    pub url: String,
}

/// Acknowledgement returned to the payment provider.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookResponse {
    pub received: bool,
}
