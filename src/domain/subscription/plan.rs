//! Subscription plans and their limits.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Subscription plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanId {
    /// One card, no wallet passes.
    Free,
    /// Five cards and wallet passes.
    Pro,
    /// Unlimited cards for a team, wallet passes.
    Business,
}

impl PlanId {
    /// Returns true if this plan is billed through the payment provider.
    pub fn is_paid(&self) -> bool {
        !matches!(self, PlanId::Free)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlanId::Free => "free",
            PlanId::Pro => "pro",
            PlanId::Business => "business",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PlanId::Free => "Free",
            PlanId::Pro => "Pro",
            PlanId::Business => "Business",
        }
    }

    pub fn limits(&self) -> PlanLimits {
        PlanLimits::for_plan(*self)
    }
}

impl fmt::Display for PlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "free" => Ok(PlanId::Free),
            "pro" => Ok(PlanId::Pro),
            "business" => Ok(PlanId::Business),
            _ => Err(ValidationError::invalid_format(
                "plan_id",
                "expected free, pro or business",
            )),
        }
    }
}

/// Feature limits for a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanLimits {
    pub plan: PlanId,
    /// Maximum number of cards. None = unlimited.
    pub max_cards: Option<u32>,
    /// Whether Apple and Google wallet passes can be generated.
    pub wallet_passes: bool,
}

impl PlanLimits {
    /// | Plan | Cards | Wallet passes |
    /// |------|-------|---------------|
    /// | Free | 1 | No |
    /// | Pro | 5 | Yes |
    /// | Business | Unlimited | Yes |
    pub fn for_plan(plan: PlanId) -> Self {
        match plan {
            PlanId::Free => Self {
                plan,
                max_cards: Some(1),
                wallet_passes: false,
            },
            PlanId::Pro => Self {
                plan,
                max_cards: Some(5),
                wallet_passes: true,
            },
            PlanId::Business => Self {
                plan,
                max_cards: None,
                wallet_passes: true,
            },
        }
    }

    /// Returns true when another card would exceed the plan.
    pub fn card_limit_reached(&self, current_cards: u32) -> bool {
        self.max_cards
            .map(|max| current_cards >= max)
            .unwrap_or(false)
    }
}
