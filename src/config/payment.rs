//! Payment configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Payment configuration (Stripe)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentConfig {
    /// Stripe API key
    pub stripe_api_key: String,

    /// Stripe webhook signing secret
    pub stripe_webhook_secret: String,

    /// Stripe price ID for the Pro plan
    pub stripe_pro_price_id: String,

    /// Stripe price ID for the Business plan (per seat)
    pub stripe_business_price_id: String,

    /// Redirect after a completed checkout; defaults to `{public_base_url}/dashboard?checkout=success`
    pub checkout_success_url: Option<String>,

    /// Redirect after an abandoned checkout; defaults to `{public_base_url}/pricing`
    pub checkout_cancel_url: Option<String>,

    /// Return URL for the billing portal; defaults to `{public_base_url}/dashboard/billing`
    pub portal_return_url: Option<String>,
}

impl PaymentConfig {
    /// Check if using Stripe test mode
    pub fn is_test_mode(&self) -> bool {
        self.stripe_api_key.starts_with("sk_test_")
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.stripe_api_key.is_empty() {
            return Err(ValidationError::MissingRequired("STRIPE_API_KEY"));
        }
        if self.stripe_webhook_secret.is_empty() {
            return Err(ValidationError::MissingRequired("STRIPE_WEBHOOK_SECRET"));
        }

        // Restricted keys (rk_) cannot create checkout sessions
        if !self.stripe_api_key.starts_with("sk_") {
            return Err(ValidationError::InvalidStripeKey);
        }
        if !self.stripe_webhook_secret.starts_with("whsec_") {
            return Err(ValidationError::InvalidStripeWebhookSecret);
        }
        if !self.stripe_pro_price_id.starts_with("price_") {
            return Err(ValidationError::InvalidStripePriceId("pro"));
        }
        if !self.stripe_business_price_id.starts_with("price_") {
            return Err(ValidationError::InvalidStripePriceId("business"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> PaymentConfig {
        PaymentConfig {
            stripe_api_key: "sk_test_abcd1234".to_string(),
            stripe_webhook_secret: "whsec_xyz789".to_string(),
            stripe_pro_price_id: "price_pro".to_string(),
            stripe_business_price_id: "price_business".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_mode_detected_from_key() {
        assert!(valid().is_test_mode());
        let live = PaymentConfig {
            stripe_api_key: "sk_live_xxx".to_string(),
            ..valid()
        };
        assert!(!live.is_test_mode());
    }

    #[test]
    fn missing_keys_are_rejected() {
        assert!(PaymentConfig::default().validate().is_err());
        let config = PaymentConfig {
            stripe_webhook_secret: String::new(),
            ..valid()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("STRIPE_WEBHOOK_SECRET"))
        );
    }

    #[test]
    fn publishable_key_is_rejected() {
        let config = PaymentConfig {
            stripe_api_key: "pk_test_xxx".to_string(),
            ..valid()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidStripeKey));
    }

    #[test]
    fn wrong_webhook_secret_prefix_is_rejected() {
        let config = PaymentConfig {
            stripe_webhook_secret: "secret_xxx".to_string(),
            ..valid()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidStripeWebhookSecret));
    }

    #[test]
    fn price_ids_are_checked_per_plan() {
        let config = PaymentConfig {
            stripe_business_price_id: "prod_123".to_string(),
            ..valid()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidStripePriceId("business")));
    }

    #[test]
    fn valid_config_passes() {
        assert!(valid().validate().is_ok());
    }
}
