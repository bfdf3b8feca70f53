//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the `CARDWISE` prefix and
//! nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use cardwise::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod auth;
mod database;
mod error;
mod payment;
mod server;
mod wallet;

pub use auth::AuthConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use payment::PaymentConfig;
pub use server::{Environment, ServerConfig};
pub use wallet::{AppleWalletConfig, GoogleWalletConfig, WalletConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (Supabase Postgres connection)
    pub database: DatabaseConfig,

    /// Authentication configuration (Supabase JWT)
    pub auth: AuthConfig,

    /// Payment configuration (Stripe)
    pub payment: PaymentConfig,

    /// Wallet pass configuration (Apple/Google)
    #[serde(default)]
    pub wallet: WalletConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// - `CARDWISE__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `CARDWISE__DATABASE__URL=...` -> `database.url = ...`
    /// - `CARDWISE__WALLET__APPLE__TEAM_IDENTIFIER=...` -> `wallet.apple.team_identifier`
    ///
    /// A `.env` file is read first when present.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CARDWISE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration sections
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.auth.validate(&self.server.environment)?;
        self.payment.validate()?;
        self.wallet.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }

    /// Checkout success redirect, falling back to the public dashboard
    pub fn checkout_success_url(&self) -> String {
        self.payment.checkout_success_url.clone().unwrap_or_else(|| {
            format!("{}/dashboard?checkout=success", self.server.public_base_url())
        })
    }

    /// Checkout cancel redirect, falling back to the pricing page
    pub fn checkout_cancel_url(&self) -> String {
        self.payment
            .checkout_cancel_url
            .clone()
            .unwrap_or_else(|| format!("{}/pricing", self.server.public_base_url()))
    }

    /// Billing portal return URL
    pub fn portal_return_url(&self) -> String {
        self.payment
            .portal_return_url
            .clone()
            .unwrap_or_else(|| format!("{}/dashboard/billing", self.server.public_base_url()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[(&str, &str)] = &[
        ("CARDWISE__DATABASE__URL", "postgresql://test@localhost/test"),
        ("CARDWISE__AUTH__JWT_SECRET", "super-secret-jwt-token-with-at-least-32-characters"),
        ("CARDWISE__PAYMENT__STRIPE_API_KEY", "sk_test_xxx"),
        ("CARDWISE__PAYMENT__STRIPE_WEBHOOK_SECRET", "whsec_xxx"),
        ("CARDWISE__PAYMENT__STRIPE_PRO_PRICE_ID", "price_pro"),
        ("CARDWISE__PAYMENT__STRIPE_BUSINESS_PRICE_ID", "price_business"),
    ];

    fn set_minimal_env() {
        for (key, value) in VARS {
            env::set_var(key, value);
        }
    }

    fn clear_env() {
        for (key, _) in VARS {
            env::remove_var(key);
        }
        env::remove_var("CARDWISE__SERVER__PORT");
        env::remove_var("CARDWISE__SERVER__ENVIRONMENT");
        env::remove_var("CARDWISE__SERVER__PUBLIC_BASE_URL");
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.expect("config should load");
        assert_eq!(config.database.url, "postgresql://test@localhost/test");
        assert_eq!(config.auth.audience, "authenticated");
        assert!(config.wallet.apple.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_server_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("CARDWISE__SERVER__PORT", "3001");
        env::set_var("CARDWISE__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3001);
        assert!(config.is_production());
    }

    #[test]
    fn test_redirect_urls_default_to_public_base() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("CARDWISE__SERVER__PUBLIC_BASE_URL", "https://cards.example.com/");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(
            config.checkout_success_url(),
            "https://cards.example.com/dashboard?checkout=success"
        );
        assert_eq!(config.checkout_cancel_url(), "https://cards.example.com/pricing");
        assert_eq!(config.portal_return_url(), "https://cards.example.com/dashboard/billing");
    }
}
