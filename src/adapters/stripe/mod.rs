//! Stripe payment provider adapter.
//!
//! Implements the `PaymentProvider` port for Stripe:
//! - Hosted checkout sessions for the paid plans
//! - Billing portal sessions
//! - Webhook signature verification and event translation
//!
//! # Security
//!
//! - Webhook signatures use HMAC-SHA256 with constant-time comparison
//! - Timestamps are validated to prevent replay attacks (5-minute window)
//! - All secrets are handled via `secrecy::SecretString`
//!
//! # Configuration
//!
//! Required environment variables:
//! - `CARDWISE__PAYMENT__STRIPE_API_KEY`: Stripe secret API key
//! - `CARDWISE__PAYMENT__STRIPE_WEBHOOK_SECRET`: Webhook signing secret (whsec_...)
//! - `CARDWISE__PAYMENT__STRIPE_PRO_PRICE_ID` / `..._BUSINESS_PRICE_ID`

mod mock_payment_provider;
mod stripe_adapter;
mod webhook_types;

pub use mock_payment_provider::{MethodCall, MockPaymentProvider};
pub use stripe_adapter::{StripeConfig, StripePaymentAdapter};
pub use webhook_types::{SignatureHeader, SignatureParseError};
