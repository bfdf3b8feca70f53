//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Storage Ports
//!
//! - `CardRepository` - Card persistence
//! - `AnalyticsRecorder` / `AnalyticsReader` - Event rows
//! - `SubscriptionRepository` - Per-user subscription rows
//!
//! ## External Service Ports
//!
//! - `PaymentProvider` - Checkout, billing portal and webhooks
//! - `SessionValidator` - Access token validation
//! - `PassSigner` / `PassAssetStore` - Apple pass signing and images
//! - `GoogleWalletSigner` - Google Wallet save links

mod analytics_repository;
mod card_repository;
mod payment_provider;
mod session_validator;
mod subscription_repository;
mod wallet;

pub use analytics_repository::{AnalyticsReader, AnalyticsRecorder};
pub use card_repository::CardRepository;
pub use payment_provider::{
    CheckoutSession, CreateCheckoutRequest, PaymentError, PaymentErrorCode, PaymentProvider,
    PortalSession, WebhookEvent, WebhookEventKind,
};
pub use session_validator::SessionValidator;
pub use subscription_repository::SubscriptionRepository;
pub use wallet::{GoogleWalletSigner, PassAssetStore, PassSigner};
