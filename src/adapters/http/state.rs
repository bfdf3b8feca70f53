//! Shared application state for the HTTP layer.

use std::sync::Arc;

use crate::application::handlers::analytics::{
    GetCardAnalyticsHandler, GetDashboardAnalyticsHandler, TrackEventHandler,
};
use crate::application::handlers::cards::{
    CreateCardHandler, DeleteCardHandler, ExportVcardHandler, GetCardHandler, GetPublicCardHandler,
    ListCardsHandler, ListTemplatesHandler, SaveCardHandler,
};
use crate::application::handlers::subscription::{
    CreateCheckoutSessionHandler, CreatePortalSessionHandler, GetSubscriptionHandler,
    HandlePaymentWebhookHandler,
};
use crate::application::handlers::wallet::{GenerateApplePassHandler, GenerateGooglePassHandler};
use crate::config::AppConfig;
use crate::ports::{
    AnalyticsReader, AnalyticsRecorder, CardRepository, GoogleWalletSigner, PassAssetStore,
    PassSigner, PaymentProvider, SessionValidator, SubscriptionRepository,
};

/// Redirect and link targets handed to the handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppUrls {
    /// Base of public card links (`{base}/c/{card_id}`).
    pub public_base_url: String,
    pub checkout_success_url: String,
    pub checkout_cancel_url: String,
    pub portal_return_url: String,
}

impl AppUrls {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            public_base_url: config.server.public_base_url().to_string(),
            checkout_success_url: config.checkout_success_url(),
            checkout_cancel_url: config.checkout_cancel_url(),
            portal_return_url: config.portal_return_url(),
        }
    }
}

/// Shared application state containing all dependencies.
///
/// Cloned for each request; every dependency is behind an `Arc`. Wallet
/// signing material is optional and its absence surfaces as a
/// configuration error on the pass endpoints.
#[derive(Clone)]
pub struct AppState {
    pub cards: Arc<dyn CardRepository>,
    pub analytics_recorder: Arc<dyn AnalyticsRecorder>,
    pub analytics_reader: Arc<dyn AnalyticsReader>,
    pub subscriptions: Arc<dyn SubscriptionRepository>,
    pub payment_provider: Arc<dyn PaymentProvider>,
    pub session_validator: Arc<dyn SessionValidator>,
    pub pass_signer: Option<Arc<dyn PassSigner>>,
    pub pass_assets: Option<Arc<dyn PassAssetStore>>,
    pub google_signer: Option<Arc<dyn GoogleWalletSigner>>,
    pub urls: AppUrls,
}

impl AppState {
    // Cards

    pub fn create_card_handler(&self) -> CreateCardHandler {
        CreateCardHandler::new(self.cards.clone(), self.subscriptions.clone())
    }

    pub fn save_card_handler(&self) -> SaveCardHandler {
        SaveCardHandler::new(self.cards.clone(), self.subscriptions.clone())
    }

    pub fn get_card_handler(&self) -> GetCardHandler {
        GetCardHandler::new(self.cards.clone())
    }

    pub fn get_public_card_handler(&self) -> GetPublicCardHandler {
        GetPublicCardHandler::new(self.cards.clone())
    }

    pub fn list_cards_handler(&self) -> ListCardsHandler {
        ListCardsHandler::new(self.cards.clone())
    }

    pub fn list_templates_handler(&self) -> ListTemplatesHandler {
        ListTemplatesHandler::new(self.cards.clone())
    }

    pub fn delete_card_handler(&self) -> DeleteCardHandler {
        DeleteCardHandler::new(self.cards.clone())
    }

    pub fn export_vcard_handler(&self) -> ExportVcardHandler {
        ExportVcardHandler::new(self.cards.clone(), self.analytics_recorder.clone())
    }

    // Analytics

    pub fn track_event_handler(&self) -> TrackEventHandler {
        TrackEventHandler::new(self.cards.clone(), self.analytics_recorder.clone())
    }

    pub fn dashboard_analytics_handler(&self) -> GetDashboardAnalyticsHandler {
        GetDashboardAnalyticsHandler::new(self.cards.clone(), self.analytics_reader.clone())
    }

    pub fn card_analytics_handler(&self) -> GetCardAnalyticsHandler {
        GetCardAnalyticsHandler::new(self.cards.clone(), self.analytics_reader.clone())
    }

    // Subscription

    pub fn get_subscription_handler(&self) -> GetSubscriptionHandler {
        GetSubscriptionHandler::new(self.subscriptions.clone(), self.cards.clone())
    }

    pub fn checkout_handler(&self) -> CreateCheckoutSessionHandler {
        CreateCheckoutSessionHandler::new(self.subscriptions.clone(), self.payment_provider.clone())
    }

    pub fn portal_handler(&self) -> CreatePortalSessionHandler {
        CreatePortalSessionHandler::new(self.subscriptions.clone(), self.payment_provider.clone())
    }

    pub fn webhook_handler(&self) -> HandlePaymentWebhookHandler {
        HandlePaymentWebhookHandler::new(self.subscriptions.clone(), self.payment_provider.clone())
    }

    // Wallet

    pub fn apple_pass_handler(&self) -> GenerateApplePassHandler {
        GenerateApplePassHandler::new(
            self.cards.clone(),
            self.subscriptions.clone(),
            self.pass_signer.clone(),
            self.pass_assets.clone(),
        )
    }

    pub fn google_pass_handler(&self) -> GenerateGooglePassHandler {
        GenerateGooglePassHandler::new(
            self.cards.clone(),
            self.subscriptions.clone(),
            self.google_signer.clone(),
        )
    }
}
