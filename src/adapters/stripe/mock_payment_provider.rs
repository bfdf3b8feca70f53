//! Mock payment provider for testing.
//!
//! Provides a configurable mock implementation of `PaymentProvider` for unit
//! and integration tests. Supports:
//! - Pre-configured responses
//! - Error injection
//! - Call tracking
//! - Webhook event simulation

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::ports::{
    CheckoutSession, CreateCheckoutRequest, PaymentError, PaymentProvider, PortalSession,
    WebhookEvent, WebhookEventKind,
};

/// Mock payment provider for testing.
///
/// # Example
///
/// ```ignore
/// let mock = MockPaymentProvider::new();
/// mock.set_webhook_event(event);
/// mock.set_method_error("create_portal_session", PaymentError::network("down"));
/// ```
#[derive(Default, Clone)]
pub struct MockPaymentProvider {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    next_checkout: Option<CheckoutSession>,
    next_portal: Option<PortalSession>,
    next_webhook_event: Option<WebhookEvent>,
    next_error: Option<PaymentError>,
    method_errors: HashMap<String, PaymentError>,
    checkout_requests: Vec<CreateCheckoutRequest>,
    call_log: Vec<MethodCall>,
    reject_webhooks: bool,
}

/// Recorded method call for assertions.
#[derive(Debug, Clone)]
pub struct MethodCall {
    pub method: String,
    pub args: Vec<String>,
}

impl MockPaymentProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock that fails all webhook verifications.
    pub fn rejecting_webhooks() -> Self {
        let mock = Self::new();
        mock.state().reject_webhooks = true;
        mock
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Methods
    // ════════════════════════════════════════════════════════════════════════════

    pub fn set_checkout_session(&self, session: CheckoutSession) {
        self.state().next_checkout = Some(session);
    }

    pub fn set_portal_session(&self, session: PortalSession) {
        self.state().next_portal = Some(session);
    }

    /// Set the event returned by the next successful verification.
    pub fn set_webhook_event(&self, event: WebhookEvent) {
        self.state().next_webhook_event = Some(event);
    }

    /// Set an error to return on the next call to any method.
    pub fn set_error(&self, error: PaymentError) {
        self.state().next_error = Some(error);
    }

    /// Set an error for a specific method.
    pub fn set_method_error(&self, method: &str, error: PaymentError) {
        self.state().method_errors.insert(method.to_string(), error);
    }

    pub fn clear_errors(&self) {
        let mut state = self.state();
        state.next_error = None;
        state.method_errors.clear();
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Call Tracking
    // ════════════════════════════════════════════════════════════════════════════

    pub fn calls(&self) -> Vec<MethodCall> {
        self.state().call_log.clone()
    }

    pub fn was_called(&self, method: &str) -> bool {
        self.state().call_log.iter().any(|c| c.method == method)
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.state()
            .call_log
            .iter()
            .filter(|c| c.method == method)
            .count()
    }

    /// Checkout requests received, oldest first.
    pub fn checkout_requests(&self) -> Vec<CreateCheckoutRequest> {
        self.state().checkout_requests.clone()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Internal Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record_call(&self, method: &str, args: Vec<String>) {
        self.state().call_log.push(MethodCall {
            method: method.to_string(),
            args,
        });
    }

    fn check_error(&self, method: &str) -> Result<(), PaymentError> {
        let mut state = self.state();

        if let Some(error) = state.method_errors.get(method) {
            return Err(error.clone());
        }

        if let Some(error) = state.next_error.take() {
            return Err(error);
        }

        Ok(())
    }
}

fn short_id(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("{}_mock_{}", prefix, &id[..8])
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn create_checkout_session(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        self.record_call(
            "create_checkout_session",
            vec![request.user_id.to_string(), request.plan.to_string()],
        );
        self.check_error("create_checkout_session")?;

        let mut state = self.state();
        state.checkout_requests.push(request);
        Ok(state.next_checkout.take().unwrap_or_else(|| {
            let id = short_id("cs");
            CheckoutSession {
                url: format!("https://checkout.stripe.test/{}", id),
                id,
            }
        }))
    }

    async fn create_portal_session(
        &self,
        customer_id: &str,
        return_url: &str,
    ) -> Result<PortalSession, PaymentError> {
        self.record_call(
            "create_portal_session",
            vec![customer_id.to_string(), return_url.to_string()],
        );
        self.check_error("create_portal_session")?;

        Ok(self.state().next_portal.take().unwrap_or_else(|| {
            let id = short_id("bps");
            PortalSession {
                url: format!("https://billing.stripe.test/{}", id),
                id,
            }
        }))
    }

    async fn verify_webhook(&self, payload: &[u8], signature: &str) -> Result<WebhookEvent, PaymentError> {
        self.record_call(
            "verify_webhook",
            vec![payload.len().to_string(), signature.to_string()],
        );
        self.check_error("verify_webhook")?;

        let mut state = self.state();
        if state.reject_webhooks {
            return Err(PaymentError::invalid_webhook("Signature verification failed"));
        }
        Ok(state.next_webhook_event.take().unwrap_or_else(|| WebhookEvent {
            id: short_id("evt"),
            event_type: "ping".to_string(),
            kind: WebhookEventKind::Other,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;
    use crate::domain::subscription::PlanId;
    use crate::ports::PaymentErrorCode;

    fn checkout_request() -> CreateCheckoutRequest {
        CreateCheckoutRequest {
            user_id: UserId::from_uuid(uuid::Uuid::new_v4()),
            plan: PlanId::Pro,
            quantity: 1,
            customer_id: None,
            email: Some("a@example.com".to_string()),
            success_url: "https://app.test/ok".to_string(),
            cancel_url: "https://app.test/cancel".to_string(),
        }
    }

    #[tokio::test]
    async fn checkout_returns_generated_session_and_records_request() {
        let mock = MockPaymentProvider::new();
        let session = mock.create_checkout_session(checkout_request()).await.unwrap();
        assert!(session.id.starts_with("cs_mock_"));
        assert!(session.url.ends_with(&session.id));
        assert_eq!(mock.checkout_requests().len(), 1);
        assert!(mock.was_called("create_checkout_session"));
    }

    #[tokio::test]
    async fn global_error_is_consumed_once() {
        let mock = MockPaymentProvider::new();
        mock.set_error(PaymentError::network("down"));
        assert!(mock.create_portal_session("cus_1", "https://x").await.is_err());
        assert!(mock.create_portal_session("cus_1", "https://x").await.is_ok());
        assert_eq!(mock.call_count("create_portal_session"), 2);
    }

    #[tokio::test]
    async fn method_error_persists_until_cleared() {
        let mock = MockPaymentProvider::new();
        mock.set_method_error("create_portal_session", PaymentError::not_found("no customer"));
        assert!(mock.create_portal_session("cus_1", "https://x").await.is_err());
        assert!(mock.create_portal_session("cus_1", "https://x").await.is_err());
        mock.clear_errors();
        assert!(mock.create_portal_session("cus_1", "https://x").await.is_ok());
    }

    #[tokio::test]
    async fn rejecting_mock_fails_verification() {
        let mock = MockPaymentProvider::rejecting_webhooks();
        let err = mock.verify_webhook(b"{}", "sig").await.unwrap_err();
        assert_eq!(err.code, PaymentErrorCode::InvalidWebhook);
    }

    #[tokio::test]
    async fn verification_defaults_to_ignored_event() {
        let mock = MockPaymentProvider::new();
        let event = mock.verify_webhook(b"{}", "sig").await.unwrap();
        assert_eq!(event.kind, WebhookEventKind::Other);
    }
}
