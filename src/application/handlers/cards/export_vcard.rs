//! ExportVcardHandler - Query handler for the public vCard download.
//!
//! A download counts as a contact save. Recording it is best effort: a
//! failed insert is logged and the download still succeeds.

use std::sync::Arc;

use crate::domain::analytics::{ContactSave, DeviceType};
use crate::domain::card::{to_vcard, vcard_file_name};
use crate::domain::foundation::{CardId, DomainError};
use crate::ports::{AnalyticsRecorder, CardRepository};

use super::load_card;

/// Query to export a card as vCard.
#[derive(Debug, Clone)]
pub struct ExportVcardQuery {
    pub card_id: CardId,
    /// Base URL public card links are built from.
    pub public_base_url: String,
    pub user_agent: Option<String>,
}

/// A rendered vCard download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VcardExport {
    pub file_name: String,
    pub body: String,
}

/// Handler for vCard export.
pub struct ExportVcardHandler {
    cards: Arc<dyn CardRepository>,
    recorder: Arc<dyn AnalyticsRecorder>,
}

impl ExportVcardHandler {
    pub fn new(cards: Arc<dyn CardRepository>, recorder: Arc<dyn AnalyticsRecorder>) -> Self {
        Self { cards, recorder }
    }

    pub async fn handle(&self, query: ExportVcardQuery) -> Result<VcardExport, DomainError> {
        let card = load_card(self.cards.as_ref(), &query.card_id).await?;
        let export = VcardExport {
            file_name: vcard_file_name(&card),
            body: to_vcard(&card, &card.public_url(&query.public_base_url)),
        };

        let device = DeviceType::resolve(None, query.user_agent.as_deref());
        let recorded = match ContactSave::new(card.id, Some(device.as_str().to_string()), None) {
            Ok(save) => self.recorder.record_save(&save).await,
            Err(e) => Err(e.into()),
        };
        if let Err(e) = recorded {
            tracing::warn!(card_id = %card.id, error = %e, "failed to record contact save");
        }

        Ok(export)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{user, Stores};
    use crate::domain::analytics::{CardInteraction, CardView};
    use crate::domain::foundation::ErrorCode;
    use async_trait::async_trait;

    struct FailingRecorder;

    #[async_trait]
    impl AnalyticsRecorder for FailingRecorder {
        async fn record_view(&self, _view: &CardView) -> Result<(), DomainError> {
            Err(DomainError::database("down"))
        }

        async fn record_save(&self, _save: &ContactSave) -> Result<(), DomainError> {
            Err(DomainError::database("down"))
        }

        async fn record_interaction(&self, _interaction: &CardInteraction) -> Result<(), DomainError> {
            Err(DomainError::database("down"))
        }
    }

    fn query(card_id: CardId) -> ExportVcardQuery {
        ExportVcardQuery {
            card_id,
            public_base_url: "https://cards.test".to_string(),
            user_agent: Some("Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) Mobile".to_string()),
        }
    }

    #[tokio::test]
    async fn exports_vcard_and_records_save() {
        let stores = Stores::new();
        let card = stores.add_card(user(), "Work").await;

        let export = ExportVcardHandler::new(stores.cards(), stores.analytics())
            .handle(query(card.id))
            .await
            .unwrap();

        assert_eq!(export.file_name, "jane-doe.vcf");
        assert!(export.body.starts_with("BEGIN:VCARD\r\n"));
        assert!(export.body.contains(&format!("https://cards.test/c/{}", card.id)));

        let saves = stores.analytics.snapshot().await.saves;
        assert_eq!(saves.len(), 1);
        assert_eq!(saves[0].device_type.as_deref(), Some("mobile"));
    }

    #[tokio::test]
    async fn recording_failure_does_not_block_download() {
        let stores = Stores::new();
        let card = stores.add_card(user(), "Work").await;

        let export = ExportVcardHandler::new(stores.cards(), Arc::new(FailingRecorder))
            .handle(query(card.id))
            .await;
        assert!(export.is_ok());
    }

    #[tokio::test]
    async fn unknown_card_is_not_found() {
        let stores = Stores::new();
        let err = ExportVcardHandler::new(stores.cards(), stores.analytics())
            .handle(query(CardId::new()))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::CardNotFound);
    }
}
