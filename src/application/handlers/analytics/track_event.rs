//! TrackEventHandler - Command handler for recording card analytics events.

use std::sync::Arc;

use serde_json::Value;

use crate::domain::analytics::{CardInteraction, CardView, ContactSave, DeviceType, EventKind};
use crate::domain::foundation::{CardId, DomainError, ValidationError};
use crate::ports::{AnalyticsRecorder, CardRepository};

use super::super::cards::load_card;

/// Command to record one event.
#[derive(Debug, Clone)]
pub struct TrackEventCommand {
    pub card_id: CardId,
    pub kind: EventKind,
    /// Client-reported device; inferred from `user_agent` when absent.
    pub device_type: Option<String>,
    pub user_agent: Option<String>,
    pub location: Option<String>,
    pub referrer: Option<String>,
    /// Required for interactions.
    pub interaction_type: Option<String>,
    pub metadata: Option<Value>,
}

/// Handler for event tracking. Unauthenticated; only the card must exist.
pub struct TrackEventHandler {
    cards: Arc<dyn CardRepository>,
    recorder: Arc<dyn AnalyticsRecorder>,
}

impl TrackEventHandler {
    pub fn new(cards: Arc<dyn CardRepository>, recorder: Arc<dyn AnalyticsRecorder>) -> Self {
        Self { cards, recorder }
    }

    pub async fn handle(&self, cmd: TrackEventCommand) -> Result<(), DomainError> {
        load_card(self.cards.as_ref(), &cmd.card_id).await?;

        let device = DeviceType::resolve(cmd.device_type.as_deref(), cmd.user_agent.as_deref());
        let device = Some(device.as_str().to_string());

        match cmd.kind {
            EventKind::View => {
                let view = CardView::new(cmd.card_id, device, cmd.location, cmd.referrer)?;
                self.recorder.record_view(&view).await?;
            }
            EventKind::Save => {
                let save = ContactSave::new(cmd.card_id, device, cmd.location)?;
                self.recorder.record_save(&save).await?;
            }
            EventKind::Interaction => {
                let interaction_type = cmd
                    .interaction_type
                    .ok_or_else(|| ValidationError::empty_field("interaction_type"))?;
                let interaction = CardInteraction::new(cmd.card_id, interaction_type, cmd.metadata)?;
                self.recorder.record_interaction(&interaction).await?;
            }
        }

        tracing::debug!(card_id = %cmd.card_id, kind = ?cmd.kind, "analytics event recorded");
        Ok(())
    }
}
