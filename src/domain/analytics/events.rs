//! Raw analytics event rows.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::foundation::{CardId, EventId, Timestamp, ValidationError};

/// Maximum length of an interaction type label.
pub const MAX_INTERACTION_TYPE_LEN: usize = 50;

/// Maximum length of stored location and referrer strings.
pub const MAX_CONTEXT_LEN: usize = 200;

/// Kind of analytics event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    View,
    Save,
    Interaction,
}

/// A public view of a card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardView {
    pub id: EventId,
    pub card_id: CardId,
    pub viewed_at: Timestamp,
    pub device_type: Option<String>,
    pub location: Option<String>,
    pub referrer: Option<String>,
}

impl CardView {
    /// Records a view happening now.
    pub fn new(
        card_id: CardId,
        device_type: Option<String>,
        location: Option<String>,
        referrer: Option<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            id: EventId::new(),
            card_id,
            viewed_at: Timestamp::now(),
            device_type,
            location: clean_context("location", location)?,
            referrer: clean_context("referrer", referrer)?,
        })
    }
}

/// A contact save (vCard download or wallet add) of a card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactSave {
    pub id: EventId,
    pub card_id: CardId,
    pub saved_at: Timestamp,
    pub device_type: Option<String>,
    pub location: Option<String>,
}

impl ContactSave {
    /// Records a save happening now.
    pub fn new(
        card_id: CardId,
        device_type: Option<String>,
        location: Option<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            id: EventId::new(),
            card_id,
            saved_at: Timestamp::now(),
            device_type,
            location: clean_context("location", location)?,
        })
    }
}

/// Any other tracked interaction (link click, QR scan, share).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardInteraction {
    pub id: EventId,
    pub card_id: CardId,
    pub interaction_type: String,
    pub occurred_at: Timestamp,
    pub metadata: Value,
}

impl CardInteraction {
    /// Records an interaction happening now.
    pub fn new(
        card_id: CardId,
        interaction_type: impl AsRef<str>,
        metadata: Option<Value>,
    ) -> Result<Self, ValidationError> {
        let interaction_type = interaction_type.as_ref().trim();
        if interaction_type.is_empty() {
            return Err(ValidationError::empty_field("interaction_type"));
        }
        let len = interaction_type.chars().count();
        if len > MAX_INTERACTION_TYPE_LEN {
            return Err(ValidationError::too_long(
                "interaction_type",
                MAX_INTERACTION_TYPE_LEN,
                len,
            ));
        }
        let metadata = metadata.unwrap_or_else(|| Value::Object(Default::default()));
        if !metadata.is_object() {
            return Err(ValidationError::invalid_format(
                "metadata",
                "must be a JSON object",
            ));
        }
        Ok(Self {
            id: EventId::new(),
            card_id,
            interaction_type: interaction_type.to_string(),
            occurred_at: Timestamp::now(),
            metadata,
        })
    }
}

/// All event rows fetched for one aggregation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalyticsEvents {
    pub views: Vec<CardView>,
    pub saves: Vec<ContactSave>,
    pub interactions: Vec<CardInteraction>,
}

fn clean_context(field: &str, value: Option<String>) -> Result<Option<String>, ValidationError> {
    let value = value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
    if let Some(v) = &value {
        let len = v.chars().count();
        if len > MAX_CONTEXT_LEN {
            return Err(ValidationError::too_long(field, MAX_CONTEXT_LEN, len));
        }
    }
    Ok(value)
}
