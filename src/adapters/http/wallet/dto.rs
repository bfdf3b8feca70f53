//! HTTP DTOs for wallet pass endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::CardId;
use crate::domain::wallet::GoogleGenericObject;

/// Request for a wallet pass of one card.
#[derive(Debug, Clone, Deserialize)]
pub struct PassRequest {
    #[serde(alias = "cardId")]
    pub card_id: CardId,
}

#[derive(Debug, Clone, Serialize)]
pub struct GooglePassResponse {
    pub success: bool,
    pub save_url: String,
    pub object: GoogleGenericObject,
}
