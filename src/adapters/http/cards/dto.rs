//! HTTP DTOs for card endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::card::{Card, CardProfile};
use crate::domain::foundation::{CardId, Timestamp, UserId};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to create a card.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCardRequest {
    pub name: String,
    /// Profile payload; the editor sends it as `data`.
    #[serde(default, alias = "data")]
    pub profile: CardProfile,
    #[serde(default)]
    pub is_template: bool,
}

/// Request from the editor's save button.
#[derive(Debug, Clone, Deserialize)]
pub struct SaveCardRequest {
    /// Card to update; omitted for a new card.
    #[serde(default)]
    pub id: Option<CardId>,
    pub name: String,
    #[serde(default, alias = "data")]
    pub profile: CardProfile,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// A card as seen by its owner.
#[derive(Debug, Clone, Serialize)]
pub struct CardDto {
    pub id: CardId,
    pub user_id: UserId,
    pub name: String,
    pub profile: CardProfile,
    pub is_template: bool,
    pub views_count: i64,
    pub public_url: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CardDto {
    pub fn from_card(card: Card, public_base_url: &str) -> Self {
        let public_url = card.public_url(public_base_url);
        Self {
            id: card.id,
            user_id: card.user_id,
            name: card.name,
            profile: card.profile,
            is_template: card.is_template,
            views_count: card.views_count,
            public_url,
            created_at: card.created_at,
            updated_at: card.updated_at,
        }
    }
}

/// A card as served to anonymous visitors; the owner is not exposed.
#[derive(Debug, Clone, Serialize)]
pub struct PublicCardDto {
    pub id: CardId,
    pub name: String,
    pub profile: CardProfile,
    pub public_url: String,
    pub updated_at: Timestamp,
}

impl PublicCardDto {
    pub fn from_card(card: Card, public_base_url: &str) -> Self {
        let public_url = card.public_url(public_base_url);
        Self {
            id: card.id,
            name: card.name,
            profile: card.profile,
            public_url,
            updated_at: card.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CardResponse {
    pub success: bool,
    pub card: CardDto,
}

#[derive(Debug, Clone, Serialize)]
pub struct SaveCardResponse {
    pub success: bool,
    pub card: CardDto,
    /// True when the save created a new card.
    pub created: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CardListResponse {
    pub success: bool,
    pub cards: Vec<CardDto>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PublicCardResponse {
    pub success: bool,
    pub card: PublicCardDto,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteCardResponse {
    pub success: bool,
}
