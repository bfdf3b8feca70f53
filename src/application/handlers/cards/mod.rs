//! Card handlers.
//!
//! ## Commands
//! - Creating and upserting cards (subject to the plan's card limit)
//! - Deleting cards
//!
//! ## Queries
//! - Owner reads and listings
//! - Public card reads and vCard export

mod create_card;
mod delete_card;
mod export_vcard;
mod get_card;
mod get_public_card;
mod list_cards;
mod list_templates;
mod save_card;

use crate::domain::card::Card;
use crate::domain::foundation::{CardId, DomainError, ErrorCode, UserId};
use crate::ports::CardRepository;

// Commands
pub use create_card::{CreateCardCommand, CreateCardHandler};
pub use delete_card::{DeleteCardCommand, DeleteCardHandler};
pub use save_card::{SaveCardCommand, SaveCardHandler, SaveCardResult};

// Queries
pub use export_vcard::{ExportVcardHandler, ExportVcardQuery, VcardExport};
pub use get_card::{GetCardHandler, GetCardQuery};
pub use get_public_card::{GetPublicCardHandler, GetPublicCardQuery};
pub use list_cards::{ListCardsHandler, ListCardsQuery};
pub use list_templates::ListTemplatesHandler;

/// Loads a card or fails with `CardNotFound`.
pub(crate) async fn load_card(cards: &dyn CardRepository, id: &CardId) -> Result<Card, DomainError> {
    cards.find_by_id(id).await?.ok_or_else(|| {
        DomainError::new(ErrorCode::CardNotFound, "Card not found").with_detail("card_id", id.to_string())
    })
}

/// Loads a card the user owns: `CardNotFound` or `Forbidden` otherwise.
pub(crate) async fn load_owned_card(
    cards: &dyn CardRepository,
    id: &CardId,
    user_id: &UserId,
) -> Result<Card, DomainError> {
    let card = load_card(cards, id).await?;
    card.ensure_owned_by(user_id)?;
    Ok(card)
}
