//! Card aggregate entity.
//!
//! A Card is one digital business card owned by a user. Its contact details
//! live in the `CardProfile` payload; the aggregate guards the name and
//! ownership rules around it.
//!
//! # Design Decisions
//!
//! - **Owner-scoped writes**: Only the owner may update or delete a card
//! - **Templates are public**: Cards flagged `is_template` are listed for everyone
//! - **View counter**: `views_count` is maintained by the analytics recorder

use crate::domain::foundation::{CardId, DomainError, ErrorCode, Timestamp, UserId, ValidationError};
use serde::{Deserialize, Serialize};

use super::CardProfile;

/// Maximum length of a card name, in characters.
pub const MAX_CARD_NAME_LEN: usize = 100;

/// Card aggregate - a user's digital business card.
///
/// # Invariants
///
/// - `name` is 1..=100 characters after trimming
/// - `profile` is normalized and valid
/// - `updated_at >= created_at`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    /// Unique identifier for this card.
    pub id: CardId,

    /// User who owns this card.
    pub user_id: UserId,

    /// Name shown in the dashboard card list.
    pub name: String,

    /// Contact details and presentation data.
    pub profile: CardProfile,

    /// Offered to every user as a starting point.
    pub is_template: bool,

    /// Number of recorded public views.
    pub views_count: i64,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Card {
    /// Creates a new card after validating name and profile.
    pub fn create(
        user_id: UserId,
        name: impl AsRef<str>,
        profile: CardProfile,
        is_template: bool,
    ) -> Result<Self, ValidationError> {
        let name = validate_name(name.as_ref())?;
        let profile = profile.normalized();
        profile.validate()?;

        let now = Timestamp::now();
        Ok(Self {
            id: CardId::new(),
            user_id,
            name,
            profile,
            is_template,
            views_count: 0,
            created_at: now,
            updated_at: now,
        })
    }

    /// Replaces name and profile, bumping `updated_at`.
    pub fn update(&mut self, name: impl AsRef<str>, profile: CardProfile) -> Result<(), ValidationError> {
        let name = validate_name(name.as_ref())?;
        let profile = profile.normalized();
        profile.validate()?;

        self.name = name;
        self.profile = profile;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Returns true if the given user owns this card.
    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.user_id == user_id
    }

    /// Fails with `Forbidden` unless the given user owns this card.
    pub fn ensure_owned_by(&self, user_id: &UserId) -> Result<(), DomainError> {
        if self.is_owned_by(user_id) {
            Ok(())
        } else {
            Err(DomainError::new(
                ErrorCode::Forbidden,
                "You do not have access to this card",
            ))
        }
    }

    /// Person name shown on the card, falling back to the card name.
    pub fn display_name(&self) -> &str {
        self.profile.full_name.as_deref().unwrap_or(&self.name)
    }

    /// Public URL of this card under the given base URL.
    pub fn public_url(&self, base_url: &str) -> String {
        format!("{}/c/{}", base_url.trim_end_matches('/'), self.id)
    }
}

fn validate_name(name: &str) -> Result<String, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::empty_field("name"));
    }
    let len = name.chars().count();
    if len > MAX_CARD_NAME_LEN {
        return Err(ValidationError::too_long("name", MAX_CARD_NAME_LEN, len));
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn user() -> UserId {
        UserId::from_uuid(Uuid::new_v4())
    }

    #[test]
    fn create_trims_name_and_normalizes_profile() {
        let profile = CardProfile {
            company: Some("  Acme ".to_string()),
            ..Default::default()
        };
        let card = Card::create(user(), "  Work card ", profile, false).unwrap();
        assert_eq!(card.name, "Work card");
        assert_eq!(card.profile.company.as_deref(), Some("Acme"));
        assert_eq!(card.views_count, 0);
        assert_eq!(card.created_at, card.updated_at);
    }

    #[test]
    fn create_rejects_empty_name() {
        let err = Card::create(user(), "   ", CardProfile::default(), false).unwrap_err();
        assert_eq!(err, ValidationError::empty_field("name"));
    }

    #[test]
    fn create_rejects_long_name() {
        let name = "n".repeat(MAX_CARD_NAME_LEN + 1);
        let err = Card::create(user(), name, CardProfile::default(), false).unwrap_err();
        assert_eq!(err, ValidationError::too_long("name", MAX_CARD_NAME_LEN, 101));
    }

    #[test]
    fn name_length_counts_characters_not_bytes() {
        let name = "é".repeat(MAX_CARD_NAME_LEN);
        assert!(Card::create(user(), name, CardProfile::default(), false).is_ok());
    }

    #[test]
    fn create_rejects_invalid_profile() {
        let profile = CardProfile {
            email: Some("nope".to_string()),
            ..Default::default()
        };
        let err = Card::create(user(), "Card", profile, false).unwrap_err();
        assert_eq!(err.field(), "email");
    }

    #[test]
    fn update_replaces_fields() {
        let mut card = Card::create(user(), "Old", CardProfile::default(), false).unwrap();
        let profile = CardProfile {
            full_name: Some("Grace Hopper".to_string()),
            ..Default::default()
        };
        card.update("New", profile).unwrap();
        assert_eq!(card.name, "New");
        assert_eq!(card.display_name(), "Grace Hopper");
        assert!(card.updated_at >= card.created_at);
    }

    #[test]
    fn failed_update_leaves_card_untouched() {
        let mut card = Card::create(user(), "Old", CardProfile::default(), false).unwrap();
        assert!(card.update("", CardProfile::default()).is_err());
        assert_eq!(card.name, "Old");
    }

    #[test]
    fn ownership_is_checked() {
        let owner = user();
        let card = Card::create(owner, "Card", CardProfile::default(), false).unwrap();
        assert!(card.ensure_owned_by(&owner).is_ok());
        let err = card.ensure_owned_by(&user()).unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[test]
    fn display_name_falls_back_to_card_name() {
        let card = Card::create(user(), "Side gig", CardProfile::default(), false).unwrap();
        assert_eq!(card.display_name(), "Side gig");
    }

    #[test]
    fn public_url_joins_base() {
        let card = Card::create(user(), "Card", CardProfile::default(), false).unwrap();
        assert_eq!(
            card.public_url("https://cardwise.app/"),
            format!("https://cardwise.app/c/{}", card.id)
        );
    }
}
