//! Card repository port.
//!
//! Persists Card aggregates. Ownership checks happen in the application
//! layer; implementations store and return whatever they are given.

use crate::domain::card::Card;
use crate::domain::foundation::{CardId, DomainError, UserId};
use async_trait::async_trait;

/// Repository port for Card aggregate persistence.
#[async_trait]
pub trait CardRepository: Send + Sync {
    /// Insert a new card.
    ///
    /// # Errors
    ///
    /// - `Conflict` if a card with the same id exists
    /// - `DatabaseError` on persistence failure
    async fn insert(&self, card: &Card) -> Result<(), DomainError>;

    /// Update name, profile and `updated_at` of an existing card.
    ///
    /// # Errors
    ///
    /// - `CardNotFound` if the card does not exist
    /// - `DatabaseError` on persistence failure
    async fn update(&self, card: &Card) -> Result<(), DomainError>;

    /// Find a card by id. Returns `None` if not found.
    async fn find_by_id(&self, id: &CardId) -> Result<Option<Card>, DomainError>;

    /// All cards owned by a user, most recently updated first.
    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Card>, DomainError>;

    /// Cards flagged as templates, most recently updated first.
    async fn list_templates(&self) -> Result<Vec<Card>, DomainError>;

    /// Number of cards owned by a user.
    async fn count_by_user(&self, user_id: &UserId) -> Result<u32, DomainError>;

    /// Delete a card and its events.
    ///
    /// # Errors
    ///
    /// - `CardNotFound` if the card does not exist
    async fn delete(&self, id: &CardId) -> Result<(), DomainError>;
}
