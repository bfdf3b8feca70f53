//! Analytics ports.
//!
//! The write side records single events from public traffic; the read side
//! fetches every event of a set of cards for one date range so the domain
//! can aggregate in memory.

use crate::domain::analytics::{AnalyticsEvents, CardInteraction, CardView, ContactSave, DateRange};
use crate::domain::foundation::{CardId, DomainError};
use async_trait::async_trait;

/// Records analytics events.
#[async_trait]
pub trait AnalyticsRecorder: Send + Sync {
    /// Store a view and increment the card's `views_count`.
    ///
    /// # Errors
    ///
    /// - `CardNotFound` if the card does not exist
    async fn record_view(&self, view: &CardView) -> Result<(), DomainError>;

    /// Store a contact save.
    async fn record_save(&self, save: &ContactSave) -> Result<(), DomainError>;

    /// Store an interaction.
    async fn record_interaction(&self, interaction: &CardInteraction) -> Result<(), DomainError>;
}

/// Reads analytics events for aggregation.
#[async_trait]
pub trait AnalyticsReader: Send + Sync {
    /// All events of the given cards whose timestamp falls within `range`.
    ///
    /// Returns empty collections when `card_ids` is empty.
    async fn fetch_events(
        &self,
        card_ids: &[CardId],
        range: &DateRange,
    ) -> Result<AnalyticsEvents, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analytics_ports_are_object_safe() {
        fn _accepts_recorder(_r: &dyn AnalyticsRecorder) {}
        fn _accepts_reader(_r: &dyn AnalyticsReader) {}
    }
}
