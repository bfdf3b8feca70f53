//! Fixtures shared by handler tests.

use std::sync::Arc;
use uuid::Uuid;

use crate::adapters::memory::{
    InMemoryAnalyticsStore, InMemoryCardRepository, InMemorySubscriptionRepository,
};
use crate::domain::card::{Card, CardProfile};
use crate::domain::foundation::UserId;
use crate::domain::subscription::{PlanId, Subscription};
use crate::ports::CardRepository;

pub fn user() -> UserId {
    UserId::from_uuid(Uuid::new_v4())
}

pub fn profile(full_name: &str) -> CardProfile {
    CardProfile {
        full_name: Some(full_name.to_string()),
        job_title: Some("Engineer".to_string()),
        company: Some("Acme".to_string()),
        email: Some("jane@acme.test".to_string()),
        ..CardProfile::default()
    }
}

pub fn card(owner: UserId, name: &str) -> Card {
    Card::create(owner, name, profile("Jane Doe"), false).unwrap()
}

/// In-memory stores wired together the way the server wires them.
#[derive(Clone)]
pub struct Stores {
    pub cards: InMemoryCardRepository,
    pub analytics: InMemoryAnalyticsStore,
    pub subscriptions: InMemorySubscriptionRepository,
}

impl Stores {
    pub fn new() -> Self {
        let cards = InMemoryCardRepository::new();
        Self {
            analytics: InMemoryAnalyticsStore::new(cards.clone()),
            cards,
            subscriptions: InMemorySubscriptionRepository::new(),
        }
    }

    pub fn cards(&self) -> Arc<InMemoryCardRepository> {
        Arc::new(self.cards.clone())
    }

    pub fn analytics(&self) -> Arc<InMemoryAnalyticsStore> {
        Arc::new(self.analytics.clone())
    }

    pub fn subscriptions(&self) -> Arc<InMemorySubscriptionRepository> {
        Arc::new(self.subscriptions.clone())
    }

    pub async fn add_card(&self, owner: UserId, name: &str) -> Card {
        let card = card(owner, name);
        self.cards.insert(&card).await.unwrap();
        card
    }

    pub async fn subscribe(&self, owner: UserId, plan: PlanId) -> Subscription {
        let subscription = Subscription::from_checkout(
            owner,
            plan,
            Some(format!("cus_{}", owner)),
            Some(format!("sub_{}", owner)),
        );
        crate::ports::SubscriptionRepository::upsert(&self.subscriptions, &subscription)
            .await
            .unwrap();
        subscription
    }
}
