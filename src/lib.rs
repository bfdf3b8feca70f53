//! Cardwise - Digital business card backend
//!
//! Users design business cards, share them through public links and vCard
//! downloads, add them to Apple and Google wallets, and follow views and
//! saves in an analytics dashboard. Paid plans are billed through Stripe.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
