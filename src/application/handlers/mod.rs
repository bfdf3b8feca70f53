//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations. Each
//! handler owns the `Arc` ports it needs and exposes one `handle` method.

pub mod analytics;
pub mod cards;
pub mod subscription;
pub mod wallet;

#[cfg(test)]
pub(crate) mod test_support;
