//! Analytics domain module.
//!
//! Event rows (views, saves, interactions), the date ranges they are queried
//! over, and the pure aggregation that builds dashboard summaries.
//!
//! # Module Structure
//!
//! - `device` - Device classification
//! - `events` - Raw event rows
//! - `range` - Inclusive date ranges and query parsing
//! - `summary` - Aggregation into `AnalyticsSummary`

mod device;
mod events;
mod range;
mod summary;

pub use device::DeviceType;
pub use events::{
    AnalyticsEvents, CardInteraction, CardView, ContactSave, EventKind, MAX_CONTEXT_LEN,
    MAX_INTERACTION_TYPE_LEN,
};
pub use range::{DateRange, DEFAULT_RANGE_DAYS, MAX_PRESET_DAYS, MAX_SPAN_DAYS};
pub use summary::{
    aggregate, conversion_rate, percentage, ActivityEntry, AnalyticsSummary, CardRef, CardTally,
    DailyBucket, DeviceShare, LocationCount, Totals, RECENT_ACTIVITY, TOP_LOCATIONS,
};
