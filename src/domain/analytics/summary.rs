//! Analytics aggregation.
//!
//! Turns the raw event rows fetched for a date range into the dashboard
//! summary: totals, a zero-filled daily histogram, the device breakdown,
//! top locations, recent activity and per-card tallies.
//!
//! Totals and per-card tallies count every fetched row. The histogram only
//! counts rows whose UTC day falls inside the range.

use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::HashMap;

use crate::domain::card::Card;
use crate::domain::foundation::{CardId, Timestamp};

use super::device::DeviceCounts;
use super::{AnalyticsEvents, DateRange, DeviceType, EventKind};

/// Number of entries in the top-locations list.
pub const TOP_LOCATIONS: usize = 5;

/// Number of entries in the recent-activity list.
pub const RECENT_ACTIVITY: usize = 5;

/// Card identity needed to label aggregated rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardRef {
    pub id: CardId,
    pub name: String,
}

impl From<&Card> for CardRef {
    fn from(card: &Card) -> Self {
        Self {
            id: card.id,
            name: card.name.clone(),
        }
    }
}

/// Aggregated analytics for a set of cards over a date range.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub range: DateRange,
    pub totals: Totals,
    pub daily: Vec<DailyBucket>,
    pub devices: Vec<DeviceShare>,
    pub top_locations: Vec<LocationCount>,
    pub recent_activity: Vec<ActivityEntry>,
    pub cards: Vec<CardTally>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub views: u64,
    pub saves: u64,
    pub interactions: u64,
    /// Saves per hundred views, one decimal.
    pub conversion_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyBucket {
    pub date: NaiveDate,
    pub views: u64,
    pub saves: u64,
    pub interactions: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceShare {
    pub device: DeviceType,
    pub count: u64,
    /// Whole-number share of all views.
    pub percentage: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationCount {
    pub location: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    pub kind: EventKind,
    pub card_id: CardId,
    pub card_name: Option<String>,
    pub occurred_at: Timestamp,
    pub device: Option<DeviceType>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardTally {
    pub card_id: CardId,
    pub name: String,
    pub views: u64,
    pub saves: u64,
}

/// Aggregates event rows for the given cards over `range`.
pub fn aggregate(cards: &[CardRef], events: &AnalyticsEvents, range: &DateRange) -> AnalyticsSummary {
    let names: HashMap<CardId, &str> = cards.iter().map(|c| (c.id, c.name.as_str())).collect();

    let mut daily: Vec<DailyBucket> = range
        .days()
        .map(|date| DailyBucket {
            date,
            views: 0,
            saves: 0,
            interactions: 0,
        })
        .collect();
    let bucket_index = |ts: &Timestamp| -> Option<usize> {
        let date = ts.date();
        range
            .contains(date)
            .then(|| (date - range.start()).num_days() as usize)
    };

    let mut devices = DeviceCounts::default();
    let mut locations: HashMap<&str, u64> = HashMap::new();
    let mut tallies: HashMap<CardId, (u64, u64)> = HashMap::new();
    let mut activity: Vec<ActivityEntry> = Vec::new();

    for view in &events.views {
        let device = DeviceType::parse(view.device_type.as_deref());
        devices.add(device);
        if let Some(location) = non_blank(view.location.as_deref()) {
            *locations.entry(location).or_default() += 1;
        }
        if let Some(i) = bucket_index(&view.viewed_at) {
            daily[i].views += 1;
        }
        tallies.entry(view.card_id).or_default().0 += 1;
        activity.push(ActivityEntry {
            kind: EventKind::View,
            card_id: view.card_id,
            card_name: names.get(&view.card_id).map(|n| n.to_string()),
            occurred_at: view.viewed_at,
            device: Some(device),
            location: view.location.clone(),
        });
    }

    for save in &events.saves {
        if let Some(i) = bucket_index(&save.saved_at) {
            daily[i].saves += 1;
        }
        tallies.entry(save.card_id).or_default().1 += 1;
        activity.push(ActivityEntry {
            kind: EventKind::Save,
            card_id: save.card_id,
            card_name: names.get(&save.card_id).map(|n| n.to_string()),
            occurred_at: save.saved_at,
            device: Some(DeviceType::parse(save.device_type.as_deref())),
            location: save.location.clone(),
        });
    }

    for interaction in &events.interactions {
        if let Some(i) = bucket_index(&interaction.occurred_at) {
            daily[i].interactions += 1;
        }
        activity.push(ActivityEntry {
            kind: EventKind::Interaction,
            card_id: interaction.card_id,
            card_name: names.get(&interaction.card_id).map(|n| n.to_string()),
            occurred_at: interaction.occurred_at,
            device: None,
            location: None,
        });
    }

    let total_views = events.views.len() as u64;
    let total_saves = events.saves.len() as u64;

    let totals = Totals {
        views: total_views,
        saves: total_saves,
        interactions: events.interactions.len() as u64,
        conversion_rate: conversion_rate(total_saves, total_views),
    };

    let devices = DeviceType::ALL
        .iter()
        .map(|&device| {
            let count = devices.get(device);
            DeviceShare {
                device,
                count,
                percentage: percentage(count, total_views),
            }
        })
        .collect();

    let mut top_locations: Vec<LocationCount> = locations
        .into_iter()
        .map(|(location, count)| LocationCount {
            location: location.to_string(),
            count,
        })
        .collect();
    top_locations.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.location.cmp(&b.location)));
    top_locations.truncate(TOP_LOCATIONS);

    // Stable sort keeps view, save, interaction order for equal timestamps.
    activity.sort_by_key(|entry| Reverse(entry.occurred_at));
    activity.truncate(RECENT_ACTIVITY);

    let mut cards: Vec<CardTally> = cards
        .iter()
        .map(|card| {
            let (views, saves) = tallies.get(&card.id).copied().unwrap_or_default();
            CardTally {
                card_id: card.id,
                name: card.name.clone(),
                views,
                saves,
            }
        })
        .collect();
    cards.sort_by(|a, b| {
        b.views
            .cmp(&a.views)
            .then_with(|| b.saves.cmp(&a.saves))
            .then_with(|| a.name.cmp(&b.name))
    });

    AnalyticsSummary {
        range: *range,
        totals,
        daily,
        devices,
        top_locations,
        recent_activity: activity,
        cards,
    }
}

/// `count` as a whole-number percentage of `total`, with an empty total treated as 1.
pub fn percentage(count: u64, total: u64) -> u32 {
    let denominator = total.max(1) as f64;
    (count as f64 * 100.0 / denominator).round() as u32
}

/// Saves per hundred views rounded to one decimal, with zero views treated as 1.
pub fn conversion_rate(saves: u64, views: u64) -> f64 {
    let rate = saves as f64 / views.max(1) as f64 * 100.0;
    (rate * 10.0).round() / 10.0
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analytics::{CardInteraction, CardView, ContactSave};
    use crate::domain::foundation::EventId;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn at(day: u32, hour: u32) -> Timestamp {
        Timestamp::from_datetime(Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap())
    }

    fn view(card: CardId, ts: Timestamp, device: Option<&str>, location: Option<&str>) -> CardView {
        CardView {
            id: EventId::new(),
            card_id: card,
            viewed_at: ts,
            device_type: device.map(String::from),
            location: location.map(String::from),
            referrer: None,
        }
    }

    fn save(card: CardId, ts: Timestamp) -> ContactSave {
        ContactSave {
            id: EventId::new(),
            card_id: card,
            saved_at: ts,
            device_type: Some("mobile".to_string()),
            location: None,
        }
    }

    fn interaction(card: CardId, ts: Timestamp) -> CardInteraction {
        CardInteraction {
            id: EventId::new(),
            card_id: card,
            interaction_type: "link_click".to_string(),
            occurred_at: ts,
            metadata: json!({}),
        }
    }

    fn card(name: &str) -> CardRef {
        CardRef {
            id: CardId::new(),
            name: name.to_string(),
        }
    }

    #[test]
    fn empty_input_yields_zero_filled_summary() {
        let range = DateRange::new(date(1), date(7)).unwrap();
        let summary = aggregate(&[], &AnalyticsEvents::default(), &range);

        assert_eq!(summary.totals.views, 0);
        assert_eq!(summary.totals.conversion_rate, 0.0);
        assert_eq!(summary.daily.len(), 7);
        assert!(summary.daily.iter().all(|b| b.views == 0 && b.saves == 0 && b.interactions == 0));
        assert_eq!(summary.daily[0].date, date(1));
        assert_eq!(summary.daily[6].date, date(7));
        assert_eq!(summary.devices.len(), 3);
        assert!(summary.devices.iter().all(|d| d.count == 0 && d.percentage == 0));
        assert!(summary.top_locations.is_empty());
        assert!(summary.recent_activity.is_empty());
    }

    #[test]
    fn totals_and_conversion_rate() {
        let a = card("A");
        let events = AnalyticsEvents {
            views: (0..3).map(|h| view(a.id, at(2, h), None, None)).collect(),
            saves: vec![save(a.id, at(2, 5))],
            interactions: vec![interaction(a.id, at(3, 1))],
        };
        let range = DateRange::new(date(1), date(3)).unwrap();
        let summary = aggregate(&[a], &events, &range);

        assert_eq!(summary.totals.views, 3);
        assert_eq!(summary.totals.saves, 1);
        assert_eq!(summary.totals.interactions, 1);
        assert_eq!(summary.totals.conversion_rate, 33.3);
    }

    #[test]
    fn conversion_rate_without_views_uses_unit_denominator() {
        assert_eq!(conversion_rate(2, 0), 200.0);
        assert_eq!(conversion_rate(1, 8), 12.5);
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
    }

    #[test]
    fn daily_histogram_buckets_by_utc_day() {
        let a = card("A");
        let events = AnalyticsEvents {
            views: vec![
                view(a.id, at(1, 0), None, None),
                view(a.id, at(1, 23), None, None),
                view(a.id, at(3, 12), None, None),
            ],
            saves: vec![save(a.id, at(3, 13))],
            interactions: vec![interaction(a.id, at(2, 8))],
        };
        let range = DateRange::new(date(1), date(4)).unwrap();
        let summary = aggregate(&[a], &events, &range);

        let views: Vec<u64> = summary.daily.iter().map(|b| b.views).collect();
        let saves: Vec<u64> = summary.daily.iter().map(|b| b.saves).collect();
        let interactions: Vec<u64> = summary.daily.iter().map(|b| b.interactions).collect();
        assert_eq!(views, vec![2, 0, 1, 0]);
        assert_eq!(saves, vec![0, 0, 1, 0]);
        assert_eq!(interactions, vec![0, 1, 0, 0]);
    }

    #[test]
    fn rows_outside_range_count_in_totals_only() {
        let a = card("A");
        let events = AnalyticsEvents {
            views: vec![view(a.id, at(10, 0), None, None), view(a.id, at(2, 0), None, None)],
            ..Default::default()
        };
        let range = DateRange::new(date(1), date(3)).unwrap();
        let summary = aggregate(&[a], &events, &range);

        assert_eq!(summary.totals.views, 2);
        assert_eq!(summary.daily.iter().map(|b| b.views).sum::<u64>(), 1);
    }

    #[test]
    fn device_breakdown_defaults_unknown_to_desktop() {
        let a = card("A");
        let events = AnalyticsEvents {
            views: vec![
                view(a.id, at(1, 0), Some("mobile"), None),
                view(a.id, at(1, 1), Some("mobile"), None),
                view(a.id, at(1, 2), Some("tablet"), None),
                view(a.id, at(1, 3), Some("console"), None),
                view(a.id, at(1, 4), None, None),
                view(a.id, at(1, 5), Some("desktop"), None),
            ],
            ..Default::default()
        };
        let range = DateRange::new(date(1), date(1)).unwrap();
        let summary = aggregate(&[a], &events, &range);

        assert_eq!(
            summary.devices,
            vec![
                DeviceShare { device: DeviceType::Mobile, count: 2, percentage: 33 },
                DeviceShare { device: DeviceType::Desktop, count: 3, percentage: 50 },
                DeviceShare { device: DeviceType::Tablet, count: 1, percentage: 17 },
            ]
        );
    }

    #[test]
    fn top_locations_sorted_and_truncated() {
        let a = card("A");
        let mut views = Vec::new();
        for (location, n) in [("Berlin", 3), ("Austin", 3), ("Paris", 5), ("Oslo", 1), ("Lima", 2), ("Rome", 1)] {
            for _ in 0..n {
                views.push(view(a.id, at(1, 0), None, Some(location)));
            }
        }
        views.push(view(a.id, at(1, 0), None, Some("  ")));
        views.push(view(a.id, at(1, 0), None, None));
        let events = AnalyticsEvents {
            views,
            ..Default::default()
        };
        let range = DateRange::new(date(1), date(1)).unwrap();
        let summary = aggregate(&[a], &events, &range);

        let names: Vec<(&str, u64)> = summary
            .top_locations
            .iter()
            .map(|l| (l.location.as_str(), l.count))
            .collect();
        assert_eq!(
            names,
            vec![("Paris", 5), ("Austin", 3), ("Berlin", 3), ("Lima", 2), ("Oslo", 1)]
        );
    }

    #[test]
    fn recent_activity_is_newest_first_across_kinds() {
        let a = card("Alpha");
        let stranger = CardId::new();
        let events = AnalyticsEvents {
            views: vec![view(a.id, at(1, 1), Some("tablet"), Some("Oslo")), view(a.id, at(1, 9), None, None)],
            saves: vec![save(a.id, at(1, 5)), save(a.id, at(1, 2))],
            interactions: vec![interaction(stranger, at(1, 7)), interaction(a.id, at(1, 3))],
        };
        let range = DateRange::new(date(1), date(1)).unwrap();
        let summary = aggregate(&[a.clone()], &events, &range);

        let order: Vec<(EventKind, u32)> = summary
            .recent_activity
            .iter()
            .map(|e| {
                use chrono::Timelike;
                (e.kind, e.occurred_at.as_datetime().hour())
            })
            .collect();
        assert_eq!(
            order,
            vec![
                (EventKind::View, 9),
                (EventKind::Interaction, 7),
                (EventKind::Save, 5),
                (EventKind::Interaction, 3),
                (EventKind::Save, 2),
            ]
        );
        assert_eq!(summary.recent_activity[0].card_name.as_deref(), Some("Alpha"));
        assert_eq!(summary.recent_activity[1].card_name, None);
        assert_eq!(summary.recent_activity[1].device, None);
    }

    #[test]
    fn per_card_tallies_include_idle_cards_and_sort() {
        let busy = card("Busy");
        let saver = card("Saver");
        let idle_b = card("Idle B");
        let idle_a = card("Idle A");
        let events = AnalyticsEvents {
            views: vec![
                view(busy.id, at(1, 0), None, None),
                view(busy.id, at(1, 1), None, None),
                view(saver.id, at(1, 2), None, None),
            ],
            saves: vec![save(saver.id, at(1, 3))],
            ..Default::default()
        };
        let range = DateRange::new(date(1), date(1)).unwrap();
        let cards = vec![idle_b, saver.clone(), idle_a, busy.clone()];
        let summary = aggregate(&cards, &events, &range);

        let tallies: Vec<(&str, u64, u64)> = summary
            .cards
            .iter()
            .map(|t| (t.name.as_str(), t.views, t.saves))
            .collect();
        assert_eq!(
            tallies,
            vec![("Busy", 2, 0), ("Saver", 1, 1), ("Idle A", 0, 0), ("Idle B", 0, 0)]
        );
    }

    #[test]
    fn summary_serializes_camel_case() {
        let range = DateRange::new(date(1), date(1)).unwrap();
        let summary = aggregate(&[], &AnalyticsEvents::default(), &range);
        let value = serde_json::to_value(&summary).unwrap();
        assert!(value.get("topLocations").is_some());
        assert!(value.get("recentActivity").is_some());
        assert_eq!(value["totals"]["conversionRate"], json!(0.0));
        assert_eq!(value["range"]["start"], json!("2024-03-01"));
    }
}
