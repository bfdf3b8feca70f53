//! HTTP DTOs for analytics endpoints.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::analytics::{AnalyticsSummary, EventKind};
use crate::domain::foundation::CardId;

/// Event posted by a public card page.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackEventRequest {
    pub card_id: CardId,
    #[serde(alias = "type")]
    pub event_type: EventKind,
    /// Client-detected device; the User-Agent header is used when absent.
    #[serde(default)]
    pub device_type: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub referrer: Option<String>,
    /// Required for `interaction` events (e.g. `link_click`).
    #[serde(default)]
    pub interaction_type: Option<String>,
    #[serde(default)]
    pub metadata: Option<Value>,
}

/// `?range=30d` or `?start=YYYY-MM-DD&end=YYYY-MM-DD`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyticsParams {
    pub range: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrackEventResponse {
    pub success: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsResponse {
    pub success: bool,
    pub analytics: AnalyticsSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_request_accepts_type_alias() {
        let req: TrackEventRequest = serde_json::from_str(
            r#"{"card_id": "7b6f6d0e-3a57-4a43-9a55-2f0c7a7e1f10", "type": "interaction", "interaction_type": "link_click"}"#,
        )
        .unwrap();
        assert_eq!(req.event_type, EventKind::Interaction);
        assert_eq!(req.interaction_type.as_deref(), Some("link_click"));
        assert!(req.device_type.is_none());
    }

    #[test]
    fn unknown_event_type_is_rejected() {
        let result: Result<TrackEventRequest, _> = serde_json::from_str(
            r#"{"card_id": "7b6f6d0e-3a57-4a43-9a55-2f0c7a7e1f10", "event_type": "purchase"}"#,
        );
        assert!(result.is_err());
    }
}
