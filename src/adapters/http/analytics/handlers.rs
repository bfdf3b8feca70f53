//! HTTP handlers for analytics endpoints.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

use crate::application::handlers::analytics::{
    GetCardAnalyticsQuery, GetDashboardAnalyticsQuery, TrackEventCommand,
};
use crate::domain::analytics::DateRange;
use crate::domain::foundation::Timestamp;

use super::super::error::ApiError;
use super::super::extract::{parse_card_id, user_agent, ApiJson};
use super::super::middleware::RequireAuth;
use super::super::state::AppState;
use super::dto::{AnalyticsParams, AnalyticsResponse, TrackEventRequest, TrackEventResponse};

/// POST /api/analytics/track - Record a view, save or interaction
pub async fn track_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<TrackEventRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .track_event_handler()
        .handle(TrackEventCommand {
            card_id: req.card_id,
            kind: req.event_type,
            device_type: req.device_type,
            user_agent: user_agent(&headers),
            location: req.location,
            referrer: req.referrer,
            interaction_type: req.interaction_type,
            metadata: req.metadata,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(TrackEventResponse { success: true })))
}

/// GET /api/analytics - Dashboard summary over all of the user's cards
pub async fn dashboard_analytics(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(params): Query<AnalyticsParams>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = state
        .dashboard_analytics_handler()
        .handle(GetDashboardAnalyticsQuery {
            user_id: user.id,
            range: date_range(&params)?,
        })
        .await?;

    Ok(Json(AnalyticsResponse {
        success: true,
        analytics: summary,
    }))
}

/// GET /api/analytics/:card_id - Summary for one owned card
pub async fn card_analytics(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(card_id): Path<String>,
    Query(params): Query<AnalyticsParams>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = state
        .card_analytics_handler()
        .handle(GetCardAnalyticsQuery {
            card_id: parse_card_id(&card_id)?,
            user_id: user.id,
            range: date_range(&params)?,
        })
        .await?;

    Ok(Json(AnalyticsResponse {
        success: true,
        analytics: summary,
    }))
}

fn date_range(params: &AnalyticsParams) -> Result<DateRange, ApiError> {
    Ok(DateRange::from_query(
        params.range.as_deref(),
        params.start.as_deref(),
        params.end.as_deref(),
        Timestamp::now().date(),
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_params_use_default_range() {
        let range = date_range(&AnalyticsParams::default()).unwrap();
        assert_eq!(range.end(), Timestamp::now().date());
    }

    #[test]
    fn half_open_explicit_range_is_rejected() {
        let params = AnalyticsParams {
            start: Some("2024-01-01".to_string()),
            ..AnalyticsParams::default()
        };
        assert_eq!(date_range(&params).unwrap_err().status(), StatusCode::BAD_REQUEST);
    }
}
