//! HTTP handlers for card endpoints.

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::application::handlers::cards::{
    CreateCardCommand, DeleteCardCommand, ExportVcardQuery, GetCardQuery, GetPublicCardQuery,
    ListCardsQuery, SaveCardCommand,
};

use super::super::error::ApiError;
use super::super::extract::{parse_card_id, user_agent, ApiJson};
use super::super::middleware::RequireAuth;
use super::super::state::AppState;
use super::dto::{
    CardDto, CardListResponse, CardResponse, CreateCardRequest, DeleteCardResponse, PublicCardDto,
    PublicCardResponse, SaveCardRequest, SaveCardResponse,
};

/// Media type of vCard downloads.
pub const VCARD_CONTENT_TYPE: &str = "text/vcard; charset=utf-8";

/// POST /api/cards - Create a card
pub async fn create_card(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(req): ApiJson<CreateCardRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let card = state
        .create_card_handler()
        .handle(CreateCardCommand {
            user_id: user.id,
            name: req.name,
            profile: req.profile,
            is_template: req.is_template,
        })
        .await?;

    let response = CardResponse {
        success: true,
        card: CardDto::from_card(card, &state.urls.public_base_url),
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/cards/save - Create or update from the editor
pub async fn save_card(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(req): ApiJson<SaveCardRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .save_card_handler()
        .handle(SaveCardCommand {
            user_id: user.id,
            card_id: req.id,
            name: req.name,
            profile: req.profile,
        })
        .await?;

    let status = if result.created { StatusCode::CREATED } else { StatusCode::OK };
    let response = SaveCardResponse {
        success: true,
        card: CardDto::from_card(result.card, &state.urls.public_base_url),
        created: result.created,
    };
    Ok((status, Json(response)))
}

/// GET /api/cards - The user's cards
pub async fn list_cards(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let cards = state
        .list_cards_handler()
        .handle(ListCardsQuery { user_id: user.id })
        .await?;

    Ok(Json(CardListResponse {
        success: true,
        cards: cards
            .into_iter()
            .map(|card| CardDto::from_card(card, &state.urls.public_base_url))
            .collect(),
    }))
}

/// GET /api/cards/templates - Template cards, public
pub async fn list_templates(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let cards = state.list_templates_handler().handle().await?;

    Ok(Json(CardListResponse {
        success: true,
        cards: cards
            .into_iter()
            .map(|card| CardDto::from_card(card, &state.urls.public_base_url))
            .collect(),
    }))
}

/// GET /api/cards/:id - One owned card
pub async fn get_card(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let card = state
        .get_card_handler()
        .handle(GetCardQuery {
            card_id: parse_card_id(&id)?,
            user_id: user.id,
        })
        .await?;

    Ok(Json(CardResponse {
        success: true,
        card: CardDto::from_card(card, &state.urls.public_base_url),
    }))
}

/// DELETE /api/cards/:id - Delete an owned card
pub async fn delete_card(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .delete_card_handler()
        .handle(DeleteCardCommand {
            card_id: parse_card_id(&id)?,
            user_id: user.id,
        })
        .await?;

    Ok(Json(DeleteCardResponse { success: true }))
}

/// GET /api/public/cards/:id - Public card page data
pub async fn get_public_card(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let card = state
        .get_public_card_handler()
        .handle(GetPublicCardQuery {
            card_id: parse_card_id(&id)?,
        })
        .await?;

    Ok(Json(PublicCardResponse {
        success: true,
        card: PublicCardDto::from_card(card, &state.urls.public_base_url),
    }))
}

/// GET /api/public/cards/:id/vcard - vCard download
pub async fn export_vcard(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let export = state
        .export_vcard_handler()
        .handle(ExportVcardQuery {
            card_id: parse_card_id(&id)?,
            public_base_url: state.urls.public_base_url.clone(),
            user_agent: user_agent(&headers),
        })
        .await?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(VCARD_CONTENT_TYPE)),
            (header::CONTENT_DISPOSITION, attachment(&export.file_name)),
        ],
        export.body,
    )
        .into_response())
}

/// `Content-Disposition` for a download; names that are not valid header
/// text fall back to a plain attachment.
pub(crate) fn attachment(file_name: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("attachment; filename=\"{}\"", file_name))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}
