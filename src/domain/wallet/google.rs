//! Google Wallet generic object and "save to wallet" JWT claims.

use serde::Serialize;

use crate::domain::card::Card;
use crate::domain::foundation::Timestamp;

use super::WalletError;

/// Base of the link that opens the save flow.
pub const SAVE_URL_BASE: &str = "https://pay.google.com/gp/v/save/";

const LANGUAGE: &str = "en-US";
const DEFAULT_BACKGROUND: &str = "#111827";

/// Issuer identity needed to build an object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleWalletSettings {
    pub issuer_id: String,
    pub class_suffix: String,
}

impl GoogleWalletSettings {
    pub fn class_id(&self) -> String {
        format!("{}.{}", self.issuer_id, self.class_suffix)
    }
}

/// A Google Wallet `GenericObject`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleGenericObject {
    pub id: String,
    pub class_id: String,
    pub state: String,
    pub card_title: LocalizedString,
    pub header: LocalizedString,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subheader: Option<LocalizedString>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub text_modules_data: Vec<TextModule>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links_module_data: Option<LinksModule>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<Image>,
    pub barcode: Barcode,
    pub hex_background_color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedString {
    pub default_value: TranslatedString,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslatedString {
    pub language: String,
    pub value: String,
}

impl LocalizedString {
    fn new(value: &str) -> Self {
        Self {
            default_value: TranslatedString {
                language: LANGUAGE.to_string(),
                value: value.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextModule {
    pub id: String,
    pub header: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinksModule {
    pub uris: Vec<LinkUri>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkUri {
    pub id: String,
    pub uri: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub source_uri: ImageUri,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageUri {
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Barcode {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
    pub alternate_text: String,
}

impl GoogleGenericObject {
    /// Builds the object for a card shared at `public_url`.
    pub fn from_card(card: &Card, settings: &GoogleWalletSettings, public_url: &str) -> Result<Self, WalletError> {
        if settings.issuer_id.trim().is_empty() {
            return Err(WalletError::MissingConfiguration("issuer_id"));
        }
        if settings.class_suffix.trim().is_empty() {
            return Err(WalletError::MissingConfiguration("class_suffix"));
        }
        let name = card.display_name().trim();
        if name.is_empty() {
            return Err(WalletError::MissingName);
        }
        let profile = &card.profile;

        let mut text_modules = Vec::new();
        let mut push_text = |id: &str, header: &str, body: &Option<String>| {
            if let Some(body) = body {
                text_modules.push(TextModule {
                    id: id.to_string(),
                    header: header.to_string(),
                    body: body.clone(),
                });
            }
        };
        push_text("email", "Email", &profile.email);
        push_text("phone", "Phone", &profile.phone);
        push_text("address", "Address", &profile.address);
        push_text("bio", "About", &profile.bio);

        let links_module_data = profile.website.as_ref().map(|website| LinksModule {
            uris: vec![LinkUri {
                id: "website".to_string(),
                uri: website.clone(),
                description: "Website".to_string(),
            }],
        });

        Ok(Self {
            id: format!("{}.{}", settings.issuer_id, card.id),
            class_id: settings.class_id(),
            state: "ACTIVE".to_string(),
            card_title: LocalizedString::new(profile.company.as_deref().unwrap_or("Business Card")),
            header: LocalizedString::new(name),
            subheader: profile.job_title.as_deref().map(LocalizedString::new),
            text_modules_data: text_modules,
            links_module_data,
            logo: profile.avatar_url.as_ref().map(|uri| Image {
                source_uri: ImageUri { uri: uri.clone() },
            }),
            barcode: Barcode {
                kind: "QR_CODE".to_string(),
                value: public_url.to_string(),
                alternate_text: name.to_string(),
            },
            hex_background_color: profile
                .accent_color
                .clone()
                .unwrap_or_else(|| DEFAULT_BACKGROUND.to_string()),
        })
    }
}

/// Claims of the RS256 "save to wallet" JWT.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaveClaims {
    pub iss: String,
    pub aud: String,
    pub typ: String,
    pub iat: i64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub origins: Vec<String>,
    pub payload: SavePayload,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavePayload {
    pub generic_objects: Vec<GoogleGenericObject>,
}

impl SaveClaims {
    /// Claims issued by `service_account_email` for one object.
    pub fn new(service_account_email: &str, object: GoogleGenericObject, origins: Vec<String>) -> Self {
        Self {
            iss: service_account_email.to_string(),
            aud: "google".to_string(),
            typ: "savetowallet".to_string(),
            iat: Timestamp::now().as_unix_secs(),
            origins,
            payload: SavePayload {
                generic_objects: vec![object],
            },
        }
    }
}

/// Link that opens the save flow for a signed token.
pub fn save_url(token: &str) -> String {
    format!("{}{}", SAVE_URL_BASE, token)
}
