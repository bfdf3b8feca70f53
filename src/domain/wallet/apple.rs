//! Apple PassKit `pass.json` model.
//!
//! Cards are issued as `generic` passes: the person's name is the primary
//! field, title and company are secondary, contact details go on the back,
//! and the front carries a QR code of the public card URL.

use serde::Serialize;

use crate::domain::card::{parse_hex_color, Card};

use super::WalletError;

const DEFAULT_BACKGROUND: (u8, u8, u8) = (17, 24, 39);

/// Issuer identity needed to build a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplePassSettings {
    pub pass_type_identifier: String,
    pub team_identifier: String,
    pub organization_name: String,
}

/// Top-level `pass.json` document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplePass {
    pub format_version: u8,
    pub pass_type_identifier: String,
    pub serial_number: String,
    pub team_identifier: String,
    pub organization_name: String,
    pub description: String,
    pub logo_text: String,
    pub foreground_color: String,
    pub background_color: String,
    pub label_color: String,
    pub sharing_prohibited: bool,
    pub generic: PassStructure,
    pub barcodes: Vec<PassBarcode>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PassStructure {
    pub primary_fields: Vec<PassField>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub secondary_fields: Vec<PassField>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub auxiliary_fields: Vec<PassField>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub back_fields: Vec<PassField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassField {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub value: String,
}

impl PassField {
    fn new(key: &str, label: &str, value: &str) -> Self {
        Self {
            key: key.to_string(),
            label: Some(label.to_string()),
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PassBarcode {
    pub format: String,
    pub message: String,
    pub message_encoding: String,
    pub alt_text: String,
}

impl ApplePass {
    /// Builds the pass document for a card shared at `public_url`.
    pub fn from_card(card: &Card, settings: &ApplePassSettings, public_url: &str) -> Result<Self, WalletError> {
        let pass_type_identifier = required("pass_type_identifier", &settings.pass_type_identifier)?;
        let team_identifier = required("team_identifier", &settings.team_identifier)?;
        let organization_name = required("organization_name", &settings.organization_name)?;

        let name = card.display_name().trim();
        if name.is_empty() {
            return Err(WalletError::MissingName);
        }
        let profile = &card.profile;

        let mut generic = PassStructure {
            primary_fields: vec![PassField::new("name", "NAME", name)],
            ..Default::default()
        };
        if let Some(title) = &profile.job_title {
            generic.secondary_fields.push(PassField::new("title", "TITLE", title));
        }
        if let Some(company) = &profile.company {
            generic.secondary_fields.push(PassField::new("company", "COMPANY", company));
        }
        if let Some(email) = &profile.email {
            generic.auxiliary_fields.push(PassField::new("email", "EMAIL", email));
            generic.back_fields.push(PassField::new("email-back", "Email", email));
        }
        if let Some(phone) = &profile.phone {
            generic.auxiliary_fields.push(PassField::new("phone", "PHONE", phone));
            generic.back_fields.push(PassField::new("phone-back", "Phone", phone));
        }
        if let Some(website) = &profile.website {
            generic.back_fields.push(PassField::new("website", "Website", website));
        }
        if let Some(address) = &profile.address {
            generic.back_fields.push(PassField::new("address", "Address", address));
        }
        if let Some(bio) = &profile.bio {
            generic.back_fields.push(PassField::new("bio", "About", bio));
        }
        generic.back_fields.push(PassField::new("card-url", "Digital card", public_url));

        let background = profile
            .accent_color
            .as_deref()
            .and_then(parse_hex_color)
            .unwrap_or(DEFAULT_BACKGROUND);
        let foreground = contrasting(background);

        Ok(Self {
            format_version: 1,
            pass_type_identifier: pass_type_identifier.to_string(),
            serial_number: card.id.to_string(),
            team_identifier: team_identifier.to_string(),
            organization_name: organization_name.to_string(),
            description: format!("Business card for {}", name),
            logo_text: profile.company.clone().unwrap_or_else(|| name.to_string()),
            foreground_color: rgb(foreground),
            background_color: rgb(background),
            label_color: rgb(foreground),
            sharing_prohibited: false,
            generic,
            barcodes: vec![PassBarcode {
                format: "PKBarcodeFormatQR".to_string(),
                message: public_url.to_string(),
                message_encoding: "iso-8859-1".to_string(),
                alt_text: name.to_string(),
            }],
        })
    }

    /// Serialized `pass.json` bytes.
    pub fn to_json(&self) -> Result<Vec<u8>, WalletError> {
        serde_json::to_vec_pretty(self).map_err(|e| WalletError::Archive(e.to_string()))
    }
}

fn required<'a>(name: &'static str, value: &'a str) -> Result<&'a str, WalletError> {
    let value = value.trim();
    if value.is_empty() {
        Err(WalletError::MissingConfiguration(name))
    } else {
        Ok(value)
    }
}

fn rgb((r, g, b): (u8, u8, u8)) -> String {
    format!("rgb({}, {}, {})", r, g, b)
}

// Relative luminance threshold from WCAG, simplified to sRGB weights.
fn contrasting((r, g, b): (u8, u8, u8)) -> (u8, u8, u8) {
    let luminance = 0.2126 * r as f64 + 0.7152 * g as f64 + 0.0722 * b as f64;
    if luminance > 140.0 {
        (0, 0, 0)
    } else {
        (255, 255, 255)
    }
}
