//! Card profile payload.
//!
//! The structured contact details stored in the `cards.data` JSON column.
//! Keys the backend does not model (layout, fonts, editor state) are kept
//! in `extra` and written back untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::foundation::ValidationError;

/// Maximum length of any single free-text profile field.
pub const MAX_FIELD_LEN: usize = 500;

/// Maximum length of the bio.
pub const MAX_BIO_LEN: usize = 2000;

/// Maximum number of social links on one card.
pub const MAX_SOCIAL_LINKS: usize = 20;

/// Contact details and presentation data of a card.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,

    /// Brand colour as `#RRGGBB`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent_color: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub social_links: Vec<SocialLink>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A link to one of the owner's social profiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLink {
    pub platform: String,
    pub url: String,
}

impl CardProfile {
    /// Returns a copy with surrounding whitespace trimmed and blank fields cleared.
    pub fn normalized(mut self) -> Self {
        for field in [
            &mut self.full_name,
            &mut self.job_title,
            &mut self.company,
            &mut self.email,
            &mut self.phone,
            &mut self.website,
            &mut self.address,
            &mut self.bio,
            &mut self.avatar_url,
            &mut self.accent_color,
        ] {
            *field = field
                .take()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty());
        }
        self.social_links = self
            .social_links
            .into_iter()
            .map(|link| SocialLink {
                platform: link.platform.trim().to_string(),
                url: link.url.trim().to_string(),
            })
            .filter(|link| !link.url.is_empty())
            .collect();
        self
    }

    /// Validates formats and lengths. Call on a normalized profile.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let text_fields = [
            ("full_name", &self.full_name),
            ("job_title", &self.job_title),
            ("company", &self.company),
            ("email", &self.email),
            ("phone", &self.phone),
            ("website", &self.website),
            ("address", &self.address),
            ("avatar_url", &self.avatar_url),
        ];
        for (name, value) in text_fields {
            if let Some(value) = value {
                check_len(name, value, MAX_FIELD_LEN)?;
            }
        }
        if let Some(bio) = &self.bio {
            check_len("bio", bio, MAX_BIO_LEN)?;
        }

        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        if let Some(website) = &self.website {
            validate_http_url("website", website)?;
        }
        if let Some(avatar) = &self.avatar_url {
            validate_http_url("avatar_url", avatar)?;
        }
        if let Some(color) = &self.accent_color {
            if parse_hex_color(color).is_none() {
                return Err(ValidationError::invalid_format(
                    "accent_color",
                    "expected #RRGGBB",
                ));
            }
        }

        if self.social_links.len() > MAX_SOCIAL_LINKS {
            return Err(ValidationError::out_of_range(
                "social_links",
                0,
                MAX_SOCIAL_LINKS as i64,
                self.social_links.len() as i64,
            ));
        }
        for link in &self.social_links {
            validate_http_url("social_links.url", &link.url)?;
        }

        Ok(())
    }
}

/// Parses `#RRGGBB` into its components.
pub fn parse_hex_color(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

fn check_len(field: &str, value: &str, max: usize) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len > max {
        return Err(ValidationError::too_long(field, max, len));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), ValidationError> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !domain.contains('@')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(ValidationError::invalid_format("email", "not a valid email address"))
    }
}

fn validate_http_url(field: &str, url: &str) -> Result<(), ValidationError> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    match rest {
        Some(host) if !host.is_empty() && !url.contains(char::is_whitespace) => Ok(()),
        _ => Err(ValidationError::invalid_format(
            field,
            "must be an http(s) URL",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn profile() -> CardProfile {
        CardProfile {
            full_name: Some("Ada Lovelace".to_string()),
            email: Some("ada@example.com".to_string()),
            website: Some("https://ada.dev".to_string()),
            accent_color: Some("#1A2b3C".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn normalized_trims_and_clears_blank_fields() {
        let raw = CardProfile {
            full_name: Some("  Ada  ".to_string()),
            company: Some("   ".to_string()),
            social_links: vec![
                SocialLink {
                    platform: " github ".to_string(),
                    url: " https://github.com/ada ".to_string(),
                },
                SocialLink {
                    platform: "x".to_string(),
                    url: "  ".to_string(),
                },
            ],
            ..Default::default()
        };
        let profile = raw.normalized();
        assert_eq!(profile.full_name.as_deref(), Some("Ada"));
        assert_eq!(profile.company, None);
        assert_eq!(profile.social_links.len(), 1);
        assert_eq!(profile.social_links[0].platform, "github");
    }

    #[test]
    fn valid_profile_passes() {
        assert!(profile().validate().is_ok());
    }

    #[test]
    fn bad_email_is_rejected() {
        for email in ["ada", "@example.com", "ada@example", "ada@.com", "a da@example.com"] {
            let p = CardProfile {
                email: Some(email.to_string()),
                ..profile()
            };
            let err = p.validate().unwrap_err();
            assert_eq!(err.field(), "email", "{email} should be rejected");
        }
    }

    #[test]
    fn non_http_website_is_rejected() {
        let p = CardProfile {
            website: Some("ftp://ada.dev".to_string()),
            ..profile()
        };
        assert_eq!(p.validate().unwrap_err().field(), "website");
    }

    #[test]
    fn accent_color_must_be_hex() {
        let p = CardProfile {
            accent_color: Some("blue".to_string()),
            ..profile()
        };
        assert_eq!(p.validate().unwrap_err().field(), "accent_color");
        assert_eq!(parse_hex_color("#ff8000"), Some((255, 128, 0)));
        assert_eq!(parse_hex_color("#ff80"), None);
    }

    #[test]
    fn overlong_bio_is_rejected() {
        let p = CardProfile {
            bio: Some("x".repeat(MAX_BIO_LEN + 1)),
            ..profile()
        };
        assert!(matches!(
            p.validate(),
            Err(ValidationError::TooLong { max: MAX_BIO_LEN, .. })
        ));
    }

    #[test]
    fn unknown_keys_survive_a_round_trip() {
        let value = json!({
            "full_name": "Ada",
            "layout": {"template": "minimal", "font": "Inter"}
        });
        let profile: CardProfile = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(profile.extra.get("layout"), value.get("layout"));
        assert_eq!(serde_json::to_value(&profile).unwrap(), value);
    }
}
