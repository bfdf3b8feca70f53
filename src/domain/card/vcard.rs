//! vCard 3.0 export (RFC 2426).

use super::Card;

const LINE_LIMIT: usize = 75;

/// Renders a card as a vCard 3.0 document with CRLF line endings.
pub fn to_vcard(card: &Card, public_url: &str) -> String {
    let profile = &card.profile;
    let full_name = card.display_name();
    let (given, family) = split_name(full_name);

    let mut lines = vec![
        "BEGIN:VCARD".to_string(),
        "VERSION:3.0".to_string(),
        format!("FN:{}", escape(full_name)),
        format!("N:{};{};;;", escape(family), escape(given)),
    ];

    if let Some(company) = &profile.company {
        lines.push(format!("ORG:{}", escape(company)));
    }
    if let Some(title) = &profile.job_title {
        lines.push(format!("TITLE:{}", escape(title)));
    }
    if let Some(phone) = &profile.phone {
        lines.push(format!("TEL;TYPE=CELL:{}", escape(phone)));
    }
    if let Some(email) = &profile.email {
        lines.push(format!("EMAIL;TYPE=INTERNET:{}", escape(email)));
    }
    if let Some(website) = &profile.website {
        lines.push(format!("URL:{}", escape(website)));
    }
    if let Some(address) = &profile.address {
        lines.push(format!("ADR;TYPE=WORK:;;{};;;;", escape(address)));
    }
    if let Some(avatar) = &profile.avatar_url {
        lines.push(format!("PHOTO;VALUE=URI:{}", avatar));
    }
    if let Some(bio) = &profile.bio {
        lines.push(format!("NOTE:{}", escape(bio)));
    }
    for link in &profile.social_links {
        lines.push(format!(
            "X-SOCIALPROFILE;TYPE={}:{}",
            param_value(&link.platform),
            link.url
        ));
    }
    lines.push(format!("SOURCE:{}", public_url));
    lines.push("END:VCARD".to_string());

    let mut out = String::new();
    for line in lines {
        fold_into(&mut out, &line);
    }
    out
}

/// File name offered for download, e.g. `ada-lovelace.vcf`.
pub fn vcard_file_name(card: &Card) -> String {
    download_file_name(card, "vcf")
}

/// Download name built from the card's display name, `contact.<ext>` when
/// nothing usable remains.
pub fn download_file_name(card: &Card, extension: &str) -> String {
    let slug: String = card
        .display_name()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect();
    let slug = slug
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() {
        format!("contact.{}", extension)
    } else {
        format!("{}.{}", slug, extension)
    }
}

fn split_name(full_name: &str) -> (&str, &str) {
    match full_name.trim().rsplit_once(' ') {
        Some((given, family)) => (given.trim(), family),
        None => (full_name.trim(), ""),
    }
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ',' => out.push_str("\\,"),
            ';' => out.push_str("\\;"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}

/// Parameter values are limited to `[a-z0-9-]`; anything else would need
/// quoting and could end the parameter list early.
fn param_value(value: &str) -> String {
    let cleaned: String = value
        .trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .map(|c| c.to_ascii_lowercase())
        .collect();
    if cleaned.is_empty() {
        "other".to_string()
    } else {
        cleaned
    }
}

// Continuation lines start with a single space and never split a UTF-8 sequence.
fn fold_into(out: &mut String, line: &str) {
    let mut width = 0;
    for c in line.chars() {
        let len = c.len_utf8();
        if width + len > LINE_LIMIT {
            out.push_str("\r\n ");
            width = 1;
        }
        out.push(c);
        width += len;
    }
    out.push_str("\r\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::card::{CardProfile, SocialLink};
    use crate::domain::foundation::UserId;
    use uuid::Uuid;

    fn card(profile: CardProfile) -> Card {
        Card::create(UserId::from_uuid(Uuid::new_v4()), "Work", profile, false).unwrap()
    }

    #[test]
    fn renders_contact_fields() {
        let card = card(CardProfile {
            full_name: Some("Ada King Lovelace".to_string()),
            company: Some("Analytical Engines, Ltd".to_string()),
            job_title: Some("Programmer".to_string()),
            email: Some("ada@example.com".to_string()),
            phone: Some("+44 20 1234".to_string()),
            social_links: vec![SocialLink {
                platform: "GitHub".to_string(),
                url: "https://github.com/ada".to_string(),
            }],
            ..Default::default()
        });
        let vcard = to_vcard(&card, "https://cardwise.app/c/1");

        assert!(vcard.starts_with("BEGIN:VCARD\r\nVERSION:3.0\r\n"));
        assert!(vcard.ends_with("END:VCARD\r\n"));
        assert!(vcard.contains("FN:Ada King Lovelace\r\n"));
        assert!(vcard.contains("N:Lovelace;Ada King;;;\r\n"));
        assert!(vcard.contains("ORG:Analytical Engines\\, Ltd\r\n"));
        assert!(vcard.contains("EMAIL;TYPE=INTERNET:ada@example.com\r\n"));
        assert!(vcard.contains("X-SOCIALPROFILE;TYPE=github:https://github.com/ada\r\n"));
        assert!(vcard.contains("SOURCE:https://cardwise.app/c/1\r\n"));
    }

    #[test]
    fn single_word_name_has_empty_family() {
        let card = card(CardProfile::default());
        let vcard = to_vcard(&card, "https://x");
        assert!(vcard.contains("FN:Work\r\n"));
        assert!(vcard.contains("N:;Work;;;\r\n"));
    }

    #[test]
    fn escapes_special_characters() {
        assert_eq!(escape("a;b,c\\d\ne"), "a\\;b\\,c\\\\d\\ne");
    }

    #[test]
    fn social_platform_cannot_break_the_property() {
        let card = card(CardProfile {
            social_links: vec![
                SocialLink {
                    platform: "foo:bar\"; x=1".to_string(),
                    url: "https://example.com/a".to_string(),
                },
                SocialLink {
                    platform: ":::".to_string(),
                    url: "https://example.com/b".to_string(),
                },
            ],
            ..Default::default()
        });
        let vcard = to_vcard(&card, "https://x");
        assert!(vcard.contains("X-SOCIALPROFILE;TYPE=foobarx1:https://example.com/a\r\n"));
        assert!(vcard.contains("X-SOCIALPROFILE;TYPE=other:https://example.com/b\r\n"));
    }

    #[test]
    fn long_lines_are_folded() {
        let card = card(CardProfile {
            bio: Some("ü".repeat(100)),
            ..Default::default()
        });
        let vcard = to_vcard(&card, "https://x");
        for line in vcard.split("\r\n") {
            assert!(line.len() <= LINE_LIMIT, "line too long: {}", line.len());
        }
        let unfolded = vcard.replace("\r\n ", "");
        assert!(unfolded.contains(&format!("NOTE:{}", "ü".repeat(100))));
    }

    #[test]
    fn file_name_is_slugged() {
        let card = card(CardProfile {
            full_name: Some("Ada  Lovelace!".to_string()),
            ..Default::default()
        });
        assert_eq!(vcard_file_name(&card), "ada-lovelace.vcf");

        let card = Card {
            name: "ééé".to_string(),
            profile: CardProfile::default(),
            ..card
        };
        assert_eq!(vcard_file_name(&card), "contact.vcf");
    }
}
