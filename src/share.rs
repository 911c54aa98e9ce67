//! Social share links for a public biodata page.

use handlebars::Handlebars;
use once_cell::sync::Lazy;
use serde_json::json;

use crate::profile::BiodataProfile;

/// Platforms the share sheet offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SharePlatform {
    Facebook,
    WhatsApp,
    Telegram,
    CopyLink,
}

impl SharePlatform {
    pub fn all() -> &'static [SharePlatform] {
        &[
            SharePlatform::Facebook,
            SharePlatform::WhatsApp,
            SharePlatform::Telegram,
            SharePlatform::CopyLink,
        ]
    }

    pub fn key(self) -> &'static str {
        match self {
            SharePlatform::Facebook => "facebook",
            SharePlatform::WhatsApp => "whatsapp",
            SharePlatform::Telegram => "telegram",
            SharePlatform::CopyLink => "copy",
        }
    }
}

const SHARE_TEXT_TEMPLATE: &str =
    "Biodata #{{biodata_no}}{{#if kind}} ({{kind}}){{/if}} on Bondhon{{#if district}} from {{district}}{{/if}}";

static RENDERER: Lazy<Handlebars<'static>> = Lazy::new(|| {
    let mut hb = Handlebars::new();
    // Share text is plain text, not HTML.
    hb.set_strict_mode(false);
    hb.register_escape_fn(handlebars::no_escape);
    hb
});

/// Human-readable share text for a profile.
pub fn share_text(profile: &BiodataProfile) -> String {
    let data = json!({
        "biodata_no": profile.biodata_no,
        "kind": profile.kind().map(|k| k.label()),
        "district": profile.district(),
    });
    RENDERER
        .render_template(SHARE_TEXT_TEMPLATE, &data)
        .unwrap_or_else(|_| format!("Biodata #{} on Bondhon", profile.biodata_no))
}

/// The public page URL for a profile under `base_url`.
pub fn profile_url(base_url: &str, profile: &BiodataProfile) -> String {
    format!("{}/biodata/{}", base_url.trim_end_matches('/'), profile.id)
}

/// Platform-specific share URL. `CopyLink` is the bare page URL.
pub fn share_url(platform: SharePlatform, page_url: &str, text: &str) -> String {
    let encoded_url = urlencoding::encode(page_url);
    let encoded_text = urlencoding::encode(text);
    match platform {
        SharePlatform::Facebook => format!(
            "https://www.facebook.com/sharer/sharer.php?u={encoded_url}&quote={encoded_text}"
        ),
        SharePlatform::WhatsApp => {
            format!("https://wa.me/?text={encoded_text}%20{encoded_url}")
        }
        SharePlatform::Telegram => {
            format!("https://t.me/share/url?url={encoded_url}&text={encoded_text}")
        }
        SharePlatform::CopyLink => page_url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::ProfileRegistry;

    fn sample_profile() -> BiodataProfile {
        let mut registry = ProfileRegistry::new();
        let id = registry.create("o@example.com".into()).id;
        let profile = registry.get_mut(&id).unwrap();
        profile.fields = serde_json::from_str(
            r#"{"biodataType": "Groom", "permanentDistrict": "Sylhet"}"#,
        )
        .unwrap();
        profile.clone()
    }

    #[test]
    fn share_text_includes_kind_and_district() {
        let text = share_text(&sample_profile());
        assert_eq!(text, "Biodata #1 (Groom) on Bondhon from Sylhet");
    }

    #[test]
    fn share_text_degrades_without_optional_fields() {
        let mut registry = ProfileRegistry::new();
        let id = registry.create("o@example.com".into()).id;
        let profile = registry.get(&id).unwrap();
        assert_eq!(share_text(profile), "Biodata #1 on Bondhon");
    }

    #[test]
    fn share_urls_are_percent_encoded() {
        let url = share_url(
            SharePlatform::Facebook,
            "https://bondhon.app/biodata/abc",
            "Biodata #7 from Sylhet",
        );
        assert!(url.starts_with("https://www.facebook.com/sharer/sharer.php?u=https%3A%2F%2F"));
        assert!(url.contains("%237")); // '#' must not terminate the query
        assert!(url.contains("Biodata%20%237"));
    }

    #[test]
    fn copy_link_is_the_page_url() {
        let url = share_url(SharePlatform::CopyLink, "https://bondhon.app/biodata/x", "t");
        assert_eq!(url, "https://bondhon.app/biodata/x");
    }

    #[test]
    fn profile_url_strips_trailing_slash() {
        let profile = sample_profile();
        let url = profile_url("https://bondhon.app/", &profile);
        assert_eq!(url, format!("https://bondhon.app/biodata/{}", profile.id));
    }
}
