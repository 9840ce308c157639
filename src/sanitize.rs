//! Allow-list sanitization of untrusted HTML.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConvertResult;
use crate::validator::validate_sanitize_config;

/// Tags kept by the default sanitizer configuration
pub const DEFAULT_ALLOWED_TAGS: &[&str] = &[
    "a", "b", "blockquote", "br", "del", "div", "em", "h1", "h2", "h3", "h4", "h5", "h6", "hr",
    "i", "img", "li", "ol", "p", "span", "strong", "table", "tbody", "td", "th", "thead", "tr",
    "u", "ul",
];

/// URL schemes kept by the default sanitizer configuration
pub const DEFAULT_ALLOWED_SCHEMES: &[&str] = &["https", "mailto"];

/// Attributes kept per tag by the default sanitizer configuration
pub const DEFAULT_ALLOWED_ATTRIBUTES: &[(&str, &[&str])] = &[
    ("a", &["href", "name", "target", "title", "aria-label"]),
    ("img", &["src", "alt", "title", "aria-label"]),
];

/// Tags whose content is removed along with the tag unless explicitly allowed
const CLEAN_CONTENT_TAGS: &[&str] = &["script", "style"];

/// Allow-lists applied before parsing. Unknown keys are ignored when deserializing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SanitizeConfig {
    pub allowed_tags: BTreeSet<String>,
    pub allowed_schemes: BTreeSet<String>,
    /// Tag name → attribute names kept on it. Attributes on other tags are dropped.
    pub allowed_attributes: BTreeMap<String, BTreeSet<String>>,
}

impl Default for SanitizeConfig {
    fn default() -> Self {
        Self {
            allowed_tags: DEFAULT_ALLOWED_TAGS.iter().map(|s| s.to_string()).collect(),
            allowed_schemes: DEFAULT_ALLOWED_SCHEMES.iter().map(|s| s.to_string()).collect(),
            allowed_attributes: DEFAULT_ALLOWED_ATTRIBUTES
                .iter()
                .map(|(tag, attrs)| {
                    let attrs = attrs.iter().map(|a| a.to_string()).collect();
                    (tag.to_string(), attrs)
                })
                .collect(),
        }
    }
}

impl SanitizeConfig {
    pub fn allow_tag(mut self, tag: impl Into<String>) -> Self {
        self.allowed_tags.insert(tag.into());
        self
    }

    pub fn deny_tag(mut self, tag: &str) -> Self {
        self.allowed_tags.remove(tag);
        self
    }

    pub fn allow_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.allowed_schemes.insert(scheme.into());
        self
    }

    pub fn allow_attribute(mut self, tag: impl Into<String>, attribute: impl Into<String>) -> Self {
        self.allowed_attributes
            .entry(tag.into())
            .or_default()
            .insert(attribute.into());
        self
    }
}

/// Strips tags, attributes and URL schemes that are not allow-listed
pub trait Sanitizer: Send + Sync {
    fn sanitize(&self, html: &str, config: &SanitizeConfig) -> ConvertResult<String>;
}

/// [`Sanitizer`] backed by `ammonia`
#[derive(Debug, Default, Clone, Copy)]
pub struct AmmoniaSanitizer;

impl Sanitizer for AmmoniaSanitizer {
    fn sanitize(&self, html: &str, config: &SanitizeConfig) -> ConvertResult<String> {
        validate_sanitize_config(config)?;

        let tags: HashSet<&str> = config.allowed_tags.iter().map(String::as_str).collect();
        let schemes: HashSet<&str> = config.allowed_schemes.iter().map(String::as_str).collect();
        // ammonia refuses a tag that is both allowed and content-cleaned
        let clean_content: HashSet<&str> = CLEAN_CONTENT_TAGS
            .iter()
            .copied()
            .filter(|tag| !tags.contains(tag))
            .collect();
        let tag_attributes: HashMap<&str, HashSet<&str>> = config
            .allowed_attributes
            .iter()
            .map(|(tag, attrs)| (tag.as_str(), attrs.iter().map(String::as_str).collect()))
            .collect();

        // Attributes come only from the per-tag lists; `rel` is never injected
        let cleaned = ammonia::Builder::default()
            .tags(tags)
            .clean_content_tags(clean_content)
            .generic_attributes(HashSet::new())
            .tag_attributes(tag_attributes)
            .link_rel(None)
            .url_schemes(schemes)
            .clean(html)
            .to_string();

        debug!(
            input_len = html.len(),
            output_len = cleaned.len(),
            "sanitized HTML"
        );
        Ok(cleaned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConvertError;

    fn clean(html: &str) -> String {
        AmmoniaSanitizer
            .sanitize(html, &SanitizeConfig::default())
            .unwrap()
    }

    #[test]
    fn test_strips_script() {
        let out = clean("<p>Hi</p><script>alert(1)</script>");
        assert!(out.contains("<p>Hi</p>"));
        assert!(!out.contains("script"));
        assert!(!out.contains("alert"));
    }

    #[test]
    fn test_strips_disallowed_scheme() {
        let out = clean(r#"<a href="javascript:alert(1)">x</a><a href="http://example.com">y</a>"#);
        assert!(!out.contains("javascript"));
        assert!(!out.contains("http://"));
        assert!(out.contains(">x</a>"));
    }

    #[test]
    fn test_keeps_allowed_scheme() {
        let out = clean(r#"<a href="https://example.com">x</a>"#);
        assert!(out.contains(r#"href="https://example.com""#));
    }

    #[test]
    fn test_strips_event_handlers() {
        let out = clean(r#"<img src="https://example.com/a.png" onerror="alert(1)">"#);
        assert!(out.contains("src="));
        assert!(!out.contains("onerror"));
    }

    #[test]
    fn test_disallowed_tag_keeps_text() {
        let out = clean("<section><p>Hi</p></section>");
        assert!(!out.contains("section"));
        assert!(out.contains("<p>Hi</p>"));
    }

    #[test]
    fn test_allowing_style_does_not_panic() {
        let config = SanitizeConfig::default().allow_tag("style");
        let out = AmmoniaSanitizer.sanitize("<style>p{}</style>", &config).unwrap();
        assert!(out.contains("<style>"));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = SanitizeConfig::default().allow_tag("Not A Tag");
        let result = AmmoniaSanitizer.sanitize("<p>x</p>", &config);
        assert!(matches!(result, Err(ConvertError::InvalidTag { .. })));
    }

    #[test]
    fn test_config_ignores_unknown_keys() {
        let config: SanitizeConfig =
            serde_yaml::from_str("allowedTags: [p]\nallowedStyles: [color]\n").unwrap();
        assert_eq!(config.allowed_tags.len(), 1);
        assert_eq!(
            config.allowed_schemes,
            SanitizeConfig::default().allowed_schemes
        );
        assert_eq!(
            config.allowed_attributes,
            SanitizeConfig::default().allowed_attributes
        );
    }

    #[test]
    fn test_link_keeps_target_and_title_without_rel() {
        let out = clean(r#"<a href="https://example.com" target="_blank" title="Docs" class="x">d</a>"#);
        assert!(out.contains(r#"target="_blank""#));
        assert!(out.contains(r#"title="Docs""#));
        assert!(!out.contains("rel="));
        assert!(!out.contains("class="));
    }

    #[test]
    fn test_attributes_outside_the_tag_list_are_dropped() {
        let out = clean(r#"<p title="t" lang="en">x</p>"#);
        assert_eq!(out, "<p>x</p>");
    }

    #[test]
    fn test_custom_attribute_allow_list() {
        let config = SanitizeConfig::default().allow_attribute("p", "title");
        let out = AmmoniaSanitizer
            .sanitize(r#"<p title="t">x</p>"#, &config)
            .unwrap();
        assert_eq!(out, r#"<p title="t">x</p>"#);
    }

    #[test]
    fn test_invalid_attribute_is_rejected() {
        let config = SanitizeConfig::default().allow_attribute("a", "on click");
        let result = AmmoniaSanitizer.sanitize("<a>x</a>", &config);
        assert!(matches!(result, Err(ConvertError::InvalidAttribute { .. })));
    }
}
