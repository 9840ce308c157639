use crate::error::{ConvertError, ConvertResult};
use crate::sanitize::SanitizeConfig;
use regex::Regex;
use std::sync::OnceLock;

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z][a-z0-9-]*$").unwrap())
}

fn attribute_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z][a-z0-9_:-]*$").unwrap())
}

fn scheme_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z][a-z0-9+.-]*$").unwrap())
}

/// Validate a sanitizer configuration
pub fn validate_sanitize_config(config: &SanitizeConfig) -> ConvertResult<()> {
    for tag in &config.allowed_tags {
        validate_tag(tag)?;
    }
    for scheme in &config.allowed_schemes {
        validate_scheme(scheme)?;
    }
    for (tag, attributes) in &config.allowed_attributes {
        validate_tag(tag)?;
        for attribute in attributes {
            validate_attribute(attribute)?;
        }
    }
    Ok(())
}

/// Validate an ignore list (node kinds or tag names)
pub fn validate_ignore_nodes(nodes: &[String]) -> ConvertResult<()> {
    for node in nodes {
        if node.is_empty() || node.chars().any(char::is_whitespace) {
            return Err(ConvertError::InvalidIgnoredNode { node: node.clone() });
        }
    }
    Ok(())
}

/// Tag names: lowercase ASCII, starting with a letter
pub fn validate_tag(tag: &str) -> ConvertResult<()> {
    if !tag_re().is_match(tag) {
        return Err(ConvertError::InvalidTag {
            tag: tag.to_string(),
        });
    }
    Ok(())
}

/// Attribute names: lowercase ASCII, starting with a letter
pub fn validate_attribute(attribute: &str) -> ConvertResult<()> {
    if !attribute_re().is_match(attribute) {
        return Err(ConvertError::InvalidAttribute {
            attribute: attribute.to_string(),
        });
    }
    Ok(())
}

/// URL schemes as in RFC 3986, lowercase, without the trailing ':'
pub fn validate_scheme(scheme: &str) -> ConvertResult<()> {
    if !scheme_re().is_match(scheme) {
        return Err(ConvertError::InvalidScheme {
            scheme: scheme.to_string(),
        });
    }
    Ok(())
}
