//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the content hash for main.css.
///
/// The hash is computed at build time from the CSS file content.
///
/// Usage in templates: `{{ ""|css_hash }}`
#[askama::filter_fn]
pub fn css_hash(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<&'static str> {
    Ok(env!("CSS_HASH"))
}

/// Renders a phone number as a `tel:` URI (digits and a leading `+` only).
///
/// Usage in templates: `{{ phone|tel_href }}`
#[askama::filter_fn]
pub fn tel_href(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let number: String = value
        .to_string()
        .chars()
        .enumerate()
        .filter(|(i, c)| c.is_ascii_digit() || (*i == 0 && *c == '+'))
        .map(|(_, c)| c)
        .collect();
    Ok(format!("tel:{number}"))
}
