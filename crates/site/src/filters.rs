//! Custom Askama template filters.

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Turns a tag like "UX/UI Design" into a CSS-safe slug ("ux-ui-design").
///
/// Usage in templates: `{{ tech|slugify }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn slugify(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(slug(&value.to_string()))
}

fn slug(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('-') && !out.is_empty() {
            out.push('-');
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}
