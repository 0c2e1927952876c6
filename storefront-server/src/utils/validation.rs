//! Input validation helpers
//!
//! Centralized text length constants and validation functions shared by the
//! category, product and import services.

use rust_decimal::Decimal;
use shared::catalog::{CatalogError, CatalogResult};

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: product, category
pub const MAX_NAME_LEN: usize = 200;

/// Slugs end up in storefront URLs
pub const MAX_SLUG_LEN: usize = 200;

/// SEO titles (search engines cut off around 60, allow some slack)
pub const MAX_SEO_TITLE_LEN: usize = 200;

/// Short descriptions and SEO descriptions
pub const MAX_NOTE_LEN: usize = 500;

/// Product body text (may contain imported HTML)
pub const MAX_DESCRIPTION_LEN: usize = 20_000;

/// URLs / image paths
pub const MAX_URL_LEN: usize = 2048;

/// Tags per product
pub const MAX_TAGS: usize = 100;

/// Products per bulk upload
pub const MAX_IMPORT_PRODUCTS: usize = 5_000;

/// Levels in the category tree, a root counting as one
pub const MAX_CATEGORY_DEPTH: usize = 32;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> CatalogResult<()> {
    if value.trim().is_empty() {
        return Err(CatalogError::InvalidInput(format!("{field} must not be empty")));
    }
    validate_max_len(value, field, max_len)
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> CatalogResult<()> {
    match value {
        Some(v) => validate_max_len(v, field, max_len),
        None => Ok(()),
    }
}

/// Validate a possibly empty string against the length limit.
pub fn validate_max_len(value: &str, field: &str, max_len: usize) -> CatalogResult<()> {
    let len = value.chars().count();
    if len > max_len {
        return Err(CatalogError::InvalidInput(format!(
            "{field} is too long ({len} chars, max {max_len})"
        )));
    }
    Ok(())
}

/// Slugs are lowercase ASCII letters, digits and single dashes
pub fn validate_slug(slug: &str, field: &str) -> CatalogResult<()> {
    validate_required_text(slug, field, MAX_SLUG_LEN)?;
    let well_formed = slug
        .split('-')
        .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit()));
    if !well_formed {
        return Err(CatalogError::InvalidInput(format!(
            "{field} '{slug}' must contain only lowercase letters, digits and single dashes"
        )));
    }
    Ok(())
}

/// Prices are non-negative
pub fn validate_price(value: Decimal, field: &str) -> CatalogResult<()> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(CatalogError::InvalidInput(format!(
            "{field} must not be negative"
        )));
    }
    Ok(())
}

/// Image references are absolute http(s) URLs or site-relative paths
pub fn validate_urls(urls: &[String], field: &str) -> CatalogResult<()> {
    urls.iter().try_for_each(|url| {
        validate_required_text(url, field, MAX_URL_LEN)?;
        let url = url.trim();
        let well_formed = match url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"))
        {
            Some(rest) => !rest.is_empty() && !rest.starts_with('/'),
            None => url.starts_with('/') && !url.starts_with("//"),
        };
        if !well_formed || url.chars().any(char::is_whitespace) {
            return Err(CatalogError::InvalidInput(format!(
                "{field} '{url}' is not a valid URL"
            )));
        }
        Ok(())
    })
}

pub fn validate_tags(tags: &[String]) -> CatalogResult<()> {
    if tags.len() > MAX_TAGS {
        return Err(CatalogError::InvalidInput(format!(
            "too many tags ({}, max {MAX_TAGS})",
            tags.len()
        )));
    }
    tags.iter()
        .try_for_each(|tag| validate_required_text(tag, "tag", MAX_NAME_LEN))
}
