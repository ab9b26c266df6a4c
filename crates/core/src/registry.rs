//! Validation for owner-created registries.

use std::sync::LazyLock;

use regex::Regex;
use validator::ValidateEmail;

use crate::error::CoreError;

/// Maximum length of a registry title.
pub const MAX_TITLE_LEN: usize = 200;

/// Share slugs: lowercase letters, digits and hyphens.
static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9][a-z0-9-]{2,63}$").expect("valid regex"));

/// Check the owner-supplied fields of a new registry.
pub fn validate_new_registry(
    title: &str,
    owner_name: &str,
    owner_email: &str,
    slug: Option<&str>,
) -> Result<(), CoreError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(CoreError::Validation("title is required".into()));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(CoreError::Validation(format!(
            "title must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    if owner_name.trim().is_empty() {
        return Err(CoreError::Validation("owner name is required".into()));
    }
    if !owner_email.trim().validate_email() {
        return Err(CoreError::Validation(format!(
            "'{owner_email}' is not a valid email address"
        )));
    }
    if let Some(slug) = slug {
        if !SLUG_RE.is_match(slug) {
            return Err(CoreError::Validation(format!(
                "slug '{slug}' must be 3-64 lowercase letters, digits or hyphens"
            )));
        }
    }
    Ok(())
}
