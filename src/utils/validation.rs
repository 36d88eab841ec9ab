// src/utils/validation.rs

use url::Url;
use validator::ValidationError;

use crate::models::tag::MAX_TAG_NAME_LEN;

/// Upper bound on tags submitted with one post.
pub const MAX_TAGS_PER_POST: usize = 20;

/// Validates a submitted tag list: bounded count, each trimmed name at most
/// `MAX_TAG_NAME_LEN` characters. Blank entries are allowed and dropped later.
pub fn validate_tag_names(names: &[String]) -> Result<(), ValidationError> {
    if names.len() > MAX_TAGS_PER_POST {
        return Err(ValidationError::new("too_many_tags"));
    }
    for name in names {
        if name.trim().chars().count() > MAX_TAG_NAME_LEN {
            return Err(ValidationError::new("tag_name_too_long"));
        }
    }
    Ok(())
}

/// Image links must be absolute http(s) URLs.
pub fn validate_image_url(url: &str) -> Result<(), ValidationError> {
    match Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        Ok(_) => Err(ValidationError::new("unsupported_url_scheme")),
        Err(_) => Err(ValidationError::new("invalid_url")),
    }
}

/// Like `validate_image_url`, but an empty string is accepted and means
/// "no image".
pub fn validate_image_url_or_blank(url: &str) -> Result<(), ValidationError> {
    if url.is_empty() {
        return Ok(());
    }
    validate_image_url(url)
}
