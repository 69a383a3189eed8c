//! Common validation utilities.

use chrono::{DateTime, Utc};
use validator::ValidationError;

/// Maximum number of ids accepted by a bulk request.
pub const MAX_BULK_IDS: usize = 500;

/// Maximum length of a template type slug.
const MAX_SLUG_LENGTH: usize = 64;

/// Validates that a string is not empty after trimming whitespace.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Value must not be blank".into());
        Err(err)
    } else {
        Ok(())
    }
}

/// Validates that a URL uses the http or https scheme.
///
/// Telegram rejects inline keyboard URLs with other schemes.
pub fn validate_http_url(url: &str) -> Result<(), ValidationError> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    match rest {
        Some(host) if !host.is_empty() && !host.starts_with('/') => Ok(()),
        _ => {
            let mut err = ValidationError::new("http_url");
            err.message = Some("URL must start with http:// or https://".into());
            Err(err)
        }
    }
}

/// Validates a lowercase identifier such as a template type (`welcome`, `unknown_command`).
pub fn validate_slug(value: &str) -> Result<(), ValidationError> {
    let mut chars = value.chars();
    let valid = value.len() <= MAX_SLUG_LENGTH
        && chars.next().is_some_and(|c| c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');

    if valid {
        Ok(())
    } else {
        let mut err = ValidationError::new("slug");
        err.message = Some(
            "Must start with a lowercase letter and contain only a-z, 0-9 and _ (max 64)".into(),
        );
        Err(err)
    }
}

/// Validates the id list of a bulk request.
pub fn validate_bulk_ids(ids: &[i64]) -> Result<(), ValidationError> {
    if ids.is_empty() {
        let mut err = ValidationError::new("ids_empty");
        err.message = Some("At least one id is required".into());
        return Err(err);
    }
    if ids.len() > MAX_BULK_IDS {
        let mut err = ValidationError::new("ids_too_many");
        err.message = Some(format!("At most {} ids are allowed", MAX_BULK_IDS).into());
        return Err(err);
    }
    if ids.iter().any(|id| *id <= 0) {
        let mut err = ValidationError::new("ids_invalid");
        err.message = Some("Ids must be positive".into());
        return Err(err);
    }
    Ok(())
}

/// Validates that an active window is ordered when both ends are present.
pub fn validate_date_window(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Result<(), ValidationError> {
    match (start, end) {
        (Some(start), Some(end)) if start > end => {
            let mut err = ValidationError::new("date_window");
            err.message = Some("start_date must not be after end_date".into());
            Err(err)
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_validate_not_blank() {
        assert!(validate_not_blank("Pizza Place").is_ok());
        assert!(validate_not_blank("").is_err());
        assert!(validate_not_blank("   \t").is_err());
    }

    #[test]
    fn test_validate_http_url() {
        assert!(validate_http_url("https://example.com").is_ok());
        assert!(validate_http_url("http://shop.example.com/path?q=1").is_ok());
        assert!(validate_http_url("ftp://example.com").is_err());
        assert!(validate_http_url("https://").is_err());
        assert!(validate_http_url("example.com").is_err());
        assert!(validate_http_url("tg://resolve?domain=bot").is_err());
    }

    #[test]
    fn test_validate_slug() {
        assert!(validate_slug("welcome").is_ok());
        assert!(validate_slug("unknown_command").is_ok());
        assert!(validate_slug("promo2").is_ok());
        assert!(validate_slug("").is_err());
        assert!(validate_slug("Welcome").is_err());
        assert!(validate_slug("2fast").is_err());
        assert!(validate_slug("with-dash").is_err());
        assert!(validate_slug(&"a".repeat(65)).is_err());
    }

    #[test]
    fn test_validate_bulk_ids() {
        assert!(validate_bulk_ids(&[1, 2, 3]).is_ok());
        assert!(validate_bulk_ids(&[]).is_err());
        assert!(validate_bulk_ids(&[1, 0]).is_err());
        assert!(validate_bulk_ids(&[-4]).is_err());

        let too_many: Vec<i64> = (1..=(MAX_BULK_IDS as i64 + 1)).collect();
        assert!(validate_bulk_ids(&too_many).is_err());
    }

    #[test]
    fn test_validate_date_window() {
        let now = Utc::now();
        let later = now + Duration::days(1);

        assert!(validate_date_window(Some(now), Some(later)).is_ok());
        assert!(validate_date_window(Some(now), Some(now)).is_ok());
        assert!(validate_date_window(None, Some(now)).is_ok());
        assert!(validate_date_window(Some(now), None).is_ok());
        assert!(validate_date_window(None, None).is_ok());

        let err = validate_date_window(Some(later), Some(now)).unwrap_err();
        assert_eq!(err.code, "date_window");
    }
}
