//! Input validation and normalization

use crate::contract::PersonaError;
use url::Url;

/// Longest accepted post name
pub const MAX_POST_NAME_LEN: usize = 256;

/// Trim and lower-case an email address, rejecting obviously malformed ones
pub fn normalize_email(email: &str) -> Result<String, PersonaError> {
    let email = email.trim().to_lowercase();
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(PersonaError::validation(format!(
            "email '{email}' must contain exactly one '@'"
        )));
    };
    if local.is_empty() || domain.is_empty() {
        return Err(PersonaError::validation(format!(
            "email '{email}' must have a local part and a domain"
        )));
    }
    if email.chars().any(char::is_whitespace) {
        return Err(PersonaError::validation(format!(
            "email '{email}' must not contain whitespace"
        )));
    }
    Ok(email)
}

/// Images are stored as absolute URLs
pub fn validate_image_url(image: &str) -> Result<(), PersonaError> {
    Url::parse(image)
        .map(|_| ())
        .map_err(|e| PersonaError::validation(format!("image '{image}' is not a valid URL: {e}")))
}

/// Trim a post name and check its length
pub fn normalize_post_name(name: &str) -> Result<String, PersonaError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(PersonaError::validation("post name cannot be empty"));
    }
    if name.chars().count() > MAX_POST_NAME_LEN {
        return Err(PersonaError::validation(format!(
            "post name must be at most {MAX_POST_NAME_LEN} characters"
        )));
    }
    Ok(name.to_string())
}

/// Reject empty or whitespace-only required strings
pub fn require_non_empty(field: &str, value: &str) -> Result<(), PersonaError> {
    if value.trim().is_empty() {
        return Err(PersonaError::validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  A@X.com ").unwrap(), "a@x.com");
        assert!(normalize_email("no-at-sign").is_err());
        assert!(normalize_email("a@b@c").is_err());
        assert!(normalize_email("@x.com").is_err());
        assert!(normalize_email("a@").is_err());
        assert!(normalize_email("a b@x.com").is_err());
    }

    #[test]
    fn test_validate_image_url() {
        assert!(validate_image_url("https://cdn.example.com/avatar.png").is_ok());
        assert!(validate_image_url("not a url").is_err());
        assert!(validate_image_url("/relative/path.png").is_err());
    }

    #[test]
    fn test_normalize_post_name() {
        assert_eq!(normalize_post_name("  hello ").unwrap(), "hello");
        assert!(normalize_post_name("   ").is_err());
        assert!(normalize_post_name(&"x".repeat(MAX_POST_NAME_LEN)).is_ok());
        assert!(normalize_post_name(&"x".repeat(MAX_POST_NAME_LEN + 1)).is_err());
    }

    #[test]
    fn test_require_non_empty() {
        assert!(require_non_empty("provider", "github").is_ok());
        assert!(matches!(
            require_non_empty("provider", " "),
            Err(PersonaError::Validation { .. })
        ));
    }
}
