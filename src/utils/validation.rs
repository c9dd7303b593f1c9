use crate::error::ApiError;

/// Trims `value` and rejects empty or whitespace-only input.
pub fn require_non_empty(field: &str, value: &str) -> Result<String, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::Validation(format!(
            "Field '{field}' cannot be empty or whitespace"
        )));
    }
    Ok(trimmed.to_string())
}

/// Minimal RFC-shaped check: exactly one '@', non-empty local part,
/// domain with at least one dot and no whitespace anywhere.
pub fn require_email(field: &str, value: &str) -> Result<String, ApiError> {
    let trimmed = require_non_empty(field, value)?;

    let invalid = || ApiError::Validation(format!("Field '{field}' is not a valid email address"));

    if trimmed.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let mut parts = trimmed.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next().ok_or_else(invalid)?;

    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(invalid());
    }

    Ok(trimmed)
}
