//! Input validation helpers
//!
//! Centralized text length constants and validation functions. The
//! stored document has no built-in length enforcement, so every text
//! field is bounded here before it reaches the store.

use crate::core::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: members, participants, groups, events.
pub const MAX_NAME_LEN: usize = 200;

/// Short identifiers: phone numbers.
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// Minimum password length accepted at sign-up / reset
pub const MIN_PASSWORD_LEN: usize = 6;

/// Announcement board free text
pub const MAX_ANNOUNCEMENTS_LEN: usize = 5000;

/// Avatar upload size cap (bytes)
pub const MAX_AVATAR_BYTES: usize = 5 * 1024 * 1024;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}
