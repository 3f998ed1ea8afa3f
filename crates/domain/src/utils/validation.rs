//! Client-side presence checks performed before a request is sent
//!
//! Only required-field presence and obviously malformed values are rejected
//! here; the backend remains the authority on everything else.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{Result, WasteWiseError};

static EMAIL_RE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok());

/// Fail with the names of every blank field, in declaration order.
///
/// # Errors
/// Returns `WasteWiseError::Validation` listing the missing fields.
pub fn require_fields(fields: &[(&str, &str)]) -> Result<()> {
    let missing: Vec<&str> =
        fields.iter().filter(|(_, value)| value.trim().is_empty()).map(|(name, _)| *name).collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(WasteWiseError::Validation(format!("Missing required fields: {}", missing.join(", "))))
    }
}

/// Reject strings that cannot be an email address.
///
/// # Errors
/// Returns `WasteWiseError::Validation` for malformed input.
pub fn validate_email(email: &str) -> Result<()> {
    let valid = EMAIL_RE.as_ref().map_or_else(|| email.contains('@'), |re| re.is_match(email));
    if valid {
        Ok(())
    } else {
        Err(WasteWiseError::Validation(format!("Invalid email address: {email}")))
    }
}
