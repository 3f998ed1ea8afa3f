//! Account and session types
//!
//! `UserProfile` is the cached user record kept by the token store. Request
//! types validate presence of required fields before anything is sent.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::utils::serde::{id_string, option_id_string};
use crate::utils::{require_fields, validate_email};
use crate::{Result, WasteWiseError};

/// User record as returned by login, profile and profile-update responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    /// Fields the client does not interpret (stats, timestamps, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Registration form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub terms_accepted: bool,
}

impl RegisterRequest {
    /// # Errors
    /// Returns `WasteWiseError::Validation` when a required field is blank,
    /// the email is malformed, the passwords differ, or terms were not
    /// accepted.
    pub fn validate(&self) -> Result<()> {
        require_fields(&[
            ("full_name", &self.full_name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("password", &self.password),
            ("confirm_password", &self.confirm_password),
        ])?;
        validate_email(&self.email)?;
        if self.password != self.confirm_password {
            return Err(WasteWiseError::Validation("Passwords do not match".to_string()));
        }
        if !self.terms_accepted {
            return Err(WasteWiseError::Validation("Terms must be accepted".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub remember_me: bool,
}

impl LoginRequest {
    /// # Errors
    /// Returns `WasteWiseError::Validation` for a blank email or password.
    pub fn validate(&self) -> Result<()> {
        require_fields(&[("email", &self.email), ("password", &self.password)])
    }
}

/// Partial profile update; unset fields are omitted from the body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl PasswordChange {
    pub fn new(current_password: impl Into<String>, new_password: impl Into<String>) -> Self {
        let new_password = new_password.into();
        Self {
            current_password: current_password.into(),
            confirm_password: new_password.clone(),
            new_password,
        }
    }

    /// # Errors
    /// Returns `WasteWiseError::Validation` for blank or mismatched passwords.
    pub fn validate(&self) -> Result<()> {
        require_fields(&[
            ("current_password", &self.current_password),
            ("new_password", &self.new_password),
        ])?;
        if self.new_password != self.confirm_password {
            return Err(WasteWiseError::Validation("Passwords do not match".to_string()));
        }
        Ok(())
    }
}

/// Token pair issued by login (and optionally registration)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthTokens {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Body of `/auth/login` and `/auth/register`
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user: Option<UserProfile>,
    #[serde(default)]
    pub tokens: Option<AuthTokens>,
    #[serde(default, deserialize_with = "option_id_string")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub next_step: Option<String>,
}

/// Generic `{success, message}` acknowledgement
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Acknowledgement {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn valid_registration() -> RegisterRequest {
        RegisterRequest {
            full_name: "Asha Rao".to_string(),
            email: "asha@wastewise.in".to_string(),
            phone: "9876543210".to_string(),
            password: "compost-123".to_string(),
            confirm_password: "compost-123".to_string(),
            terms_accepted: true,
            ..RegisterRequest::default()
        }
    }

    #[test]
    fn test_profile_keeps_unknown_fields() {
        let profile: UserProfile = serde_json::from_value(json!({
            "id": 12,
            "email": "asha@wastewise.in",
            "full_name": "Asha Rao",
            "stats": {"classifications": 4}
        }))
        .unwrap();

        assert_eq!(profile.id, "12");
        assert_eq!(profile.extra["stats"]["classifications"], 4);

        let back = serde_json::to_value(&profile).unwrap();
        assert_eq!(back["stats"]["classifications"], 4);
        assert!(back.get("phone").is_none());
    }

    #[test]
    fn test_registration_validation() {
        assert!(valid_registration().validate().is_ok());

        let mut mismatch = valid_registration();
        mismatch.confirm_password = "other".to_string();
        assert!(mismatch.validate().is_err());

        let mut no_terms = valid_registration();
        no_terms.terms_accepted = false;
        assert!(no_terms.validate().is_err());

        let mut no_phone = valid_registration();
        no_phone.phone.clear();
        let err = no_phone.validate().unwrap_err();
        assert!(err.to_string().contains("phone"));
    }

    #[test]
    fn test_profile_update_omits_unset_fields() {
        let update = ProfileUpdate { city: Some("Pune".to_string()), ..ProfileUpdate::default() };
        assert_eq!(serde_json::to_value(update).unwrap(), json!({"city": "Pune"}));
    }

    #[test]
    fn test_login_response_parses_nested_tokens() {
        let response: AuthResponse = serde_json::from_value(json!({
            "success": true,
            "message": "Login successful",
            "user": {"id": "u1", "email": "a@b.co", "full_name": "A", "role": "user"},
            "tokens": {"access_token": "at", "refresh_token": "rt", "token_type": "Bearer"}
        }))
        .unwrap();

        let tokens = response.tokens.unwrap();
        assert_eq!(tokens.access_token, "at");
        assert_eq!(tokens.refresh_token.as_deref(), Some("rt"));
        assert_eq!(response.user.unwrap().role.as_deref(), Some("user"));
    }

    #[test]
    fn test_password_change_confirms_new_password() {
        let change = PasswordChange::new("old-pass", "new-pass-123");
        assert_eq!(change.confirm_password, "new-pass-123");
        assert!(change.validate().is_ok());
    }
}
