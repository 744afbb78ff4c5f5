//! Authentication request and response models

use crate::error::ApiError;
use crate::models::UserInfo;
use serde::{Deserialize, Serialize};
use taskdeck_auth::password::validate_password;
use taskdeck_auth::AuthError;
use taskdeck_core::FieldError;

pub const MAX_NAME_LENGTH: usize = 60;

/// Loose structural check: one `@`, a non-empty local part, and a dotted
/// domain with no empty labels.
pub fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}

fn finish(errors: Vec<FieldError>) -> Result<(), ApiError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(errors))
    }
}

/// Registration request body
#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(&self, min_password: usize, max_password: usize) -> Result<(), ApiError> {
        let mut errors = Vec::new();

        let name_len = self.name.trim().chars().count();
        if name_len == 0 {
            errors.push(FieldError::new("name", "Name is required"));
        } else if name_len > MAX_NAME_LENGTH {
            errors.push(FieldError::new(
                "name",
                format!("Name cannot be more than {} characters", MAX_NAME_LENGTH),
            ));
        }

        if !is_plausible_email(self.email.trim()) {
            errors.push(FieldError::new("email", "Invalid email address"));
        }

        if let Err(AuthError::WeakPassword(message)) =
            validate_password(&self.password, min_password, max_password)
        {
            errors.push(FieldError::new("password", message));
        }

        finish(errors)
    }
}

/// Login request body
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = Vec::new();
        if !is_plausible_email(self.email.trim()) {
            errors.push(FieldError::new("email", "Invalid email address"));
        }
        if self.password.is_empty() {
            errors.push(FieldError::new("password", "Password is required"));
        }
        finish(errors)
    }
}

/// `{"message": "...", "user": {...}}`
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: &'static str,
    pub user: UserInfo,
}

/// `{"user": {...}}` or `{"user": null}`
#[derive(Debug, Serialize)]
pub struct CurrentUserResponse {
    pub user: Option<UserInfo>,
}
