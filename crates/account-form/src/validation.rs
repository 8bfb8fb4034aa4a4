//! Login input validation
//!
//! A username containing `@` must be a well-formed email address, anything
//! else only needs to be non-blank. Passwords need more than five characters.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static EMAIL_ADDRESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9+._%\-]{1,256}@[a-zA-Z0-9][a-zA-Z0-9\-]{0,64}(\.[a-zA-Z0-9][a-zA-Z0-9\-]{0,25})+$",
    )
    .expect("email pattern is valid")
});

/// Counted in UTF-16 code units
const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormError {
    InvalidUsername,
    InvalidPassword,
}

impl FormError {
    pub fn message(&self) -> &'static str {
        match self {
            FormError::InvalidUsername => "Not a valid username",
            FormError::InvalidPassword => "Password must be >5 characters",
        }
    }
}

impl std::fmt::Display for FormError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// What the login form shows; at most one error at a time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginFormState {
    pub username_error: Option<FormError>,
    pub password_error: Option<FormError>,
    pub is_data_valid: bool,
}

impl LoginFormState {
    pub fn valid() -> Self {
        Self {
            is_data_valid: true,
            ..Self::default()
        }
    }

    pub fn error(&self) -> Option<FormError> {
        self.username_error.or(self.password_error)
    }
}

pub fn is_username_valid(username: &str) -> bool {
    if username.contains('@') {
        EMAIL_ADDRESS.is_match(username)
    } else {
        !username.trim().is_empty()
    }
}

pub fn is_password_valid(password: &str) -> bool {
    password.encode_utf16().count() >= MIN_PASSWORD_LEN
}

/// Check the username, then the password
pub fn validate(username: &str, password: &str) -> LoginFormState {
    if !is_username_valid(username) {
        LoginFormState {
            username_error: Some(FormError::InvalidUsername),
            ..LoginFormState::default()
        }
    } else if !is_password_valid(password) {
        LoginFormState {
            password_error: Some(FormError::InvalidPassword),
            ..LoginFormState::default()
        }
    } else {
        LoginFormState::valid()
    }
}
