// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::validation::{ValidationError, ValidationResult, required_text};

pub const DEFAULT_ADMIN_EMAIL: &str = "admin@example.com";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    pub remember: bool,
}

impl Credentials {
    pub fn validate(&self) -> ValidationResult<()> {
        let email = required_text("email", &self.email)?;
        if !is_email_address(&email) {
            return Err(ValidationError::InvalidEmail { field: "email" });
        }
        if self.password.is_empty() {
            return Err(ValidationError::Required { field: "password" });
        }
        Ok(())
    }
}

/// `local@domain.tld`, no whitespace, exactly one `@`.
pub fn is_email_address(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.split('.').count() >= 2
        && domain.split('.').all(|label| !label.is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub email: String,
    pub remember: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("invalid email or password")]
    BadCredentials,
    #[error("sign-in is unavailable: {0}")]
    Unavailable(String),
}

/// Authentication collaborator.
pub trait AuthClient {
    fn sign_in(&mut self, credentials: &Credentials) -> Result<Session, AuthError>;
    fn sign_out(&mut self, session: &Session);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignInField {
    #[default]
    Email,
    Password,
    Remember,
}

impl SignInField {
    pub const ALL: [Self; 3] = [Self::Email, Self::Password, Self::Remember];

    pub fn next(self) -> Self {
        match self {
            Self::Email => Self::Password,
            Self::Password => Self::Remember,
            Self::Remember => Self::Email,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Email => "Email",
            Self::Password => "Password",
            Self::Remember => "Remember me",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInForm {
    pub credentials: Credentials,
    pub focus: SignInField,
    pub pending: bool,
    /// Form-level message from the last failed attempt.
    pub banner: Option<String>,
}

impl Default for SignInForm {
    fn default() -> Self {
        Self::with_email(DEFAULT_ADMIN_EMAIL)
    }
}

impl SignInForm {
    pub fn with_email(email: &str) -> Self {
        Self {
            credentials: Credentials {
                email: email.to_owned(),
                ..Credentials::default()
            },
            focus: SignInField::default(),
            pending: false,
            banner: None,
        }
    }

    pub fn push_char(&mut self, ch: char) {
        match self.focus {
            SignInField::Email => self.credentials.email.push(ch),
            SignInField::Password => self.credentials.password.push(ch),
            SignInField::Remember => {}
        }
    }

    pub fn pop_char(&mut self) {
        match self.focus {
            SignInField::Email => {
                self.credentials.email.pop();
            }
            SignInField::Password => {
                self.credentials.password.pop();
            }
            SignInField::Remember => {}
        }
    }

    pub fn toggle_remember(&mut self) {
        self.credentials.remember = !self.credentials.remember;
    }

    /// Validates locally, then asks `client`. Malformed credentials never
    /// reach the client. The password is cleared after every attempt that
    /// reached the client.
    pub fn submit(&mut self, client: &mut dyn AuthClient) -> Result<Session, AuthError> {
        self.banner = None;
        if let Err(error) = self.credentials.validate() {
            self.banner = Some(error.to_string());
            return Err(error.into());
        }

        self.pending = true;
        let result = client.sign_in(&self.credentials);
        self.pending = false;
        self.credentials.password.clear();
        if let Err(error) = &result {
            self.banner = Some(error.to_string());
        }
        result
    }
}
