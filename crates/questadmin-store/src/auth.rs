// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use questadmin_app::{AuthClient, AuthError, Credentials, DEFAULT_ADMIN_EMAIL, Session};
use sha2::{Digest, Sha256};
use std::fmt::Write as _;
use tracing::{info, warn};

/// Password used when no digest is configured.
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// Lowercase hex SHA-256 of `password`.
pub fn password_digest(password: &str) -> String {
    let digest = Sha256::digest(password.as_bytes());
    let mut output = String::with_capacity(digest.len() * 2);
    for byte in digest {
        let _ = write!(&mut output, "{byte:02x}");
    }
    output
}

/// Single-admin authenticator checked against a stored password digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalAuthClient {
    admin_email: String,
    password_sha256: String,
}

impl Default for LocalAuthClient {
    fn default() -> Self {
        Self::with_password(DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_PASSWORD)
    }
}

impl LocalAuthClient {
    pub fn new(admin_email: &str, password_sha256: &str) -> Self {
        Self {
            admin_email: admin_email.trim().to_owned(),
            password_sha256: password_sha256.trim().to_ascii_lowercase(),
        }
    }

    pub fn with_password(admin_email: &str, password: &str) -> Self {
        Self::new(admin_email, &password_digest(password))
    }

    pub fn admin_email(&self) -> &str {
        &self.admin_email
    }
}

impl AuthClient for LocalAuthClient {
    fn sign_in(&mut self, credentials: &Credentials) -> Result<Session, AuthError> {
        credentials.validate()?;
        let email = credentials.email.trim();
        let email_ok = email.eq_ignore_ascii_case(&self.admin_email);
        let password_ok = password_digest(&credentials.password) == self.password_sha256;
        if !(email_ok && password_ok) {
            warn!(email, "sign-in rejected");
            return Err(AuthError::BadCredentials);
        }
        info!(email, remember = credentials.remember, "signed in");
        Ok(Session {
            email: self.admin_email.clone(),
            remember: credentials.remember,
        })
    }

    fn sign_out(&mut self, session: &Session) {
        info!(email = %session.email, "signed out");
    }
}
