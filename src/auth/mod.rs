// SPDX-FileCopyrightText: 2026 Tessera contributors
// SPDX-License-Identifier: MIT

//! Credential verification against the remote user directory.
//!
//! The lookup is a single blocking request (no async runtime); the TUI runs
//! it on a worker thread and polls for the result, so a completion that
//! arrives after the login view is gone lands in a dropped channel.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;

/// Fixed notification copy for a zero-record answer.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid credentials";
/// Fixed notification copy for a failed request.
pub const REQUEST_FAILED_MESSAGE: &str = "Something went wrong";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// One record from the user directory. A non-empty record set authenticates.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserRecord {
    pub email: String,
    #[serde(default)]
    pub admin: bool,
}

#[derive(Debug)]
pub enum AuthError {
    /// The directory answered with zero matching records.
    InvalidCredentials,
    /// The request itself failed: transport, HTTP status or malformed body.
    Request(String),
}

impl AuthError {
    /// The fixed notification text for this failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => INVALID_CREDENTIALS_MESSAGE,
            Self::Request(_) => REQUEST_FAILED_MESSAGE,
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCredentials => write!(f, "no matching user record"),
            Self::Request(msg) => write!(f, "credential request failed: {msg}"),
        }
    }
}

impl std::error::Error for AuthError {}

/// Blocking client for the credential endpoint.
#[derive(Debug, Clone)]
pub struct CredentialClient {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl CredentialClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, AuthError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| AuthError::Request(err.to_string()))?;
        Ok(Self { http, base_url: normalize_base_url(base_url.into()) })
    }

    /// Looks `email`/`secret` up in the directory.
    pub fn verify(&self, email: &str, secret: &str) -> Result<UserRecord, AuthError> {
        let response = self
            .http
            .get(format!("{}/users", self.base_url))
            .query(&[("email", email), ("password", secret)])
            .send()
            .map_err(|err| AuthError::Request(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::Request(format!("unexpected status {status}")));
        }

        let records: Vec<UserRecord> =
            response.json().map_err(|err| AuthError::Request(err.to_string()))?;
        first_record(records)
    }
}

fn normalize_base_url(mut base_url: String) -> String {
    while base_url.ends_with('/') {
        base_url.pop();
    }
    base_url
}

/// Maps a decoded record set onto the two authentication outcomes.
fn first_record(records: Vec<UserRecord>) -> Result<UserRecord, AuthError> {
    records.into_iter().next().ok_or(AuthError::InvalidCredentials)
}

/// Fixture entry for demo mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltInUser {
    pub email: String,
    pub secret: String,
    pub admin: bool,
}

/// Credential source: the remote directory, or the built-in demo fixture.
#[derive(Debug, Clone)]
pub enum Verifier {
    Remote(CredentialClient),
    BuiltIn(Vec<BuiltInUser>),
}

impl Verifier {
    pub fn remote(base_url: impl Into<String>) -> Result<Self, AuthError> {
        Ok(Self::Remote(CredentialClient::new(base_url)?))
    }

    /// The demo directory: one regular and one admin account.
    pub fn demo() -> Self {
        Self::BuiltIn(vec![
            BuiltInUser {
                email: "ada@example.com".to_owned(),
                secret: "mosaic".to_owned(),
                admin: false,
            },
            BuiltInUser {
                email: "root@example.com".to_owned(),
                secret: "mosaic".to_owned(),
                admin: true,
            },
        ])
    }

    pub fn verify(&self, email: &str, secret: &str) -> Result<UserRecord, AuthError> {
        match self {
            Self::Remote(client) => client.verify(email, secret),
            Self::BuiltIn(users) => first_record(
                users
                    .iter()
                    .filter(|user| user.email == email && user.secret == secret)
                    .map(|user| UserRecord { email: user.email.clone(), admin: user.admin })
                    .collect(),
            ),
        }
    }
}
