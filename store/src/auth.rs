//! Auth-service client.
//!
//! Sessions are issued and held by the hosted service; this side only
//! exchanges credentials for a token and verifies presented tokens. The
//! admin gate in the server is a thin wrapper over [`AuthClient::user`].

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{remote_message, StoreError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub token_type: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Clone)]
pub struct AuthClient {
    http: Client,
    base: String,
    key: String,
}

impl AuthClient {
    pub fn new(base: &str, key: &str) -> Self {
        Self {
            http: Client::new(),
            base: base.trim_end_matches('/').to_string(),
            key: key.to_string(),
        }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, StoreError> {
        let response = self
            .http
            .post(format!("{}/auth/v1/token", self.base))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.key)
            .json(&PasswordGrant { email, password })
            .send()
            .await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }
        let body = response.text().await.unwrap_or_default();
        Err(StoreError::Remote(remote_message(status, &body)))
    }

    /// Resolves an access token to its user, failing for expired or forged
    /// tokens.
    pub async fn user(&self, access_token: &str) -> Result<AuthUser, StoreError> {
        let response = self
            .http
            .get(format!("{}/auth/v1/user", self.base))
            .header("apikey", &self.key)
            .bearer_auth(access_token)
            .send()
            .await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }
        let body = response.text().await.unwrap_or_default();
        Err(StoreError::Remote(remote_message(status, &body)))
    }

    pub async fn sign_out(&self, access_token: &str) -> Result<(), StoreError> {
        let response = self
            .http
            .post(format!("{}/auth/v1/logout", self.base))
            .header("apikey", &self.key)
            .bearer_auth(access_token)
            .send()
            .await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(StoreError::Remote(remote_message(status, &body)))
    }
}
