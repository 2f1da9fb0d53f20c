//! OAuth access tokens for a Google service account.
//!
//! The service account key signs a short-lived JWT (RS256) that is exchanged
//! at the key's `token_uri` for a bearer token.

use crate::libs::messages::Message;
use crate::{msg_bail_anyhow, msg_error_anyhow};
use anyhow::Result;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use reqwest::Client;
use ring::rand::SystemRandom;
use ring::signature::{RsaKeyPair, RSA_PKCS1_SHA256};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fs;
use std::path::Path;

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Token lifetime requested in the assertion; Google caps it at one hour.
const ASSERTION_TTL_SECS: i64 = 3600;

/// The fields of a service account JSON key that token exchange needs.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Claims {
    iss: String,
    scope: String,
    aud: String,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl ServiceAccountKey {
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| msg_error_anyhow!(Message::ServiceAccountKeyInvalid(format!("{}: {}", path.display(), e))))?;
        serde_json::from_str(&raw).map_err(|e| msg_error_anyhow!(Message::ServiceAccountKeyInvalid(e.to_string())))
    }

    /// `header.claims` part of the JWT, before signing.
    fn signing_input(&self, scope: &str, now: i64) -> Result<String> {
        let header = json!({ "alg": "RS256", "typ": "JWT" });
        let claims = Claims {
            iss: self.client_email.clone(),
            scope: scope.to_string(),
            aud: self.token_uri.clone(),
            iat: now,
            exp: now + ASSERTION_TTL_SECS,
        };
        Ok(format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(serde_json::to_vec(&header)?),
            URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims)?)
        ))
    }

    /// Signed JWT asserting this account for `scope`, issued at `now` (unix seconds).
    pub fn assertion(&self, scope: &str, now: i64) -> Result<String> {
        let der = pem_to_der(&self.private_key)?;
        let key_pair = RsaKeyPair::from_pkcs8(&der).map_err(|e| msg_error_anyhow!(Message::ServiceAccountKeyInvalid(e.to_string())))?;

        let input = self.signing_input(scope, now)?;
        let mut signature = vec![0u8; key_pair.public().modulus_len()];
        key_pair
            .sign(&RSA_PKCS1_SHA256, &SystemRandom::new(), input.as_bytes(), &mut signature)
            .map_err(|e| msg_error_anyhow!(Message::ServiceAccountKeyInvalid(e.to_string())))?;

        Ok(format!("{}.{}", input, URL_SAFE_NO_PAD.encode(signature)))
    }

    /// Exchanges a fresh assertion for a bearer token.
    pub async fn access_token(&self, client: &Client, scope: &str, now: i64) -> Result<String> {
        let assertion = self.assertion(scope, now)?;
        let response = client
            .post(&self.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            msg_bail_anyhow!(Message::BackupRequestFailed {
                status: status.as_u16(),
                body
            });
        }
        Ok(response.json::<TokenResponse>().await?.access_token)
    }
}

/// Decodes the base64 body of a PEM block.
pub fn pem_to_der(pem: &str) -> Result<Vec<u8>> {
    let body: String = pem
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("-----"))
        .collect();
    if body.is_empty() {
        msg_bail_anyhow!(Message::ServiceAccountKeyInvalid("empty private key".to_string()));
    }
    STANDARD
        .decode(body)
        .map_err(|e| msg_error_anyhow!(Message::ServiceAccountKeyInvalid(e.to_string())))
}
