use std::path::Path;

use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header};
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SyncError};

/// OAuth scopes requested for the publish stage.
pub const SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/spreadsheets",
    "https://www.googleapis.com/auth/drive",
];

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const TOKEN_LIFETIME_SECONDS: i64 = 3600;

/// The fields of a Google service-account key file that token exchange needs.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

/// Scoped service-account credentials, validated before any remote call.
pub struct ServiceAccount {
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
    scopes: Vec<String>,
}

impl std::fmt::Debug for ServiceAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccount")
            .field("client_email", &self.key.client_email)
            .field("token_uri", &self.key.token_uri)
            .field("scopes", &self.scopes)
            .finish_non_exhaustive()
    }
}

impl ServiceAccount {
    /// Resolves credential material into scoped credentials.
    ///
    /// `material` is either the service-account JSON itself or a path to a
    /// key file containing it.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Auth`] if the key file cannot be read or parsed,
    /// or if its private key is not an RSA PEM key.
    pub fn resolve(material: &str) -> Result<Self> {
        let trimmed = material.trim();
        let json = if trimmed.starts_with('{') {
            trimmed.to_string()
        } else {
            let path = Path::new(trimmed);
            debug!("Reading service account key from {}", path.display());
            std::fs::read_to_string(path).map_err(|e| {
                SyncError::Auth(format!(
                    "cannot read service account file {}: {e}",
                    path.display()
                ))
            })?
        };

        let key: ServiceAccountKey = serde_json::from_str(&json)
            .map_err(|e| SyncError::Auth(format!("invalid service account JSON: {e}")))?;

        Self::from_key(key)
    }

    /// # Errors
    ///
    /// Returns [`SyncError::Auth`] if the private key is not an RSA PEM key.
    pub fn from_key(key: ServiceAccountKey) -> Result<Self> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| SyncError::Auth(format!("invalid service account private key: {e}")))?;

        Ok(Self {
            key,
            encoding_key,
            scopes: SCOPES.iter().map(ToString::to_string).collect(),
        })
    }

    pub fn client_email(&self) -> &str {
        &self.key.client_email
    }

    fn build_jwt(&self, now: i64) -> Result<String> {
        #[derive(Serialize)]
        struct Claims<'a> {
            iss: &'a str,
            scope: &'a str,
            aud: &'a str,
            iat: i64,
            exp: i64,
        }

        let scope = self.scopes.join(" ");
        let claims = Claims {
            iss: &self.key.client_email,
            scope: &scope,
            aud: &self.key.token_uri,
            iat: now,
            exp: now + TOKEN_LIFETIME_SECONDS,
        };

        Ok(jsonwebtoken::encode(
            &Header::new(jsonwebtoken::Algorithm::RS256),
            &claims,
            &self.encoding_key,
        )?)
    }

    /// Exchanges a signed assertion for an OAuth access token.
    ///
    /// # Errors
    ///
    /// Returns an error if signing fails, the token endpoint is unreachable,
    /// or it rejects the assertion.
    pub async fn access_token(&self, http_client: &Client) -> Result<String> {
        #[derive(Deserialize)]
        struct TokenResponse {
            access_token: String,
        }

        let jwt = self.build_jwt(Utc::now().timestamp())?;

        let response = http_client
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", jwt.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(SyncError::Auth(format!(
                "token exchange failed with status {status}: {message}"
            )));
        }

        let token: TokenResponse = response.json().await?;
        debug!("Obtained access token for {}", self.key.client_email);
        Ok(token.access_token)
    }
}
