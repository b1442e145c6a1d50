//! Authentication and credentials persistence.

use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};

use crate::api::types::TokenResponse;
use crate::error::{Error, Result};
use crate::fs::paths::config_dir;

/// OAuth token endpoint (password grant).
const TOKEN_ENDPOINT: &str = "https://api.sparkleapp.com.br/oauth/token";

/// Safety margin subtracted from the token lifetime.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// An authenticated session's tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub obtained_at: DateTime<Utc>,
}

impl Credentials {
    /// Whether the access token is past (or close to) its lifetime.
    pub fn is_expired(&self) -> bool {
        let lifetime = Duration::seconds((self.expires_in - EXPIRY_MARGIN_SECS).max(0));
        Utc::now() >= self.obtained_at + lifetime
    }

    /// Path of the on-disk credentials cache for `username`: one JSON file
    /// per account under the platform config directory, keyed by a digest
    /// so the filename never needs sanitizing.
    pub fn cache_path(username: &str) -> Result<PathBuf> {
        let digest = Md5::digest(username.as_bytes());
        Ok(config_dir()?.join(format!("{:x}.json", digest)))
    }

    /// Load cached credentials for `username`, if present and fresh.
    pub fn load_cached(username: &str) -> Result<Option<Self>> {
        let path = Self::cache_path(username)?;

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let credentials: Credentials = serde_json::from_str(&content)?;

        if credentials.is_expired() {
            tracing::debug!("Cached credentials for '{}' expired", username);
            return Ok(None);
        }

        Ok(Some(credentials))
    }

    /// Persist credentials to the cache file.
    pub fn save(&self) -> Result<()> {
        let path = Self::cache_path(&self.username)?;
        std::fs::write(&path, serde_json::to_string_pretty(self)?)?;
        tracing::debug!("Credentials cached at {}", path.display());
        Ok(())
    }
}

/// Authenticate against the token endpoint with username and password.
pub async fn authorize(username: &str, password: &str, user_agent: &str) -> Result<Credentials> {
    let client = reqwest::Client::builder()
        .user_agent(user_agent)
        .build()
        .map_err(|e| Error::Api(format!("Failed to create HTTP client: {}", e)))?;

    let response = client
        .post(TOKEN_ENDPOINT)
        .form(&[
            ("grant_type", "password"),
            ("username", username),
            ("password", password),
        ])
        .send()
        .await?;

    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        return Err(Error::Authentication(format!(
            "Token endpoint returned HTTP {}",
            status
        )));
    }

    let token: TokenResponse = serde_json::from_str(&text)
        .map_err(|e| Error::Authentication(format!("Unexpected token response: {}", e)))?;

    Ok(Credentials {
        username: username.to_string(),
        access_token: token.access_token,
        refresh_token: token.refresh_token,
        expires_in: token.expires_in,
        obtained_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials(expires_in: i64, obtained_at: DateTime<Utc>) -> Credentials {
        Credentials {
            username: "user@example.com".into(),
            access_token: "token".into(),
            refresh_token: "refresh".into(),
            expires_in,
            obtained_at,
        }
    }

    #[test]
    fn test_fresh_credentials_not_expired() {
        let creds = credentials(3600, Utc::now());
        assert!(!creds.is_expired());
    }

    #[test]
    fn test_old_credentials_expired() {
        let creds = credentials(3600, Utc::now() - Duration::hours(2));
        assert!(creds.is_expired());
    }

    #[test]
    fn test_margin_counts_as_expired() {
        let creds = credentials(120, Utc::now() - Duration::seconds(90));
        assert!(creds.is_expired());
    }

    #[test]
    fn test_cache_filename_is_a_digest() {
        let path = Credentials::cache_path("user@example.com").unwrap();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.ends_with(".json"));
        assert_eq!(name.len(), 32 + ".json".len());
    }
}
