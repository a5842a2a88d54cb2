// Service-account token exchange for the Sheets API
use crate::config::CredentialSource;
use crate::model::SyncError;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fs;
use tokio::sync::Mutex;
use tracing::{debug, info};

const SCOPES: &str =
    "https://www.googleapis.com/auth/spreadsheets https://www.googleapis.com/auth/drive";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
const REFRESH_MARGIN_SECS: i64 = 60;

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.into()
}

fn default_expires_in() -> i64 {
    ASSERTION_LIFETIME_SECS
}

#[derive(Debug, Deserialize)]
struct ServiceAccountKey {
    client_email: String,
    private_key: String,
    #[serde(default = "default_token_uri")]
    token_uri: String,
}

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

pub struct ServiceAccountAuth {
    key: ServiceAccountKey,
    signing_key: EncodingKey,
    client: Client,
    cached: Mutex<Option<CachedToken>>,
}

impl ServiceAccountAuth {
    pub fn from_source(source: &CredentialSource, client: Client) -> Result<Self, SyncError> {
        let raw = match source {
            CredentialSource::Inline(json) => json.clone(),
            CredentialSource::File(path) => {
                if !path.exists() {
                    return Err(SyncError::MissingCredentials(path.display().to_string()));
                }
                fs::read_to_string(path).map_err(|e| {
                    SyncError::Credentials(format!("{}: {}", path.display(), e))
                })?
            }
        };
        Self::from_json(&raw, client)
    }

    fn from_json(raw: &str, client: Client) -> Result<Self, SyncError> {
        let key: ServiceAccountKey =
            serde_json::from_str(raw).map_err(|e| SyncError::Credentials(e.to_string()))?;
        let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| SyncError::Credentials(format!("private_key: {}", e)))?;

        info!("Using service account {}", key.client_email);
        Ok(Self {
            key,
            signing_key,
            client,
            cached: Mutex::new(None),
        })
    }

    fn assertion(&self, now: DateTime<Utc>) -> Result<String, SyncError> {
        let claims = Claims {
            iss: &self.key.client_email,
            scope: SCOPES,
            aud: &self.key.token_uri,
            iat: now.timestamp(),
            exp: now.timestamp() + ASSERTION_LIFETIME_SECS,
        };
        encode(&Header::new(Algorithm::RS256), &claims, &self.signing_key)
            .map_err(|e| SyncError::Auth(e.to_string()))
    }

    /// Bearer token for the Sheets API, reused until shortly before it expires.
    pub async fn access_token(&self) -> Result<String, SyncError> {
        let mut cached = self.cached.lock().await;
        let now = Utc::now();
        if let Some(token) = cached.as_ref() {
            if token.expires_at - Duration::seconds(REFRESH_MARGIN_SECS) > now {
                return Ok(token.value.clone());
            }
        }

        debug!("Requesting access token from {}", self.key.token_uri);
        let assertion = self.assertion(now)?;
        let response = self
            .client
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(SyncError::Auth(format!("token endpoint [{}]: {}", status, body)));
        }

        let token: TokenResponse = serde_json::from_str(&body)?;
        *cached = Some(CachedToken {
            value: token.access_token.clone(),
            expires_at: now + Duration::seconds(token.expires_in),
        });
        Ok(token.access_token)
    }
}
