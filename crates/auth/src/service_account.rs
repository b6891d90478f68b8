//! Non-interactive service-account grant.

use crate::credentials::{Credentials, Grant};
use crate::error::AuthError;
use crate::strategy::AuthStrategy;
use crate::token::{request_token, TokenResponse, GOOGLE_TOKEN_URI};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// The fields of a downloaded service-account key file that are used here.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default)]
    pub token_uri: Option<String>,
}

impl ServiceAccountKey {
    pub fn from_file(path: &Path) -> Result<Self, AuthError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AuthError::MissingKeyFile(path.to_path_buf()))
            }
            Err(e) => {
                return Err(AuthError::MalformedKey(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
            }
        };
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, AuthError> {
        let key: ServiceAccountKey =
            serde_json::from_str(content).map_err(|e| AuthError::MalformedKey(e.to_string()))?;

        if key.client_email.trim().is_empty() {
            return Err(AuthError::MalformedKey("client_email is empty".to_string()));
        }
        EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| AuthError::MalformedKey(format!("private_key: {}", e)))?;

        Ok(key)
    }

    pub fn into_grant(self) -> Grant {
        Grant::ServiceAccount {
            client_email: self.client_email,
            private_key: self.private_key,
            private_key_id: self.private_key_id,
            token_uri: self
                .token_uri
                .unwrap_or_else(|| GOOGLE_TOKEN_URI.to_string()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct AssertionClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

/// Build the signed RS256 JWT exchanged for an access token.
pub fn build_assertion(
    client_email: &str,
    private_key: &str,
    private_key_id: Option<&str>,
    token_uri: &str,
    scopes: &[String],
    now: DateTime<Utc>,
) -> Result<String, AuthError> {
    let iat = now.timestamp();
    let claims = AssertionClaims {
        iss: client_email.to_string(),
        scope: scopes.join(" "),
        aud: token_uri.to_string(),
        iat,
        exp: iat + ASSERTION_LIFETIME_SECS,
    };

    let mut header = Header::new(Algorithm::RS256);
    header.kid = private_key_id.map(str::to_string);

    let key = EncodingKey::from_rsa_pem(private_key.as_bytes())
        .map_err(|e| AuthError::MalformedKey(format!("private_key: {}", e)))?;

    jsonwebtoken::encode(&header, &claims, &key)
        .map_err(|e| AuthError::MalformedKey(format!("Cannot sign assertion: {}", e)))
}

/// Exchange a fresh assertion for an access token.
pub async fn mint_access_token(
    http: &reqwest::Client,
    grant: &Grant,
    scopes: &[String],
) -> Result<TokenResponse, AuthError> {
    let Grant::ServiceAccount {
        client_email,
        private_key,
        private_key_id,
        token_uri,
    } = grant
    else {
        return Err(AuthError::MalformedKey(
            "credentials do not hold a service account key".to_string(),
        ));
    };

    debug!("Minting access token for {}", client_email);
    let assertion = build_assertion(
        client_email,
        private_key,
        private_key_id.as_deref(),
        token_uri,
        scopes,
        Utc::now(),
    )?;

    request_token(
        http,
        token_uri,
        &[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())],
    )
    .await
}

/// Server-to-server flow backed by a key file; needs no user interaction.
pub struct ServiceAccountStrategy {
    key_path: PathBuf,
}

impl ServiceAccountStrategy {
    pub fn new(key_path: impl Into<PathBuf>) -> Self {
        Self {
            key_path: key_path.into(),
        }
    }
}

#[async_trait]
impl AuthStrategy for ServiceAccountStrategy {
    async fn create(&self, scopes: &[String]) -> Result<Credentials, AuthError> {
        let key = ServiceAccountKey::from_file(&self.key_path)?;
        info!("Using service account {}", key.client_email);
        Ok(Credentials::new(key.into_grant(), scopes))
    }

    fn name(&self) -> &str {
        "service account"
    }
}
