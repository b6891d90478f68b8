use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Refresh access tokens this long before they actually expire.
const EXPIRY_MARGIN_SECS: i64 = 300;
const MAX_TOKEN_LIFETIME_SECS: u64 = 365 * 24 * 3600;

/// Material used to mint new access tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Grant {
    ServiceAccount {
        client_email: String,
        private_key: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        private_key_id: Option<String>,
        token_uri: String,
    },
    AuthorizedUser {
        client_id: String,
        client_secret: String,
        refresh_token: String,
        token_uri: String,
    },
}

impl Grant {
    pub fn token_uri(&self) -> &str {
        match self {
            Grant::ServiceAccount { token_uri, .. } => token_uri,
            Grant::AuthorizedUser { token_uri, .. } => token_uri,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Grant::ServiceAccount { .. } => "service_account",
            Grant::AuthorizedUser { .. } => "authorized_user",
        }
    }
}

/// Token state persisted in the credential cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub grant: Grant,
    pub scopes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Credentials {
    pub fn new(grant: Grant, scopes: &[String]) -> Self {
        Self {
            grant,
            scopes: scopes.to_vec(),
            access_token: None,
            expires_at: None,
        }
    }

    /// True when every requested scope was granted to these credentials.
    pub fn covers(&self, scopes: &[String]) -> bool {
        scopes.iter().all(|s| self.scopes.contains(s))
    }

    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        match (&self.access_token, self.expires_at) {
            (Some(_), Some(expires_at)) => {
                expires_at <= now + Duration::seconds(EXPIRY_MARGIN_SECS)
            }
            // A token without an expiry is trusted until the server rejects it.
            (Some(_), None) => false,
            (None, _) => true,
        }
    }

    pub fn set_access_token(&mut self, token: String, expires_in: u64, now: DateTime<Utc>) {
        let expires_in = expires_in.min(MAX_TOKEN_LIFETIME_SECS) as i64;
        self.access_token = Some(token);
        self.expires_at = Some(now + Duration::seconds(expires_in));
    }
}
