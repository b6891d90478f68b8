use crate::credentials::{Credentials, Grant};
use crate::error::AuthError;
use crate::interactive::refresh_access_token;
use crate::service_account::mint_access_token;
use chrono::Utc;
use reqwest::{Client, Response};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::debug;

const DEFAULT_TOKEN_LIFETIME_SECS: u64 = 3600;

/// HTTP client that attaches a valid bearer token to every request.
///
/// Access tokens are minted or refreshed in memory when missing or close
/// to expiry; the credential cache is not rewritten.
pub struct AuthorizedClient {
    http: Client,
    credentials: RwLock<Credentials>,
}

impl AuthorizedClient {
    pub fn new(credentials: Credentials) -> Self {
        Self::with_http(Client::new(), credentials)
    }

    pub fn with_http(http: Client, credentials: Credentials) -> Self {
        Self {
            http,
            credentials: RwLock::new(credentials),
        }
    }

    pub async fn credentials(&self) -> Credentials {
        self.credentials.read().await.clone()
    }

    pub async fn access_token(&self) -> Result<String, AuthError> {
        {
            let credentials = self.credentials.read().await;
            if !credentials.needs_refresh(Utc::now()) {
                if let Some(token) = &credentials.access_token {
                    return Ok(token.clone());
                }
            }
        }

        let mut credentials = self.credentials.write().await;
        debug!("Obtaining access token ({})", credentials.grant.kind());
        let tokens = match &credentials.grant {
            Grant::ServiceAccount { .. } => {
                mint_access_token(&self.http, &credentials.grant, &credentials.scopes).await?
            }
            Grant::AuthorizedUser { .. } => {
                refresh_access_token(&self.http, &credentials.grant).await?
            }
        };

        let token = tokens.access_token.clone();
        credentials.set_access_token(
            tokens.access_token,
            tokens.expires_in.unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS),
            Utc::now(),
        );
        Ok(token)
    }

    pub async fn get(&self, url: &str) -> Result<Response, AuthError> {
        let token = self.access_token().await?;
        Ok(self.http.get(url).bearer_auth(token).send().await?)
    }

    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &T,
    ) -> Result<Response, AuthError> {
        let token = self.access_token().await?;
        Ok(self
            .http
            .post(url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await?)
    }
}
