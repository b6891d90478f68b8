//! Interactive consent flow for an installed application.

use crate::credentials::{Credentials, Grant};
use crate::error::AuthError;
use crate::server::{read_code_from_stdin, CallbackServer};
use crate::strategy::AuthStrategy;
use crate::token::{request_token, TokenResponse, GOOGLE_TOKEN_URI};
use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::Utc;
use rand::Rng;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

pub const GOOGLE_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const CALLBACK_TIMEOUT: Duration = Duration::from_secs(300);

/// Command-line knobs of the consent flow.
#[derive(Debug, Clone)]
pub struct FlowFlags {
    pub noauth_local_webserver: bool,
    pub auth_host_name: String,
    pub auth_host_ports: Vec<u16>,
}

impl Default for FlowFlags {
    fn default() -> Self {
        Self {
            noauth_local_webserver: false,
            auth_host_name: "localhost".to_string(),
            auth_host_ports: vec![8080, 8090],
        }
    }
}

/// OAuth client registration downloaded from the cloud console.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientSecrets {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_auth_uri() -> String {
    GOOGLE_AUTH_URI.to_string()
}

fn default_token_uri() -> String {
    GOOGLE_TOKEN_URI.to_string()
}

#[derive(Debug, Deserialize)]
struct ClientSecretsFile {
    installed: Option<ClientSecrets>,
    web: Option<ClientSecrets>,
}

impl ClientSecrets {
    pub fn from_file(path: &Path) -> Result<Self, AuthError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AuthError::MissingClientSecrets(path.to_path_buf()))
            }
            Err(e) => return Err(AuthError::MalformedClientSecrets(e.to_string())),
        };
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, AuthError> {
        let file: ClientSecretsFile = serde_json::from_str(content)
            .map_err(|e| AuthError::MalformedClientSecrets(e.to_string()))?;
        file.installed.or(file.web).ok_or_else(|| {
            AuthError::MalformedClientSecrets(
                "expected an \"installed\" or \"web\" client section".to_string(),
            )
        })
    }
}

/// Proof key for the code exchange, S256 method.
#[derive(Debug, Clone)]
pub struct PkcePair {
    pub verifier: String,
    pub challenge: String,
}

impl PkcePair {
    /// Verifier of 32 random octets, 43 characters once encoded.
    pub fn generate() -> Self {
        Self::from_verifier(random_token(32))
    }

    pub fn from_verifier(verifier: String) -> Self {
        let challenge = URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()));
        Self {
            verifier,
            challenge,
        }
    }
}

fn random_token(octets: usize) -> String {
    let mut bytes = vec![0u8; octets];
    rand::thread_rng().fill(bytes.as_mut_slice());
    URL_SAFE_NO_PAD.encode(bytes)
}

pub fn build_authorization_url(
    secrets: &ClientSecrets,
    redirect_uri: &str,
    scopes: &[String],
    pkce: &PkcePair,
    state: &str,
) -> Result<String, AuthError> {
    let mut url = url::Url::parse(&secrets.auth_uri)
        .map_err(|e| AuthError::MalformedClientSecrets(format!("auth_uri: {}", e)))?;
    url.query_pairs_mut()
        .append_pair("client_id", &secrets.client_id)
        .append_pair("redirect_uri", redirect_uri)
        .append_pair("response_type", "code")
        .append_pair("scope", &scopes.join(" "))
        .append_pair("code_challenge", &pkce.challenge)
        .append_pair("code_challenge_method", "S256")
        .append_pair("state", state)
        .append_pair("access_type", "offline")
        .append_pair("prompt", "consent");
    Ok(url.to_string())
}

pub async fn exchange_code(
    http: &reqwest::Client,
    secrets: &ClientSecrets,
    code: &str,
    verifier: &str,
    redirect_uri: &str,
) -> Result<TokenResponse, AuthError> {
    request_token(
        http,
        &secrets.token_uri,
        &[
            ("grant_type", "authorization_code"),
            ("client_id", secrets.client_id.as_str()),
            ("client_secret", secrets.client_secret.as_str()),
            ("code", code),
            ("code_verifier", verifier),
            ("redirect_uri", redirect_uri),
        ],
    )
    .await
}

pub async fn refresh_access_token(
    http: &reqwest::Client,
    grant: &Grant,
) -> Result<TokenResponse, AuthError> {
    let Grant::AuthorizedUser {
        client_id,
        client_secret,
        refresh_token,
        token_uri,
    } = grant
    else {
        return Err(AuthError::FlowAborted(
            "credentials do not hold a refresh token".to_string(),
        ));
    };

    request_token(
        http,
        token_uri,
        &[
            ("grant_type", "refresh_token"),
            ("client_id", client_id.as_str()),
            ("client_secret", client_secret.as_str()),
            ("refresh_token", refresh_token.as_str()),
        ],
    )
    .await
}

/// Browser-based consent; the operator approves access once.
pub struct InteractiveStrategy {
    client_secrets: PathBuf,
    flags: FlowFlags,
    http: reqwest::Client,
}

impl InteractiveStrategy {
    pub fn new(client_secrets: impl Into<PathBuf>, flags: FlowFlags) -> Self {
        Self {
            client_secrets: client_secrets.into(),
            flags,
            http: reqwest::Client::new(),
        }
    }

    async fn obtain_code(
        &self,
        secrets: &ClientSecrets,
        scopes: &[String],
        pkce: &PkcePair,
    ) -> Result<(String, String), AuthError> {
        let state = random_token(24);

        let server = if self.flags.noauth_local_webserver {
            None
        } else {
            CallbackServer::bind(
                &self.flags.auth_host_name,
                &self.flags.auth_host_ports,
                state.clone(),
            )
            .await
        };

        match server {
            Some(server) => {
                let redirect_uri = server.redirect_uri().to_string();
                let auth_url =
                    build_authorization_url(secrets, &redirect_uri, scopes, pkce, &state)?;

                println!("Your browser has been opened to visit:\n\n    {}\n", auth_url);
                if let Err(e) = open::that(&auth_url) {
                    warn!("Failed to open browser: {}", e);
                }

                let code = server.wait_for_code(CALLBACK_TIMEOUT).await?;
                Ok((code, redirect_uri))
            }
            None => {
                let port = self.flags.auth_host_ports.first().copied().unwrap_or(8080);
                let redirect_uri = format!("http://{}:{}/", self.flags.auth_host_name, port);
                let auth_url =
                    build_authorization_url(secrets, &redirect_uri, scopes, pkce, &state)?;

                println!("Go to the following link in your browser:\n\n    {}\n", auth_url);
                let code = read_code_from_stdin().await?;
                Ok((code, redirect_uri))
            }
        }
    }
}

#[async_trait]
impl AuthStrategy for InteractiveStrategy {
    async fn create(&self, scopes: &[String]) -> Result<Credentials, AuthError> {
        let secrets = ClientSecrets::from_file(&self.client_secrets)?;
        let pkce = PkcePair::generate();

        let (code, redirect_uri) = self.obtain_code(&secrets, scopes, &pkce).await?;

        info!("Exchanging authorization code for tokens");
        let tokens =
            exchange_code(&self.http, &secrets, &code, &pkce.verifier, &redirect_uri).await?;

        let refresh_token = tokens.refresh_token.clone().ok_or_else(|| {
            AuthError::FlowAborted("token response carried no refresh token".to_string())
        })?;

        let mut credentials = Credentials::new(
            Grant::AuthorizedUser {
                client_id: secrets.client_id,
                client_secret: secrets.client_secret,
                refresh_token,
                token_uri: secrets.token_uri,
            },
            scopes,
        );
        credentials.set_access_token(
            tokens.access_token,
            tokens.expires_in.unwrap_or(3600),
            Utc::now(),
        );

        info!("Authentication successful");
        Ok(credentials)
    }

    fn name(&self) -> &str {
        "interactive"
    }
}
