use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Service account key file not found: {}", .0.display())]
    MissingKeyFile(PathBuf),

    #[error("Malformed service account key: {0}")]
    MalformedKey(String),

    #[error("Client secrets file not found: {}", .0.display())]
    MissingClientSecrets(PathBuf),

    #[error("Malformed client secrets: {0}")]
    MalformedClientSecrets(String),

    #[error("Authorization flow aborted: {0}")]
    FlowAborted(String),

    #[error("Token endpoint returned HTTP {status}: {message}")]
    TokenEndpoint { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Credential storage error: {0}")]
    Storage(String),
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        AuthError::Http(err.to_string())
    }
}
