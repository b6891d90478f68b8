use har_predict_auth::AuthError;
use har_predict_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    #[error("Remote API error (HTTP {status}): {message}")]
    RemoteApi { status: u16, message: String },

    #[error("Model {model_id} does not exist")]
    ModelNotFound { model_id: String },

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl PredictError {
    pub fn is_model_not_found(&self) -> bool {
        matches!(self, PredictError::ModelNotFound { .. })
    }
}

impl From<reqwest::Error> for PredictError {
    fn from(err: reqwest::Error) -> Self {
        PredictError::Http(err.to_string())
    }
}
