use crate::api::PredictionApi;
use crate::error::PredictError;
use crate::wire::{ErrorEnvelope, InsertModelRequest, PredictRequest, PredictResponse, TrainedModel};
use async_trait::async_trait;
use har_predict_auth::AuthorizedClient;
use har_predict_core::{ApiConfig, ModelRef};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Bind an authorized client to the configured service and version.
pub fn build_client(api: &ApiConfig, client: AuthorizedClient) -> HttpPredictionApi {
    HttpPredictionApi::new(api.base_url(), client)
}

/// Prediction API over authenticated HTTPS.
pub struct HttpPredictionApi {
    base_url: String,
    client: AuthorizedClient,
}

impl HttpPredictionApi {
    pub fn new(base_url: String, client: AuthorizedClient) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn models_url(&self, project_id: &str) -> String {
        format!("{}/projects/{}/trainedmodels", self.base_url, project_id)
    }

    fn model_url(&self, model: &ModelRef) -> String {
        format!("{}/{}", self.models_url(&model.project_id), model.model_id)
    }
}

/// Decode a response body, mapping failures onto [`PredictError`].
///
/// `model` is set for calls addressed to one model; a 404 then means the
/// model does not exist.
async fn decode<T: DeserializeOwned>(
    response: Response,
    model: Option<&ModelRef>,
) -> Result<T, PredictError> {
    let status = response.status();
    let body = response.text().await?;

    if status.is_success() {
        return serde_json::from_str(&body).map_err(|e| PredictError::Decode(e.to_string()));
    }

    if status == StatusCode::NOT_FOUND {
        if let Some(model) = model {
            return Err(PredictError::ModelNotFound {
                model_id: model.model_id.clone(),
            });
        }
    }

    let message = serde_json::from_str::<ErrorEnvelope>(&body)
        .map(|envelope| envelope.error.message)
        .ok()
        .filter(|message| !message.is_empty())
        .unwrap_or(body);

    Err(PredictError::RemoteApi {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl PredictionApi for HttpPredictionApi {
    async fn get_model(&self, model: &ModelRef) -> Result<TrainedModel, PredictError> {
        let url = self.model_url(model);
        debug!("GET {}", url);
        let response = self.client.get(&url).await?;
        decode(response, Some(model)).await
    }

    async fn insert_model(
        &self,
        project_id: &str,
        body: &InsertModelRequest,
    ) -> Result<TrainedModel, PredictError> {
        let url = self.models_url(project_id);
        debug!("POST {}", url);
        let response = self.client.post_json(&url, body).await?;
        decode(response, None).await
    }

    async fn predict(
        &self,
        model: &ModelRef,
        body: &PredictRequest,
    ) -> Result<PredictResponse, PredictError> {
        let url = format!("{}/predict", self.model_url(model));
        debug!("POST {}", url);
        let response = self.client.post_json(&url, body).await?;
        decode(response, Some(model)).await
    }

    async fn analyze(&self, model: &ModelRef) -> Result<serde_json::Value, PredictError> {
        let url = format!("{}/analyze", self.model_url(model));
        debug!("GET {}", url);
        let response = self.client.get(&url).await?;
        decode(response, Some(model)).await
    }
}
