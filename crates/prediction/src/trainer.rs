use crate::api::PredictionApi;
use crate::error::PredictError;
use crate::wire::InsertModelRequest;
use har_predict_core::{ModelRef, MODEL_TYPE_CLASSIFICATION};
use std::sync::Arc;
use tracing::info;

/// Issues the one-shot "create model" request.
pub struct ModelTrainer {
    api: Arc<dyn PredictionApi>,
}

impl ModelTrainer {
    pub fn new(api: Arc<dyn PredictionApi>) -> Self {
        Self { api }
    }

    /// Start training `model` on `dataset_uri`. Does not wait for completion.
    pub async fn train(&self, model: &ModelRef, dataset_uri: &str) -> Result<(), PredictError> {
        info!("Creating new model {} from {}", model, dataset_uri);

        let body = InsertModelRequest {
            id: model.model_id.clone(),
            storage_data_location: dataset_uri.to_string(),
            model_type: MODEL_TYPE_CLASSIFICATION.to_string(),
        };

        // Not-found here is about the dataset, so it stays a RemoteApi error.
        self.api
            .insert_model(&model.project_id, &body)
            .await
            .map_err(|e| match e {
                PredictError::ModelNotFound { .. } => PredictError::RemoteApi {
                    status: 404,
                    message: format!("insert of {} failed: not found", model),
                },
                other => other,
            })?;

        Ok(())
    }
}
