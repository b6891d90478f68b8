use crate::error::PredictError;
use crate::wire::{InsertModelRequest, PredictRequest, PredictResponse, TrainedModel};
use async_trait::async_trait;
use har_predict_core::ModelRef;

/// Operations of the remote model-management service.
///
/// Model-scoped calls report a missing model as
/// [`PredictError::ModelNotFound`].
#[async_trait]
pub trait PredictionApi: Send + Sync {
    async fn get_model(&self, model: &ModelRef) -> Result<TrainedModel, PredictError>;

    async fn insert_model(
        &self,
        project_id: &str,
        body: &InsertModelRequest,
    ) -> Result<TrainedModel, PredictError>;

    async fn predict(
        &self,
        model: &ModelRef,
        body: &PredictRequest,
    ) -> Result<PredictResponse, PredictError>;

    async fn analyze(&self, model: &ModelRef) -> Result<serde_json::Value, PredictError>;
}
