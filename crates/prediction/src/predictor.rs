use crate::api::PredictionApi;
use crate::error::PredictError;
use crate::wire::{PredictRequest, PredictResponse};
use har_predict_core::{
    read_record, ClassScore, CoreError, LabelTable, ModelRef, Prediction, TrainingStatus,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, PartialEq)]
pub enum PredictOutcome {
    Ready(Prediction),
    /// Training has not finished; nothing was submitted.
    NotReady { status: TrainingStatus },
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnalyzeOutcome {
    Ready(serde_json::Value),
    NotReady { status: TrainingStatus },
}

/// Checks model readiness and classifies the local record.
pub struct Predictor {
    api: Arc<dyn PredictionApi>,
    labels: LabelTable,
    record_path: PathBuf,
}

impl Predictor {
    pub fn new(api: Arc<dyn PredictionApi>, labels: LabelTable, record_path: PathBuf) -> Self {
        Self {
            api,
            labels,
            record_path,
        }
    }

    /// `None` when the model can serve predictions, else its current status.
    async fn pending_status(
        &self,
        model: &ModelRef,
    ) -> Result<Option<TrainingStatus>, PredictError> {
        info!("Fetching model {}", model);
        let trained = self.api.get_model(model).await?;

        let status = trained
            .training_status
            .unwrap_or_else(|| TrainingStatus::Other("UNKNOWN".to_string()));
        if status.is_done() {
            info!("Model is ready");
            Ok(None)
        } else {
            info!("Model is not ready (status {})", status);
            Ok(Some(status))
        }
    }

    pub async fn predict(&self, model: &ModelRef) -> Result<PredictOutcome, PredictError> {
        if let Some(status) = self.pending_status(model).await? {
            return Ok(PredictOutcome::NotReady { status });
        }

        let record = read_record(&self.record_path)?;
        let response = self.api.predict(model, &PredictRequest::new(record)).await?;

        Ok(PredictOutcome::Ready(self.resolve(response)?))
    }

    pub async fn analyze(&self, model: &ModelRef) -> Result<AnalyzeOutcome, PredictError> {
        if let Some(status) = self.pending_status(model).await? {
            return Ok(AnalyzeOutcome::NotReady { status });
        }

        Ok(AnalyzeOutcome::Ready(self.api.analyze(model).await?))
    }

    fn resolve(&self, response: PredictResponse) -> Result<Prediction, PredictError> {
        let class_id = response
            .output_label
            .ok_or_else(|| CoreError::UnknownLabel(String::new()))?;
        let activity = self.labels.lookup(&class_id)?;

        let scores = response
            .output_multi
            .into_iter()
            .map(|entry| {
                let score = entry.score.as_f64().ok_or_else(|| {
                    PredictError::Decode(format!(
                        "score for class {:?} is not a number",
                        entry.label
                    ))
                })?;
                Ok(ClassScore {
                    class_id: entry.label,
                    score,
                })
            })
            .collect::<Result<Vec<_>, PredictError>>()?;

        Ok(Prediction {
            class_id,
            activity: activity.to_string(),
            scores,
        })
    }
}
