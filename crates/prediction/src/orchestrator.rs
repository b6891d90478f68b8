//! Predict, and train the model first if it does not exist yet.
//!
//! Training is never awaited: after the insert request the orchestrator
//! asks for a prediction again, which normally reports the model as still
//! training. The operator re-runs the tool later.

use crate::error::PredictError;
use crate::predictor::{PredictOutcome, Predictor};
use crate::trainer::ModelTrainer;
use har_predict_core::{ModelRef, Prediction, TrainingStatus};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Predicted(Prediction),
    NotReady { status: TrainingStatus },
}

#[derive(Debug)]
pub enum OrchestratorState {
    AttemptPredict,
    Training,
    Done(Outcome),
    Aborted(PredictError),
}

pub struct Orchestrator {
    predictor: Predictor,
    trainer: ModelTrainer,
    model: ModelRef,
    dataset_uri: String,
    max_train_retries: u32,
}

impl Orchestrator {
    pub fn new(
        predictor: Predictor,
        trainer: ModelTrainer,
        model: ModelRef,
        dataset_uri: String,
        max_train_retries: u32,
    ) -> Self {
        Self {
            predictor,
            trainer,
            model,
            dataset_uri,
            max_train_retries,
        }
    }

    pub async fn run(&self) -> Result<Outcome, PredictError> {
        let mut trainings = 0;
        let mut state = OrchestratorState::AttemptPredict;

        loop {
            state = match state {
                OrchestratorState::AttemptPredict => {
                    match self.predictor.predict(&self.model).await {
                        Ok(PredictOutcome::Ready(prediction)) => {
                            OrchestratorState::Done(Outcome::Predicted(prediction))
                        }
                        Ok(PredictOutcome::NotReady { status }) => {
                            OrchestratorState::Done(Outcome::NotReady { status })
                        }
                        Err(e) if e.is_model_not_found() && trainings < self.max_train_retries => {
                            info!("Model does not exist yet");
                            OrchestratorState::Training
                        }
                        Err(e) => {
                            if e.is_model_not_found() {
                                warn!(
                                    "Model {} still missing after {} training attempt(s)",
                                    self.model, trainings
                                );
                            }
                            OrchestratorState::Aborted(e)
                        }
                    }
                }
                OrchestratorState::Training => {
                    trainings += 1;
                    match self.trainer.train(&self.model, &self.dataset_uri).await {
                        Ok(()) => OrchestratorState::AttemptPredict,
                        Err(e) => OrchestratorState::Aborted(e),
                    }
                }
                OrchestratorState::Done(outcome) => return Ok(outcome),
                OrchestratorState::Aborted(e) => return Err(e),
            };
        }
    }
}
