#![allow(dead_code, clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use async_trait::async_trait;
use har_predict_core::{ModelRef, TrainingStatus};
use har_predict_prediction::wire::{
    InsertModelRequest, OutputMulti, PredictRequest, PredictResponse, ScoreValue, TrainedModel,
};
use har_predict_prediction::{PredictError, PredictionApi};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Scripted API: each call pops the next queued response.
#[derive(Default)]
pub struct MockApi {
    get_model: Mutex<VecDeque<Result<TrainedModel, PredictError>>>,
    insert: Mutex<VecDeque<Result<TrainedModel, PredictError>>>,
    predict: Mutex<VecDeque<Result<PredictResponse, PredictError>>>,
    calls: Mutex<Vec<String>>,
    predict_bodies: Mutex<Vec<PredictRequest>>,
    insert_bodies: Mutex<Vec<InsertModelRequest>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_get_model(self, result: Result<TrainedModel, PredictError>) -> Self {
        self.get_model.lock().unwrap().push_back(result);
        self
    }

    pub fn on_insert(self, result: Result<TrainedModel, PredictError>) -> Self {
        self.insert.lock().unwrap().push_back(result);
        self
    }

    pub fn on_predict(self, result: Result<PredictResponse, PredictError>) -> Self {
        self.predict.lock().unwrap().push_back(result);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, name: &str) -> usize {
        self.calls().iter().filter(|c| *c == name).count()
    }

    pub fn predict_bodies(&self) -> Vec<PredictRequest> {
        self.predict_bodies.lock().unwrap().clone()
    }

    pub fn insert_bodies(&self) -> Vec<InsertModelRequest> {
        self.insert_bodies.lock().unwrap().clone()
    }

    fn record(&self, name: &str) {
        self.calls.lock().unwrap().push(name.to_string());
    }
}

#[async_trait]
impl PredictionApi for MockApi {
    async fn get_model(&self, _model: &ModelRef) -> Result<TrainedModel, PredictError> {
        self.record("get_model");
        self.get_model
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected get_model call")
    }

    async fn insert_model(
        &self,
        _project_id: &str,
        body: &InsertModelRequest,
    ) -> Result<TrainedModel, PredictError> {
        self.record("insert_model");
        self.insert_bodies.lock().unwrap().push(body.clone());
        self.insert
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected insert_model call")
    }

    async fn predict(
        &self,
        _model: &ModelRef,
        body: &PredictRequest,
    ) -> Result<PredictResponse, PredictError> {
        self.record("predict");
        self.predict_bodies.lock().unwrap().push(body.clone());
        self.predict
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected predict call")
    }

    async fn analyze(&self, _model: &ModelRef) -> Result<serde_json::Value, PredictError> {
        self.record("analyze");
        Ok(serde_json::json!({"dataDescription": {"outputFeature": {"text": []}}}))
    }
}

pub fn model_ref() -> ModelRef {
    ModelRef::new("human-interact", "HAR-model")
}

pub fn model_with_status(status: TrainingStatus) -> TrainedModel {
    TrainedModel {
        id: Some("HAR-model".to_string()),
        training_status: Some(status),
        storage_data_location: Some("human-interact-dataset/dataset.csv".to_string()),
    }
}

pub fn not_found() -> PredictError {
    PredictError::ModelNotFound {
        model_id: "HAR-model".to_string(),
    }
}

pub fn prediction_response(label: &str) -> PredictResponse {
    PredictResponse {
        output_label: Some(label.to_string()),
        output_multi: vec![
            OutputMulti {
                label: "5".to_string(),
                score: ScoreValue::Text("0.812".to_string()),
            },
            OutputMulti {
                label: "4".to_string(),
                score: ScoreValue::Text("0.188".to_string()),
            },
        ],
    }
}
