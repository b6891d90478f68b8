//! JSON bodies exchanged with the prediction service.

use har_predict_core::{InputRecord, TrainingStatus};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InsertModelRequest {
    pub id: String,
    pub storage_data_location: String,
    pub model_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictRequest {
    pub input: PredictInput,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PredictInput {
    pub csv_instance: InputRecord,
}

impl PredictRequest {
    pub fn new(record: InputRecord) -> Self {
        Self {
            input: PredictInput {
                csv_instance: record,
            },
        }
    }
}

/// Trained model resource; only the fields this tool reads.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrainedModel {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub training_status: Option<TrainingStatus>,
    #[serde(default)]
    pub storage_data_location: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PredictResponse {
    #[serde(default)]
    pub output_label: Option<String>,
    #[serde(default)]
    pub output_multi: Vec<OutputMulti>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputMulti {
    pub label: String,
    pub score: ScoreValue,
}

/// Scores arrive as decimal strings, occasionally as plain numbers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ScoreValue {
    Number(f64),
    Text(String),
}

impl ScoreValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ScoreValue::Number(n) => Some(*n),
            ScoreValue::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: String,
}
