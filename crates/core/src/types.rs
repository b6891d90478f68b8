use serde::{Deserialize, Serialize};
use std::fmt;

/// Model type used for every model this tool creates.
pub const MODEL_TYPE_CLASSIFICATION: &str = "CLASSIFICATION";

/// Reference to a remote trained model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelRef {
    pub project_id: String,
    pub model_id: String,
}

impl ModelRef {
    pub fn new(project_id: impl Into<String>, model_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            model_id: model_id.into(),
        }
    }
}

impl fmt::Display for ModelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.project_id, self.model_id)
    }
}

/// Remote training lifecycle state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TrainingStatus {
    Running,
    Done,
    Other(String),
}

impl TrainingStatus {
    pub fn is_done(&self) -> bool {
        matches!(self, TrainingStatus::Done)
    }

    pub fn as_str(&self) -> &str {
        match self {
            TrainingStatus::Running => "RUNNING",
            TrainingStatus::Done => "DONE",
            TrainingStatus::Other(status) => status,
        }
    }
}

impl From<String> for TrainingStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "RUNNING" => TrainingStatus::Running,
            "DONE" => TrainingStatus::Done,
            _ => TrainingStatus::Other(value),
        }
    }
}

impl From<TrainingStatus> for String {
    fn from(value: TrainingStatus) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for TrainingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Confidence the classifier assigns to one candidate class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassScore {
    pub class_id: String,
    pub score: f64,
}

/// A resolved prediction: the winning class and the per-class scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub class_id: String,
    pub activity: String,
    pub scores: Vec<ClassScore>,
}
