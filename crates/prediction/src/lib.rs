//! Remote model management and prediction.
//!
//! [`PredictionApi`] is the seam to the remote service; [`HttpPredictionApi`]
//! talks to it over authenticated HTTPS. [`Orchestrator`] drives the
//! predict / train-if-missing / retry cycle on top of [`Predictor`] and
//! [`ModelTrainer`].

pub mod api;
pub mod error;
pub mod http;
pub mod orchestrator;
pub mod predictor;
pub mod trainer;
pub mod wire;

pub use api::PredictionApi;
pub use error::PredictError;
pub use http::{build_client, HttpPredictionApi};
pub use orchestrator::{Orchestrator, OrchestratorState, Outcome};
pub use predictor::{AnalyzeOutcome, PredictOutcome, Predictor};
pub use trainer::ModelTrainer;
