#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
//! Train-if-missing cycle of the orchestrator.

mod common;

use common::*;
use har_predict_core::{LabelTable, TrainingStatus};
use har_predict_prediction::*;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn orchestrator(api: Arc<MockApi>, record: &Path, max_train_retries: u32) -> Orchestrator {
    let predictor = Predictor::new(api.clone(), LabelTable::activities(), record.to_path_buf());
    let trainer = ModelTrainer::new(api);
    Orchestrator::new(
        predictor,
        trainer,
        model_ref(),
        "human-interact-dataset/dataset.csv".to_string(),
        max_train_retries,
    )
}

fn record_file(temp: &TempDir) -> std::path::PathBuf {
    let path = temp.path().join("record.csv");
    std::fs::write(&path, "0.28,-0.01,-0.11\n").unwrap();
    path
}

#[tokio::test]
async fn test_ready_model_predicts_without_training() {
    let temp = TempDir::new().unwrap();
    let api = Arc::new(
        MockApi::new()
            .on_get_model(Ok(model_with_status(TrainingStatus::Done)))
            .on_predict(Ok(prediction_response("5"))),
    );

    let outcome = orchestrator(api.clone(), &record_file(&temp), 1)
        .run()
        .await
        .unwrap();

    match outcome {
        Outcome::Predicted(prediction) => {
            assert_eq!(prediction.class_id, "5");
            assert_eq!(prediction.activity, "standing");
        }
        other => panic!("unexpected outcome {:?}", other),
    }
    assert_eq!(api.calls(), vec!["get_model", "predict"]);
}

#[tokio::test]
async fn test_missing_model_trains_once_then_retries_once() {
    let temp = TempDir::new().unwrap();
    let api = Arc::new(
        MockApi::new()
            .on_get_model(Err(not_found()))
            .on_insert(Ok(model_with_status(TrainingStatus::Running)))
            .on_get_model(Ok(model_with_status(TrainingStatus::Running))),
    );

    let outcome = orchestrator(api.clone(), &record_file(&temp), 1)
        .run()
        .await
        .unwrap();

    assert_eq!(
        outcome,
        Outcome::NotReady {
            status: TrainingStatus::Running
        }
    );
    assert_eq!(api.count("insert_model"), 1);
    assert_eq!(api.count("get_model"), 2);
    assert_eq!(api.count("predict"), 0);

    let insert = &api.insert_bodies()[0];
    assert_eq!(insert.id, "HAR-model");
    assert_eq!(insert.storage_data_location, "human-interact-dataset/dataset.csv");
    assert_eq!(insert.model_type, "CLASSIFICATION");
}

#[tokio::test]
async fn test_retry_after_training_can_predict() {
    let temp = TempDir::new().unwrap();
    let api = Arc::new(
        MockApi::new()
            .on_get_model(Err(not_found()))
            .on_insert(Ok(model_with_status(TrainingStatus::Running)))
            .on_get_model(Ok(model_with_status(TrainingStatus::Done)))
            .on_predict(Ok(prediction_response("1"))),
    );

    let outcome = orchestrator(api.clone(), &record_file(&temp), 1)
        .run()
        .await
        .unwrap();

    assert!(matches!(outcome, Outcome::Predicted(ref p) if p.activity == "walking"));
    assert_eq!(
        api.calls(),
        vec!["get_model", "insert_model", "get_model", "predict"]
    );
}

#[tokio::test]
async fn test_second_not_found_is_reported_not_retried() {
    let temp = TempDir::new().unwrap();
    let api = Arc::new(
        MockApi::new()
            .on_get_model(Err(not_found()))
            .on_insert(Ok(model_with_status(TrainingStatus::Running)))
            .on_get_model(Err(not_found())),
    );

    let result = orchestrator(api.clone(), &record_file(&temp), 1).run().await;

    assert!(matches!(result, Err(PredictError::ModelNotFound { .. })));
    assert_eq!(api.count("insert_model"), 1);
    assert_eq!(api.count("get_model"), 2);
}

#[tokio::test]
async fn test_retry_bound_is_configurable() {
    let temp = TempDir::new().unwrap();
    let api = Arc::new(
        MockApi::new()
            .on_get_model(Err(not_found()))
            .on_insert(Ok(model_with_status(TrainingStatus::Running)))
            .on_get_model(Err(not_found()))
            .on_insert(Ok(model_with_status(TrainingStatus::Running)))
            .on_get_model(Ok(model_with_status(TrainingStatus::Running))),
    );

    let outcome = orchestrator(api.clone(), &record_file(&temp), 2)
        .run()
        .await
        .unwrap();

    assert!(matches!(outcome, Outcome::NotReady { .. }));
    assert_eq!(api.count("insert_model"), 2);
    assert_eq!(api.count("get_model"), 3);
}

#[tokio::test]
async fn test_zero_retries_never_trains() {
    let temp = TempDir::new().unwrap();
    let api = Arc::new(MockApi::new().on_get_model(Err(not_found())));

    let result = orchestrator(api.clone(), &record_file(&temp), 0).run().await;

    assert!(matches!(result, Err(PredictError::ModelNotFound { .. })));
    assert_eq!(api.count("insert_model"), 0);
}

#[tokio::test]
async fn test_other_remote_error_is_surfaced_unchanged() {
    let temp = TempDir::new().unwrap();
    let api = Arc::new(MockApi::new().on_get_model(Err(PredictError::RemoteApi {
        status: 403,
        message: "Access Not Configured".to_string(),
    })));

    let result = orchestrator(api.clone(), &record_file(&temp), 1).run().await;

    match result {
        Err(PredictError::RemoteApi { status, message }) => {
            assert_eq!(status, 403);
            assert_eq!(message, "Access Not Configured");
        }
        other => panic!("unexpected result {:?}", other),
    }
    assert_eq!(api.count("insert_model"), 0);
    assert_eq!(api.calls(), vec!["get_model"]);
}

#[tokio::test]
async fn test_training_failure_aborts() {
    let temp = TempDir::new().unwrap();
    let api = Arc::new(
        MockApi::new()
            .on_get_model(Err(not_found()))
            .on_insert(Err(PredictError::RemoteApi {
                status: 409,
                message: "Model already exists".to_string(),
            })),
    );

    let result = orchestrator(api.clone(), &record_file(&temp), 1).run().await;

    assert!(matches!(result, Err(PredictError::RemoteApi { status: 409, .. })));
    assert_eq!(api.calls(), vec!["get_model", "insert_model"]);
}
