use crate::report::{render_not_ready, render_prediction};
use anyhow::Result;
use har_predict_core::{AppConfig, LabelTable};
use har_predict_prediction::{ModelTrainer, Orchestrator, Outcome, PredictionApi, Predictor};
use std::sync::Arc;

pub fn orchestrator(
    config: &AppConfig,
    api: Arc<dyn PredictionApi>,
    labels: LabelTable,
) -> Orchestrator {
    let predictor = Predictor::new(api.clone(), labels, config.run.record_path.clone());
    let trainer = ModelTrainer::new(api);

    Orchestrator::new(
        predictor,
        trainer,
        config.model.model_ref(),
        config.model.dataset_uri.clone(),
        config.run.max_train_retries,
    )
}

pub async fn run(config: &AppConfig, api: Arc<dyn PredictionApi>) -> Result<Outcome> {
    let labels = LabelTable::activities();
    let outcome = orchestrator(config, api, labels).run().await?;

    match &outcome {
        Outcome::Predicted(prediction) => println!("{}", render_prediction(prediction, &labels)),
        Outcome::NotReady { status } => println!("{}", render_not_ready(status)),
    }

    Ok(outcome)
}
